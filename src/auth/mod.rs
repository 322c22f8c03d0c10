/// Authentication module
///
/// Credential verification, access token issuance/validation, and refresh
/// token lifecycle, orchestrated by the session service.

mod claims;
mod headers;
mod jwt;
mod password;
mod refresh_token;
pub mod session;

pub use claims::Claims;
pub use headers::get_bearer_token;
pub use jwt::generate_access_token;
pub use jwt::validate_access_token;
pub use password::hash_password;
pub use password::verify_password;
pub use refresh_token::generate_refresh_token;
pub use refresh_token::redeem_refresh_token;
pub use refresh_token::revoke_all_user_tokens;
pub use refresh_token::revoke_refresh_token;
pub use refresh_token::save_refresh_token;
