mod admin;
mod chirps;
mod health_check;
mod tokens;
mod users;

pub use admin::{metrics, reset};
pub use chirps::{create_chirp, delete_chirp, get_chirp, get_chirps};
pub use health_check::health_check;
pub use tokens::{refresh, revoke};
pub use users::{create_user, login, update_user};
