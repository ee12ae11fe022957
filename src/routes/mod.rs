mod auth;
mod health_check;

pub use auth::delete_account;
pub use auth::login;
pub use auth::logout;
pub use auth::profile;
pub use auth::register;
pub use health_check::health_check;
