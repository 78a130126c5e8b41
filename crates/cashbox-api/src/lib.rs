pub mod auth;
pub mod counts;
pub mod error;
pub mod password;
pub mod routes;
pub mod startup;

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;
pub use routes::router;
pub use startup::{AdminAccount, initialize};
