pub mod auth;
pub mod response;
pub mod routes;

pub use auth::{AuthenticatedUser, TokenAuthError, TokenGuard, require_auth};
pub use response::{ApiResponse, MessageResponse};
pub use routes::error::{AccountsApiError, ErrorResponse};
