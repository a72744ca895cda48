pub mod change_password;
pub mod check_otp;
pub mod confirm_password_reset;
pub mod error;
pub mod health;
pub mod login;
pub mod logout;
pub mod profile;
pub mod refresh_token;
pub mod register;
pub mod request_otp;

pub use change_password::change_password;
pub use check_otp::check_otp;
pub use confirm_password_reset::confirm_password_reset;
pub use error::AccountsApiError;
pub use health::health;
pub use login::login;
pub use logout::logout;
pub use profile::{get_profile, update_profile};
pub use refresh_token::refresh_token;
pub use register::register;
pub use request_otp::request_otp;
