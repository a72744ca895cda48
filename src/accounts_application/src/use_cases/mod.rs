pub mod change_password;
pub mod confirm_password_reset;
pub mod login;
pub mod logout;
pub mod profile;
pub mod refresh_token;
pub mod register;
pub mod request_otp;
pub mod verify_otp;
