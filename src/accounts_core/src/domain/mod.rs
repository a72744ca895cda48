pub mod email;
pub mod otp;
pub mod password;
pub mod profile;
pub mod token;
pub mod user;
