mod change_password;
mod health;
mod helpers;
mod login;
mod logout;
mod otp;
mod password_reset;
mod profile;
mod refresh_token;
mod register;
