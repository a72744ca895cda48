pub mod jwt;

pub use jwt::{Claims, JwtConfig, JwtTokenIssuer};
