//! Credential adapters: password hashing and bearer token signing.

mod argon2_hasher;
mod jwt_token_issuer;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt_token_issuer::JwtTokenIssuer;
