//! Port for salted password hashing.

use super::define_port_error;

define_port_error! {
    /// Failures raised while hashing or parsing stored hashes.
    pub enum PasswordHashError {
        /// Hash computation failed.
        Hashing { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hashes passwords into self-describing strings and checks candidates.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Whether `password` matches `stored`.
    fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordHashError>;
}
