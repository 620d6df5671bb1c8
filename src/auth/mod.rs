//! Authentication module

pub mod password;

pub use password::PasswordHasher;
