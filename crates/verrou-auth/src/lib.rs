//! # verrou-auth
//!
//! Authentication primitives for Verrou.
//!
//! ## Modules
//!
//! - `jwt`: access token creation and validation
//! - `password`: Argon2id hashing and password policy
//! - `otp`: password-reset codes and the resend gate
//! - `rbac`: role allow-lists

pub mod jwt;
pub mod otp;
pub mod password;
pub mod rbac;

pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::require_role;
