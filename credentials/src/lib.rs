//! Credential handling utilities
//!
//! Provides the cryptographic building blocks of the authentication service:
//! - Password hashing and verification (Argon2id)
//! - Access token minting (JWT, HS256)
//!
//! The service crate owns the account domain and orchestrates these pieces;
//! this crate knows nothing about accounts, storage, or HTTP.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use credentials::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("Pass123").unwrap();
//! assert!(hasher.verify("Pass123", &hash).unwrap());
//! assert!(!hasher.verify("WrongPass", &hash).unwrap());
//! ```
//!
//! ## Access Tokens
//! ```
//! use credentials::{Claims, TokenSigner};
//!
//! let signer = TokenSigner::new(b"secret_key_at_least_32_bytes_long!");
//! let token = signer.issue(&Claims::for_user("alice1")).unwrap();
//! let claims = signer.decode(&token).unwrap();
//! assert_eq!(claims.username, "alice1");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenError;
pub use token::TokenSigner;
