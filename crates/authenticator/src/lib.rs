//! Authorization facts from verified identity tokens.
//!
//! The crate turns provider-specific claims into a canonical mapping, reads
//! typed fields out of it, decides group membership, and resolves the server
//! settings (signing secret and base URL) that token verification depends on.
//!
//! # Flow
//!
//! ```rust,ignore
//! use authenticator::claims::{normalize, ClaimsMap};
//! use authenticator::membership::is_member;
//!
//! // Claims come from an already signature-verified token.
//! let map: ClaimsMap = normalize(&verified_claims)?;
//! let issued = map.issued_at_time()?;
//!
//! if is_member(&verified_claims, &["platform-admins"]) {
//!     // allow the action
//! }
//! ```

#![warn(clippy::pedantic)]

/// Module for error types
pub mod error;

/// Module for claims normalization and typed field accessors
pub mod claims;

/// Module for group membership evaluation
pub mod membership;

/// Module for server settings resolution
pub mod settings;

/// Module for process configuration
pub mod config;

/// Module for tracing subscriber setup
pub mod observability;

pub use error::{AuthenticatorError, Result};
