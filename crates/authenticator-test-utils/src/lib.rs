//! # Authenticator Test Utilities
//!
//! Shared test utilities for the authenticator crate.
//!
//! This crate provides:
//! - An in-memory settings provider (`MockSettingsProvider`)
//! - Claims builders for the shapes identity providers send (`TestClaimsBuilder`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use authenticator::settings::SettingsResolver;
//! use authenticator_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let provider = MockSettingsProvider::new()
//!         .with_server_secret("s3cr3t")
//!         .with_url("https://argo.example.com");
//!
//!     let settings = SettingsResolver::new(provider).resolve_settings().await.unwrap();
//!
//!     let claims = TestClaimsBuilder::new()
//!         .for_user("alice")
//!         .with_groups(&["team-a"])
//!         .build();
//! }
//! ```

pub mod claims_builders;
pub mod mock_provider;

// Re-export commonly used items
pub use claims_builders::*;
pub use mock_provider::*;
