//! Platform API boundary for the plat selection engine.
//!
//! Defines the wire types exchanged with the map platform and the
//! [`MapBackend`] trait the engine fetches through.
//!
//! # Architecture
//!
//! The implementation follows a layered architecture:
//!
//! ```text
//! MapBackend trait (abstraction)
//!   |
//!   +-- HttpBackend (production, JSON over HTTP)
//!   +-- MockBackend (testing)
//! ```
//!
//! # Testing Strategy
//!
//! Uses mock-first testing for fast, deterministic unit tests. The mock
//! supports programmable fixtures, scripted failures, and a request hold
//! for interleaving tests.

pub mod backend;
pub mod error;
pub mod http;
pub mod map;
pub mod plan;
pub mod types;

// Make test utilities available for both unit and integration tests
#[cfg(any(test, feature = "test-support"))]
pub mod test;

pub use backend::*;
pub use error::*;
pub use http::*;
pub use map::*;
pub use plan::*;
pub use types::*;
