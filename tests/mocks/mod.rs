//! Mock infrastructure for testing external services
//!
//! Provides a wiremock server that impersonates every supported LLM vendor
//! plus builders for each vendor's streaming wire format.

pub mod vendors;

pub use vendors::*;
