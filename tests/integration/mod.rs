//! Integration tests for the Prism gateway
//!
//! These tests drive complete sessions against a wiremock server standing in
//! for every vendor, both through `Gateway::stream` and through the HTTP
//! router.

mod failures;
mod features;
mod health;
