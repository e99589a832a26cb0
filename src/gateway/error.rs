//! Session failure kinds
//!
//! Every fatal kind is surfaced to the consumer as exactly one
//! `NormalizedEvent::Error` carrying the `Display` text below.

use thiserror::Error;

use crate::provider::ProviderKind;
use crate::streaming::DecodeFault;
use crate::translate::TranslationError;

/// Message used when a vendor error body carries nothing usable
pub const GENERIC_TRANSPORT_MESSAGE: &str = "API request failed";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No key configured for the routed vendor
    #[error("Error: {} API key is not set", .0.display_name())]
    CredentialMissing(ProviderKind),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Request could not be translated for the routed vendor
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Connection failure (no status) or non-2xx response
    #[error("{message}")]
    TransportFailure { status: Option<u16>, message: String },

    /// Vendor reported an error inside a 2xx body
    #[error("{0}")]
    VendorInlineError(String),

    /// Recovered locally; never ends a session
    #[error(transparent)]
    DecodeFault(#[from] DecodeFault),

    #[error("No content received from API")]
    EmptyResult,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Stable label for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::CredentialMissing(_) => "credential_missing",
            GatewayError::ProfileNotFound(_) => "profile_not_found",
            GatewayError::InvalidRequest(_) => "invalid_request",
            GatewayError::TransportFailure { .. } => "transport_failure",
            GatewayError::VendorInlineError(_) => "vendor_error",
            GatewayError::DecodeFault(_) => "decode_fault",
            GatewayError::EmptyResult => "empty_result",
            GatewayError::Internal(_) => "internal",
        }
    }
}

impl From<TranslationError> for GatewayError {
    fn from(e: TranslationError) -> Self {
        GatewayError::InvalidRequest(e.to_string())
    }
}
