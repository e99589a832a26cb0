//! Per-vendor request headers
//!
//! Only the headers built here are sent upstream; nothing from the calling
//! client is forwarded. Credential values are marked sensitive so they never
//! show up in `Debug` output of the header map.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};

use crate::gateway::GatewayError;
use crate::provider::ProviderKind;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");
const ANTHROPIC_VERSION_HEADER: HeaderName = HeaderName::from_static("anthropic-version");
const ANTHROPIC_BROWSER_ACCESS: HeaderName =
    HeaderName::from_static("anthropic-dangerous-direct-browser-access");
const X_GOOG_API_KEY: HeaderName = HeaderName::from_static("x-goog-api-key");
const HTTP_REFERER: HeaderName = HeaderName::from_static("http-referer");
const X_TITLE: HeaderName = HeaderName::from_static("x-title");

/// OpenRouter app attribution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribution {
    pub referer: Option<String>,
    pub title: Option<String>,
}

fn sensitive(value: &str, kind: ProviderKind) -> Result<HeaderValue, GatewayError> {
    let mut value = HeaderValue::from_str(value).map_err(|_| {
        GatewayError::InvalidRequest(format!(
            "{} API key contains invalid header characters",
            kind.display_name()
        ))
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Build the full header set for one upstream request
pub fn build_headers(
    kind: ProviderKind,
    api_key: &SecretString,
    attribution: &Attribution,
) -> Result<HeaderMap, GatewayError> {
    let key = api_key.expose_secret();
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    match kind {
        ProviderKind::Anthropic => {
            headers.insert(X_API_KEY, sensitive(key, kind)?);
            headers.insert(
                ANTHROPIC_VERSION_HEADER,
                HeaderValue::from_static(ANTHROPIC_VERSION),
            );
            headers.insert(ANTHROPIC_BROWSER_ACCESS, HeaderValue::from_static("true"));
        }
        ProviderKind::Google => {
            headers.insert(X_GOOG_API_KEY, sensitive(key, kind)?);
        }
        _ => {
            headers.insert(AUTHORIZATION, sensitive(&format!("Bearer {}", key), kind)?);
        }
    }

    if kind == ProviderKind::OpenRouter {
        // Attribution is optional; skip values that are not valid header text
        if let Some(value) = attribution
            .referer
            .as_deref()
            .and_then(|v| HeaderValue::from_str(v).ok())
        {
            headers.insert(HTTP_REFERER, value);
        }
        if let Some(value) = attribution
            .title
            .as_deref()
            .and_then(|v| HeaderValue::from_str(v).ok())
        {
            headers.insert(X_TITLE, value);
        }
    }

    Ok(headers)
}
