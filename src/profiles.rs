//! Named profiles and credential resolution
//!
//! A profile bundles the model to use when a request names none, the prompt
//! template used by the summarizer, a system message and optional per-vendor
//! credential overrides. Profiles are loaded once from a JSON file:
//!
//! ```json
//! {
//!   "default_profile": "default",
//!   "profiles": {
//!     "default": {
//!       "model": "gpt-4o-mini",
//!       "custom_prompts": "Summarize in three bullet points.",
//!       "system_message": "You are a concise assistant.",
//!       "api_keys": { "anthropic": "sk-ant-..." }
//!     }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::provider::ProviderKind;

/// Upper bound on the stored prompt template, in UTF-8 bytes
pub const MAX_PROMPT_BYTES: usize = 8192;

/// Profile name used when none is configured
pub const DEFAULT_PROFILE_NAME: &str = "default";

/// Vendor keys indexed by provider
pub type CredentialSet = HashMap<ProviderKind, SecretString>;

/// A named bundle of model choice, prompt template and credential overrides
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub model_id: String,
    pub custom_prompts: String,
    pub system_message: String,
    pub credentials: CredentialSet,
}

impl Profile {
    pub fn new(name: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_id: model_id.into(),
            custom_prompts: String::new(),
            system_message: String::new(),
            credentials: CredentialSet::new(),
        }
    }

    /// Set the prompt template, truncated to [`MAX_PROMPT_BYTES`]
    pub fn with_custom_prompts(mut self, prompts: impl Into<String>) -> Self {
        let prompts = prompts.into();
        self.custom_prompts = truncate_bytes(prompts.trim(), MAX_PROMPT_BYTES).to_string();
        self
    }

    pub fn with_system_message(mut self, message: impl Into<String>) -> Self {
        self.system_message = message.into();
        self
    }

    pub fn with_credential(mut self, kind: ProviderKind, key: impl Into<String>) -> Self {
        self.credentials
            .insert(kind, SecretString::from(key.into()));
        self
    }
}

/// Longest prefix of `text` within `max_bytes`, cut on a char boundary
pub fn truncate_bytes(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

fn usable(key: &SecretString) -> bool {
    !key.expose_secret().trim().is_empty()
}

/// Pick the key for `kind`: the profile's override first, then the global set.
///
/// Empty or whitespace-only keys count as absent.
pub fn resolve_credential(
    kind: ProviderKind,
    profile: Option<&Profile>,
    global: &CredentialSet,
) -> Option<SecretString> {
    profile
        .and_then(|p| p.credentials.get(&kind))
        .filter(|key| usable(key))
        .or_else(|| global.get(&kind).filter(|key| usable(key)))
        .cloned()
}

/// Source of profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Look up a profile by name
    async fn get(&self, profile_id: &str) -> Option<Profile>;

    /// Name used when a caller does not pick a profile
    fn default_profile(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    default_profile: Option<String>,
    #[serde(default)]
    profiles: HashMap<String, ProfileEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileEntry {
    #[serde(default)]
    model: String,
    #[serde(default)]
    custom_prompts: String,
    #[serde(default)]
    system_message: String,
    #[serde(default)]
    api_keys: HashMap<String, String>,
}

impl ProfileEntry {
    fn into_profile(self, name: &str) -> Profile {
        let mut profile = Profile::new(name, self.model.trim())
            .with_custom_prompts(self.custom_prompts)
            .with_system_message(self.system_message.trim());

        for (slug, key) in self.api_keys {
            match ProviderKind::from_slug(&slug) {
                Some(kind) => profile = profile.with_credential(kind, key),
                None => warn!(
                    profile = %name,
                    provider = %slug,
                    "Ignoring key for unknown provider"
                ),
            }
        }
        profile
    }
}

/// Profile store held in memory
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, Profile>>,
    default_profile: String,
}

impl InMemoryProfileStore {
    pub fn new(default_profile: impl Into<String>) -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            default_profile: default_profile.into(),
        }
    }

    /// A store holding a single empty profile named `name`, using `model_id`
    pub fn with_default(name: &str, model_id: &str) -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(name.to_string(), Profile::new(name, model_id));
        Self {
            profiles: RwLock::new(profiles),
            default_profile: name.to_string(),
        }
    }

    /// Parse a profile document. `fallback_default` names the default profile
    /// when the document does not.
    pub fn from_json(json: &str, fallback_default: &str) -> Result<Self> {
        let file: ProfileFile = serde_json::from_str(json).context("Invalid profiles JSON")?;

        let profiles: HashMap<String, Profile> = file
            .profiles
            .into_iter()
            .map(|(name, entry)| {
                let profile = entry.into_profile(&name);
                (name, profile)
            })
            .collect();

        let default_profile = file
            .default_profile
            .unwrap_or_else(|| fallback_default.to_string());
        if !profiles.contains_key(&default_profile) {
            warn!(
                default_profile = %default_profile,
                "Default profile is not defined in profiles file"
            );
        }

        Ok(Self {
            profiles: RwLock::new(profiles),
            default_profile,
        })
    }

    /// Load a profile document from disk
    pub fn load(path: &Path, fallback_default: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profiles file {}", path.display()))?;
        let store = Self::from_json(&json, fallback_default)?;
        info!(path = %path.display(), "Profiles loaded");
        Ok(store)
    }

    pub async fn insert(&self, profile: Profile) {
        self.profiles
            .write()
            .await
            .insert(profile.name.clone(), profile);
    }

    pub fn into_shared(self) -> Arc<dyn ProfileStore> {
        Arc::new(self)
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, profile_id: &str) -> Option<Profile> {
        self.profiles.read().await.get(profile_id).cloned()
    }

    fn default_profile(&self) -> &str {
        &self.default_profile
    }
}
