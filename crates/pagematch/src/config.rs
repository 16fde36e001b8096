//! Page configuration
//!
//! Where the application under test lives and where container pages serve
//! their structured state. Loadable from JSON or from the environment.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::page_object::{ContainerPage, Page, DEFAULT_STRUCTURED_STATE_PATH};
use crate::result::{PagematchError, PagematchResult};
use crate::session::Session;

/// Default base address of the application under test
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

/// Environment variable overriding [`PageConfig::base_url`]
pub const BASE_URL_ENV: &str = "PAGEMATCH_BASE_URL";

/// Environment variable overriding [`PageConfig::structured_state_path`]
pub const STATE_PATH_ENV: &str = "PAGEMATCH_STATE_PATH";

/// Configuration for building page objects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Base address page paths are resolved against
    pub base_url: Url,
    /// Snapshot path below container pages
    pub structured_state_path: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            structured_state_path: DEFAULT_STRUCTURED_STATE_PATH.to_string(),
        }
    }
}

#[allow(clippy::expect_used)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

impl PageConfig {
    /// Create a new builder
    #[must_use]
    pub fn builder() -> PageConfigBuilder {
        PageConfigBuilder::default()
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> PagematchResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> PagematchResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Read overrides from `PAGEMATCH_BASE_URL` and `PAGEMATCH_STATE_PATH`
    pub fn from_env() -> PagematchResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PagematchResult<Self> {
        let mut config = Self::default();
        if let Some(base) = lookup(BASE_URL_ENV) {
            config.base_url = Url::parse(&base)?;
        }
        if let Some(path) = lookup(STATE_PATH_ENV) {
            if path.trim().is_empty() {
                return Err(PagematchError::Config {
                    message: format!("{STATE_PATH_ENV} must not be empty"),
                });
            }
            config.structured_state_path = path;
        }
        tracing::debug!(base_url = %config.base_url, "loaded page config from environment");
        Ok(config)
    }

    /// Resolve a page path against the base address
    pub fn resolve(&self, relative: &str) -> PagematchResult<Url> {
        Ok(self.base_url.join(relative)?)
    }

    /// Rendered page at `relative`
    pub fn page<'s>(&self, session: &'s dyn Session, relative: &str) -> PagematchResult<Page<'s>> {
        Ok(Page::new(session, self.resolve(relative)?))
    }

    /// Container page at `relative` using the configured snapshot path
    pub fn container_page<'s>(
        &self,
        session: &'s dyn Session,
        relative: &str,
    ) -> PagematchResult<ContainerPage<'s>> {
        Ok(ContainerPage::new(session, self.resolve(relative)?)
            .with_structured_state_path(self.structured_state_path.clone()))
    }
}

/// Builder for `PageConfig`
#[derive(Debug, Clone, Default)]
pub struct PageConfigBuilder {
    config: PageConfig,
}

impl PageConfigBuilder {
    /// Set the base address
    #[must_use]
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.config.base_url = base_url;
        self
    }

    /// Set the snapshot path
    #[must_use]
    pub fn structured_state_path(mut self, path: impl Into<String>) -> Self {
        self.config.structured_state_path = path.into();
        self
    }

    /// Build the config
    #[must_use]
    pub fn build(self) -> PageConfig {
        self.config
    }
}
