//! Process-level settings read from the environment.

use {
    crate::{api::DEFAULT_GRAPHQL_URL, template::TemplateStore},
    anyhow::Result,
    std::{env, path::PathBuf},
    tracing::debug,
};

/// Overrides the embedded template store with a directory on disk.
pub const TEMPLATES_ENV: &str = "KATABOX_TEMPLATES";

/// Overrides the remote GraphQL endpoint.
pub const GRAPHQL_URL_ENV: &str = "KATABOX_GRAPHQL_URL";

/// Log filter, `tracing_subscriber::EnvFilter` syntax.
pub const LOG_ENV: &str = "KATABOX_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub templates_dir: Option<PathBuf>,
    pub graphql_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            templates_dir: None,
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            templates_dir: get(TEMPLATES_ENV).map(PathBuf::from),
            graphql_url: get(GRAPHQL_URL_ENV).unwrap_or(defaults.graphql_url),
        }
    }

    /// The template store in effect: the override directory when set,
    /// otherwise the one compiled into the binary.
    pub fn store(&self) -> Result<TemplateStore> {
        match &self.templates_dir {
            Some(dir) => {
                debug!(dir = ?dir, "loading templates from disk");
                TemplateStore::from_dir(dir)
            }
            None => Ok(TemplateStore::embedded()),
        }
    }
}
