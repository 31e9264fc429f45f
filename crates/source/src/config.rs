//! Source selection, loaded from JSON.

use crate::error::SourceError;
use crate::local::{DEFAULT_EXTENSION, LocalSource};
use crate::remote::RemoteSource;
use crate::source::DocumentSource;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Which store documents are read from.
///
/// ```json
/// { "kind": "remote", "owner": "dapangmaox", "repo": "type-challenges-solutions" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// A local directory of dated files.
    Local(LocalConfig),
    /// A GitHub repository.
    Remote(RemoteConfig),
}

/// Settings for [`LocalSource`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocalConfig {
    /// Directory holding the documents.
    pub dir: PathBuf,
    /// Recognised file extension.
    #[serde(default = "default_extension")]
    pub extension: String,
}

/// Settings for [`RemoteSource`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Branch whose tree is listed.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Directory containing the category folders.
    #[serde(default = "default_root")]
    pub root: String,
    /// Categories in display order.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// API base URL.
    #[serde(default = "default_api_base", alias = "api_base")]
    pub api_base: String,
    /// Environment variable holding the bearer token.
    #[serde(default = "default_token_env", alias = "token_env")]
    pub token_env: String,
    /// Inline token; takes precedence over `token_env`.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_root() -> String {
    "questions".to_string()
}

fn default_categories() -> Vec<String> {
    ["easy", "medium", "hard", "extreme"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

impl RemoteConfig {
    /// A configuration for `owner/repo` with every other field defaulted.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: default_branch(),
            root: default_root(),
            categories: default_categories(),
            api_base: default_api_base(),
            token_env: default_token_env(),
            token: None,
        }
    }

    /// The inline token, or the value of `token_env`.
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| std::env::var(&self.token_env).ok())
            .filter(|token| !token.trim().is_empty())
    }

    pub(crate) fn validate(&self) -> Result<(), SourceError> {
        for (field, value) in [
            ("owner", &self.owner),
            ("repo", &self.repo),
            ("branch", &self.branch),
            ("root", &self.root),
        ] {
            if value.trim().is_empty() {
                return Err(SourceError::Config(format!("`{field}` must not be empty")));
            }
        }
        if self.categories.iter().any(|c| c.is_empty() || c.contains('/')) {
            return Err(SourceError::Config(
                "categories must be non-empty single path segments".to_string(),
            ));
        }
        Ok(())
    }
}

impl SourceConfig {
    /// Parses a configuration document.
    pub fn from_json_str(input: &str) -> Result<Self, SourceError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|e| SourceError::io(path, e))?;
        Self::from_json_str(&input)
    }

    fn validate(&self) -> Result<(), SourceError> {
        match self {
            SourceConfig::Local(local) if local.extension.trim_start_matches('.').is_empty() => {
                Err(SourceError::Config("`extension` must not be empty".to_string()))
            }
            SourceConfig::Local(_) => Ok(()),
            SourceConfig::Remote(remote) => remote.validate(),
        }
    }

    /// Builds the configured source.
    pub fn build(&self) -> Result<Box<dyn DocumentSource>, SourceError> {
        self.validate()?;
        match self {
            SourceConfig::Local(local) => {
                log::debug!("Using local documents from {}", local.dir.display());
                Ok(Box::new(LocalSource::new(&local.dir, &local.extension)))
            }
            SourceConfig::Remote(remote) => {
                log::debug!("Using remote documents from {}/{}", remote.owner, remote.repo);
                Ok(Box::new(RemoteSource::from_config(remote.clone())?))
            }
        }
    }
}
