//! Site configuration module.
//!
//! Handles loading and validating `site.toml` from the project root.
//! Everything has a default; a project with no `site.toml` at all builds
//! fine with the stock identity (`guest@web`). A typical file overrides
//! only what it needs:
//!
//! ```toml
//! user = "mia"
//! host = "dev"
//! title = "mia's corner"
//!
//! [[contact]]
//! name = "github"
//! target = "https://github.com/mia"
//! ```
//!
//! The `user` and `host` values leak into almost every page: prompts,
//! `pwd` output, listing rows and breadcrumbs all derive from them.
//! Placeholder dates are configurable so a site can pick its own flavor
//! text for the synthetic `.` and `..` rows; they are fixed strings, not
//! clock readings, so rebuilding never rewrites a page that did not
//! change.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = "site.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Login name shown in prompts and as the owner columns of listings.
    pub user: String,
    /// Host name shown in prompts.
    pub host: String,
    /// Fallback page title for pages that do not set one.
    pub title: String,
    /// Directory under the content root holding downloadable artifacts.
    pub downloads_dir: String,
    /// Login banner lines shown above the home listing.
    pub banner: Vec<String>,
    /// Symlink rows on the contact page.
    pub contact: Vec<ContactLink>,
    /// Flavor dates for synthetic listing rows.
    pub dates: PlaceholderDates,
}

/// One symlink row on the contact page, rendered as `name -> target`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactLink {
    /// Symlink name, e.g. `github`.
    pub name: String,
    /// Link target URL.
    pub target: String,
}

/// Fixed date strings for rows that have no real file behind them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceholderDates {
    /// Date column for `.` rows.
    pub dot: String,
    /// Date column for `..` rows.
    pub dotdot: String,
    /// Date column for contact symlinks.
    pub contact: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            user: "guest".to_string(),
            host: "web".to_string(),
            title: "guest@web".to_string(),
            downloads_dir: "downloads".to_string(),
            banner: default_banner(),
            contact: Vec::new(),
            dates: PlaceholderDates::default(),
        }
    }
}

impl Default for PlaceholderDates {
    fn default() -> Self {
        Self {
            dot: "Mar 12 14:23".to_string(),
            dotdot: "Jan  8 09:41".to_string(),
            contact: "Feb 28 12:00".to_string(),
        }
    }
}

fn default_banner() -> Vec<String> {
    vec![
        "Linux web 6.1.0-1-amd64 #1 SMP PREEMPT_DYNAMIC Debian 6.1.0-1 (2023-01-07) x86_64"
            .to_string(),
        String::new(),
        "Last login: Fri Jul  7 07:00:07 2023 from 192.168.6.66".to_string(),
    ]
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_identity("user", &self.user)?;
        validate_identity("host", &self.host)?;
        if self.downloads_dir.is_empty() {
            return Err(ConfigError::Validation(
                "downloads_dir must not be empty".into(),
            ));
        }
        for link in &self.contact {
            if link.name.is_empty() || link.target.is_empty() {
                return Err(ConfigError::Validation(
                    "contact links need both a name and a target".into(),
                ));
            }
        }
        for (field, value) in [
            ("dates.dot", &self.dates.dot),
            ("dates.dotdot", &self.dates.dotdot),
            ("dates.contact", &self.dates.contact),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{field} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// `user` and `host` end up in prompts and fake paths, where whitespace
/// or slashes would wreck the illusion.
fn validate_identity(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{field} must not be empty"
        )));
    }
    if value.contains(['/', ' ', '\t', '\n']) {
        return Err(ConfigError::Validation(format!(
            "{field} must not contain slashes or whitespace, got {value:?}"
        )));
    }
    Ok(())
}

/// Load config from `site.toml` in the given directory.
///
/// A missing file yields the defaults; a malformed or invalid file is an
/// error.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    let config: SiteConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `site.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> String {
    let defaults = SiteConfig::default();
    format!(
        r#"# termsite configuration
# ======================
# All settings are optional; values shown below are the defaults.
# Place this file in the project root, next to the content/ directory.
# Unknown keys will cause an error.

# Identity used in prompts, fake paths and listing rows ("user@host:~$").
user = "{user}"
host = "{host}"

# Fallback <title> for pages that do not set their own.
title = "{title}"

# Directory under the content root holding downloadable artifacts.
downloads_dir = "{downloads}"

# Login banner lines shown above the home listing.
banner = [
  "{banner0}",
  "",
  "{banner2}",
]

# ---------------------------------------------------------------------------
# Flavor dates for synthetic rows (".", "..", contact symlinks).
# Fixed strings, so rebuilds do not churn pages whose content did not change.
# ---------------------------------------------------------------------------
[dates]
dot = "{dot}"
dotdot = "{dotdot}"
contact = "{contact}"

# ---------------------------------------------------------------------------
# Symlink rows on the contact page. Repeat the block per link.
# ---------------------------------------------------------------------------
# [[contact]]
# name = "github"
# target = "https://github.com/you"
"#,
        user = defaults.user,
        host = defaults.host,
        title = defaults.title,
        downloads = defaults.downloads_dir,
        banner0 = defaults.banner[0],
        banner2 = defaults.banner[2],
        dot = defaults.dates.dot,
        dotdot = defaults.dates.dotdot,
        contact = defaults.dates.contact,
    )
}
