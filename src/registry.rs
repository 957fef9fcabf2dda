//! The section registry: the single source of truth for site structure.
//!
//! A site declares its sections in `sections.json` at the content root:
//!
//! ```json
//! {
//!   "sections": [
//!     { "id": "home", "label": "Home", "order": 0, "outputPath": "" },
//!     { "id": "blog", "label": "Blog", "order": 1, "contentDir": "blog", "outputPath": "blog" },
//!     { "id": "downloads", "label": "Downloads", "order": 8, "navGroup": "Files" },
//!     { "id": "contact", "label": "Contact", "order": 9 }
//!   ]
//! }
//! ```
//!
//! Sections are held sorted by `order` (ties keep their file order), and
//! everything downstream derives from that one sequence: navigation, the
//! home listing, which directories get scanned, which pages get written.
//! Adding a section to the site is one registry entry plus a content
//! directory; no code changes.
//!
//! The ids `home`, `downloads` and `contact` are special: their pages are
//! synthesized by the build rather than scanned from a content directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const HOME_ID: &str = "home";
pub const DOWNLOADS_ID: &str = "downloads";
pub const CONTACT_ID: &str = "contact";

/// Navigation group that renders without a header.
pub const MAIN_GROUP: &str = "Main";

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("section registry not found at {0}")]
    Missing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid section registry: {0}")]
    Validation(String),
}

/// One declared section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SectionDescriptor {
    /// Stable identifier, also used to mark the active nav link.
    pub id: String,
    /// Human-readable name shown in navigation.
    pub label: String,
    /// Position in navigation and listings. Lower comes first.
    #[serde(default)]
    pub order: i64,
    /// Sections sharing a group render under one nav header.
    #[serde(default = "default_nav_group")]
    pub nav_group: String,
    /// Directory under the content root to scan for this section's files.
    /// Absent for synthesized sections.
    #[serde(default)]
    pub content_dir: Option<String>,
    /// Directory under the output root this section's page lands in.
    /// Empty means the site root.
    #[serde(default)]
    pub output_path: String,
}

fn default_nav_group() -> String {
    MAIN_GROUP.to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    sections: Vec<SectionDescriptor>,
}

/// All sections, sorted by `order`.
#[derive(Debug, Clone)]
pub struct Registry {
    sections: Vec<SectionDescriptor>,
}

impl Registry {
    /// Loads and validates `sections.json`. A missing registry is fatal;
    /// a site without sections is not a site.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        if !path.exists() {
            return Err(RegistryError::Missing(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_str(content)?;
        let mut sections = file.sections;
        sections.sort_by_key(|s| s.order);
        let registry = Registry { sections };
        registry.validate()?;
        Ok(registry)
    }

    pub fn sections(&self) -> &[SectionDescriptor] {
        &self.sections
    }

    pub fn get(&self, id: &str) -> Option<&SectionDescriptor> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Label for a synthesized page, falling back when the registry does
    /// not declare the section.
    pub fn label_or(&self, id: &str, fallback: &str) -> String {
        self.get(id)
            .map(|s| s.label.clone())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Sections whose pages come from scanned content directories.
    pub fn content_sections(&self) -> impl Iterator<Item = &SectionDescriptor> {
        self.sections
            .iter()
            .filter(|s| !is_special(&s.id) && s.content_dir.is_some())
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let mut ids = HashSet::new();
        for section in &self.sections {
            if !ids.insert(section.id.as_str()) {
                return Err(RegistryError::Validation(format!(
                    "duplicate section id '{}'",
                    section.id
                )));
            }
        }

        let mut output_paths = HashSet::new();
        for section in self.content_sections() {
            if section.output_path.is_empty() {
                return Err(RegistryError::Validation(format!(
                    "section '{}' has a content directory but no output path",
                    section.id
                )));
            }
            if section.output_path == DOWNLOADS_ID || section.output_path == CONTACT_ID {
                return Err(RegistryError::Validation(format!(
                    "section '{}' uses reserved output path '{}'",
                    section.id, section.output_path
                )));
            }
            if !output_paths.insert(section.output_path.as_str()) {
                return Err(RegistryError::Validation(format!(
                    "output path '{}' is used by more than one section",
                    section.output_path
                )));
            }
        }
        Ok(())
    }
}

/// Whether this id names a synthesized section.
pub fn is_special(id: &str) -> bool {
    id == HOME_ID || id == DOWNLOADS_ID || id == CONTACT_ID
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(id: &str, extra: &str) -> String {
        format!(r#"{{ "id": "{id}", "label": "{id}"{extra} }}"#)
    }

    fn registry_of(sections: &[String]) -> Result<Registry, RegistryError> {
        Registry::from_json(&format!(r#"{{ "sections": [{}] }}"#, sections.join(",")))
    }

    #[test]
    fn sorts_by_order() {
        let registry = registry_of(&[
            minimal("z", r#", "order": 3"#),
            minimal("a", r#", "order": 1"#),
            minimal("m", r#", "order": 2"#),
        ])
        .unwrap();
        let ids: Vec<&str> = registry.sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "m", "z"]);
    }

    #[test]
    fn equal_orders_keep_file_order() {
        let registry = registry_of(&[
            minimal("first", r#", "order": 5"#),
            minimal("second", r#", "order": 5"#),
            minimal("third", r#", "order": 1"#),
        ])
        .unwrap();
        let ids: Vec<&str> = registry.sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["third", "first", "second"]);
    }

    #[test]
    fn order_defaults_to_zero() {
        let registry = registry_of(&[
            minimal("late", r#", "order": 1"#),
            minimal("default", ""),
        ])
        .unwrap();
        assert_eq!(registry.sections()[0].id, "default");
        assert_eq!(registry.sections()[0].order, 0);
    }

    #[test]
    fn nav_group_defaults_to_main() {
        let registry = registry_of(&[minimal("x", "")]).unwrap();
        assert_eq!(registry.sections()[0].nav_group, MAIN_GROUP);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = registry_of(&[minimal("dup", ""), minimal("dup", "")]).unwrap_err();
        assert!(matches!(err, RegistryError::Validation(_)));
        assert!(err.to_string().contains("duplicate section id 'dup'"));
    }

    #[test]
    fn content_section_requires_output_path() {
        let err = registry_of(&[minimal("blog", r#", "contentDir": "blog""#)]).unwrap_err();
        assert!(err.to_string().contains("no output path"));
    }

    #[test]
    fn reserved_output_paths_are_rejected() {
        let err = registry_of(&[minimal(
            "mirror",
            r#", "contentDir": "mirror", "outputPath": "contact""#,
        )])
        .unwrap_err();
        assert!(err.to_string().contains("reserved output path"));
    }

    #[test]
    fn colliding_output_paths_are_rejected() {
        let err = registry_of(&[
            minimal("a", r#", "contentDir": "a", "outputPath": "shared""#),
            minimal("b", r#", "contentDir": "b", "outputPath": "shared""#),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("used by more than one section"));
    }

    #[test]
    fn special_sections_may_omit_content_dir() {
        let registry = registry_of(&[
            minimal("home", r#", "outputPath": """#),
            minimal("downloads", ""),
            minimal("contact", ""),
        ])
        .unwrap();
        assert_eq!(registry.content_sections().count(), 0);
    }

    #[test]
    fn content_sections_skips_sections_without_a_directory() {
        let registry = registry_of(&[
            minimal("blog", r#", "contentDir": "blog", "outputPath": "blog""#),
            minimal("links", r#", "outputPath": "links""#),
        ])
        .unwrap();
        let ids: Vec<&str> = registry.content_sections().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["blog"]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = registry_of(&[minimal("x", r#", "colour": "red""#)]).unwrap_err();
        assert!(matches!(err, RegistryError::Json(_)));
    }

    #[test]
    fn missing_file_is_a_distinct_error() {
        let err = Registry::load(Path::new("/nonexistent/sections.json")).unwrap_err();
        assert!(matches!(err, RegistryError::Missing(_)));
    }

    #[test]
    fn label_lookup_with_fallback() {
        let registry =
            Registry::from_json(r#"{ "sections": [{ "id": "downloads", "label": "Artifacts" }] }"#)
                .unwrap();
        assert_eq!(registry.label_or("downloads", "Downloads"), "Artifacts");
        assert_eq!(registry.label_or("missing", "Fallback"), "Fallback");
    }
}
