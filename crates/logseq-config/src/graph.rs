//! Graph settings read from `logseq/config.edn`.

use std::path::Path;

use crate::{
    ConfigError,
    edn::{self, Value},
};

/// Location of the graph config relative to the graph root.
pub const CONFIG_FILE: &str = "logseq/config.edn";

/// How page titles map to file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilenameFormat {
    /// `/` becomes `___`, reserved characters are URL-encoded.
    #[default]
    TripleLowbar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    pub journals_dir: String,
    pub pages_dir: String,
    pub journal_file_name_format: String,
    pub journal_page_title_format: String,
    pub file_name_format: FilenameFormat,
    /// Title of the page copied into new journals.
    pub journal_template: Option<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            journals_dir: "journals".to_string(),
            pages_dir: "pages".to_string(),
            journal_file_name_format: "yyyy_MM_dd".to_string(),
            journal_page_title_format: "MMM do, yyyy".to_string(),
            file_name_format: FilenameFormat::TripleLowbar,
            journal_template: None,
        }
    }
}

impl GraphConfig {
    /// Reads the config of the graph rooted at `graph_dir`, falling back to
    /// defaults when the graph has none.
    pub fn load(graph_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = graph_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            log::debug!("{} not found, using default graph config", config_path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.clone(),
                source,
            }
        })?;
        Self::parse(&content)
    }

    /// Parses config EDN. Keys may be written namespaced
    /// (`:journal/file-name-format`) or nested (`{:journal {:file-name-format ..}}`).
    pub fn parse(src: &str) -> Result<Self, ConfigError> {
        let root = edn::parse(src)?;
        if !root.is_map() {
            return Err(ConfigError::NotAMap);
        }

        let mut config = Self::default();
        if let Some(dir) = string(&root, None, "journals-directory")? {
            config.journals_dir = dir;
        }
        if let Some(dir) = string(&root, None, "pages-directory")? {
            config.pages_dir = dir;
        }
        if let Some(format) = string(&root, Some("journal"), "file-name-format")? {
            config.journal_file_name_format = format;
        }
        if let Some(format) = string(&root, Some("journal"), "page-title-format")? {
            config.journal_page_title_format = format;
        }
        if let Some(value) = lookup(&root, Some("file"), "name-format") {
            config.file_name_format = match value.as_keyword() {
                Some("triple-lowbar") => FilenameFormat::TripleLowbar,
                Some(other) => {
                    return Err(ConfigError::UnsupportedFilenameFormat(other.to_string()));
                }
                None => {
                    return Err(ConfigError::InvalidValue {
                        key: "file/name-format".to_string(),
                        expected: "a keyword",
                    });
                }
            };
        }
        if let Some(templates) = lookup(&root, None, "default-templates") {
            config.journal_template = match templates.get("journals") {
                Some(Value::String(page)) if !page.is_empty() => Some(page.clone()),
                Some(Value::String(_) | Value::Nil) | None => None,
                Some(_) => {
                    return Err(ConfigError::InvalidValue {
                        key: "default-templates".to_string(),
                        expected: "a map of strings",
                    });
                }
            };
        }
        Ok(config)
    }
}

/// Finds `namespace/name` in `root`, or `name` inside the nested
/// `namespace` map.
fn lookup<'v>(root: &'v Value, namespace: Option<&str>, name: &str) -> Option<&'v Value> {
    match namespace {
        None => root.get(name),
        Some(ns) => root
            .get(&format!("{ns}/{name}"))
            .or_else(|| root.get(ns).and_then(|nested| nested.get(name))),
    }
}

fn string(root: &Value, namespace: Option<&str>, name: &str) -> Result<Option<String>, ConfigError> {
    match lookup(root, namespace, name) {
        None | Some(Value::Nil) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ConfigError::InvalidValue {
            key: namespace.map_or_else(|| name.to_string(), |ns| format!("{ns}/{name}")),
            expected: "a string",
        }),
    }
}
