//! Per-lint configuration.
//!
//! The store is a YAML document whose top-level keys are lint names or
//! source tags, each holding a mapping of lint-interpreted values:
//!
//! ```yaml
//! CABF_BR:
//!   max_validity_days: 398
//! w_cert_validity_period_too_long:
//!   max_validity_days: 200
//! ```
//!
//! A source-tag table provides defaults for every lint of that source and
//! the lint's own table overrides it key by key. The store never interprets
//! values; a lint reads what it understands and ignores the rest.

use crate::error::ConfigError;
use crate::lint::LintMetadata;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Environment variable naming a configuration file when no explicit path
/// is given.
pub const CONFIG_ENV_VAR: &str = "CERTLINT_CONFIG";

/// Configuration tables keyed by lint name or source tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigStore {
    tables: BTreeMap<String, Mapping>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document. An empty document is an empty store.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let doc: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;

        let root = match doc {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(root) => root,
            other => {
                return Err(ConfigError::Shape {
                    message: format!("document root must be a mapping, found {}", kind_of(&other)),
                })
            }
        };

        let mut tables = BTreeMap::new();
        for (key, value) in root {
            let name = match key {
                Value::String(name) => name,
                other => {
                    return Err(ConfigError::Shape {
                        message: format!("table names must be strings, found {}", kind_of(&other)),
                    })
                }
            };
            let table = match value {
                Value::Null => Mapping::new(),
                Value::Mapping(table) => table,
                other => {
                    return Err(ConfigError::Shape {
                        message: format!(
                            "table '{}' must be a mapping, found {}",
                            name,
                            kind_of(&other)
                        ),
                    })
                }
            };
            tables.insert(name, table);
        }

        Ok(Self { tables })
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            tables = store.tables.len(),
            "Loaded lint configuration"
        );
        Ok(store)
    }

    /// Resolve the configuration source: an explicit path, else the file
    /// named by `$CERTLINT_CONFIG`, else an empty store.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::from_path(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    /// Set a single value, creating the table if needed.
    pub fn with_value(
        mut self,
        table: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.tables
            .entry(table.into())
            .or_default()
            .insert(Value::String(key.into()), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Names of all tables, sorted.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// The lint's own table only. Missing tables resolve to an empty config.
    pub fn resolve(&self, name: &str) -> LintConfig {
        LintConfig {
            lint: name.to_string(),
            table: self.tables.get(name).cloned().unwrap_or_default(),
        }
    }

    /// The lint's table layered over its source-tag table.
    pub fn resolve_for(&self, metadata: &LintMetadata) -> LintConfig {
        let mut table = self
            .tables
            .get(metadata.source.as_str())
            .cloned()
            .unwrap_or_default();
        if let Some(own) = self.tables.get(&metadata.name) {
            for (key, value) in own {
                table.insert(key.clone(), value.clone());
            }
        }
        LintConfig {
            lint: metadata.name.clone(),
            table,
        }
    }
}

/// Resolved configuration handed to one lint invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LintConfig {
    lint: String,
    table: Mapping,
}

impl LintConfig {
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn lint_name(&self) -> &str {
        &self.lint
    }

    /// Typed lookup of one key. `Ok(None)` when the key is absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.table.get(key) {
            None => Ok(None),
            Some(value) => serde_yaml::from_value(value.clone())
                .map(Some)
                .map_err(|e| ConfigError::Value {
                    lint: self.lint.clone(),
                    key: key.to_string(),
                    message: e.to_string(),
                }),
        }
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Deserialize the whole table into a lint's settings type. An empty
    /// table yields `T::default()`; use `#[serde(default)]` on `T` to accept
    /// partial tables.
    pub fn deserialize<T: DeserializeOwned + Default>(&self) -> Result<T, ConfigError> {
        if self.table.is_empty() {
            return Ok(T::default());
        }
        serde_yaml::from_value(Value::Mapping(self.table.clone())).map_err(|e| {
            ConfigError::Value {
                lint: self.lint.clone(),
                key: "*".to_string(),
                message: e.to_string(),
            }
        })
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
