//! Host preference store
//!
//! Preferences are flat `name -> value` pairs. Every preference must be
//! defined with a kind and a default before it can be written; reads fall
//! back to the default when nothing valid is stored. Values are persisted
//! as a single JSON object and every change is announced on the event bus.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::events::AppEvent;

/// Name of the preferences file inside the user directory
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Host preference that toggles the line number gutter
pub const SHOW_LINE_NUMBERS: &str = "editor.showLineNumbers";

/// The kind of value a preference holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceKind {
    Number,
    String,
    Boolean,
}

impl PreferenceKind {
    /// Whether a JSON value is of this kind
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            PreferenceKind::Number => value.is_number(),
            PreferenceKind::String => value.is_string(),
            PreferenceKind::Boolean => value.is_boolean(),
        }
    }
}

impl fmt::Display for PreferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PreferenceKind::Number => "number",
            PreferenceKind::String => "string",
            PreferenceKind::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// Errors raised by the preference store
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference `{0}` is not defined")]
    Undefined(String),

    #[error("preference `{0}` is already defined")]
    AlreadyDefined(String),

    #[error("preference `{name}` expects a {expected} value, got `{found}`")]
    KindMismatch {
        name: String,
        expected: PreferenceKind,
        found: Value,
    },

    #[error("failed to access preferences file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse preferences file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Declared kind and default of a preference
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceDefinition {
    pub kind: PreferenceKind,
    pub default: Value,
}

/// Preference manager
pub struct PreferencesManager {
    /// Declared preferences
    definitions: HashMap<String, PreferenceDefinition>,

    /// Stored values, including keys nobody defined in this session
    values: Map<String, Value>,

    /// The path to the preferences file, if persisted
    path: Option<PathBuf>,

    /// Where change notifications go
    notifier: Option<mpsc::UnboundedSender<AppEvent>>,
}

impl PreferencesManager {
    /// Create a preference manager backed by `preferences.json` in `config_dir`
    pub fn new(config_dir: &Path) -> Self {
        Self {
            definitions: HashMap::new(),
            values: Map::new(),
            path: Some(config_dir.join(PREFERENCES_FILE)),
            notifier: None,
        }
    }

    /// Create a preference manager that never touches the disk
    pub fn in_memory() -> Self {
        Self {
            definitions: HashMap::new(),
            values: Map::new(),
            path: None,
            notifier: None,
        }
    }

    /// The backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Send change notifications to this channel
    pub fn attach_notifier(&mut self, sender: mpsc::UnboundedSender<AppEvent>) {
        self.notifier = Some(sender);
    }

    /// Load stored values. A missing file leaves everything at defaults.
    pub fn load(&mut self) -> Result<(), PreferenceError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if !path.exists() {
            return Ok(());
        }

        let text = fs::read_to_string(path).map_err(|source| PreferenceError::Io {
            path: path.clone(),
            source,
        })?;
        self.values = serde_json::from_str(&text).map_err(|source| PreferenceError::Parse {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), count = self.values.len(), "loaded preferences");
        Ok(())
    }

    /// Save stored values
    pub fn save(&self) -> Result<(), PreferenceError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| PreferenceError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let text = serde_json::to_string_pretty(&self.values).map_err(|source| {
            PreferenceError::Parse {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(path, text).map_err(|source| PreferenceError::Io {
            path: path.clone(),
            source,
        })
    }

    /// Declare a preference with its kind and default value
    pub fn define_preference(
        &mut self,
        name: &str,
        kind: PreferenceKind,
        default: impl Into<Value>,
    ) -> Result<(), PreferenceError> {
        if self.definitions.contains_key(name) {
            return Err(PreferenceError::AlreadyDefined(name.to_string()));
        }

        let default = default.into();
        if !kind.matches(&default) {
            return Err(PreferenceError::KindMismatch {
                name: name.to_string(),
                expected: kind,
                found: default,
            });
        }

        self.definitions
            .insert(name.to_string(), PreferenceDefinition { kind, default });
        Ok(())
    }

    /// Whether a preference has been declared
    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Get a preference definition
    pub fn definition(&self, name: &str) -> Option<&PreferenceDefinition> {
        self.definitions.get(name)
    }

    /// Get a preference value
    ///
    /// Stored values of the wrong kind are ignored in favour of the default.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.definitions.get(name) {
            Some(definition) => match self.values.get(name) {
                Some(value) if definition.kind.matches(value) => Some(value.clone()),
                Some(value) => {
                    warn!(key = name, %value, "ignoring stored preference of the wrong kind");
                    Some(definition.default.clone())
                }
                None => Some(definition.default.clone()),
            },
            None => self.values.get(name).cloned(),
        }
    }

    pub fn get_number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|v| v.as_f64())
    }

    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get(name).and_then(|v| v.as_str().map(str::to_owned))
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(|v| v.as_bool())
    }

    /// Set a preference value, persist it and announce the change
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), PreferenceError> {
        let definition = self
            .definitions
            .get(name)
            .ok_or_else(|| PreferenceError::Undefined(name.to_string()))?;

        let value = value.into();
        if !definition.kind.matches(&value) {
            return Err(PreferenceError::KindMismatch {
                name: name.to_string(),
                expected: definition.kind,
                found: value,
            });
        }

        if self.values.get(name) == Some(&value) {
            return Ok(());
        }

        // Memory only holds what made it to disk, so a failed save can be retried
        let previous = self.values.insert(name.to_string(), value);
        if let Err(e) = self.save() {
            match previous {
                Some(previous) => self.values.insert(name.to_string(), previous),
                None => self.values.remove(name),
            };
            return Err(e);
        }
        self.notify(name);
        Ok(())
    }

    fn notify(&self, name: &str) {
        if let Some(sender) = &self.notifier {
            if sender
                .send(AppEvent::PreferenceChange { key: name.into() })
                .is_err()
            {
                warn!(key = name, "preference change notification dropped");
            }
        }
    }
}
