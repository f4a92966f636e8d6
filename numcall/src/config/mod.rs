//! Configuration file (`numcall.toml`)
//!
//! ```toml
//! [interpreter]
//! max_recursion_depth = 256
//!
//! [path]
//! default_dirs = ["/usr/share/numcall/m"]
//! pathdef = "~/.numcall_pathdef"
//!
//! [repl]
//! prompt = ">> "
//! history_file = ".numcall_history"
//! ```
//!
//! Every section and field is optional. The file is looked up in this order:
//! the `--config` argument, `./numcall.toml`, then `~/.numcall.toml`.

use crate::interp::stack::DEFAULT_MAX_RECURSION_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "numcall.toml";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML in {file}: {error}")]
    Parse { file: PathBuf, error: toml::de::Error },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub interpreter: InterpreterConfig,
    pub path: PathConfig,
    pub repl: ReplConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterpreterConfig {
    /// Maximum number of nested calls
    pub max_recursion_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathConfig {
    /// Directories restored by `restoredefaultpath`
    pub default_dirs: Vec<PathBuf>,
    /// File written by `savepath` and read at startup; `~` expands to home
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pathdef: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplConfig {
    pub prompt: String,
    /// History file; relative names are taken from the home directory
    pub history_file: PathBuf,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            prompt: ">> ".to_string(),
            history_file: PathBuf::from(".numcall_history"),
        }
    }
}

impl Config {
    /// Parse and validate configuration text. `file` is used in messages.
    pub fn from_toml_str(text: &str, file: &Path) -> ConfigResult<Self> {
        let config: Config = toml::from_str(text).map_err(|error| ConfigError::Parse {
            file: file.to_path_buf(),
            error,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(file: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(file).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(file.to_path_buf())
            } else {
                ConfigError::Io(e)
            }
        })?;
        Self::from_toml_str(&text, file)
    }

    /// Load `explicit` if given, else the first configuration file found in
    /// the current directory or home directory, else defaults.
    pub fn discover(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(file) = explicit {
            return Self::load(file);
        }
        let candidates = [
            Some(PathBuf::from(CONFIG_FILE_NAME)),
            dirs::home_dir().map(|home| home.join(format!(".{CONFIG_FILE_NAME}"))),
        ];
        for file in candidates.into_iter().flatten() {
            if file.is_file() {
                tracing::debug!("using configuration {}", file.display());
                return Self::load(&file);
            }
        }
        Ok(Config::default())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.interpreter.max_recursion_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "interpreter.max_recursion_depth".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.repl.prompt.contains('\n') {
            return Err(ConfigError::InvalidValue {
                field: "repl.prompt".to_string(),
                reason: "must be a single line".to_string(),
            });
        }
        Ok(())
    }

    /// The pathdef file with `~` expanded
    pub fn pathdef_file(&self) -> Option<PathBuf> {
        self.path.pathdef.as_deref().map(expand_home)
    }

    /// The REPL history file, relative names resolved against home
    pub fn history_file(&self) -> PathBuf {
        let file = expand_home(&self.repl.history_file);
        match dirs::home_dir() {
            Some(home) if file.is_relative() => home.join(file),
            _ => file,
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
