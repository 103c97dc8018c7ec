pub mod config {
    //! `~/.polypad_config.json`. Every field is optional; a missing file or a
    //! missing field means the default.
    use crate::engine::live::live::{EvalLimits, DEFAULT_MEMORY_LIMIT, DEFAULT_TIMEOUT};
    use crate::language::registry::registry::LanguageId;
    use crate::util::error::error::ConfigError;
    use serde::{Deserialize, Serialize};
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use std::{env, fs};
    use tracing::warn;

    pub const CONFIG_FILE: &str = ".polypad_config.json";
    pub const DEFAULT_LOG_FILE: &str = ".polypad/polypad.log";

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct Config {
        pub default_language: LanguageId,
        pub theme_index: usize,
        pub download_dir: Option<PathBuf>,
        /// Milliseconds; 0 disables the limit.
        pub eval_timeout_ms: u64,
        /// Bytes; 0 disables the limit.
        pub eval_memory_limit: usize,
        pub log_file: Option<PathBuf>,
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                default_language: LanguageId::default(),
                theme_index: 0,
                download_dir: None,
                eval_timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
                eval_memory_limit: DEFAULT_MEMORY_LIMIT,
                log_file: None,
            }
        }
    }

    impl Config {
        pub fn path() -> PathBuf {
            if let Ok(home) = env::var("HOME") {
                PathBuf::from(home).join(CONFIG_FILE)
            } else {
                PathBuf::from(CONFIG_FILE)
            }
        }

        /// Load from the default location, falling back to defaults (with a
        /// warning) when the file is unreadable or malformed.
        pub fn load() -> Self {
            Self::or_default(Self::load_from(&Self::path()))
        }

        /// Where logs go for a load result: the configured file, or the
        /// default one when the config could not be read. Lets logging start
        /// before [`Config::or_default`] reports the failure.
        pub fn log_file_for(loaded: &Result<Self, ConfigError>) -> PathBuf {
            match loaded {
                Ok(config) => config.log_file(),
                Err(_) => PathBuf::from(DEFAULT_LOG_FILE),
            }
        }

        pub fn or_default(loaded: Result<Self, ConfigError>) -> Self {
            loaded.unwrap_or_else(|e| {
                warn!(error = %e, "using default config");
                Self::default()
            })
        }

        pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
            if !path.exists() {
                return Ok(Self::default());
            }
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
        }

        pub fn save(&self) -> Result<(), ConfigError> {
            self.save_to(&Self::path())
        }

        pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
            let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            fs::write(path, json).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }

        pub fn download_dir(&self) -> PathBuf {
            self.download_dir
                .clone()
                .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
        }

        pub fn log_file(&self) -> PathBuf {
            self.log_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
        }

        pub fn limits(&self) -> EvalLimits {
            EvalLimits {
                timeout: (self.eval_timeout_ms > 0).then(|| Duration::from_millis(self.eval_timeout_ms)),
                memory_limit: (self.eval_memory_limit > 0).then_some(self.eval_memory_limit),
            }
        }
    }
}
