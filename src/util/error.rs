pub mod error {
    use std::path::PathBuf;
    use thiserror::Error;

    /// Failures moving text in or out of the editor. None of these are fatal:
    /// the caller logs them and shows a notice.
    #[derive(Debug, Error)]
    pub enum TransferError {
        #[error("{} is not a text file (invalid UTF-8)", path.display())]
        Decode { path: PathBuf },
        #[error("{}: {source}", path.display())]
        Io {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },
        #[error("clipboard unavailable: {0}")]
        Clipboard(String),
    }

    /// A fault raised while evaluating user code. Only ever turned into a
    /// transcript line.
    #[derive(Debug, Error, Clone, PartialEq, Eq)]
    #[error("{message}")]
    pub struct EvaluationFault {
        pub message: String,
    }

    impl EvaluationFault {
        pub fn new(message: impl Into<String>) -> Self {
            Self {
                message: message.into(),
            }
        }
    }

    /// A language id that is not in the registry, e.g. from `--lang`.
    #[derive(Debug, Error, Clone, PartialEq, Eq)]
    #[error("unknown language '{0}' (expected javascript, java or python)")]
    pub struct UnknownLanguage(pub String);

    #[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
    pub enum EngineError {
        #[error("a run is already in progress")]
        AlreadyRunning,
    }

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("failed to access config {}: {source}", path.display())]
        Io {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },
        #[error("invalid config {}: {source}", path.display())]
        Parse {
            path: PathBuf,
            #[source]
            source: serde_json::Error,
        },
    }
}
