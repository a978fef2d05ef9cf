use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The graph description is not valid input for the DOT subset we accept.
    #[error("syntax error at line {line}, column {column}: unexpected `{context}`")]
    Parse {
        line: usize,
        column: usize,
        context: String,
    },

    #[error("start node `{reference}` matches no node id or label")]
    StartNodeNotFound { reference: String },

    #[error("invalid value `{value}` for {option} (expected {expected})")]
    InvalidOption {
        option: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode view data: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_option(option: &'static str, value: impl Into<String>, expected: &'static str) -> Self {
        Error::InvalidOption {
            option,
            value: value.into(),
            expected,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
