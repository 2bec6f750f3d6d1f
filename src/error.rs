use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("invalid routing config: `{field}` {reason}")]
    InvalidConfig { field: &'static str, reason: &'static str },
    #[error("failed to parse routing config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("failed to serialize routing trace: {0}")]
    TraceSerialize(#[source] serde_json::Error),
    #[error("failed to write routing trace to {}: {source}", path.display())]
    TraceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),
}

pub type Result<T> = std::result::Result<T, RoutingError>;
