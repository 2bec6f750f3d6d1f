use std::{fs::File, path::PathBuf, sync::Arc};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{prelude::*, util::SubscriberInitExt};

use crate::error::{Result, RoutingError};

/// Installs the global subscriber used by hosts that want router diagnostics.
#[derive(Clone, Debug)]
pub struct LibTracer {
    level: LevelFilter,
    log_file: Option<PathBuf>,
}

impl Default for LibTracer {
    fn default() -> Self {
        LibTracer {
            level: LevelFilter::INFO,
            log_file: None,
        }
    }
}

impl LibTracer {
    pub fn new(level: LevelFilter) -> Self {
        LibTracer { level, log_file: None }
    }

    /// Additionally log every event, unfiltered, to `path`.
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn install(self) -> Result<()> {
        let stdout_log = tracing_subscriber::fmt::layer().pretty();

        let debug_log = match &self.log_file {
            Some(path) => {
                let file = File::create(path).map_err(|source| RoutingError::LogFile {
                    path: path.clone(),
                    source,
                })?;
                Some(tracing_subscriber::fmt::layer().with_writer(Arc::new(file)))
            }
            None => None,
        };

        tracing_subscriber::registry()
            .with(stdout_log.with_filter(self.level).and_then(debug_log))
            .try_init()?;
        Ok(())
    }
}
