//! Logger construction.
//!
//! `LOG_ENV` picks one of three profiles. `production` writes JSON lines at
//! `info`, `development` writes human-readable lines with source locations at
//! `debug`, and anything else discards all output. `RUST_LOG` overrides the
//! profile's level when set.
//!
//! Output goes through a non-blocking stdout writer. Its buffer is flushed
//! when the last [`Logger`] handle is dropped.

use std::{io::IsTerminal, sync::Arc};

use tracing::Span;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::LoggerError;

const PRODUCTION_DIRECTIVES: &str = "info";
const DEVELOPMENT_DIRECTIVES: &str = "canvas=debug,tower_http=debug,info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogProfile {
    Production,
    Development,
    Nop,
}

impl LogProfile {
    pub fn from_env_name(name: &str) -> Self {
        match name {
            "production" => LogProfile::Production,
            "development" => LogProfile::Development,
            _ => LogProfile::Nop,
        }
    }
}

/// Handle to the process logger.
///
/// Cloning is cheap. Components instrument their work with [`Logger::span`]
/// so every event carries the fields attached with [`Logger::with_release`].
#[derive(Clone)]
pub struct Logger {
    profile: LogProfile,
    span: Span,
    _guard: Option<Arc<WorkerGuard>>,
}

impl Logger {
    pub fn nop() -> Self {
        Self {
            profile: LogProfile::Nop,
            span: Span::none(),
            _guard: None,
        }
    }

    pub fn profile(&self) -> LogProfile {
        self.profile
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn with_release(self, release: &str) -> Self {
        let span = tracing::info_span!(parent: &self.span, "canvas", release = %release);
        Self { span, ..self }
    }
}

pub fn create_logger(env: &str) -> Result<Logger, LoggerError> {
    let profile = LogProfile::from_env_name(env);

    let directives = match profile {
        LogProfile::Production => PRODUCTION_DIRECTIVES,
        LogProfile::Development => DEVELOPMENT_DIRECTIVES,
        LogProfile::Nop => return Ok(Logger::nop()),
    };
    let filter = env_filter(directives)?;

    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    match profile {
        LogProfile::Production => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(writer))
            .try_init()?,
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(std::io::stdout().is_terminal())
                    .with_writer(writer),
            )
            .try_init()?,
    }

    Ok(Logger {
        profile,
        span: Span::none(),
        _guard: Some(Arc::new(guard)),
    })
}

fn env_filter(default_directives: &str) -> Result<EnvFilter, LoggerError> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => Ok(EnvFilter::try_new(directives)?),
        Err(_) => Ok(EnvFilter::new(default_directives)),
    }
}
