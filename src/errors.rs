use std::{io, time::Duration};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid RUST_LOG directives: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("could not install logger: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("server did not stop within {0:?}")]
    StopTimeout(Duration),

    #[error("task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_display_names_address() {
        let error = ServerError::Bind {
            address: "localhost:8080".to_string(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        };
        let display = format!("{}", error);

        assert!(display.contains("localhost:8080"));
        assert!(display.contains("address in use"));
    }

    #[test]
    fn test_stop_timeout_display() {
        let error = ServerError::StopTimeout(Duration::from_secs(35));
        assert_eq!(format!("{}", error), "server did not stop within 35s");
    }
}
