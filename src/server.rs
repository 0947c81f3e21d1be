use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::sync::watch;
use tracing::{info, Instrument};

use crate::{errors::ServerError, logging::Logger};

/// How long in-flight connections get to drain once a stop is requested.
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(30);

const STOP_MARGIN: Duration = Duration::from_secs(5);

pub struct Options {
    pub host: String,
    pub port: u16,
    pub log: Logger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Serving,
    Stopped,
}

pub struct Server {
    address: String,
    log: Logger,
    handle: Handle<SocketAddr>,
    state: watch::Sender<State>,
}

impl Server {
    pub fn new(options: Options) -> Self {
        Self {
            address: socket_address(&options.host, options.port),
            log: options.log,
            handle: Handle::new(),
            state: watch::Sender::new(State::Idle),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Binds the configured address and serves until [`Server::stop`] is called.
    pub async fn start(&self) -> Result<(), ServerError> {
        self.state.send_replace(State::Serving);
        let result = self.serve().instrument(self.log.span().clone()).await;
        self.state.send_replace(State::Stopped);
        result
    }

    async fn serve(&self) -> Result<(), ServerError> {
        info!(address = %self.address, "Starting server");

        let listener = tokio::net::TcpListener::bind(&self.address)
            .await
            .map_err(|source| ServerError::Bind {
                address: self.address.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;
        let std_listener = listener.into_std()?;

        info!(address = %local_addr, "Listening");

        axum_server::from_tcp(std_listener)
            .map_err(std::io::Error::other)?
            .handle(self.handle.clone())
            .serve(crate::app(&self.log).into_make_service())
            .await?;

        info!("Server stopped serving");
        Ok(())
    }

    /// Requests a graceful shutdown and waits for the listener to close.
    ///
    /// Returns immediately when the server was never started.
    pub async fn stop(&self) -> Result<(), ServerError> {
        let mut state = self.state.subscribe();

        async {
            info!("Stopping server");
            self.handle.graceful_shutdown(Some(SHUTDOWN_GRACE_PERIOD));

            if *state.borrow() == State::Idle {
                return Ok(());
            }

            let limit = SHUTDOWN_GRACE_PERIOD + STOP_MARGIN;
            let stopped = tokio::time::timeout(limit, state.wait_for(|s| *s == State::Stopped))
                .await
                .is_ok();
            if !stopped {
                return Err(ServerError::StopTimeout(limit));
            }

            info!("Stopped server");
            Ok(())
        }
        .instrument(self.log.span().clone())
        .await
    }

    /// The bound address, once the server is listening.
    ///
    /// Waits for [`Server::start`] to bind; returns `None` if the server
    /// shut down without ever listening.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.handle.listening().await
    }
}

fn socket_address(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}
