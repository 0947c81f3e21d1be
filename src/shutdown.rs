//! Signal-driven shutdown coordination.
//!
//! A [`CancellationToken`] is cancelled by the first SIGTERM or SIGINT (or by
//! the serving task when it fails). [`coordinate_shutdown`] waits on that token
//! and stops the server exactly once.

use std::{fmt, future::Future, io};

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{errors::ServerError, server::Server};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Terminate,
    Interrupt,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Terminate => write!(f, "SIGTERM"),
            Signal::Interrupt => write!(f, "SIGINT"),
        }
    }
}

/// Registered handlers for the termination signals.
///
/// Handlers are installed when this is constructed, so a signal delivered
/// afterwards is never lost even if nobody is awaiting [`ShutdownSignals::recv`] yet.
pub struct ShutdownSignals {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
}

impl ShutdownSignals {
    #[cfg(unix)]
    pub fn install() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
        })
    }

    #[cfg(not(unix))]
    pub fn install() -> io::Result<Self> {
        Ok(Self {})
    }

    #[cfg(unix)]
    pub async fn recv(&mut self) -> Signal {
        tokio::select! {
            _ = self.terminate.recv() => Signal::Terminate,
            _ = self.interrupt.recv() => Signal::Interrupt,
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> Signal {
        match tokio::signal::ctrl_c().await {
            Ok(()) => Signal::Interrupt,
            Err(_) => std::future::pending().await,
        }
    }
}

/// Cancels `shutdown` when the first signal arrives.
///
/// Returns early if the token is cancelled by someone else.
pub async fn cancel_on_signal(mut signals: ShutdownSignals, shutdown: CancellationToken) {
    tokio::select! {
        signal = signals.recv() => {
            info!(%signal, "Received shutdown signal");
            shutdown.cancel();
        }
        _ = shutdown.cancelled() => {}
    }
}

pub trait Stop {
    fn stop(&self) -> impl Future<Output = Result<(), ServerError>> + Send;
}

impl Stop for Server {
    fn stop(&self) -> impl Future<Output = Result<(), ServerError>> + Send {
        Server::stop(self)
    }
}

/// Waits for `shutdown` and then stops `server` once.
pub async fn coordinate_shutdown<S>(server: &S, shutdown: CancellationToken) -> Result<(), ServerError>
where
    S: Stop + ?Sized,
{
    shutdown.cancelled().await;

    if let Err(err) = server.stop().await {
        error!(error = %err, "Error stopping server");
        return Err(err);
    }

    Ok(())
}

pub fn exit_code<E>(result: &Result<(), E>) -> i32 {
    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}
