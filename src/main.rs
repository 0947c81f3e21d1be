use std::sync::Arc;

use canvas::{
    config::{Config, DEFAULT_PORT},
    errors::ServerError,
    logging::{create_logger, Logger},
    server::{Options, Server},
    shutdown::{cancel_on_signal, coordinate_shutdown, exit_code, ShutdownSignals, EXIT_FAILURE},
    RELEASE,
};
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn, Instrument};

fn main() {
    std::process::exit(start());
}

#[tokio::main]
async fn start() -> i32 {
    let config = Config::from_env().unwrap_or_else(|err| {
        println!("Error reading configuration: {}", err);
        Config::default()
    });

    let log = create_logger(&config.log_env)
        .unwrap_or_else(|err| {
            println!("Error setting up the logger: {}", err);
            Logger::nop()
        })
        .with_release(RELEASE);

    let span = log.span().clone();
    run(config, log).instrument(span).await
}

async fn run(config: Config, log: Logger) -> i32 {
    if let Some(port) = &config.rejected_port {
        warn!(port = %port, default = DEFAULT_PORT, "Ignoring invalid PORT");
    }

    let signals = match ShutdownSignals::install() {
        Ok(signals) => signals,
        Err(err) => {
            error!(error = %err, "Error installing signal handlers");
            return EXIT_FAILURE;
        }
    };

    let server = Arc::new(Server::new(Options {
        host: config.host,
        port: config.port,
        log,
    }));
    let shutdown = CancellationToken::new();

    let signal_listener =
        tokio::spawn(cancel_on_signal(signals, shutdown.clone()).in_current_span());

    let serving = tokio::spawn({
        let server = server.clone();
        let shutdown = shutdown.clone();
        async move {
            let result = server.start().await;
            if let Err(err) = &result {
                error!(error = %err, "Error starting server");
            }
            shutdown.cancel();
            result
        }
        .in_current_span()
    });

    let coordinator = tokio::spawn({
        let server = server.clone();
        async move { coordinate_shutdown(server.as_ref(), shutdown).await }.in_current_span()
    });

    let stopped = joined(coordinator.await);
    let served = joined(serving.await);
    signal_listener.await.ok();

    let code = exit_code(&served.and(stopped));
    info!(code, "Exiting");
    code
}

fn joined(result: Result<Result<(), ServerError>, JoinError>) -> Result<(), ServerError> {
    result?
}
