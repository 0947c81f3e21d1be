use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use canvas::{
    logging::Logger,
    models::Health,
    server::{Options, Server},
    shutdown::{coordinate_shutdown, exit_code},
};
use tokio_util::sync::CancellationToken;

fn local_server() -> Arc<Server> {
    Arc::new(Server::new(Options {
        host: "127.0.0.1".to_string(),
        port: 0,
        log: Logger::nop(),
    }))
}

#[tokio::test]
async fn serves_health_until_stopped() -> Result<()> {
    let server = local_server();
    let serving = tokio::spawn({
        let server = server.clone();
        async move { server.start().await }
    });

    let addr = server
        .local_addr()
        .await
        .context("server never started listening")?;

    let response = reqwest::get(format!("http://{}/health", addr)).await?;
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let health: Health = response.json().await?;
    assert_eq!(health.status, "ok");

    server.stop().await?;
    tokio::time::timeout(Duration::from_secs(5), serving).await???;

    assert!(reqwest::get(format!("http://{}/health", addr)).await.is_err());

    Ok(())
}

#[tokio::test]
async fn stop_twice_is_harmless() -> Result<()> {
    let server = local_server();
    let serving = tokio::spawn({
        let server = server.clone();
        async move { server.start().await }
    });
    server
        .local_addr()
        .await
        .context("server never started listening")?;

    server.stop().await?;
    server.stop().await?;
    serving.await??;

    Ok(())
}

#[tokio::test]
async fn cancellation_stops_running_server() -> Result<()> {
    let server = local_server();
    let shutdown = CancellationToken::new();

    let serving = tokio::spawn({
        let server = server.clone();
        async move { server.start().await }
    });
    let coordinator = tokio::spawn({
        let server = server.clone();
        let shutdown = shutdown.clone();
        async move { coordinate_shutdown(server.as_ref(), shutdown).await }
    });

    server
        .local_addr()
        .await
        .context("server never started listening")?;
    assert!(!coordinator.is_finished());

    shutdown.cancel();

    let stopped = coordinator.await?;
    assert_eq!(exit_code(&stopped), 0);
    serving.await??;

    Ok(())
}
