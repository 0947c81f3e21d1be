use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use canvas::{app, logging::Logger, models::Health};
use http_body_util::BodyExt as _;
use tower::ServiceExt;

async fn read_body(response: axum::response::Response) -> Result<Vec<u8>> {
    let collected = response.into_body().collect().await?;
    Ok(collected.to_bytes().to_vec())
}

#[tokio::test]
async fn health_returns_ok() -> Result<()> {
    let app = app(&Logger::nop());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    let body = read_body(response).await?;
    let health: Health = serde_json::from_slice(&body)?;

    assert_eq!(health, Health::ok());

    Ok(())
}

#[tokio::test]
async fn health_rejects_other_methods() -> Result<()> {
    let app = app(&Logger::nop().with_release("test"));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await?;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}

#[tokio::test]
async fn unknown_route_returns_not_found() -> Result<()> {
    let app = app(&Logger::nop());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}
