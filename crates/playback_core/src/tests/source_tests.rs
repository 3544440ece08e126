use super::*;
use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use tokio::net::TcpListener;

async fn spawn_generate_server(app: Router) -> Result<Url> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(Url::parse(&format!("http://{addr}/generate"))?)
}

async fn handle_generate(Query(query): Query<GenerateQuery>) -> Json<GenerateResponse> {
    Json(GenerateResponse {
        array: (1..=query.size as u32).rev().collect(),
    })
}

// Mirrors a server that ignores sizes it dislikes and answers with 20.
async fn handle_generate_default_size() -> Json<GenerateResponse> {
    Json(GenerateResponse {
        array: vec![7; 20],
    })
}

#[tokio::test]
async fn remote_source_sends_size_query() {
    let endpoint = spawn_generate_server(Router::new().route("/generate", get(handle_generate)))
        .await
        .expect("spawn server");
    let source = RemoteArraySource::new(endpoint);

    let array = source.generate(6).await.expect("generate");

    assert_eq!(array, vec![6, 5, 4, 3, 2, 1]);
}

#[tokio::test]
async fn remote_source_rejects_arrays_of_the_wrong_length() {
    let endpoint = spawn_generate_server(
        Router::new().route("/generate", get(handle_generate_default_size)),
    )
    .await
    .expect("spawn server");
    let source = RemoteArraySource::new(endpoint);

    let err = source.generate(7).await.expect_err("must fail");

    assert!(err.to_string().contains("requested 7"), "{err:#}");
}

#[tokio::test]
async fn remote_source_surfaces_error_statuses() {
    let endpoint = spawn_generate_server(Router::new().route(
        "/generate",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    ))
    .await
    .expect("spawn server");
    let source = RemoteArraySource::new(endpoint);

    let err = source.generate(5).await.expect_err("must fail");

    assert!(format!("{err:#}").contains("503"), "{err:#}");
}

#[tokio::test]
async fn local_source_draws_values_in_range() {
    let array = LocalArraySource.generate(50).await.expect("generate");

    assert_eq!(array.len(), 50);
    assert!(array
        .iter()
        .all(|value| (MIN_ARRAY_VALUE..=MAX_ARRAY_VALUE).contains(value)));
}
