//! Fake ViaCEP and WeatherAPI endpoints for running both hops locally.
//!
//! ```text
//! cargo run --example mock_providers
//! VIACEP_URL=http://127.0.0.1:9000/ws/{cep}/json/ \
//! WEATHER_API_URL=http://127.0.0.1:9000/v1/current.json \
//! WEATHER_API_KEY=demo cargo run -- resolver
//! ```

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;

#[derive(Deserialize)]
struct WeatherQuery {
    key: Option<String>,
    q: String,
}

async fn viacep(Path(cep): Path<String>) -> Json<Value> {
    match cep.as_str() {
        "01001000" => Json(json!({"cep": "01001-000", "localidade": "São Paulo", "uf": "SP"})),
        "20040002" => Json(json!({"cep": "20040-002", "localidade": "Rio de Janeiro", "uf": "RJ"})),
        "88010400" => Json(json!({"cep": "88010-400", "localidade": "Florianópolis", "uf": "SC"})),
        _ => Json(json!({"erro": true})),
    }
}

async fn current(Query(query): Query<WeatherQuery>) -> (StatusCode, Json<Value>) {
    if query.key.as_deref().unwrap_or_default().is_empty() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": {"code": 1002, "message": "API key is invalid or not provided."}
            })),
        );
    }
    let temp_c = match query.q.as_str() {
        "Sao Paulo" => 20.5,
        "Rio de Janeiro" => 31.0,
        "Florianopolis" => 18.25,
        _ => 25.0,
    };
    (
        StatusCode::OK,
        Json(json!({"location": {"name": query.q}, "current": {"temp_c": temp_c}})),
    )
}

#[tokio::main]
async fn main() {
    let app = Router::new()
        .route("/ws/{cep}/json/", get(viacep))
        .route("/v1/current.json", get(current));

    let addr = SocketAddr::from(([127, 0, 0, 1], 9000));
    println!("Mock providers listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
