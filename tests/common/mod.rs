//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Bytes},
    extract::Request,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;

use cep_weather::config::{Hop, ServiceConfig};
use cep_weather::http::HttpServer;
use cep_weather::lifecycle::Shutdown;

/// What a mock upstream saw for one request.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A programmable upstream on an ephemeral port.
pub struct MockUpstream {
    pub addr: SocketAddr,
    hits: Arc<AtomicU32>,
    last: Arc<Mutex<Option<Seen>>>,
}

impl MockUpstream {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<Seen> {
        self.last.lock().unwrap().clone()
    }
}

/// Start a mock upstream whose every response comes from `f`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> MockUpstream
where
    F: Fn(Seen) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let hits = Arc::new(AtomicU32::new(0));
    let last = Arc::new(Mutex::new(None));
    let f = Arc::new(f);

    let app = {
        let hits = hits.clone();
        let last = last.clone();
        Router::new().fallback(move |request: Request| {
            let hits = hits.clone();
            let last = last.clone();
            let f = f.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                let (parts, body) = request.into_parts();
                let seen = Seen {
                    method: parts.method.to_string(),
                    path: parts.uri.path().to_owned(),
                    query: parts.uri.query().unwrap_or_default().to_owned(),
                    headers: parts.headers,
                    body: to_bytes(body, usize::MAX).await.unwrap_or_default(),
                };
                *last.lock().unwrap() = Some(seen.clone());

                let (status, body) = f(seen).await;
                (
                    StatusCode::from_u16(status).unwrap(),
                    [("content-type", "application/json")],
                    body,
                )
                    .into_response()
            }
        })
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, hits, last }
}

/// Start a mock upstream that always answers `status` with `body`.
pub async fn start_mock_backend(status: u16, body: &'static str) -> MockUpstream {
    start_programmable_backend(move |_| async move { (status, body.to_owned()) }).await
}

/// ViaCEP stand-in: `01001000` is São Paulo, everything else is a miss.
pub async fn start_mock_viacep() -> MockUpstream {
    start_programmable_backend(|seen| async move {
        if seen.path == "/ws/01001000/json/" {
            (
                200,
                concat!(
                    r#"{"cep":"01001-000","logradouro":"Praça da Sé","#,
                    r#""localidade":"São Paulo","uf":"SP"}"#
                )
                .to_owned(),
            )
        } else {
            (200, r#"{"erro": true}"#.to_owned())
        }
    })
    .await
}

/// WeatherAPI stand-in reporting 20.5 °C for any city.
pub async fn start_mock_weather() -> MockUpstream {
    start_mock_backend(
        200,
        r#"{"location":{"name":"Sao Paulo"},"current":{"temp_c":20.5,"temp_f":68.9}}"#,
    )
    .await
}

pub fn resolver_config(
    viacep: &MockUpstream,
    weather: &MockUpstream,
    key: Option<&str>,
) -> ServiceConfig {
    let mut config = ServiceConfig::for_hop(Hop::Resolver);
    config.upstreams.viacep_url = viacep.url("/ws/{cep}/json/");
    config.upstreams.weather_api_url = weather.url("/v1/current.json");
    config.upstreams.weather_api_key = key.map(str::to_owned);
    config.upstreams.system_proxy = false;
    config.observability.tracing_enabled = false;
    config
}

pub fn gateway_config(service_b_url: &str) -> ServiceConfig {
    let mut config = ServiceConfig::for_hop(Hop::Gateway);
    config.upstreams.service_b_url = service_b_url.to_owned();
    config.upstreams.system_proxy = false;
    config.observability.tracing_enabled = false;
    config
}

/// A running hop; shuts down when dropped.
pub struct RunningService {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_service(config: ServiceConfig, hop: Hop) -> RunningService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, hop).unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    RunningService { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
