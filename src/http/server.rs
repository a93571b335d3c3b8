//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for one hop
//! - Wire up middleware (request id, tracing, timeout, metrics, CORS)
//! - Build the hop's core service from configuration
//! - Bind server to listener and stop on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{Hop, ServiceConfig, TimeoutConfig};
use crate::gateway::Forwarder;
use crate::http::handlers::{submit_cep, weather_by_body, weather_by_path};
use crate::http::middleware::{cors, track_requests};
use crate::http::request::{RecordResponse, RequestSpan, X_REQUEST_ID};
use crate::http::response::{method_not_allowed, not_found};
use crate::providers::{ViaCepClient, WeatherApiClient};
use crate::resilience::upstream_client;
use crate::resolve::WeatherResolver;

/// State injected into gateway handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub forwarder: Arc<Forwarder>,
}

/// State injected into resolver handlers.
#[derive(Clone)]
pub struct ResolverState {
    pub resolver: Arc<WeatherResolver>,
}

/// HTTP server for one hop of the pipeline.
pub struct HttpServer {
    router: Router,
    hop: Hop,
}

impl HttpServer {
    /// Build the server for `hop` from a validated configuration.
    pub fn new(config: &ServiceConfig, hop: Hop) -> Result<Self, reqwest::Error> {
        let http = upstream_client(&config.timeouts, config.upstreams.system_proxy)?;
        let shape = config.validation.shape_for(hop);

        let routes = match hop {
            Hop::Gateway => {
                let forwarder = Forwarder::new(http, &config.upstreams.service_b_url, shape);
                tracing::info!(service_b = %forwarder.weather_url(), %shape, "Gateway configured");
                Self::gateway_routes(GatewayState {
                    forwarder: Arc::new(forwarder),
                })
            }
            Hop::Resolver => {
                let location = ViaCepClient::new(http.clone(), config.upstreams.viacep_url.clone());
                let temperature = WeatherApiClient::new(
                    http,
                    config.upstreams.weather_api_url.clone(),
                    config.upstreams.weather_api_key.clone(),
                );
                if !temperature.has_credential() {
                    tracing::warn!("WEATHER_API_KEY not set; temperature lookups will fail");
                }
                tracing::info!(%shape, "Resolver configured");
                Self::resolver_routes(ResolverState {
                    resolver: Arc::new(WeatherResolver::new(
                        Arc::new(location),
                        Arc::new(temperature),
                        shape,
                    )),
                })
            }
        };

        Ok(Self::with_routes(hop, routes, &config.timeouts))
    }

    fn gateway_routes(state: GatewayState) -> Router {
        Router::new()
            .route("/cep", post(submit_cep).fallback(method_not_allowed))
            .with_state(state)
    }

    fn resolver_routes(state: ResolverState) -> Router {
        Router::new()
            .route(
                "/weather",
                get(weather_by_body)
                    .post(weather_by_body)
                    .fallback(method_not_allowed),
            )
            .route(
                "/weather/",
                get(weather_by_body)
                    .post(weather_by_body)
                    .fallback(method_not_allowed),
            )
            .route(
                "/weather/{cep}",
                get(weather_by_path)
                    .post(weather_by_body)
                    .fallback(method_not_allowed),
            )
            .with_state(state)
    }

    fn with_routes(hop: Hop, routes: Router, timeouts: &TimeoutConfig) -> Self {
        Self {
            router: Self::build_router(hop, routes, timeouts),
            hop,
        }
    }

    /// Wrap the hop's routes with all middleware layers.
    ///
    /// Requests flow outermost to innermost:
    /// `SetRequestId` → Trace → `PropagateRequestId` → Timeout → metrics → CORS → routes.
    #[allow(deprecated)]
    fn build_router(hop: Hop, routes: Router, timeouts: &TimeoutConfig) -> Router {
        routes
            .fallback(not_found)
            .layer(from_fn_with_state(hop, cors))
            .layer(from_fn_with_state(hop, track_requests))
            .layer(TimeoutLayer::new(Duration::from_secs(timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(RequestSpan::new(hop))
                    .on_response(RecordResponse),
            )
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    pub fn hop(&self) -> Hop {
        self.hop
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            hop = %self.hop,
            service = self.hop.service_name(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!(hop = %self.hop, "HTTP server stopped");
        Ok(())
    }
}
