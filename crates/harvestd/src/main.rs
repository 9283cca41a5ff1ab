use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use futures::{SinkExt, StreamExt};
use harvest_core::config::{ConfigError, SimulationConfig};
use harvest_core::driver::Driver;
use harvest_core::generate_checked;
use harvest_core::io::frame::make_frame;
use harvest_core::io::scenario::Scenario;
use harvest_core::presets::{catalog, ClimatePreset, CropPreset};
use harvest_core::reduce::summarize;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "harvestd", about = "Climate and harvest streaming daemon")]
struct Args {
    /// Address to bind (defaults to 127.0.0.1).
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8787)]
    port: u16,

    /// Milliseconds to sleep between streamed days.
    #[arg(long, default_value_t = 250u64)]
    tick_ms: u64,
}

#[derive(Clone)]
struct AppState {
    tick: Duration,
}

/// Query string accepted by `/stream`.
#[derive(Debug, Default, Deserialize)]
struct StreamQuery {
    climate: Option<ClimatePreset>,
    crop: Option<CropPreset>,
    seed: Option<f64>,
    years: Option<u32>,
}

impl StreamQuery {
    fn into_config(self) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        if let Some(preset) = self.climate {
            config = config.with_climate(preset);
        }
        if let Some(preset) = self.crop {
            config = config.with_crop(preset);
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(years) = self.years {
            config.year_count = years;
        }
        config
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/presets", get(presets_handler))
        .route("/generate", post(generate_handler))
        .route("/stream", get(ws_handler))
        .with_state(state)
}

fn reject(err: ConfigError) -> Response {
    warn!(%err, "rejected configuration");
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}

async fn presets_handler() -> impl IntoResponse {
    Json(catalog())
}

async fn generate_handler(Json(scenario): Json<Scenario>) -> Response {
    let config = scenario.build_config();
    let checked = tokio::task::spawn_blocking(move || generate_checked(&config)).await;
    let (generation, warnings) = match checked {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => return reject(err),
        Err(err) => {
            error!(?err, scenario = %scenario.name, "generation task failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    for warning in &warnings {
        warn!(scenario = %scenario.name, %warning, "scenario validation");
    }
    let summary = summarize(&generation);
    info!(scenario = %scenario.name, days = summary.days, "generated");
    Json(json!({
        "ledgers": generation.ledgers,
        "summary": summary,
        "chronicle": generation.chronicle,
        "warnings": warnings,
    }))
    .into_response()
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Response {
    let config = query.into_config();
    match config.validate() {
        Ok(warnings) => {
            for warning in &warnings {
                warn!(%warning, "stream validation");
            }
        }
        Err(err) => return reject(err),
    }
    ws.on_upgrade(move |socket| stream_days(socket, config, state.tick))
}

async fn stream_days(socket: WebSocket, config: SimulationConfig, tick: Duration) {
    let (mut sender, mut receiver) = socket.split();
    let mut driver = Driver::new(config);

    while let Some(outcome) = driver.next_day() {
        for entry in &outcome.chronicle {
            info!(target: "chronicle", code = %entry.code, day = entry.day_index, note = ?entry.note);
        }
        let line = match make_frame(outcome).to_ndjson() {
            Ok(line) => line,
            Err(err) => {
                error!(?err, "frame serialization failed");
                return;
            }
        };
        if sender.send(Message::Text(line)).await.is_err() {
            info!("websocket client disconnected");
            return;
        }

        let pause = sleep(tick);
        tokio::pin!(pause);
        loop {
            tokio::select! {
                _ = &mut pause => break,
                message = receiver.next() => match message {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => {
                        info!(day = driver.day(), "websocket client closed stream");
                        return;
                    }
                    Some(Ok(_)) => {}
                },
            }
        }
    }

    info!(days = driver.total_days(), "stream complete");
    let _ = sender.send(Message::Close(None)).await;
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(?err, "failed to listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args = Args::parse();
    let state = AppState {
        tick: Duration::from_millis(args.tick_ms),
    };

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.bind, args.port))?;

    info!(%addr, tick_ms = args.tick_ms, "starting harvestd");
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use clap::error::ErrorKind;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState {
            tick: Duration::from_millis(0),
        })
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    fn post_generate(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .expect("request builds")
    }

    #[test]
    fn defaults_parse() {
        let args = Args::try_parse_from(["harvestd"]).expect("defaults parse");
        assert_eq!(args.bind, "127.0.0.1");
        assert_eq!(args.port, 8787);
        assert_eq!(args.tick_ms, 250);
    }

    #[test]
    fn rejects_non_numeric_port() {
        let err = Args::try_parse_from(["harvestd", "--port", "north"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn stream_query_applies_presets() {
        let query = StreamQuery {
            climate: Some(ClimatePreset::Tropical),
            crop: Some(CropPreset::Rice),
            seed: Some(2.25),
            years: Some(2),
        };
        let config = query.into_config();
        assert_eq!(config.season_table, ClimatePreset::Tropical.season_table());
        assert_eq!(config.crop, CropPreset::Rice.parameters());
        assert_eq!(config.seed, 2.25);
        assert_eq!(config.year_count, 2);
        assert_eq!(
            StreamQuery::default().into_config(),
            SimulationConfig::default()
        );
    }

    #[tokio::test]
    async fn presets_lists_catalog() {
        let response = app()
            .oneshot(Request::get("/presets").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["climates"].as_array().map(Vec::len), Some(5));
        assert_eq!(body["crops"].as_array().map(Vec::len), Some(10));
    }

    #[tokio::test]
    async fn generate_returns_ledgers_and_summary() {
        let response = app()
            .oneshot(post_generate(
                r#"{"name": "one year", "climate": "arctic", "year_count": 1}"#,
            ))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ledgers"]["climate"].as_array().map(Vec::len), Some(365));
        assert_eq!(body["ledgers"]["food"].as_array().map(Vec::len), Some(730));
        assert_eq!(body["summary"]["days"], 365);
        assert!(body["warnings"].as_array().is_some_and(Vec::is_empty));
    }

    #[tokio::test]
    async fn generate_rejects_invalid_config() {
        let response = app()
            .oneshot(post_generate(r#"{"name": "empty", "year_count": 0}"#))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));
    }

    #[tokio::test]
    async fn generate_rejects_unbounded_year_count() {
        let response = app()
            .oneshot(post_generate(
                r#"{"name": "forever", "year_count": 4294967295}"#,
            ))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .is_some_and(|msg| msg.contains("exceeds the limit")));
    }

    #[tokio::test]
    async fn generate_rejects_unknown_fields() {
        let response = app()
            .oneshot(post_generate(r#"{"name": "x", "rainfall": 4}"#))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
