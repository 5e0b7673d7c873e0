//! HTTP transport for the online answering core (C12 external interfaces,
//! spec §6). Generalises the teacher's `server.rs::create_router`: a single
//! `AppState`, `middleware::from_fn` layers for request-id and access
//! logging, `with_state` before the outermost CORS layer — except here
//! admission (rate limit, API key, origin) runs inside each handler rather
//! than as a separate `from_fn_with_state` layer, since a failed check must
//! produce the endpoint's own `ServiceError` response (401/403/429) instead
//! of a generic auth-middleware rejection.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::admission::{cors, Admission};
use crate::answer::AnswerService;
use crate::config::Config;
use crate::logging::middleware::{access_log_middleware, request_id_middleware};
use crate::models::{ChatRequest, HealthEnvironment, HealthResponse};

#[derive(Clone)]
pub struct AppState {
    pub answer_service: Arc<AnswerService>,
    pub admission: Admission,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let admission = Admission::new(config.admission.clone(), config.production);
        let answer_service = Arc::new(AnswerService::new(&config));
        Self { answer_service, admission, config: Arc::new(config) }
    }
}

async fn chat(
    State(state): State<AppState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    headers: axum::http::HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Response {
    if let Err(err) = state.admission.check_chat(&headers, Some(remote)) {
        return err.into_response();
    }
    match state.answer_service.answer(&request).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn health(
    State(state): State<AppState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    headers: axum::http::HeaderMap,
) -> Response {
    if let Err(err) = state.admission.check_health(&headers, Some(remote)) {
        return err.into_response();
    }

    let config = &state.config;
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        environment: HealthEnvironment {
            production: config.production,
            embedding_provider: config.embedding.provider.clone(),
            vector_provider: config.vector.provider.clone(),
            llm_provider: config.llm.provider.clone(),
            tts_configured: config.tts.api_key.is_some(),
        },
        vector_db: config.vector.provider.clone(),
    })
    .into_response()
}

async fn preflight(headers: axum::http::HeaderMap) -> Response {
    cors::preflight_response(headers.get("origin").and_then(|v| v.to_str().ok()))
}

/// Reflect the caller's `Origin` on every response, not just preflight, so
/// a browser reading a successful `/chat` or `/health` reply isn't blocked
/// by a same-origin-only default.
async fn cors_headers_middleware(req: Request<Body>, next: Next) -> Response {
    let origin = req.headers().get("origin").and_then(|v| v.to_str().ok()).map(str::to_string);
    let mut response = next.run(req).await;
    let allow_origin = origin.unwrap_or_else(|| "*".to_string());
    if let Ok(value) = HeaderValue::from_str(&allow_origin) {
        response.headers_mut().insert("Access-Control-Allow-Origin", value);
    }
    response
}

pub fn create_router(state: AppState) -> Router<()> {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/chat", post(chat).options(preflight))
        .route("/health", get(health).options(preflight))
        .layer(middleware::from_fn(access_log_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(middleware::from_fn(cors_headers_middleware))
        .with_state(state)
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body as AxumBody;
    use axum::http::{Request as HttpRequest, StatusCode};
    use tower::ServiceExt;

    fn config() -> Config {
        Config {
            embedding: crate::config::EmbeddingConfig {
                provider: "huggingface".into(),
                model: "multilingual-e5-base".into(),
                huggingface_api_key: None,
                openai_api_key: None,
            },
            vector: crate::config::VectorConfig {
                provider: "pinecone".into(),
                index_name: "transcripts".into(),
                namespace: "default".into(),
                pinecone_api_key: None,
                upstash_url: None,
                upstash_token: None,
            },
            llm: crate::config::LlmConfig {
                provider: "openai".into(),
                model: "gpt-4o-mini".into(),
                temperature: 0.8,
                max_tokens: 600,
                openai_api_key: None,
                openrouter_api_key: None,
            },
            tts: crate::config::TtsConfig { api_key: None, voice_id: "v".into(), model_id: "m".into() },
            admission: crate::config::AdmissionConfig {
                api_keys: vec![],
                allowed_origins: vec![],
                chat_rate_limit_window_secs: 60,
                chat_rate_limit_max: 10,
                health_rate_limit_window_secs: 60,
                health_rate_limit_max: 30,
            },
            pipeline: crate::config::PipelineConfig::default(),
            production: false,
        }
    }

    fn router() -> Router<()> {
        create_router(AppState::new(config()))
    }

    fn with_remote(req: axum::http::request::Builder) -> HttpRequest<AxumBody> {
        req.extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 9000))))
            .body(AxumBody::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_returns_200_with_environment_snapshot() {
        let request = with_remote(HttpRequest::builder().uri("/health").method("GET"));
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn chat_preflight_returns_cors_headers() {
        let request = with_remote(
            HttpRequest::builder()
                .uri("/chat")
                .method("OPTIONS")
                .header("origin", "https://example.com"),
        );
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Access-Control-Allow-Origin").unwrap(),
            "https://example.com"
        );
    }

    #[tokio::test]
    async fn chat_without_body_is_rejected_before_reaching_the_service() {
        let request = HttpRequest::builder()
            .uri("/chat")
            .method("POST")
            .header("content-type", "application/json")
            .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 9000))))
            .body(AxumBody::from("not json"))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn health_rate_limit_exhausts_and_returns_429() {
        let router = router();
        for _ in 0..30 {
            let request = with_remote(HttpRequest::builder().uri("/health").method("GET"));
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        let request = with_remote(HttpRequest::builder().uri("/health").method("GET"));
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
