//! Integration coverage for C14 admission wired through the real HTTP
//! router: production-mode API key and allowed-origin enforcement, and that
//! `/chat` and `/health` maintain independent rate-limit quotas end to end.
//! `src/answer/router.rs`'s own inline tests cover wiring/CORS; this file
//! exercises the admission decisions themselves through the public surface.

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use kotoba_rag::answer::{create_router, AppState};
use kotoba_rag::config::{AdmissionConfig, Config, EmbeddingConfig, LlmConfig, PipelineConfig, TtsConfig, VectorConfig};

fn base_config() -> Config {
    Config {
        embedding: EmbeddingConfig {
            provider: "huggingface".into(),
            model: "multilingual-e5-base".into(),
            huggingface_api_key: None,
            openai_api_key: None,
        },
        vector: VectorConfig {
            provider: "pinecone".into(),
            index_name: "transcripts".into(),
            namespace: "default".into(),
            pinecone_api_key: None,
            upstash_url: None,
            upstash_token: None,
        },
        llm: LlmConfig {
            provider: "openai".into(),
            model: "gpt-4o-mini".into(),
            temperature: 0.8,
            max_tokens: 600,
            openai_api_key: None,
            openrouter_api_key: None,
        },
        tts: TtsConfig { api_key: None, voice_id: "v".into(), model_id: "m".into() },
        admission: AdmissionConfig {
            api_keys: vec![],
            allowed_origins: vec![],
            chat_rate_limit_window_secs: 60,
            chat_rate_limit_max: 5,
            health_rate_limit_window_secs: 60,
            health_rate_limit_max: 5,
        },
        pipeline: PipelineConfig::default(),
        production: false,
    }
}

fn remote(addr: [u8; 4]) -> ConnectInfo<SocketAddr> {
    ConnectInfo(SocketAddr::from((addr, 9000)))
}

#[tokio::test]
async fn production_without_api_keys_rejects_chat_with_401() {
    let mut config = base_config();
    config.production = true;
    let router = create_router(AppState::new(config));

    let request = Request::post("/chat")
        .header("content-type", "application/json")
        .extension(remote([10, 0, 0, 1]))
        .body(Body::from("{\"message\":\"hello\"}"))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn production_with_disallowed_origin_rejects_chat_with_403() {
    let mut config = base_config();
    config.production = true;
    config.admission.api_keys = vec!["secret-key".to_string()];
    config.admission.allowed_origins = vec!["https://allowed.example".to_string()];
    let router = create_router(AppState::new(config));

    let request = Request::post("/chat")
        .header("content-type", "application/json")
        .header("x-api-key", "secret-key")
        .header("origin", "https://evil.example")
        .extension(remote([10, 0, 0, 2]))
        .body(Body::from("{\"message\":\"hello\"}"))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn chat_and_health_rate_limits_are_tracked_independently() {
    let router = create_router(AppState::new(base_config()));

    for _ in 0..5 {
        let request = Request::get("/health").extension(remote([10, 0, 0, 3])).body(Body::empty()).unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    let exhausted = Request::get("/health").extension(remote([10, 0, 0, 3])).body(Body::empty()).unwrap();
    let response = router.clone().oneshot(exhausted).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // /chat from the same client IP is unaffected by /health's exhausted quota;
    // it fails for an unrelated reason (no embedding credentials configured),
    // proving the admission check ran rather than being rejected by rate limit.
    let chat_request = Request::post("/chat")
        .header("content-type", "application/json")
        .extension(remote([10, 0, 0, 3]))
        .body(Body::from("{\"message\":\"黄金率とは何ですか？\"}"))
        .unwrap();
    let response = router.oneshot(chat_request).await.unwrap();
    assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
