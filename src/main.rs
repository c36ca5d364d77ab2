mod citations;
mod conversation;
mod error_code;
mod llm;
mod persona;
mod rate_limit;
mod routes;
mod services;
mod sessions;
mod state;

use std::sync::Arc;

use llm::LlmChat;
use llm::types::GenerationOptions;

/// Parse an env var, falling back to `default` when unset or malformed.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let persona = persona::Persona::from_env().expect("persona load failed");

    // Initialize LLM client (non-fatal: every turn answers with the failure text if config missing).
    let (llm, options): (Option<Arc<dyn LlmChat>>, GenerationOptions) = match llm::LlmClient::from_env() {
        Ok(client) => {
            let options = client.options();
            tracing::info!(
                model = client.model(),
                temperature = options.temperature,
                web_search = options.web_search,
                "LLM client initialized"
            );
            (Some(Arc::new(client)), options)
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured, chat replies disabled");
            (None, GenerationOptions::default())
        }
    };

    let sessions = sessions::SessionStore::new(sessions::SessionConfig::from_env());
    let state = state::AppState::new(persona, sessions, llm, options, rate_limit::RateLimiter::new());

    // Spawn background expiry task.
    let _expiry = services::expiry::spawn_expiry_task(state.clone());

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "article-guide listening");
    axum::serve(listener, app).await.expect("server failed");
}
