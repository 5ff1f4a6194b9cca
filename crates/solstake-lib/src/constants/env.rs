//! Environment variable configuration for solstake services
//!
//! Every setting has a default so the crates work against mainnet without a
//! `.env` file. Values are read through `dotenvy` so a local `.env` wins over
//! nothing but loses to the real process environment.

use std::str::FromStr;
use std::time::Duration;

/// Loads `.env` from the working directory if one exists.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    dotenvy::var(key)
        .ok()
        .and_then(|s| T::from_str(s.trim()).ok())
        .unwrap_or(default)
}

/// Network endpoints
pub mod network {
    /// Solana JSON-RPC endpoint
    pub fn solana_rpc_url() -> String {
        dotenvy::var("SOLANA_RPC_URL")
            .unwrap_or_else(|_| "https://api.mainnet-beta.solana.com".to_string())
    }

    /// Sanctum API serving LST APYs
    pub fn sanctum_api_url() -> String {
        dotenvy::var("SANCTUM_API_URL")
            .unwrap_or_else(|_| "https://extra-api.sanctum.so".to_string())
    }

    /// Marinade public API
    pub fn marinade_api_url() -> String {
        dotenvy::var("MARINADE_API_URL")
            .unwrap_or_else(|_| "https://api.marinade.finance".to_string())
    }

    /// Solayer app API that builds restake transactions
    pub fn solayer_api_url() -> String {
        dotenvy::var("SOLAYER_API_URL").unwrap_or_else(|_| "https://app.solayer.org".to_string())
    }
}

/// Pool-data provider tuning
pub mod pool_data {
    use super::*;

    /// How long aggregated pool data stays fresh
    pub fn cache_ttl() -> Duration {
        Duration::from_secs(parsed_or("POOL_DATA_CACHE_TTL_SECONDS", 300))
    }

    /// Attempts per protocol before giving up on it
    pub fn max_retries() -> u32 {
        parsed_or("POOL_DATA_MAX_RETRIES", 3)
    }

    /// Fixed delay between attempts
    pub fn retry_delay() -> Duration {
        Duration::from_millis(parsed_or("POOL_DATA_RETRY_DELAY_MS", 1000))
    }
}

/// Timeout configuration
pub mod timeouts {
    use super::*;

    /// HTTP request timeout
    pub fn http_request() -> Duration {
        Duration::from_secs(parsed_or("HTTP_REQUEST_TIMEOUT_SECONDS", 30))
    }
}

/// LLM endpoint used for intent extraction
pub mod llm {
    /// Base URL of an OpenAI-compatible chat completions API
    pub fn api_url() -> String {
        dotenvy::var("LLM_API_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
    }

    /// API key, `None` disables LLM intent extraction
    pub fn api_key() -> Option<String> {
        dotenvy::var("LLM_API_KEY").ok().filter(|k| !k.trim().is_empty())
    }

    pub fn model() -> String {
        dotenvy::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string())
    }
}
