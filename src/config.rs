//! Environment-driven configuration
//!
//! Every knob has a default; env vars override. The binary calls
//! `dotenv::dotenv()` before `Config::from_env()`.

use std::env;
use std::time::Duration;

use crate::error::{HoneypotError, Result};

const DEFAULT_API_KEY: &str = "scam_hunter_2026_secure_key";
const DEFAULT_INTAKE_URL: &str = "https://hackathon.guvi.in/api/updateHoneyPotFinalResult";

#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port for the HTTP API.
    pub port: u16,
    /// Shared secret expected in the `x-api-key` header.
    pub api_key: String,
    /// Intake endpoint receiving the final intelligence report.
    pub intake_url: String,
    /// Hard timeout on the outbound callback request.
    pub callback_timeout: Duration,
    /// Minimum turn count before a scam-flagged session is reported.
    pub callback_turn_threshold: u32,
    /// Size of the callback worker pool.
    pub callback_workers: usize,
    /// Bounded depth of the dispatch queue.
    pub callback_queue_depth: usize,
    /// Evict sessions idle longer than this. `None` retains forever.
    pub session_ttl: Option<Duration>,
    /// Cap on suspiciousKeywords in the reported payload.
    pub max_reported_keywords: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .or_else(|_| env::var("API_PORT"))
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| HoneypotError::ConfigError(format!("invalid PORT: {}", e)))?;

        let api_key =
            env::var("HONEYPOT_API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string());

        let intake_url =
            env::var("INTAKE_CALLBACK_URL").unwrap_or_else(|_| DEFAULT_INTAKE_URL.to_string());

        let callback_timeout =
            Duration::from_secs(parse_env_u64("CALLBACK_TIMEOUT_SECS", 10)?);

        let callback_turn_threshold = parse_env_u64("CALLBACK_TURN_THRESHOLD", 3)? as u32;
        let callback_workers = parse_env_u64("CALLBACK_WORKERS", 4)? as usize;
        let callback_queue_depth = parse_env_u64("CALLBACK_QUEUE_DEPTH", 64)?.max(1) as usize;

        let session_ttl = match env::var("SESSION_TTL_SECS") {
            Ok(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| {
                    HoneypotError::ConfigError(format!("invalid SESSION_TTL_SECS: {}", e))
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        let max_reported_keywords = parse_env_u64("MAX_REPORTED_KEYWORDS", 10)? as usize;

        Ok(Self {
            port,
            api_key,
            intake_url,
            callback_timeout,
            callback_turn_threshold,
            callback_workers,
            callback_queue_depth,
            session_ttl,
            max_reported_keywords,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            api_key: DEFAULT_API_KEY.to_string(),
            intake_url: DEFAULT_INTAKE_URL.to_string(),
            callback_timeout: Duration::from_secs(10),
            callback_turn_threshold: 3,
            callback_workers: 4,
            callback_queue_depth: 64,
            session_ttl: None,
            max_reported_keywords: 10,
        }
    }
}

fn parse_env_u64(key: &str, default: u64) -> Result<u64> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| HoneypotError::ConfigError(format!("invalid {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}
