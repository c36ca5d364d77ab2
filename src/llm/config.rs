//! LLM configuration parsed from environment variables.

use super::types::{GenerationOptions, LlmError};
use crate::env_parse;

pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub options: GenerationOptions,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Build typed LLM config from environment variables.
    ///
    /// Required:
    /// - the variable named by `LLM_API_KEY_ENV` (default `GEMINI_API_KEY`)
    ///
    /// Optional:
    /// - `LLM_MODEL`: default `gemini-3-flash-preview`
    /// - `LLM_BASE_URL`: default Generative Language API root
    /// - `LLM_TEMPERATURE`: default 0.3, range 0.0..=2.0
    /// - `LLM_MAX_OUTPUT_TOKENS`: unset means provider default
    /// - `LLM_WEB_SEARCH`: default true
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 120
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] when the key variable is unset or
    /// empty, and [`LlmError::ConfigParse`] for malformed optional values.
    pub fn from_env() -> Result<Self, LlmError> {
        let key_var = std::env::var("LLM_API_KEY_ENV").unwrap_or_else(|_| DEFAULT_API_KEY_ENV.to_string());
        let api_key = std::env::var(&key_var)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey { var: key_var.clone() })?;

        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let options = GenerationOptions {
            temperature: parse_temperature(std::env::var("LLM_TEMPERATURE").ok().as_deref())?,
            max_output_tokens: parse_max_output_tokens(std::env::var("LLM_MAX_OUTPUT_TOKENS").ok().as_deref())?,
            web_search: parse_bool("LLM_WEB_SEARCH", std::env::var("LLM_WEB_SEARCH").ok().as_deref(), true)?,
        };
        let timeouts = LlmTimeouts {
            request_secs: env_parse("LLM_REQUEST_TIMEOUT_SECS", DEFAULT_LLM_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("LLM_CONNECT_TIMEOUT_SECS", DEFAULT_LLM_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_key, model, base_url, options, timeouts })
    }
}

fn parse_temperature(raw: Option<&str>) -> Result<f32, LlmError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TEMPERATURE);
    };
    let value: f32 = raw
        .trim()
        .parse()
        .map_err(|_| LlmError::ConfigParse(format!("invalid LLM_TEMPERATURE: {raw}")))?;
    if !(0.0..=2.0).contains(&value) {
        return Err(LlmError::ConfigParse(format!("LLM_TEMPERATURE out of range (0.0..=2.0): {raw}")));
    }
    Ok(value)
}

fn parse_max_output_tokens(raw: Option<&str>) -> Result<Option<u32>, LlmError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<u32>()
            .map(Some)
            .map_err(|_| LlmError::ConfigParse(format!("invalid LLM_MAX_OUTPUT_TOKENS: {v}"))),
    }
}

pub(crate) fn parse_bool(key: &str, raw: Option<&str>, default: bool) -> Result<bool, LlmError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(LlmError::ConfigParse(format!("invalid boolean for {key}: {raw}"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
