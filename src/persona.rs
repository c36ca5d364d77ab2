//! Persona — the fixed guide the widget speaks as.
//!
//! DESIGN
//! ======
//! The built-in persona describes one article: its summary, the system
//! instruction sent with every model call, the greeting that opens each
//! conversation, and the two canned fallback replies. A YAML file named by
//! `PERSONA_FILE` can override any field for a different article.

use std::path::Path;

use serde::Deserialize;

pub const ARTICLE_URL: &str = "https://nicholaspacl.com/from-devices-to-data-platforms.html";
pub const ARTICLE_TITLE: &str = "From Devices to Data Platforms";
pub const AGENT_NAME: &str = "Data Platform Agent";

const ARTICLE_SUMMARY: &str = "\
Title: From Devices to Data Platforms
Author: Nicholas Pacl
Link: {article_url}

Key Architectural Thesis:
Modern hardware value is defined by its ability to exist within a data platform. Scaling from a single connected device to a fleet requires a shift in how telemetry, security, and orchestration are handled.

The Six Pillars of the Transition:
1. Standardized Telemetry: Using structured, interoperable data (JSON/Protobuf) instead of opaque binary blobs.
2. Edge Intelligence: Local filtering and normalization to ensure only high-value data consumes cloud bandwidth.
3. Secure Transport: Robust encryption (TLS) and session management (MQTT) for bidirectional communication.
4. Fleet Orchestration: The ability to manage device state, identity, and OTA (Over-the-Air) updates at massive scale.
5. Unified Data Lakes: A central, queryable repository that breaks down device silos for cross-fleet analysis.
6. Consumer APIs: Standardized interfaces (REST/GraphQL) that allow developers to build apps on top of the device data.
";

const SYSTEM_INSTRUCTION: &str = "\
You are the \"Data Platform Guide,\" an AI agent designed to help readers of Nicholas Pacl's blog (specifically the post: {article_url}).

Your expertise is in high-scale data architecture, IoT device management, and cloud ingestion.

Core Directives:
- Always prioritize information found in the blog post summary provided.
- If a user asks a technical question about scaling device data, reference one of the \"Six Pillars.\"
- Avoid \"Industrial\" or \"Manufacturing\" jargon (like PLC/Modbus) unless the user brings it up; focus on the broader \"Platform\" engineering concepts.
- Provide clear, architectural answers. Think like a lead systems engineer explaining a design to a novice.
- Cite the blog post directly when possible.

Interaction Protocol:
- Keep responses concise (under 150 words).
- End every response with a provocative follow-up question about the user's own data challenges.
- If you use Google Search to find extra context from Nicholas's site, you MUST show the links.
";

const GREETING: &str = "Welcome! I'm your architectural guide for Nicholas's latest post. \n\nAre you interested in how we handle **Fleet Orchestration** at scale, or should we dive into the **Six Pillars** of building a modern data platform?";

pub const EMPTY_RESPONSE_TEXT: &str = "I couldn't generate a response. Please try rephrasing your question.";
pub const FAILURE_TEXT: &str = "Connectivity lost. Please check your network and try again.";

const URL_PLACEHOLDER: &str = "{article_url}";

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PersonaError {
    #[error("failed to read persona file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("failed to parse persona file {path}: {source}")]
    Parse { path: String, source: serde_yaml::Error },
}

impl crate::error_code::ErrorCode for PersonaError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "E_PERSONA_READ",
            Self::Parse { .. } => "E_PERSONA_PARSE",
        }
    }
}

// =============================================================================
// PERSONA
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub agent_name: String,
    pub article_url: String,
    pub article_title: String,
    pub article_summary: String,
    pub system_instruction: String,
    pub greeting: String,
    pub empty_response_text: String,
    pub failure_text: String,
}

/// On-disk override. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PersonaFile {
    agent_name: Option<String>,
    article_url: Option<String>,
    article_title: Option<String>,
    article_summary: Option<String>,
    system_instruction: Option<String>,
    greeting: Option<String>,
    empty_response_text: Option<String>,
    failure_text: Option<String>,
}

impl Persona {
    /// The built-in "Data Platform Guide" persona.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            agent_name: AGENT_NAME.to_string(),
            article_url: ARTICLE_URL.to_string(),
            article_title: ARTICLE_TITLE.to_string(),
            article_summary: ARTICLE_SUMMARY.to_string(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            greeting: GREETING.to_string(),
            empty_response_text: EMPTY_RESPONSE_TEXT.to_string(),
            failure_text: FAILURE_TEXT.to_string(),
        }
    }

    /// Load `PERSONA_FILE` when set, otherwise the built-in persona.
    ///
    /// # Errors
    ///
    /// Returns an error if the named file cannot be read or parsed.
    pub fn from_env() -> Result<Self, PersonaError> {
        match std::env::var("PERSONA_FILE") {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml_file(Path::new(path.trim())),
            _ => Ok(Self::builtin()),
        }
    }

    /// Load a YAML override; absent fields keep their built-in values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid persona YAML.
    pub fn from_yaml_file(path: &Path) -> Result<Self, PersonaError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| PersonaError::Read { path: display.clone(), source })?;
        Self::from_yaml_str(&raw).map_err(|source| PersonaError::Parse { path: display, source })
    }

    pub(crate) fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not as an empty map.
        let file: PersonaFile = if raw.trim().is_empty() { PersonaFile::default() } else { serde_yaml::from_str(raw)? };
        let base = Self::builtin();
        Ok(Self {
            agent_name: file.agent_name.unwrap_or(base.agent_name),
            article_url: file.article_url.unwrap_or(base.article_url),
            article_title: file.article_title.unwrap_or(base.article_title),
            article_summary: file.article_summary.unwrap_or(base.article_summary),
            system_instruction: file.system_instruction.unwrap_or(base.system_instruction),
            greeting: file.greeting.unwrap_or(base.greeting),
            empty_response_text: file.empty_response_text.unwrap_or(base.empty_response_text),
            failure_text: file.failure_text.unwrap_or(base.failure_text),
        })
    }

    /// Final system prompt: the instruction followed by the article summary
    /// it tells the model to prioritize.
    #[must_use]
    pub fn system_prompt(&self) -> String {
        let instruction = self.system_instruction.replace(URL_PLACEHOLDER, &self.article_url);
        let summary = self.article_summary.replace(URL_PLACEHOLDER, &self.article_url);
        format!("{}\n\nBlog post summary:\n{}", instruction.trim_end(), summary.trim())
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "persona_test.rs"]
mod tests;
