// src/lab/types.rs
use serde::{Deserialize, Serialize};

/// One extracted character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    /// 1-based position in the secret
    pub position: usize,
    pub value: char,
    /// Oracle probes spent on this character
    pub probes: usize,
}

/// Complete extraction results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub lab_url: String,
    pub lab_title: Option<String>,
    pub username: String,
    pub length: usize,
    pub secret: String,
    pub total_probes: usize,
    pub characters: Vec<CharacterRecord>,
    pub started_at: String,
    pub finished_at: String,
}

/// Knobs of a single extraction run that are not lab configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Draw the search boards on the terminal
    pub live: bool,
}
