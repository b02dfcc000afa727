// src/lab/status.rs
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::SolverError;
use crate::lab::http_client::LabClient;

const SOLVED_BANNER: &str = "Congratulations, you solved the lab!";

/// Header information every lab page carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabStatus {
    pub title: Option<String>,
    pub solved: bool,
}

pub async fn fetch_status(client: &LabClient) -> Result<LabStatus, SolverError> {
    let body = client.get("./").await?.error_for_status()?.text().await?;
    parse_status(&body)
}

pub fn parse_status(body: &str) -> Result<LabStatus, SolverError> {
    let document = Html::parse_document(body);
    let title_selector = selector(".title-container h2")?;
    let widget_selector = selector(".widgetcontainer-lab-status")?;
    let banner_selector = selector("h4")?;

    let title = document
        .select(&title_selector)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty());

    let widget_solved = document
        .select(&widget_selector)
        .any(|widget| widget.value().classes().any(|class| class == "is-solved"));

    let banner_solved = document
        .select(&banner_selector)
        .any(|h4| h4.text().collect::<String>().trim() == SOLVED_BANNER);

    Ok(LabStatus {
        title,
        solved: widget_solved || banner_solved,
    })
}

fn selector(css: &str) -> Result<Selector, SolverError> {
    Selector::parse(css).map_err(|e| SolverError::Parse(format!("Invalid selector {}: {:?}", css, e)))
}
