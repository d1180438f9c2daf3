/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{error, info, warn};

use timetable_o::catalog::ScheduleEntry;
use timetable_o::config::CatalogManager;
use timetable_o::request;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Timetable-O weekly timetable generator.
///
/// Example:
///   timetable-o --catalog demos/catalog.yaml --output schedules.json --format json
#[derive(Debug, Parser)]
#[command(
    name = "timetable-o",
    about = "Timetable-O – greedy weekly timetable generator",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML catalog (programs, sections, courses, rooms, settings).
    #[arg(short = 'c', long = "catalog")]
    catalog: PathBuf,

    /// File receiving the generated schedule rows; replaced on every run.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Serialisation format for the schedule file and the printed response.
    #[arg(short = 'f', long = "format", value_enum, default_value_t = Format::Yaml)]
    format: Format,

    /// Abort the run if it takes longer than this many seconds.
    #[arg(short = 'd', long = "deadline-secs")]
    deadline_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn render<T: Serialize>(self, value: &T) -> Result<String> {
        match self {
            Format::Yaml => serde_yaml::to_string(value).context("failed to encode YAML"),
            Format::Json => serde_json::to_string_pretty(value).context("failed to encode JSON"),
        }
    }
}

/// Replace `path` with `rows` rendered in `format`.
fn persist<T: Serialize>(path: &Path, format: Format, rows: &T) -> Result<()> {
    let body = format.render(rows)?;
    std::fs::write(path, body)
        .with_context(|| format!("failed to write schedules to {}", path.display()))
}

/// Empty `path` before a run so a failed run leaves no stale rows behind.
fn clear_output(path: &Path, format: Format) -> Result<()> {
    persist(path, format, &Vec::<ScheduleEntry>::new())
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        catalog       = %cli.catalog.display(),
        output        = ?cli.output,
        format        = ?cli.format,
        deadline_secs = ?cli.deadline_secs,
        "Timetable-O starting up"
    );

    // ── Load catalog ──────────────────────────────────────────────────────────
    let mut manager = CatalogManager::new();
    if let Err(e) = manager.load_from_file(&cli.catalog) {
        error!("Failed to load catalog: {:#}", e);
        process::exit(1);
    }
    let settings = manager.settings();
    let catalog = Arc::new(manager.take_catalog());

    if let Err(e) = request::check_preconditions(&catalog) {
        error!("Timetable generation refused: {}", e);
        process::exit(2);
    }

    // ── Clear previous output ─────────────────────────────────────────────────
    if let Some(path) = &cli.output {
        if let Err(e) = clear_output(path, cli.format) {
            error!("{:#}", e);
            process::exit(1);
        }
    }

    // ── Generate ──────────────────────────────────────────────────────────────
    let deadline = cli.deadline_secs.map(Duration::from_secs);
    let outcome = match request::generate(catalog, settings, deadline).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Timetable generation failed: {}", e);
            process::exit(2);
        }
    };

    // ── Persist + report ──────────────────────────────────────────────────────
    match &cli.output {
        Some(path) => {
            if let Err(e) = persist(path, cli.format, &outcome.schedules) {
                error!("{:#}", e);
                process::exit(1);
            }
            info!(path = %path.display(), rows = outcome.schedules.len(), "schedules written");
        }
        None => warn!("No --output given, schedule rows are not persisted"),
    }

    match cli.format.render(&outcome.response) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::NamedTempFile;
    use timetable_o::catalog::ScheduleType;
    use timetable_o::clock::{TimeOfDay, Weekday};

    fn stale_rows() -> Vec<ScheduleEntry> {
        vec![ScheduleEntry {
            section_id: 1,
            course_id: 1,
            room_id: 1,
            day: Weekday::Mon,
            start_time: TimeOfDay::from_hm(8, 0).unwrap(),
            end_time: TimeOfDay::from_hm(12, 0).unwrap(),
            schedule_type: ScheduleType::Lecture,
        }]
    }

    #[test]
    fn clearing_replaces_previous_rows_with_an_empty_list() {
        let f = NamedTempFile::new().unwrap();
        persist(f.path(), Format::Json, &stale_rows()).unwrap();

        clear_output(f.path(), Format::Json).unwrap();

        let body = std::fs::read_to_string(f.path()).unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn clearing_yaml_output_leaves_a_parseable_empty_list() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"- stale: row\n").unwrap();

        clear_output(f.path(), Format::Yaml).unwrap();

        let body = std::fs::read_to_string(f.path()).unwrap();
        let rows: Vec<serde_yaml::Value> = serde_yaml::from_str(&body).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn persisted_rows_use_wire_time_format() {
        let f = NamedTempFile::new().unwrap();
        persist(f.path(), Format::Json, &stale_rows()).unwrap();
        let body = std::fs::read_to_string(f.path()).unwrap();
        assert!(body.contains("\"08:00:00\""));
    }
}
