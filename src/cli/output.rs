//! Output formatting and progress bars for CLI

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::{
    pipeline::{BatchResult, BatchSummary},
    session::EpisodeOutcome,
};

/// Create a progress bar for a batch of episodes
pub fn create_batch_progress(total_episodes: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total_episodes);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.green/blue} {pos}/{len} episodes")
            .map_err(|e| anyhow!("Invalid progress bar template: {e}"))?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:28} {}", format!("{}:", key), value);
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

fn describe(outcome: &EpisodeOutcome) -> String {
    format!(
        "{} reward, {} penalties, {} steps",
        outcome.total_reward, outcome.penalties, outcome.steps
    )
}

/// Print counts and aggregate statistics of a batch
pub fn print_batch(batch: &BatchResult, summary: &BatchSummary) {
    print_kv("Solved", &format_number(batch.total_solved));
    print_kv("Unsolved", &format_number(batch.total_unsolved));
    print_kv("Total", &format_number(batch.total_attempts));
    print_kv("Success rate", &format!("{:.2}%", batch.success_rate));
    print_kv(
        "Mean reward per step",
        &format!("{:.4}", summary.mean_reward_per_step),
    );
    print_kv(
        "Mean penalties per episode",
        &format!("{:.4}", summary.mean_penalties_per_episode),
    );
    print_kv(
        "Mean steps per episode",
        &format!("{:.2}", summary.mean_steps_per_episode),
    );
    if let Some(best) = &summary.best {
        print_kv("Best episode", &describe(best));
    }
    if let Some(worst) = &summary.worst {
        print_kv("Worst episode", &describe(worst));
    }
}

/// JSON form of a batch without the per-episode records
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub total_solved: usize,
    pub total_unsolved: usize,
    pub total_attempts: usize,
    pub success_rate: f64,
    pub summary: BatchSummary,
}

impl BatchReport {
    pub fn new(batch: &BatchResult) -> Self {
        Self {
            total_solved: batch.total_solved,
            total_unsolved: batch.total_unsolved,
            total_attempts: batch.total_attempts,
            success_rate: batch.success_rate,
            summary: batch.summary(),
        }
    }
}

/// Normalize a `--summary` argument: directories get `default_name`, other
/// paths get a `.json` extension.
pub fn sanitize_summary_path(raw: &Path, default_name: &str) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push(default_name);
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

/// Write `value` as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .with_context(|| format!("Failed to write JSON: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(10_000), "10,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_sanitize_summary_path() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/run"), "summary.json"),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/run.JSON"), "summary.json"),
            PathBuf::from("out/run.JSON")
        );
        let dir = format!("out{}", std::path::MAIN_SEPARATOR);
        assert_eq!(
            sanitize_summary_path(Path::new(&dir), "summary.json"),
            PathBuf::from("out").join("summary.json")
        );
    }
}
