use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::ParseArgs;
use crate::model::ParsedScript;
use crate::parser::{DocumentSource, parse_document};
use crate::util::{file_size, sha256_file, write_json_pretty};

pub fn run(args: ParseArgs) -> Result<()> {
    let parsed = parse_transcript_file(&args.input)?;

    let output_path = args
        .output
        .unwrap_or_else(|| args.input.with_extension("json"));
    write_json_pretty(&output_path, &parsed)?;
    info!(path = %output_path.display(), "wrote parsed script");

    log_summary(&parsed);

    if args.json {
        let rendered = serde_json::to_string_pretty(&parsed)
            .context("failed to render parsed script as json")?;
        println!("{rendered}");
    }

    Ok(())
}

/// Reads one extracted transcript and runs the parsing core over it. File
/// size and hash lookups are provenance only; their failure downgrades to a
/// warning instead of aborting the parse.
pub fn parse_transcript_file(path: &Path) -> Result<ParsedScript> {
    let raw_text = fs::read_to_string(path)
        .with_context(|| format!("failed to read transcript: {}", path.display()))?;

    let mut source = DocumentSource::new(path.display().to_string());
    match file_size(path) {
        Ok(size) => source.size = Some(size),
        Err(err) => warn!(error = %err, "file size unavailable"),
    }
    match sha256_file(path) {
        Ok(digest) => source.sha256 = Some(digest),
        Err(err) => warn!(error = %err, "file hash unavailable"),
    }

    parse_document(&raw_text, &source)
}

fn log_summary(parsed: &ParsedScript) {
    let metadata = &parsed.metadata;
    let statistics = &parsed.statistics;

    info!(
        episode_title = %metadata.episode_title.clone().unwrap_or_default(),
        season = %display_number(metadata.season),
        episode_number = %display_number(metadata.episode_number),
        series_episode_number = %display_number(metadata.series_episode_number),
        total_pages = %display_number(metadata.total_pages),
        scene_count = statistics.total_scenes,
        dialogue_line_count = statistics.total_dialogue_lines,
        character_count = statistics.unique_characters.len(),
        writers = %metadata.writers.join(", "),
        directors = %metadata.directors.join(", "),
        "parse summary"
    );
}

fn display_number(value: Option<u32>) -> String {
    value.map_or_else(String::new, |value| value.to_string())
}
