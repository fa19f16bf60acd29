use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::BatchArgs;
use crate::commands::parse::parse_transcript_file;
use crate::model::{BatchEntry, BatchRunManifest};
use crate::util::{ensure_directory, now_utc_string, write_json_pretty};

pub fn run(args: BatchArgs) -> Result<()> {
    let mut transcripts = discover_transcripts(&args.input_dir, &args.extension)?;
    transcripts.sort();

    if transcripts.is_empty() {
        bail!(
            "no .{} transcripts found in {}",
            args.extension,
            args.input_dir.display()
        );
    }

    if let Some(output_dir) = &args.output_dir {
        ensure_directory(output_dir)?;
    }

    let mut documents = Vec::new();
    let mut warnings = Vec::new();

    for path in &transcripts {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToOwned::to_owned)
            .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))?;

        let parsed = match parse_transcript_file(path) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(file = %path.display(), error = %err, "skipping transcript");
                warnings.push(format!("{filename}: {err}"));
                continue;
            }
        };

        let output_path = match &args.output_dir {
            Some(dir) => dir.join(Path::new(&filename).with_extension("json")),
            None => path.with_extension("json"),
        };
        write_json_pretty(&output_path, &parsed)?;

        documents.push(BatchEntry {
            filename,
            output_path: output_path.display().to_string(),
            episode_title: parsed.metadata.episode_title.clone(),
            scene_count: parsed.statistics.total_scenes,
            dialogue_line_count: parsed.statistics.total_dialogue_lines,
        });
    }

    let manifest = BatchRunManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: args.input_dir.display().to_string(),
        document_count: documents.len(),
        documents,
        warnings,
    };

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| args.input_dir.join("batch_manifest.json"));
    write_json_pretty(&manifest_path, &manifest)?;

    info!(path = %manifest_path.display(), "wrote batch manifest");
    info!(
        document_count = manifest.document_count,
        warning_count = manifest.warnings.len(),
        "batch completed"
    );

    Ok(())
}

fn discover_transcripts(input_dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut transcripts = Vec::new();

    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", input_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(extension))
            .unwrap_or(false);

        if matches {
            transcripts.push(path);
        }
    }

    Ok(transcripts)
}
