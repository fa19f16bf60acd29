use anyhow::Result;

use crate::model::{ParsedScript, ParsingInfo};
use crate::util::now_utc_string;

pub mod metadata;
pub mod normalize;
pub mod scenes;
pub mod scrub;
pub mod stats;

pub use metadata::MetadataExtractor;
pub use scenes::SceneParser;

pub const PARSER_VERSION: &str = "2.0";

/// Identity and provenance of the document the raw text came from. The text
/// extraction itself and any file I/O happen outside the parsing core; the
/// command layer fills in size and hash when it has them.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    pub path: String,
    pub size: Option<u64>,
    pub sha256: Option<String>,
}

impl DocumentSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            size: None,
            sha256: None,
        }
    }
}

/// Runs the full pipeline over one transcript: normalize, extract metadata,
/// parse scenes, scrub the title out of dialogue, aggregate statistics.
///
/// Malformed or empty content never fails; every extraction falls back to
/// absent or empty fields. The only error path is regex construction.
pub fn parse_document(raw_text: &str, source: &DocumentSource) -> Result<ParsedScript> {
    let lines = normalize::normalize_lines(raw_text);

    let extractor = MetadataExtractor::new()?;
    let metadata = extractor.extract(&lines, source);

    let parser = SceneParser::new()?;
    let mut scenes = parser.parse(&lines, metadata.episode_title.as_deref());

    let dialogue_lines_cleaned =
        scrub::scrub_title_from_dialogue(&mut scenes, metadata.episode_title.as_deref());

    let statistics = stats::compute_statistics(&scenes);

    Ok(ParsedScript {
        metadata,
        statistics,
        scenes,
        parsing_info: ParsingInfo {
            parser_version: PARSER_VERSION.to_string(),
            total_lines_processed: lines.len(),
            parsing_timestamp: now_utc_string(),
            dialogue_lines_cleaned,
        },
    })
}
