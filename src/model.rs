use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    pub filename: String,
    pub path: String,
    pub size: Option<u64>,
    pub sha256: Option<String>,
    pub extraction_timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EpisodeMetadata {
    pub episode_title: Option<String>,
    pub season: Option<u32>,
    pub episode_number: Option<u32>,
    pub series_episode_number: Option<u32>,
    pub writers: Vec<String>,
    pub directors: Vec<String>,
    pub story_by: Vec<String>,
    pub teleplay_by: Vec<String>,
    pub production_code: Option<String>,
    pub total_pages: Option<u32>,
    pub file_info: FileInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageDirection {
    pub direction: String,
    pub source_line: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DialogueEntry {
    pub speaker: String,
    pub line: String,
    pub source_line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub scene_number: usize,
    pub scene_description: Option<String>,
    pub characters: Vec<String>,
    pub dialogue: Vec<DialogueEntry>,
    pub stage_directions: Vec<StageDirection>,
    pub page_numbers: Vec<String>,
    /// Absent for the implicit leading scene, which has no heading line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number_start: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CharacterStats {
    pub total_lines: usize,
    pub scenes_appeared: usize,
    pub average_lines_per_scene: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneExtreme {
    pub length: usize,
    pub scene_index: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScriptStatistics {
    pub total_scenes: usize,
    pub total_dialogue_lines: usize,
    pub character_stats: BTreeMap<String, CharacterStats>,
    pub scene_lengths: Vec<usize>,
    pub average_scene_length: f64,
    pub longest_scene: Option<SceneExtreme>,
    pub shortest_scene: Option<SceneExtreme>,
    pub page_range: Option<PageRange>,
    pub unique_characters: Vec<String>,
    pub speaking_characters: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParsingInfo {
    pub parser_version: String,
    pub total_lines_processed: usize,
    pub parsing_timestamp: String,
    pub dialogue_lines_cleaned: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParsedScript {
    pub metadata: EpisodeMetadata,
    pub statistics: ScriptStatistics,
    pub scenes: Vec<Scene>,
    pub parsing_info: ParsingInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub filename: String,
    pub output_path: String,
    pub episode_title: Option<String>,
    pub scene_count: usize,
    pub dialogue_line_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRunManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub document_count: usize,
    pub documents: Vec<BatchEntry>,
    pub warnings: Vec<String>,
}
