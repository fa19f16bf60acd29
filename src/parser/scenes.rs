use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;

use crate::model::{DialogueEntry, Scene, StageDirection};

/// Line-oriented state machine over a normalized transcript. One forward
/// pass, no lookahead; scenes are numbered in emission order.
pub struct SceneParser {
    scene_heading: Regex,
    speaker: Regex,
    date_prefix: Regex,
    embedded_page: Regex,
    trailing_page: Regex,
    url: Regex,
}

#[derive(Debug)]
struct OpenScene {
    description: Option<String>,
    characters: HashSet<String>,
    dialogue: Vec<DialogueEntry>,
    stage_directions: Vec<StageDirection>,
    page_numbers: HashSet<String>,
    line_number_start: Option<usize>,
}

impl OpenScene {
    fn new(description: Option<String>, line_number_start: Option<usize>) -> Self {
        Self {
            description,
            characters: HashSet::new(),
            dialogue: Vec::new(),
            stage_directions: Vec::new(),
            page_numbers: HashSet::new(),
            line_number_start,
        }
    }

    fn has_content(&self) -> bool {
        !self.dialogue.is_empty() || !self.stage_directions.is_empty()
    }

    /// Sets become sorted sequences at the close boundary; their order is
    /// not part of the contract.
    fn finalize(self, scene_number: usize) -> Scene {
        let mut characters = self.characters.into_iter().collect::<Vec<String>>();
        characters.sort();
        let mut page_numbers = self.page_numbers.into_iter().collect::<Vec<String>>();
        page_numbers.sort();

        Scene {
            scene_number,
            scene_description: self.description,
            characters,
            dialogue: self.dialogue,
            stage_directions: self.stage_directions,
            page_numbers,
            line_number_start: self.line_number_start,
        }
    }
}

impl SceneParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            scene_heading: Regex::new(r"\[Scene:\s*(.*?)\]")
                .context("failed to compile scene heading regex")?,
            speaker: Regex::new(r"^([A-Z][a-z]+):\s*(.*)")
                .context("failed to compile speaker regex")?,
            date_prefix: Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}")
                .context("failed to compile date prefix regex")?,
            embedded_page: Regex::new(r"\d+/\d+")
                .context("failed to compile embedded page regex")?,
            trailing_page: Regex::new(r"(.*?)\b(\d{1,2}/\d{1,2})\b\s*$")
                .context("failed to compile trailing page regex")?,
            url: Regex::new(r"https?://\S+").context("failed to compile url regex")?,
        })
    }

    pub fn parse(&self, lines: &[String], episode_title: Option<&str>) -> Vec<Scene> {
        let title_trailing = trailing_title_regex(episode_title);

        let mut emitted = Vec::<Scene>::new();
        let mut current = OpenScene::new(None, None);
        let mut speaker: Option<(String, usize)> = None;
        let mut buffer = String::new();

        for (index, raw_line) in lines.iter().enumerate() {
            let line = raw_line.trim();
            let line_number = index + 1;

            if line.is_empty() {
                continue;
            }

            // Header/footer bleed-through: title plus URL plus page token.
            if (line.contains("The One Where") || line.contains("The One with"))
                && line.contains("http")
                && self.embedded_page.is_match(line)
            {
                continue;
            }

            // Extraction timestamp artifacts like "7/5/25, 8:20 AM".
            if self.date_prefix.is_match(line) {
                continue;
            }

            if line.starts_with("[Scene:") {
                if current.has_content() {
                    let scene_number = emitted.len() + 1;
                    emitted.push(current.finalize(scene_number));
                }

                let description = self
                    .scene_heading
                    .captures(line)
                    .and_then(|captures| captures.get(1))
                    .map(|m| m.as_str().to_string());
                current = OpenScene::new(description, Some(line_number));
                // A pending dialogue buffer never crosses a heading; it is
                // dropped, not flushed.
                speaker = None;
                buffer.clear();
                continue;
            }

            if line.starts_with('[') || line.starts_with('(') {
                current.stage_directions.push(StageDirection {
                    direction: line.to_string(),
                    source_line: line_number,
                });
                continue;
            }

            if let Some(captures) = self.speaker.captures(line) {
                if let Some((name, speaker_line)) = speaker.take() {
                    if !buffer.is_empty() {
                        self.flush_dialogue(
                            &mut current,
                            &name,
                            speaker_line,
                            &buffer,
                            title_trailing.as_ref(),
                        );
                    }
                }

                let name = captures.get(1).map_or("", |m| m.as_str()).to_string();
                buffer = captures.get(2).map_or("", |m| m.as_str()).to_string();
                current.characters.insert(name.clone());
                speaker = Some((name, line_number));
                continue;
            }

            if speaker.is_some() {
                buffer.push(' ');
                buffer.push_str(line);
            }
        }

        if let Some((name, speaker_line)) = speaker {
            if !buffer.is_empty() {
                self.flush_dialogue(
                    &mut current,
                    &name,
                    speaker_line,
                    &buffer,
                    title_trailing.as_ref(),
                );
                let scene_number = emitted.len() + 1;
                emitted.push(current.finalize(scene_number));
            }
        }

        emitted
    }

    fn flush_dialogue(
        &self,
        scene: &mut OpenScene,
        speaker: &str,
        speaker_line: usize,
        buffer: &str,
        title_trailing: Option<&Regex>,
    ) {
        let (line, page_number) = self.clean_line_and_extract_page(buffer.trim(), title_trailing);

        if let Some(page) = &page_number {
            scene.page_numbers.insert(page.clone());
        }

        scene.dialogue.push(DialogueEntry {
            speaker: speaker.to_string(),
            line,
            source_line: speaker_line,
            page_number,
            cleaned: None,
        });
    }

    /// Trims the buffered text, splits off a trailing page marker, drops a
    /// trailing episode title left behind by the extractor, and strips URLs.
    pub fn clean_line_and_extract_page(
        &self,
        text: &str,
        title_trailing: Option<&Regex>,
    ) -> (String, Option<String>) {
        let original = text.trim();

        let (mut cleaned, page_number) = match self.trailing_page.captures(original) {
            Some(captures) => (
                captures.get(1).map_or("", |m| m.as_str()).trim().to_string(),
                captures.get(2).map(|m| m.as_str().to_string()),
            ),
            None => (original.to_string(), None),
        };

        if let Some(pattern) = title_trailing {
            cleaned = pattern.replace(&cleaned, "").into_owned();
        }

        cleaned = self.url.replace_all(&cleaned, "").trim().to_string();

        (cleaned, page_number)
    }
}

/// End-anchored, case-insensitive match for the literal episode title.
pub fn trailing_title_regex(episode_title: Option<&str>) -> Option<Regex> {
    let title = episode_title?;
    if title.is_empty() {
        return None;
    }

    Regex::new(&format!(r"(?i)\s*{}\s*$", regex::escape(title))).ok()
}
