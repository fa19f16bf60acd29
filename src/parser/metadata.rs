use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use crate::model::{EpisodeMetadata, FileInfo};
use crate::parser::DocumentSource;
use crate::util::now_utc_string;

/// Credit lines are only trusted near the top of the document; dialogue
/// further down can resemble credit syntax.
pub const CREDIT_SCAN_LINES: usize = 10;
/// Episode titles can drift a few lines down after extraction artifacts.
pub const TITLE_SCAN_LINES: usize = 50;
/// The transcriber-credit fallback must sit at the very start of the file.
pub const TRANSCRIBER_SCAN_LINES: usize = 3;

/// Episodes aired per season; index 0 is unused so that index N addresses
/// season N directly.
pub const SEASON_EPISODE_COUNTS: [u32; 11] = [0, 24, 24, 25, 24, 24, 25, 24, 24, 24, 18];

enum CreditTarget {
    Writers,
    Teleplay,
    Story,
}

pub struct MetadataExtractor {
    season: Regex,
    episode: Regex,
    writer_credits: Vec<(Regex, CreditTarget)>,
    director_credits: Vec<Regex>,
    transcriber_credit: Regex,
    production_code: Regex,
    page_token: Regex,
}

impl MetadataExtractor {
    pub fn new() -> Result<Self> {
        let writer_credits = vec![
            (
                Regex::new(r"(?i)Written by:?\s*(.+?)(?:Transcribed|$)")
                    .context("failed to compile written-by regex")?,
                CreditTarget::Writers,
            ),
            (
                Regex::new(r"(?i)Writer:?\s*(.+?)(?:Transcribed|$)")
                    .context("failed to compile writer regex")?,
                CreditTarget::Writers,
            ),
            (
                Regex::new(r"(?i)Teleplay by:?\s*(.+?)(?:Transcribed|$)")
                    .context("failed to compile teleplay-by regex")?,
                CreditTarget::Teleplay,
            ),
            (
                Regex::new(r"(?i)Story by:?\s*(.+?)(?:Transcribed|$)")
                    .context("failed to compile story-by regex")?,
                CreditTarget::Story,
            ),
        ];

        let director_credits = vec![
            Regex::new(r"(?i)Directed by:?\s*(.+)")
                .context("failed to compile directed-by regex")?,
            Regex::new(r"(?i)Director:?\s*(.+)").context("failed to compile director regex")?,
        ];

        Ok(Self {
            season: Regex::new(r"[Ss](\d+)").context("failed to compile season regex")?,
            episode: Regex::new(r"[Ee]p?(\d+)").context("failed to compile episode regex")?,
            writer_credits,
            director_credits,
            transcriber_credit: Regex::new(
                r"^([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*(?:\s*&\s*[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)*)\s+Transcribed by:",
            )
            .context("failed to compile transcriber credit regex")?,
            production_code: Regex::new(r"(?i)Production Code:?\s*([A-Z0-9-]+)")
                .context("failed to compile production code regex")?,
            page_token: Regex::new(r"\b(\d{1,2}/\d{1,2})\b")
                .context("failed to compile page token regex")?,
        })
    }

    /// Best-effort extraction over a bounded prefix of lines. Never fails:
    /// every field defaults to absent or empty when nothing matches.
    pub fn extract(&self, lines: &[String], source: &DocumentSource) -> EpisodeMetadata {
        let filename = Path::new(&source.path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&source.path)
            .to_string();

        let season = self.capture_number(&self.season, &filename);
        let episode_number = self.capture_number(&self.episode, &filename);
        let series_episode_number = match (season, episode_number) {
            (Some(season), Some(episode)) => series_episode_number(season, episode),
            _ => None,
        };

        let mut writers = Vec::new();
        let mut teleplay_by = Vec::new();
        let mut story_by = Vec::new();

        let credit_lines = &lines[..lines.len().min(CREDIT_SCAN_LINES)];
        for (pattern, target) in &self.writer_credits {
            for line in credit_lines {
                if let Some(captures) = pattern.captures(line) {
                    let names = split_credit_names(captures.get(1).map_or("", |m| m.as_str()));
                    match target {
                        CreditTarget::Writers => writers.extend(names),
                        CreditTarget::Teleplay => teleplay_by.extend(names),
                        CreditTarget::Story => story_by.extend(names),
                    }
                }
            }
        }

        if writers.is_empty() {
            for line in credit_lines.iter().take(TRANSCRIBER_SCAN_LINES) {
                if let Some(captures) = self.transcriber_credit.captures(line.trim()) {
                    writers
                        .extend(split_credit_names(captures.get(1).map_or("", |m| m.as_str())));
                    break;
                }
            }
        }

        let mut directors = Vec::new();
        for pattern in &self.director_credits {
            for line in credit_lines {
                if let Some(captures) = pattern.captures(line) {
                    directors.extend(split_credit_names(
                        captures.get(1).map_or("", |m| m.as_str()),
                    ));
                }
            }
        }

        let production_code = credit_lines
            .iter()
            .find_map(|line| self.production_code.captures(line))
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string());

        EpisodeMetadata {
            episode_title: self.extract_title(lines),
            season,
            episode_number,
            series_episode_number,
            writers,
            directors,
            story_by,
            teleplay_by,
            production_code,
            total_pages: self.count_total_pages(lines),
            file_info: FileInfo {
                filename,
                path: source.path.clone(),
                size: source.size,
                sha256: source.sha256.clone(),
                extraction_timestamp: now_utc_string(),
            },
        }
    }

    /// Titles may wrap across up to three physical lines when the source
    /// extraction broke an unbalanced parenthetical.
    fn extract_title(&self, lines: &[String]) -> Option<String> {
        let bound = lines.len().min(TITLE_SCAN_LINES);
        for (index, line) in lines[..bound].iter().enumerate() {
            let candidate = line.trim();
            if !candidate.to_lowercase().starts_with("the one") {
                continue;
            }

            let mut title = candidate.to_string();
            if (title.ends_with('(') || unbalanced_parens(&title)) && index + 1 < lines.len() {
                if let Some(next) = title_continuation(&lines[index + 1]) {
                    title.push(' ');
                    title.push_str(next);

                    if unbalanced_parens(&title) && index + 2 < lines.len() {
                        if let Some(third) = title_continuation(&lines[index + 2]) {
                            title.push(' ');
                            title.push_str(third);
                        }
                    }
                }
            }

            return Some(title);
        }

        None
    }

    fn count_total_pages(&self, lines: &[String]) -> Option<u32> {
        let mut tokens = HashSet::new();
        for line in lines {
            if let Some(captures) = self.page_token.captures(line) {
                if let Some(token) = captures.get(1) {
                    tokens.insert(token.as_str().to_string());
                }
            }
        }

        tokens
            .iter()
            .filter_map(|token| page_numerator(token))
            .max()
    }

    fn capture_number(&self, pattern: &Regex, text: &str) -> Option<u32> {
        pattern
            .captures(text)
            .and_then(|captures| captures.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
    }
}

/// Ordinal position across the whole series: every completed prior season
/// plus the in-season episode number. Absent when the season falls outside
/// the count table or either number is zero.
pub fn series_episode_number(season: u32, episode: u32) -> Option<u32> {
    if season == 0 || episode == 0 {
        return None;
    }
    if season as usize >= SEASON_EPISODE_COUNTS.len() {
        return None;
    }

    let prior: u32 = SEASON_EPISODE_COUNTS[1..season as usize].iter().sum();
    Some(prior + episode)
}

pub fn page_numerator(token: &str) -> Option<u32> {
    token.split('/').next()?.parse::<u32>().ok()
}

fn split_credit_names(text: &str) -> Vec<String> {
    text.split('&')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn unbalanced_parens(text: &str) -> bool {
    let open = text.matches('(').count();
    let close = text.matches(')').count();
    open > close
}

/// A continuation line must look like title text, not a new logical element.
fn title_continuation(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('[') || trimmed.starts_with("Written") {
        return None;
    }
    Some(trimmed)
}
