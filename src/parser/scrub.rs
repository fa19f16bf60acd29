use regex::Regex;

use crate::model::Scene;

/// Removes accidental embeddings of the episode title from dialogue text, an
/// artifact of header bleed-through in the source extraction. Returns how
/// many dialogue lines actually changed; those entries are marked `cleaned`.
/// Running the pass twice leaves the second run with nothing to remove.
pub fn scrub_title_from_dialogue(scenes: &mut [Scene], episode_title: Option<&str>) -> usize {
    let Some(title) = episode_title.map(str::trim).filter(|title| !title.is_empty()) else {
        return 0;
    };
    let Some(pattern) = embedded_title_regex(title) else {
        return 0;
    };
    let Some(whitespace) = Regex::new(r"\s+").ok() else {
        return 0;
    };

    let mut cleaned_count = 0;

    for scene in scenes {
        for entry in &mut scene.dialogue {
            let stripped = pattern.replace_all(&entry.line, "");
            let collapsed = whitespace.replace_all(&stripped, " ").trim().to_string();

            if collapsed != entry.line {
                entry.line = collapsed;
                entry.cleaned = Some(true);
                cleaned_count += 1;
            }
        }
    }

    cleaned_count
}

/// Case-insensitive match for the title anywhere in a line, with runs of
/// whitespace in the title matching runs of whitespace in the dialogue.
fn embedded_title_regex(title: &str) -> Option<Regex> {
    let tokens = title
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<String>>();
    if tokens.is_empty() {
        return None;
    }

    Regex::new(&format!(r"(?i)\s*{}\s*", tokens.join(r"\s+"))).ok()
}
