use std::collections::{BTreeMap, BTreeSet};

use crate::model::{CharacterStats, PageRange, Scene, SceneExtreme, ScriptStatistics};
use crate::parser::metadata::page_numerator;

/// Pure aggregation over finished scenes. Empty input yields zeroed
/// statistics rather than an error.
pub fn compute_statistics(scenes: &[Scene]) -> ScriptStatistics {
    let mut stats = ScriptStatistics {
        total_scenes: scenes.len(),
        ..ScriptStatistics::default()
    };

    let mut character_stats = BTreeMap::<String, CharacterStats>::new();
    let mut unique_characters = BTreeSet::<String>::new();
    let mut speaking_characters = BTreeSet::<String>::new();
    let mut all_pages = BTreeSet::<String>::new();

    for scene in scenes {
        let scene_length = scene.dialogue.len();
        stats.scene_lengths.push(scene_length);
        stats.total_dialogue_lines += scene_length;

        all_pages.extend(scene.page_numbers.iter().cloned());

        for character in &scene.characters {
            unique_characters.insert(character.clone());
            character_stats
                .entry(character.clone())
                .or_default()
                .scenes_appeared += 1;
        }

        for entry in &scene.dialogue {
            speaking_characters.insert(entry.speaker.clone());
            if let Some(character) = character_stats.get_mut(&entry.speaker) {
                character.total_lines += 1;
            }
        }
    }

    if !stats.scene_lengths.is_empty() {
        stats.average_scene_length =
            stats.total_dialogue_lines as f64 / stats.scene_lengths.len() as f64;

        // Ties resolve to the first scene with the extreme length.
        if let Some(&max_length) = stats.scene_lengths.iter().max() {
            stats.longest_scene = extreme_at(&stats.scene_lengths, max_length);
        }
        if let Some(&min_length) = stats.scene_lengths.iter().min() {
            stats.shortest_scene = extreme_at(&stats.scene_lengths, min_length);
        }
    }

    for character in character_stats.values_mut() {
        if character.scenes_appeared > 0 {
            character.average_lines_per_scene =
                character.total_lines as f64 / character.scenes_appeared as f64;
        }
    }

    let page_numerators = all_pages
        .iter()
        .filter_map(|token| page_numerator(token))
        .collect::<Vec<u32>>();
    if let (Some(&start), Some(&end)) =
        (page_numerators.iter().min(), page_numerators.iter().max())
    {
        stats.page_range = Some(PageRange { start, end });
    }

    stats.character_stats = character_stats;
    stats.unique_characters = unique_characters.into_iter().collect();
    stats.speaking_characters = speaking_characters.into_iter().collect();

    stats
}

fn extreme_at(scene_lengths: &[usize], length: usize) -> Option<SceneExtreme> {
    scene_lengths
        .iter()
        .position(|&value| value == length)
        .map(|scene_index| SceneExtreme {
            length,
            scene_index,
        })
}
