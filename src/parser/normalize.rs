/// Replaces non-breaking spaces with plain spaces and splits the raw
/// extracted text into ordered lines.
pub fn normalize_lines(raw_text: &str) -> Vec<String> {
    raw_text
        .replace('\u{00a0}', " ")
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}
