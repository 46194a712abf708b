//! Selection of candidate lines from the raw log stream.

/// Severity marker that a line must contain to be analyzed (case-sensitive).
pub const INFO_MARKER: &str = "INFO";

/// Returns `true` if the line carries the informational severity marker.
pub fn is_info_line(line: &str) -> bool {
    line.contains(INFO_MARKER)
}

/// Keeps only informational lines, preserving input order and content.
pub fn filter_info_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter(|line| is_info_line(line.as_ref()))
        .map(|line| line.as_ref().to_string())
        .collect()
}
