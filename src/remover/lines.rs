//! Line arithmetic over a source buffer. All offsets are byte offsets.

/// Offset of the first byte of the line containing `at`
pub fn line_start(source: &str, at: usize) -> usize {
    source[..at].rfind('\n').map_or(0, |i| i + 1)
}

/// Offset just past the line containing `at`, newline included
pub fn line_end(source: &str, at: usize) -> usize {
    source[at..].find('\n').map_or(source.len(), |i| at + i + 1)
}

/// Whitespace at the start of the line containing `at`
pub fn indentation(source: &str, at: usize) -> &str {
    let start = line_start(source, at);
    let line = &source[start..line_end(source, at)];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

/// Only whitespace between the start of the line and `at`
pub fn starts_line(source: &str, at: usize) -> bool {
    source[line_start(source, at)..at].trim().is_empty()
}

/// Only whitespace or a trailing comment between `at` and the end of its line
pub fn ends_line(source: &str, at: usize) -> bool {
    let rest = source[at..line_end(source, at)].trim_start();
    rest.is_empty() || rest.starts_with('#')
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Start of the blank line directly above a line-aligned `start`
pub fn blank_line_before(source: &str, start: usize) -> Option<usize> {
    if start == 0 {
        return None;
    }
    let previous = line_start(source, start - 1);
    is_blank(&source[previous..start]).then_some(previous)
}

/// End of the blank line directly below a line-aligned `end`
pub fn blank_line_after(source: &str, end: usize) -> Option<usize> {
    if end >= source.len() {
        return None;
    }
    let next = line_end(source, end);
    is_blank(&source[end..next]).then_some(next)
}
