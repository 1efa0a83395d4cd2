use crate::error::LocationParseError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Half-open range in a source file.
///
/// Lines and columns are 1-indexed and columns count bytes. The end position
/// points one past the last byte of the range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Location {
    pub fn new(
        file: PathBuf,
        start_line: usize,
        start_column: usize,
        end_line: usize,
        end_column: usize,
    ) -> Self {
        debug_assert!((start_line, start_column) <= (end_line, end_column));
        Self {
            file,
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Build a location from a tree-sitter node (tree-sitter points are 0-indexed)
    pub fn from_node(file: &Path, node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self::new(
            file.to_path_buf(),
            start.row + 1,
            start.column + 1,
            end.row + 1,
            end.column + 1,
        )
    }

    /// Whether `other` lies within this range, boundaries included
    pub fn contains(&self, other: &Location) -> bool {
        self.file == other.file
            && (self.start_line, self.start_column) <= (other.start_line, other.start_column)
            && (other.end_line, other.end_column) <= (self.end_line, self.end_column)
    }

    /// Whether this location covers exactly the span of `node`
    pub fn matches_node(&self, node: tree_sitter::Node) -> bool {
        let start = node.start_position();
        let end = node.end_position();
        self.start_line == start.row + 1
            && self.start_column == start.column + 1
            && self.end_line == end.row + 1
            && self.end_column == end.column + 1
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}-{}:{}",
            self.file.display(),
            self.start_line,
            self.start_column,
            self.end_line,
            self.end_column
        )
    }
}

impl FromStr for Location {
    type Err = LocationParseError;

    // Parsed right to left so that paths containing `:` or `-` survive.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let error = |reason| LocationParseError {
            input: input.to_string(),
            reason,
        };

        let (rest, end_column) = input
            .rsplit_once(':')
            .ok_or_else(|| error("missing end column"))?;
        let (rest, end_line) = rest
            .rsplit_once('-')
            .ok_or_else(|| error("missing `-` between start and end"))?;
        let (rest, start_column) = rest
            .rsplit_once(':')
            .ok_or_else(|| error("missing start column"))?;
        let (file, start_line) = rest
            .rsplit_once(':')
            .ok_or_else(|| error("missing start line"))?;

        if file.is_empty() {
            return Err(error("missing file"));
        }

        let number = |text: &str| text.parse::<usize>().map_err(|_| error("positions must be numbers"));

        let location = Location {
            file: PathBuf::from(file),
            start_line: number(start_line)?,
            start_column: number(start_column)?,
            end_line: number(end_line)?,
            end_column: number(end_column)?,
        };

        if (location.start_line, location.start_column) > (location.end_line, location.end_column) {
            return Err(error("start is after end"));
        }

        Ok(location)
    }
}

// Ordered by the serialized form so reports sort the same way everywhere.
impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(file: &str, sl: usize, sc: usize, el: usize, ec: usize) -> Location {
        Location::new(PathBuf::from(file), sl, sc, el, ec)
    }

    #[test]
    fn test_display() {
        assert_eq!(loc("lib/foo.rb", 1, 1, 3, 4).to_string(), "lib/foo.rb:1:1-3:4");
    }

    #[test]
    fn test_round_trip() {
        for location in [
            loc("lib/foo.rb", 1, 1, 3, 4),
            loc("C:/work/my-app/foo.rb", 12, 3, 12, 20),
            loc("a-b:c.rb", 2, 5, 9, 1),
        ] {
            let parsed: Location = location.to_string().parse().unwrap();
            assert_eq!(parsed, location);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!("foo.rb".parse::<Location>().is_err());
        assert!("foo.rb:1:1".parse::<Location>().is_err());
        assert!("foo.rb:a:1-2:3".parse::<Location>().is_err());
        assert!(":1:1-2:3".parse::<Location>().is_err());
        assert!("foo.rb:5:1-2:3".parse::<Location>().is_err());
    }

    #[test]
    fn test_contains() {
        let outer = loc("foo.rb", 1, 1, 10, 4);
        assert!(outer.contains(&loc("foo.rb", 2, 3, 4, 6)));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&loc("foo.rb", 9, 1, 10, 5)));
        assert!(!outer.contains(&loc("bar.rb", 2, 3, 4, 6)));
    }

    #[test]
    fn test_ordering_follows_string_form() {
        let mut locations = vec![
            loc("b.rb", 1, 1, 1, 2),
            loc("a.rb", 9, 1, 9, 2),
            loc("a.rb", 10, 1, 10, 2),
        ];
        locations.sort();

        let rendered: Vec<String> = locations.iter().map(|l| l.to_string()).collect();
        assert_eq!(rendered, vec!["a.rb:10:1-10:2", "a.rb:9:1-9:2", "b.rb:1:1-1:2"]);
    }
}
