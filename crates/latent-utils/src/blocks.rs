use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A (component, block index) tag produced by [`parse_blocks`].
#[derive(new, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockIdx {
    /// Name of the component the index applies to.
    pub name: String,
    /// Block index within the component.
    pub index: usize,
}

/// Parses a comma-separated list of block indices into tags named `name`.
///
/// Segments are trimmed; empty segments are skipped silently, and duplicates
/// collapse into the set. A segment that does not parse as an integer fails
/// with [`Error::BlockIndex`](crate::Error::BlockIndex).
pub fn parse_blocks(name: &str, s: &str) -> Result<BTreeSet<BlockIdx>> {
    s.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| Ok(BlockIdx::new(name.to_owned(), segment.parse()?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(name: &str, indices: &[usize]) -> BTreeSet<BlockIdx> {
        indices
            .iter()
            .map(|i| BlockIdx::new(name.to_owned(), *i))
            .collect()
    }

    #[test]
    fn duplicates_collapse() {
        let parsed = parse_blocks("input", "1, 2, 2, 3").unwrap();
        assert_eq!(parsed, tags("input", &[1, 2, 3]));
    }

    #[test]
    fn empty_string_is_empty_set() {
        assert_eq!(parse_blocks("x", "").unwrap(), BTreeSet::new());
    }

    #[test]
    fn empty_segments_are_skipped() {
        let parsed = parse_blocks("output", " 4 ,, 5 , ").unwrap();
        assert_eq!(parsed, tags("output", &[4, 5]));
    }

    #[test]
    fn malformed_segment_fails() {
        assert!(parse_blocks("input", "1, x, 3").is_err());
    }
}
