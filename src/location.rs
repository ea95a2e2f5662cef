//! Offset/position conversion and LSP location building.
//!
//! LSP positions are 0-based line/character pairs while the parser hands
//! out absolute byte offsets and widths. A [`LineIndex`] records every
//! line start once per file so each conversion is a binary search instead
//! of a rescan of the text.

use tower_lsp::lsp_types::{Location, Position, Range, Url};

use crate::types::SourceNode;

/// Byte offsets of every line start in a file, in ascending order.
///
/// Columns are byte columns. LSP specifies UTF-16 code units, but like
/// the rest of the server we treat characters as single-byte, which is
/// sufficient for most PHP code.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
    text_len: u32,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        Self {
            line_starts,
            text_len: text.len() as u32,
        }
    }

    /// Convert an absolute byte offset into a 0-based line/character pair.
    ///
    /// # Panics
    ///
    /// Offsets come from a well-formed parse of the indexed text; an
    /// offset past the end of the text is a contract violation and
    /// panics rather than being papered over.
    pub fn position_at(&self, offset: u32) -> Position {
        assert!(
            offset <= self.text_len,
            "offset {} out of bounds for text of length {}",
            offset,
            self.text_len
        );
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Position {
            line: line as u32,
            character: offset - self.line_starts[line],
        }
    }

    /// Convert a 0-based line/character pair back into a byte offset.
    ///
    /// # Panics
    ///
    /// Panics when the position does not address a point inside the
    /// indexed text.
    pub fn offset_at(&self, position: Position) -> u32 {
        let line = position.line as usize;
        assert!(
            line < self.line_starts.len(),
            "line {} out of bounds ({} lines)",
            line,
            self.line_starts.len()
        );
        let offset = self.line_starts[line] + position.character;
        assert!(
            offset <= self.text_len,
            "position {:?} addresses offset {} past end of text ({})",
            position,
            offset,
            self.text_len
        );
        offset
    }
}

/// Builds protocol [`Location`] values for nodes of a single file.
#[derive(Debug, Clone)]
pub struct LocationBuilder {
    index: LineIndex,
}

impl LocationBuilder {
    pub fn new(text: &str) -> Self {
        Self {
            index: LineIndex::new(text),
        }
    }

    /// The range covering `width` bytes starting at `offset`.
    pub fn range_for(&self, offset: u32, width: u32) -> Range {
        Range {
            start: self.index.position_at(offset),
            end: self.index.position_at(offset + width),
        }
    }

    /// The location of a node, derived from its offset and width.
    pub fn from_node(&self, node: &SourceNode) -> Location {
        Self::from_range(node.uri.clone(), self.range_for(node.offset, node.width))
    }

    /// Wrap an already-computed range into a location.
    pub fn from_range(uri: Url, range: Range) -> Location {
        Location { uri, range }
    }
}
