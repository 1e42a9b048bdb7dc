//! Line lookup for byte offsets.
//!
//! Configuration diagnostics are reported by line number, the way device
//! CLIs and `show running-config` output are read by operators. Lines are
//! 1-based; columns are 0-based byte offsets within the line.

use text_size::TextSize;

/// A resolved position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    /// 1-based line number.
    pub line: u32,
    /// 0-based byte column.
    pub col: u32,
}

/// Precomputed line starts for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(offset as u32 + 1));
            }
        }
        Self {
            line_starts,
            len: TextSize::new(text.len() as u32),
        }
    }

    /// Resolve an offset. Offsets past the end clamp to the last position.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let col = offset - self.line_starts[line];
        LineCol {
            line: line as u32 + 1,
            col: col.into(),
        }
    }

    /// 1-based line containing `offset`.
    pub fn line(&self, offset: TextSize) -> u32 {
        self.line_col(offset).line
    }

    /// Number of lines, counting a trailing partial line.
    pub fn line_count(&self) -> usize {
        match self.line_starts.last() {
            Some(last) if *last == self.len && self.line_starts.len() > 1 => {
                self.line_starts.len() - 1
            }
            _ => self.line_starts.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line_is_one() {
        let index = LineIndex::new("hostname r1\n");
        assert_eq!(index.line(TextSize::new(0)), 1);
        assert_eq!(index.line(TextSize::new(5)), 1);
    }

    #[test]
    fn test_line_after_newline() {
        let index = LineIndex::new("a\nbb\nccc");
        assert_eq!(index.line_col(TextSize::new(2)), LineCol { line: 2, col: 0 });
        assert_eq!(index.line_col(TextSize::new(6)), LineCol { line: 3, col: 1 });
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let index = LineIndex::new("a\nb");
        assert_eq!(index.line(TextSize::new(100)), 2);
    }

    #[test]
    fn test_line_count() {
        assert_eq!(LineIndex::new("a\nb\n").line_count(), 2);
        assert_eq!(LineIndex::new("a\nb").line_count(), 2);
        assert_eq!(LineIndex::new("").line_count(), 1);
    }
}
