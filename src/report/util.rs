//! Line-oriented output helpers shared by the report formatters.

use std::fmt::{self, Write};

/// Default indent unit: four spaces.
pub(crate) const TAB: &str = "    ";

/// Horizontal rule used under section titles and statistics headers.
pub(crate) const UNDERLINE: &str = "*************************************";

/// Accumulates report lines into a caller-provided sink, prefixing each
/// line with `depth` copies of the configured indent unit.
pub(crate) struct ReportBuffer<'a> {
    out: &'a mut dyn Write,
    indent: &'a str,
}

impl<'a> ReportBuffer<'a> {
    pub(crate) fn new(out: &'a mut dyn Write, indent: &'a str) -> Self {
        Self { out, indent }
    }

    /// Write one line at the given depth.
    pub(crate) fn line(&mut self, depth: usize, text: impl AsRef<str>) -> fmt::Result {
        for _ in 0..depth {
            self.out.write_str(self.indent)?;
        }
        self.out.write_str(text.as_ref())?;
        self.out.write_char('\n')
    }

    /// Write an empty separator line.
    pub(crate) fn blank(&mut self) -> fmt::Result {
        self.out.write_char('\n')
    }
}

/// Displayed frequencies are truncated toward zero, not rounded.
pub(crate) fn truncate_frequency(frequency: f64) -> i64 {
    frequency as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequencies_truncate_toward_zero() {
        assert_eq!(truncate_frequency(7.9), 7);
        assert_eq!(truncate_frequency(3.2), 3);
        assert_eq!(truncate_frequency(0.999), 0);
        assert_eq!(truncate_frequency(-2.7), -2);
    }

    #[test]
    fn lines_carry_depth_times_indent() {
        let mut out = String::new();
        let mut buf = ReportBuffer::new(&mut out, "  ");
        buf.line(0, "a").unwrap();
        buf.line(2, "b").unwrap();
        buf.blank().unwrap();
        assert_eq!(out, "a\n    b\n\n");
    }
}
