use core::fmt;

use heapless::String;

/// Fixed capacity text line for a character display.
///
/// Writes past the capacity are dropped instead of failing, so a formatted
/// reading that does not fit simply gets cut at the screen edge.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer<const N: usize> {
    text: String<N>,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }
}

impl<const N: usize> fmt::Write for LineBuffer<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.text.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn test_line_buffer_truncates() {
        let mut line = LineBuffer::<8>::new();
        write!(line, "A:{}ma B:{}ma", 1000, 20).unwrap();
        assert_eq!(line.as_str(), "A:1000ma");

        // Further writes are dropped
        write!(line, "ok").unwrap();
        assert_eq!(line.as_str(), "A:1000ma");
    }

    #[test]
    fn test_line_buffer_keeps_multibyte_chars_whole() {
        let mut line = LineBuffer::<4>::new();
        write!(line, "a\u{b5}bc").unwrap();
        assert_eq!(line.as_str(), "a\u{b5}b");
    }
}
