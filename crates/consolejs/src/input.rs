/// What a single console line did to the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAction {
    /// A non-blank line was appended to the block.
    Buffered,
    /// A first blank line; one more submits the block.
    BlankPending,
    /// A second consecutive blank line. Carries the block text, which may be
    /// empty when nothing was typed before the blank lines.
    Submit(String),
}

/// Accumulates console lines into a block of source text.
///
/// A block is complete after two consecutive blank (or whitespace-only) lines.
/// Non-blank lines are joined with `\n` in the order received; blank lines are
/// never part of the block.
#[derive(Debug, Default)]
pub struct InputBuffer {
    text: String,
    blank_pending: bool,
}

impl InputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one line into the buffer.
    ///
    /// On `LineAction::Submit` the buffer has already been emptied and the
    /// pending-blank marker cleared.
    pub fn push_line(&mut self, line: &str) -> LineAction {
        if line.trim().is_empty() {
            if self.blank_pending {
                self.blank_pending = false;
                return LineAction::Submit(std::mem::take(&mut self.text));
            }
            self.blank_pending = true;
            return LineAction::BlankPending;
        }

        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(line);
        self.blank_pending = false;
        LineAction::Buffered
    }

    /// The accumulated, not yet submitted text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_blank_pending(&self) -> bool {
        self.blank_pending
    }

    /// Empties the buffer and clears the pending-blank marker.
    pub fn clear(&mut self) {
        self.text.clear();
        self.blank_pending = false;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn joins_lines_with_newlines_on_double_blank() {
        let mut input = InputBuffer::new();
        assert_eq!(input.push_line("let a = 1;"), LineAction::Buffered);
        assert_eq!(input.push_line("  a + 1"), LineAction::Buffered);
        assert_eq!(input.push_line(""), LineAction::BlankPending);
        assert_eq!(
            input.push_line("   "),
            LineAction::Submit("let a = 1;\n  a + 1".to_owned())
        );
        assert_eq!(input.text(), "");
        assert!(!input.is_blank_pending());
    }

    #[test]
    fn single_blank_between_lines_is_dropped() {
        let mut input = InputBuffer::new();
        input.push_line("a");
        assert_eq!(input.push_line("\t"), LineAction::BlankPending);
        assert_eq!(input.push_line("b"), LineAction::Buffered);
        assert!(!input.is_blank_pending());
        assert_eq!(input.text(), "a\nb");
    }

    #[test]
    fn double_blank_on_empty_buffer_submits_nothing() {
        let mut input = InputBuffer::new();
        input.push_line("");
        assert_eq!(input.push_line(""), LineAction::Submit(String::new()));
    }

    #[test]
    fn third_blank_starts_a_new_pending_pair() {
        let mut input = InputBuffer::new();
        input.push_line("x");
        input.push_line("");
        input.push_line("");
        assert_eq!(input.push_line(""), LineAction::BlankPending);
    }
}
