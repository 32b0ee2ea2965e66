//! The append-only transcript.

use chatdesk_models::DisplayBubble;

/// Ordered, append-only sequence of bubbles, oldest first.
///
/// There is no removal, reordering or deduplication: the transcript is
/// exactly the user inputs interleaved with the responses in the order they
/// were appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    bubbles: Vec<DisplayBubble>,
}

impl Transcript {
    /// An empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one bubble.
    pub fn push(&mut self, bubble: DisplayBubble) {
        self.bubbles.push(bubble);
    }

    /// Append several bubbles, keeping their order.
    pub fn extend(&mut self, bubbles: impl IntoIterator<Item = DisplayBubble>) {
        self.bubbles.extend(bubbles);
    }

    /// All bubbles, oldest first.
    pub fn bubbles(&self) -> &[DisplayBubble] {
        &self.bubbles
    }

    /// Bubbles appended at or after `index`.
    ///
    /// The one-shot CLI uses this to print only what an operation added.
    pub fn since(&self, index: usize) -> &[DisplayBubble] {
        self.bubbles.get(index..).unwrap_or_default()
    }

    /// Number of bubbles.
    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    /// `true` if nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    /// The newest bubble.
    pub fn last(&self) -> Option<&DisplayBubble> {
        self.bubbles.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_append_order_and_duplicates() {
        let mut t = Transcript::new();
        t.push(DisplayBubble::me("hi"));
        t.push(DisplayBubble::me("hi"));
        t.extend([DisplayBubble::bot("a"), DisplayBubble::bot("b")]);

        let texts: Vec<_> = t.bubbles().iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["hi", "hi", "a", "b"]);
        assert_eq!(t.last(), Some(&DisplayBubble::bot("b")));
    }

    #[test]
    fn since_returns_tail() {
        let mut t = Transcript::new();
        t.push(DisplayBubble::bot("greeting"));
        let mark = t.len();
        t.push(DisplayBubble::me("ping"));
        assert_eq!(t.since(mark), &[DisplayBubble::me("ping")]);
        assert!(t.since(10).is_empty());
    }
}
