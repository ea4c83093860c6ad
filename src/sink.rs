//! The fragment sink: where streamed answer renders go.
//!
//! The upstream behavior had two interchangeable streaming styles, a
//! per-token callback handler and a lazy chain consumed in a loop. Both
//! reduce to one code path here: the controller pulls fragments from the
//! gateway stream and pushes renders into a [`FragmentSink`]. A plain
//! closure satisfies the sink interface; no handler subclassing.

/// Marker appended to partial renders to mimic a text cursor.
pub const CURSOR_MARKER: &str = "▌";

/// Receives successive renders of one streaming answer.
///
/// Partial renders carry the full accumulated text with a trailing
/// [`CURSOR_MARKER`]; the final render carries the finished answer without
/// it. Renders arrive in fragment order.
pub trait FragmentSink: Send {
    fn render_partial(&mut self, text: &str);
    fn render_final(&mut self, text: &str);
}

/// Any `FnMut(&str, bool)` closure is a sink; the bool is true for the
/// final render.
impl<F> FragmentSink for F
where
    F: FnMut(&str, bool) + Send,
{
    fn render_partial(&mut self, text: &str) {
        self(text, false)
    }

    fn render_final(&mut self, text: &str) {
        self(text, true)
    }
}

/// Accumulates answer fragments in arrival order for one in-flight request.
#[derive(Debug, Default)]
pub struct StreamingBuffer {
    text: String,
}

impl StreamingBuffer {
    pub fn push(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    /// The accumulated text with the cursor marker appended.
    pub fn rendered(&self) -> String {
        format!("{}{}", self.text, CURSOR_MARKER)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
