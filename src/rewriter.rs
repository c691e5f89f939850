use crate::bindings::Span;

/// Builds a new string out of `source` by replacing a sequence of ranges.
/// Ranges must be handed over in increasing, non-overlapping order.
pub(crate) struct StringRewriter<'a> {
    source: &'a str,
    result: String,
    source_index: usize,
}

impl<'a> StringRewriter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            result: String::with_capacity(source.len()),
            source_index: 0,
        }
    }

    pub fn replace_span(&mut self, span: Span, new_value: &str) {
        debug_assert!(span.start >= self.source_index, "spans must be sorted");
        self.result
            .push_str(&self.source[self.source_index..span.start]);
        self.source_index = span.end;
        self.result.push_str(new_value);
    }

    pub fn finish(mut self) -> String {
        self.result.push_str(&self.source[self.source_index..]);
        self.result
    }
}
