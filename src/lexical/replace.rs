use crate::keyword::{continues_identifier, follows_identifier};

/// Replaces every occurrence of `from`, scanning left to right without overlaps.
/// Replaced text is never scanned again.
pub fn replace_substring(text: &str, from: &str, to: &str) -> String {
    replace_matches(text, from, to, |_, _| true)
}

/// Like [`replace_substring`], but only replaces occurrences that form a whole token,
/// so `vec2` matches in `vec2 a` but not in `ivec2 a` or `vec2x`.
pub fn replace_token(text: &str, from: &str, to: &str) -> String {
    replace_matches(text, from, to, |start, end| {
        !follows_identifier(text, start) && !continues_identifier(text, end)
    })
}

fn replace_matches(
    text: &str,
    from: &str,
    to: &str,
    accept: impl Fn(usize, usize) -> bool,
) -> String {
    if from.is_empty() {
        return text.to_string();
    }
    let mut result = String::with_capacity(text.len());
    let mut source_index = 0;
    for (start, _) in text.match_indices(from) {
        let end = start + from.len();
        if !accept(start, end) {
            continue;
        }
        result.push_str(&text[source_index..start]);
        result.push_str(to);
        source_index = end;
    }
    result.push_str(&text[source_index..]);
    result
}
