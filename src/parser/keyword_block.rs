use tracing::trace;

use super::lines::SourceLines;
use crate::error::ParseErrorKind;
use crate::keyword::{code_part, Keyword};

/// Hands the body of a keyword to `process_body`, one line at a time.
///
/// `keyword_position` is where `keyword` starts in `line`. Three forms are understood:
///
/// ```text
/// #keyword CODE     // single line
///
/// #keyword{         // curly bracket on the same line
///     CODE
/// }
///
/// #keyword          // curly bracket on the next line
/// {
///     CODE
/// }
/// ```
///
/// Braces inside the body are counted, so nested scopes do not end the block early.
pub(crate) fn extract_block<'a>(
    keyword: Keyword,
    line: &'a str,
    keyword_position: usize,
    lines: &mut SourceLines<'a>,
    mut process_body: impl FnMut(&'a str) -> Result<(), ParseErrorKind>,
) -> Result<(), ParseErrorKind> {
    let after_keyword = line[keyword_position + keyword.text().len()..].trim_start();

    let block_start = if let Some(block_start) = after_keyword.strip_prefix('{') {
        block_start
    } else if !after_keyword.trim_end().is_empty() {
        trace!(%keyword, line = lines.line_number(), "single line keyword");
        return process_body(after_keyword.trim_end());
    } else {
        let next_line = lines.next_line().ok_or(ParseErrorKind::UnexpectedEndOfFile {
            keyword: keyword.text(),
        })?;
        next_line.trim_start().strip_prefix('{').ok_or_else(|| {
            ParseErrorKind::ExpectedCurlyBracket {
                line: next_line.to_string(),
                keyword: keyword.text(),
            }
        })?
    };
    trace!(%keyword, line = lines.line_number(), "keyword block");

    let mut depth = 0;
    let first_line = block_start.trim_start();
    if let Some(end) = closing_brace(first_line, &mut depth) {
        return process_before_brace(&first_line[..end], process_body);
    }
    if !first_line.trim_end().is_empty() {
        process_body(first_line.trim_end())?;
    }
    loop {
        let body_line = lines.next_line().ok_or(ParseErrorKind::UnexpectedEndOfFile {
            keyword: keyword.text(),
        })?;
        if let Some(end) = closing_brace(body_line, &mut depth) {
            return process_before_brace(&body_line[..end], process_body);
        }
        process_body(body_line)?;
    }
}

/// Code in front of the closing `}` still belongs to the body.
fn process_before_brace<'a>(
    text: &'a str,
    mut process_body: impl FnMut(&'a str) -> Result<(), ParseErrorKind>,
) -> Result<(), ParseErrorKind> {
    let text = text.trim_end();
    if text.trim_start().is_empty() {
        return Ok(());
    }
    process_body(text)
}

/// Finds the `}` that closes the block, updating the nesting depth with every other brace.
fn closing_brace(line: &str, depth: &mut usize) -> Option<usize> {
    for (index, c) in code_part(line).char_indices() {
        match c {
            '{' => *depth += 1,
            '}' if *depth == 0 => return Some(index),
            '}' => *depth -= 1,
            _ => {}
        }
    }
    None
}
