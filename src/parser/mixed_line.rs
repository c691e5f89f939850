use crate::error::ParseErrorKind;
use crate::keyword::Keyword;

/// A piece of a line with several language markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Segment<'a> {
    /// `None` for the code in front of the first marker.
    pub keyword: Option<Keyword>,
    pub text: &'a str,
}

/// Splits a line such as `#hlsl float4 a; #glsl vec4 a;` into one segment per marker.
///
/// Returns `None` when the line is not a mixed line: it needs either a `#both`
/// marker or at least two language markers. Every marker may appear once, and
/// every marker must be followed by some code.
pub(crate) fn split_mixed_line(line: &str) -> Result<Option<Vec<Segment<'_>>>, ParseErrorKind> {
    let mut markers = vec![];
    for keyword in Keyword::LANGUAGE_MARKERS {
        let positions = keyword.find_all(line);
        if positions.len() > 1 {
            return Err(ParseErrorKind::RepeatedKeyword {
                keyword: keyword.text(),
                line: line.to_string(),
            });
        }
        markers.extend(positions.into_iter().map(|position| (position, keyword)));
    }
    let has_both = markers.iter().any(|(_, keyword)| *keyword == Keyword::Both);
    if markers.len() < 2 && !has_both {
        return Ok(None);
    }
    markers.sort_unstable_by_key(|(position, _)| *position);

    let mut segments = vec![];
    let leading = &line[..markers[0].0];
    if !leading.trim().is_empty() {
        segments.push(Segment {
            keyword: None,
            text: leading,
        });
    }
    for (i, (position, keyword)) in markers.iter().enumerate() {
        let start = position + keyword.text().len();
        let end = markers
            .get(i + 1)
            .map_or(line.len(), |(next_position, _)| *next_position);
        let text = &line[start..end];
        if text.trim().is_empty() {
            return Err(ParseErrorKind::EmptyKeywordSegment {
                keyword: keyword.text(),
                line: line.to_string(),
            });
        }
        segments.push(Segment {
            keyword: Some(*keyword),
            text,
        });
    }
    Ok(Some(segments))
}
