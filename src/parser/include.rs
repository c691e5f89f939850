use std::path::{Path, PathBuf};

use winnow::{
    ascii::space1,
    combinator::{cut_err, delimited, eof, peek},
    error::{ContextError, ErrMode},
    token::{take, take_till},
    PResult, Parser,
};

use crate::error::ParseErrorKind;
use crate::keyword::{code_part, continues_identifier, Keyword};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum IncludeSyntax {
    MissingPath,
    MissingSpace,
    MissingQuotes,
}

type IncludeError = ContextError<IncludeSyntax>;

/// Returns the quoted path of an `#include "path"` line, or `None` for any other line.
pub(crate) fn parse_include_directive(line: &str) -> Result<Option<&str>, ParseErrorKind> {
    let directive = code_part(line).trim();
    let keyword = Keyword::Include.text();
    if !directive.starts_with(keyword) || continues_identifier(directive, keyword.len()) {
        return Ok(None);
    }

    match include_directive.parse_peek(directive) {
        Ok((_, path)) => Ok(Some(path)),
        Err(ErrMode::Backtrack(error) | ErrMode::Cut(error)) => {
            let line = line.to_string();
            Err(match error.context().next() {
                Some(IncludeSyntax::MissingSpace) => ParseErrorKind::MissingSpaceAfterInclude { line },
                Some(IncludeSyntax::MissingQuotes) => ParseErrorKind::MissingIncludeQuotes { line },
                Some(IncludeSyntax::MissingPath) | None => ParseErrorKind::MissingIncludePath { line },
            })
        }
        Err(ErrMode::Incomplete(_)) => Err(ParseErrorKind::MissingIncludePath {
            line: line.to_string(),
        }),
    }
}

fn include_directive<'a>(input: &mut &'a str) -> PResult<&'a str, IncludeError> {
    let _ = "#include".parse_next(input)?;
    let _ = cut_err(peek(take(2usize)))
        .context(IncludeSyntax::MissingPath)
        .parse_next(input)?;
    let _ = cut_err(space1)
        .context(IncludeSyntax::MissingSpace)
        .parse_next(input)?;
    cut_err(delimited('"', take_till(1.., '"'), ('"', eof)))
        .context(IncludeSyntax::MissingQuotes)
        .parse_next(input)
}

/// Looks for `include` next to the including file first, then in every include directory in order.
pub(crate) fn resolve_include(
    include: &str,
    including_file: &Path,
    include_directories: &[PathBuf],
) -> Result<PathBuf, ParseErrorKind> {
    let next_to_file = including_file.parent().map(|parent| parent.join(include));
    next_to_file
        .into_iter()
        .chain(
            include_directories
                .iter()
                .map(|directory| directory.join(include)),
        )
        .find(|candidate| candidate.exists())
        .ok_or_else(|| ParseErrorKind::IncludedFileNotFound {
            include: include.to_string(),
        })
}
