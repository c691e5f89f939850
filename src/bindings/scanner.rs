use std::ops::Range;

use winnow::{
    ascii::{digit1, space0},
    combinator::{alt, cut_err, opt, preceded},
    error::{ContextError, ErrMode, StrContext},
    token::one_of,
    Located, PResult, Parser,
};

use super::{BindingNamespace, BindingSite, RegisterType, SlotIndex, Span};
use crate::error::ParseErrorKind;
use crate::keyword::{code_part, continues_identifier, follows_identifier};
use crate::language::ShaderLanguage;

pub type ScannerInput<'a> = Located<&'a str>;

/// Finds binding declarations of one language in a piece of text.
/// The scanner only reports what it finds, rewriting is left to the caller.
#[derive(Debug, Copy, Clone)]
pub struct BindingScanner {
    language: ShaderLanguage,
}

struct RawRegister {
    register: char,
    index: SlotIndex,
    index_span: Range<usize>,
    space: Option<SlotIndex>,
}

impl BindingScanner {
    pub fn new(language: ShaderLanguage) -> Self {
        Self { language }
    }

    /// Every binding site in `text`, in order of appearance.
    /// Spans are byte offsets into `text`. Line comments are skipped.
    pub fn scan(&self, text: &str) -> Result<Vec<BindingSite>, ParseErrorKind> {
        let mut sites = vec![];
        let mut line_start = 0;
        for line in text.split_inclusive('\n') {
            let code = code_part(line);
            match self.language {
                ShaderLanguage::Glsl => Self::scan_glsl_line(line, code, line_start, &mut sites)?,
                ShaderLanguage::Hlsl => Self::scan_hlsl_line(line, code, line_start, &mut sites)?,
            }
            line_start += line.len();
        }
        Ok(sites)
    }

    fn scan_glsl_line(
        line: &str,
        code: &str,
        line_start: usize,
        sites: &mut Vec<BindingSite>,
    ) -> Result<(), ParseErrorKind> {
        for position in token_positions(code, "binding") {
            let input = Located::new(&code[position..]);
            match Self::glsl_binding.parse_peek(input) {
                Ok((_, (index, index_span))) => sites.push(BindingSite {
                    namespace: BindingNamespace::Glsl,
                    index,
                    index_span: Span::from(index_span).shifted(line_start + position),
                }),
                Err(ErrMode::Backtrack(_)) => {}
                Err(error) => {
                    return Err(ParseErrorKind::MalformedBinding {
                        line: line.trim().to_string(),
                        reason: failure_reason(error),
                    })
                }
            }
        }
        Ok(())
    }

    fn scan_hlsl_line(
        line: &str,
        code: &str,
        line_start: usize,
        sites: &mut Vec<BindingSite>,
    ) -> Result<(), ParseErrorKind> {
        for position in token_positions(code, "register") {
            let input = Located::new(&code[position..]);
            let raw = match Self::hlsl_register.parse_peek(input) {
                Ok((_, raw)) => raw,
                // `register` without a `(`, not a register binding
                Err(ErrMode::Backtrack(_)) => continue,
                Err(error) => {
                    return Err(ParseErrorKind::MalformedRegister {
                        line: line.trim().to_string(),
                        reason: failure_reason(error),
                    })
                }
            };

            let register = RegisterType::from_char(raw.register).ok_or_else(|| {
                ParseErrorKind::UnsupportedRegisterType {
                    register: raw.register,
                    line: line.trim().to_string(),
                }
            })?;
            let space = match raw.space {
                None => 0,
                Some(SlotIndex::Explicit(space)) => space,
                Some(SlotIndex::Wildcard) => {
                    return Err(ParseErrorKind::RegisterSpaceWildcard {
                        line: line.trim().to_string(),
                    })
                }
            };
            sites.push(BindingSite {
                namespace: BindingNamespace::Hlsl { register, space },
                index: raw.index,
                index_span: Span::from(raw.index_span).shifted(line_start + position),
            });
        }
        Ok(())
    }

    /// `binding = N` or `binding = ?`
    fn glsl_binding(input: &mut ScannerInput<'_>) -> PResult<(SlotIndex, Range<usize>)> {
        let _ = ("binding", space0).parse_next(input)?;
        let _ = cut_err('=')
            .context(StrContext::Label("found `binding` keyword but no `=` after it"))
            .parse_next(input)?;
        let _ = space0.parse_next(input)?;
        cut_err(slot_index.with_span())
            .context(StrContext::Label("expected a number or `?` after `binding =`"))
            .parse_next(input)
    }

    /// `register(Xn)` or `register(Xn, spaceM)`, where `n` may be `?`
    fn hlsl_register(input: &mut ScannerInput<'_>) -> PResult<RawRegister> {
        let _ = ("register", space0, '(', space0).parse_next(input)?;
        let register = cut_err(one_of(|c: char| c.is_ascii_alphabetic()))
            .context(StrContext::Label("expected register type after `register(`"))
            .parse_next(input)?;
        let (index, index_span) = cut_err(slot_index.with_span())
            .context(StrContext::Label("expected a number or `?` after register type"))
            .parse_next(input)?;
        let _ = space0.parse_next(input)?;
        let space = opt(preceded(
            (',', space0, "space"),
            cut_err(slot_index)
                .context(StrContext::Label("found register `space` keyword but no digit after it")),
        ))
        .parse_next(input)?;
        let _ = (space0, cut_err(')'))
            .context(StrContext::Label("expected `)` after register"))
            .parse_next(input)?;
        Ok(RawRegister {
            register,
            index,
            index_span,
            space,
        })
    }
}

fn slot_index(input: &mut ScannerInput<'_>) -> PResult<SlotIndex> {
    alt((
        '?'.value(SlotIndex::Wildcard),
        digit1.try_map(str::parse::<u32>).map(SlotIndex::Explicit),
    ))
    .parse_next(input)
}

/// Offsets of `word` in `code` where it stands as a whole token.
fn token_positions<'a>(code: &'a str, word: &'a str) -> impl Iterator<Item = usize> + 'a {
    code.match_indices(word)
        .map(|(position, _)| position)
        .filter(move |position| {
            !follows_identifier(code, *position) && !continues_identifier(code, position + word.len())
        })
}

fn failure_reason(error: ErrMode<ContextError>) -> &'static str {
    const FALLBACK: &str = "unexpected syntax";
    match error {
        ErrMode::Backtrack(error) | ErrMode::Cut(error) => error
            .context()
            .find_map(|context| match context {
                StrContext::Label(label) => Some(*label),
                _ => None,
            })
            .unwrap_or(FALLBACK),
        ErrMode::Incomplete(_) => FALLBACK,
    }
}
