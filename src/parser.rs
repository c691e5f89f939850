#[cfg(feature = "additional_constants")]
mod constants;
mod include;
mod keyword_block;
mod lines;
mod mixed_line;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::bindings::{BindingAllocator, BindingScanner};
use crate::error::{ParseError, ParseErrorKind};
use crate::keyword::Keyword;
use crate::language::ShaderLanguage;
use crate::lexical::{convert_glsl_to_hlsl, convert_hlsl_to_glsl};
#[cfg(feature = "additional_constants")]
use constants::AdditionalConstants;
use include::{parse_include_directive, resolve_include};
use keyword_block::extract_block;
use lines::SourceLines;
use mixed_line::{split_mixed_line, Segment};

/// Everything needed to turn one combined source file into a single language.
#[derive(Debug, Clone)]
pub struct ParseRequest {
    path: PathBuf,
    language: ShaderLanguage,
    base_binding_index: u32,
    include_directories: Vec<PathBuf>,
}

impl ParseRequest {
    pub fn new(path: impl Into<PathBuf>, language: ShaderLanguage) -> Self {
        Self {
            path: path.into(),
            language,
            base_binding_index: 0,
            include_directories: vec![],
        }
    }

    /// First index handed out for `binding = ?`. Only used for GLSL.
    pub fn with_base_binding_index(mut self, base_binding_index: u32) -> Self {
        self.base_binding_index = base_binding_index;
        self
    }

    /// Adds a directory to search for included files that are not next to the including file.
    pub fn with_include_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.include_directories.push(directory.into());
        self
    }

    pub fn with_include_directories<P: Into<PathBuf>>(
        mut self,
        directories: impl IntoIterator<Item = P>,
    ) -> Self {
        self.include_directories
            .extend(directories.into_iter().map(Into::into));
        self
    }

    /// Parses the file and all of its includes.
    /// On success, returns the complete source code in the requested language.
    pub fn parse(&self) -> Result<String, ParseError> {
        let traversal = FileTraversal {
            language: self.language,
            scanner: BindingScanner::new(self.language),
            include_directories: &self.include_directories,
        };
        let mut state = TraversalState::default();
        let code = traversal.parse_file(&self.path, &mut state)?;
        traversal
            .finalize(code, &mut state, self.base_binding_index)
            .map_err(|kind| ParseError::new(kind, &self.path))
    }
}

/// State shared by every file of one include tree.
#[derive(Default)]
struct TraversalState {
    allocator: BindingAllocator,
    #[cfg(feature = "additional_constants")]
    constants: AdditionalConstants,
    /// Canonical paths of the files currently being parsed, outermost first.
    include_stack: Vec<PathBuf>,
}

struct FileTraversal<'r> {
    language: ShaderLanguage,
    scanner: BindingScanner,
    include_directories: &'r [PathBuf],
}

impl FileTraversal<'_> {
    fn parse_file(&self, path: &Path, state: &mut TraversalState) -> Result<String, ParseError> {
        let in_file = |kind: ParseErrorKind| ParseError::new(kind, path);

        if !path.exists() {
            return Err(in_file(ParseErrorKind::FileNotFound));
        }
        if !path.is_file() {
            return Err(in_file(ParseErrorKind::NotAFile));
        }
        if path
            .parent()
            .map_or(true, |parent| parent.as_os_str().is_empty())
        {
            return Err(in_file(ParseErrorKind::NoParentPath));
        }

        let canonical_path = path
            .canonicalize()
            .map_err(|error| in_file(ParseErrorKind::CantOpenFile(error)))?;
        if state.include_stack.contains(&canonical_path) {
            return Err(in_file(ParseErrorKind::RecursiveInclude {
                path: canonical_path,
            }));
        }
        let source = std::fs::read_to_string(path)
            .map_err(|error| in_file(ParseErrorKind::CantOpenFile(error)))?;

        debug!(path = %path.display(), depth = state.include_stack.len(), "parsing file");
        state.include_stack.push(canonical_path);
        let result = self.parse_source(path, &source, state);
        state.include_stack.pop();
        result
    }

    fn parse_source(
        &self,
        path: &Path,
        source: &str,
        state: &mut TraversalState,
    ) -> Result<String, ParseError> {
        let in_file = |kind: ParseErrorKind| ParseError::new(kind, path);
        let mut output = String::with_capacity(source.len());
        let mut lines = SourceLines::new(source);

        while let Some(line) = lines.next_line() {
            #[cfg(feature = "additional_constants")]
            if self
                .process_additional_constants(line, &mut lines, &mut output, state)
                .map_err(in_file)?
            {
                continue;
            }

            if let Some(segments) = split_mixed_line(line).map_err(in_file)? {
                self.process_mixed_line(&segments, &mut output, state)
                    .map_err(in_file)?;
                continue;
            }

            if self
                .process_language_block(line, &mut lines, &mut output, state)
                .map_err(in_file)?
            {
                continue;
            }

            if let Some(include) = parse_include_directive(line).map_err(in_file)? {
                let included_path =
                    resolve_include(include, path, self.include_directories).map_err(in_file)?;
                debug!(
                    include,
                    resolved = %included_path.display(),
                    "resolved include"
                );
                let included = self.parse_file(&included_path, state)?;
                output.push_str(&included);
                continue;
            }

            let code = self.convert_neutral(line);
            self.emit_line(&code, &mut output, state)
                .map_err(in_file)?;
        }

        Ok(output)
    }

    /// Handles `#additional_*_constants`. Returns `true` if the line was consumed.
    #[cfg(feature = "additional_constants")]
    fn process_additional_constants<'a>(
        &self,
        line: &'a str,
        lines: &mut SourceLines<'a>,
        output: &mut String,
        state: &mut TraversalState,
    ) -> Result<bool, ParseErrorKind> {
        let Some((keyword, position)) = Keyword::ADDITIONAL_CONSTANTS
            .into_iter()
            .find_map(|keyword| keyword.find(line).map(|position| (keyword, position)))
        else {
            return Ok(false);
        };

        self.emit_leading_code(&line[..position], output, state)?;

        // Blocks for the other language are still consumed, just not kept.
        let keep = AdditionalConstants::applies_to(keyword, self.language);
        let convert = keep
            && keyword == Keyword::AdditionalShaderConstants
            && self.language == ShaderLanguage::Hlsl;
        extract_block(keyword, line, position, lines, |body| {
            if keep {
                let body = if convert {
                    convert_glsl_to_hlsl(body)
                } else {
                    body.to_string()
                };
                debug!(%keyword, body = body.as_str(), "buffered additional constants");
                state.constants.push(body);
            }
            Ok(())
        })?;
        Ok(true)
    }

    /// Handles `#glsl` and `#hlsl` blocks. Returns `true` if the line was consumed.
    fn process_language_block<'a>(
        &self,
        line: &'a str,
        lines: &mut SourceLines<'a>,
        output: &mut String,
        state: &mut TraversalState,
    ) -> Result<bool, ParseErrorKind> {
        let Some((keyword, position)) = [Keyword::Glsl, Keyword::Hlsl]
            .into_iter()
            .find_map(|keyword| keyword.find(line).map(|position| (keyword, position)))
        else {
            return Ok(false);
        };

        self.emit_leading_code(&line[..position], output, state)?;

        let keep = self.language.accepts(keyword);
        extract_block(keyword, line, position, lines, |body| {
            if keep {
                self.emit_line(body, output, state)?;
            }
            Ok(())
        })?;
        Ok(true)
    }

    /// Emits the segments of a mixed line meant for this language as a single line.
    fn process_mixed_line(
        &self,
        segments: &[Segment<'_>],
        output: &mut String,
        state: &mut TraversalState,
    ) -> Result<(), ParseErrorKind> {
        let mut code = String::new();
        for segment in segments {
            match segment.keyword {
                None => code.push_str(&self.convert_neutral(segment.text)),
                Some(Keyword::Both) => {
                    code.push_str(&self.convert_neutral(segment.text.trim_start()))
                }
                Some(keyword) if self.language.accepts(keyword) => {
                    code.push_str(segment.text.trim_start())
                }
                Some(_) => {}
            }
        }
        self.emit_line(code.trim_end(), output, state)
    }

    /// Code outside of language blocks is written in GLSL, with `mul` for matrix products.
    fn convert_neutral(&self, code: &str) -> String {
        match self.language {
            ShaderLanguage::Glsl => convert_hlsl_to_glsl(code),
            ShaderLanguage::Hlsl => convert_glsl_to_hlsl(code),
        }
    }

    /// Code in front of a block keyword on the same line is neutral code.
    fn emit_leading_code(
        &self,
        leading: &str,
        output: &mut String,
        state: &mut TraversalState,
    ) -> Result<(), ParseErrorKind> {
        let leading = leading.trim_end();
        if leading.trim_start().is_empty() {
            return Ok(());
        }
        let code = self.convert_neutral(leading);
        self.emit_line(&code, output, state)
    }

    /// Registers the hardcoded binding indices of a line and appends it to the output.
    fn emit_line(
        &self,
        code: &str,
        output: &mut String,
        state: &mut TraversalState,
    ) -> Result<(), ParseErrorKind> {
        for site in self.scanner.scan(code)? {
            state.allocator.register_site(&site);
        }
        output.push_str(code);
        output.push('\n');
        Ok(())
    }

    /// Runs once on the merged output of the whole include tree.
    fn finalize(
        &self,
        mut code: String,
        state: &mut TraversalState,
        base_binding_index: u32,
    ) -> Result<String, ParseErrorKind> {
        if state.allocator.wildcard_found() {
            debug!(language = %self.language, base_binding_index, "assigning binding indices");
            code = state
                .allocator
                .assign_wildcards(&code, self.scanner, base_binding_index)?;
        }

        #[cfg(feature = "additional_constants")]
        if !state.constants.is_empty() {
            code = state.constants.inject(&code, self.language)?;
        }

        Ok(code)
    }
}
