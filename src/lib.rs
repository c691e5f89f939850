//! Preprocessor for shader sources written once for both GLSL and HLSL.
//!
//! A combined source is plain code that both languages understand, plus `#glsl`/`#hlsl`
//! blocks and markers for the parts that differ. Parsing a file resolves its `#include`s,
//! keeps only the code for the requested language and assigns binding indices written as `?`.

pub mod bindings;
pub mod error;
pub mod keyword;
pub mod language;
pub mod lexical;
pub mod parser;
mod rewriter;

use std::path::PathBuf;

pub use error::{ErrorCategory, ParseError, ParseErrorKind};
pub use language::ShaderLanguage;
pub use parser::ParseRequest;

/// Turns a combined source file into GLSL.
/// Wildcard bindings are numbered starting at `base_binding_index`.
pub fn parse_glsl(
    path: impl Into<PathBuf>,
    base_binding_index: u32,
    include_directories: &[PathBuf],
) -> Result<String, ParseError> {
    ParseRequest::new(path, ShaderLanguage::Glsl)
        .with_base_binding_index(base_binding_index)
        .with_include_directories(include_directories.iter().cloned())
        .parse()
}

/// Turns a combined source file into HLSL.
/// Wildcard registers are numbered from 0 in every register type and space.
pub fn parse_hlsl(
    path: impl Into<PathBuf>,
    include_directories: &[PathBuf],
) -> Result<String, ParseError> {
    ParseRequest::new(path, ShaderLanguage::Hlsl)
        .with_include_directories(include_directories.iter().cloned())
        .parse()
}
