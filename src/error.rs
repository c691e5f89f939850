use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::bindings::BindingNamespace;

/// A parse failure, together with the file in which it was detected.
/// Any error aborts the whole parse, no partial output is returned.
#[derive(Error, Debug)]
#[error("{kind} (file {path:?})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub path: PathBuf,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    /// Human readable message, without the file path.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The file could not be located or read.
    FileAccess,
    /// Malformed directive or binding syntax.
    Syntax,
    /// The document is well formed but cannot be resolved.
    Semantic,
}

#[derive(Error, Debug)]
pub enum ParseErrorKind {
    #[error("can't open file, it does not exist")]
    FileNotFound,
    #[error("not a file")]
    NotAFile,
    #[error("no parent path")]
    NoParentPath,
    #[error("can't open file: {0}")]
    CantOpenFile(#[source] std::io::Error),

    #[error("expected to find path after #include on line {line:?}")]
    MissingIncludePath { line: String },
    #[error("expected to find 1 empty space character after the keyword on line {line:?}")]
    MissingSpaceAfterInclude { line: String },
    #[error("expected to find open/close quotes around the included path on line {line:?}")]
    MissingIncludeQuotes { line: String },
    #[error("unable to find included file {include:?}")]
    IncludedFileNotFound { include: String },
    #[error("file {path:?} is recursively included")]
    RecursiveInclude { path: PathBuf },

    #[error("unexpected end of file while processing keyword {keyword:?}")]
    UnexpectedEndOfFile { keyword: &'static str },
    #[error("expected to find a curly bracket on line {line:?} while processing keyword {keyword:?}")]
    ExpectedCurlyBracket { line: String, keyword: &'static str },
    #[error("keyword {keyword:?} is specified more than once on line {line:?}")]
    RepeatedKeyword { keyword: &'static str, line: String },
    #[error("expected to find code after keyword {keyword:?} on line {line:?}")]
    EmptyKeywordSegment { keyword: &'static str, line: String },

    #[error("malformed binding on line {line:?}: {reason}")]
    MalformedBinding { line: String, reason: &'static str },
    #[error("malformed register on line {line:?}: {reason}")]
    MalformedRegister { line: String, reason: &'static str },
    #[error("unsupported register type {register:?} on line {line:?}")]
    UnsupportedRegisterType { register: char, line: String },
    #[error("automatically assigned register space is not supported (line {line:?})")]
    RegisterSpaceWildcard { line: String },
    #[error("no free binding index left for {namespace}")]
    BindingIndexExhausted { namespace: BindingNamespace },

    #[error(
        "additional constants were found and includes of the file were processed \
         but initial {anchor} layout was not found in the included files"
    )]
    MissingConstantsAnchor { anchor: &'static str },
    #[error("expected to find a closing bracket after {anchor} definition")]
    MissingConstantsClosingBracket { anchor: &'static str },
}

impl ParseErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ParseErrorKind::FileNotFound
            | ParseErrorKind::NotAFile
            | ParseErrorKind::NoParentPath
            | ParseErrorKind::CantOpenFile(_)
            | ParseErrorKind::IncludedFileNotFound { .. } => ErrorCategory::FileAccess,
            ParseErrorKind::RecursiveInclude { .. }
            | ParseErrorKind::BindingIndexExhausted { .. }
            | ParseErrorKind::MissingConstantsAnchor { .. }
            | ParseErrorKind::MissingConstantsClosingBracket { .. } => ErrorCategory::Semantic,
            _ => ErrorCategory::Syntax,
        }
    }
}
