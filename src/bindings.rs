//! Resource binding indices: `binding = N` in GLSL and `register(Xn, spaceM)` in HLSL.
//! Both forms accept `?` instead of a number to request an automatically assigned index.

mod allocator;
mod scanner;

pub use allocator::BindingAllocator;
pub use scanner::BindingScanner;

use std::fmt;
use std::ops::Range;

/// An index as written in the source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SlotIndex {
    Explicit(u32),
    /// The `?` marker.
    Wildcard,
}

/// HLSL register classes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegisterType {
    /// `b`, constant buffers.
    ConstantBuffer,
    /// `t`, shader resource views.
    ShaderResource,
    /// `s`, samplers.
    Sampler,
    /// `u`, unordered access views.
    UnorderedAccess,
}

impl RegisterType {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'b' => Some(RegisterType::ConstantBuffer),
            't' => Some(RegisterType::ShaderResource),
            's' => Some(RegisterType::Sampler),
            'u' => Some(RegisterType::UnorderedAccess),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            RegisterType::ConstantBuffer => 'b',
            RegisterType::ShaderResource => 't',
            RegisterType::Sampler => 's',
            RegisterType::UnorderedAccess => 'u',
        }
    }
}

/// Indices are unique per namespace. GLSL has a single flat namespace,
/// HLSL has one per register type and register space.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BindingNamespace {
    Glsl,
    Hlsl { register: RegisterType, space: u32 },
}

impl fmt::Display for BindingNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingNamespace::Glsl => f.write_str("GLSL bindings"),
            BindingNamespace::Hlsl { register, space } => {
                write!(f, "HLSL registers `{}` in space {space}", register.as_char())
            }
        }
    }
}

/// Byte offsets of a piece of scanned text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn text<'source>(&self, source: &'source str) -> &'source str {
        &source[self.start..self.end]
    }

    /// Re-bases a span measured inside a slice that starts at `offset`.
    pub fn shifted(self, offset: usize) -> Self {
        Span {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span {
            start: range.start,
            end: range.end,
        }
    }
}

/// A single `binding = ...` or `register(...)` occurrence.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BindingSite {
    pub namespace: BindingNamespace,
    pub index: SlotIndex,
    /// Location of the index (the digits or the `?`) in the scanned text.
    pub index_span: Span,
}
