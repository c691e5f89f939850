//! Line level text transforms between GLSL and HLSL.
//!
//! Shader code is treated as opaque text: only whole tokens from a small table
//! are rewritten, nothing is parsed beyond balanced parentheses.

mod convert;
mod replace;

pub use convert::{convert_glsl_to_hlsl, convert_hlsl_to_glsl};
pub use replace::{replace_substring, replace_token};
