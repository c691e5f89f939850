use tracing::warn;

use super::replace::{replace_substring, replace_token};
use crate::keyword::{continues_identifier, follows_identifier};

/// GLSL tokens and their HLSL counterparts.
/// Non-square `matNxM` types are left alone: the two languages disagree on
/// row/column order, so there is no safe textual mapping.
const GLSL_TO_HLSL_TOKENS: [(&str, &str); 10] = [
    ("vec2", "float2"),
    ("vec3", "float3"),
    ("vec4", "float4"),
    ("mat2", "float2x2"),
    ("mat3", "float3x3"),
    ("mat4", "float4x4"),
    ("floatBitsToUint", "asuint"),
    ("uintBitsToFloat", "asfloat"),
    ("atomicMin", "InterlockedMin"),
    ("atomicMax", "InterlockedMax"),
];

const SHARED: &str = "shared ";

/// Converts GLSL types and calls in a line (or block) of code to HLSL.
pub fn convert_glsl_to_hlsl(code: &str) -> String {
    let mut converted = GLSL_TO_HLSL_TOKENS
        .iter()
        .fold(code.to_string(), |text, (from, to)| {
            replace_token(&text, from, to)
        });

    // Only the leading token, `shared` is also the tail of `groupshared`.
    let indentation = converted.len() - converted.trim_start().len();
    if converted[indentation..].starts_with(SHARED) {
        let (head, rest) = converted.split_at(indentation + SHARED.len());
        converted = replace_substring(head, SHARED, "groupshared ") + rest;
    }
    converted
}

/// Converts HLSL-only constructs in a line of code to GLSL: `mul(a, b)` becomes `a * b`.
pub fn convert_hlsl_to_glsl(code: &str) -> String {
    rewrite_mul_calls(code)
}

struct CallArguments {
    arguments: Vec<std::ops::Range<usize>>,
    /// Index of the closing `)`.
    close: usize,
}

fn rewrite_mul_calls(text: &str) -> String {
    const NAME: &str = "mul";

    let mut result = String::with_capacity(text.len());
    let mut source_index = 0;
    let mut search_from = 0;
    while let Some(found) = text[search_from..].find(NAME) {
        let start = search_from + found;
        let after_name = start + NAME.len();
        search_from = after_name;
        if follows_identifier(text, start) || continues_identifier(text, after_name) {
            continue;
        }
        let open = text.len() - text[after_name..].trim_start().len();
        if !text[open..].starts_with('(') {
            continue;
        }

        let Some(call) = split_call_arguments(text, open) else {
            warn!(code = text, "`mul` call is not closed on the same line, leaving it as is");
            break;
        };
        if call.arguments.len() != 2 {
            warn!(
                code = text,
                arguments = call.arguments.len(),
                "`mul` expects 2 arguments, leaving it as is"
            );
            continue;
        }

        let left = rewrite_mul_calls(text[call.arguments[0].clone()].trim());
        let right = rewrite_mul_calls(text[call.arguments[1].clone()].trim());
        let mut infix = format!("{} * {}", operand(left), operand(right));
        let preceding = text[..start].trim_end().chars().next_back();
        if matches!(preceding, Some('/' | '%' | '*'))
            || text[call.close + 1..].starts_with(['.', '['])
        {
            infix = format!("({infix})");
        }

        result.push_str(&text[source_index..start]);
        result.push_str(&infix);
        source_index = call.close + 1;
        search_from = source_index;
    }
    result.push_str(&text[source_index..]);
    result
}

/// Splits the arguments of a call whose `(` is at `open`, honoring nested brackets.
fn split_call_arguments(text: &str, open: usize) -> Option<CallArguments> {
    let mut depth = 0usize;
    let mut argument_start = open + 1;
    let mut arguments = vec![];
    for (offset, c) in text[open + 1..].char_indices() {
        let index = open + 1 + offset;
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' if depth == 0 => {
                arguments.push(argument_start..index);
                return Some(CallArguments {
                    arguments,
                    close: index,
                });
            }
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                arguments.push(argument_start..index);
                argument_start = index + 1;
            }
            _ => {}
        }
    }
    None
}

/// Wraps an operand in parentheses unless it is a plain identifier, member access,
/// index or call, so that the infix `*` keeps the meaning of the call.
fn operand(text: String) -> String {
    let mut depth = 0usize;
    let is_simple = !text.is_empty()
        && text.chars().all(|c| match c {
            '(' | '[' => {
                depth += 1;
                true
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                true
            }
            _ if depth > 0 => true,
            '.' => true,
            c => unicode_ident::is_xid_continue(c),
        });
    if is_simple {
        text
    } else {
        format!("({text})")
    }
}
