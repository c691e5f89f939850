use crate::error::ParseErrorKind;
use crate::keyword::Keyword;
use crate::language::ShaderLanguage;

/// Extra push/root constant fields collected from `#additional_*` directives anywhere
/// in the include tree, in the order they were encountered.
#[derive(Debug, Default)]
pub(crate) struct AdditionalConstants {
    blocks: Vec<String>,
}

impl AdditionalConstants {
    /// Whether a directive contributes to the output of `language`.
    pub fn applies_to(keyword: Keyword, language: ShaderLanguage) -> bool {
        match keyword {
            Keyword::AdditionalPushConstants => language == ShaderLanguage::Glsl,
            Keyword::AdditionalRootConstants => language == ShaderLanguage::Hlsl,
            Keyword::AdditionalShaderConstants => true,
            _ => false,
        }
    }

    pub fn push(&mut self, mut block: String) {
        if !block.ends_with('\n') {
            block.push('\n');
        }
        self.blocks.push(block);
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Inserts all collected blocks right before the `}` that closes the push constants
    /// layout (GLSL) or the `RootConstants` struct (HLSL).
    ///
    /// The anchor is searched in the fully merged text, so if several files declare it
    /// the first one wins, even if it is not the one the directives were written for.
    pub fn inject(&self, code: &str, language: ShaderLanguage) -> Result<String, ParseErrorKind> {
        let (anchor, anchor_name) = match language {
            ShaderLanguage::Glsl => ("layout(push_constant)", "push constants"),
            ShaderLanguage::Hlsl => ("struct RootConstants", "root constants"),
        };
        let anchor_start = code
            .find(anchor)
            .ok_or(ParseErrorKind::MissingConstantsAnchor {
                anchor: anchor_name,
            })?;
        let insert_position = code[anchor_start..]
            .find('}')
            .map(|offset| anchor_start + offset)
            .ok_or(ParseErrorKind::MissingConstantsClosingBracket {
                anchor: anchor_name,
            })?;

        let mut result = String::with_capacity(
            code.len() + self.blocks.iter().map(String::len).sum::<usize>(),
        );
        result.push_str(&code[..insert_position]);
        for block in &self.blocks {
            result.push_str(block);
        }
        result.push_str(&code[insert_position..]);
        Ok(result)
    }
}
