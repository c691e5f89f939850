use crate::keyword::Keyword;

/// The language the combined source is turned into.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShaderLanguage {
    Glsl,
    Hlsl,
}

impl ShaderLanguage {
    /// The block keyword whose code is kept for this language.
    pub fn keyword(self) -> Keyword {
        match self {
            ShaderLanguage::Glsl => Keyword::Glsl,
            ShaderLanguage::Hlsl => Keyword::Hlsl,
        }
    }

    /// Whether code tagged with `keyword` ends up in the output for this language.
    pub fn accepts(self, keyword: Keyword) -> bool {
        keyword == Keyword::Both || keyword == self.keyword()
    }
}

impl std::fmt::Display for ShaderLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderLanguage::Glsl => f.write_str("GLSL"),
            ShaderLanguage::Hlsl => f.write_str("HLSL"),
        }
    }
}
