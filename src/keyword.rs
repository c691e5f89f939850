/// Directives recognized by the parser. A keyword only lives for the line it was found on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Glsl,
    Hlsl,
    Both,
    Include,
    AdditionalPushConstants,
    AdditionalRootConstants,
    AdditionalShaderConstants,
}

impl Keyword {
    pub const LANGUAGE_MARKERS: [Keyword; 3] = [Keyword::Hlsl, Keyword::Glsl, Keyword::Both];

    pub const ADDITIONAL_CONSTANTS: [Keyword; 3] = [
        Keyword::AdditionalPushConstants,
        Keyword::AdditionalRootConstants,
        Keyword::AdditionalShaderConstants,
    ];

    pub fn text(self) -> &'static str {
        match self {
            Keyword::Glsl => "#glsl",
            Keyword::Hlsl => "#hlsl",
            Keyword::Both => "#both",
            Keyword::Include => "#include",
            Keyword::AdditionalPushConstants => "#additional_push_constants",
            Keyword::AdditionalRootConstants => "#additional_root_constants",
            Keyword::AdditionalShaderConstants => "#additional_shader_constants",
        }
    }

    /// Byte offsets of every occurrence of this keyword in the code part of `line`.
    pub fn find_all(self, line: &str) -> Vec<usize> {
        let keyword = self.text();
        code_part(line)
            .match_indices(keyword)
            .map(|(position, _)| position)
            .filter(|position| !continues_identifier(line, position + keyword.len()))
            .collect()
    }

    /// Offset of the first occurrence of this keyword in the code part of `line`.
    pub fn find(self, line: &str) -> Option<usize> {
        self.find_all(line).into_iter().next()
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Everything before a `//` comment.
pub fn code_part(line: &str) -> &str {
    match line.find("//") {
        Some(comment_start) => &line[..comment_start],
        None => line,
    }
}

/// Whether the character at `index` would extend an identifier that ends right before it.
pub fn continues_identifier(text: &str, index: usize) -> bool {
    text[index..]
        .chars()
        .next()
        .is_some_and(unicode_ident::is_xid_continue)
}

/// Whether the character right before `index` belongs to an identifier.
pub fn follows_identifier(text: &str, index: usize) -> bool {
    text[..index]
        .chars()
        .next_back()
        .is_some_and(unicode_ident::is_xid_continue)
}
