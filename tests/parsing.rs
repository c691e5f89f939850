mod common;

use common::ShaderDir;
use csl_parser::{parse_glsl, parse_hlsl, ErrorCategory, ParseErrorKind, ParseRequest, ShaderLanguage};

const MATERIAL: &str = r#"#include "common.csl"
#glsl
{
layout(binding = ?) uniform sampler2D diffuseTexture[];
layout(binding = 1) uniform sampler2D normalTexture[];
layout(binding = ?) uniform sampler2D roughnessTexture[];
}
#hlsl{
Texture2D diffuseTexture : register(t?);
cbuffer frameData : register(b?, space1);
}
vec3 shade(vec3 normal) { return normal; }
"#;

const COMMON: &str = "#both uint frameIndex;\n";

#[test]
fn combined_file_to_glsl() {
    let dir = ShaderDir::new();
    dir.write("common.csl", COMMON);
    let path = dir.write("material.csl", MATERIAL);

    assert_eq!(
        parse_glsl(&path, 0, &[]).unwrap(),
        "uint frameIndex;\n\
         layout(binding = 0) uniform sampler2D diffuseTexture[];\n\
         layout(binding = 1) uniform sampler2D normalTexture[];\n\
         layout(binding = 2) uniform sampler2D roughnessTexture[];\n\
         vec3 shade(vec3 normal) { return normal; }\n"
    );
}

#[test]
fn combined_file_to_hlsl() {
    let dir = ShaderDir::new();
    dir.write("common.csl", COMMON);
    let path = dir.write("material.csl", MATERIAL);

    assert_eq!(
        parse_hlsl(&path, &[]).unwrap(),
        "uint frameIndex;\n\
         Texture2D diffuseTexture : register(t0);\n\
         cbuffer frameData : register(b0, space1);\n\
         float3 shade(float3 normal) { return normal; }\n"
    );
}

#[test]
fn wildcard_bindings_in_order() {
    let dir = ShaderDir::new();
    let path = dir.write(
        "textures.glsl",
        "layout(binding=?) uniform sampler2D diffuseTexture[];\n\
         layout(binding=?) uniform sampler2D normalTexture[];\n",
    );

    assert_eq!(
        parse_glsl(&path, 0, &[]).unwrap(),
        "layout(binding=0) uniform sampler2D diffuseTexture[];\n\
         layout(binding=1) uniform sampler2D normalTexture[];\n"
    );
    assert_eq!(
        parse_glsl(&path, 5, &[]).unwrap(),
        "layout(binding=5) uniform sampler2D diffuseTexture[];\n\
         layout(binding=6) uniform sampler2D normalTexture[];\n"
    );
}

#[test]
fn hardcoded_binding_in_later_include_is_avoided() {
    let dir = ShaderDir::new();
    dir.write("late.glsl", "layout(binding = 0) uniform Late late;\n");
    let path = dir.write(
        "main.glsl",
        "layout(binding = ?) uniform Early early;\n#include \"late.glsl\"\n",
    );

    assert_eq!(
        parse_glsl(&path, 0, &[]).unwrap(),
        "layout(binding = 1) uniform Early early;\nlayout(binding = 0) uniform Late late;\n"
    );
}

#[test]
fn binding_indices_run_out() {
    let dir = ShaderDir::new();
    let single = dir.write("single.glsl", "layout(binding = ?) uniform A a;\n");
    assert_eq!(
        parse_glsl(&single, u32::MAX, &[]).unwrap(),
        "layout(binding = 4294967295) uniform A a;\n"
    );

    let taken = dir.write(
        "taken.glsl",
        "layout(binding = 4294967295) uniform A a;\nlayout(binding = ?) uniform B b;\n",
    );
    let error = parse_glsl(&taken, u32::MAX, &[]).unwrap_err();
    assert!(matches!(
        error.kind,
        ParseErrorKind::BindingIndexExhausted { .. }
    ));
    assert_eq!(error.category(), ErrorCategory::Semantic);
}

#[test]
fn register_spaces_are_independent() {
    let dir = ShaderDir::new();
    let path = dir.write(
        "frame.csl",
        "#hlsl cbuffer frameData : register(b0, space5);\n\
         #hlsl cbuffer other : register(b?);\n",
    );

    assert_eq!(
        parse_hlsl(&path, &[]).unwrap(),
        "cbuffer frameData : register(b0, space5);\ncbuffer other : register(b0);\n"
    );
}

#[test]
fn register_space_wildcard_is_rejected() {
    let dir = ShaderDir::new();
    let path = dir.write("frame.hlsl", "cbuffer frameData : register(b0, space?);\n");

    let error = parse_hlsl(&path, &[]).unwrap_err();
    assert!(matches!(error.kind, ParseErrorKind::RegisterSpaceWildcard { .. }));
    assert_eq!(error.category(), ErrorCategory::Syntax);
}

#[test]
fn missing_include() {
    let dir = ShaderDir::new();
    let path = dir.write("main.glsl", "#include \"missing.glsl\"\nvoid main() {}\n");

    let error = parse_glsl(&path, 0, &[]).unwrap_err();
    assert!(error.message().contains("unable to find included file"));
    assert_eq!(error.path(), path);
}

#[test]
fn include_directories_are_searched_in_order() {
    let shaders = ShaderDir::new();
    let first = ShaderDir::new();
    let second = ShaderDir::new();
    first.write("lib/util.glsl", "float first();\n");
    second.write("lib/util.glsl", "float second();\n");
    second.write("lib/extra.glsl", "float extra();\n");
    let path = shaders.write(
        "main.glsl",
        "#include \"lib/util.glsl\"\n#include \"lib/extra.glsl\"\n",
    );

    let include_directories = vec![first.path().to_path_buf(), second.path().to_path_buf()];
    assert_eq!(
        parse_glsl(&path, 0, &include_directories).unwrap(),
        "float first();\nfloat extra();\n"
    );
}

#[test]
fn sibling_file_wins_over_include_directory() {
    let shaders = ShaderDir::new();
    let library = ShaderDir::new();
    shaders.write("util.glsl", "float local();\n");
    library.write("util.glsl", "float library();\n");
    let path = shaders.write("main.glsl", "#include \"util.glsl\"\n");

    let output = ParseRequest::new(&path, ShaderLanguage::Glsl)
        .with_include_directory(library.path())
        .parse()
        .unwrap();
    assert_eq!(output, "float local();\n");
}

#[test]
fn recursive_include() {
    let dir = ShaderDir::new();
    dir.write("a.glsl", "#include \"b.glsl\"\n");
    dir.write("b.glsl", "#include \"a.glsl\"\n");

    let error = parse_glsl(dir.path().join("a.glsl"), 0, &[]).unwrap_err();
    assert!(matches!(error.kind, ParseErrorKind::RecursiveInclude { .. }));
    assert_eq!(error.category(), ErrorCategory::Semantic);
}

#[test]
fn diamond_include_is_allowed() {
    let dir = ShaderDir::new();
    dir.write("common.glsl", "float common();\n");
    dir.write("left.glsl", "#include \"common.glsl\"\n");
    dir.write("right.glsl", "#include \"common.glsl\"\n");
    let path = dir.write("main.glsl", "#include \"left.glsl\"\n#include \"right.glsl\"\n");

    assert_eq!(
        parse_glsl(&path, 0, &[]).unwrap(),
        "float common();\nfloat common();\n"
    );
}

#[test]
fn missing_push_constants_anchor() {
    let dir = ShaderDir::new();
    let path = dir.write("main.glsl", "#additional_push_constants uint x;\nvoid main() {}\n");

    let error = parse_glsl(&path, 0, &[]).unwrap_err();
    assert!(error
        .message()
        .contains("initial push constants layout was not found"));
}

const LIGHTING: &str = "#additional_push_constants uint lightCount;
#additional_root_constants uint lightCount;
#additional_shader_constants
{
    vec3 ambient;
}
";

#[test]
fn push_constants_are_extended() {
    let dir = ShaderDir::new();
    dir.write("lighting.csl", LIGHTING);
    let path = dir.write(
        "main.csl",
        "layout(push_constant) uniform PushConstants {\n    uint materialIndex;\n} push;\n#include \"lighting.csl\"\n",
    );

    assert_eq!(
        parse_glsl(&path, 0, &[]).unwrap(),
        "layout(push_constant) uniform PushConstants {\n    uint materialIndex;\nuint lightCount;\n    vec3 ambient;\n} push;\n"
    );
}

#[test]
fn root_constants_are_extended() {
    let dir = ShaderDir::new();
    dir.write("lighting.csl", LIGHTING);
    let path = dir.write(
        "main.csl",
        "struct RootConstants {\n    uint materialIndex;\n};\n#include \"lighting.csl\"\n",
    );

    assert_eq!(
        parse_hlsl(&path, &[]).unwrap(),
        "struct RootConstants {\n    uint materialIndex;\nuint lightCount;\n    float3 ambient;\n};\n"
    );
}

#[test]
fn code_before_constants_directive_is_kept() {
    let dir = ShaderDir::new();
    let path = dir.write(
        "main.glsl",
        "layout(push_constant) uniform Push {\n    uint base;\n} push;\nuint kept; #additional_push_constants uint x;\n",
    );

    assert_eq!(
        parse_glsl(&path, 0, &[]).unwrap(),
        "layout(push_constant) uniform Push {\n    uint base;\nuint x;\n} push;\nuint kept;\n"
    );
}

#[test]
fn mixed_lines() {
    let dir = ShaderDir::new();
    let path = dir.write("main.csl", "vec4 color = #hlsl mul(m, v); #glsl m * v;\n");

    assert_eq!(parse_glsl(&path, 0, &[]).unwrap(), "vec4 color = m * v;\n");
    assert_eq!(parse_hlsl(&path, &[]).unwrap(), "float4 color = mul(m, v);\n");
}

#[test]
fn neutral_mul_becomes_infix_in_glsl() {
    let dir = ShaderDir::new();
    let path = dir.write("main.csl", "vec3 p = mul(model, position);\n");

    assert_eq!(parse_glsl(&path, 0, &[]).unwrap(), "vec3 p = model * position;\n");
    assert_eq!(parse_hlsl(&path, &[]).unwrap(), "float3 p = mul(model, position);\n");
}

#[test]
fn commented_directives_are_plain_code() {
    let dir = ShaderDir::new();
    let path = dir.write(
        "main.glsl",
        "float a; // #hlsl only\n// layout(binding = ?) uniform Old old;\n",
    );

    assert_eq!(
        parse_glsl(&path, 0, &[]).unwrap(),
        "float a; // #hlsl only\n// layout(binding = ?) uniform Old old;\n"
    );
}

#[test]
fn unterminated_block_reports_included_file() {
    let dir = ShaderDir::new();
    let broken = dir.write("broken.csl", "#glsl{\nint a;\n");
    let path = dir.write("main.csl", "#include \"broken.csl\"\n");

    let error = parse_glsl(&path, 0, &[]).unwrap_err();
    assert!(matches!(
        error.kind,
        ParseErrorKind::UnexpectedEndOfFile { keyword: "#glsl" }
    ));
    assert_eq!(error.path(), broken);
}

#[test]
fn file_access_errors() {
    let dir = ShaderDir::new();

    let missing = parse_glsl(dir.path().join("nothing.glsl"), 0, &[]).unwrap_err();
    assert!(matches!(missing.kind, ParseErrorKind::FileNotFound));
    assert_eq!(missing.category(), ErrorCategory::FileAccess);

    let directory = parse_glsl(dir.path(), 0, &[]).unwrap_err();
    assert!(matches!(directory.kind, ParseErrorKind::NotAFile));

    // Relative to the working directory, without any directory component.
    let no_parent = parse_hlsl("Cargo.toml", &[]).unwrap_err();
    assert!(matches!(no_parent.kind, ParseErrorKind::NoParentPath));
}
