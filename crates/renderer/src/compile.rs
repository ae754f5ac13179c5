use std::borrow::Cow;

use animation::{ShaderError, ShaderStage};
use wgpu::naga;

/// Uniforms the fractal shaders may declare; they are served from one std140 block.
pub(crate) const BLOCK_UNIFORMS: [&str; 9] = [
    "width", "height", "ar", "aaLevel", "rotation", "c", "camPos", "yaw", "pitch",
];

/// GLSL uniform block shared by both stages.
///
/// The member order must match `JuliaUniforms` in `gpu/uniforms.rs`.
/// The block has no instance name so members keep their bare identifiers.
const UNIFORM_BLOCK: &str = r"layout(std140, set = 0, binding = 0) uniform JuliaParams {
    vec4 c;
    vec3 camPos;
    float width;
    float height;
    float ar;
    int aaLevel;
    float rotation;
    float yaw;
    float pitch;
    vec2 julia_padding;
};
";

/// Fragment prologue: routes `gl_FragColor` to location 0 and swaps
/// `gl_FragCoord` for a bottom-left origin copy filled in by [`FRAGMENT_FOOTER`].
const FRAGMENT_PRELUDE: &str = r"layout(location = 0) out vec4 julia_frag_color;
#define gl_FragColor julia_frag_color

vec4 julia_frag_coord;
#define gl_FragCoord julia_frag_coord
#define main julia_main
";

const FRAGMENT_FOOTER: &str = r"
#undef main
#undef gl_FragCoord
void main() {
    julia_frag_coord = vec4(gl_FragCoord.x, height - gl_FragCoord.y, gl_FragCoord.z, gl_FragCoord.w);
    julia_main();
}
";

/// Shader text rewritten for the Vulkan GLSL frontend.
#[derive(Clone, Debug)]
pub(crate) struct WrappedShader {
    pub source: String,
    /// Vertex inputs in declaration order with their assigned locations.
    pub attributes: Vec<(String, u32)>,
    /// Byte offset of the caller's first line in `source`.
    pub body_start: usize,
}

impl WrappedShader {
    /// Number of generated lines ahead of the caller's first line.
    pub fn header_lines(&self) -> u32 {
        self.source[..self.body_start].matches('\n').count() as u32
    }

    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.attributes
            .iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, location)| *location)
    }
}

/// A compiled stage ready to be linked.
pub(crate) struct CompiledStage {
    pub module: wgpu::ShaderModule,
    pub wrapped: WrappedShader,
}

/// Converts WebGL-style GLSL into GLSL 450.
///
/// Steps performed:
///
/// 1. Drop `#version` and `precision` lines plus `uniform` declarations of the
///    block members; each dropped line becomes an empty line so the body
///    keeps one line per source line.
/// 2. Give `attribute` and `varying` declarations sequential locations
///    (`varying` becomes `out` in the vertex stage and `in` in the fragment stage).
/// 3. Prepend the `#version 450` header and uniform block. The GLSL
///    preprocessor ignores `#line`, so diagnostics are shifted back by
///    [`WrappedShader::header_lines`] instead.
/// 4. For fragments, wrap `main` so `gl_FragCoord` is flipped before it runs.
pub(crate) fn wrap_shader(stage: ShaderStage, source: &str) -> WrappedShader {
    let mut body = String::with_capacity(source.len());
    let mut attributes = Vec::new();
    let mut next_varying = 0u32;

    for line in source.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("#version")
            || trimmed.starts_with("precision ")
            || is_block_uniform(trimmed)
        {
            body.push('\n');
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("attribute ") {
            let location = attributes.len() as u32;
            if let Some(name) = declared_name(rest) {
                attributes.push((name.to_string(), location));
            }
            body.push_str(&format!("layout(location = {location}) in {rest}\n"));
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("varying ") {
            let direction = match stage {
                ShaderStage::Vertex => "out",
                ShaderStage::Fragment => "in",
            };
            body.push_str(&format!(
                "layout(location = {next_varying}) {direction} {rest}\n"
            ));
            next_varying += 1;
            continue;
        }

        body.push_str(line);
        body.push('\n');
    }

    let mut source = match stage {
        ShaderStage::Vertex => format!("#version 450\n{UNIFORM_BLOCK}\n"),
        ShaderStage::Fragment => format!("#version 450\n{UNIFORM_BLOCK}\n{FRAGMENT_PRELUDE}\n"),
    };
    let body_start = source.len();
    source.push_str(&body);
    if stage == ShaderStage::Fragment {
        source.push_str(FRAGMENT_FOOTER);
    }

    WrappedShader {
        source,
        attributes,
        body_start,
    }
}

fn is_block_uniform(line: &str) -> bool {
    line.strip_prefix("uniform ")
        .and_then(declared_name)
        .is_some_and(|name| BLOCK_UNIFORMS.contains(&name))
}

/// Identifier declared by `[qualifiers] type name[...];`.
fn declared_name(declaration: &str) -> Option<&str> {
    let declaration = declaration.split(';').next()?.trim();
    let last = declaration.split_whitespace().last()?;
    let name = last.split('[').next()?;
    (!name.is_empty()).then_some(name)
}

/// Wraps, parses and uploads one stage.
///
/// The GLSL frontend runs first so syntax and type errors come back with line
/// numbers; anything it accepts is then validated by the device inside an
/// error scope.
pub(crate) fn compile_stage(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<CompiledStage, ShaderError> {
    let wrapped = wrap_shader(stage, source);
    tracing::trace!(%stage, source = %wrapped.source, "wrapped shader");

    let naga_stage = naga_stage(stage);
    parse_wrapped(stage, &wrapped).map_err(|log| ShaderError::Compile { stage, log })?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage {
            ShaderStage::Vertex => "julia vertex",
            ShaderStage::Fragment => "julia fragment",
        }),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(wrapped.source.clone()),
            stage: naga_stage,
            defines: &[],
        },
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(ShaderError::Compile {
            stage,
            log: error.to_string(),
        });
    }

    Ok(CompiledStage { module, wrapped })
}

/// Runs the GLSL frontend, returning an info log on failure.
///
/// Each entry reads `ERROR: <stage>:<line>:<column>: <message>` with lines
/// counted in the caller's source. Errors inside generated code omit the
/// position.
fn parse_wrapped(stage: ShaderStage, wrapped: &WrappedShader) -> Result<(), String> {
    let mut frontend = naga::front::glsl::Frontend::default();
    let Err(errors) = frontend.parse(
        &naga::front::glsl::Options::from(naga_stage(stage)),
        &wrapped.source,
    ) else {
        return Ok(());
    };

    let header_lines = wrapped.header_lines();
    let log = errors
        .errors
        .iter()
        .map(|error| {
            let location = error.meta.location(&wrapped.source);
            match location.line_number.checked_sub(header_lines) {
                Some(line) if line > 0 => format!(
                    "ERROR: {stage}:{line}:{}: {}",
                    location.line_position, error.kind
                ),
                _ => format!("ERROR: {stage}: {}", error.kind),
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    Err(log)
}

fn naga_stage(stage: ShaderStage) -> naga::ShaderStage {
    match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = r"attribute vec2 a_pos;
varying vec2 v_uv;
void main() {
    v_uv = a_pos * 0.5 + 0.5;
    gl_Position = vec4(a_pos, 0.0, 1.0);
}
";

    const FRAGMENT: &str = r"#version 100
precision highp float;
uniform float width;
uniform float height;
uniform   vec4 c;
uniform vec3 camPos;
uniform int aaLevel;
varying vec2 v_uv;
void main() {
    gl_FragColor = vec4(gl_FragCoord.xy / vec2(width, height), c.x, 1.0);
}
";

    fn body(wrapped: &WrappedShader) -> &str {
        &wrapped.source[wrapped.body_start..]
    }

    #[test]
    fn vertex_attributes_get_locations() {
        let wrapped = wrap_shader(ShaderStage::Vertex, VERTEX);
        assert_eq!(wrapped.attribute_location("a_pos"), Some(0));
        assert!(wrapped
            .source
            .contains("layout(location = 0) in vec2 a_pos;"));
        assert!(wrapped
            .source
            .contains("layout(location = 0) out vec2 v_uv;"));
        assert!(wrapped.source.starts_with("#version 450\n"));
    }

    #[test]
    fn fragment_uniforms_move_into_the_block() {
        let wrapped = wrap_shader(ShaderStage::Fragment, FRAGMENT);
        let body = body(&wrapped);
        assert!(!body.contains("uniform"));
        assert!(!body.contains("precision"));
        assert!(!body.contains("#version 100"));
        assert!(body.contains("layout(location = 0) in vec2 v_uv;"));
        assert!(wrapped.source.contains("uniform JuliaParams"));
        assert!(wrapped.attributes.is_empty());
    }

    #[test]
    fn line_numbers_are_preserved() {
        let wrapped = wrap_shader(ShaderStage::Fragment, FRAGMENT);
        let body = body(&wrapped);
        let original: Vec<&str> = FRAGMENT.lines().collect();
        let rewritten: Vec<&str> = body.lines().collect();
        assert_eq!(rewritten[8], original[8]);
        assert_eq!(rewritten[9], original[9]);
        assert_eq!(rewritten[0], "");
    }

    #[test]
    fn fragment_main_is_wrapped() {
        let wrapped = wrap_shader(ShaderStage::Fragment, FRAGMENT);
        assert!(wrapped.source.contains("#define main julia_main"));
        assert!(wrapped.source.trim_end().ends_with('}'));
        assert!(wrapped.source.contains("height - gl_FragCoord.y"));
    }

    #[test]
    fn unknown_uniforms_are_left_alone() {
        let wrapped = wrap_shader(ShaderStage::Fragment, "uniform sampler2D palette;\n");
        assert!(body(&wrapped).contains("uniform sampler2D palette;"));
    }

    #[test]
    fn declared_names() {
        assert_eq!(declared_name("float width;"), Some("width"));
        assert_eq!(declared_name("highp vec4 c ;"), Some("c"));
        assert_eq!(declared_name("float c[4];"), Some("c"));
        assert_eq!(declared_name(";"), None);
    }

    #[test]
    fn block_members_match_the_uniform_list() {
        for name in BLOCK_UNIFORMS {
            assert!(
                UNIFORM_BLOCK.contains(&format!(" {name};")),
                "{name} missing from the uniform block"
            );
        }
    }

    #[test]
    fn wrapped_sources_parse() {
        for (stage, source) in [
            (ShaderStage::Vertex, VERTEX),
            (ShaderStage::Fragment, FRAGMENT),
        ] {
            let wrapped = wrap_shader(stage, source);
            if let Err(log) = parse_wrapped(stage, &wrapped) {
                panic!("{stage} failed to parse:\n{log}");
            }
        }
    }

    #[test]
    fn bundled_shaders_parse() {
        for (stage, source) in [
            (
                ShaderStage::Vertex,
                include_str!("../../../shaders/julia.vert.glsl"),
            ),
            (
                ShaderStage::Fragment,
                include_str!("../../../shaders/julia.frag.glsl"),
            ),
        ] {
            let wrapped = wrap_shader(stage, source);
            if let Err(log) = parse_wrapped(stage, &wrapped) {
                panic!("{stage} failed to parse:\n{log}");
            }
        }
    }

    #[test]
    fn syntax_errors_report_source_lines() {
        let wrapped = wrap_shader(ShaderStage::Fragment, "void main() { gl_FragColor = ; }\n");
        let log = parse_wrapped(ShaderStage::Fragment, &wrapped).unwrap_err();
        assert!(log.starts_with("ERROR: fragment:1:"), "{log}");

        let source = "precision highp float;\nuniform float width;\n\nvoid main() {\n    gl_FragColor = vec4(width) +;\n}\n";
        let wrapped = wrap_shader(ShaderStage::Fragment, source);
        let log = parse_wrapped(ShaderStage::Fragment, &wrapped).unwrap_err();
        assert!(log.starts_with("ERROR: fragment:5:"), "{log}");
    }

    #[test]
    fn header_lines_precede_the_body() {
        let wrapped = wrap_shader(ShaderStage::Vertex, VERTEX);
        let header_lines = wrapped.header_lines() as usize;
        let first = wrapped.source.lines().nth(header_lines).unwrap();
        assert_eq!(first, "layout(location = 0) in vec2 a_pos;");
    }
}
