/// Vertex shader for the foliage cloud; runs the whole morph on the GPU
pub const FOLIAGE_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_assembled;
layout(location = 1) in vec3 a_scattered;
layout(location = 2) in float a_seed;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_time;
uniform float u_factor;

out vec3 v_color;
out float v_alpha;

const vec3 EMERALD = vec3(0.0, 0.8, 0.4);
const vec3 GOLD = vec3(1.0, 0.9, 0.4);

float ease_cubic_in_out(float t) {
    return t < 0.5 ? 4.0 * t * t * t : 1.0 - pow(-2.0 * t + 2.0, 3.0) / 2.0;
}

void main() {
    float t = ease_cubic_in_out(clamp(u_factor, 0.0, 1.0));
    vec3 position = mix(a_scattered, a_assembled, t);

    // Breathing along the horizontal outward direction
    vec3 outward = vec3(a_assembled.x, 0.0, a_assembled.z);
    float radial = length(outward);
    if (radial > 0.0) {
        outward /= radial;
    }
    position += outward * sin(u_time * 2.0 + a_seed * 10.0) * 0.05 * t;

    // Floating drift while scattered
    position.y += sin(u_time * 0.5 + a_seed * 20.0) * 0.5 * (1.0 - t);

    vec3 rainbow = 0.6 + 0.4 * cos(u_time + a_seed * 6.28 + vec3(0.0, 2.0, 4.0));
    vec3 highlight = mix(GOLD, rainbow, a_seed * 0.6);
    float sparkle = sin(u_time * 3.0 + a_seed * 50.0);
    v_color = mix(EMERALD, highlight, smoothstep(0.9, 1.0, sparkle));
    v_alpha = mix(0.8, 1.0, t);

    vec4 view_pos = u_view * u_model * vec4(position, 1.0);
    gl_Position = u_projection * view_pos;
    gl_PointSize = (4.0 + a_seed * 3.0) * (20.0 / -view_pos.z);
}
"#;

/// Vertex shader for particles already blended on the host
pub const PARTICLE_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in float a_size;
layout(location = 2) in float a_alpha;
layout(location = 3) in vec3 a_color;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_color;
out float v_alpha;

void main() {
    v_color = a_color;
    v_alpha = a_alpha;

    vec4 view_pos = u_view * u_model * vec4(a_position, 1.0);
    gl_Position = u_projection * view_pos;
    gl_PointSize = a_size * (20.0 / -view_pos.z);
}
"#;

/// Fragment shader shared by both particle paths
pub const PARTICLE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_color;
in float v_alpha;

out vec4 fragColor;

void main() {
    // Circular soft particle
    float dist = length(gl_PointCoord - vec2(0.5));
    if (dist > 0.5) {
        discard;
    }

    float strength = pow(1.0 - dist * 2.0, 1.2);
    fragColor = vec4(v_color, v_alpha * strength);
}
"#;

/// Instanced vertex shader for ornaments.
/// The per-instance model matrix occupies locations 3..=6, color location 7.
pub const ORNAMENT_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec2 a_uv;
layout(location = 3) in mat4 a_instance;
layout(location = 7) in vec3 a_color;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_normal;
out vec2 v_uv;
out vec3 v_color;

void main() {
    mat4 model = u_model * a_instance;
    v_normal = mat3(model) * a_normal;
    v_uv = a_uv;
    v_color = a_color;

    gl_Position = u_projection * u_view * model * vec4(a_position, 1.0);
}
"#;

/// Matte ornament shading: ambient plus one directional light
pub const ORNAMENT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_normal;
in vec2 v_uv;
in vec3 v_color;

uniform sampler2D u_texture;
uniform float u_textured;
uniform vec3 u_light_dir;
uniform float u_ambient;
uniform float u_diffuse;

out vec4 fragColor;

void main() {
    vec3 normal = normalize(v_normal);
    vec3 base = mix(v_color, texture(u_texture, v_uv).rgb, u_textured);

    float ndotl = max(dot(normal, normalize(u_light_dir)), 0.0);
    vec3 lit = base * (u_ambient + ndotl * u_diffuse);

    fragColor = vec4(min(lit, vec3(1.0)), 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [&str; 5] = [
        FOLIAGE_VERTEX_SHADER,
        PARTICLE_VERTEX_SHADER,
        PARTICLE_FRAGMENT_SHADER,
        ORNAMENT_VERTEX_SHADER,
        ORNAMENT_FRAGMENT_SHADER,
    ];

    #[test]
    fn test_shader_version() {
        for source in ALL {
            assert!(source.starts_with("#version 300 es"));
            assert!(source.contains("precision highp float;"));
        }
    }

    #[test]
    fn test_stage_outputs_match_inputs() {
        for vertex in [FOLIAGE_VERTEX_SHADER, PARTICLE_VERTEX_SHADER] {
            assert!(vertex.contains("out vec3 v_color;"));
            assert!(vertex.contains("out float v_alpha;"));
        }
        assert!(PARTICLE_FRAGMENT_SHADER.contains("in vec3 v_color;"));
        assert!(PARTICLE_FRAGMENT_SHADER.contains("in float v_alpha;"));

        for varying in ["vec3 v_normal;", "vec2 v_uv;", "vec3 v_color;"] {
            assert!(ORNAMENT_VERTEX_SHADER.contains(&format!("out {}", varying)));
            assert!(ORNAMENT_FRAGMENT_SHADER.contains(&format!("in {}", varying)));
        }
    }

    #[test]
    fn test_foliage_uniforms() {
        for uniform in ["u_time", "u_factor", "u_model", "u_view", "u_projection"] {
            assert!(FOLIAGE_VERTEX_SHADER.contains(&format!("uniform float {};", uniform))
                || FOLIAGE_VERTEX_SHADER.contains(&format!("uniform mat4 {};", uniform)));
        }
        // Same sparkle threshold as the host path
        assert!(FOLIAGE_VERTEX_SHADER.contains("smoothstep(0.9, 1.0, sparkle)"));
    }

    #[test]
    fn test_instance_attribute_locations() {
        assert!(ORNAMENT_VERTEX_SHADER.contains("layout(location = 3) in mat4 a_instance;"));
        assert!(ORNAMENT_VERTEX_SHADER.contains("layout(location = 7) in vec3 a_color;"));
    }
}
