/// Vertex shader for ribbon strips
pub const RIBBON_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec2 a_uv;

uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_normal;
out vec3 v_world_position;
out vec2 v_uv;

void main() {
    v_world_position = a_position;
    v_normal = a_normal;
    v_uv = a_uv;
    gl_Position = u_projection * u_view * vec4(a_position, 1.0);
}
"#;

/// Fragment shader for ribbon strips. The strip is infinitely thin so both
/// faces must light identically; the dot products are taken absolute.
pub const RIBBON_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_normal;
in vec3 v_world_position;
in vec2 v_uv;

uniform vec3 u_camera_pos;
uniform vec3 u_color;

out vec4 fragColor;

void main() {
    vec3 normal = normalize(v_normal);
    vec3 view_dir = normalize(u_camera_pos - v_world_position);

    vec3 light_dir = normalize(vec3(0.5, 1.0, 0.3));
    float ndotl = abs(dot(normal, light_dir));

    // Lengthwise shimmer along the strip
    float shimmer = 0.85 + 0.15 * sin(v_uv.y * 40.0);

    vec3 ambient = u_color * 0.35;
    vec3 diffuse = u_color * ndotl * 0.65;

    float rim = pow(1.0 - abs(dot(normal, view_dir)), 3.0);
    vec3 rim_light = vec3(1.0, 0.95, 0.8) * rim * 0.25;

    vec3 final_color = (ambient + diffuse) * shimmer + rim_light;

    // Gamma correction
    final_color = pow(final_color, vec3(1.0 / 2.2));

    fragColor = vec4(final_color, 1.0);
}
"#;

/// Vertex shader for instanced ornaments. The per-instance model matrix
/// arrives as four vec4 attributes with divisor 1.
pub const ORNAMENT_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec4 a_model_0;
layout(location = 3) in vec4 a_model_1;
layout(location = 4) in vec4 a_model_2;
layout(location = 5) in vec4 a_model_3;

uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_normal;
out vec3 v_world_position;

void main() {
    mat4 model = mat4(a_model_0, a_model_1, a_model_2, a_model_3);
    vec4 world_pos = model * vec4(a_position, 1.0);

    v_world_position = world_pos.xyz;
    v_normal = mat3(model) * a_normal;

    gl_Position = u_projection * u_view * world_pos;
}
"#;

/// Fragment shader for ornaments: glossy shaded spheres
pub const ORNAMENT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_normal;
in vec3 v_world_position;

uniform vec3 u_camera_pos;
uniform vec3 u_color;

out vec4 fragColor;

void main() {
    vec3 normal = normalize(v_normal);
    vec3 view_dir = normalize(u_camera_pos - v_world_position);

    vec3 light_dir = normalize(vec3(0.5, 1.0, 0.3));
    float ndotl = max(dot(normal, light_dir), 0.0);

    vec3 ambient = u_color * 0.25;
    vec3 diffuse = u_color * ndotl * 0.7;

    vec3 half_dir = normalize(light_dir + view_dir);
    float spec = pow(max(dot(normal, half_dir), 0.0), 48.0);
    vec3 specular = vec3(1.0) * spec * 0.6;

    float rim = pow(1.0 - max(dot(normal, view_dir), 0.0), 3.0);
    vec3 rim_light = u_color * rim * 0.3;

    vec3 final_color = ambient + diffuse + specular + rim_light;

    // Tone mapping
    final_color = final_color / (final_color + vec3(1.0));

    // Gamma correction
    final_color = pow(final_color, vec3(1.0 / 2.2));

    fragColor = vec4(final_color, 1.0);
}
"#;

/// Vertex shader for point-sprite particles
pub const PARTICLE_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in float a_size;
layout(location = 2) in float a_alpha;
layout(location = 3) in vec3 a_color;

uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_time;

out float v_alpha;
out vec3 v_color;

void main() {
    // Twinkle effect
    float twinkle = sin(u_time * 6.0 + a_position.x * 50.0 + a_position.z * 30.0) * 0.25 + 0.75;
    v_alpha = a_alpha * twinkle;
    v_color = a_color;

    vec4 view_pos = u_view * vec4(a_position, 1.0);
    gl_Position = u_projection * view_pos;
    gl_PointSize = a_size * (100.0 / -view_pos.z);
}
"#;

/// Fragment shader for point-sprite particles
pub const PARTICLE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in float v_alpha;
in vec3 v_color;

out vec4 fragColor;

void main() {
    // Circular soft particle
    vec2 coord = gl_PointCoord - vec2(0.5);
    float dist = length(coord);

    if (dist > 0.5) {
        discard;
    }

    // Soft falloff
    float alpha = v_alpha * (1.0 - dist * 2.0);
    alpha = alpha * alpha; // Quadratic falloff for softer glow

    vec3 glow = v_color * (1.0 + alpha);

    fragColor = vec4(glow, alpha);
}
"#;
