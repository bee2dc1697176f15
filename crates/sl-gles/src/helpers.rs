//! Definitions of the helper functions that emulate source intrinsics missing from GLSL.

use std::fmt::Write as _;

use crate::features::FeatureFlags;
use crate::names::{Helper, NameTable};
use crate::profile::Profile;
use crate::writer::CodeWriter;

const FLOAT_VECTORS: [&str; 4] = ["float", "vec2", "vec3", "vec4"];

/// Emits the helpers `features` needs, each group followed by a blank line.
pub fn emit_helpers(
    profile: &Profile,
    features: FeatureFlags,
    names: &NameTable,
    w: &mut CodeWriter,
) {
    let legacy = profile.is_legacy();
    let fragment = profile.is_fragment();
    let sampler_precision = if profile.is_mobile() { "lowp " } else { "" };

    if features.contains(FeatureFlags::CLIP) {
        let clip = names.helper(Helper::Clip);
        for ty in FLOAT_VECTORS {
            let body = match (fragment, ty) {
                (false, _) => String::new(),
                (true, "float") => "if (x < 0.0) discard; ".to_owned(),
                (true, vec) => format!("if (any(lessThan(x, {vec}(0.0)))) discard; "),
            };
            let _ = writeln!(w, "void {clip}({ty} x) {{ {body}}}");
        }
        w.write_line(0, "");
    }

    if features.contains(FeatureFlags::TEX_BIAS) {
        let name = names.helper(Helper::Tex2DBias);
        let sample = if legacy { "texture2D" } else { "texture" };
        let bias = if fragment { ", t.w" } else { "" };
        let _ = writeln!(
            w,
            "vec4 {name}({sampler_precision}sampler2D s, vec4 t) {{ \
             return {sample}(s, t.xy{bias}); }}"
        );
        w.write_line(0, "");
    }

    if features.contains(FeatureFlags::TEX3D_LOD) {
        let name = names.helper(Helper::Tex3DLod);
        let sample = if legacy { "texture3DLod" } else { "textureLod" };
        let _ = writeln!(
            w,
            "vec4 {name}({sampler_precision}sampler3D s, vec4 t) {{ \
             return {sample}(s, t.xyz, t.w); }}"
        );
        w.write_line(0, "");
    }

    if features.contains(FeatureFlags::CUBE_BIAS) {
        let name = names.helper(Helper::TexCubeBias);
        let sample = if legacy { "textureCube" } else { "texture" };
        let bias = if fragment { ", t.w" } else { "" };
        let _ = writeln!(
            w,
            "vec4 {name}({sampler_precision}samplerCube s, vec4 t) {{ \
             return {sample}(s, t.xyz{bias}); }}"
        );
        w.write_line(0, "");
    }

    if features.contains(FeatureFlags::SIN_COS) {
        let name = names.helper(Helper::SinCos);
        for ty in FLOAT_VECTORS {
            let _ = writeln!(
                w,
                "void {name}({ty} x, out {ty} s, out {ty} c) {{ s = sin(x); c = cos(x); }}"
            );
        }
        w.write_line(0, "");
    }

    if features.contains(FeatureFlags::SCALAR_SWIZZLE) {
        let mut scalars = vec![("float", "vec"), ("int", "ivec")];
        if profile.dialect.has_unsigned_integers() {
            scalars.push(("uint", "uvec"));
        }
        for (len, helper) in [
            (2, Helper::ScalarSwizzle2),
            (3, Helper::ScalarSwizzle3),
            (4, Helper::ScalarSwizzle4),
        ] {
            let name = names.helper(helper);
            for (scalar, vector) in &scalars {
                let _ = writeln!(
                    w,
                    "{vector}{len} {name}({scalar} x) {{ return {vector}{len}(x); }}"
                );
            }
        }
        w.write_line(0, "");
    }
}
