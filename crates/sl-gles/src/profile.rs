//! Target profile resolution.
//!
//! A [`Profile`] is a pure function of the platform family, the requested dialect generation and
//! the pipeline stage. It decides the effective [`Dialect`] and the preamble (version pragma,
//! extension enables and compatibility macros) emitted ahead of every shader.

use crate::features::FeatureFlags;

/// GPU driver family the generated text is compiled by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Mobile GLES driver family without gradient sampling in GLSL ES 1.00.
    MobileEsA,
    MobileEsB,
    /// Desktop GL on macOS: legacy (`#version 120`) contexts only.
    DesktopMac,
    DesktopOther,
}

impl Platform {
    /// Family matching the compile target.
    pub fn host() -> Self {
        if cfg!(target_os = "ios") {
            Platform::MobileEsA
        } else if cfg!(target_os = "android") {
            Platform::MobileEsB
        } else if cfg!(target_os = "macos") {
            Platform::DesktopMac
        } else {
            Platform::DesktopOther
        }
    }

    pub fn is_mobile(self) -> bool {
        matches!(self, Platform::MobileEsA | Platform::MobileEsB)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::host()
    }
}

/// Requested dialect generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlslVersion {
    /// GLSL ES 1.00 and the desktop dialects that share its qualifiers.
    #[default]
    Glsl100,
    /// GLSL ES 3.00 and the desktop dialects that share its qualifiers.
    Glsl300,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShaderStage {
    Vertex,
    #[default]
    Fragment,
}

impl ShaderStage {
    /// Prefix of generated sampler names (`VertexTexture0`, `FragmentTexture3`, ...).
    pub fn texture_prefix(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "Vertex",
            ShaderStage::Fragment => "Fragment",
        }
    }
}

/// Concrete GLSL variant the output is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Es100,
    Es300,
    Glsl120,
    Glsl130,
    Glsl330,
}

impl Dialect {
    pub fn version_directive(self) -> &'static str {
        match self {
            Dialect::Es100 => "#version 100",
            Dialect::Es300 => "#version 300 es",
            Dialect::Glsl120 => "#version 120",
            Dialect::Glsl130 => "#version 130",
            Dialect::Glsl330 => "#version 330",
        }
    }

    /// Whether `uint` and `uvec*` exist. GLSL 1.30 has them despite being a legacy generation.
    pub fn has_unsigned_integers(self) -> bool {
        !matches!(self, Dialect::Es100 | Dialect::Glsl120)
    }
}

const FRAMEBUFFER_FETCH_EXTENSION: &str = "#extension GL_EXT_shader_framebuffer_fetch : enable";
const ARB_TEXTURE_LOD_EXTENSION: &str = "#extension GL_ARB_shader_texture_lod : enable";
const BLANK_PRECISION_MACROS: [&str; 3] = ["#define highp", "#define mediump", "#define lowp"];

const COMMON_TAIL: [&str; 6] = [
    "#define FP_A8(t) (t).a",
    "",
    "// per api bindings",
    "#define ndcToUvMapping vec4(0.5, 0.5, 0.5, 0.5)",
    "#define centerPixelMapping vec2(0.0, 0.0)",
    "",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Profile {
    pub platform: Platform,
    /// Effective generation after platform coercion.
    pub version: GlslVersion,
    pub stage: ShaderStage,
    pub dialect: Dialect,
}

impl Profile {
    pub fn new(platform: Platform, requested: GlslVersion, stage: ShaderStage) -> Self {
        let version = match platform {
            Platform::DesktopMac => GlslVersion::Glsl100,
            _ => requested,
        };
        let dialect = match (platform, version) {
            (Platform::MobileEsA | Platform::MobileEsB, GlslVersion::Glsl100) => Dialect::Es100,
            (Platform::MobileEsA | Platform::MobileEsB, GlslVersion::Glsl300) => Dialect::Es300,
            (Platform::DesktopMac, _) => Dialect::Glsl120,
            (Platform::DesktopOther, GlslVersion::Glsl100) => Dialect::Glsl130,
            (Platform::DesktopOther, GlslVersion::Glsl300) => Dialect::Glsl330,
        };
        Self {
            platform,
            version,
            stage,
            dialect,
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.platform.is_mobile()
    }

    pub fn is_legacy(&self) -> bool {
        self.version == GlslVersion::Glsl100
    }

    pub fn is_fragment(&self) -> bool {
        self.stage == ShaderStage::Fragment
    }

    /// Preamble lines for this profile, ending with a blank line.
    pub fn preamble(&self, features: FeatureFlags) -> Vec<&'static str> {
        let fragment = self.is_fragment();
        let lod = fragment && features.contains(FeatureFlags::TEX_LOD);
        let lod_or_grad =
            fragment && features.intersects(FeatureFlags::TEX_LOD | FeatureFlags::TEX_GRAD);

        let mut lines = vec![self.dialect.version_directive()];
        match self.dialect {
            Dialect::Es100 => {
                if fragment {
                    lines.push(FRAMEBUFFER_FETCH_EXTENSION);
                }
                lines.push("#extension GL_OES_standard_derivatives : enable");
                lines.push("#extension GL_EXT_shadow_samplers : enable");
                if lod {
                    lines.push("#extension GL_EXT_shader_texture_lod : enable");
                }
                if fragment && features.contains(FeatureFlags::MRT) {
                    lines.push("#extension GL_EXT_draw_buffers : enable");
                }
                if features.contains(FeatureFlags::TEX3D_LOD) {
                    lines.push("#extension GL_OES_texture_3D : enable");
                }
                lines.push("#define shadow2D shadow2DEXT");
                if lod {
                    lines.push("#define texture2DLod texture2DLodEXT");
                    lines.push("#define textureCubeLod textureCubeLodEXT");
                }
                if self.platform == Platform::MobileEsA {
                    lines.push("#define textureGrad(s, uv, dx, dy) texture2D(s, uv)");
                }
                if fragment {
                    lines.push("#define FramebufferFetch(i) gl_LastFragData[i]");
                }
            }
            Dialect::Es300 => {
                if fragment {
                    lines.push(FRAMEBUFFER_FETCH_EXTENSION);
                }
            }
            Dialect::Glsl120 => {
                if lod_or_grad {
                    lines.push(ARB_TEXTURE_LOD_EXTENSION);
                }
                lines.push("#extension GL_EXT_gpu_shader4 : enable");
                lines.push("#define textureGrad texture2DGrad");
                lines.extend(BLANK_PRECISION_MACROS);
                lines.push("#define FP_SHADOW(t) (t).x");
                lines.push("#define lerp(a,b,t) ( ( (b) - (a) ) * (t) + (a) )");
            }
            Dialect::Glsl130 => {
                if lod_or_grad {
                    lines.push(ARB_TEXTURE_LOD_EXTENSION);
                }
                lines.extend(BLANK_PRECISION_MACROS);
                lines.push("#define FP_SHADOW(t) (t).x");
            }
            Dialect::Glsl330 => {
                lines.extend(BLANK_PRECISION_MACROS);
                lines.push("#define FP_SHADOW(t) (t)");
            }
        }
        if self.is_mobile() {
            lines.push("#define FP_SHADOW(t) (t)");
            lines.push("precision highp float;");
        }
        lines.extend(COMMON_TAIL);
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fragment(platform: Platform, version: GlslVersion) -> Profile {
        Profile::new(platform, version, ShaderStage::Fragment)
    }

    #[test]
    fn resolves_dialects() {
        let cases = [
            (Platform::MobileEsA, GlslVersion::Glsl100, Dialect::Es100),
            (Platform::MobileEsB, GlslVersion::Glsl300, Dialect::Es300),
            (Platform::DesktopMac, GlslVersion::Glsl100, Dialect::Glsl120),
            (Platform::DesktopMac, GlslVersion::Glsl300, Dialect::Glsl120),
            (Platform::DesktopOther, GlslVersion::Glsl100, Dialect::Glsl130),
            (Platform::DesktopOther, GlslVersion::Glsl300, Dialect::Glsl330),
        ];
        for (platform, version, dialect) in cases {
            assert_eq!(fragment(platform, version).dialect, dialect, "{platform:?} {version:?}");
        }
        assert_eq!(
            fragment(Platform::DesktopMac, GlslVersion::Glsl300).version,
            GlslVersion::Glsl100
        );
    }

    #[test]
    fn es100_fragment_preamble() {
        let profile = fragment(Platform::MobileEsB, GlslVersion::Glsl100);
        let lines = profile.preamble(FeatureFlags::empty());
        assert_eq!(
            lines,
            vec![
                "#version 100",
                "#extension GL_EXT_shader_framebuffer_fetch : enable",
                "#extension GL_OES_standard_derivatives : enable",
                "#extension GL_EXT_shadow_samplers : enable",
                "#define shadow2D shadow2DEXT",
                "#define FramebufferFetch(i) gl_LastFragData[i]",
                "#define FP_SHADOW(t) (t)",
                "precision highp float;",
                "#define FP_A8(t) (t).a",
                "",
                "// per api bindings",
                "#define ndcToUvMapping vec4(0.5, 0.5, 0.5, 0.5)",
                "#define centerPixelMapping vec2(0.0, 0.0)",
                "",
            ]
        );
    }

    #[test]
    fn lod_extension_only_in_fragment_stage() {
        let vertex = Profile::new(Platform::MobileEsA, GlslVersion::Glsl100, ShaderStage::Vertex);
        let lines = vertex.preamble(FeatureFlags::TEX_LOD);
        assert!(!lines.contains(&"#extension GL_EXT_shader_texture_lod : enable"));
        assert!(!lines.contains(&FRAMEBUFFER_FETCH_EXTENSION));
        assert!(lines.contains(&"#define textureGrad(s, uv, dx, dy) texture2D(s, uv)"));

        let profile = fragment(Platform::MobileEsA, GlslVersion::Glsl100);
        let lines = profile.preamble(FeatureFlags::TEX_LOD);
        assert!(lines.contains(&"#extension GL_EXT_shader_texture_lod : enable"));
        assert!(lines.contains(&"#define texture2DLod texture2DLodEXT"));
    }

    #[test]
    fn shadow_extension_only_on_mobile_es100() {
        let needle = "#extension GL_EXT_shadow_samplers : enable";
        for platform in [Platform::DesktopMac, Platform::DesktopOther] {
            for version in [GlslVersion::Glsl100, GlslVersion::Glsl300] {
                let lines = fragment(platform, version).preamble(FeatureFlags::all());
                assert!(!lines.contains(&needle));
            }
        }
        assert!(!fragment(Platform::MobileEsA, GlslVersion::Glsl300)
            .preamble(FeatureFlags::all())
            .contains(&needle));
    }

    #[test]
    fn desktop_preambles_blank_precision_qualifiers() {
        let mac = fragment(Platform::DesktopMac, GlslVersion::Glsl300);
        let mac = mac.preamble(FeatureFlags::TEX_GRAD);
        assert_eq!(mac[0], "#version 120");
        assert_eq!(mac[1], ARB_TEXTURE_LOD_EXTENSION);
        assert!(mac.contains(&"#define lerp(a,b,t) ( ( (b) - (a) ) * (t) + (a) )"));
        assert!(mac.contains(&"#define mediump"));
        assert!(!mac.contains(&"precision highp float;"));

        let core = fragment(Platform::DesktopOther, GlslVersion::Glsl300);
        let core = core.preamble(FeatureFlags::TEX_LOD);
        assert_eq!(core[0], "#version 330");
        assert!(!core.contains(&ARB_TEXTURE_LOD_EXTENSION));
        assert!(core.contains(&"#define FP_SHADOW(t) (t)"));
    }
}
