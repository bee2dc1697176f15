//! Semantic binding of stage input/output struct fields to GLSL interface variables.

use std::collections::BTreeMap;

use sl_tree::{BaseType, Function, Struct, StructField, Tree, Type};

use crate::profile::{GlslVersion, Profile, ShaderStage};
use crate::writer::CodeWriter;

/// Upper bound (exclusive) on render-target slot indices.
pub const MAX_RENDER_TARGET_COUNT: u32 = 8;

/// Role of a struct in the entry function's signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructUsage {
    Generic,
    StageInput(ShaderStage),
    StageOutput(ShaderStage),
}

/// Render-target semantic: `SV_TARGET` or `SV_TARGET<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetSlot {
    Canonical,
    Indexed(u32),
}

impl TargetSlot {
    pub fn parse(semantic: &str) -> Option<Self> {
        const PREFIX: &str = "SV_TARGET";
        let head = semantic.get(..PREFIX.len())?;
        if !head.eq_ignore_ascii_case(PREFIX) {
            return None;
        }
        let digits = &semantic[PREFIX.len()..];
        if digits.is_empty() {
            return Some(TargetSlot::Canonical);
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let index: u32 = digits.parse().ok()?;
        (index < MAX_RENDER_TARGET_COUNT).then_some(TargetSlot::Indexed(index))
    }

    /// Output-variable index of the slot.
    pub fn index(self) -> u32 {
        match self {
            TargetSlot::Canonical => 0,
            TargetSlot::Indexed(n) => n,
        }
    }
}

const BUILT_IN_SEMANTICS: &[(&str, &str)] = &[
    ("SV_POSITION", "gl_Position"),
    ("DEPTH", "gl_FragDepth"),
];

/// Built-in variable bound to `semantic`, if any.
pub fn built_in_semantic(semantic: &str) -> Option<&'static str> {
    BUILT_IN_SEMANTICS
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(semantic))
        .map(|&(_, name)| name)
}

/// Vertex attributes with these semantics are always fed as four components.
const WIDENED_ATTRIBUTE_SEMANTICS: &[&str] = &["COLOR", "COLOR0", "COLOR1", "POSITION"];

fn is_widened_attribute(field: &StructField) -> bool {
    field.semantic.as_deref().is_some_and(|semantic| {
        WIDENED_ATTRIBUTE_SEMANTICS
            .iter()
            .any(|s| s.eq_ignore_ascii_case(semantic))
    })
}

/// Swizzle that narrows a `vec4` to `ty`'s component count.
pub fn narrowing_swizzle(ty: &Type) -> &'static str {
    match ty.base.components() {
        Some(1) => ".x",
        Some(2) => ".xy",
        Some(3) => ".xyz",
        _ => "",
    }
}

/// Name of the fragment color output for render target `slot`.
pub fn target_output_name(version: GlslVersion, slot: u32, mrt: bool) -> String {
    match (version, mrt) {
        (GlslVersion::Glsl100, false) => "gl_FragColor".to_owned(),
        (GlslVersion::Glsl100, true) => format!("gl_FragData[{slot}]"),
        (GlslVersion::Glsl300, false) => "out_FragColor0".to_owned(),
        (GlslVersion::Glsl300, true) => format!("out_FragColor{slot}"),
    }
}

/// What a stage struct field renders as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldBinding {
    BuiltIn(&'static str),
    /// Vertex input; `widened` when declared as `vec4` regardless of the field type.
    Attribute { name: String, widened: bool },
    Varying(String),
    Target(TargetSlot),
}

/// Struct usages for one generation call, fixed when the entry function is resolved.
#[derive(Debug)]
pub struct Bindings<'t> {
    stage: ShaderStage,
    input: Option<&'t Struct>,
    output: Option<&'t Struct>,
    usages: BTreeMap<&'t str, StructUsage>,
}

impl<'t> Bindings<'t> {
    /// Classifies every global struct relative to `entry`: the struct of its first argument is the
    /// stage input, the struct it returns is the stage output.
    pub fn classify(tree: &'t Tree, entry: &'t Function, stage: ShaderStage) -> Self {
        let input = entry
            .arguments
            .first()
            .and_then(|arg| arg.ty.struct_name())
            .and_then(|name| tree.find_global_struct(name));
        let output = entry
            .return_type
            .struct_name()
            .and_then(|name| tree.find_global_struct(name));

        let mut usages = BTreeMap::new();
        for statement in tree.statements() {
            if let sl_tree::Statement::Struct(st) = statement {
                let usage = if input.is_some_and(|s| s.name == st.name) {
                    StructUsage::StageInput(stage)
                } else if output.is_some_and(|s| s.name == st.name) {
                    StructUsage::StageOutput(stage)
                } else {
                    StructUsage::Generic
                };
                usages.entry(st.name.as_str()).or_insert(usage);
            }
        }
        Self {
            stage,
            input,
            output,
            usages,
        }
    }

    pub fn input(&self) -> Option<&'t Struct> {
        self.input
    }

    pub fn output(&self) -> Option<&'t Struct> {
        self.output
    }

    pub fn usage(&self, struct_name: &str) -> StructUsage {
        self.usages
            .get(struct_name)
            .copied()
            .unwrap_or(StructUsage::Generic)
    }

    pub fn usage_of(&self, ty: &Type) -> StructUsage {
        ty.struct_name()
            .map_or(StructUsage::Generic, |name| self.usage(name))
    }

    /// Binding of a field of a struct with `usage`; `None` for generic structs.
    pub fn bind_field(&self, usage: StructUsage, field: &StructField) -> Option<FieldBinding> {
        let semantic = field.semantic.as_deref();
        match usage {
            StructUsage::Generic => None,
            StructUsage::StageInput(ShaderStage::Vertex) => Some(FieldBinding::Attribute {
                name: format!("attr_{}", field.name),
                widened: is_widened_attribute(field),
            }),
            StructUsage::StageInput(ShaderStage::Fragment) => {
                Some(FieldBinding::Varying(format!("var_{}", field.name)))
            }
            StructUsage::StageOutput(_) => {
                if let Some(name) = semantic.and_then(built_in_semantic) {
                    Some(FieldBinding::BuiltIn(name))
                } else if let Some(slot) = semantic.and_then(TargetSlot::parse) {
                    Some(FieldBinding::Target(slot))
                } else {
                    Some(FieldBinding::Varying(format!("var_{}", field.name)))
                }
            }
        }
    }

    /// Declares the attributes and varyings of the stage structs.
    ///
    /// Fragment color outputs are declared by the MRT resolver.
    pub fn declare_interface(&self, profile: &Profile, w: &mut CodeWriter) {
        let (input_qualifier, output_qualifier) = match (profile.version, self.stage) {
            (GlslVersion::Glsl100, ShaderStage::Vertex) => ("attribute", "varying"),
            (GlslVersion::Glsl100, ShaderStage::Fragment) => ("varying", "varying"),
            (GlslVersion::Glsl300, _) => ("in", "out"),
        };

        if let Some(input) = self.input {
            let usage = StructUsage::StageInput(self.stage);
            for field in &input.fields {
                match self.bind_field(usage, field) {
                    Some(FieldBinding::Attribute { name, widened }) => {
                        let ty = if widened { "vec4" } else { interface_type_name(&field.ty) };
                        w.write_line(0, &format!("{input_qualifier} {ty} {name};"));
                    }
                    Some(FieldBinding::Varying(name)) => {
                        declare_varying(profile, w, input_qualifier, field, &name);
                    }
                    _ => {}
                }
            }
        }

        if self.stage == ShaderStage::Vertex {
            if let Some(output) = self.output {
                let usage = StructUsage::StageOutput(self.stage);
                for field in &output.fields {
                    if let Some(FieldBinding::Varying(name)) = self.bind_field(usage, field) {
                        declare_varying(profile, w, output_qualifier, field, &name);
                    }
                }
            }
        }
    }
}

fn declare_varying(
    profile: &Profile,
    w: &mut CodeWriter,
    qualifier: &str,
    field: &StructField,
    name: &str,
) {
    let ty = interface_type_name(&field.ty);
    match precision_prefix(profile, field) {
        Some(precision) => w.write_line(0, &format!("{qualifier} {precision} {ty} {name};")),
        None => w.write_line(0, &format!("{qualifier} {ty} {name};")),
    }
}

/// Precision qualifier for an interface field; mobile only.
fn precision_prefix(profile: &Profile, field: &StructField) -> Option<&'static str> {
    if !profile.is_mobile() {
        return None;
    }
    if field
        .attribute
        .as_deref()
        .is_some_and(|a| a.eq_ignore_ascii_case("lowp"))
    {
        Some("lowp")
    } else if field.ty.base.is_half() {
        Some("mediump")
    } else {
        None
    }
}

fn interface_type_name(ty: &Type) -> &str {
    match ty.base {
        BaseType::UserDefined => ty.type_name.as_deref().unwrap_or("void"),
        base => crate::emit::base_type_name(base),
    }
}
