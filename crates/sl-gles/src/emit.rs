//! Statement and expression emission.

use std::fmt::Write as _;

use sl_tree::{
    ArgumentModifier, BaseType, BinaryOp, Buffer, Declaration, Expression, ExpressionKind,
    ForStatement, Function, FunctionCall, IfStatement, Statement, Struct, StructField, Tree, Type,
    UnaryOp,
};

use crate::binding::{
    built_in_semantic, narrowing_swizzle, target_output_name, Bindings, FieldBinding, StructUsage,
    TargetSlot,
};
use crate::error::{ErrorSink, GenerateError};
use crate::features::FeatureFlags;
use crate::helpers::emit_helpers;
use crate::literal::format_literal;
use crate::mrt::{self, FRAMEBUFFER_FETCH};
use crate::names::{Helper, NameTable};
use crate::profile::{GlslVersion, Platform, Profile};
use crate::writer::CodeWriter;

/// GLSL spelling of a built-in type. Half precision maps onto the float types.
pub(crate) fn base_type_name(base: BaseType) -> &'static str {
    match base {
        BaseType::Void | BaseType::UserDefined => "void",
        BaseType::Bool => "bool",
        BaseType::Int => "int",
        BaseType::Int2 => "ivec2",
        BaseType::Int3 => "ivec3",
        BaseType::Int4 => "ivec4",
        BaseType::Uint => "uint",
        BaseType::Uint2 => "uvec2",
        BaseType::Uint3 => "uvec3",
        BaseType::Uint4 => "uvec4",
        BaseType::Float | BaseType::Half => "float",
        BaseType::Float2 | BaseType::Half2 => "vec2",
        BaseType::Float3 | BaseType::Half3 => "vec3",
        BaseType::Float4 | BaseType::Half4 => "vec4",
        BaseType::Float3x3 | BaseType::Half3x3 => "mat3",
        BaseType::Float4x4 | BaseType::Half4x4 => "mat4",
        BaseType::Texture | BaseType::Sampler2D => "sampler2D",
        BaseType::SamplerCube => "samplerCube",
        BaseType::Sampler2DShadow => "sampler2DShadow",
        BaseType::Sampler3D => "sampler3D",
    }
}

#[derive(Debug, Clone, Copy)]
enum Remap {
    Fixed(&'static str),
    ByGeneration {
        legacy: &'static str,
        modern: &'static str,
    },
    Helper(Helper),
    /// `mix`, except where the preamble defines a `lerp` macro.
    Lerp,
}

const INTRINSIC_REMAPS: &[(&str, Remap)] = &[
    ("tex2D", Remap::ByGeneration { legacy: "texture2D", modern: "texture" }),
    ("tex2Dcmp", Remap::ByGeneration { legacy: "shadow2D", modern: "texture" }),
    ("tex2Dproj", Remap::ByGeneration { legacy: "texture2DProj", modern: "textureProj" }),
    ("tex2Dlod", Remap::ByGeneration { legacy: "texture2DLod", modern: "textureLod" }),
    ("tex3D", Remap::ByGeneration { legacy: "texture3D", modern: "texture" }),
    ("texCUBE", Remap::ByGeneration { legacy: "textureCube", modern: "texture" }),
    ("texCUBElod", Remap::ByGeneration { legacy: "textureCubeLod", modern: "textureLod" }),
    ("tex2Dgrad", Remap::Fixed("textureGrad")),
    ("tex2Dsize", Remap::Fixed("textureSize")),
    ("atan2", Remap::Fixed("atan")),
    ("fmod", Remap::Fixed("mod")),
    ("frac", Remap::Fixed("fract")),
    ("ddx", Remap::Fixed("dFdx")),
    ("ddy", Remap::Fixed("dFdy")),
    ("lerp", Remap::Lerp),
    ("clip", Remap::Helper(Helper::Clip)),
    ("sincos", Remap::Helper(Helper::SinCos)),
    ("tex2Dbias", Remap::Helper(Helper::Tex2DBias)),
    ("tex3Dlod", Remap::Helper(Helper::Tex3DLod)),
    ("texCUBEbias", Remap::Helper(Helper::TexCubeBias)),
];

fn lookup_remap(name: &str) -> Option<Remap> {
    INTRINSIC_REMAPS
        .iter()
        .find(|(source, _)| source.eq_ignore_ascii_case(name))
        .map(|&(_, remap)| remap)
}

/// Parses an `s<N>` sampler register.
fn sampler_register(decl: &Declaration) -> Result<u32, GenerateError> {
    let register = decl
        .register
        .as_deref()
        .ok_or_else(|| GenerateError::MissingSamplerRegister {
            name: decl.name.clone(),
        })?;
    register
        .strip_prefix(|c: char| c.eq_ignore_ascii_case(&'s'))
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| GenerateError::InvalidSamplerRegister {
            name: decl.name.clone(),
            register: register.to_owned(),
        })
}

fn unary_operator(op: UnaryOp) -> (&'static str, bool) {
    match op {
        UnaryOp::Negative => ("-", true),
        UnaryOp::Positive => ("+", true),
        UnaryOp::Not => ("!", true),
        UnaryOp::PreIncrement => ("++", true),
        UnaryOp::PreDecrement => ("--", true),
        UnaryOp::PostIncrement => ("++", false),
        UnaryOp::PostDecrement => ("--", false),
    }
}

fn binary_operator(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => " + ",
        BinaryOp::Sub => " - ",
        BinaryOp::Mul => " * ",
        BinaryOp::Div => " / ",
        BinaryOp::Less => " < ",
        BinaryOp::Greater => " > ",
        BinaryOp::LessEqual => " <= ",
        BinaryOp::GreaterEqual => " >= ",
        BinaryOp::Equal => " == ",
        BinaryOp::NotEqual => " != ",
        BinaryOp::And => " && ",
        BinaryOp::Or => " || ",
        BinaryOp::Assign => " = ",
        BinaryOp::AddAssign => " += ",
        BinaryOp::SubAssign => " -= ",
        BinaryOp::MulAssign => " *= ",
        BinaryOp::DivAssign => " /= ",
    }
}

fn is_assignment(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::Assign
            | BinaryOp::AddAssign
            | BinaryOp::SubAssign
            | BinaryOp::MulAssign
            | BinaryOp::DivAssign
    )
}

/// One emission pass over a tree. Owns the output text and the call's error state.
pub(crate) struct Emitter<'a, 't> {
    tree: &'t Tree,
    profile: Profile,
    entry: &'t Function,
    bindings: &'a Bindings<'t>,
    names: &'a NameTable,
    features: FeatureFlags,
    w: CodeWriter,
    errors: ErrorSink,
    in_entry: bool,
}

impl<'a, 't> Emitter<'a, 't> {
    pub(crate) fn new(
        tree: &'t Tree,
        profile: Profile,
        entry: &'t Function,
        bindings: &'a Bindings<'t>,
        names: &'a NameTable,
        features: FeatureFlags,
    ) -> Self {
        Self {
            tree,
            profile,
            entry,
            bindings,
            names,
            features,
            w: CodeWriter::new(),
            errors: ErrorSink::default(),
            in_entry: false,
        }
    }

    /// Emits the whole shader: preamble, interface, helpers, global statements and `main`.
    pub(crate) fn emit_shader(mut self) -> (String, ErrorSink) {
        for line in self.profile.preamble(self.features) {
            self.w.write_line(0, line);
        }
        self.emit_interface();
        emit_helpers(&self.profile, self.features, self.names, &mut self.w);
        let tree = self.tree;
        self.emit_statements(0, tree.statements(), None);
        self.emit_main();
        (self.w.into_string(), self.errors)
    }

    fn emit_interface(&mut self) {
        let start = self.w.as_str().len();
        self.bindings.declare_interface(&self.profile, &mut self.w);
        if self.profile.is_fragment() && !self.profile.is_legacy() {
            let fetched = mrt::fetch_slots(self.tree, &mut self.errors);
            let declarations = mrt::resolve(self.render_targets(), fetched);
            mrt::declare_outputs(&declarations, &mut self.w);
        }
        if self.w.as_str().len() > start {
            self.w.write_line(0, "");
        }
    }

    /// Render-target slots written by the entry function, in declaration order.
    fn render_targets(&self) -> Vec<TargetSlot> {
        match self.bindings.output() {
            Some(output) => output
                .fields
                .iter()
                .filter_map(|field| field.semantic.as_deref().and_then(TargetSlot::parse))
                .collect(),
            None => self
                .entry
                .semantic
                .as_deref()
                .and_then(TargetSlot::parse)
                .into_iter()
                .collect(),
        }
    }

    fn mrt(&self) -> bool {
        self.features.contains(FeatureFlags::MRT)
    }

    fn emit_main(&mut self) {
        self.w.write_line(0, "void main()");
        self.w.write_line(0, "{");

        let tree = self.tree;
        let properties: Vec<&Declaration> = tree
            .statements()
            .iter()
            .filter_map(|statement| match statement {
                Statement::Declaration(decl) if decl.ty.is_property() && !decl.ty.array => {
                    Some(decl)
                }
                _ => None,
            })
            .collect();
        if !properties.is_empty() {
            self.w.write_line(1, "// properties");
            for decl in properties {
                self.w.begin_line(1);
                self.emit_declaration(decl);
                self.w.end_line(";");
            }
            self.w.write_line(0, "");
        }

        let entry = self.entry;
        self.in_entry = true;
        self.emit_statements(1, &entry.body, Some(&entry.return_type));
        self.in_entry = false;
        self.w.write_line(0, "}");
    }

    fn emit_statements(&mut self, indent: usize, statements: &[Statement], ret: Option<&Type>) {
        for statement in statements {
            self.emit_statement(indent, statement, ret);
        }
    }

    fn emit_statement(&mut self, indent: usize, statement: &Statement, ret: Option<&Type>) {
        match statement {
            Statement::Declaration(decl) => self.emit_declaration_statement(indent, decl),
            Statement::Struct(st) => self.emit_struct(indent, st),
            Statement::Buffer(buffer) => self.emit_buffer(indent, buffer),
            Statement::Function(function) => {
                if function.name != self.entry.name {
                    self.emit_function(indent, function);
                }
            }
            Statement::If(stmt) => self.emit_if(indent, stmt, ret),
            Statement::For(stmt) => self.emit_for(indent, stmt, ret),
            Statement::Block(body) => {
                self.w.write_line(indent, "{");
                self.emit_statements(indent + 1, body, ret);
                self.w.write_line(indent, "}");
            }
            Statement::Return(value) => self.emit_return(indent, value.as_ref(), ret),
            Statement::Discard => {
                if self.profile.is_fragment() {
                    self.w.write_line(indent, "discard;");
                }
            }
            Statement::Break => self.w.write_line(indent, "break;"),
            Statement::Continue => self.w.write_line(indent, "continue;"),
            Statement::Expression(expr) => {
                self.w.begin_line(indent);
                self.emit_statement_expression(expr);
                self.w.end_line(";");
            }
        }
    }

    fn emit_declaration_statement(&mut self, indent: usize, decl: &Declaration) {
        if decl.ty.base == BaseType::Texture
            || self.bindings.usage_of(&decl.ty) != StructUsage::Generic
        {
            return;
        }
        if indent == 0 {
            if decl.ty.is_property() {
                if decl.ty.array && !decl.initializer.is_empty() {
                    self.emit_property_macro(decl);
                }
                return;
            }
            if decl.ty.base.is_sampler() {
                self.emit_sampler_uniform(decl);
                return;
            }
            self.w.begin_line(0);
            self.w.write(if decl.ty.is_const() { "const " } else { "uniform " });
        } else {
            self.w.begin_line(indent);
        }
        self.emit_declaration(decl);
        self.w.end_line(";");
    }

    /// `T name[size] = initializer` without qualifier or terminator.
    fn emit_declaration(&mut self, decl: &Declaration) {
        self.emit_typed_name(&decl.ty, &decl.name);
        if decl.initializer.is_empty() {
            return;
        }
        self.w.write(" = ");
        if decl.ty.array {
            self.emit_array_literal(&decl.ty, &decl.initializer, "( ", " )");
        } else if let Some(value) = decl.initializer.first() {
            self.emit_expression(value, Some(&decl.ty));
        }
    }

    fn emit_array_literal(&mut self, ty: &Type, values: &[Expression], open: &str, close: &str) {
        self.emit_type(ty);
        self.emit_array_size(ty);
        self.w.write(open);
        self.emit_arguments(values, &[]);
        self.w.write(close);
    }

    fn emit_array_size(&mut self, ty: &Type) {
        self.w.write("[");
        if let Some(size) = &ty.array_size {
            self.emit_expression(size, None);
        }
        self.w.write("]");
    }

    fn emit_property_macro(&mut self, decl: &Declaration) {
        let names = self.names;
        self.w.begin_line(0);
        let _ = write!(self.w, "#define {} (", names.safe(&decl.name));
        self.emit_array_literal(&decl.ty, &decl.initializer, "(", ")");
        self.w.end_line(")");
    }

    fn emit_sampler_uniform(&mut self, decl: &Declaration) {
        let index = match sampler_register(decl) {
            Ok(index) => index,
            Err(err) => {
                self.errors.report(err);
                return;
            }
        };
        let precision = if self.profile.is_mobile() { "lowp " } else { "" };
        let _ = writeln!(
            self.w,
            "uniform {precision}{} {}Texture{index};",
            base_type_name(decl.ty.base),
            self.profile.stage.texture_prefix()
        );
    }

    fn emit_struct(&mut self, indent: usize, st: &Struct) {
        if self.bindings.usage(&st.name) != StructUsage::Generic {
            return;
        }
        let names = self.names;
        self.w.write_line(indent, &format!("struct {} {{", names.safe(&st.name)));
        for field in &st.fields {
            self.w.begin_line(indent + 1);
            self.emit_typed_name(&field.ty, &field.name);
            self.w.end_line(";");
        }
        self.w.write_line(indent, "};");
        if indent == 0 {
            self.w.write_line(0, "");
        }
    }

    fn emit_buffer(&mut self, indent: usize, buffer: &Buffer) {
        let names = self.names;
        let decl = &buffer.field;
        let big_array = decl
            .annotation
            .as_deref()
            .is_some_and(|annotation| annotation.contains("bigarray"));
        let register = decl.register.as_deref().filter(|_| big_array);

        self.w.begin_line(indent);
        self.w.write("uniform ");
        self.emit_type(&decl.ty);
        self.w.write(" ");
        self.w.write(register.unwrap_or_else(|| names.safe(&decl.name)));
        self.emit_array_size(&decl.ty);
        self.w.end_line(";");
        if let Some(register) = register {
            self.w
                .write_line(indent, &format!("#define {} {register}", names.safe(&decl.name)));
        }
    }

    fn emit_function(&mut self, indent: usize, function: &Function) {
        let names = self.names;
        self.w.begin_line(indent);
        self.emit_type(&function.return_type);
        let _ = write!(self.w, " {}(", names.safe(&function.name));
        for (i, arg) in function.arguments.iter().enumerate() {
            if i > 0 {
                self.w.write(", ");
            }
            self.w.write(match arg.modifier {
                ArgumentModifier::None => "",
                ArgumentModifier::In => "in ",
                ArgumentModifier::Inout => "inout ",
            });
            self.emit_typed_name(&arg.ty, &arg.name);
        }
        self.w.end_line(") {");
        self.emit_statements(indent + 1, &function.body, Some(&function.return_type));
        self.w.write_line(indent, "}");
        self.w.write_line(0, "");
    }

    fn emit_if(&mut self, indent: usize, stmt: &IfStatement, ret: Option<&Type>) {
        let bool_ty = Type::new(BaseType::Bool);
        self.w.begin_line(indent);
        self.w.write("if (");
        self.emit_expression(&stmt.condition, Some(&bool_ty));
        self.w.end_line(") {");
        self.emit_statements(indent + 1, &stmt.then_body, ret);
        if let Some(else_body) = &stmt.else_body {
            self.w.write_line(indent, "} else {");
            self.emit_statements(indent + 1, else_body, ret);
        }
        self.w.write_line(indent, "}");
    }

    fn emit_for(&mut self, indent: usize, stmt: &ForStatement, ret: Option<&Type>) {
        let bool_ty = Type::new(BaseType::Bool);
        self.w.begin_line(indent);
        self.w.write("for (");
        if let Some(init) = &stmt.initialization {
            self.emit_declaration(init);
        }
        self.w.write("; ");
        if let Some(condition) = &stmt.condition {
            self.emit_expression(condition, Some(&bool_ty));
        }
        self.w.write("; ");
        if let Some(increment) = &stmt.increment {
            self.emit_statement_expression(increment);
        }
        self.w.end_line(") {");
        self.emit_statements(indent + 1, &stmt.body, ret);
        self.w.write_line(indent, "}");
    }

    fn emit_return(&mut self, indent: usize, value: Option<&Expression>, ret: Option<&Type>) {
        let Some(value) = value else {
            self.w.write_line(indent, "return;");
            return;
        };
        if self.in_entry {
            if matches!(
                self.bindings.usage_of(&value.ty),
                StructUsage::StageOutput(_)
            ) {
                self.w.write_line(indent, "return;");
                return;
            }
            if let Some(target) = self.entry_return_target() {
                let entry = self.entry;
                self.w.begin_line(indent);
                let _ = write!(self.w, "{target} = ");
                self.emit_expression(value, Some(&entry.return_type));
                self.w.end_line(";");
                self.w.write_line(indent, "return;");
                return;
            }
        }
        self.w.begin_line(indent);
        self.w.write("return ");
        self.emit_expression(value, ret);
        self.w.end_line(";");
    }

    /// Variable bound to the entry function's own return semantic.
    fn entry_return_target(&self) -> Option<String> {
        let semantic = self.entry.semantic.as_deref()?;
        if let Some(name) = built_in_semantic(semantic) {
            return Some(name.to_owned());
        }
        let slot = TargetSlot::parse(semantic)?;
        let name = target_output_name(self.profile.version, slot.index(), self.mrt());
        Some(name + narrowing_swizzle(&self.entry.return_type))
    }

    fn emit_type(&mut self, ty: &Type) {
        match ty.base {
            BaseType::UserDefined => {
                let names = self.names;
                let name = ty.type_name.as_deref().unwrap_or_default();
                self.w.write(names.safe(name));
            }
            base => self.w.write(base_type_name(base)),
        }
    }

    fn emit_typed_name(&mut self, ty: &Type, name: &str) {
        let names = self.names;
        self.emit_type(ty);
        self.w.write(" ");
        self.w.write(names.safe(name));
        if ty.array {
            self.emit_array_size(ty);
        }
    }

    fn emit_arguments(&mut self, arguments: &[Expression], parameters: &[Type]) {
        for (i, arg) in arguments.iter().enumerate() {
            if i > 0 {
                self.w.write(", ");
            }
            self.emit_expression(arg, parameters.get(i));
        }
    }

    /// Emits an expression whose value is discarded. A top-level assignment is left unwrapped.
    fn emit_statement_expression(&mut self, expr: &Expression) {
        match &expr.kind {
            ExpressionKind::Binary { op, lhs, rhs } if is_assignment(*op) => {
                self.emit_expression(lhs, None);
                self.w.write(binary_operator(*op));
                self.emit_expression(rhs, Some(&expr.ty));
            }
            _ => self.emit_expression(expr, None),
        }
    }

    /// Emits `expr`, wrapped in a constructor cast when `hint` names a different base type.
    fn emit_expression(&mut self, expr: &Expression, hint: Option<&Type>) {
        let cast = hint.filter(|target| {
            target.base != expr.ty.base && !matches!(expr.kind, ExpressionKind::Casting(_))
        });
        if let Some(target) = cast {
            self.emit_type(target);
            self.w.write("(");
        }

        match &expr.kind {
            ExpressionKind::Identifier(name) => self.emit_identifier(name, &expr.ty),
            ExpressionKind::Literal(literal) => self.w.write(&format_literal(literal)),
            ExpressionKind::Unary { op, operand } => {
                let (symbol, prefix) = unary_operator(*op);
                let operand_hint = (*op == UnaryOp::Not).then_some(&expr.ty);
                self.w.write("(");
                if prefix {
                    self.w.write(symbol);
                    self.emit_expression(operand, operand_hint);
                } else {
                    self.emit_expression(operand, operand_hint);
                    self.w.write(symbol);
                }
                self.w.write(")");
            }
            ExpressionKind::Binary { op, lhs, rhs } => {
                let (lhs_hint, rhs_hint) = match op {
                    BinaryOp::Add | BinaryOp::Sub | BinaryOp::And | BinaryOp::Or => {
                        (Some(&expr.ty), Some(&expr.ty))
                    }
                    op if is_assignment(*op) => (None, Some(&expr.ty)),
                    _ => (None, None),
                };
                self.w.write("(");
                self.emit_expression(lhs, lhs_hint);
                self.w.write(binary_operator(*op));
                self.emit_expression(rhs, rhs_hint);
                self.w.write(")");
            }
            ExpressionKind::Conditional {
                condition,
                if_true,
                if_false,
            } => {
                let bool_ty = Type::new(BaseType::Bool);
                self.w.write("((");
                self.emit_expression(condition, Some(&bool_ty));
                self.w.write(")?(");
                self.emit_expression(if_true, Some(&expr.ty));
                self.w.write("):(");
                self.emit_expression(if_false, Some(&expr.ty));
                self.w.write("))");
            }
            ExpressionKind::MemberAccess { object, field } => {
                self.emit_member_access(object, field)
            }
            ExpressionKind::ArrayAccess { array, index } => {
                self.emit_expression(array, None);
                self.w.write("[");
                self.emit_expression(index, None);
                self.w.write("]");
            }
            ExpressionKind::FunctionCall(call) => self.emit_call(call),
            ExpressionKind::Constructor(arguments) => {
                self.emit_type(&expr.ty);
                self.w.write("(");
                self.emit_arguments(arguments, &[]);
                self.w.write(")");
            }
            ExpressionKind::Casting(operand) => {
                self.emit_type(&expr.ty);
                self.w.write("(");
                self.emit_expression(operand, None);
                self.w.write(")");
            }
        }

        if cast.is_some() {
            self.w.write(")");
        }
    }

    fn emit_identifier(&mut self, name: &str, ty: &Type) {
        if ty.base.is_sampler() {
            let sampler = self
                .tree
                .find_global_declaration(name)
                .filter(|decl| decl.ty.base.is_sampler());
            if let Some(decl) = sampler {
                match sampler_register(decl) {
                    Ok(index) => {
                        let prefix = self.profile.stage.texture_prefix();
                        let _ = write!(self.w, "{prefix}Texture{index}");
                        return;
                    }
                    Err(err) => self.errors.report(err),
                }
            }
        }
        let names = self.names;
        self.w.write(names.safe(name));
    }

    fn emit_member_access(&mut self, object: &Expression, field: &str) {
        let names = self.names;
        if let Some((binding, declared)) = self.stage_field_binding(object, field) {
            self.emit_field_binding(binding, declared);
            return;
        }
        if object.ty.base.is_numeric_scalar() {
            // GLSL cannot swizzle scalars.
            if let Some(helper) = Helper::scalar_swizzle(field.len()) {
                self.w.write(names.helper(helper));
            }
            self.w.write("(");
            self.emit_expression(object, None);
            self.w.write(")");
            return;
        }
        self.w.write("(");
        self.emit_expression(object, None);
        self.w.write(").");
        self.w.write(names.safe(field));
    }

    fn stage_field_binding(
        &self,
        object: &Expression,
        field: &str,
    ) -> Option<(FieldBinding, &'t StructField)> {
        let usage = self.bindings.usage_of(&object.ty);
        let st = match usage {
            StructUsage::Generic => return None,
            StructUsage::StageInput(_) => self.bindings.input()?,
            StructUsage::StageOutput(_) => self.bindings.output()?,
        };
        let declared = st.field(field)?;
        Some((self.bindings.bind_field(usage, declared)?, declared))
    }

    fn emit_field_binding(&mut self, binding: FieldBinding, field: &StructField) {
        match binding {
            FieldBinding::BuiltIn(name) => self.w.write(name),
            FieldBinding::Attribute { name, widened } => {
                self.w.write(&name);
                if widened {
                    self.w.write(narrowing_swizzle(&field.ty));
                }
            }
            FieldBinding::Varying(name) => self.w.write(&name),
            FieldBinding::Target(slot) => {
                let name = target_output_name(self.profile.version, slot.index(), self.mrt());
                self.w.write(&name);
                self.w.write(narrowing_swizzle(&field.ty));
            }
        }
    }

    fn emit_call(&mut self, call: &FunctionCall) {
        let names = self.names;
        if call.name == FRAMEBUFFER_FETCH {
            match mrt::fetch_slot(call) {
                Ok(slot) if !self.profile.is_legacy() => {
                    self.w
                        .write(&target_output_name(GlslVersion::Glsl300, slot, true));
                    return;
                }
                Ok(_) => {}
                Err(err) => self.errors.report(err),
            }
        } else if call.name.eq_ignore_ascii_case("mul") {
            self.emit_mul(call);
            return;
        } else if call.name.eq_ignore_ascii_case("saturate") {
            self.emit_saturate(call);
            return;
        }

        let target = match lookup_remap(&call.name) {
            Some(Remap::Fixed(name)) => name,
            Some(Remap::ByGeneration { legacy, modern }) => {
                if self.profile.is_legacy() {
                    legacy
                } else {
                    modern
                }
            }
            Some(Remap::Helper(helper)) => names.helper(helper),
            Some(Remap::Lerp) => match self.profile.platform {
                Platform::DesktopMac => "lerp",
                _ => "mix",
            },
            None => names.safe(&call.name),
        };
        self.w.write(target);
        self.w.write("(");
        self.emit_arguments(&call.arguments, &call.parameters);
        self.w.write(")");
    }

    /// `mul(a, b)` multiplies in the opposite order under GLSL's column-major convention.
    fn emit_mul(&mut self, call: &FunctionCall) {
        let [lhs, rhs] = call.arguments.as_slice() else {
            self.errors.report(GenerateError::IntrinsicArity {
                name: "mul",
                expected: 2,
                found: call.arguments.len(),
            });
            return;
        };
        self.w.write("((");
        self.emit_expression(rhs, call.parameters.get(1));
        self.w.write(") * (");
        self.emit_expression(lhs, call.parameters.first());
        self.w.write("))");
    }

    fn emit_saturate(&mut self, call: &FunctionCall) {
        let [value] = call.arguments.as_slice() else {
            self.errors.report(GenerateError::IntrinsicArity {
                name: "saturate",
                expected: 1,
                found: call.arguments.len(),
            });
            return;
        };
        self.w.write("clamp(");
        self.emit_expression(value, call.parameters.first());
        self.w.write(", 0.0, 1.0)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn half_types_lower_to_float_types() {
        assert_eq!(base_type_name(BaseType::Half3), "vec3");
        assert_eq!(base_type_name(BaseType::Half4x4), "mat4");
        assert_eq!(base_type_name(BaseType::Uint2), "uvec2");
    }

    #[test]
    fn intrinsic_lookup_ignores_case() {
        assert!(matches!(lookup_remap("TEX2D"), Some(Remap::ByGeneration { .. })));
        assert!(matches!(lookup_remap("Frac"), Some(Remap::Fixed("fract"))));
        assert!(matches!(lookup_remap("CLIP"), Some(Remap::Helper(Helper::Clip))));
        assert!(lookup_remap("normalize").is_none());
    }

    #[test]
    fn sampler_registers() {
        let decl = |register: Option<&str>| {
            let decl = Declaration::new("albedo", BaseType::Sampler2D);
            match register {
                Some(r) => decl.with_register(r),
                None => decl,
            }
        };
        assert_eq!(sampler_register(&decl(Some("s3"))), Ok(3));
        assert_eq!(sampler_register(&decl(Some("S12"))), Ok(12));
        assert_eq!(
            sampler_register(&decl(None)),
            Err(GenerateError::MissingSamplerRegister {
                name: "albedo".to_owned()
            })
        );
        for bad in ["t0", "s", "s+1", "sx"] {
            assert_eq!(
                sampler_register(&decl(Some(bad))),
                Err(GenerateError::InvalidSamplerRegister {
                    name: "albedo".to_owned(),
                    register: bad.to_owned(),
                }),
                "{bad}"
            );
        }
    }
}
