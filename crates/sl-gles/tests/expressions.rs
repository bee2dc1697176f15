use sl_gles::{FeatureFlags, GenerateError, Generator, GlslVersion, Platform, ShaderStage};
use sl_tree::{
    Argument, BaseType, BinaryOp, Declaration, Expression, ForStatement, Function, Statement,
    Tree, UnaryOp,
};

fn ident(name: &str, ty: BaseType) -> Expression {
    Expression::identifier(name, ty)
}

fn entry(body: Vec<Statement>) -> Statement {
    Statement::Function(Function::new("fp_main", BaseType::Void, Vec::new(), body))
}

fn try_generate(
    statements: Vec<Statement>,
    platform: Platform,
    version: GlslVersion,
) -> Result<String, GenerateError> {
    let tree = Tree::new(statements);
    Generator::new(platform)
        .generate(&tree, version, ShaderStage::Fragment, "fp_main")
        .map(str::to_owned)
}

/// Fragment shader whose entry evaluates `body` on desktop GLSL 1.30.
fn generate_body(body: Vec<Statement>) -> String {
    try_generate(vec![entry(body)], Platform::DesktopOther, GlslVersion::Glsl100).unwrap()
}

#[test]
fn casts_only_when_base_types_differ() {
    let glsl = generate_body(vec![
        Statement::expression(Expression::assign(
            ident("v", BaseType::Float2),
            ident("w", BaseType::Float2),
        )),
        Statement::expression(Expression::assign(ident("f", BaseType::Float), Expression::int(1))),
        Statement::expression(Expression::assign(
            ident("f", BaseType::Float),
            Expression::cast(BaseType::Float, ident("i", BaseType::Int)),
        )),
    ]);
    assert!(glsl.contains("    v = w;\n"), "{glsl}");
    assert!(glsl.contains("    f = float(1);\n"), "{glsl}");
    assert!(glsl.contains("    f = float(i);\n"), "{glsl}");
    assert!(!glsl.contains("vec2(w)"), "{glsl}");
}

#[test]
fn arithmetic_and_return_values_are_cast_to_their_type() {
    let half_of = Function::new(
        "half_of",
        BaseType::Float,
        vec![Argument::new("n", BaseType::Int)],
        vec![Statement::ret(ident("n", BaseType::Int))],
    );
    let sum = Expression::binary(
        BinaryOp::Add,
        ident("f", BaseType::Float),
        Expression::int(2),
        BaseType::Float,
    );
    let glsl = try_generate(
        vec![
            Statement::Function(half_of),
            entry(vec![Statement::expression(Expression::assign(
                ident("f", BaseType::Float),
                sum,
            ))]),
        ],
        Platform::DesktopOther,
        GlslVersion::Glsl300,
    )
    .unwrap();
    assert!(glsl.contains("float half_of(int n) {\n    return float(n);\n}\n"), "{glsl}");
    assert!(glsl.contains("    f = (f + float(2));\n"), "{glsl}");
}

#[test]
fn mul_swaps_its_operands() {
    let glsl = generate_body(vec![Statement::expression(Expression::call(
        "mul",
        vec![ident("M", BaseType::Float4x4), ident("V", BaseType::Float4)],
        BaseType::Float4,
    ))]);
    assert!(glsl.contains("    ((V) * (M));\n"), "{glsl}");
}

#[test]
fn mul_requires_two_arguments() {
    let result = try_generate(
        vec![entry(vec![Statement::expression(Expression::call(
            "MUL",
            vec![ident("M", BaseType::Float4x4)],
            BaseType::Float4,
        ))])],
        Platform::DesktopOther,
        GlslVersion::Glsl100,
    );
    assert_eq!(
        result,
        Err(GenerateError::IntrinsicArity {
            name: "mul",
            expected: 2,
            found: 1
        })
    );
}

#[test]
fn saturate_becomes_clamp() {
    let glsl = generate_body(vec![Statement::expression(Expression::call(
        "saturate",
        vec![ident("x", BaseType::Float)],
        BaseType::Float,
    ))]);
    assert!(glsl.contains("    clamp(x, 0.0, 1.0);\n"), "{glsl}");
}

#[test]
fn scalar_swizzle_is_a_helper_call() {
    let glsl = generate_body(vec![Statement::expression(Expression::member(
        ident("k", BaseType::Float),
        "xxx",
        BaseType::Float3,
    ))]);
    assert!(glsl.contains("vec3 m_scalar_swizzle30(float x) { return vec3(x); }\n"), "{glsl}");
    assert!(glsl.contains("    m_scalar_swizzle30(k);\n"), "{glsl}");
    assert!(!glsl.contains("(k).xxx"), "{glsl}");

    let glsl = generate_body(vec![Statement::expression(Expression::member(
        ident("v", BaseType::Float4),
        "xyz",
        BaseType::Float3,
    ))]);
    assert!(glsl.contains("    (v).xyz;\n"), "{glsl}");
    assert!(!glsl.contains("m_scalar_swizzle"), "{glsl}");
}

#[test]
fn intrinsics_are_renamed_per_generation() {
    let body = || {
        vec![
            Statement::expression(Expression::call(
                "tex2D",
                vec![ident("s", BaseType::Sampler2D), ident("uv", BaseType::Float2)],
                BaseType::Float4,
            )),
            Statement::expression(Expression::call(
                "Frac",
                vec![ident("x", BaseType::Float)],
                BaseType::Float,
            )),
            Statement::expression(Expression::call(
                "lerp",
                vec![
                    ident("a", BaseType::Float),
                    ident("b", BaseType::Float),
                    ident("t", BaseType::Float),
                ],
                BaseType::Float,
            )),
            Statement::expression(Expression::call(
                "ddx",
                vec![ident("x", BaseType::Float)],
                BaseType::Float,
            )),
            Statement::expression(Expression::call(
                "normalize",
                vec![ident("n", BaseType::Float3)],
                BaseType::Float3,
            )),
        ]
    };

    let legacy = try_generate(vec![entry(body())], Platform::DesktopOther, GlslVersion::Glsl100)
        .unwrap();
    assert!(legacy.contains("    texture2D(s, uv);\n"), "{legacy}");
    assert!(legacy.contains("    fract(x);\n"), "{legacy}");
    assert!(legacy.contains("    mix(a, b, t);\n"), "{legacy}");
    assert!(legacy.contains("    dFdx(x);\n"), "{legacy}");
    assert!(legacy.contains("    normalize(n);\n"), "{legacy}");

    let modern = try_generate(vec![entry(body())], Platform::MobileEsB, GlslVersion::Glsl300)
        .unwrap();
    assert!(modern.contains("    texture(s, uv);\n"), "{modern}");

    let mac = try_generate(vec![entry(body())], Platform::DesktopMac, GlslVersion::Glsl100)
        .unwrap();
    assert!(mac.contains("    lerp(a, b, t);\n"), "{mac}");
}

#[test]
fn reserved_words_and_helpers_avoid_user_names() {
    let glsl = generate_body(vec![
        Statement::Declaration(
            Declaration::new("mix", BaseType::Float).with_initializer(Expression::float(0.5)),
        ),
        Statement::Declaration(
            Declaration::new("clip0", BaseType::Float)
                .with_initializer(ident("mix", BaseType::Float)),
        ),
        Statement::expression(Expression::call(
            "clip",
            vec![ident("clip0", BaseType::Float)],
            BaseType::Void,
        )),
    ]);
    assert!(glsl.contains("    float mix0 = 0.5;\n"), "{glsl}");
    assert!(glsl.contains("    float clip0 = mix0;\n"), "{glsl}");
    assert!(glsl.contains("void clip1(float x) { if (x < 0.0) discard; }\n"), "{glsl}");
    assert!(glsl.contains("    clip1(clip0);\n"), "{glsl}");
}

#[test]
fn operators_and_control_flow() {
    let glsl = generate_body(vec![
        Statement::For(ForStatement {
            initialization: Some(
                Declaration::new("i", BaseType::Int).with_initializer(Expression::int(0)),
            ),
            condition: Some(Expression::binary(
                BinaryOp::Less,
                ident("i", BaseType::Int),
                Expression::int(4),
                BaseType::Bool,
            )),
            increment: Some(Expression::unary(UnaryOp::PostIncrement, ident("i", BaseType::Int))),
            body: vec![Statement::if_else(
                Expression::unary(UnaryOp::Not, ident("done", BaseType::Bool)),
                vec![Statement::Continue],
                vec![Statement::Break],
            )],
        }),
        Statement::expression(Expression::assign(
            ident("c", BaseType::Float),
            Expression::conditional(
                ident("flag", BaseType::Bool),
                Expression::float(1.0),
                Expression::unary(UnaryOp::Negative, ident("c", BaseType::Float)),
            ),
        )),
        Statement::Return(None),
    ]);
    let expected_loop = "    for (int i = 0; (i < 4); (i++)) {\n\
                         \x20       if ((!done)) {\n\
                         \x20           continue;\n\
                         \x20       } else {\n\
                         \x20           break;\n\
                         \x20       }\n\
                         \x20   }\n";
    assert!(glsl.contains(expected_loop), "{glsl}");
    assert!(glsl.contains("    c = ((flag)?(1.0):((-c)));\n"), "{glsl}");
    assert!(glsl.contains("    return;\n"), "{glsl}");
}

#[test]
fn nested_assignments_keep_their_grouping() {
    let assign = || Expression::assign(ident("a", BaseType::Float), ident("b", BaseType::Float));
    let glsl = generate_body(vec![
        Statement::expression(Expression::binary(
            BinaryOp::Greater,
            assign(),
            Expression::float(0.0),
            BaseType::Bool,
        )),
        Statement::expression(Expression::unary(UnaryOp::Negative, assign())),
        Statement::For(ForStatement {
            initialization: None,
            condition: None,
            increment: Some(Expression::binary(
                BinaryOp::AddAssign,
                ident("a", BaseType::Float),
                Expression::float(1.0),
                BaseType::Float,
            )),
            body: Vec::new(),
        }),
    ]);
    assert!(glsl.contains("    ((a = b) > 0.0);\n"), "{glsl}");
    assert!(glsl.contains("    (-(a = b));\n"), "{glsl}");
    assert!(glsl.contains("    for (; ; a += 1.0) {\n"), "{glsl}");
}

#[test]
fn non_finite_literals_and_lod_extensions() {
    let tree = vec![entry(vec![
        Statement::expression(Expression::assign(
            ident("f", BaseType::Float),
            Expression::float(f32::INFINITY),
        )),
        Statement::expression(Expression::call(
            "tex2Dlod",
            vec![ident("s", BaseType::Sampler2D), ident("uv", BaseType::Float4)],
            BaseType::Float4,
        )),
    ])];
    let glsl = try_generate(tree, Platform::MobileEsA, GlslVersion::Glsl100).unwrap();
    assert!(glsl.contains("    f = (1.0 / 0.0);\n"), "{glsl}");
    assert!(glsl.contains("#extension GL_EXT_shader_texture_lod : enable\n"), "{glsl}");
    assert!(glsl.contains("#define texture2DLod texture2DLodEXT\n"), "{glsl}");
    assert!(glsl.contains("    texture2DLod(s, uv);\n"), "{glsl}");

    let mut generator = Generator::new(Platform::MobileEsA);
    let tree = Tree::new(vec![entry(vec![Statement::expression(Expression::call(
        "sincos",
        vec![
            ident("a", BaseType::Float),
            ident("s", BaseType::Float),
            ident("c", BaseType::Float),
        ],
        BaseType::Void,
    ))])]);
    let glsl = generator
        .generate(&tree, GlslVersion::Glsl100, ShaderStage::Fragment, "fp_main")
        .unwrap();
    assert!(glsl.contains("void sincos0(vec2 x, out vec2 s, out vec2 c)"), "{glsl}");
    assert!(glsl.contains("    sincos0(a, s, c);\n"), "{glsl}");
    assert!(generator.last_features().contains(FeatureFlags::SIN_COS));
}
