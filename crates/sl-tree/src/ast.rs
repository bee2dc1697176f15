//! Expression and statement nodes.
//!
//! Every node kind is a variant of a closed enum so consumers match exhaustively; adding a kind
//! is a compile-time obligation for every generator.

use crate::types::{BaseType, Type};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Float(f32),
    Int(i32),
    Uint(u32),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negative,
    Positive,
    Not,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
    And,
    Or,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

/// A call site together with the parameter types of the resolved callee.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Vec<Expression>,
    /// Parameter types of the callee as resolved by the parser. Empty when unknown.
    pub parameters: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Identifier(String),
    Literal(Literal),
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Conditional {
        condition: Box<Expression>,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
    },
    MemberAccess {
        object: Box<Expression>,
        field: String,
    },
    ArrayAccess {
        array: Box<Expression>,
        index: Box<Expression>,
    },
    FunctionCall(FunctionCall),
    /// `T(args...)`; the constructed type is the expression type.
    Constructor(Vec<Expression>),
    /// Explicit `(T)expr` cast; the target type is the expression type.
    Casting(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub ty: Type,
}

impl Expression {
    pub fn new(kind: ExpressionKind, ty: impl Into<Type>) -> Self {
        Self {
            kind,
            ty: ty.into(),
        }
    }

    pub fn identifier(name: impl Into<String>, ty: impl Into<Type>) -> Self {
        Self::new(ExpressionKind::Identifier(name.into()), ty)
    }

    pub fn float(value: f32) -> Self {
        Self::new(ExpressionKind::Literal(Literal::Float(value)), BaseType::Float)
    }

    pub fn int(value: i32) -> Self {
        Self::new(ExpressionKind::Literal(Literal::Int(value)), BaseType::Int)
    }

    pub fn uint(value: u32) -> Self {
        Self::new(ExpressionKind::Literal(Literal::Uint(value)), BaseType::Uint)
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ExpressionKind::Literal(Literal::Bool(value)), BaseType::Bool)
    }

    /// Unary expression; `Not` yields `bool`, everything else keeps the operand type.
    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        let ty = match op {
            UnaryOp::Not => Type::new(BaseType::Bool),
            _ => operand.ty.clone(),
        };
        Self::new(
            ExpressionKind::Unary {
                op,
                operand: Box::new(operand),
            },
            ty,
        )
    }

    pub fn binary(op: BinaryOp, lhs: Expression, rhs: Expression, ty: impl Into<Type>) -> Self {
        Self::new(
            ExpressionKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            ty,
        )
    }

    /// `lhs = rhs`, typed as the destination.
    pub fn assign(lhs: Expression, rhs: Expression) -> Self {
        let ty = lhs.ty.clone();
        Self::binary(BinaryOp::Assign, lhs, rhs, ty)
    }

    pub fn conditional(condition: Expression, if_true: Expression, if_false: Expression) -> Self {
        let ty = if_true.ty.clone();
        Self::new(
            ExpressionKind::Conditional {
                condition: Box::new(condition),
                if_true: Box::new(if_true),
                if_false: Box::new(if_false),
            },
            ty,
        )
    }

    pub fn member(object: Expression, field: impl Into<String>, ty: impl Into<Type>) -> Self {
        Self::new(
            ExpressionKind::MemberAccess {
                object: Box::new(object),
                field: field.into(),
            },
            ty,
        )
    }

    pub fn index(array: Expression, index: Expression, ty: impl Into<Type>) -> Self {
        Self::new(
            ExpressionKind::ArrayAccess {
                array: Box::new(array),
                index: Box::new(index),
            },
            ty,
        )
    }

    /// Call whose parameter types are taken from the arguments themselves.
    pub fn call(name: impl Into<String>, arguments: Vec<Expression>, ty: impl Into<Type>) -> Self {
        let parameters = arguments.iter().map(|arg| arg.ty.clone()).collect();
        Self::call_with_signature(name, arguments, parameters, ty)
    }

    pub fn call_with_signature(
        name: impl Into<String>,
        arguments: Vec<Expression>,
        parameters: Vec<Type>,
        ty: impl Into<Type>,
    ) -> Self {
        Self::new(
            ExpressionKind::FunctionCall(FunctionCall {
                name: name.into(),
                arguments,
                parameters,
            }),
            ty,
        )
    }

    pub fn constructor(ty: impl Into<Type>, arguments: Vec<Expression>) -> Self {
        Self::new(ExpressionKind::Constructor(arguments), ty)
    }

    pub fn cast(ty: impl Into<Type>, operand: Expression) -> Self {
        Self::new(ExpressionKind::Casting(Box::new(operand)), ty)
    }

    pub fn as_call(&self) -> Option<&FunctionCall> {
        match &self.kind {
            ExpressionKind::FunctionCall(call) => Some(call),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub ty: Type,
    /// Register annotation such as `s0` for samplers.
    pub register: Option<String>,
    /// Free-form annotation text (e.g. `bigarray`).
    pub annotation: Option<String>,
    /// Initializer list; a single entry for scalars, one entry per element for arrays.
    pub initializer: Vec<Expression>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, ty: impl Into<Type>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            register: None,
            annotation: None,
            initializer: Vec::new(),
        }
    }

    pub fn with_initializer(mut self, value: Expression) -> Self {
        self.initializer = vec![value];
        self
    }

    pub fn with_initializer_list(mut self, values: Vec<Expression>) -> Self {
        self.initializer = values;
        self
    }

    pub fn with_register(mut self, register: impl Into<String>) -> Self {
        self.register = Some(register.into());
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: String,
    pub ty: Type,
    pub semantic: Option<String>,
    /// Attribute annotation such as `lowp`.
    pub attribute: Option<String>,
}

impl StructField {
    pub fn new(name: impl Into<String>, ty: impl Into<Type>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            semantic: None,
            attribute: None,
        }
    }

    pub fn with_semantic(mut self, semantic: impl Into<String>) -> Self {
        self.semantic = Some(semantic.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    pub name: String,
    pub fields: Vec<StructField>,
}

impl Struct {
    pub fn new(name: impl Into<String>, fields: Vec<StructField>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&StructField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Fixed-size uniform array block.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    pub name: String,
    pub field: Declaration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArgumentModifier {
    #[default]
    None,
    In,
    Inout,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub ty: Type,
    pub modifier: ArgumentModifier,
}

impl Argument {
    pub fn new(name: impl Into<String>, ty: impl Into<Type>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifier: ArgumentModifier::None,
        }
    }

    pub fn with_modifier(mut self, modifier: ArgumentModifier) -> Self {
        self.modifier = modifier;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub return_type: Type,
    pub semantic: Option<String>,
    pub arguments: Vec<Argument>,
    pub body: Vec<Statement>,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        return_type: impl Into<Type>,
        arguments: Vec<Argument>,
        body: Vec<Statement>,
    ) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            semantic: None,
            arguments,
            body,
        }
    }

    pub fn with_semantic(mut self, semantic: impl Into<String>) -> Self {
        self.semantic = Some(semantic.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_body: Vec<Statement>,
    pub else_body: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub initialization: Option<Declaration>,
    pub condition: Option<Expression>,
    pub increment: Option<Expression>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Declaration(Declaration),
    Struct(Struct),
    Buffer(Buffer),
    Function(Function),
    If(IfStatement),
    For(ForStatement),
    Block(Vec<Statement>),
    Return(Option<Expression>),
    Discard,
    Break,
    Continue,
    Expression(Expression),
}

impl Statement {
    pub fn expression(expression: Expression) -> Self {
        Statement::Expression(expression)
    }

    pub fn ret(value: Expression) -> Self {
        Statement::Return(Some(value))
    }

    pub fn if_then(condition: Expression, then_body: Vec<Statement>) -> Self {
        Statement::If(IfStatement {
            condition,
            then_body,
            else_body: None,
        })
    }

    pub fn if_else(
        condition: Expression,
        then_body: Vec<Statement>,
        else_body: Vec<Statement>,
    ) -> Self {
        Statement::If(IfStatement {
            condition,
            then_body,
            else_body: Some(else_body),
        })
    }
}
