//! Resolved syntax tree for the HLSL-shaped portable shader language.
//!
//! The parser that produces this tree lives elsewhere; this crate only models the validated
//! result and the read-only queries generators need:
//!
//! - global struct / function / declaration lookup by name,
//! - every call site of a named function,
//! - token containment, used to allocate collision-free identifiers.

#![forbid(unsafe_code)]

pub mod ast;
mod tree;
pub mod types;
pub mod visit;

pub use crate::ast::{
    Argument, ArgumentModifier, BinaryOp, Buffer, Declaration, Expression, ExpressionKind,
    ForStatement, Function, FunctionCall, IfStatement, Literal, Statement, Struct, StructField,
    UnaryOp,
};
pub use crate::tree::Tree;
pub use crate::types::{BaseType, Type, TypeFlags};
