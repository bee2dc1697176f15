//! Read-only pre-order traversal helpers.

use crate::ast::{Declaration, Expression, ExpressionKind, Statement};
use crate::types::Type;

/// Calls `f` for every expression reachable from `statements`, parents before children.
///
/// Declaration initializers, array-size expressions and loop headers are included.
pub fn for_each_expression<'t, F>(statements: &'t [Statement], f: &mut F)
where
    F: FnMut(&'t Expression),
{
    for statement in statements {
        walk_statement(statement, f);
    }
}

fn walk_statement<'t, F>(statement: &'t Statement, f: &mut F)
where
    F: FnMut(&'t Expression),
{
    match statement {
        Statement::Declaration(decl) => walk_declaration(decl, f),
        Statement::Struct(s) => {
            for field in &s.fields {
                walk_type(&field.ty, f);
            }
        }
        Statement::Buffer(buffer) => walk_declaration(&buffer.field, f),
        Statement::Function(function) => {
            walk_type(&function.return_type, f);
            for arg in &function.arguments {
                walk_type(&arg.ty, f);
            }
            for_each_expression(&function.body, f);
        }
        Statement::If(stmt) => {
            walk_expression(&stmt.condition, f);
            for_each_expression(&stmt.then_body, f);
            if let Some(else_body) = &stmt.else_body {
                for_each_expression(else_body, f);
            }
        }
        Statement::For(stmt) => {
            if let Some(init) = &stmt.initialization {
                walk_declaration(init, f);
            }
            if let Some(cond) = &stmt.condition {
                walk_expression(cond, f);
            }
            if let Some(inc) = &stmt.increment {
                walk_expression(inc, f);
            }
            for_each_expression(&stmt.body, f);
        }
        Statement::Block(body) => for_each_expression(body, f),
        Statement::Return(Some(value)) | Statement::Expression(value) => walk_expression(value, f),
        Statement::Return(None) | Statement::Discard | Statement::Break | Statement::Continue => {}
    }
}

fn walk_declaration<'t, F>(decl: &'t Declaration, f: &mut F)
where
    F: FnMut(&'t Expression),
{
    walk_type(&decl.ty, f);
    for value in &decl.initializer {
        walk_expression(value, f);
    }
}

fn walk_type<'t, F>(ty: &'t Type, f: &mut F)
where
    F: FnMut(&'t Expression),
{
    if let Some(size) = &ty.array_size {
        walk_expression(size, f);
    }
}

/// Calls `f` for `expression` and then for each of its sub-expressions.
pub fn walk_expression<'t, F>(expression: &'t Expression, f: &mut F)
where
    F: FnMut(&'t Expression),
{
    f(expression);
    match &expression.kind {
        ExpressionKind::Identifier(_) | ExpressionKind::Literal(_) => {}
        ExpressionKind::Unary { operand, .. } | ExpressionKind::Casting(operand) => {
            walk_expression(operand, f)
        }
        ExpressionKind::Binary { lhs, rhs, .. } => {
            walk_expression(lhs, f);
            walk_expression(rhs, f);
        }
        ExpressionKind::Conditional {
            condition,
            if_true,
            if_false,
        } => {
            walk_expression(condition, f);
            walk_expression(if_true, f);
            walk_expression(if_false, f);
        }
        ExpressionKind::MemberAccess { object, .. } => walk_expression(object, f),
        ExpressionKind::ArrayAccess { array, index } => {
            walk_expression(array, f);
            walk_expression(index, f);
        }
        ExpressionKind::FunctionCall(call) => {
            for arg in &call.arguments {
                walk_expression(arg, f);
            }
        }
        ExpressionKind::Constructor(arguments) => {
            for arg in arguments {
                walk_expression(arg, f);
            }
        }
    }
}
