use std::collections::BTreeSet;

use crate::ast::{
    Declaration, Expression, ExpressionKind, Function, FunctionCall, Statement, Struct,
};
use crate::types::Type;
use crate::visit::for_each_expression;

/// An immutable, fully resolved shader tree.
///
/// Besides the statements themselves the tree keeps an index of every identifier-like string it
/// contains so generators can allocate names that cannot collide with user code.
#[derive(Debug, Clone)]
pub struct Tree {
    statements: Vec<Statement>,
    tokens: BTreeSet<String>,
}

impl Tree {
    pub fn new(statements: Vec<Statement>) -> Self {
        let mut tokens = BTreeSet::new();
        collect_statement_tokens(&statements, &mut tokens);
        for_each_expression(&statements, &mut |expr: &Expression| {
            collect_expression_tokens(expr, &mut tokens)
        });
        Self { statements, tokens }
    }

    /// Top-level statements in source order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn find_global_struct(&self, name: &str) -> Option<&Struct> {
        self.statements.iter().find_map(|s| match s {
            Statement::Struct(st) if st.name == name => Some(st),
            _ => None,
        })
    }

    pub fn find_global_function(&self, name: &str) -> Option<&Function> {
        self.statements.iter().find_map(|s| match s {
            Statement::Function(function) if function.name == name => Some(function),
            _ => None,
        })
    }

    pub fn find_global_declaration(&self, name: &str) -> Option<&Declaration> {
        self.statements.iter().find_map(|s| match s {
            Statement::Declaration(decl) if decl.name == name => Some(decl),
            Statement::Buffer(buffer) if buffer.field.name == name => Some(&buffer.field),
            _ => None,
        })
    }

    /// Every call to `name` anywhere in the tree, in source order.
    pub fn find_function_calls(&self, name: &str) -> Vec<&FunctionCall> {
        let mut calls = Vec::new();
        for_each_expression(&self.statements, &mut |expr| {
            if let ExpressionKind::FunctionCall(call) = &expr.kind {
                if call.name == name {
                    calls.push(call);
                }
            }
        });
        calls
    }

    /// Whether `token` appears verbatim as any name, type, semantic or annotation in the tree.
    pub fn contains_token(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn contains_token_ignore_case(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t.eq_ignore_ascii_case(token))
    }
}

fn insert_type(ty: &Type, tokens: &mut BTreeSet<String>) {
    if let Some(name) = &ty.type_name {
        tokens.insert(name.clone());
    }
}

fn insert_declaration(decl: &Declaration, tokens: &mut BTreeSet<String>) {
    tokens.insert(decl.name.clone());
    insert_type(&decl.ty, tokens);
    tokens.extend(decl.register.iter().cloned());
    tokens.extend(decl.annotation.iter().cloned());
}

fn collect_statement_tokens(statements: &[Statement], tokens: &mut BTreeSet<String>) {
    for statement in statements {
        match statement {
            Statement::Declaration(decl) => insert_declaration(decl, tokens),
            Statement::Struct(st) => {
                tokens.insert(st.name.clone());
                for field in &st.fields {
                    tokens.insert(field.name.clone());
                    insert_type(&field.ty, tokens);
                    tokens.extend(field.semantic.iter().cloned());
                    tokens.extend(field.attribute.iter().cloned());
                }
            }
            Statement::Buffer(buffer) => {
                tokens.insert(buffer.name.clone());
                insert_declaration(&buffer.field, tokens);
            }
            Statement::Function(function) => {
                tokens.insert(function.name.clone());
                insert_type(&function.return_type, tokens);
                tokens.extend(function.semantic.iter().cloned());
                for arg in &function.arguments {
                    tokens.insert(arg.name.clone());
                    insert_type(&arg.ty, tokens);
                }
                collect_statement_tokens(&function.body, tokens);
            }
            Statement::If(stmt) => {
                collect_statement_tokens(&stmt.then_body, tokens);
                if let Some(else_body) = &stmt.else_body {
                    collect_statement_tokens(else_body, tokens);
                }
            }
            Statement::For(stmt) => {
                if let Some(init) = &stmt.initialization {
                    insert_declaration(init, tokens);
                }
                collect_statement_tokens(&stmt.body, tokens);
            }
            Statement::Block(body) => collect_statement_tokens(body, tokens),
            Statement::Return(_)
            | Statement::Discard
            | Statement::Break
            | Statement::Continue
            | Statement::Expression(_) => {}
        }
    }
}

fn collect_expression_tokens(expr: &Expression, tokens: &mut BTreeSet<String>) {
    insert_type(&expr.ty, tokens);
    match &expr.kind {
        ExpressionKind::Identifier(name) => {
            tokens.insert(name.clone());
        }
        ExpressionKind::MemberAccess { field, .. } => {
            tokens.insert(field.clone());
        }
        ExpressionKind::FunctionCall(call) => {
            tokens.insert(call.name.clone());
            for param in &call.parameters {
                insert_type(param, tokens);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Argument, StructField};
    use crate::types::BaseType;
    use pretty_assertions::assert_eq;

    fn sample_tree() -> Tree {
        let color = Expression::call(
            "tex2D",
            vec![
                Expression::identifier("albedo", BaseType::Sampler2D),
                Expression::member(
                    Expression::identifier("input", Type::user("fragment_in")),
                    "uv",
                    BaseType::Float2,
                ),
            ],
            BaseType::Float4,
        );
        Tree::new(vec![
            Statement::Declaration(
                Declaration::new("albedo", BaseType::Sampler2D).with_register("s0"),
            ),
            Statement::Struct(Struct::new(
                "fragment_in",
                vec![StructField::new("uv", BaseType::Float2).with_semantic("TEXCOORD0")],
            )),
            Statement::Function(Function::new(
                "fp_main",
                BaseType::Float4,
                vec![Argument::new("input", Type::user("fragment_in"))],
                vec![Statement::ret(color)],
            )),
        ])
    }

    #[test]
    fn finds_globals_by_exact_name() {
        let tree = sample_tree();
        assert!(tree.find_global_struct("fragment_in").is_some());
        assert!(tree.find_global_struct("Fragment_in").is_none());
        assert!(tree.find_global_function("fp_main").is_some());
        assert_eq!(
            tree.find_global_declaration("albedo")
                .and_then(|d| d.register.as_deref()),
            Some("s0")
        );
    }

    #[test]
    fn indexes_every_identifier_like_string() {
        let tree = sample_tree();
        for token in ["albedo", "s0", "fragment_in", "uv", "TEXCOORD0", "fp_main", "input", "tex2D"]
        {
            assert!(tree.contains_token(token), "missing {token}");
        }
        assert!(!tree.contains_token("tex"));
        assert!(!tree.contains_token("TEX2D"));
        assert!(tree.contains_token_ignore_case("TEX2D"));
    }

    #[test]
    fn finds_nested_calls() {
        let tree = sample_tree();
        let calls = tree.find_function_calls("tex2D");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].arguments.len(), 2);
        assert!(tree.find_function_calls("mul").is_empty());
    }
}
