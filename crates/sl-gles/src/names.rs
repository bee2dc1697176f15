//! Collision-free name allocation for target-reserved words and generated helpers.

use sl_tree::Tree;
use tracing::debug;

use crate::error::GenerateError;

/// Words that are identifiers in the source language but reserved or built-in in GLSL.
pub const RESERVED_WORDS: &[&str] = &["output", "input", "mod", "mix", "fract"];

const MAX_PROBES: u32 = 1024;

/// Helper functions the generator may define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Helper {
    MatrixRow,
    Clip,
    Tex2DLod,
    Tex2DBias,
    Tex3DLod,
    TexCubeBias,
    ScalarSwizzle2,
    ScalarSwizzle3,
    ScalarSwizzle4,
    SinCos,
}

impl Helper {
    pub const ALL: [Helper; 10] = [
        Helper::MatrixRow,
        Helper::Clip,
        Helper::Tex2DLod,
        Helper::Tex2DBias,
        Helper::Tex3DLod,
        Helper::TexCubeBias,
        Helper::ScalarSwizzle2,
        Helper::ScalarSwizzle3,
        Helper::ScalarSwizzle4,
        Helper::SinCos,
    ];

    pub fn base_name(self) -> &'static str {
        match self {
            Helper::MatrixRow => "matrix_row",
            Helper::Clip => "clip",
            Helper::Tex2DLod => "tex2Dlod",
            Helper::Tex2DBias => "tex2Dbias",
            Helper::Tex3DLod => "tex3Dlod",
            Helper::TexCubeBias => "texCUBEbias",
            Helper::ScalarSwizzle2 => "m_scalar_swizzle2",
            Helper::ScalarSwizzle3 => "m_scalar_swizzle3",
            Helper::ScalarSwizzle4 => "m_scalar_swizzle4",
            Helper::SinCos => "sincos",
        }
    }

    /// Swizzle helper for a field of `len` components.
    pub fn scalar_swizzle(len: usize) -> Option<Helper> {
        match len {
            2 => Some(Helper::ScalarSwizzle2),
            3 => Some(Helper::ScalarSwizzle3),
            4 => Some(Helper::ScalarSwizzle4),
            _ => None,
        }
    }
}

/// Returns `base` followed by the first decimal suffix that does not occur as a token in `tree`.
pub fn choose_unique_name(tree: &Tree, base: &str) -> Option<String> {
    (0..MAX_PROBES)
        .map(|n| format!("{base}{n}"))
        .find(|candidate| !tree.contains_token(candidate))
}

/// Aliases allocated for one generation call.
#[derive(Debug, Clone)]
pub struct NameTable {
    /// Indexed by `Helper as usize`.
    helpers: Vec<String>,
    reserved: Vec<(&'static str, String)>,
}

impl NameTable {
    pub fn allocate(tree: &Tree) -> Result<Self, GenerateError> {
        let unique = |base: &str| {
            let alias = choose_unique_name(tree, base).ok_or_else(|| {
                GenerateError::NameSpaceExhausted {
                    base: base.to_owned(),
                }
            })?;
            debug!(base, %alias, "allocated alias");
            Ok::<_, GenerateError>(alias)
        };

        let mut helpers = Vec::with_capacity(Helper::ALL.len());
        for helper in Helper::ALL {
            helpers.push(unique(helper.base_name())?);
        }
        let mut reserved = Vec::with_capacity(RESERVED_WORDS.len());
        for &word in RESERVED_WORDS {
            reserved.push((word, unique(word)?));
        }
        Ok(Self { helpers, reserved })
    }

    pub fn helper(&self, helper: Helper) -> &str {
        &self.helpers[helper as usize]
    }

    /// `name`, or its alias when it is a reserved word.
    pub fn safe<'a>(&'a self, name: &'a str) -> &'a str {
        self.reserved
            .iter()
            .find(|(word, _)| *word == name)
            .map_or(name, |(_, alias)| alias.as_str())
    }

    /// Every alias in the table.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.helpers
            .iter()
            .chain(self.reserved.iter().map(|(_, alias)| alias))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sl_tree::{BaseType, Declaration, Statement};

    fn tree_declaring(names: &[&str]) -> Tree {
        Tree::new(
            names
                .iter()
                .map(|name| Statement::Declaration(Declaration::new(*name, BaseType::Float)))
                .collect(),
        )
    }

    #[test]
    fn probes_until_free() {
        let tree = tree_declaring(&["clip0", "clip1", "mix0"]);
        assert_eq!(choose_unique_name(&tree, "clip").as_deref(), Some("clip2"));
        assert_eq!(choose_unique_name(&tree, "mix").as_deref(), Some("mix1"));
        assert_eq!(choose_unique_name(&tree, "fract").as_deref(), Some("fract0"));
    }

    #[test]
    fn exhausted_probe_space_is_reported() {
        let taken: Vec<String> = (0..MAX_PROBES).map(|n| format!("sincos{n}")).collect();
        let refs: Vec<&str> = taken.iter().map(String::as_str).collect();
        let tree = tree_declaring(&refs);
        assert_eq!(choose_unique_name(&tree, "sincos"), None);
        assert_eq!(
            NameTable::allocate(&tree).unwrap_err(),
            GenerateError::NameSpaceExhausted {
                base: "sincos".to_owned()
            }
        );
    }

    #[test]
    fn reserved_words_are_aliased() {
        let tree = tree_declaring(&["output", "output0"]);
        let names = NameTable::allocate(&tree).unwrap();
        assert_eq!(names.safe("output"), "output1");
        assert_eq!(names.safe("input"), "input0");
        assert_eq!(names.safe("color"), "color");
        assert_eq!(names.helper(Helper::ScalarSwizzle3), "m_scalar_swizzle30");
    }

    #[test]
    fn aliases_never_occur_in_the_tree() {
        let tree = tree_declaring(&["clip0", "mod0", "mod1", "m_scalar_swizzle20", "tex2Dbias0"]);
        let names = NameTable::allocate(&tree).unwrap();
        let aliases: Vec<&str> = names.aliases().collect();
        assert_eq!(aliases.len(), Helper::ALL.len() + RESERVED_WORDS.len());
        for alias in aliases {
            assert!(!tree.contains_token(alias), "{alias}");
        }
    }
}
