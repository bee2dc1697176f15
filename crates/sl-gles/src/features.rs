//! Feature scanning: which optional intrinsics and output layouts a tree uses.

use bitflags::bitflags;
use sl_tree::visit::for_each_expression;
use sl_tree::{ExpressionKind, Struct, Tree};

use crate::binding::TargetSlot;

bitflags! {
    /// Optional constructs found in a tree; drives preamble extensions and helper emission.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FeatureFlags: u32 {
        const CLIP = 1 << 0;
        /// `tex2Dlod` or `texCUBElod`.
        const TEX_LOD = 1 << 1;
        const TEX_BIAS = 1 << 2;
        const TEX3D_LOD = 1 << 3;
        const CUBE_BIAS = 1 << 4;
        const SIN_COS = 1 << 5;
        const TEX_GRAD = 1 << 6;
        /// Swizzle applied to a scalar expression.
        const SCALAR_SWIZZLE = 1 << 7;
        /// Fragment output struct writes an indexed render target other than 0.
        const MRT = 1 << 8;
    }
}

const TOKEN_FEATURES: &[(&str, FeatureFlags)] = &[
    ("clip", FeatureFlags::CLIP),
    ("tex2Dlod", FeatureFlags::TEX_LOD),
    ("texCUBElod", FeatureFlags::TEX_LOD),
    ("tex2Dbias", FeatureFlags::TEX_BIAS),
    ("tex3Dlod", FeatureFlags::TEX3D_LOD),
    ("texCUBEbias", FeatureFlags::CUBE_BIAS),
    ("sincos", FeatureFlags::SIN_COS),
    ("tex2Dgrad", FeatureFlags::TEX_GRAD),
];

/// Scans `tree` once. `fragment_output` is the fragment entry's output struct, if any.
pub fn scan(tree: &Tree, fragment_output: Option<&Struct>) -> FeatureFlags {
    let mut flags = FeatureFlags::empty();
    for &(token, flag) in TOKEN_FEATURES {
        if tree.contains_token_ignore_case(token) {
            flags |= flag;
        }
    }

    for_each_expression(tree.statements(), &mut |expr| {
        if let ExpressionKind::MemberAccess { object, field } = &expr.kind {
            if object.ty.base.is_numeric_scalar() && (2..=4).contains(&field.len()) {
                flags |= FeatureFlags::SCALAR_SWIZZLE;
            }
        }
    });

    let mrt = fragment_output.is_some_and(|output| {
        output.fields.iter().any(|field| {
            matches!(
                field.semantic.as_deref().and_then(TargetSlot::parse),
                Some(TargetSlot::Indexed(n)) if n >= 1
            )
        })
    });
    if mrt {
        flags |= FeatureFlags::MRT;
    }
    flags
}
