//! Fragment color output declarations for the modern generation.
//!
//! Every render-target slot written by the output struct gets a `layout (location = N)`
//! declaration. A slot that is also read through `FramebufferFetch(N)` is declared `inout`; slots
//! that are only read follow the written ones in ascending order.

use std::collections::BTreeSet;

use sl_tree::{ExpressionKind, FunctionCall, Literal, Tree};

use crate::binding::{TargetSlot, MAX_RENDER_TARGET_COUNT};
use crate::error::{ErrorSink, GenerateError};
use crate::writer::CodeWriter;

/// Engine intrinsic reading back the current value of a render target.
pub const FRAMEBUFFER_FETCH: &str = "FramebufferFetch";

/// Render-target slot read by a `FramebufferFetch` call.
pub fn fetch_slot(call: &FunctionCall) -> Result<u32, GenerateError> {
    let invalid = |reason: String| GenerateError::FramebufferFetchArgument { reason };
    let [argument] = call.arguments.as_slice() else {
        return Err(invalid(format!("found {} arguments", call.arguments.len())));
    };
    let slot = match argument.kind {
        ExpressionKind::Literal(Literal::Int(n)) => u32::try_from(n).ok(),
        ExpressionKind::Literal(Literal::Uint(n)) => Some(n),
        _ => return Err(invalid("argument is not an integer literal".to_owned())),
    };
    slot.filter(|&n| n < MAX_RENDER_TARGET_COUNT)
        .ok_or_else(|| invalid(format!("slot out of range 0..{MAX_RENDER_TARGET_COUNT}")))
}

/// Slots read through `FramebufferFetch` anywhere in the tree.
pub(crate) fn fetch_slots(tree: &Tree, errors: &mut ErrorSink) -> BTreeSet<u32> {
    let mut slots = BTreeSet::new();
    for call in tree.find_function_calls(FRAMEBUFFER_FETCH) {
        match fetch_slot(call) {
            Ok(slot) => {
                slots.insert(slot);
            }
            Err(err) => errors.report(err),
        }
    }
    slots
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputDeclaration {
    pub location: u32,
    pub inout: bool,
}

/// Resolves the output declarations for `targets` (in declaration order) and the fetched slots.
pub fn resolve(
    targets: impl IntoIterator<Item = TargetSlot>,
    mut fetched: BTreeSet<u32>,
) -> Vec<OutputDeclaration> {
    let mut declarations = Vec::new();
    let mut declared = BTreeSet::new();
    for target in targets {
        let location = target.index();
        if !declared.insert(location) {
            continue;
        }
        declarations.push(OutputDeclaration {
            location,
            inout: fetched.remove(&location),
        });
    }
    declarations.extend(fetched.into_iter().map(|location| OutputDeclaration {
        location,
        inout: true,
    }));
    declarations
}

pub fn declare_outputs(declarations: &[OutputDeclaration], w: &mut CodeWriter) {
    for decl in declarations {
        let qualifier = if decl.inout { "inout" } else { "out" };
        w.write_line(
            0,
            &format!(
                "layout (location = {0}) {qualifier} vec4 out_FragColor{0};",
                decl.location
            ),
        );
    }
}
