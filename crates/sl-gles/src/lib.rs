//! GLSL and GLSL ES source generation for resolved shader trees.
//!
//! The generator turns an [`sl_tree::Tree`] written in an HLSL-shaped dialect into the source of a
//! single vertex or fragment stage for one of the GLSL family dialects:
//!
//! - GLSL ES 1.00 and 3.00 on the mobile platform families,
//! - GLSL 1.20 on macOS desktop GL,
//! - GLSL 1.30 and 3.30 on other desktop GL drivers.
//!
//! Generation is a pure function of the tree, the [`Platform`], the [`GlslVersion`], the
//! [`ShaderStage`] and the entry-point name.

#![forbid(unsafe_code)]

mod binding;
mod emit;
mod error;
/// Feature scanning of input trees.
pub mod features;
mod generator;
mod helpers;
/// Locale-independent literal formatting.
pub mod literal;
mod mrt;
/// Collision-free aliases for reserved words and generated helpers.
pub mod names;
/// Dialect resolution and preambles.
pub mod profile;
mod writer;

pub use crate::binding::{
    built_in_semantic, target_output_name, StructUsage, TargetSlot, MAX_RENDER_TARGET_COUNT,
};
pub use crate::error::GenerateError;
pub use crate::features::FeatureFlags;
pub use crate::generator::{generate_glsl, Generator, GlslOptions, GlslOutput};
pub use crate::mrt::FRAMEBUFFER_FETCH;
pub use crate::profile::{Dialect, GlslVersion, Platform, Profile, ShaderStage};
pub use crate::writer::CodeWriter;
