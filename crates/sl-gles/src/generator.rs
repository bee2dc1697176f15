use sl_tree::Tree;
use tracing::debug;

use crate::binding::Bindings;
use crate::emit::Emitter;
use crate::error::{fatal, GenerateError};
use crate::features::{self, FeatureFlags};
use crate::names::NameTable;
use crate::profile::{Dialect, GlslVersion, Platform, Profile, ShaderStage};

/// Options for a one-shot [`generate_glsl`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlslOptions {
    pub platform: Platform,
    pub version: GlslVersion,
    pub stage: ShaderStage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlslOutput {
    pub glsl: String,
    pub dialect: Dialect,
    pub features: FeatureFlags,
}

/// Reusable GLSL generator for one platform family.
///
/// Every [`Generator::generate`] call starts from a fresh context; only the text of the last
/// successful call is retained. Calls on one instance must not overlap, but any number of
/// generators may share a [`Tree`].
#[derive(Debug, Default)]
pub struct Generator {
    platform: Platform,
    result: Option<String>,
    last_features: FeatureFlags,
}

impl Generator {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            result: None,
            last_features: FeatureFlags::empty(),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Generates `stage` source for the function named `entry`.
    pub fn generate(
        &mut self,
        tree: &Tree,
        version: GlslVersion,
        stage: ShaderStage,
        entry: &str,
    ) -> Result<&str, GenerateError> {
        self.result = None;
        self.last_features = FeatureFlags::empty();

        let profile = Profile::new(self.platform, version, stage);
        debug!(
            platform = ?self.platform,
            ?version,
            ?stage,
            dialect = ?profile.dialect,
            entry,
            "generating GLSL"
        );

        let output = generate_with_profile(tree, profile, entry)?;
        self.last_features = output.features;
        Ok(self.result.insert(output.glsl).as_str())
    }

    /// Text of the last successful [`Generator::generate`] call.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Features found by the last successful call.
    pub fn last_features(&self) -> FeatureFlags {
        self.last_features
    }
}

pub fn generate_glsl(
    tree: &Tree,
    options: &GlslOptions,
    entry: &str,
) -> Result<GlslOutput, GenerateError> {
    let profile = Profile::new(options.platform, options.version, options.stage);
    generate_with_profile(tree, profile, entry)
}

fn generate_with_profile(
    tree: &Tree,
    profile: Profile,
    entry: &str,
) -> Result<GlslOutput, GenerateError> {
    let entry_fn = tree.find_global_function(entry).ok_or_else(|| {
        fatal(GenerateError::MissingEntryPoint {
            name: entry.to_owned(),
        })
    })?;

    let bindings = Bindings::classify(tree, entry_fn, profile.stage);
    let fragment_output = bindings.output().filter(|_| profile.is_fragment());
    let features = features::scan(tree, fragment_output);
    debug!(?features, "scanned shader features");

    let names = NameTable::allocate(tree).map_err(fatal)?;

    let (glsl, errors) = Emitter::new(tree, profile, entry_fn, &bindings, &names, features)
        .emit_shader();
    errors.into_result()?;
    Ok(GlslOutput {
        glsl,
        dialect: profile.dialect,
        features,
    })
}
