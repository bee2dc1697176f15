use thiserror::Error;
use tracing::{debug, warn};

/// Fatal conditions for a single generation call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("entry point '{name}' doesn't exist")]
    MissingEntryPoint { name: String },
    #[error("{name} expects {expected} argument(s), found {found}")]
    IntrinsicArity {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("FramebufferFetch expects 1 integer literal argument: {reason}")]
    FramebufferFetchArgument { reason: String },
    #[error("sampler '{name}' has no register annotation")]
    MissingSamplerRegister { name: String },
    #[error("sampler '{name}' has unparseable register '{register}' (expected s<N>)")]
    InvalidSamplerRegister { name: String, register: String },
    /// Internal invariant: the probe space for a generated name was exhausted.
    #[error("no collision-free name found for '{base}'")]
    NameSpaceExhausted { base: String },
}

/// Sticky error state for one generation call.
///
/// Emission keeps walking the tree after a failure so the traversal stays consistent; only the
/// first error is kept, later ones are logged and counted.
#[derive(Debug, Default)]
pub(crate) struct ErrorSink {
    first: Option<GenerateError>,
    suppressed: usize,
}

impl ErrorSink {
    pub(crate) fn report(&mut self, error: GenerateError) {
        if self.first.is_some() {
            self.suppressed += 1;
            debug!(%error, suppressed = self.suppressed, "suppressing follow-up generation error");
            return;
        }
        self.first = Some(fatal(error));
    }

    pub(crate) fn into_result(self) -> Result<(), GenerateError> {
        match self.first {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Logs an error that ends the call before emission starts.
pub(crate) fn fatal(error: GenerateError) -> GenerateError {
    warn!(%error, "GLSL generation failed");
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_error_wins() {
        let mut sink = ErrorSink::default();
        sink.report(GenerateError::MissingSamplerRegister {
            name: "albedo".to_owned(),
        });
        sink.report(GenerateError::IntrinsicArity {
            name: "mul",
            expected: 2,
            found: 1,
        });
        assert_eq!(sink.suppressed, 1);
        assert_eq!(
            sink.into_result(),
            Err(GenerateError::MissingSamplerRegister {
                name: "albedo".to_owned()
            })
        );
    }

    #[test]
    fn messages_name_the_offender() {
        let err = GenerateError::MissingEntryPoint {
            name: "vp_main".to_owned(),
        };
        assert_eq!(err.to_string(), "entry point 'vp_main' doesn't exist");
    }
}
