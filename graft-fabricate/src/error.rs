//! Error types for fabrication.

use smol_str::SmolStr;
use thiserror::Error;

use crate::store::StoreError;

/// Result type for fabrication operations.
pub type FabricateResult<T> = Result<T, FabricateError>;

/// A failure while walking a spec tree.
#[derive(Debug, Error)]
pub enum FabricateError {
    /// A spec key was taken for a nested entity but no model matches it.
    #[error("unknown type `{token}`{}", context_suffix(.context.as_deref()))]
    UnknownType {
        token: SmolStr,
        /// The model whose attribute map carried the token, when known.
        context: Option<SmolStr>,
    },

    /// The store rejected an entity.
    #[error("could not create `{model}`")]
    Creation {
        model: SmolStr,
        #[source]
        source: StoreError,
    },

    /// One spec tree mixed positional and keyed `RETURN` directives.
    #[error("cannot mix positional and keyed RETURN directives in one spec")]
    MixedReturns,
}

impl FabricateError {
    pub fn unknown_type(token: impl Into<SmolStr>, context: Option<SmolStr>) -> Self {
        Self::UnknownType {
            token: token.into(),
            context,
        }
    }

    pub fn creation(model: impl Into<SmolStr>, source: StoreError) -> Self {
        Self::Creation {
            model: model.into(),
            source,
        }
    }
}

fn context_suffix(context: Option<&str>) -> String {
    match context {
        Some(model) => format!(" under `{model}`"),
        None => String::new(),
    }
}
