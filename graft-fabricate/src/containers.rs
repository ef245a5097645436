//! Implicit wrapper entities and connector rules.
//!
//! Most schemas hang everything off one or two container entities (a tenant,
//! an account, a practice). [`ContainerDefaults`] names those containers and
//! their sentinel ids; specs that do not mention them get wrapped
//! automatically, and a container already present in the store under its
//! sentinel id is reused rather than recreated.
//!
//! [`Connectors`] lists model pairs joined through an association entity.
//! When both halves of a pair meet in one branch of the walk, the connector
//! entity is injected between them without being spelled in the spec.

use smol_str::SmolStr;

use crate::ancestors::Ancestors;

/// The implicit container chain for a schema: an outer container and an
/// optional inner one nested directly inside it.
#[derive(Debug, Clone)]
pub struct ContainerDefaults {
    outer: SmolStr,
    outer_id: i64,
    inner: Option<(SmolStr, i64)>,
}

impl ContainerDefaults {
    /// An outer container with its sentinel id.
    pub fn new(outer: impl Into<SmolStr>, outer_id: i64) -> Self {
        Self {
            outer: outer.into(),
            outer_id,
            inner: None,
        }
    }

    /// Nest a second container inside the outer one.
    pub fn with_inner(mut self, inner: impl Into<SmolStr>, inner_id: i64) -> Self {
        self.inner = Some((inner.into(), inner_id));
        self
    }

    pub fn outer(&self) -> (&str, i64) {
        (self.outer.as_str(), self.outer_id)
    }

    pub fn inner(&self) -> Option<(&str, i64)> {
        self.inner.as_ref().map(|(name, id)| (name.as_str(), *id))
    }
}

/// One pair → connector rule.
#[derive(Debug, Clone)]
struct ConnectorRule {
    pair: [SmolStr; 2],
    connector: SmolStr,
}

/// The connector rules for a schema.
#[derive(Debug, Clone, Default)]
pub struct Connectors {
    rules: Vec<ConnectorRule>,
}

impl Connectors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `a` and `b` are joined through `connector`.
    pub fn rule(
        mut self,
        a: impl Into<SmolStr>,
        b: impl Into<SmolStr>,
        connector: impl Into<SmolStr>,
    ) -> Self {
        self.rules.push(ConnectorRule {
            pair: [a.into(), b.into()],
            connector: connector.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The connector to inject when creating `model` with these ancestors:
    /// the first rule whose pair contains `model` and whose other half is
    /// already an ancestor.
    pub fn connector_for(&self, model: &str, ancestors: &Ancestors) -> Option<&str> {
        self.rules.iter().find_map(|rule| {
            let other = if rule.pair[0] == model {
                &rule.pair[1]
            } else if rule.pair[1] == model {
                &rule.pair[0]
            } else {
                return None;
            };
            ancestors
                .contains(other)
                .then_some(rule.connector.as_str())
        })
    }
}
