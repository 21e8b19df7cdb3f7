use std::sync::Arc;

use crate::registry::{Registry, RegistryError};

/// Decides whether a block type may be placed under a given parent.
///
/// The decision is a pure, total function over the registry state at call
/// time: resolving the child may fail with [`RegistryError::NotFound`]; an
/// unrestricted type may go anywhere, including the document root; a
/// restricted type is admissible only directly under one of its listed
/// parents, and never at the root.
///
/// Callers must consult the validator *before* mutating a tree
/// (validate-then-commit); [`crate::composing::CompositionTree`] does this
/// for every structural operation.
#[derive(Debug, Clone)]
pub struct Validator {
    registry: Arc<Registry>,
}

impl Validator {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// `parent` of `None` denotes the document root.
    pub fn can_place(&self, child: &str, parent: Option<&str>) -> Result<bool, RegistryError> {
        let block = self.registry.lookup(child)?;
        Ok(block.allows_parent(parent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks;
    use rstest::rstest;

    fn validator() -> Validator {
        let registry = Arc::new(Registry::new());
        blocks::register_builtins(&registry).unwrap();
        Validator::new(registry)
    }

    #[rstest]
    #[case("core/column", None, false)]
    #[case("core/column", Some("core/columns"), true)]
    #[case("core/column", Some("core/quote"), false)]
    #[case("core/column", Some("core/column"), false)]
    #[case("core/paragraph", None, true)]
    #[case("core/paragraph", Some("core/quote"), true)]
    #[case("core/paragraph", Some("core/column"), true)]
    #[case("core/columns", None, true)]
    fn placement_truth_table(
        #[case] child: &str,
        #[case] parent: Option<&str>,
        #[case] admissible: bool,
    ) {
        assert_eq!(validator().can_place(child, parent).unwrap(), admissible);
    }

    #[test]
    fn unknown_child_is_an_error_not_a_veto() {
        let err = validator().can_place("core/gallery", None).unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[test]
    fn decision_tracks_registry_state() {
        let registry = Arc::new(Registry::new());
        blocks::register_builtins(&registry).unwrap();
        let validator = Validator::new(Arc::clone(&registry));

        assert!(validator.can_place("core/column", Some("core/columns")).unwrap());
        registry.unregister("core/column").unwrap();
        assert!(validator.can_place("core/column", Some("core/columns")).is_err());
    }
}
