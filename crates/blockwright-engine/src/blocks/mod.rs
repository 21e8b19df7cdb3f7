//! Built-in block library.
//!
//! One module per kind. Each module exposes a `definition()` building the
//! registration record for its type — the same shape external block
//! definitions supply: identity, display metadata, parent constraints,
//! capability flags and the two render callbacks.

pub mod columns;
pub mod heading;
pub mod paragraph;
pub mod quote;

use serde_json::Value;

use crate::composing::Attrs;
use crate::registry::{Registry, RegistryError};

/// Register every built-in block type. Calling it again replaces the
/// earlier definitions.
pub fn register_builtins(registry: &Registry) -> Result<(), RegistryError> {
    registry.register(paragraph::definition())?;
    registry.register(heading::definition())?;
    registry.register(quote::definition())?;
    registry.register(columns::columns_definition())?;
    registry.register(columns::column_definition())?;
    Ok(())
}

/// String attribute lookup with an empty default.
pub(crate) fn text<'a>(attrs: &'a Attrs, key: &str) -> &'a str {
    attrs.get(key).and_then(Value::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_register_cleanly() {
        let registry = Registry::new();
        register_builtins(&registry).unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "core/column",
                "core/columns",
                "core/heading",
                "core/paragraph",
                "core/quote",
            ]
        );
    }

    #[test]
    fn column_carries_the_original_constraints() {
        let registry = Registry::new();
        register_builtins(&registry).unwrap();

        let column = registry.lookup("core/column").unwrap();
        assert_eq!(column.title(), "Column");
        assert!(column.parent().contains("core/columns"));
        let supports = column.supports();
        assert!(!supports.reusable);
        assert!(!supports.html);
        assert!(supports.light_wrapper);
    }

    #[test]
    fn builtins_other_than_column_are_unrestricted() {
        let registry = Registry::new();
        register_builtins(&registry).unwrap();
        for name in ["core/paragraph", "core/heading", "core/quote", "core/columns"] {
            assert!(registry.lookup(name).unwrap().parent().is_empty(), "{name}");
        }
    }
}
