//! Process-wide table of block types keyed by identity.
//!
//! The registry is shared mutable state read on every validation and render,
//! so reads must never observe a half-written descriptor. Readers load an
//! immutable snapshot of the whole table; writers serialize behind a mutex,
//! build the next table off to the side and publish it atomically. A lookup
//! concurrent with a write sees either the old table or the new one.
//!
//! The registry is constructed explicitly at startup and injected into the
//! validator, tree and render pipeline; there is no ambient global.

pub mod descriptor;

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

pub use descriptor::{BlockType, Render, Supports};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid block type {name:?}: {reason}")]
    InvalidDescriptor { name: String, reason: String },
    #[error("unknown block type {0:?}")]
    NotFound(String),
}

type Table = HashMap<Box<str>, Arc<BlockType>>;

pub struct Registry {
    snapshot: ArcSwap<Table>,
    writer: Mutex<()>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(Table::new()),
            writer: Mutex::new(()),
        }
    }

    /// Insert or replace a block type by identity.
    ///
    /// Replacement takes effect for every later lookup; a traversal that
    /// already loaded the previous snapshot keeps seeing the old descriptor
    /// until it finishes.
    pub fn register(&self, block: BlockType) -> Result<(), RegistryError> {
        block.validate()?;
        let _guard = self.writer.lock();
        let mut table = Table::clone(&self.snapshot.load());
        let name = block.name().to_owned();
        let replaced = table
            .insert(name.clone().into_boxed_str(), Arc::new(block))
            .is_some();
        self.snapshot.store(Arc::new(table));
        tracing::debug!(block = %name, replaced, "registered block type");
        Ok(())
    }

    /// Remove a block type. Tree nodes referencing it keep their identity
    /// and fail lazily with [`RegistryError::NotFound`] when next resolved.
    pub fn unregister(&self, name: &str) -> Result<(), RegistryError> {
        let _guard = self.writer.lock();
        let mut table = Table::clone(&self.snapshot.load());
        if table.remove(name).is_none() {
            return Err(RegistryError::NotFound(name.to_owned()));
        }
        self.snapshot.store(Arc::new(table));
        tracing::debug!(block = %name, "unregistered block type");
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<BlockType>, RegistryError> {
        self.snapshot
            .load()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.snapshot.load().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }

    /// Registered identities in sorted order, for diagnostics.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.snapshot.load().keys().map(|k| k.to_string()).collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.names())
            .finish()
    }
}
