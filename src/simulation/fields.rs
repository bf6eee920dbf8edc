use linked_hash_map::LinkedHashMap;

use crate::prelude::MVec;

/// Named auxiliary per-particle columns, used by the Godunov variants
/// to carry the reconstruction gradients between the pre-interaction
/// and force passes. Keys are created once at startup; the backing
/// storage is one flat column per key, never a per-particle map.
#[derive(Default)]
pub struct AuxColumns {
    vectors: LinkedHashMap<String, Vec<MVec>>,
}

impl AuxColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_vector(&mut self, name: &str) {
        self.vectors.entry(name.into()).or_insert_with(Vec::new);
    }

    pub fn set_vector(&mut self, name: &str, column: Vec<MVec>) {
        self.vectors.insert(name.into(), column);
    }

    pub fn vector(&self, name: &str) -> Option<&[MVec]> {
        self.vectors.get(name).map(|column| column.as_slice())
    }

    /// The registered column names, in registration order. Snapshots
    /// rely on this order being stable across steps.
    pub fn vector_names(&self) -> impl Iterator<Item = &str> {
        self.vectors.keys().map(|name| name.as_str())
    }
}
