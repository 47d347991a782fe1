//! Layout registry keyed by caller-chosen type ids.
//!
//! A registration may name other registered ids as nested layouts; their
//! models, and the models of whatever they nest in turn, become named types
//! of the new layout.

use std::collections::HashMap;
use std::sync::Arc;

use cstruct_buffers::ByteOrder;
use indexmap::IndexMap;
use tracing::debug;

use crate::cstruct::CStruct;
use crate::error::{CStructError, Result};
use crate::model::ModelSource;

#[derive(Debug)]
struct Entry {
    layout: Arc<CStruct>,
    nested: Vec<String>,
}

/// Compiled layouts sharing one byte order.
///
/// ```
/// use cstruct::{ByteOrder, Registry};
///
/// let mut registry = Registry::new(ByteOrder::BigEndian);
/// registry.register("Point", "{i16 x, y;}", None, &[]).unwrap();
/// let path = registry.register("Path", "{points: Point[u8]}", None, &["Point"]).unwrap();
/// assert_eq!(path.json_model(), r#"{"points.u8":{"x":"i16","y":"i16"}}"#);
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    order: ByteOrder,
    entries: HashMap<String, Entry>,
}

impl Registry {
    pub fn new(order: ByteOrder) -> Self {
        Self {
            order,
            entries: HashMap::new(),
        }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Compiles and stores a layout under `type_id`, replacing any previous
    /// one. Every id in `nested` must already be registered.
    pub fn register(
        &mut self,
        type_id: &str,
        model: impl Into<ModelSource>,
        types: Option<ModelSource>,
        nested: &[&str],
    ) -> Result<Arc<CStruct>> {
        let mut builder = CStruct::builder(model).byte_order(self.order);
        if let Some(types) = types {
            builder = builder.types(types);
        }
        for (name, layout) in self.collect(nested)? {
            builder = builder.nested(name, layout);
        }
        let layout = Arc::new(builder.build()?);
        debug!(
            type_id,
            nested = nested.len(),
            static_size = ?layout.static_size(),
            "registered layout"
        );
        self.entries.insert(
            type_id.to_string(),
            Entry {
                layout: Arc::clone(&layout),
                nested: nested.iter().map(|id| id.to_string()).collect(),
            },
        );
        Ok(layout)
    }

    /// `nested` and everything they nest, direct ids first.
    fn collect<'r>(&'r self, nested: &[&str]) -> Result<IndexMap<&'r str, &'r CStruct>> {
        let mut out = IndexMap::new();
        let mut queue: Vec<&str> = nested.to_vec();
        let mut next = 0;
        while let Some(id) = queue.get(next).copied() {
            next += 1;
            let Some((key, entry)) = self.entries.get_key_value(id) else {
                return Err(CStructError::UnresolvedType {
                    name: id.to_string(),
                });
            };
            if out.contains_key(key.as_str()) {
                continue;
            }
            out.insert(key.as_str(), entry.layout.as_ref());
            queue.extend(entry.nested.iter().map(String::as_str));
        }
        Ok(out)
    }

    pub fn get(&self, type_id: &str) -> Option<Arc<CStruct>> {
        self.entries.get(type_id).map(|entry| Arc::clone(&entry.layout))
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.entries.contains_key(type_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
