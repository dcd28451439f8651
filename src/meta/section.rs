//! Tag sections: the decoded form of one `<Tags>` XML block.

use std::collections::BTreeMap;

use crate::meta::entry::{MetaEntry, MetaValue};

/// An id-keyed collection of decoded metadata entries.
///
/// One section corresponds to one `<Tags>` block, either the global one or a
/// per-tile one. Keys are unique within a section; lookups are by numeric id,
/// insertion order does not matter. Ids the registry did not recognize are
/// recorded separately and never treated as an error.
#[derive(Debug, Clone, Default)]
pub struct TagSection {
    entries: BTreeMap<i32, MetaEntry>,
    unknown_ids: Vec<i32>,
}

impl TagSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous entry with the same id.
    pub fn insert(&mut self, entry: MetaEntry) {
        self.entries.insert(entry.id, entry);
    }

    /// Record a tag id the registry has no decoder for.
    pub fn record_unknown(&mut self, id: i32) {
        self.unknown_ids.push(id);
    }

    pub fn get(&self, id: i32) -> Option<&MetaEntry> {
        self.entries.get(&id)
    }

    /// Typed accessor for an Int32 entry.
    pub fn get_i32(&self, id: i32) -> Option<i32> {
        self.entries.get(&id).and_then(|e| e.value.as_i32())
    }

    /// Typed accessor for a Float32 entry.
    pub fn get_f32(&self, id: i32) -> Option<f32> {
        self.entries.get(&id).and_then(|e| e.value.as_f32())
    }

    /// Typed accessor for a Text entry.
    pub fn get_str(&self, id: i32) -> Option<&str> {
        self.entries.get(&id).and_then(|e| e.value.as_str())
    }

    /// Decoded value for an id, any kind.
    pub fn value(&self, id: i32) -> Option<&MetaValue> {
        self.entries.get(&id).map(|e| &e.value)
    }

    /// Entries in ascending id order.
    pub fn entries(&self) -> impl Iterator<Item = &MetaEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids seen in the section that the registry could not decode.
    pub fn unknown_ids(&self) -> &[i32] {
        &self.unknown_ids
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::tags::{TagRegistry, IMAGE_WIDTH_PIXEL};

    #[test]
    fn test_insert_replaces_same_id() {
        let registry = TagRegistry::axio_vision();
        let spec = registry.spec_for(IMAGE_WIDTH_PIXEL).unwrap();

        let mut section = TagSection::new();
        section.insert(MetaEntry::parse(spec, "100").unwrap());
        section.insert(MetaEntry::parse(spec, "200").unwrap());

        assert_eq!(section.len(), 1);
        assert_eq!(section.get_i32(IMAGE_WIDTH_PIXEL), Some(200));
    }

    #[test]
    fn test_typed_getters_check_kind() {
        let registry = TagRegistry::axio_vision();
        let spec = registry.spec_for(IMAGE_WIDTH_PIXEL).unwrap();

        let mut section = TagSection::new();
        section.insert(MetaEntry::parse(spec, "1388").unwrap());

        assert_eq!(section.get_i32(IMAGE_WIDTH_PIXEL), Some(1388));
        assert_eq!(section.get_f32(IMAGE_WIDTH_PIXEL), None);
        assert_eq!(section.get_str(IMAGE_WIDTH_PIXEL), None);
        assert_eq!(section.get_i32(9999), None);
    }
}
