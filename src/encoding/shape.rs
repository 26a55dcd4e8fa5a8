//! Canonical object shapes and the pre-pass that ranks them.
//!
//! The shape of an object is its key set; its canonical byte form is the
//! concatenation of the keys in ascending byte order, the final byte of each
//! key flipped high as a terminator. Shapes that repeat across an encoding
//! are assigned short integer ids so their key sets travel only once.

use super::constants::*;
use crate::{Map, Value};
use hashbrown::HashMap;
use smallvec::SmallVec;

/// Canonical byte form of a key set.
pub(crate) type Descriptor = SmallVec<[u8; 24]>;

/// Object entries in ascending byte order of their keys. The encoder emits
/// values in this order so identical key sets produce identical layouts.
pub(crate) fn sorted_entries(map: &Map) -> Vec<(&String, &Value)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_unstable_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));
    entries
}

/// Computes the canonical descriptor of an object's key set, or `None` when
/// a key contains a byte the descriptor grammar cannot carry (NUL, or one
/// with the high bit already set).
pub(crate) fn descriptor(map: &Map) -> Option<Descriptor> {
    let mut composed = Descriptor::new();
    for (key, _) in sorted_entries(map) {
        let bytes = key.as_bytes();
        if bytes.is_empty() {
            composed.push(KEY_FINAL_BIT);
            continue;
        }
        if bytes.iter().any(|&b| b == 0 || b >= KEY_FINAL_BIT) {
            return None;
        }
        let (last, head) = bytes.split_last()?;
        composed.extend_from_slice(head);
        composed.push(last | KEY_FINAL_BIT);
    }
    Some(composed)
}

pub(crate) struct ShapeEntry {
    /// Dictionary id of the shape.
    pub id:      usize,
    /// Whether the shape's definition has already been written.
    pub defined: bool,
}

/// The shape dictionary built by a pre-pass over the value being encoded.
/// Shapes occurring at least twice get sequential ids, most frequent first,
/// up to the id ceiling of the grammar.
pub(crate) struct ShapeIndex {
    entries: HashMap<Vec<u8>, ShapeEntry>,
}

impl ShapeIndex {
    pub(crate) fn build(value: &Value) -> ShapeIndex {
        let mut counts: HashMap<Vec<u8>, u64> = HashMap::new();
        count_shapes(value, &mut counts);

        let mut ranked: Vec<(Vec<u8>, u64)> = counts.into_iter().collect();
        ranked.sort_unstable_by(|(d1, c1), (d2, c2)| c2.cmp(c1).then_with(|| d1.cmp(d2)));

        let mut entries = HashMap::new();
        for (id, (descriptor, count)) in ranked.into_iter().enumerate() {
            if count <= 1 {
                // Shapes seen once are cheaper written inline.
                break;
            }
            if id > MAX_RARE_OBJECT_ID {
                break;
            }
            entries.insert(descriptor, ShapeEntry { id, defined: false });
        }
        ShapeIndex { entries }
    }

    pub(crate) fn entry_mut(&mut self, descriptor: &[u8]) -> Option<&mut ShapeEntry> {
        self.entries.get_mut(descriptor)
    }
}

fn count_shapes(value: &Value, counts: &mut HashMap<Vec<u8>, u64>) {
    match value {
        Value::Object(map) => {
            if !map.is_empty() {
                if let Some(d) = descriptor(map) {
                    *counts.entry(d.to_vec()).or_insert(0) += 1;
                }
            }
            for inner in map.values() {
                count_shapes(inner, counts);
            }
        }
        Value::Array(items) => {
            for inner in items {
                count_shapes(inner, counts);
            }
        }
        _ => {}
    }
}
