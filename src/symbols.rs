//! Open-addressing symbol interner.
//!
//! [`SymbolTable`] maps token text to a stable small integer — the slot
//! index the text occupies — and doubles as a general key→payload store.
//! Capacity is fixed at construction: the table grows in occupancy, never in
//! capacity, and an insert into a full table fails with a recoverable error.
//! Deletion is never supported, which is exactly what makes the probe's
//! "stop at the first empty slot" search correct: probe sequences are never
//! broken by holes.

use crate::Error;

/// Stable integer handle for an interned text: its slot index in the table.
/// Never reused for different text while the slot remains occupied.
pub type SymbolId = u32;

#[derive(Debug, Clone)]
struct Slot<P> {
    key: String,
    payload: P,
}

/// Fixed-capacity open-addressing hash table keyed by text.
#[derive(Debug)]
pub struct SymbolTable<P = ()> {
    slots: Vec<Option<Slot<P>>>,
    len: usize,
}

impl<P> SymbolTable<P> {
    /// Create a table with exactly `capacity` slots.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "symbol table capacity must be non-zero");
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        SymbolTable { slots, len: 0 }
    }

    /// Home slot for a key: the sum of its character code points, reduced
    /// modulo the capacity. Weak against permutation collisions; kept
    /// because symbol ids are slot indices and must stay layout-stable.
    pub fn hash_of(&self, key: &str) -> usize {
        let sum: usize = key.chars().map(|c| c as usize).sum();
        sum % self.slots.len()
    }

    /// Payload for `key`, probing linearly from its home slot.
    ///
    /// The probe stops at the first empty slot: because deletion never
    /// happens, an empty slot proves the key was never inserted.
    pub fn lookup(&self, key: &str) -> Option<&P> {
        let start = self.hash_of(key);
        let capacity = self.slots.len();
        for i in 0..capacity {
            let index = (start + i) % capacity;
            match &self.slots[index] {
                None => return None,
                Some(slot) if slot.key == key => return Some(&slot.payload),
                Some(_) => {}
            }
        }
        // Table full and key absent
        None
    }

    /// Insert `(key, payload)` and return the slot index as the key's id.
    ///
    /// An existing key keeps its slot and has its payload overwritten. If
    /// every slot is probed without success the table is full; the error is
    /// recoverable and the table unchanged.
    pub fn insert(&mut self, key: &str, payload: P) -> Result<SymbolId, Error> {
        let start = self.hash_of(key);
        let capacity = self.slots.len();

        let mut target = None;
        for i in 0..capacity {
            let index = (start + i) % capacity;
            match &self.slots[index] {
                None => {
                    target = Some((index, true));
                    break;
                }
                Some(slot) if slot.key == key => {
                    target = Some((index, false));
                    break;
                }
                Some(_) => {}
            }
        }

        match target {
            Some((index, occupy)) => {
                if occupy {
                    self.len += 1;
                }
                self.slots[index] = Some(Slot {
                    key: key.to_owned(),
                    payload,
                });
                Ok(index as SymbolId)
            }
            None => Err(Error::SymbolTableFull { capacity }),
        }
    }

    /// O(1) reverse lookup: the text occupying slot `id`, if any
    pub fn text(&self, id: SymbolId) -> Option<&str> {
        self.slots
            .get(id as usize)
            .and_then(|slot| slot.as_ref())
            .map(|slot| slot.key.as_str())
    }

    /// Deletion is not supported: the table never compacts, so removing a
    /// key would break every probe sequence passing through its slot.
    pub fn delete(&mut self, _key: &str) -> Result<(), Error> {
        Err(Error::UnsupportedOperation("SymbolTable::delete"))
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total slot count, fixed for the table's lifetime
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used)] // test code OK
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_codepoint_sum() {
        let table: SymbolTable<i32> = SymbolTable::new(7);
        // 'a' = 97, 'b' = 98 → 195 % 7 = 6
        assert_eq!(table.hash_of("ab"), 195 % 7);
        // Permutations collide by construction
        assert_eq!(table.hash_of("ab"), table.hash_of("ba"));
    }

    #[test]
    fn test_distinct_texts_get_distinct_ids() {
        let mut table: SymbolTable<()> = SymbolTable::new(7);
        let a = table.insert("ab", ()).unwrap();
        let b = table.insert("ba", ()).unwrap();
        let c = table.insert("x", ()).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
        // Colliding keys land in adjacent probe slots
        assert_eq!(b, (a + 1) % 7);
    }

    #[test]
    fn test_reinsert_returns_same_id_and_updates_payload() {
        let mut table: SymbolTable<i32> = SymbolTable::new(7);
        let first = table.insert("count", 1).unwrap();
        let second = table.insert("count", 2).unwrap();
        assert_eq!(first, second);
        assert_eq!(table.lookup("count"), Some(&2));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_lookup_stops_at_first_empty_slot() {
        let mut table: SymbolTable<i32> = SymbolTable::new(11);
        // "ab" and "ba" share a home slot; only "ab" is inserted
        table.insert("ab", 10).unwrap();
        assert_eq!(table.lookup("ba"), None);
        // A key hashing elsewhere is also absent
        assert_eq!(table.lookup("zzz"), None);
    }

    #[test]
    fn test_probe_wraps_around_table_end() {
        let mut table: SymbolTable<i32> = SymbolTable::new(3);
        // Fill the home slot and its successor so probing must wrap
        let keys = ["ab", "ba", "c"]; // "ab"/"ba" collide
        for (i, key) in keys.iter().enumerate() {
            table.insert(key, i as i32).unwrap();
        }
        assert_eq!(table.len(), 3);
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(table.lookup(key), Some(&(i as i32)), "key '{key}'");
        }
    }

    #[test]
    fn test_insert_into_full_table_fails_recoverably() {
        let mut table: SymbolTable<()> = SymbolTable::new(2);
        table.insert("a", ()).unwrap();
        table.insert("b", ()).unwrap();
        assert_eq!(
            table.insert("c", ()),
            Err(Error::SymbolTableFull { capacity: 2 })
        );
        // Existing keys can still be re-inserted (overwrite path)
        assert!(table.insert("a", ()).is_ok());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_reverse_lookup_by_id() {
        let mut table: SymbolTable<()> = SymbolTable::new(7);
        let id = table.insert("lambda", ()).unwrap();
        assert_eq!(table.text(id), Some("lambda"));
        assert_eq!(table.text((id + 1) % 7), None);
        assert_eq!(table.text(999), None);
    }

    #[test]
    fn test_delete_is_unsupported() {
        let mut table: SymbolTable<()> = SymbolTable::new(7);
        table.insert("a", ()).unwrap();
        assert_eq!(
            table.delete("a"),
            Err(Error::UnsupportedOperation("SymbolTable::delete"))
        );
        // The entry is untouched
        assert!(table.lookup("a").is_some());
    }
}
