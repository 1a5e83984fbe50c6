//! Active location sequence and playback cursor

use crate::types::{LatLng, LocationRecord, LocationSequence};

/// Result of advancing the cursor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance<'a> {
    Record {
        index: usize,
        record: &'a LocationRecord,
    },
    /// Terminal; returned again on every later call
    End,
}

/// Holds the loaded sequence, the reveal cursor and the revealed coordinates
#[derive(Debug, Default)]
pub struct LocationStore {
    sequence: LocationSequence,
    next_index: usize,
    revealed: Vec<LatLng>,
}

impl LocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active sequence and reset cursor and accumulator together
    pub fn load(&mut self, sequence: LocationSequence) {
        *self = Self {
            sequence,
            next_index: 0,
            revealed: Vec::new(),
        };
    }

    /// Return the record at the cursor and move the cursor forward
    pub fn next(&mut self) -> Advance<'_> {
        match self.sequence.get(self.next_index) {
            Some(record) => {
                let index = self.next_index;
                self.next_index += 1;
                Advance::Record { index, record }
            }
            None => Advance::End,
        }
    }

    pub fn push_revealed(&mut self, position: LatLng) {
        self.revealed.push(position);
    }

    /// Coordinates revealed so far, in arrival order
    pub fn revealed(&self) -> &[LatLng] {
        &self.revealed
    }

    pub fn sequence(&self) -> &LocationSequence {
        &self.sequence
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.next_index >= self.sequence.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(n: usize) -> LocationSequence {
        (0..n)
            .map(|i| LocationRecord::new(i as i64, 514071200 + i as i32, 47586900))
            .collect()
    }

    #[test]
    fn test_next_walks_in_order_then_ends() {
        let mut store = LocationStore::new();
        store.load(sequence(2));

        match store.next() {
            Advance::Record { index, record } => {
                assert_eq!(index, 0);
                assert_eq!(record.timestamp_ms, 0);
            }
            Advance::End => panic!("expected first record"),
        }
        assert!(matches!(store.next(), Advance::Record { index: 1, .. }));
        assert_eq!(store.next(), Advance::End);
        assert_eq!(store.next(), Advance::End, "end must be repeatable");
        assert_eq!(store.next_index(), 2);
        assert!(store.is_finished());
    }

    #[test]
    fn test_load_resets_cursor_and_revealed() {
        let mut store = LocationStore::new();
        store.load(sequence(3));
        store.next();
        store.push_revealed(LatLng::new(51.0, 4.0));

        store.load(sequence(1));
        assert_eq!(store.next_index(), 0);
        assert!(store.revealed().is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_empty_store_is_finished() {
        let mut store = LocationStore::new();
        assert!(store.is_empty());
        assert!(store.is_finished());
        assert_eq!(store.next(), Advance::End);

        store.load(sequence(1));
        store.load(LocationSequence::default());
        assert!(store.is_empty());
    }
}
