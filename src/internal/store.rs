use std::collections::HashMap;

use super::models::{PendingOp, Pot, PotDraft};

/// In-memory list of pots currently on screen.
///
/// Remote snapshots carry a sequence number handed out by [`begin_fetch`];
/// a snapshot older than the last one applied is dropped so a slow response
/// can't overwrite a newer list.
///
/// [`begin_fetch`]: CollectionStore::begin_fetch
#[derive(Debug, Default, Clone)]
pub struct CollectionStore {
    pots: Vec<Pot>,
    pending: HashMap<String, PendingOp>,
    creates_in_flight: usize,
    next_seq: u64,
    applied_seq: u64,
    floor_seq: u64,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pots(&self) -> &[Pot] {
        &self.pots
    }

    pub fn len(&self) -> usize {
        self.pots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pots.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Pot> {
        self.pots.iter().find(|p| p.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.pots.iter().position(|p| p.id == id)
    }

    /// Reserve the sequence number for a new list request.
    pub fn begin_fetch(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    pub fn applied_seq(&self) -> u64 {
        self.applied_seq
    }

    /// Replace the whole list with a server snapshot.
    ///
    /// Returns `false` (and changes nothing) when a newer snapshot was already applied.
    pub fn apply_snapshot(&mut self, seq: u64, pots: Vec<Pot>) -> bool {
        if seq <= self.applied_seq || seq < self.floor_seq {
            tracing::debug!(
                seq,
                applied = self.applied_seq,
                floor = self.floor_seq,
                "Discarding stale pot snapshot"
            );
            return false;
        }

        self.applied_seq = seq;
        self.pots = pots;
        let pots = &self.pots;
        self.pending
            .retain(|id, _| pots.iter().any(|p| &p.id == id));
        tracing::debug!(seq, count = self.pots.len(), "Applied pot snapshot");
        true
    }

    /// Drop every snapshot requested before `seq`, applied or not.
    ///
    /// Used after a confirmed write: lists fetched earlier can't contain it.
    pub fn supersede_before(&mut self, seq: u64) {
        self.floor_seq = self.floor_seq.max(seq);
    }

    pub fn mark_pending(&mut self, id: &str, op: PendingOp) {
        self.pending.insert(id.to_string(), op);
    }

    pub fn settle(&mut self, id: &str) {
        self.pending.remove(id);
    }

    pub fn pending(&self, id: &str) -> Option<PendingOp> {
        self.pending.get(id).copied()
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    pub fn begin_create(&mut self) {
        self.creates_in_flight += 1;
    }

    pub fn finish_create(&mut self) {
        self.creates_in_flight = self.creates_in_flight.saturating_sub(1);
    }

    pub fn creates_in_flight(&self) -> usize {
        self.creates_in_flight
    }

    pub fn in_flight(&self) -> usize {
        self.creates_in_flight + self.pending.len()
    }

    /// Append a new local record with a millisecond-timestamp id.
    pub fn append(&mut self, name: String, category: String) -> String {
        let id = self.fresh_id(jiff::Timestamp::now().as_millisecond());
        self.pots.push(Pot {
            id: id.clone(),
            name,
            category,
            ..Default::default()
        });
        id
    }

    // Two adds inside the same millisecond would collide; bump until free.
    fn fresh_id(&self, mut millis: i64) -> String {
        loop {
            let id = millis.to_string();
            if self.get(&id).is_none() {
                return id;
            }
            millis += 1;
        }
    }

    /// Shallow-merge name and category onto an existing record.
    pub fn merge(&mut self, id: &str, name: String, category: String) -> bool {
        match self.pots.iter_mut().find(|p| p.id == id) {
            Some(pot) => {
                pot.name = name;
                pot.category = category;
                true
            }
            None => false,
        }
    }

    /// Patch a record with a confirmed full-record update.
    pub fn apply_draft(&mut self, id: &str, draft: &PotDraft) -> bool {
        match self.pots.iter_mut().find(|p| p.id == id) {
            Some(pot) => {
                pot.name = draft.name.clone();
                pot.category = draft.category.clone();
                pot.price = draft.price.clone();
                pot.description = draft.description.clone();
                pot.image = draft.image.clone();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Pot> {
        let idx = self.index_of(id)?;
        self.pending.remove(id);
        Some(self.pots.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pot(id: &str, name: &str) -> Pot {
        Pot {
            id: id.to_string(),
            name: name.to_string(),
            category: "Clay".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn stale_snapshot_is_discarded() {
        let mut store = CollectionStore::new();
        let older = store.begin_fetch();
        let newer = store.begin_fetch();

        assert!(store.apply_snapshot(newer, vec![pot("1", "New"), pot("2", "Newer")]));
        assert!(!store.apply_snapshot(older, vec![pot("1", "Old")]));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("1").unwrap().name, "New");
        assert_eq!(store.applied_seq(), newer);
    }

    #[test]
    fn superseded_fetch_is_discarded_even_if_never_applied() {
        let mut store = CollectionStore::new();
        let before_write = store.begin_fetch();
        let after_write = store.begin_fetch();
        store.supersede_before(after_write);

        assert!(!store.apply_snapshot(before_write, vec![pot("1", "Old")]));
        assert!(store.is_empty());
        assert!(store.apply_snapshot(after_write, vec![pot("1", "New")]));
    }

    #[test]
    fn snapshot_drops_pending_of_vanished_records() {
        let mut store = CollectionStore::new();
        let seq = store.begin_fetch();
        store.apply_snapshot(seq, vec![pot("1", "A"), pot("2", "B")]);
        store.mark_pending("1", PendingOp::Deleting);
        store.mark_pending("2", PendingOp::Updating);

        let seq = store.begin_fetch();
        store.apply_snapshot(seq, vec![pot("2", "B")]);

        assert_eq!(store.pending("1"), None);
        assert_eq!(store.pending("2"), Some(PendingOp::Updating));
    }

    #[test]
    fn append_generates_unique_ids_within_one_millisecond() {
        let mut store = CollectionStore::new();
        let ids: Vec<String> = (0..50)
            .map(|i| store.append(format!("Pot {i}"), "Clay".to_string()))
            .collect();

        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn merge_only_touches_name_and_category() {
        let mut store = CollectionStore::new();
        let seq = store.begin_fetch();
        let mut original = pot("1", "Vase");
        original.description = "keep me".to_string();
        store.apply_snapshot(seq, vec![original, pot("2", "Bowl")]);

        assert!(store.merge("1", "Urn".to_string(), "Stone".to_string()));
        let merged = store.get("1").unwrap();
        assert_eq!(merged.name, "Urn");
        assert_eq!(merged.category, "Stone");
        assert_eq!(merged.description, "keep me");
        assert_eq!(store.get("2").unwrap().name, "Bowl");

        assert!(!store.merge("missing", "x".to_string(), "y".to_string()));
    }

    #[test]
    fn remove_takes_exactly_one() {
        let mut store = CollectionStore::new();
        let a = store.append("A".to_string(), "Clay".to_string());
        let b = store.append("B".to_string(), "Clay".to_string());

        assert_eq!(store.remove(&a).map(|p| p.name), Some("A".to_string()));
        assert!(store.remove(&a).is_none());
        assert_eq!(store.len(), 1);
        assert!(store.get(&b).is_some());
    }

    #[test]
    fn in_flight_counts_creates_and_pending() {
        let mut store = CollectionStore::new();
        store.begin_create();
        store.mark_pending("9", PendingOp::Updating);
        assert_eq!(store.in_flight(), 2);
        store.finish_create();
        store.finish_create();
        store.settle("9");
        assert_eq!(store.in_flight(), 0);
    }
}
