use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::wire::fragment::Fragment;

/// What happened to one scanned record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// First sighting of this index. `Stored { index: 0 }` is the cue for
    /// the front-end to ask for a password, once per session.
    Stored { index: u32 },
    /// The index was already present; the first-seen payload is kept.
    Duplicate { index: u32 },
    /// Unparsable or mis-shaped record, dropped.
    Rejected,
}

/// Accumulates raw (still wire-encoded) fragment payloads by index.
///
/// Scanning the same physical code across many camera frames is normal, so
/// insertion is idempotent and malformed text is never an error.
#[derive(Debug, Default)]
pub struct FragmentStore {
    slots: BTreeMap<u32, String>,
    total_hint: Option<u32>,
}

impl FragmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and keep one scanned record. Noise is logged and swallowed.
    pub fn put(&mut self, text: &str) -> IngestOutcome {
        match Fragment::parse(text) {
            Ok(frag) => self.insert(frag),
            Err(e) => {
                warn!(error = %e, "dropping unreadable fragment");
                IngestOutcome::Rejected
            }
        }
    }

    /// First insert per index wins; re-scans are no-ops.
    pub fn insert(&mut self, frag: Fragment) -> IngestOutcome {
        if let Some(total) = frag.total {
            self.total_hint = Some(self.total_hint.map_or(total, |cur| cur.max(total)));
        }
        if self.slots.contains_key(&frag.index) {
            debug!(index = frag.index, "duplicate fragment ignored");
            return IngestOutcome::Duplicate { index: frag.index };
        }
        debug!(index = frag.index, wire_len = frag.data.len(), "fragment stored");
        self.slots.insert(frag.index, frag.data);
        IngestOutcome::Stored { index: frag.index }
    }

    pub fn has(&self, index: u32) -> bool {
        self.slots.contains_key(&index)
    }

    pub fn payload(&self, index: u32) -> Option<&str> {
        self.slots.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn max_index(&self) -> Option<u32> {
        self.slots.keys().next_back().copied()
    }

    /// Largest per-fragment `total` seen so far; a hint, not an authority.
    pub fn total_hint(&self) -> Option<u32> {
        self.total_hint
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.total_hint = None;
    }
}
