/// A one-shot scheduled call.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<E> {
    pub fire_at: f64,
    pub event: E,
    pub generation: u64,
    seq: u64,
}

/// Schedule of one-shot entries on the simulated clock.
///
/// Every entry is stamped with the round generation it was armed in. Popping
/// with a newer generation drops the stale ones, so nothing armed before a
/// reset can fire after it.
#[derive(Debug, Clone)]
pub struct Timeline<E> {
    entries: Vec<Entry<E>>,
    next_seq: u64,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, fire_at: f64, event: E, generation: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            fire_at,
            event,
            generation,
            seq,
        });
    }

    /// Earliest entry of `generation` with `fire_at <= now`. Ties fire in the
    /// order they were scheduled.
    pub fn pop_due(&mut self, now: f64, generation: u64) -> Option<Entry<E>> {
        self.discard_stale(generation);
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.fire_at <= now)
            .min_by(|(_, a), (_, b)| a.fire_at.total_cmp(&b.fire_at).then(a.seq.cmp(&b.seq)))
            .map(|(idx, _)| idx)?;
        Some(self.entries.swap_remove(idx))
    }

    pub fn next_fire_at(&self, generation: u64) -> Option<f64> {
        self.entries
            .iter()
            .filter(|e| e.generation == generation)
            .map(|e| e.fire_at)
            .min_by(f64::total_cmp)
    }

    pub fn discard_stale(&mut self, generation: u64) {
        let before = self.entries.len();
        self.entries.retain(|e| e.generation == generation);
        let dropped = before - self.entries.len();
        if dropped > 0 {
            tracing::trace!(dropped, generation, "discarded stale timeline entries");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
