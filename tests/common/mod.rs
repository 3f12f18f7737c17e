//! Shared helpers for configuration integration tests.

use std::cell::Cell;

use apiserver::config::IdGenerator;

/// Deterministic leader identities: `holder-0`, `holder-1`, ...
#[derive(Debug, Default)]
pub struct SequenceIds {
    next: Cell<u32>,
}

impl IdGenerator for SequenceIds {
    fn generate(&self) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("holder-{}", n)
    }
}
