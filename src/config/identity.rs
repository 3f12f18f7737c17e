//! Leader identity generation.
//!
//! Every process start gets its own holder identity so that peers started
//! with default settings never collide on the lease lock.

use uuid::Uuid;

/// Source of leader-election holder identities.
pub trait IdGenerator {
    /// Returns a new identity token.
    fn generate(&self) -> String;
}

/// Random UUID v4 identities.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<F> IdGenerator for F
where
    F: Fn() -> String,
{
    fn generate(&self) -> String {
        self()
    }
}
