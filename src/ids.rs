use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of non-deterministic identifiers used by the pipeline
pub trait IdGenerator: Send + Sync {
    /// Identifier correlating one analysis run
    fn trace_id(&self) -> String;

    /// Identifier for a vessel that has neither an id nor a name
    fn vessel_id(&self) -> String;
}

/// Random UUID v4 identifiers
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn trace_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn vessel_id(&self) -> String {
        let simple = Uuid::new_v4().simple().to_string();
        format!("vessel-{}", &simple[..9])
    }
}

/// Predictable identifiers for tests and reproducible runs
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn trace_id(&self) -> String {
        format!("trace-{:04}", self.bump())
    }

    fn vessel_id(&self) -> String {
        format!("vessel-{:04}", self.bump())
    }
}
