//! Identifier and clock types
//!
//! Participant ids and request timestamps are plain monotonic integers issued
//! by explicit counters owned by the exchange, so every run (and every test)
//! starts from a known state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a participant. Never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(u64);

impl ParticipantId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Issues participant ids in creation order, starting at 1
#[derive(Debug, Clone)]
pub struct IdIssuer {
    next: u64,
}

impl IdIssuer {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the next id
    pub fn issue(&mut self) -> ParticipantId {
        let id = ParticipantId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids issued so far
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

impl Default for IdIssuer {
    fn default() -> Self {
        Self::new()
    }
}

/// Logical submission time of a request
///
/// Strictly increasing per submission, so it doubles as the insertion-order
/// tie-break for price-time priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Monotonic logical clock stamping every request
#[derive(Debug, Clone)]
pub struct LogicalClock {
    next: u64,
}

impl LogicalClock {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Next timestamp; never repeats
    pub fn stamp(&mut self) -> Timestamp {
        let ts = Timestamp(self.next);
        self.next += 1;
        ts
    }

    /// The most recently issued timestamp, if any
    pub fn last(&self) -> Option<Timestamp> {
        (self.next > 1).then(|| Timestamp(self.next - 1))
    }
}

impl Default for LogicalClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_issuer_monotonic() {
        let mut issuer = IdIssuer::new();
        let a = issuer.issue();
        let b = issuer.issue();
        assert_eq!(a, ParticipantId::new(1));
        assert_eq!(b, ParticipantId::new(2));
        assert_eq!(issuer.issued(), 2);
    }

    #[test]
    fn test_fresh_issuers_restart() {
        let mut first = IdIssuer::new();
        first.issue();
        first.issue();
        let mut second = IdIssuer::new();
        assert_eq!(second.issue(), ParticipantId::new(1));
    }

    #[test]
    fn test_clock_strictly_increasing() {
        let mut clock = LogicalClock::new();
        assert_eq!(clock.last(), None);
        let t1 = clock.stamp();
        let t2 = clock.stamp();
        assert!(t1 < t2);
        assert_eq!(clock.last(), Some(t2));
    }

    #[test]
    fn test_participant_id_serialization() {
        let id = ParticipantId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let back: ParticipantId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
