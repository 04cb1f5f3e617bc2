//! Deterministic resource names
//!
//! Names are derived from `(landing zone id, sequence number)` only, so any
//! process running the same factory for the same landing zone computes the
//! same names in the same order. Duplicate deployments then collide on name
//! at the provider instead of producing a second copy.

use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

/// Literal prefix of every generated name
pub const NAME_PREFIX: &str = "lz";

/// Shortest name `next_name` will ever return
pub const MIN_NAME_LENGTH: usize = 5;

/// Default bound, suitable for the least restrictive resource type
pub const DEFAULT_MAX_NAME_LENGTH: usize = 64;

/// Maximum name lengths per resource type
pub mod max_length {
    pub const STORAGE_ACCOUNT: usize = 24;
    pub const BATCH_ACCOUNT: usize = 24;
    pub const KUBERNETES_CLUSTER: usize = 25;
    pub const RELAY_NAMESPACE: usize = 50;
    pub const LOG_ANALYTICS_WORKSPACE: usize = 63;
    pub const POSTGRES_SERVER: usize = 63;
    pub const VIRTUAL_NETWORK: usize = 64;
}

/// Sequence-based name generator for one landing zone
///
/// Callers sharing one generator across threads get a serialized sequence:
/// each call claims exactly one sequence number.
#[derive(Debug)]
pub struct NameGenerator {
    landing_zone_id: String,
    sequence: AtomicU64,
}

impl NameGenerator {
    pub fn new(landing_zone_id: impl Into<String>) -> Self {
        Self {
            landing_zone_id: landing_zone_id.into(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn landing_zone_id(&self) -> &str {
        &self.landing_zone_id
    }

    /// Next name in the sequence, at most `max_length` characters
    ///
    /// `max_length` below [`MIN_NAME_LENGTH`] is raised to it.
    pub fn next_name(&self, max_length: usize) -> String {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.name_at(sequence, max_length)
    }

    /// [`next_name`](Self::next_name) with [`DEFAULT_MAX_NAME_LENGTH`]
    pub fn next_name_default(&self) -> String {
        self.next_name(DEFAULT_MAX_NAME_LENGTH)
    }

    /// Rewind to the start of the sequence
    pub fn reset_sequence(&self) {
        self.sequence.store(0, Ordering::SeqCst);
    }

    /// Sequence number the next call will use
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    fn name_at(&self, sequence: u64, max_length: usize) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.landing_zone_id.as_bytes());
        // Decimal digits never contain ':', so (id, sequence) pairs cannot collide
        hasher.update(b":");
        hasher.update(sequence.to_string().as_bytes());
        let digest = hex::encode(hasher.finalize());

        let mut name = format!("{}{}", NAME_PREFIX, digest);
        name.truncate(max_length.max(MIN_NAME_LENGTH));
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_same_id_same_sequence() {
        let a = NameGenerator::new("lz-1");
        let b = NameGenerator::new("lz-1");

        let first: Vec<_> = (0..5).map(|_| a.next_name_default()).collect();
        let second: Vec<_> = (0..5).map(|_| b.next_name_default()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_ids_diverge() {
        let a = NameGenerator::new("lz-1");
        let b = NameGenerator::new("lz-2");
        assert_ne!(a.next_name_default(), b.next_name_default());
    }

    #[test]
    fn test_id_and_sequence_do_not_run_together() {
        let zone = NameGenerator::new("zone");
        let eleventh = (0..11).map(|_| zone.next_name_default()).last().unwrap();
        let zone1 = NameGenerator::new("zone1");
        assert_ne!(eleventh, zone1.next_name_default());
    }

    #[test]
    fn test_names_are_unique_within_sequence() {
        let generator = NameGenerator::new("lz-1");
        let names: HashSet<_> = (0..100)
            .map(|_| generator.next_name(max_length::STORAGE_ACCOUNT))
            .collect();
        assert_eq!(names.len(), 100);
    }

    #[test]
    fn test_length_bound() {
        let generator = NameGenerator::new("lz-1");
        for max in MIN_NAME_LENGTH..=80 {
            let name = generator.next_name(max);
            assert!(name.len() <= max, "{} longer than {}", name, max);
            assert!(name.starts_with(NAME_PREFIX));
        }
    }

    #[test]
    fn test_minimum_floor() {
        let generator = NameGenerator::new("lz-1");
        assert_eq!(generator.next_name(0).len(), MIN_NAME_LENGTH);
        assert_eq!(generator.next_name(3).len(), MIN_NAME_LENGTH);
    }

    #[test]
    fn test_default_length_and_charset() {
        let name = NameGenerator::new("lz-1").next_name_default();
        assert_eq!(name.len(), DEFAULT_MAX_NAME_LENGTH);
        assert!(
            name.chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[test]
    fn test_reset_sequence_replays_names() {
        let generator = NameGenerator::new("lz-1");
        let first = generator.next_name(24);
        let second = generator.next_name(24);
        assert_eq!(generator.sequence(), 2);

        generator.reset_sequence();
        assert_eq!(generator.next_name(24), first);
        assert_eq!(generator.next_name(24), second);
    }

    #[test]
    fn test_shared_generator_claims_each_sequence_once() {
        let generator = Arc::new(NameGenerator::new("lz-1"));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || {
                    (0..25)
                        .map(|_| generator.next_name_default())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let names: HashSet<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(names.len(), 200);
        assert_eq!(generator.sequence(), 200);

        let replay = NameGenerator::new("lz-1");
        let expected: HashSet<_> = (0..200).map(|_| replay.next_name_default()).collect();
        assert_eq!(names, expected);
    }
}
