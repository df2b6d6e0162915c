//! In-memory registry and partner selection.

use super::{validate_dect_number, Partner, Snapshot};
use crate::error::RouletteError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeSet, VecDeque};

/// Registered and banned DECT numbers plus the two pairing queues.
///
/// Newly registered numbers are queued once on the priority queue so they are
/// handed out as partners before anyone else. When it runs dry, partners come
/// from the fallback queue, which is refilled with a fresh shuffle of every
/// registered number whenever it is exhausted.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    registered: BTreeSet<u32>,
    banned: BTreeSet<u32>,
    priority: VecDeque<u32>,
    fallback: VecDeque<u32>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild membership from a persisted snapshot. Both queues start empty.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            registered: snapshot.registered_numbers.into_iter().collect(),
            banned: snapshot.banned_numbers.into_iter().collect(),
            priority: VecDeque::new(),
            fallback: VecDeque::new(),
        }
    }

    /// Capture the persisted part of the registry.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            registered_numbers: self.registered.iter().copied().collect(),
            banned_numbers: self.banned.iter().copied().collect(),
        }
    }

    /// Register a number for pairing.
    ///
    /// Returns `true` if the number was newly added (and the snapshot needs to
    /// be written), `false` if it was already registered.
    pub fn register(&mut self, number: u32) -> Result<bool, RouletteError> {
        let number = validate_dect_number(number.into())?;

        if self.banned.contains(&number) {
            return Err(RouletteError::Banned(number));
        }

        if !self.registered.insert(number) {
            return Ok(false);
        }

        if !self.priority.contains(&number) {
            self.priority.push_back(number);
        }

        Ok(true)
    }

    /// Remove a number from the registry and purge it from both queues.
    ///
    /// Returns `true` if the number was registered before the call.
    pub fn unregister(&mut self, number: u32) -> Result<bool, RouletteError> {
        let number = validate_dect_number(number.into())?;

        let removed = self.registered.remove(&number);
        self.priority.retain(|&n| n != number);
        self.fallback.retain(|&n| n != number);

        Ok(removed)
    }

    /// Ban a number. Queued entries are left in place and skipped on draw.
    pub fn ban(&mut self, number: u32) -> bool {
        self.banned.insert(number)
    }

    /// Lift a ban. Unbanning a number that is not banned is a no-op.
    pub fn unban(&mut self, number: u32) -> bool {
        self.banned.remove(&number)
    }

    /// Draw the next partner for `own_number`, advancing the queues.
    pub fn pick_partner(&mut self, own_number: u32) -> Partner {
        self.pick_partner_with(own_number, &mut rand::thread_rng())
    }

    /// Draw the next partner using the given random source for refills.
    ///
    /// Candidates equal to the caller, no longer registered, or banned are
    /// discarded and the draw repeats. Returns [`Partner::Nobody`] when fewer
    /// than two numbers are registered or no eligible partner exists.
    pub fn pick_partner_with<R: Rng + ?Sized>(&mut self, own_number: u32, rng: &mut R) -> Partner {
        if self.registered.len() < 2 || !self.has_candidate_for(own_number) {
            return Partner::Nobody;
        }

        // Terminates: every refill holds at least one eligible candidate.
        loop {
            let candidate = match self
                .priority
                .pop_front()
                .or_else(|| self.fallback.pop_front())
            {
                Some(n) => n,
                None => {
                    self.refill_fallback(rng);
                    continue;
                }
            };

            if candidate != own_number && self.is_eligible(candidate) {
                return Partner::Number(candidate);
            }
        }
    }

    fn refill_fallback<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut shuffled: Vec<u32> = self.registered.iter().copied().collect();
        shuffled.shuffle(rng);
        self.fallback.extend(shuffled);
    }

    fn is_eligible(&self, number: u32) -> bool {
        self.registered.contains(&number) && !self.banned.contains(&number)
    }

    fn has_candidate_for(&self, own_number: u32) -> bool {
        self.registered
            .iter()
            .any(|&n| n != own_number && !self.banned.contains(&n))
    }

    /// Check if a number is registered.
    pub fn is_registered(&self, number: u32) -> bool {
        self.registered.contains(&number)
    }

    /// Check if a number is banned.
    pub fn is_banned(&self, number: u32) -> bool {
        self.banned.contains(&number)
    }

    /// Check if a number is still waiting on the priority queue.
    pub fn is_prioritized(&self, number: u32) -> bool {
        self.priority.contains(&number)
    }

    /// Registered numbers in ascending order.
    pub fn registered_numbers(&self) -> Vec<u32> {
        self.registered.iter().copied().collect()
    }

    /// Banned numbers in ascending order.
    pub fn banned_numbers(&self) -> Vec<u32> {
        self.banned.iter().copied().collect()
    }

    /// Get the number of registered numbers.
    pub fn count(&self) -> usize {
        self.registered.len()
    }

    /// Get the number of banned numbers.
    pub fn count_banned(&self) -> usize {
        self.banned.len()
    }
}
