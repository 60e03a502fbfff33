//! Slot table and slot assignment: coordinator mode and contention mode
//! (spec §4.4).

use crate::errors::MacError;
use rand::Rng;
use std::collections::HashMap;

pub type DeviceId = [u8; 4];

/// Per-device slot assignments for one TDMA frame.
#[derive(Debug, Clone, Default)]
pub struct SlotTable {
    assignments: HashMap<DeviceId, Vec<usize>>,
    slots_per_frame: usize,
}

impl SlotTable {
    pub fn new(slots_per_frame: usize) -> Self {
        Self {
            assignments: HashMap::new(),
            slots_per_frame,
        }
    }

    pub fn assigned_slots(&self, device: &DeviceId) -> &[usize] {
        self.assignments.get(device).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_assignment(&mut self, device: DeviceId, slots: Vec<usize>) {
        self.assignments.insert(device, slots);
    }

    pub fn release(&mut self, device: &DeviceId) {
        self.assignments.remove(device);
    }

    fn occupied(&self) -> Vec<bool> {
        let mut occupied = vec![false; self.slots_per_frame];
        for slots in self.assignments.values() {
            for &s in slots {
                if s < self.slots_per_frame {
                    occupied[s] = true;
                }
            }
        }
        occupied
    }

    fn free_slots(&self) -> Vec<usize> {
        self.occupied()
            .into_iter()
            .enumerate()
            .filter_map(|(i, used)| if used { None } else { Some(i) })
            .collect()
    }

    /// Fraction of slots currently occupied by any device, in [0, 1].
    pub fn utilization(&self) -> f64 {
        let used = self.occupied().into_iter().filter(|&u| u).count();
        used as f64 / self.slots_per_frame.max(1) as f64
    }

    pub fn slots_per_frame(&self) -> usize {
        self.slots_per_frame
    }

    /// Coordinator-mode slot assignment: grants `k` slots from the currently
    /// free pool, spread across the frame. For request `i` of `k`, the slot
    /// chosen is index `floor(|free| * (i+1) / (k+1))` into the sorted free
    /// list.
    pub fn assign_coordinator(&mut self, device: DeviceId, k: usize) -> Result<Vec<usize>, MacError> {
        let free = self.free_slots();
        if free.len() < k {
            return Err(MacError::NoSlotsAvailable {
                requested: k,
                free: free.len(),
            });
        }

        let mut granted = Vec::with_capacity(k);
        for i in 0..k {
            let idx = (free.len() * (i + 1)) / (k + 1);
            let idx = idx.min(free.len() - 1);
            granted.push(free[idx]);
        }
        granted.sort_unstable();
        granted.dedup();

        self.set_assignment(device, granted.clone());
        Ok(granted)
    }

    /// Processes multiple coordinator requests in descending-priority order.
    pub fn process_coordinator_requests(&mut self, mut requests: Vec<(DeviceId, usize, u8)>) -> Vec<(DeviceId, Result<Vec<usize>, MacError>)> {
        requests.sort_by(|a, b| b.2.cmp(&a.2));
        requests
            .into_iter()
            .map(|(device, k, _priority)| {
                let result = self.assign_coordinator(device, k);
                (device, result)
            })
            .collect()
    }
}

/// DJBX-style rolling hash over a device identifier: `h <- (h*31) + c`,
/// returned as an absolute (non-negative) value.
fn rolling_hash(device: &DeviceId) -> u64 {
    let mut h: i64 = 0;
    for &c in device {
        h = h.wrapping_mul(31).wrapping_add(c as i64);
    }
    h.unsigned_abs()
}

/// Contention-mode (ALOHA-style) slot selection: no coordinator is
/// consulted, so collisions with other devices are expected and resolved
/// at runtime via backoff.
pub fn assign_contention(device: &DeviceId, k: usize, priority: u8, slots_per_frame: usize) -> Vec<usize> {
    let h = rolling_hash(device);
    (0..k)
        .map(|i| ((h + 7 * i as u64 + (priority / 2) as u64) % slots_per_frame as u64) as usize)
        .collect()
}

/// Per-device collision counter and binary-exponential-backoff slot reselection.
#[derive(Debug, Default)]
pub struct CollisionTracker {
    collision_count: u32,
}

impl CollisionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collision_count(&self) -> u32 {
        self.collision_count
    }

    /// Handles a detected collision in `current_slot`: bumps the collision
    /// counter, then picks a new single slot at a random backoff offset in
    /// `[0, min(16, 2^c))` from `current_slot`.
    pub fn on_collision(&mut self, current_slot: usize, slots_per_frame: usize, rng: &mut impl Rng) -> usize {
        self.collision_count += 1;
        let window = (1u32 << self.collision_count.min(31)).min(16);
        let offset = rng.gen_range(0..window) as usize;
        (current_slot + offset) % slots_per_frame
    }

    pub fn reset(&mut self) {
        self.collision_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn coordinator_assigns_non_overlapping_slots_to_two_requesters() {
        let mut table = SlotTable::new(20);
        let results = table.process_coordinator_requests(vec![
            ([1, 0, 0, 0], 2, 5),
            ([2, 0, 0, 0], 2, 5),
        ]);

        let slots_a = results[0].1.as_ref().unwrap();
        let slots_b = results[1].1.as_ref().unwrap();

        assert_eq!(slots_a.len(), 2);
        assert_eq!(slots_b.len(), 2);
        assert!(slots_a.iter().all(|s| !slots_b.contains(s)));
        assert_eq!(table.utilization(), 4.0 / 20.0);
    }

    #[test]
    fn coordinator_denies_when_pool_exhausted() {
        let mut table = SlotTable::new(4);
        table.assign_coordinator([1, 0, 0, 0], 4).unwrap();
        let err = table.assign_coordinator([2, 0, 0, 0], 1);
        assert!(matches!(err, Err(MacError::NoSlotsAvailable { .. })));
    }

    #[test]
    fn utilization_never_exceeds_one() {
        let mut table = SlotTable::new(4);
        table.assign_coordinator([9, 9, 9, 9], 4).unwrap();
        assert!(table.utilization() <= 1.0);
        assert_eq!(table.assigned_slots(&[9, 9, 9, 9]).len(), 4);
    }

    #[test]
    fn contention_assignment_is_deterministic_per_device() {
        let a = assign_contention(&[1, 2, 3, 4], 3, 5, 20);
        let b = assign_contention(&[1, 2, 3, 4], 3, 5, 20);
        assert_eq!(a, b);
        assert!(a.iter().all(|&s| s < 20));
    }

    #[test]
    fn backoff_keeps_single_slot_and_usually_moves() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut tracker = CollisionTracker::new();
        let mut differed = 0;
        for _ in 0..20 {
            let new_slot = tracker.on_collision(5, 20, &mut rng);
            if new_slot != 5 {
                differed += 1;
            }
        }
        assert!(differed > 10);
    }
}
