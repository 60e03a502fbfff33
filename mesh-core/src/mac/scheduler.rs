//! TDMA scheduler: slot-tick driven transmit opportunities, collision
//! handling, and frame-boundary bookkeeping (spec §4.4).

use super::queue::{TransmitEntry, TransmitQueue};
use super::slots::{CollisionTracker, DeviceId, SlotTable};
use crate::config::MacConfig;
use rand::Rng;
use std::time::{Duration, Instant};

/// Drives slot accounting and transmit opportunities off a caller-supplied
/// clock. The scheduler itself spawns no threads and owns no timer; a
/// caller ticks it at `slot_duration` granularity as spec'd rather than the
/// scheduler polling a clock on its own.
pub struct MacScheduler {
    local_device: DeviceId,
    config: MacConfig,
    slot_table: SlotTable,
    queue: TransmitQueue,
    collision: CollisionTracker,
    assigned_slots: Vec<usize>,
    frame_start: Instant,
    last_slot: Option<usize>,
}

impl MacScheduler {
    pub fn new(local_device: DeviceId, config: MacConfig, now: Instant) -> Self {
        let slot_table = SlotTable::new(config.slots_per_frame);
        Self {
            local_device,
            config,
            slot_table,
            queue: TransmitQueue::new(),
            collision: CollisionTracker::new(),
            assigned_slots: Vec::new(),
            frame_start: now,
            last_slot: None,
        }
    }

    pub fn enqueue(&mut self, frame_bytes: Vec<u8>, priority: u8) {
        self.queue.push(frame_bytes, priority);
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn assigned_slots(&self) -> &[usize] {
        &self.assigned_slots
    }

    fn frame_duration(&self) -> Duration {
        Duration::from_millis(self.config.frame_duration_ms)
    }

    /// Slot index within the current frame, derived from the local
    /// monotonic clock: `floor((now - frame_start) / slot_duration) mod
    /// slots_per_frame`.
    pub fn current_slot(&self, now: Instant) -> usize {
        let slot_duration = Duration::from_millis(self.config.slot_duration_ms());
        let elapsed = now.saturating_duration_since(self.frame_start);
        let frame_duration = self.frame_duration();
        let into_frame = if frame_duration.is_zero() {
            elapsed
        } else {
            Duration::from_nanos((elapsed.as_nanos() % frame_duration.as_nanos().max(1)) as u64)
        };
        let slot = (into_frame.as_nanos() / slot_duration.as_nanos().max(1)) as usize;
        slot % self.config.slots_per_frame
    }

    /// Grants coordinator-mode slots to the local device.
    pub fn request_coordinator_slots(&mut self, k: usize) -> Result<(), crate::errors::MacError> {
        let granted = self.slot_table.assign_coordinator(self.local_device, k)?;
        self.assigned_slots = granted;
        Ok(())
    }

    /// Selects contention-mode slots for the local device without
    /// consulting a coordinator.
    pub fn request_contention_slots(&mut self, k: usize, priority: u8) {
        let slots = super::slots::assign_contention(&self.local_device, k, priority, self.config.slots_per_frame);
        self.slot_table.set_assignment(self.local_device, slots.clone());
        self.assigned_slots = slots;
    }

    /// Advances the scheduler to `now`. Returns a frame ready to hand to
    /// the physical layer if `now` falls on a transition into one of this
    /// device's assigned slots.
    pub fn tick(&mut self, now: Instant) -> Option<TransmitEntry> {
        let slot = self.current_slot(now);
        let transitioned = self.last_slot != Some(slot);
        self.last_slot = Some(slot);

        if transitioned && self.assigned_slots.contains(&slot) {
            self.queue.pop()
        } else {
            None
        }
    }

    /// Handles a collision observed in the device's current slot: bumps
    /// the backoff counter, reassigns to a single new slot, and marks the
    /// head of the transmit queue for retransmission.
    pub fn on_collision(&mut self, now: Instant, rng: &mut impl Rng) {
        let current = self.current_slot(now);
        let new_slot = self.collision.on_collision(current, self.config.slots_per_frame, rng);
        self.assigned_slots = vec![new_slot];
        self.slot_table.set_assignment(self.local_device, self.assigned_slots.clone());

        if let Some(entry) = self.queue.pop() {
            self.queue.requeue(entry);
        }
    }

    pub fn collision_count(&self) -> u32 {
        self.collision.collision_count()
    }

    /// Frame-start hook: recomputes slot utilisation. Called by the caller
    /// once per frame boundary.
    pub fn on_frame_boundary(&mut self, now: Instant) -> f64 {
        self.frame_start = now;
        self.last_slot = None;
        self.slot_table.utilization()
    }
}
