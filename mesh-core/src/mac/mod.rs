//! Time-slotted medium access: queueing, slot assignment, and the scheduler
//! that ties them together (spec §4.4).

pub mod queue;
pub mod scheduler;
pub mod slots;

pub use queue::{TransmitEntry, TransmitQueue};
pub use scheduler::MacScheduler;
pub use slots::{assign_contention, CollisionTracker, DeviceId, SlotTable};
