//! End-to-end scenarios spanning encoding, the physical layer, and the MAC
//! scheduler together.

use mesh_core::config::{BandConfig, FecConfig, MacConfig, TimingConfig};
use mesh_core::encoding::{decode_frame, encode_message, reassemble, MessageType};
use mesh_core::mac::MacScheduler;
use mesh_core::physical::{demodulate, modulate};
use std::time::{Duration, Instant};

#[test]
fn application_bytes_survive_full_wire_roundtrip() {
    let band = BandConfig::ultrasonic();
    let timing = TimingConfig::default();
    let fec = FecConfig::default();

    let payload = b"mesh network end to end test payload".to_vec();
    let wire_frames = encode_message(MessageType::Data, &payload, &fec).unwrap();

    let mut recovered_frames = Vec::new();
    for wire_bytes in &wire_frames {
        let samples = modulate(wire_bytes, &band, &timing);
        let demodulated = demodulate(&samples, &band, &timing).unwrap();
        let (frame, corrected) = decode_frame(&demodulated.data, &fec).unwrap();
        assert_eq!(corrected, 0);
        recovered_frames.push(frame);
    }

    let recovered = reassemble(&recovered_frames).unwrap();
    assert_eq!(recovered, payload);
}

#[test]
fn mac_coordinator_grants_disjoint_slots_to_two_devices() {
    let config = MacConfig::default();
    let start = Instant::now();

    let mut a = MacScheduler::new([1, 0, 0, 0], config, start);
    let mut b = MacScheduler::new([2, 0, 0, 0], config, start);

    // Coordinator assignment requires a shared slot table; exercise the
    // underlying table directly the way a coordinator process would.
    let mut table = mesh_core::mac::SlotTable::new(config.slots_per_frame);
    let slots_a = table.assign_coordinator([1, 0, 0, 0], 2).unwrap();
    let slots_b = table.assign_coordinator([2, 0, 0, 0], 2).unwrap();

    assert!(slots_a.iter().all(|s| !slots_b.contains(s)));
    assert_eq!(table.utilization(), 4.0 / config.slots_per_frame as f64);

    a.enqueue(vec![0x01], 5);
    b.enqueue(vec![0x02], 5);
    assert_eq!(a.queue_len(), 1);
    assert_eq!(b.queue_len(), 1);
}

#[test]
fn scheduler_transmit_opportunity_respects_assigned_slot() {
    let config = MacConfig::default();
    let start = Instant::now();
    let mut scheduler = MacScheduler::new([7, 0, 0, 0], config, start);

    scheduler.request_contention_slots(1, 5);
    let assigned = scheduler.assigned_slots()[0];
    scheduler.enqueue(vec![0xFF], 5);

    let other_slot = (assigned + 1) % config.slots_per_frame;
    let other_time = start + Duration::from_millis(other_slot as u64 * config.slot_duration_ms());
    assert!(scheduler.tick(other_time).is_none());

    let assigned_time = start + Duration::from_millis(assigned as u64 * config.slot_duration_ms());
    let entry = scheduler.tick(assigned_time);
    if assigned != other_slot {
        assert!(entry.is_some());
    }
}
