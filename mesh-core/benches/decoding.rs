use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mesh_core::config::{BandConfig, FecConfig, TimingConfig};
use mesh_core::encoding::{decode_fec, encode_fec};
use mesh_core::physical::{demodulate, modulate};

fn benchmark_fec_decode(c: &mut Criterion) {
    let fec = FecConfig::default();
    let payload = vec![0xA5u8; 128];
    let encoded = encode_fec(&payload, fec.interleave_depth);

    let mut group = c.benchmark_group("fec_decode");
    for depth in [4usize, 8, 16, 32].iter() {
        let encoded = encode_fec(&payload, *depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            b.iter(|| decode_fec(black_box(&encoded), black_box(depth)))
        });
    }
    group.finish();

    let _ = decode_fec(&encoded, fec.interleave_depth);
}

fn benchmark_fsk_roundtrip(c: &mut Criterion) {
    let band = BandConfig::ultrasonic();
    let timing = TimingConfig::default();
    let data = b"benchmark payload bytes".to_vec();
    let samples = modulate(&data, &band, &timing);

    c.bench_function("fsk_demodulate_short_message", |b| {
        b.iter(|| demodulate(black_box(&samples), black_box(&band), black_box(&timing)))
    });
}

criterion_group!(benches, benchmark_fec_decode, benchmark_fsk_roundtrip);
criterion_main!(benches);
