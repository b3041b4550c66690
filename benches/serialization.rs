use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use policy_writer::{to_policy, to_string, PafWriter, Policy, PolicyWriter};
use serde::Serialize;
use std::io;

#[derive(Serialize, Clone)]
struct Amplifier {
    id: u32,
    gain: f64,
    read_noise: f64,
    bad_columns: Vec<i32>,
}

#[derive(Serialize, Clone)]
struct Detector {
    name: String,
    serial: String,
    active: bool,
    amplifiers: Vec<Amplifier>,
}

fn detector(amplifiers: u32) -> Detector {
    Detector {
        name: "R22_S11".to_string(),
        serial: "ITL-3800C-002".to_string(),
        active: true,
        amplifiers: (0..amplifiers)
            .map(|i| Amplifier {
                id: i,
                gain: 1.5 + f64::from(i) / 100.0,
                read_noise: 4.25,
                bad_columns: vec![12, 40, 511],
            })
            .collect(),
    }
}

fn benchmark_write_flat(c: &mut Criterion) {
    let mut policy = Policy::new();
    for i in 0..50 {
        policy.set(&format!("param{i}"), i).unwrap();
    }

    c.bench_function("write_flat_policy", |b| {
        b.iter(|| to_string(black_box(&policy), true))
    });
}

fn benchmark_write_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_nested_policy");

    for size in [1, 16, 64, 256].iter() {
        let policy = to_policy(&detector(*size)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &policy, |b, policy| {
            b.iter(|| to_string(black_box(policy), false))
        });
    }
    group.finish();
}

fn benchmark_write_arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_double_array");

    for size in [10, 100, 1000].iter() {
        let values: Vec<f64> = (0..*size).map(|i| f64::from(i) * 0.5).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &values, |b, values| {
            b.iter(|| {
                let mut writer = PafWriter::new(io::sink());
                writer.write_doubles("values", black_box(values))
            })
        });
    }
    group.finish();
}

fn benchmark_to_policy(c: &mut Criterion) {
    let data = detector(16);

    c.bench_function("to_policy_detector", |b| {
        b.iter(|| to_policy(black_box(&data)))
    });
}

fn benchmark_discard_sink(c: &mut Criterion) {
    let policy = to_policy(&detector(16)).unwrap();

    c.bench_function("write_to_discard_sink", |b| {
        b.iter(|| PafWriter::discard().write(black_box(&policy), true))
    });
}

criterion_group!(
    benches,
    benchmark_write_flat,
    benchmark_write_nested,
    benchmark_write_arrays,
    benchmark_to_policy,
    benchmark_discard_sink
);
criterion_main!(benches);
