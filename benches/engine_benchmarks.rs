use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use num_complex::c64;
use rftoolbox::prelude::*;

fn bench_response(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_response");
    let tf = FilterSpecBuilder::new()
        .family(ResponseFamily::ChebyshevI)
        .order(8)
        .build()
        .unwrap()
        .transfer_function()
        .unwrap();
    for npts in [101, 1001, 10001] {
        let sweep = Frequency::from_log_range(1.0, 10.0, npts, Scale::Mega).unwrap();
        group.throughput(Throughput::Elements(npts as u64));
        group.bench_with_input(BenchmarkId::from_parameter(npts), &sweep, |b, sweep| {
            b.iter(|| evaluate_response(black_box(&tf), sweep).unwrap())
        });
    }
    group.finish();
}

fn bench_elliptic(c: &mut Criterion) {
    let mut group = c.benchmark_group("elliptic_prototype");
    for order in [2, 5, 9, 14] {
        group.bench_with_input(BenchmarkId::from_parameter(order), &order, |b, &order| {
            b.iter(|| {
                select_prototype(black_box(order), ResponseFamily::Elliptic, 0.5, 60.0).unwrap()
            })
        });
    }
    group.finish();
}

fn bench_reflection(c: &mut Criterion) {
    let line = TransmissionLineBuilder::new()
        .zl(c64(100.0, -35.0))
        .length_scaled(0.3, Scale::Base, Unit::Lambda)
        .build();
    c.bench_function("compute_reflection", |b| {
        b.iter(|| compute_reflection(black_box(&line)).unwrap())
    });
    c.bench_function("compute_input_impedance", |b| {
        b.iter(|| compute_input_impedance(black_box(&line)).unwrap())
    });
}

criterion_group!(benches, bench_response, bench_elliptic, bench_reflection);
criterion_main!(benches);
