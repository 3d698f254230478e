use criterion::{Criterion, criterion_group, criterion_main};
use example_thrum_app::{Calculator, spawn_loopback};
use std::hint::black_box;

fn bench_roundtrip(c: &mut Criterion) {
    // Set up server + client once
    let (mut client, _server) = spawn_loopback(Calculator::new()).unwrap();

    c.bench_function("calc_add_roundtrip", |b| {
        b.iter(|| {
            let result = client.add(black_box(2), black_box(3)).unwrap();
            assert_eq!(result, 5);
        });
    });

    let values: Vec<i32> = (0..64).collect();
    c.bench_function("calc_sum_roundtrip_64_values", |b| {
        b.iter(|| black_box(client.sum(black_box(&values)).unwrap()));
    });

    c.bench_function("calc_div_by_zero_roundtrip", |b| {
        b.iter(|| {
            let err = client.div(black_box(1), black_box(0)).unwrap_err();
            black_box(err);
        });
    });
}

criterion_group!(benches, bench_roundtrip);
criterion_main!(benches);
