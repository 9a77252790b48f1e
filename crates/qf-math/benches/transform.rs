use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use qf_math::{Complex64, Transform, TransformConfig};
use std::hint::black_box;

fn gaussian_samples(transform: &Transform) -> Vec<Complex64> {
    transform
        .frequency_domain()
        .into_iter()
        .map(|u| Complex64::new((-0.5 * u * u).exp(), 0.0))
        .collect()
}

fn bench_inversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform_inversion");
    for n in [128usize, 512, 2048] {
        let transform = Transform::new(TransformConfig::default().with_samples(n))
            .expect("benchmark transform should be valid");
        let psi = gaussian_samples(&transform);

        group.bench_with_input(BenchmarkId::new("nyquist", n), &psi, |b, psi| {
            b.iter(|| transform.invert(black_box(psi), None))
        });
        group.bench_with_input(BenchmarkId::new("fractional", n), &psi, |b, psi| {
            b.iter(|| transform.invert(black_box(psi), Some(0.01)))
        });
    }
    group.finish();
}

fn bench_simpson(c: &mut Criterion) {
    let transform = Transform::new(
        TransformConfig::default()
            .with_samples(1025)
            .with_simpson_rule(true),
    )
    .expect("benchmark transform should be valid");
    let psi = gaussian_samples(&transform);
    c.bench_function("transform_simpson_1025", |b| {
        b.iter(|| transform.invert(black_box(&psi), None))
    });
}

criterion_group!(benches, bench_inversion, bench_simpson);
criterion_main!(benches);
