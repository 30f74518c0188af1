//! Benchmarks for spectral transforms, binding and carrier coding.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spectral_carrier::{
    build_transform, trit::Trit, BindingEngine, CarrierCodec, EncodeOptions,
    SymbolVectorGenerator, TransformKind, Vector,
};

fn pattern_vector(size: usize) -> Vector {
    Vector::new(
        (0..size)
            .map(|i| ((i * 31 + 7) % 97) as f64 / 48.0 - 1.0)
            .collect(),
    )
    .unwrap()
}

fn bench_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward_inverse");

    for size in [256, 1000, 1024, 1500, 4096].iter() {
        let v = pattern_vector(*size);

        for kind in [
            TransformKind::Radix2,
            TransformKind::Dft,
            TransformKind::Bluestein,
            TransformKind::Auto,
        ] {
            let transform = build_transform(kind);
            // Direct DFT is quadratic; keep it to the small sizes
            if !transform.supports(*size) || (kind == TransformKind::Dft && *size > 1500) {
                continue;
            }
            group.bench_with_input(BenchmarkId::new(transform.name(), size), size, |bench, _| {
                bench.iter(|| {
                    let coeffs = transform.forward(black_box(&v)).unwrap();
                    black_box(transform.inverse(&coeffs).unwrap())
                })
            });
        }
    }

    group.finish();
}

fn bench_bind_unbind(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind_unbind");
    let engine = BindingEngine::default();

    for size in [1024, 1500, 4096].iter() {
        let generator = SymbolVectorGenerator::new(*size).unwrap();
        let a = generator.generate("alpha", &[]).unwrap();
        let b = generator.generate("beta", &[]).unwrap();
        let bound = engine.bind(&a, &b).unwrap();

        group.bench_with_input(BenchmarkId::new("bind", size), size, |bench, _| {
            bench.iter(|| black_box(engine.bind(&a, &b).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("unbind", size), size, |bench, _| {
            bench.iter(|| black_box(engine.unbind(&bound, &a).unwrap()))
        });
    }

    group.finish();
}

fn bench_carrier_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("carrier_codec");
    let codec = CarrierCodec::default();
    let trits: Vec<Trit> = (0..125).map(|i| Trit::ALL[i % 3]).collect();

    for size in [1024, 4096].iter() {
        let opts = EncodeOptions::new(*size, "bench", "merkaba125");
        let (vector, manifest) = codec.encode_trits(&trits, &opts).unwrap();

        group.bench_with_input(BenchmarkId::new("plan_bins", size), size, |bench, _| {
            bench.iter(|| black_box(codec.plan_bins(*size, "bench", "merkaba125").unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("encode", size), size, |bench, _| {
            bench.iter(|| black_box(codec.encode_trits(&trits, &opts).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("decode", size), size, |bench, _| {
            bench.iter(|| black_box(codec.decode_with_manifest(&vector, &manifest).unwrap()))
        });
    }

    let payload = b"spectral carrier";
    let opts = EncodeOptions::new(4096, "bench", "merkaba125+3");
    group.bench_function("encode_binary_4096", |bench| {
        bench.iter(|| black_box(codec.encode_binary_to_vector(payload, &opts).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_transforms, bench_bind_unbind, bench_carrier_codec);
criterion_main!(benches);
