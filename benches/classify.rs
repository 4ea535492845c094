use criterion::{Criterion, black_box, criterion_group, criterion_main};
use layered_qr::{BitMatrix, RenderOptions, StructuralMask, Version, render_layer};

fn bench_classify_all_versions(c: &mut Criterion) {
    c.bench_function("classify_v1_to_v40", |b| {
        b.iter(|| {
            for version in Version::all() {
                black_box(StructuralMask::for_version(black_box(version)));
            }
        })
    });
}

fn bench_render_v40(c: &mut Criterion) {
    let mask = StructuralMask::for_version(Version::MAX);
    let layer: &BitMatrix = mask.as_matrix();
    let options = RenderOptions::default();
    c.bench_function("render_v40_10px", |b| {
        b.iter(|| render_layer(black_box(layer), black_box(&options)))
    });
}

criterion_group!(benches, bench_classify_all_versions, bench_render_v40);
criterion_main!(benches);
