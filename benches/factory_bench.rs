use bytes::Bytes;
use criterion::{criterion_group, criterion_main, Criterion};
use resource_metadata::payload::song::register_song;
use resource_metadata::payload::SongMetadata;
use resource_metadata::{MetadataFactory, ResourceMetadata};

fn bench_create_metadata(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_metadata");
    let factory = MetadataFactory::new();
    register_song(&factory).unwrap();

    let body = ResourceMetadata::new(SongMetadata::new("HeyDJ").unwrap()).to_bytes();
    group.bench_function("resolved", |b| {
        b.iter(|| {
            let _ = factory
                .create_metadata("SongMetadata", &mut body.clone())
                .unwrap();
        })
    });

    let raw = Bytes::from(vec![0xAB; 1024]);
    group.bench_function("fallback_1k", |b| {
        b.iter(|| {
            let _ = factory.create_metadata("Unknown", &mut raw.clone()).unwrap();
        })
    });

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let meta = ResourceMetadata::new(SongMetadata::new("HeyDJ").unwrap());
    c.bench_function("extract_song", |b| {
        b.iter(|| meta.extract::<SongMetadata>().is_some())
    });
}

criterion_group!(benches, bench_create_metadata, bench_extract);
criterion_main!(benches);
