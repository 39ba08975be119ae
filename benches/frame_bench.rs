use bytes::BytesMut;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use resource_metadata::payload::song::register_song;
use resource_metadata::payload::SongMetadata;
use resource_metadata::{FrameCodec, MetadataFactory, ResourceMetadata};

fn bench_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("frames");
    let codec = FrameCodec::default();
    let factory = MetadataFactory::new();
    register_song(&factory).unwrap();

    let values: Vec<_> = (0..64)
        .map(|i| ResourceMetadata::new(SongMetadata::new(format!("Track{i}")).unwrap()))
        .collect();

    group.bench_function("encode_64", |b| {
        b.iter_batched(
            BytesMut::new,
            |mut buf| {
                for v in &values {
                    codec.encode_into(v, &mut buf).unwrap();
                }
                buf
            },
            BatchSize::SmallInput,
        )
    });

    let mut encoded = BytesMut::new();
    for v in &values {
        codec.encode_into(v, &mut encoded).unwrap();
    }
    let encoded = encoded.freeze();
    group.bench_function("decode_64", |b| {
        b.iter(|| {
            let out = codec.decode_all(&factory, &mut encoded.clone()).unwrap();
            assert_eq!(out.len(), 64);
        })
    });

    group.finish();
}

criterion_group!(benches, bench_frames);
criterion_main!(benches);
