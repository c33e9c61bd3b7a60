use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pcd_core::pointcloud::{
    codec::PointCodec,
    header::PointCloudHeader,
    point::RawPointRecord,
};

fn bench_codec(c: &mut Criterion) {
    let header = PointCloudHeader::new([0.001; 3], [512_000.0, 4_123_000.0, 10.0]).unwrap();
    let codec = PointCodec::new(header);
    let records: Vec<RawPointRecord> = (0..1_000_000)
        .map(|i| RawPointRecord::new([i, i * 2, -i], [i as u16; 3]))
        .collect();
    let decoded = codec.decode_points(&records);

    c.bench_function("decode 1M points", |b| {
        b.iter(|| codec.decode_points(black_box(&records)))
    });
    c.bench_function("encode 1M points", |b| {
        b.iter(|| codec.encode_points(black_box(&decoded)).unwrap())
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
