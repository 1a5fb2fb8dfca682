use criterion::{Criterion, criterion_group, criterion_main};
use rotolog::{Level, Logger, RotatingFileWriter};
use std::hint::black_box;
use tempfile::TempDir;

const LINE: &[u8] = b"{\"level\":\"info\",\"message\":\"benchmark log message\",\"name\":\"bench\"}\n";

fn bench_rotating_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("RotatingFileWriter::write_bytes");

    let tmp = TempDir::new().expect("failed to create temp dir");
    let plain = RotatingFileWriter::new(tmp.path().join("plain.log"), 0, 1)
        .expect("failed to open writer");
    group.bench_function("no_rotation", |b| {
        b.iter(|| plain.write_bytes(black_box(LINE)).expect("write failed"));
    });

    let rotating = RotatingFileWriter::new(tmp.path().join("rotating.log"), 64 * 1024, 3)
        .expect("failed to open writer");
    group.bench_function("rotate_every_64k", |b| {
        b.iter(|| rotating.write_bytes(black_box(LINE)).expect("write failed"));
    });

    group.finish();
}

fn bench_logger_to_file(c: &mut Criterion) {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let writer = RotatingFileWriter::new(tmp.path().join("logger.log"), 1024 * 1024, 2)
        .expect("failed to open writer");
    let logger = Logger::builder()
        .name("bench")
        .level(Level::Info)
        .output(writer)
        .build();

    c.bench_function("Logger::info -> RotatingFileWriter", |b| {
        b.iter(|| logger.info(black_box("benchmark log message")).expect("log failed"));
    });

    logger.flush().expect("flush failed");
}

criterion_group!(benches, bench_rotating_write, bench_logger_to_file);
criterion_main!(benches);
