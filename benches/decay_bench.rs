use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use decay_cli::model::Affine;
use decay_cli::pairwise::{Parallelism, estimate_with};
use decay_cli::units::TimeUnit;
use decay_cli::{Sample, analyze, parsing, sample};
use std::hint::black_box;
use std::io::Write as IoWrite;
use tempfile::NamedTempFile;

fn decaying_series(n: usize) -> Vec<Sample> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            let jitter = ((i * 7919) % 13) as f64 * 0.001;
            Sample::new(t, 25.0 * (-0.004 * t).exp() + jitter)
        })
        .collect()
}

fn generate_test_file(n: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "time,height").unwrap();
    for s in decaying_series(n) {
        writeln!(file, "{},{}", s.t, s.v).unwrap();
    }
    file.flush().unwrap();
    file
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    for size in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("read_file", size), &size, |b, &size| {
            let temp_file = generate_test_file(size);
            b.iter(|| {
                let data = parsing::read_file(temp_file.path(), TimeUnit::Seconds).unwrap();
                black_box(data)
            });
        });
    }

    group.finish();
}

fn bench_pairwise(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairwise");

    for size in [100, 500, 2_000] {
        let data = decaying_series(size);
        group.throughput(Throughput::Elements((size * (size - 1) / 2) as u64));

        group.bench_with_input(BenchmarkId::new("sequential", size), &data, |b, data| {
            b.iter(|| black_box(estimate_with(black_box(data), Parallelism::Sequential)));
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &data, |b, data| {
            b.iter(|| black_box(estimate_with(black_box(data), Parallelism::Parallel)));
        });
    }

    group.finish();
}

fn bench_residuals(c: &mut Criterion) {
    let mut group = c.benchmark_group("residuals");
    let line = Affine::new(-0.004, 25.0_f64.ln());

    for size in [1_000, 100_000] {
        let log_series = sample::log_transform(&decaying_series(size));
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(
            BenchmarkId::new("analyze_affine", size),
            &log_series.samples,
            |b, data| {
                b.iter(|| black_box(analyze(black_box(data), &line)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_pairwise, bench_residuals);
criterion_main!(benches);
