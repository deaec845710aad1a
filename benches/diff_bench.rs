use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use rawsnap::conf::FailurePolicy;
use rawsnap::extract::diff;
use rawsnap::snapshot::TableSnapshot;
use rawsnap::testutil::{
    MemorySource, make_coordinator, memory_object_store, staff_row, staff_snapshot,
};

const ROW_COUNTS: &[usize] = &[1_000, 10_000, 100_000];

/// New snapshot with every 100th row edited and 1% rows appended.
fn edited(previous: &TableSnapshot) -> TableSnapshot {
    let (header, mut rows) = previous.clone().into_parts();
    let n = rows.len();
    for (i, row) in rows.iter_mut().enumerate() {
        if i % 100 == 0 {
            row[4] = format!("changed{i}@example.com");
        }
    }
    rows.extend((n..n + n / 100).map(staff_row));
    TableSnapshot::new(header, rows)
}

fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");
    for &num_rows in ROW_COUNTS {
        let previous = staff_snapshot(num_rows);
        let new = edited(&previous);

        group.throughput(Throughput::Elements(num_rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", num_rows), &num_rows, |b, _| {
            b.iter(|| diff(black_box(&previous), black_box(&new)))
        });
    }
    group.finish();
}

fn bench_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv");
    for &num_rows in ROW_COUNTS {
        let snapshot = staff_snapshot(num_rows);
        let bytes = snapshot.to_csv().unwrap();

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", num_rows), &num_rows, |b, _| {
            b.iter(|| black_box(&snapshot).to_csv().unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", num_rows), &num_rows, |b, _| {
            b.iter(|| TableSnapshot::from_csv(black_box(&bytes)).unwrap())
        });
    }
    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let source = Arc::new(MemorySource::with_default_tables(10_000));
    let coordinator = make_coordinator(source, memory_object_store(), FailurePolicy::Abort);
    // Bootstrap once so the measured runs take the steady-state path.
    rt.block_on(coordinator.run()).unwrap();

    c.bench_function("run/11_tables_10k_rows", |b| {
        b.to_async(&rt).iter(|| coordinator.run())
    });
}

criterion_group!(benches, bench_diff, bench_csv, bench_run);
criterion_main!(benches);
