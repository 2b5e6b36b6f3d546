use criterion::{black_box, criterion_group, criterion_main, Criterion};
use incdeps::core::{scan_bytes, ScanOptions};

fn guarded_header(includes: usize, body_lines: usize) -> Vec<u8> {
    let mut src = String::from("#ifndef BENCH_HEADER_H\n#define BENCH_HEADER_H\n\n");
    for i in 0..includes {
        src.push_str(&format!("#include <bench/dep_{}.h>\n", i));
        src.push_str(&format!("#include \"local_{}.h\"\n", i));
    }
    for i in 0..body_lines {
        src.push_str(&format!(
            "inline int bench_fn_{}(int x) {{ return x * {} + 1; }} // helper\n",
            i, i
        ));
    }
    src.push_str("\n#endif // BENCH_HEADER_H\n");
    src.into_bytes()
}

fn benchmark_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("include_scan");

    let small = guarded_header(10, 200);
    let large = guarded_header(50, 20_000);

    let fast = ScanOptions::default();
    let full = ScanOptions {
        final_guard_fast_path: false,
    };

    group.bench_function("small_header_fast_path", |b| {
        b.iter(|| black_box(scan_bytes(black_box(&small), &fast)));
    });
    group.bench_function("small_header_full_scan", |b| {
        b.iter(|| black_box(scan_bytes(black_box(&small), &full)));
    });
    group.bench_function("large_header_fast_path", |b| {
        b.iter(|| black_box(scan_bytes(black_box(&large), &fast)));
    });
    group.bench_function("large_header_full_scan", |b| {
        b.iter(|| black_box(scan_bytes(black_box(&large), &full)));
    });

    group.finish();
}

criterion_group!(benches, benchmark_scan);
criterion_main!(benches);
