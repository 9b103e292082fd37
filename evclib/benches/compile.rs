mod common;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use common::{compile_unit, parse_only, src_branchy_functions, src_namespaced_calls};

fn bench_compile(c: &mut Criterion) {
    let medium_src = format!(
        "{}\n{}",
        src_branchy_functions(400),
        src_namespaced_calls(200)
    );

    let mut group = c.benchmark_group("compile_pipeline");
    group.bench_function("parse_only", |b| {
        b.iter(|| parse_only(black_box(&medium_src)))
    });
    group.bench_function("compile_source", |b| {
        b.iter(|| {
            let _ = compile_unit(black_box(&medium_src));
        })
    });
    group.bench_function("compile_and_encode", |b| {
        b.iter(|| compile_unit(black_box(&medium_src)).script.to_bytes())
    });
    group.finish();
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);
