use criterion::{black_box, criterion_group, criterion_main, Criterion};
use productseed::{run, MemoryStore, ProductSynthesizer, RunOptionsBuilder};
use tokio::runtime::Runtime;

static BATCH_SIZES: &[usize] = &[10, 250, 2_500];

fn criterion_benchmark(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("Synthesize");

    for &n in BATCH_SIZES {
        group.bench_function(format!("products/{}", n), |b| {
            b.iter(|| {
                let mut synth = ProductSynthesizer::seeded(42);
                black_box(synth.products(n).unwrap())
            })
        });

        group.bench_function(format!("dry_run/{}", n), |b| {
            let options = RunOptionsBuilder::new().num_records(n).seed(42).build();
            b.to_async(&rt).iter(|| async {
                black_box(run(MemoryStore::new(), &options).await.unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
