use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use silhouette_select::{Dataset, FeatureSubset, Gas, Sfs, SilhouetteFitness};

fn blobs(instances: usize, features: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(42);
    let rows = (0..instances)
        .map(|i| {
            let centre = f64::from(u8::try_from(i % 3).unwrap_or(0)) * 5.0;
            (0..features)
                .map(|feature| {
                    if feature < 2 {
                        centre + rng.gen_range(0.0..1.0)
                    } else {
                        rng.gen_range(0.0..15.0)
                    }
                })
                .collect()
        })
        .collect();
    Dataset::from_rows("blobs", rows, 3).expect("valid dataset")
}

fn fit_and_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans-silhouette");
    for &instances in &[150_usize, 600_usize] {
        let data = blobs(instances, 8);
        let kmeans = data.kmeans().expect("valid engine");
        let subset = FeatureSubset::full(8);
        group.bench_function(BenchmarkId::from_parameter(instances), |b| {
            b.iter_batched(
                || StdRng::seed_from_u64(7),
                |mut rng| {
                    let clustering = kmeans.fit(&subset, &mut rng).expect("fit to succeed");
                    kmeans
                        .silhouette(&subset, &clustering)
                        .expect("silhouette to succeed")
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn searches(c: &mut Criterion) {
    let data = blobs(150, 8);
    let mut group = c.benchmark_group("selection");
    group.sample_size(10);
    group.bench_function("sfs", |b| {
        b.iter(|| {
            let fitness = SilhouetteFitness::from_dataset(&data).expect("valid engine");
            Sfs::new(fitness)
                .run(&mut StdRng::seed_from_u64(1))
                .expect("search to succeed")
        });
    });
    group.bench_function("gas", |b| {
        b.iter(|| {
            let fitness = SilhouetteFitness::from_dataset(&data).expect("valid engine");
            Gas::builder(fitness)
                .build()
                .expect("valid GA configuration")
                .run_seeded(1)
                .expect("search to succeed")
        });
    });
    group.finish();
}

criterion_group!(benches, fit_and_score, searches);
criterion_main!(benches);
