//! Aggregation and result cache benchmarks.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vaxboard_core::aggregate::{self, Dimension};
use vaxboard_core::query::{CacheKey, ResultCache};
use vaxboard_core::{ApplicationRecord, Table};

const SEED: u64 = 42;

const VACCINES: [&str; 6] = ["BCG", "Penta", "Influenza", "Covid-19", "Febre Amarela", "Hepatite B"];
const DOSES: [&str; 5] = ["1ª Dose", "2ª Dose", "3ª Dose", "Reforço", "Dose"];
const MUNICIPALITIES: [&str; 4] = ["Recife", "Olinda", "Jaboatão", "Paulista"];

/// Generate `count` records with a fixed seed.
fn generate_records(count: usize) -> Vec<ApplicationRecord> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let Some(first_day) = NaiveDate::from_ymd_opt(2024, 1, 1) else {
        return Vec::new();
    };

    (0..count)
        .map(|i| {
            let mut r = ApplicationRecord::new(format!("a{}", i));
            r.patient_id = Some(format!("p{}", rng.gen_range(0..count / 3 + 1)));
            r.applied_on = first_day.checked_add_days(chrono::Days::new(rng.gen_range(0..90)));
            r.vaccine_name = Some(VACCINES[rng.gen_range(0..VACCINES.len())].to_string());
            r.dose = Some(DOSES[rng.gen_range(0..DOSES.len())].to_string());
            r.establishment_municipality =
                Some(MUNICIPALITIES[rng.gen_range(0..MUNICIPALITIES.len())].to_string());
            r.sex = Some(if rng.gen_bool(0.5) { "F" } else { "M" }.to_string());
            // One in ten records has no age.
            r.age = (!rng.gen_ratio(1, 10)).then(|| rng.gen_range(0..100));
            r
        })
        .collect()
}

fn bench_aggregations(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for count in [1_000, 10_000] {
        let records = generate_records(count);

        group.bench_with_input(BenchmarkId::new("top_n", count), &records, |b, records| {
            b.iter(|| black_box(aggregate::top_n(records, Dimension::VaccineName, 10)));
        });

        group.bench_with_input(BenchmarkId::new("age_pyramid", count), &records, |b, records| {
            b.iter(|| black_box(aggregate::age_pyramid(records)));
        });

        group.bench_with_input(BenchmarkId::new("time_series", count), &records, |b, records| {
            b.iter(|| black_box(aggregate::time_series(records, Dimension::Dose)));
        });

        group.bench_with_input(BenchmarkId::new("group_summary", count), &records, |b, records| {
            b.iter(|| black_box(aggregate::group_summary(records, Dimension::EstablishmentMunicipality)));
        });

        group.bench_with_input(BenchmarkId::new("kpis", count), &records, |b, records| {
            b.iter(|| black_box(aggregate::kpis(records)));
        });
    }

    group.finish();
}

fn bench_cache_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache");
    let cache = Arc::new(ResultCache::new(256));
    let params = vec!["2024-01-01".to_string(), "2024-01-31".to_string()];
    let key = CacheKey::new("SELECT * FROM AplicacaoDose WHERE data_vacina BETWEEN ? AND ?", &params);
    let ttl = Duration::from_secs(300);

    let _ = cache.get_or_fetch(&key, ttl, || Ok(Table::new(["application_id"])));

    group.bench_function("hit", |b| {
        b.iter(|| black_box(cache.get_or_fetch(&key, ttl, || Ok(Table::default()))));
    });

    group.bench_function("fingerprint", |b| {
        b.iter(|| black_box(key.fingerprint()));
    });

    group.finish();
}

criterion_group!(benches, bench_aggregations, bench_cache_hit);
criterion_main!(benches);
