//! Benchmarks for the Jalali calendar conversion

use aruco_classroom::calendar::{gregorian_to_jalali, jalali_timestamp};
use chrono::{Datelike, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn benchmark_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("calendar");

    group.bench_function("single_date", |b| {
        b.iter(|| gregorian_to_jalali(black_box(2024), black_box(3), black_box(20)));
    });

    // A full year of consecutive dates
    let dates: Vec<(i32, u32, u32)> = NaiveDate::from_ymd_opt(2024, 1, 1)
        .map(|start| {
            start
                .iter_days()
                .take(366)
                .map(|d| (d.year(), d.month(), d.day()))
                .collect()
        })
        .unwrap_or_default();

    group.bench_function("leap_year_sweep", |b| {
        b.iter(|| {
            for &(y, m, d) in &dates {
                black_box(gregorian_to_jalali(y, m, d));
            }
        });
    });

    let now = NaiveDate::from_ymd_opt(2024, 3, 20)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap_or_default();
    group.bench_function("timestamp_string", |b| {
        b.iter(|| jalali_timestamp(black_box(now)).to_string());
    });

    group.finish();
}

criterion_group!(benches, benchmark_conversion);
criterion_main!(benches);
