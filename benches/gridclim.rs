use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gridclim::{lookup, resolve, GridConfig, Record};

fn synthetic_day(config: &GridConfig, date: NaiveDate) -> Vec<Record> {
    let mut records = Vec::new();
    let lat_steps = ((config.lat_max - config.lat_min) / config.resolution) as usize;
    let lon_steps = ((config.lon_max - config.lon_min) / config.resolution) as usize;
    for i in 0..=lat_steps {
        for j in 0..=lon_steps {
            records.push(Record {
                date,
                lat: Some(config.lat_min + i as f64 * config.resolution),
                lon: Some(config.lon_min + j as f64 * config.resolution),
                value: Some(((i * j) % 50) as f64),
                state: None,
                district: None,
                tehsil: None,
            });
        }
    }
    records
}

fn bench_gridclim(c: &mut Criterion) {
    let config = GridConfig::new(0.25, 6.5, 38.5, 66.5, 100.0).unwrap();
    let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let records = synthetic_day(&config, date);

    c.bench_function("resolve_off_grid", |b| {
        b.iter(|| resolve(&config, black_box(19.51), black_box(80.26)))
    });

    let coord = resolve(&config, 19.51, 80.26).unwrap();
    c.bench_function("lookup_full_grid_day", |b| {
        b.iter(|| lookup(black_box(&records), &coord, date))
    });
}

criterion_group!(benches, bench_gridclim);
criterion_main!(benches);
