use criterion::{black_box, criterion_group, criterion_main, Criterion};

use geoscape_logic::geometry::GeoPos;
use geoscape_logic::intercept::{pursuit_destination, PursuitInput};
use geoscape_logic::route::great_circle_route;

fn bench_pursuit(c: &mut Criterion) {
    let input = PursuitInput {
        shooter_pos: GeoPos::new(-30.0, 12.0),
        shooter_speed: 1200,
        target_pos: GeoPos::new(10.0, 40.0),
        target_speed: 500,
        target_destination: Some(GeoPos::new(60.0, 20.0)),
    };
    c.bench_function("pursuit_destination", |b| {
        b.iter(|| pursuit_destination(black_box(&input)))
    });
}

fn bench_route(c: &mut Criterion) {
    c.bench_function("great_circle_route", |b| {
        b.iter(|| {
            great_circle_route(
                black_box(GeoPos::new(-122.0, 37.0)),
                black_box(GeoPos::new(139.0, 35.0)),
            )
        })
    });
}

criterion_group!(benches, bench_pursuit, bench_route);
criterion_main!(benches);
