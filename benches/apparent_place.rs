use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use almanac::almanac_errors::AlmanacError;
use almanac::apparent::{apparent_place, ecliptic_apparent, Reduction};
use almanac::constants::J2000;
use almanac::earth_orientation::{nutation_iau1980, precession_nutation_matrix};
use almanac::ephemeris::{BodyId, EphemerisProvider, StateVector};
use almanac::time::Instant;

/// Sun and Moon on circular orbits in the J2000 equatorial plane.
struct Circular;

impl EphemerisProvider for Circular {
    fn query_state(
        &self,
        epoch: Instant,
        body: BodyId,
        _center: BodyId,
    ) -> Result<StateVector, AlmanacError> {
        let (radius, period) = match body {
            BodyId::Sun => (1.0, 365.256_363),
            BodyId::Moon => (0.002_570, 27.321_662),
            _ => return Err(AlmanacError::FictitiousBody(body)),
        };
        let n = std::f64::consts::TAU / period;
        let (s, c) = (n * (epoch.jd() - J2000)).sin_cos();
        Ok(StateVector {
            position: Vector3::new(radius * c, radius * s, 0.0),
            velocity: Vector3::new(-radius * n * s, radius * n * c, 0.0),
        })
    }
}

fn random_epochs(rng: &mut StdRng, samples: usize) -> Vec<Instant> {
    (0..samples)
        .map(|_| Instant::tt(rng.random_range(2_415_020.5..2_488_069.5)))
        .collect()
}

/// Full reduction of the Moon: nutation series, deflection, aberration, rotation.
fn bench_apparent_moon(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    c.bench_function("apparent_place/moon_full", |b| {
        b.iter_batched(
            || random_epochs(&mut rng, 1_000),
            |epochs| {
                for epoch in epochs {
                    let place = apparent_place(
                        &Circular,
                        BodyId::Moon,
                        black_box(epoch),
                        Default::default(),
                        Reduction::Full,
                    );
                    black_box(place.ok());
                }
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_ecliptic_sun(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5014);

    c.bench_function("apparent_place/sun_ecliptic", |b| {
        b.iter_batched(
            || random_epochs(&mut rng, 1_000),
            |epochs| {
                for epoch in epochs {
                    let ecliptic = ecliptic_apparent(
                        &Circular,
                        BodyId::Sun,
                        black_box(epoch),
                        Default::default(),
                    );
                    black_box(ecliptic.ok());
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// The IAU 1980 series dominates every reduction.
fn bench_precession_nutation(c: &mut Criterion) {
    c.bench_function("apparent_place/precession_nutation_matrix", |b| {
        b.iter(|| {
            let t = black_box(0.25);
            let (dpsi, deps) = nutation_iau1980(t);
            black_box(precession_nutation_matrix(t, dpsi, deps))
        })
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_apparent_moon, bench_ecliptic_sun, bench_precession_nutation
);
criterion_main!(benches);
