mod common;

use almanac::apparent::FixedStar;
use almanac::config::AlmanacParams;
use almanac::constants::RADEG;
use almanac::ephemeris::BodyId;
use almanac::phenomena::rise_set::{event_hours, rise_set, RiseSetEvent};
use almanac::phenomena::{Observer, Target};
use almanac::time::{gmst, julian_day, DeltaT, Instant};
use common::LowPrecision;

const DELTA_T: f64 = 64.0;

fn hours(target: &Target, observer: &Observer, day: Instant, event: RiseSetEvent) -> Option<f64> {
    let outcome = rise_set(
        &LowPrecision,
        target,
        observer,
        day,
        event,
        DeltaT::from_seconds(DELTA_T),
        &AlmanacParams::default(),
    )
    .unwrap();
    event_hours(&outcome, day, DeltaT::from_seconds(DELTA_T))
}

#[test]
fn test_equatorial_star_on_the_equator() {
    // The star culminates at Greenwich around 12h UT1.
    let day = Instant::ut1(2_451_544.5);
    let star = Target::from(FixedStar {
        ra: gmst(day.jd() + 0.5),
        dec: 0.0,
    });
    let observer = Observer::new(0.0, 0.0).unwrap();

    let rise = hours(&star, &observer, day, RiseSetEvent::Rise).unwrap();
    let set = hours(&star, &observer, day, RiseSetEvent::Set).unwrap();

    assert!(rise > 5.9 && rise < 6.1, "rise at {rise} h");
    assert!(set > 17.9 && set < 18.1, "set at {set} h");
    assert!((set - rise - 12.0).abs() < 0.1, "{rise} h / {set} h");
}

#[test]
fn test_sun_on_the_equator() {
    let day = Instant::ut1(julian_day(2000, 1, 1, 0.0).unwrap());
    let sun = Target::Body(BodyId::Sun);
    let observer = Observer::new(0.0, 0.0).unwrap();

    let rise = hours(&sun, &observer, day, RiseSetEvent::Rise).unwrap();
    let set = hours(&sun, &observer, day, RiseSetEvent::Set).unwrap();

    assert!(rise > 5.85 && rise < 6.15, "sunrise at {rise} h");
    assert!(set > 17.95 && set < 18.25, "sunset at {set} h");
    // Refraction and semi-diameter lengthen the day by a few minutes.
    assert!(set - rise > 12.0 && set - rise < 12.25);
}

#[test]
fn test_sunrise_at_mid_latitude() {
    let day = Instant::ut1(julian_day(2000, 6, 21, 0.0).unwrap());
    let sun = Target::Body(BodyId::Sun);
    let north = Observer::from_degrees(50.0, 0.0).unwrap();
    let south = Observer::from_degrees(-50.0, 0.0).unwrap();

    let long_day = hours(&sun, &north, day, RiseSetEvent::Set).unwrap()
        - hours(&sun, &north, day, RiseSetEvent::Rise).unwrap();
    let short_day = hours(&sun, &south, day, RiseSetEvent::Set).unwrap()
        - hours(&sun, &south, day, RiseSetEvent::Rise).unwrap();

    assert!(long_day > 16.0 && long_day < 16.6, "{long_day} h");
    assert!(short_day > 7.8 && short_day < 8.4, "{short_day} h");
}

#[test]
fn test_circumpolar_star_has_no_event() {
    let day = Instant::ut1(2_451_544.5);
    let star = Target::from(FixedStar {
        ra: 1.0,
        dec: 60.0 * RADEG,
    });
    let observer = Observer::from_degrees(70.0, 0.0).unwrap();

    assert_eq!(hours(&star, &observer, day, RiseSetEvent::Rise), None);
    assert_eq!(hours(&star, &observer, day, RiseSetEvent::Set), None);
}

#[test]
fn test_polar_day_and_night() {
    let day = Instant::ut1(julian_day(2000, 6, 21, 0.0).unwrap());
    let sun = Target::Body(BodyId::Sun);

    for latitude in [75.0, -75.0] {
        let observer = Observer::from_degrees(latitude, 20.0).unwrap();
        for event in [RiseSetEvent::Rise, RiseSetEvent::Set] {
            let outcome = rise_set(
                &LowPrecision,
                &sun,
                &observer,
                day,
                event,
                DeltaT::from_seconds(DELTA_T),
                &AlmanacParams::default(),
            )
            .unwrap();
            assert!(outcome.is_no_event(), "{latitude}° {event:?}: {outcome:?}");
        }
    }
}

#[test]
fn test_day_given_in_tt_is_reported_in_ut1() {
    let ut1 = Instant::ut1(2_451_544.5);
    let tt = Instant::tt(ut1.jd() + DELTA_T / 86_400.0);
    let sun = Target::Body(BodyId::Sun);
    let observer = Observer::from_degrees(36.5, -6.2).unwrap();

    let from_ut1 = rise_set(
        &LowPrecision,
        &sun,
        &observer,
        ut1,
        RiseSetEvent::Rise,
        DeltaT::from_seconds(DELTA_T),
        &AlmanacParams::default(),
    )
    .unwrap();
    let from_tt = rise_set(
        &LowPrecision,
        &sun,
        &observer,
        tt,
        RiseSetEvent::Rise,
        DeltaT::from_seconds(DELTA_T),
        &AlmanacParams::default(),
    )
    .unwrap();

    let a = from_ut1.event().unwrap().instant;
    let b = from_tt.event().unwrap().instant;
    assert_eq!(a.scale(), almanac::time::Scale::Ut1);
    assert!((a.jd() - b.jd()).abs() < 1e-6);
}

/// Observer in the bay of Cádiz.
fn cadiz() -> Observer {
    Observer::from_degrees(36.46, -6.2).unwrap()
}

fn moon_hours(k: usize, event: RiseSetEvent) -> Option<f64> {
    let day = Instant::ut1(2_451_544.5 + k as f64);
    hours(&Target::Body(BodyId::Moon), &cadiz(), day, event)
}

#[test]
fn test_moonrise_and_moonset_times() {
    // (day after 2000-01-01, rise [h], set [h])
    for (k, rise, set) in [
        (0, 2.749, 14.037),
        (6, 8.025, 18.230),
        (20, 18.204, 7.719),
        (33, 5.954, 16.125),
    ] {
        let r = moon_hours(k, RiseSetEvent::Rise).unwrap();
        let s = moon_hours(k, RiseSetEvent::Set).unwrap();
        assert!((r - rise).abs() < 0.02, "day {k}: moonrise at {r} h");
        assert!((s - set).abs() < 0.02, "day {k}: moonset at {s} h");
    }
}

#[test]
fn test_moonset_slipping_past_midnight() {
    assert!((moon_hours(11, RiseSetEvent::Set).unwrap() - 23.054).abs() < 0.02);
    // The next set happens at 24.08h: it belongs to the following day.
    assert_eq!(moon_hours(12, RiseSetEvent::Set), None);
    assert!((moon_hours(13, RiseSetEvent::Set).unwrap() - 0.084).abs() < 0.02);
}

#[test]
fn test_moonrise_of_the_previous_evening_is_not_repeated() {
    assert!((moon_hours(25, RiseSetEvent::Rise).unwrap() - 23.629).abs() < 0.02);
    // The crossing bracketed right after midnight is yesterday's rise, refined to −0.37h.
    assert_eq!(moon_hours(26, RiseSetEvent::Rise), None);
    assert!((moon_hours(27, RiseSetEvent::Rise).unwrap() - 0.599).abs() < 0.02);
}

#[test]
fn test_consecutive_moon_days_report_each_event_once() {
    let start = 2_451_544.5;
    for event in [RiseSetEvent::Rise, RiseSetEvent::Set] {
        let mut instants = Vec::new();
        let mut missing = 0;
        for k in 0..60 {
            match moon_hours(k, event) {
                Some(h) => {
                    assert!(h > -0.5 / 60.0 && h < 24.0, "{event:?} day {k}: {h} h");
                    instants.push(start + k as f64 + h / 24.0);
                }
                None => missing += 1,
            }
        }

        // The Moon comes back about 50 min later every day: two days in 60 go without.
        assert_eq!(missing, 2, "{event:?}");
        for (a, b) in instants.iter().zip(instants.iter().skip(1)) {
            let gap = (b - a) * 24.0;
            assert!(gap > 24.0 && gap < 25.5, "{event:?}: {gap} h between events");
        }
    }
}
