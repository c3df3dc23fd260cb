use fingermatch::lowlevel::{build_profiles, pair_count, score_profiles, segment_angle_deg};
use fingermatch::{Point, PointKey, Tolerance, TupleProfile};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

fn random_cloud(seed: u64, n: usize) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let p = Point::new(rng.random_range(0..400), rng.random_range(0..400));
        if seen.insert(p) {
            out.push(p);
        }
    }
    out
}

#[test]
fn every_profile_has_pair_count_slots() {
    let cloud = random_cloud(7, 30);
    for k in 2..=7 {
        let profiles = build_profiles(&cloud, &cloud, k);
        assert_eq!(profiles.len(), cloud.len());
        for (_, profile) in profiles.iter() {
            assert_eq!(profile.ratios().len(), pair_count(k));
            assert_eq!(profile.angles().len(), pair_count(k));
        }
    }
}

#[test]
fn ratios_and_angles_stay_in_range() {
    let cloud = random_cloud(11, 40);
    let profiles = build_profiles(&cloud, &cloud, 5);
    for (_, profile) in profiles.iter() {
        for &ratio in profile.ratios() {
            assert!((0.0..=1.0).contains(&ratio), "ratio {ratio}");
        }
        for &angle in profile.angles() {
            assert!((0.0..=180.0).contains(&angle), "angle {angle}");
        }
    }
}

#[test]
fn segment_angle_is_symmetric() {
    let cloud = random_cloud(3, 12);
    for &origin in &cloud {
        for &a in &cloud {
            for &b in &cloud {
                if a == origin || b == origin {
                    continue;
                }
                let ab = segment_angle_deg(origin, a, b);
                let ba = segment_angle_deg(origin, b, a);
                assert_eq!(ab, ba);
                assert!((0.0..=180.0).contains(&ab));
            }
        }
    }
}

#[test]
fn small_clouds_shrink_profiles() {
    let cloud = [
        Point::new(0, 0),
        Point::new(10, 0),
        Point::new(0, 10),
        Point::new(7, 7),
    ];
    let profiles = build_profiles(&cloud, &cloud, 7);
    for (_, profile) in profiles.iter() {
        assert_eq!(profile.slot_count(), pair_count(3));
    }

    let lonely = [Point::new(5, 5)];
    let profiles = build_profiles(&lonely, &lonely, 3);
    assert_eq!(profiles.get(&PointKey::new(5, 5)).unwrap().slot_count(), 0);
}

#[test]
fn profiles_ignore_translation() {
    let cloud = random_cloud(21, 25);
    let shifted: Vec<Point> = cloud
        .iter()
        .map(|p| Point::new(p.x + 37, p.y - 120))
        .collect();
    let a = build_profiles(&cloud, &cloud, 4);
    let b = build_profiles(&shifted, &shifted, 4);
    for ((_, pa), (_, pb)) in a.iter().zip(b.iter()) {
        assert_eq!(pa, pb);
    }
}

#[test]
fn profile_scores_full_against_itself() {
    let cloud = random_cloud(5, 20);
    let profiles = build_profiles(&cloud, &cloud, 6);
    for (_, profile) in profiles.iter() {
        let copy = profile.clone();
        assert_eq!(
            score_profiles(profile, &copy, Tolerance::new(0.0, 0.0)),
            profile.slot_count()
        );
    }
}

#[test]
fn looser_tolerance_never_lowers_separated_scores() {
    // slots far apart from each other, each perturbed by a different amount
    let base = TupleProfile::new(
        vec![0.10, 0.45, 0.80, 0.25, 0.60, 0.95],
        vec![10.0, 50.0, 90.0, 130.0, 170.0, 30.0],
    )
    .unwrap();
    let test = TupleProfile::new(
        vec![0.11, 0.43, 0.85, 0.25, 0.52, 0.99],
        vec![10.5, 51.0, 88.0, 130.0, 173.0, 30.25],
    )
    .unwrap();

    let steps = [0.0, 0.02, 0.05, 0.1, 0.2];
    let mut previous = 0;
    for &ratio in &steps {
        for &angle in &[0.0, 1.0, 2.5, 5.0] {
            let score = score_profiles(&test, &base, Tolerance::new(ratio, angle));
            assert!(score <= 6);
            let looser = score_profiles(&test, &base, Tolerance::new(ratio + 0.05, angle + 1.0));
            assert!(looser >= score, "ratio {ratio} angle {angle}");
        }
        let at_step = score_profiles(&test, &base, Tolerance::new(ratio, 5.0));
        assert!(at_step >= previous);
        previous = at_step;
    }
    assert_eq!(previous, 6);
}
