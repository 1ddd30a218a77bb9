//! Property tests for the distance mapping and frame rate

use hand_volume_control::{
    mapping::{interp, ControlMapper},
    rate::RateMonitor,
};
use proptest::prelude::*;

#[test]
fn test_reference_points() {
    let mapper = ControlMapper::default();

    for d in [0.0, 25.0, 50.0] {
        assert_eq!(mapper.map_to_percent(d), 0.0);
        assert_eq!(mapper.map_to_bar_height(d), 400.0);
    }
    for d in [270.0, 300.0, 1e9] {
        assert_eq!(mapper.map_to_percent(d), 100.0);
        assert_eq!(mapper.map_to_bar_height(d), 150.0);
    }

    assert!((mapper.map_to_percent(160.0) - 50.0).abs() < 1e-9);
    assert!((mapper.map_to_bar_height(160.0) - 275.0).abs() < 1e-9);
}

#[test]
fn test_nan_maps_to_low_end() {
    let mapper = ControlMapper::default();
    assert_eq!(mapper.map_to_percent(f64::NAN), 0.0);
    assert_eq!(mapper.map_to_bar_height(f64::NAN), 400.0);
}

#[test]
fn test_fps_half_second() {
    let mut monitor = RateMonitor::new();
    assert_eq!(monitor.tick(0.0), None);
    assert_eq!(monitor.tick(0.5), Some(2.0));
}

proptest! {
    #[test]
    fn percent_within_range(d in -1e6f64..1e6) {
        let percent = ControlMapper::default().map_to_percent(d);
        prop_assert!((0.0..=100.0).contains(&percent));
    }

    #[test]
    fn bar_within_range(d in -1e6f64..1e6) {
        let bar = ControlMapper::default().map_to_bar_height(d);
        prop_assert!((150.0..=400.0).contains(&bar));
    }

    #[test]
    fn percent_monotonic(a in 50.0f64..270.0, b in 50.0f64..270.0) {
        let mapper = ControlMapper::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(mapper.map_to_percent(lo) <= mapper.map_to_percent(hi));
        prop_assert!(mapper.map_to_bar_height(lo) >= mapper.map_to_bar_height(hi));
    }

    #[test]
    fn percent_and_bar_agree(d in 0.0f64..400.0) {
        // Both outputs come from the same position within the domain
        let mapper = ControlMapper::default();
        let percent = mapper.map_to_percent(d);
        let bar = mapper.map_to_bar_height(d);
        prop_assert!((bar - (400.0 - percent * 2.5)).abs() < 1e-6);
    }

    #[test]
    fn interp_hits_endpoints(lo in -100.0f64..100.0, width in 1.0f64..500.0) {
        let hi = lo + width;
        prop_assert_eq!(interp(lo, (lo, hi), (3.0, 7.0)), 3.0);
        prop_assert_eq!(interp(hi, (lo, hi), (3.0, 7.0)), 7.0);
    }

    #[test]
    fn fps_is_reciprocal(start in 0.0f64..1e9, dt in 1e-3f64..10.0) {
        let mut monitor = RateMonitor::new();
        monitor.tick(start);
        let fps = monitor.tick(start + dt).unwrap();
        prop_assert!((fps - 1.0 / ((start + dt) - start)).abs() < 1e-9 * fps.max(1.0));
    }
}
