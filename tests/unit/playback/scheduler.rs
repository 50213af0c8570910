use super::*;

fn seq(v: &[u32]) -> FrameSequence {
    FrameSequence::from(v.to_vec())
}

#[test]
fn rejects_non_positive_fps() {
    assert!(Scheduler::new(0.0).is_none());
    assert!(Scheduler::new(-5.0).is_none());
    assert!(Scheduler::new(f64::NAN).is_none());
    assert!(Scheduler::new(f64::INFINITY).is_none());
    assert!(Scheduler::new(0.5).is_some());
}

#[test]
fn ten_fps_holds_each_frame_for_100ms() {
    let s = Scheduler::new(10.0).unwrap();
    let q = seq(&[4, 5, 6]);
    assert_eq!(s.frame_interval_ms(), 100.0);
    assert_eq!(s.pick_at(&q, Duration::from_millis(0)).unwrap().index, 4);
    assert_eq!(s.pick_at(&q, Duration::from_millis(99)).unwrap().index, 4);
    assert_eq!(s.pick_at(&q, Duration::from_millis(100)).unwrap().index, 5);
}

#[test]
fn one_fps_at_2500ms_selects_third_entry() {
    let s = Scheduler::new(1.0).unwrap();
    let q = seq(&[0, 2, 3]);
    let pick = s.pick_at(&q, Duration::from_millis(2500)).unwrap();
    assert_eq!(
        pick,
        FramePick {
            tick: 2,
            position: 2,
            index: 3
        }
    );
    assert_eq!(pick.display_position(), 3);
}

#[test]
fn wraps_after_full_traversal() {
    let s = Scheduler::new(1.0).unwrap();
    let q = seq(&[7, 8]);
    let picks: Vec<u32> = (0..5)
        .map(|i| s.pick_at_ms(&q, f64::from(i) * 1000.0).unwrap().index)
        .collect();
    assert_eq!(picks, vec![7, 8, 7, 8, 7]);
}

#[test]
fn single_frame_sequence_always_selects_it() {
    let s = Scheduler::new(60.0).unwrap();
    let q = seq(&[9]);
    for ms in [0.0, 16.0, 17.0, 12_345.6] {
        assert_eq!(s.pick_at_ms(&q, ms).unwrap().index, 9);
    }
}

#[test]
fn empty_sequence_selects_nothing() {
    let s = Scheduler::new(10.0).unwrap();
    assert_eq!(s.pick_at_ms(&seq(&[]), 1000.0), None);
}

#[test]
fn ticks_are_monotonic_in_time() {
    let s = Scheduler::new(24.0).unwrap();
    let mut last = 0;
    for ms in 0..2000 {
        let t = s.tick_at_ms(f64::from(ms));
        assert!(t >= last);
        assert!(t - last <= 1);
        last = t;
    }
}

#[test]
fn negative_or_nan_time_maps_to_tick_zero() {
    let s = Scheduler::new(10.0).unwrap();
    assert_eq!(s.tick_at_ms(-50.0), 0);
    assert_eq!(s.tick_at_ms(f64::NAN), 0);
}

#[test]
fn manual_clock_advances() {
    let c = ManualClock::new(Duration::from_millis(10));
    c.advance(Duration::from_millis(90));
    assert_eq!(c.now(), Duration::from_millis(100));
    c.set(Duration::from_secs(3));
    assert_eq!((&c).now(), Duration::from_secs(3));
}

#[test]
fn duration_ms_is_exact_for_whole_millis() {
    assert_eq!(duration_ms(Duration::from_millis(100)), 100.0);
    assert_eq!(duration_ms(Duration::from_millis(2500)), 2500.0);
    assert_eq!(duration_ms(Duration::from_micros(1500)), 1.5);
}
