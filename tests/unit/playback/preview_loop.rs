use super::*;
use crate::playback::scheduler::ManualClock;

/// 1x4 strip of 4px cells, each cell a solid distinct color.
fn strip() -> Arc<RgbaImage> {
    Arc::new(RgbaImage::from_fn(16, 4, |x, _| {
        image::Rgba([(x / 4) as u8 * 50, 0, 0, 255])
    }))
}

fn strip_loop(fps: f64) -> PreviewLoop<ManualClock> {
    let cfg = SpriteConfig {
        fps,
        ..SpriteConfig::grid(1, 4)
    };
    PreviewLoop::new(ManualClock::default(), TickInputs::for_sheet(strip(), cfg))
}

fn run_pending<C: Clock>(lp: &mut PreviewLoop<C>) -> TickOutcome {
    let token = lp.pending_tick().expect("a tick should be pending");
    lp.run_tick(token)
}

#[test]
fn paused_loop_schedules_nothing() {
    let lp = strip_loop(10.0);
    assert_eq!(lp.pending_tick(), None);
    assert!(!lp.state().is_playing);
}

#[test]
fn playing_loop_renders_and_reschedules() {
    let mut lp = strip_loop(10.0);
    lp.play();

    lp.clock().set(Duration::from_millis(250));
    let out = run_pending(&mut lp);
    let TickOutcome::Rendered { pick, drawn } = out else {
        panic!("expected a render, got {out:?}");
    };
    assert!(drawn);
    assert_eq!(pick.index, 2);
    assert_eq!(lp.state().counter(), (3, 4));
    assert_eq!(lp.target().unwrap().pixel(0, 0), [100, 0, 0, 255]);
    assert!(lp.pending_tick().is_some());
}

#[test]
fn consumed_token_is_stale() {
    let mut lp = strip_loop(10.0);
    lp.play();
    let token = lp.pending_tick().unwrap();
    assert!(matches!(lp.run_tick(token), TickOutcome::Rendered { .. }));
    assert_eq!(lp.run_tick(token), TickOutcome::Stale);
}

#[test]
fn pause_cancels_pending_tick() {
    let mut lp = strip_loop(10.0);
    lp.play();
    let token = lp.pending_tick().unwrap();
    lp.pause();
    assert_eq!(lp.pending_tick(), None);
    assert_eq!(lp.run_tick(token), TickOutcome::Stale);
}

#[test]
fn config_change_supersedes_old_token() {
    let mut lp = strip_loop(10.0);
    lp.play();
    let old = lp.pending_tick().unwrap();

    let mut cfg = lp.inputs().config.clone();
    cfg.excluded_frames.insert(0);
    lp.set_config(cfg);

    let fresh = lp.pending_tick().unwrap();
    assert_ne!(old, fresh);
    assert_eq!(lp.run_tick(old), TickOutcome::Stale);

    // The next tick sees the new exclusion, not a stale snapshot.
    lp.clock().set(Duration::ZERO);
    let TickOutcome::Rendered { pick, .. } = lp.run_tick(fresh) else {
        panic!("expected a render");
    };
    assert_eq!(pick.index, 1);
    assert_eq!(lp.state().sequence_len, 3);
}

#[test]
fn resume_rederives_position_from_wall_time() {
    let mut lp = strip_loop(10.0);
    lp.play();
    lp.clock().set(Duration::from_millis(100));
    let TickOutcome::Rendered { pick, .. } = run_pending(&mut lp) else {
        panic!("expected a render");
    };
    assert_eq!(pick.position, 1);

    lp.pause();
    lp.clock().set(Duration::from_millis(1200));
    lp.play();

    // 1200ms at 10fps is tick 12 -> position 0; playback does not continue from position 2.
    let TickOutcome::Rendered { pick, .. } = run_pending(&mut lp) else {
        panic!("expected a render");
    };
    assert_eq!(pick.tick, 12);
    assert_eq!(pick.position, 0);
}

#[test]
fn missing_image_idles_and_keeps_polling() {
    let mut lp = PreviewLoop::new(ManualClock::default(), TickInputs::default());
    lp.play();
    assert_eq!(run_pending(&mut lp), TickOutcome::Idle(IdleReason::NoImage));
    assert!(lp.target().is_none());
    assert!(lp.pending_tick().is_some());

    // Delivering a sheet recovers on the next tick.
    let cfg = SpriteConfig::grid(1, 4);
    lp.set_config(cfg);
    lp.set_sheet(Some(strip()));
    assert_eq!(lp.inputs().dims, ImageDimensions { width: 16, height: 4 });
    assert!(matches!(run_pending(&mut lp), TickOutcome::Rendered { .. }));
}

#[test]
fn degenerate_inputs_leave_previous_target() {
    let mut lp = strip_loop(10.0);
    lp.play();
    run_pending(&mut lp);
    let before = lp.target().cloned();
    assert!(before.is_some());

    let mut cfg = lp.inputs().config.clone();
    cfg.fps = 0.0;
    lp.set_config(cfg.clone());
    assert_eq!(run_pending(&mut lp), TickOutcome::Idle(IdleReason::InvalidFps));

    cfg.fps = 10.0;
    cfg.excluded_frames = (0..4).collect();
    lp.set_config(cfg);
    assert_eq!(
        run_pending(&mut lp),
        TickOutcome::Idle(IdleReason::EmptySequence)
    );

    lp.set_dimensions(ImageDimensions::default());
    assert_eq!(run_pending(&mut lp), TickOutcome::Idle(IdleReason::EmptySheet));

    assert_eq!(lp.target().cloned(), before);
}

#[test]
fn teardown_cancels_before_releasing_target() {
    let mut lp = strip_loop(10.0);
    lp.play();
    run_pending(&mut lp);
    let token = lp.pending_tick().unwrap();

    lp.teardown();
    assert_eq!(lp.pending_tick(), None);
    assert!(lp.target().is_none());
    assert_eq!(lp.run_tick(token), TickOutcome::Stale);

    lp.play();
    assert_eq!(lp.pending_tick(), None);
    assert!(!lp.is_playing());
}

#[test]
fn toggle_flips_play_state() {
    let mut lp = strip_loop(10.0);
    lp.toggle();
    assert!(lp.is_playing());
    assert!(lp.state().is_playing);
    lp.toggle();
    assert!(!lp.is_playing());
}

#[test]
fn sequence_is_cached_across_ticks() {
    let mut lp = strip_loop(60.0);
    lp.play();
    for ms in [0u64, 16, 33, 50, 66] {
        lp.clock().set(Duration::from_millis(ms));
        run_pending(&mut lp);
    }
    assert_eq!(lp.cache.misses(), 1);
}

#[test]
fn empty_sequence_resets_counter_position() {
    let mut lp = strip_loop(10.0);
    lp.play();
    lp.clock().set(Duration::from_millis(250));
    run_pending(&mut lp);
    assert_eq!(lp.state().counter(), (3, 4));

    let mut cfg = lp.inputs().config.clone();
    cfg.excluded_frames = (0..4).collect();
    lp.set_config(cfg);
    assert_eq!(
        run_pending(&mut lp),
        TickOutcome::Idle(IdleReason::EmptySequence)
    );
    assert_eq!(lp.state().counter(), (0, 0));
}

#[derive(Clone, Default)]
struct LogBuf(Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for LogBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn unparseable_key_is_resolved_once_per_config() {
    let logs = LogBuf::default();
    let sink = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || sink.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut lp = strip_loop(60.0);
        let mut cfg = lp.inputs().config.clone();
        cfg.transparent = Some("#zz".to_string());
        lp.set_config(cfg);
        lp.play();
        for ms in [0u64, 16, 33, 50, 66] {
            lp.clock().set(Duration::from_millis(ms));
            assert!(matches!(run_pending(&mut lp), TickOutcome::Rendered { .. }));
        }
    });

    let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert_eq!(text.matches("ignoring unparseable key color").count(), 1);
}
