use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use timewarp_core::prelude::*;

const FRAME_MS: f64 = 1_000.0 / 60.0;

fn manual_store() -> (WarpStore, Arc<ManualScheduler>, VirtualClock) {
    let clock = VirtualClock::new(0);
    let scheduler = Arc::new(ManualScheduler::new());
    let store = WarpStore::new(Arc::new(clock.clone()), scheduler.clone());
    (store, scheduler, clock)
}

fn run_to_completion(scheduler: &ManualScheduler, clock: &VirtualClock) -> usize {
    let mut frames = 0;
    while scheduler.pending() > 0 {
        clock.advance_ms(FRAME_MS);
        scheduler.run_frame();
        frames += 1;
        assert!(frames < 100_000, "warp did not terminate");
    }
    frames
}

#[test]
fn full_one_year_warp() {
    let (store, scheduler, clock) = manual_store();
    store.start(100.0, "1y", 0.0);

    let frames = run_to_completion(&scheduler, &clock);
    // ~5 s of ramp then one simulated day per real second.
    assert!(frames > 300 && frames < 30_000, "frames = {frames}");

    let state = store.get_snapshot();
    assert!(state.finished);
    assert!(state.is_warping);
    assert_eq!(state.simulated_elapsed, 31_536_000.0);
    assert!((store.get_simulated_rewards() - 10.0).abs() < 1e-9);
    assert!(!store.has_pending_frame());
}

#[test]
fn finished_session_holds_until_stopped() {
    let (store, scheduler, clock) = manual_store();
    store.start(100.0, "1d", 0.5);
    run_to_completion(&scheduler, &clock);

    let finished = store.view();
    assert!(finished.finished());
    assert_eq!(finished.progress(), 1.0);

    clock.advance_ms(60_000.0);
    assert_eq!(scheduler.run_frame(), 0);
    assert!(store.view().same_state(&finished));

    store.stop();
    let idle = store.view();
    assert!(!idle.is_warping());
    assert!(!idle.finished());
    assert_eq!(idle.target_seconds(), 0);
}

#[test]
fn restart_mid_flight_uses_new_parameters() {
    let (store, scheduler, clock) = manual_store();
    store.start(100.0, "1y", 0.0);
    for _ in 0..400 {
        clock.advance_ms(FRAME_MS);
        scheduler.run_frame();
    }
    let partial = store.get_snapshot().simulated_elapsed;
    assert!(partial > 0.0 && partial < 31_536_000.0);

    store.start(50.0, "1d", 5.0);
    let state = store.get_snapshot();
    let snapshot = state.snapshot.expect("active session");
    assert_eq!(state.simulated_elapsed, 0.0);
    assert_eq!(snapshot.stake_amount, 50.0);
    assert_eq!(snapshot.snapshot_rewards, 5.0);
    assert_eq!(snapshot.target_seconds, 86_400);
    assert_eq!(snapshot.period_key, PeriodKey::Day);
    assert_eq!(scheduler.pending(), 1);

    run_to_completion(&scheduler, &clock);
    let state = store.get_snapshot();
    assert_eq!(state.simulated_elapsed, 86_400.0);
    let expected = 5.0 + project(50.0, 10.0, 86_400.0);
    assert!((store.get_simulated_rewards() - expected).abs() < 1e-12);
}

#[test]
fn double_stop_matches_single_stop() {
    let (store, scheduler, clock) = manual_store();
    store.start(10.0, "6m", 0.0);
    clock.advance_ms(FRAME_MS);
    scheduler.run_frame();

    store.stop();
    let once = (*store.get_snapshot()).clone();
    store.stop();
    assert_eq!(*store.get_snapshot(), once);
    assert_eq!(once, WarpState::IDLE);
}

#[test]
fn configured_rate_drives_rewards() {
    let clock = VirtualClock::new(0);
    let scheduler = Arc::new(ManualScheduler::new());
    let settings = WarpSettings {
        projector: RewardProjector::new(20.0),
        ..WarpSettings::default()
    };
    let store =
        WarpStore::with_settings(Arc::new(clock.clone()), scheduler.clone(), settings, None);
    store.start(100.0, "1y", 1.0);
    run_to_completion(&scheduler, &clock);
    assert!((store.get_simulated_rewards() - 21.0).abs() < 1e-9);
}

/// Clock following tokio's (pausable) time.
#[tokio::test(start_paused = true)]
async fn tokio_scheduler_drives_a_session() {
    let scheduler = Arc::new(TokioFrameScheduler::new(60));
    let clock = Arc::new(SystemClock::new());
    let store = WarpStore::new(clock, scheduler.clone());

    store.start(100.0, "1d", 0.0);
    tokio::time::sleep(Duration::from_secs(10)).await;

    let view = store.view();
    assert!(view.finished());
    assert_eq!(view.simulated_elapsed(), 86_400.0);
    assert_eq!(scheduler.pending(), 0);

    store.stop();
    assert!(!store.view().is_warping());
}

#[tokio::test(start_paused = true)]
async fn tokio_stop_cancels_loop() {
    let scheduler = Arc::new(TokioFrameScheduler::new(60));
    let clock = Arc::new(SystemClock::new());
    let store = WarpStore::new(clock, scheduler.clone());

    store.start(100.0, "1y", 0.0);
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(store.get_snapshot().simulated_elapsed > 0.0);

    store.stop();
    assert_eq!(scheduler.pending(), 0);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(*store.get_snapshot(), WarpState::IDLE);
}

proptest! {
    #[test]
    fn elapsed_is_monotone_and_bounded(
        period in prop::sample::select(PeriodKey::ALL.to_vec()),
        frame_gaps in prop::collection::vec(0.0f64..500.0, 1..400),
    ) {
        let (store, scheduler, clock) = manual_store();
        store.start(100.0, period.key(), 0.0);
        let target = period.seconds() as f64;

        let mut previous = 0.0;
        for gap in frame_gaps {
            clock.advance_ms(gap);
            scheduler.run_frame();
            let elapsed = store.get_snapshot().simulated_elapsed;
            prop_assert!(elapsed >= previous);
            prop_assert!(elapsed <= target);
            previous = elapsed;
        }
    }
}
