use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, instrument, warn};

use timewarp_config::TimeWarpConfig;
use timewarp_core::format::{format_elapsed, format_rewards};
use timewarp_core::prelude::*;
use timewarp_core::projector::CURVE_POINTS;
use timewarp_telemetry::MetricsRecorder;

use crate::error::CommandError;

/// Upper bound on replay frames, well past a one-year warp at any sane frame interval.
const MAX_REPLAY_FRAMES: u64 = 10_000_000;

/// Longest virtual frame a replay accepts, one hour.
const MAX_FRAME_MS: f64 = 3_600_000.0;

#[derive(Parser)]
#[command(name = "timewarp", version, about = "Accelerated staking reward simulation")]
pub struct Cli {
    /// YAML configuration file (defaults to config/timewarp.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a warp session in real time
    Warp(WarpArgs),
    /// Run a deterministic warp session against a virtual clock
    Replay(ReplayArgs),
    /// Static reward projections for every period
    Project(ProjectArgs),
    /// List the available warp periods
    Periods,
}

#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Staked principal
    #[arg(short, long)]
    pub amount: f64,
    /// Period key: 1d, 1w, 1m, 3m, 6m or 1y
    #[arg(short, long, value_parser = parse_period)]
    pub period: PeriodKey,
    /// Pending rewards at session start
    #[arg(short, long, default_value_t = 0.0)]
    pub rewards: f64,
}

#[derive(Args, Debug, Clone)]
pub struct WarpArgs {
    #[command(flatten)]
    pub session: SessionArgs,
    /// How long the finished state stays on screen before returning to reality
    #[arg(long, default_value_t = 3_000)]
    pub linger_ms: u64,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub session: SessionArgs,
    /// Virtual time between frames in milliseconds
    #[arg(long, default_value_t = 1_000.0 / 60.0)]
    pub frame_ms: f64,
    /// Print a progress line every N frames (0 prints only the summary)
    #[arg(long, default_value_t = 600)]
    pub every: u64,
    /// Expected trajectory hash; the command fails on mismatch
    #[arg(long)]
    pub validate_hash: Option<String>,
    /// Write a YAML run report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Staked principal
    #[arg(short, long)]
    pub amount: f64,
    /// Annual rate in percent (defaults to the configured rate)
    #[arg(long)]
    pub rate: Option<f64>,
    /// Also print the accrual curve of this period
    #[arg(long, value_parser = parse_period)]
    pub curve: Option<PeriodKey>,
}

fn parse_period(raw: &str) -> Result<PeriodKey, String> {
    raw.parse::<PeriodKey>().map_err(|e| e.to_string())
}

fn check_session(session: &SessionArgs) -> Result<(), CommandError> {
    if !(session.amount.is_finite() && session.amount > 0.0) {
        return Err(CommandError::InvalidInput(format!(
            "stake amount must be positive, got {}",
            session.amount
        )));
    }
    if !session.rewards.is_finite() || session.rewards < 0.0 {
        return Err(CommandError::InvalidInput(format!(
            "pending rewards must be non-negative, got {}",
            session.rewards
        )));
    }
    Ok(())
}

pub fn load_config(path: Option<&PathBuf>) -> Result<TimeWarpConfig, CommandError> {
    let config = match path {
        Some(path) => TimeWarpConfig::load_from_path(path)?,
        None => TimeWarpConfig::load()?,
    };
    Ok(config)
}

fn hud_line(view: &WarpView) -> String {
    format!(
        "+{:<14} +{} SV  [{:>5.1}%]{}",
        format_elapsed(view.simulated_elapsed()),
        format_rewards(view.simulated_rewards()),
        view.progress() * 100.0,
        if view.finished() { "  Done!" } else { "" }
    )
}

#[instrument(skip_all, fields(period = %args.session.period, amount = args.session.amount))]
pub async fn run_warp(
    args: WarpArgs,
    config: &TimeWarpConfig,
    metrics: Arc<MetricsRecorder>,
) -> Result<(), CommandError> {
    check_session(&args.session)?;

    let scheduler = Arc::new(TokioFrameScheduler::new(config.engine.frame_hz));
    let store = WarpStore::with_settings(
        Arc::new(SystemClock::new()),
        scheduler,
        WarpSettings::from(config),
        Some(metrics),
    );
    let mut reader = store.reader();
    let mut hud = tokio::time::interval(Duration::from_millis(config.telemetry.hud_interval_ms));

    info!("Engaging time warp");
    store.try_start(
        args.session.amount,
        args.session.period.key(),
        args.session.rewards,
    )?;

    // One listener for the whole session so no interrupt is lost between polls.
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    let interrupted = loop {
        tokio::select! {
            _ = hud.tick() => {
                if let Some(view) = reader.poll() {
                    println!("{}", hud_line(&view));
                    if view.finished() {
                        break false;
                    }
                }
            }
            _ = &mut interrupt => break true,
        }
    };

    if interrupted {
        warn!("Interrupted, returning to reality");
    } else {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(args.linger_ms)) => {}
            _ = &mut interrupt => {}
        }
    }

    store.stop();
    info!("Back to reality");
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub generated_at: DateTime<Utc>,
    pub period: PeriodKey,
    pub stake_amount: f64,
    pub snapshot_rewards: f64,
    pub frame_ms: f64,
    pub frames: u64,
    pub simulated_elapsed: f64,
    pub simulated_rewards: f64,
    pub trajectory_hash: String,
    pub final_state: WarpState,
}

/// Runs a session frame by frame on a virtual clock and hashes the trajectory.
#[instrument(skip_all, fields(period = %args.session.period, amount = args.session.amount))]
pub fn run_replay(args: ReplayArgs, config: &TimeWarpConfig) -> Result<ReplayReport, CommandError> {
    check_session(&args.session)?;
    if !(args.frame_ms > 0.0 && args.frame_ms <= MAX_FRAME_MS) {
        return Err(CommandError::InvalidInput(format!(
            "frame interval must be in (0, {MAX_FRAME_MS}] ms, got {}",
            args.frame_ms
        )));
    }

    let clock = VirtualClock::new(0);
    let scheduler = Arc::new(ManualScheduler::new());
    let store = WarpStore::with_settings(
        Arc::new(clock.clone()),
        scheduler.clone(),
        WarpSettings::from(config),
        None,
    );
    let mut reader = store.reader();
    let mut hasher = blake3::Hasher::new();

    store.try_start(
        args.session.amount,
        args.session.period.key(),
        args.session.rewards,
    )?;

    let mut frames = 0u64;
    while scheduler.pending() > 0 {
        if frames >= MAX_REPLAY_FRAMES {
            store.stop();
            return Err(CommandError::FrameLimit(MAX_REPLAY_FRAMES));
        }
        clock.advance_ms(args.frame_ms);
        scheduler.run_frame();
        frames += 1;

        if let Some(view) = reader.poll() {
            hasher.update(&frames.to_le_bytes());
            hasher.update(&view.simulated_elapsed().to_le_bytes());
            if args.every > 0 && (frames % args.every == 0 || view.finished()) {
                println!("frame {:>7}  {}", frames, hud_line(&view));
            }
        }
    }

    let view = store.view();
    let trajectory_hash = hex::encode(hasher.finalize().as_bytes());
    let report = ReplayReport {
        generated_at: Utc::now(),
        period: args.session.period,
        stake_amount: args.session.amount,
        snapshot_rewards: args.session.rewards,
        frame_ms: args.frame_ms,
        frames,
        simulated_elapsed: view.simulated_elapsed(),
        simulated_rewards: view.simulated_rewards(),
        trajectory_hash,
        final_state: (**view.state()).clone(),
    };
    store.stop();

    println!(
        "{} warp finished after {} frames: +{} SV, trajectory {}",
        report.period.full_label(),
        report.frames,
        format_rewards(report.simulated_rewards),
        report.trajectory_hash
    );

    if let Some(path) = &args.report {
        std::fs::write(path, serde_yaml::to_string(&report)?)?;
        info!(path = %path.display(), "Wrote replay report");
    }

    if let Some(expected) = &args.validate_hash {
        if !expected.eq_ignore_ascii_case(&report.trajectory_hash) {
            return Err(CommandError::HashMismatch {
                expected: expected.clone(),
                actual: report.trajectory_hash,
            });
        }
        info!("Trajectory hash validated");
    }

    Ok(report)
}

pub fn run_project(args: ProjectArgs, config: &TimeWarpConfig) -> Result<(), CommandError> {
    if !args.amount.is_finite() || args.amount < 0.0 {
        return Err(CommandError::InvalidInput(format!(
            "stake amount must be non-negative, got {}",
            args.amount
        )));
    }
    let projector =
        RewardProjector::new(args.rate.unwrap_or(config.engine.annual_rate_percent));

    println!(
        "{} staked at {}% APY",
        args.amount, projector.annual_rate_percent
    );
    for (period, rewards) in projector.project_all(args.amount) {
        println!("  {:<3} {:<9} +{}", period.label(), period.full_label(), rewards);
    }

    if let Some(period) = args.curve {
        println!("{} curve:", period.full_label());
        for point in projector.curve(args.amount, period, CURVE_POINTS) {
            println!("  {:<5} rewards {:<12} total {}", point.label, point.rewards, point.total);
        }
    }
    Ok(())
}

pub fn run_periods() {
    for period in PeriodKey::ALL {
        println!(
            "{:<3} {:<3} {:<9} {:>10}s",
            period.key(),
            period.label(),
            period.full_label(),
            period.seconds()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay_args(period: PeriodKey) -> ReplayArgs {
        ReplayArgs {
            session: SessionArgs {
                amount: 100.0,
                period,
                rewards: 0.0,
            },
            frame_ms: 1_000.0 / 60.0,
            every: 0,
            validate_hash: None,
            report: None,
        }
    }

    #[test]
    fn parses_replay_command() {
        let cli = Cli::try_parse_from([
            "timewarp", "replay", "--amount", "100", "--period", "1y", "--every", "0",
        ])
        .unwrap();
        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.session.period, PeriodKey::Year);
                assert_eq!(args.session.rewards, 0.0);
                assert_eq!(args.every, 0);
            }
            _ => panic!("expected replay"),
        }
    }

    #[test]
    fn rejects_unknown_period_at_parse_time() {
        assert!(Cli::try_parse_from(["timewarp", "warp", "-a", "1", "-p", "2y"]).is_err());
    }

    #[test]
    fn replay_is_deterministic() {
        let config = TimeWarpConfig::default();
        let first = run_replay(replay_args(PeriodKey::Week), &config).unwrap();
        let second = run_replay(replay_args(PeriodKey::Week), &config).unwrap();
        assert_eq!(first.trajectory_hash, second.trajectory_hash);
        assert_eq!(first.frames, second.frames);
        assert_eq!(first.simulated_elapsed, 604_800.0);
        assert!(first.final_state.finished);
    }

    #[test]
    fn replay_one_year_reaches_ten_percent() {
        let report = run_replay(replay_args(PeriodKey::Year), &TimeWarpConfig::default()).unwrap();
        assert!((report.simulated_rewards - 10.0).abs() < 1e-9);
    }

    #[test]
    fn replay_hash_mismatch_fails() {
        let mut args = replay_args(PeriodKey::Day);
        args.validate_hash = Some("00".repeat(32));
        assert!(matches!(
            run_replay(args, &TimeWarpConfig::default()),
            Err(CommandError::HashMismatch { .. })
        ));
    }

    #[test]
    fn replay_writes_report() {
        let path = std::env::temp_dir()
            .join(format!("timewarp-report-{}.yaml", std::process::id()));
        let mut args = replay_args(PeriodKey::Day);
        args.report = Some(path.clone());
        let report = run_replay(args, &TimeWarpConfig::default()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(written.contains(&report.trajectory_hash));
        assert!(written.contains("period: 1d"));
    }

    #[test]
    fn rejects_non_positive_stake() {
        let mut args = replay_args(PeriodKey::Day);
        args.session.amount = 0.0;
        assert!(matches!(
            run_replay(args, &TimeWarpConfig::default()),
            Err(CommandError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_zero_frame_interval() {
        let mut args = replay_args(PeriodKey::Day);
        args.frame_ms = 0.0;
        assert!(matches!(
            run_replay(args, &TimeWarpConfig::default()),
            Err(CommandError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_frame_interval_beyond_an_hour() {
        for frame_ms in [MAX_FRAME_MS * 2.0, 1e300, f64::INFINITY, f64::NAN] {
            let mut args = replay_args(PeriodKey::Day);
            args.frame_ms = frame_ms;
            assert!(matches!(
                run_replay(args, &TimeWarpConfig::default()),
                Err(CommandError::InvalidInput(_))
            ));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn warp_runs_a_day_to_completion() {
        let args = WarpArgs {
            session: SessionArgs {
                amount: 100.0,
                period: PeriodKey::Day,
                rewards: 0.0,
            },
            linger_ms: 0,
        };
        let metrics = Arc::new(MetricsRecorder::new().unwrap());

        run_warp(args, &TimeWarpConfig::default(), Arc::clone(&metrics))
            .await
            .unwrap();

        assert_eq!(metrics.sessions_started.get(), 1.0);
        assert_eq!(metrics.sessions_finished.get(), 1.0);
        assert_eq!(metrics.sessions_stopped.get(), 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn warp_rejects_non_positive_stake() {
        let args = WarpArgs {
            session: SessionArgs {
                amount: -1.0,
                period: PeriodKey::Day,
                rewards: 0.0,
            },
            linger_ms: 0,
        };
        let metrics = Arc::new(MetricsRecorder::new().unwrap());
        assert!(matches!(
            run_warp(args, &TimeWarpConfig::default(), metrics).await,
            Err(CommandError::InvalidInput(_))
        ));
    }
}
