//! Headless replay runner (default binary).
//!
//! Loads settings, then drives a session with a seeded scripted player at a
//! fixed 16ms frame step until the mode finishes, the game fails, or the frame
//! limit is reached. The same arguments always produce the same run.
//!
//! ```text
//! monomino-replay [SETTINGS.toml] [--frames N] [--seed S] [--mode marathon|sprint|ultra]
//! ```

use std::collections::VecDeque;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};

use monomino::core::{GameMode, SimpleRng};
use monomino::engine::{Runner, Settings};
use monomino::input::{Key, KeyBindings};
use monomino::types::{Action, GameEvent};

const FRAME_MS: f64 = 16.0;
const DEFAULT_FRAMES: u64 = 60 * 60 * 5;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ReplayArgs {
    settings: Option<PathBuf>,
    frames: Option<u64>,
    seed: Option<u32>,
    mode: Option<GameMode>,
}

fn parse_args(args: &[String]) -> Result<ReplayArgs> {
    let mut out = ReplayArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--frames" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --frames"))?;
                out.frames = Some(
                    v.parse::<u64>()
                        .map_err(|_| anyhow!("invalid --frames value: {}", v))?,
                );
            }
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --seed"))?;
                out.seed = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("invalid --seed value: {}", v))?,
                );
            }
            "--mode" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --mode"))?;
                out.mode =
                    Some(GameMode::from_str(v).ok_or_else(|| anyhow!("unknown mode: {}", v))?);
            }
            other if other.starts_with("--") => {
                return Err(anyhow!("unknown argument: {}", other));
            }
            path => {
                if out.settings.is_some() {
                    return Err(anyhow!("more than one settings file given: {}", path));
                }
                out.settings = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }
    Ok(out)
}

/// Scripted player: for every piece it taps rotate, taps a direction a few
/// times and hard drops. Each tap is followed by a release frame so that
/// every tap is a fresh press.
struct Autoplay {
    rng: SimpleRng,
    plan: VecDeque<Option<Key>>,
}

impl Autoplay {
    fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed ^ 0x5eed),
            plan: VecDeque::new(),
        }
    }

    fn keys(&mut self, bindings: &KeyBindings) -> Vec<Key> {
        if self.plan.is_empty() {
            self.plan_piece(bindings);
        }
        self.plan.pop_front().flatten().into_iter().collect()
    }

    fn plan_piece(&mut self, bindings: &KeyBindings) {
        let tap = |plan: &mut VecDeque<Option<Key>>, action: Action| {
            plan.push_back(Some(bindings.key_for(action)));
            plan.push_back(None);
        };

        for _ in 0..self.rng.next_range(4) {
            tap(&mut self.plan, Action::RotateCw);
        }
        let shift = self.rng.next_range(9) as i32 - 4;
        let direction = if shift < 0 {
            Action::MoveLeft
        } else {
            Action::MoveRight
        };
        for _ in 0..shift.unsigned_abs() {
            tap(&mut self.plan, direction);
        }
        tap(&mut self.plan, Action::HardDrop);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    if let Some(mode) = args.mode {
        settings.mode = mode;
    }

    let seed = settings.session_config().seed;
    let max_frames = args.frames.unwrap_or(DEFAULT_FRAMES);
    info!(
        "replaying {} with seed {} for up to {} frames",
        settings.mode.as_str(),
        seed,
        max_frames
    );

    let mut runner = Runner::from_settings(&settings).context("resolving key bindings")?;
    let mut player = Autoplay::new(seed);
    let mut locked = 0u64;

    while runner.frames() < max_frames {
        let keys = player.keys(runner.bindings());
        for event in runner.frame(FRAME_MS, &keys) {
            match event {
                GameEvent::PieceLocked { .. } => locked += 1,
                GameEvent::LinesCleared { banner, points, .. } => {
                    debug!("{} +{}", banner.label(), points)
                }
                _ => {}
            }
        }
        if let Some(result) = runner.handoff() {
            println!("result: {:?}", result);
        }
        if runner.session().is_over() {
            break;
        }
    }

    let session = runner.session();
    println!(
        "frames={} pieces={} score={} level={} lines={} failed={}",
        runner.frames(),
        locked,
        session.score(),
        session.level(),
        session.lines_cleared(),
        session.game_failed()
    );
    Ok(())
}
