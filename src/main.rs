use anyhow::{Context, Result};
use clap::Parser;
use crossterm::terminal;
use qix::config::{MAX_SIDE, MIN_SIDE};
use qix::{CliRenderer, Difficulty, Input, InputState, Phase, Renderer, Session, SessionConfig};
use std::path::PathBuf;
use std::time::{Duration, Instant};

// Game logic update rate; step cadences in the config are counted in these ticks
const TICK_RATE: Duration = Duration::from_millis(16);

/// Terminal Qix: draw lines to claim the field, dodge the hazards
#[derive(Parser, Debug)]
#[command(name = "qix-cli")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML file with session settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Field width in cells (default: fit the terminal)
    #[arg(long)]
    width: Option<i32>,

    /// Field height in cells (default: fit the terminal)
    #[arg(long)]
    height: Option<i32>,

    /// normal or hard
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Fraction of the field to claim, in (0, 1]
    #[arg(long)]
    win_threshold: Option<f64>,

    /// Random seed (default: random)
    #[arg(short, long)]
    seed: Option<u64>,
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let (mut config, sized_by_file) = match &args.config {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config = SessionConfig::from_toml_str(&source)
                .with_context(|| format!("loading {}", path.display()))?;
            let sized = source
                .parse::<toml::Table>()
                .map_or(false, |table| table.contains_key("width") || table.contains_key("height"));
            (config, sized)
        }
        None => (SessionConfig::default(), false),
    };

    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(threshold) = args.win_threshold {
        config.win_threshold = threshold;
    }

    if args.width.is_none() && args.height.is_none() && !sized_by_file {
        let (columns, rows) = terminal::size().context("querying terminal size")?;
        let (width, height) = CliRenderer::field_for_terminal(columns, rows);
        config.width = width.clamp(MIN_SIDE, MAX_SIDE);
        config.height = height.clamp(MIN_SIDE, MAX_SIDE);
        log::debug!("sized field to terminal: {}x{}", config.width, config.height);
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let mut session = match args.seed {
        Some(seed) => Session::with_seed(config, seed)?,
        None => Session::new(config)?,
    };

    log::info!(
        "{}x{} field, win at {:.0}%",
        session.config().width,
        session.config().height,
        session.config().win_threshold * 100.0
    );

    let mut renderer = CliRenderer::new();
    renderer.init()?;

    let mut input = InputState::default();
    let mut last_tick = Instant::now();

    loop {
        // Poll for input
        if let Some(event) = renderer.poll_input()? {
            match event {
                Input::Quit => break,
                Input::Direction(direction) => input.direction = Some(direction),
                Input::Stop => input.direction = None,
                Input::ToggleDraw => input.draw = !input.draw,
                Input::Select(difficulty) if session.phase() == Phase::Menu => {
                    input = InputState::default();
                    session.new_round(difficulty);
                }
                Input::Restart => session.restart(),
                Input::Select(_) => {}
            }
        }

        // Update game logic at fixed rate
        if last_tick.elapsed() >= TICK_RATE {
            last_tick = Instant::now();
            let snapshot = session.tick(input);
            // Let renderer decide when to actually render
            renderer.render(&snapshot)?;
        }
    }

    renderer.cleanup()?;
    Ok(())
}
