use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use nightsky::canvas::Canvas;
use nightsky::config::{Config, Variant};
use nightsky::fireworks::Sky;
use std::fs::File;
use std::io::{BufWriter, Stdout, stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Fireworks in the terminal. Space launches a volley; q, Esc or Ctrl+C quits.
#[derive(Parser, Debug)]
#[command(name = "nightsky", version, about, long_about = None)]
struct Args {
    /// YAML config file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Show style
    #[arg(long, value_enum)]
    variant: Option<Variant>,

    /// Background color as hex (e.g. 1a1b26)
    #[arg(long = "bg-color", value_name = "RRGGBB")]
    bg_color: Option<String>,

    /// Render loop frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Seed for a reproducible show
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Launch a new volley whenever the sky goes dark
    #[arg(long)]
    auto: bool,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    // The show owns the terminal, so nothing goes to stderr unless asked.
    let mut builder = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            let mut builder =
                env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            builder
        }
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")),
    };
    builder.init();
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(variant) = args.variant {
        config.variant = variant;
    }
    if let Some(bg) = &args.bg_color {
        config.background = bg.clone();
    }
    if let Some(fps) = args.fps {
        config.fps = fps;
    }
    config.validate()?;
    Ok(config)
}

fn run_show(
    sky: &mut Sky<Canvas>,
    stdout: &mut BufWriter<Stdout>,
    frame_interval: Duration,
    auto: bool,
) -> Result<()> {
    let max_step = frame_interval * 3;
    let mut last_frame = Instant::now();

    loop {
        if event::poll(frame_interval / 2)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char(' ') => sky.launch(),
                    _ => {}
                },
                Event::Resize(cols, rows) => {
                    log::info!("terminal resized to {cols}x{rows}");
                    sky.surface_mut().resize(cols as usize, rows as usize);
                    execute!(stdout, Clear(ClearType::All))?;
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last_frame).min(max_step);
        last_frame = now;

        if auto && sky.is_idle() {
            sky.launch();
        }
        sky.advance(elapsed);
        sky.surface_mut()
            .render(stdout)
            .context("failed to draw to the terminal")?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = load_config(&args)?;
    let background = config.background_rgb()?;
    let frame_interval = config.frame_interval();
    log::info!(
        "starting {:?} show at {} fps, {} px per cell",
        config.variant,
        config.fps,
        config.pixel_scale
    );

    let rng = match args.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let (cols, rows) = terminal::size().context("failed to read terminal size")?;
    let canvas = Canvas::new(cols as usize, rows as usize, config.pixel_scale, background);
    let mut sky = Sky::new(canvas, config.tuning(), frame_interval, rng);

    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout());
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

    let result = run_show(&mut sky, &mut stdout, frame_interval, args.auto);

    execute!(stdout, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    log::info!("show ended after {} frames", sky.frames());

    result
}
