use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use image::RgbaImage;
use sprite_preview::{
    Clock, FrameExtractor, ImageDimensions, MonotonicClock, PreviewLoop, RenderThreading,
    SequenceKey, SpriteConfig, TickInputs, TickOutcome, build_sequence, canvas_for,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "sprite-preview", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print grid geometry and the playable frame sequence.
    Info(SheetArgs),
    /// Render the frame shown at a given time as a PNG.
    Frame(FrameArgs),
    /// Render one PNG per sequence position.
    Frames(FramesArgs),
    /// Encode one full loop as an animated GIF.
    Gif(GifArgs),
    /// Drive the live preview loop against the wall clock.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct SheetArgs {
    /// Sprite sheet image.
    #[arg(long)]
    sheet: PathBuf,

    /// Sprite config JSON.
    #[arg(long)]
    config: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: SheetArgs,

    /// Absolute playback time in milliseconds.
    #[arg(long, default_value_t = 0)]
    time_ms: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    input: SheetArgs,

    /// Output directory; files are named `frame_NNNN.png` by sequence position.
    #[arg(long)]
    out_dir: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct GifArgs {
    #[command(flatten)]
    input: SheetArgs,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    #[command(flatten)]
    input: SheetArgs,

    /// How long to play for.
    #[arg(long, default_value_t = 3.0)]
    seconds: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Gif(args) => cmd_gif(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn load_inputs(args: &SheetArgs) -> anyhow::Result<(RgbaImage, SpriteConfig)> {
    let cfg = SpriteConfig::from_path(&args.config)
        .with_context(|| format!("load config '{}'", args.config.display()))?;
    cfg.validate()?;
    let sheet = sprite_preview::load_sheet(&args.sheet)?;
    Ok((sheet, cfg))
}

fn cmd_info(args: SheetArgs) -> anyhow::Result<()> {
    let (sheet, cfg) = load_inputs(&args)?;
    let dims = ImageDimensions::of(&sheet);
    let extractor = FrameExtractor::new(&cfg, dims).context("sheet has no addressable frames")?;
    let canvas =
        canvas_for(&cfg, dims).map_err(|r| anyhow::anyhow!("cannot size canvas: {r:?}"))?;
    let seq = build_sequence(&SequenceKey::from_config(&cfg));

    let cell = extractor.cell_size();
    let crop = extractor.crop_size();
    println!("sheet:    {}x{}", dims.width, dims.height);
    println!(
        "grid:     {} rows x {} cols ({:?}), {} frames",
        cfg.rows,
        cfg.cols,
        cfg.read_order,
        cfg.total_frames()
    );
    println!("cell:     {}x{}", cell.width, cell.height);
    println!("crop:     {}x{}", crop.width, crop.height);
    println!("canvas:   {}x{} @ {}x", canvas.width, canvas.height, cfg.scale);
    println!("fps:      {}", cfg.fps);
    match cfg.key_color() {
        Some(key) => println!("key:      {} (tolerance {})", key.to_hex(), cfg.tolerance),
        None => println!("key:      none (matte {})", cfg.matte.to_hex()),
    }
    println!("sequence: {:?} ({} frames)", seq.as_slice(), seq.len());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (sheet, cfg) = load_inputs(&args.input)?;
    let dims = ImageDimensions::of(&sheet);
    let (pick, outcome) =
        sprite_preview::render_at(&sheet, dims, &cfg, Duration::from_millis(args.time_ms))
            .map_err(|r| anyhow::anyhow!("nothing to render at {}ms: {r:?}", args.time_ms))?;
    let frame = outcome.into_frame().context("renderer returned no frame")?;

    sprite_preview::write_png(&frame, &args.out)?;
    tracing::info!(
        position = pick.display_position(),
        index = pick.index,
        "rendered frame"
    );
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let (sheet, cfg) = load_inputs(&args.input)?;
    let dims = ImageDimensions::of(&sheet);
    let threading = RenderThreading {
        parallel: true,
        threads: args.threads,
    };
    let (frames, stats) = sprite_preview::render_loop(&sheet, dims, &cfg, &threading)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for f in frames {
        let Some(frame) = f.outcome.into_frame() else {
            continue;
        };
        let path = args.out_dir.join(format!("frame_{:04}.png", f.position));
        sprite_preview::write_png(&frame, &path)?;
    }

    tracing::info!(
        total = stats.frames_total,
        cleared = stats.frames_cleared,
        "rendered loop"
    );
    eprintln!(
        "wrote {} frames to {}",
        stats.frames_total,
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_gif(args: GifArgs) -> anyhow::Result<()> {
    let (sheet, cfg) = load_inputs(&args.input)?;
    let dims = ImageDimensions::of(&sheet);
    let threading = RenderThreading {
        parallel: true,
        threads: None,
    };
    let (frames, _) = sprite_preview::render_loop(&sheet, dims, &cfg, &threading)?;
    let written = sprite_preview::write_gif(
        frames.iter().filter_map(|f| f.outcome.frame()),
        cfg.fps,
        &args.out,
    )?;

    eprintln!("wrote {} ({written} frames)", args.out.display());
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    if !args.seconds.is_finite() || args.seconds < 0.0 {
        anyhow::bail!("--seconds must be finite and >= 0");
    }
    let (sheet, cfg) = load_inputs(&args.input)?;
    let refresh = Duration::from_micros(16_667);
    let until = Duration::from_secs_f64(args.seconds);

    let mut lp = PreviewLoop::new(
        MonotonicClock::new(),
        TickInputs::for_sheet(Arc::new(sheet), cfg),
    );
    lp.play();

    let mut last = None;
    let mut ticks = 0u64;
    while lp.clock().now() < until {
        let started = Instant::now();
        if let Some(token) = lp.pending_tick() {
            ticks += 1;
            if let TickOutcome::Idle(reason) = lp.run_tick(token) {
                tracing::warn!(?reason, "preview idle");
            }
            let counter = lp.state().counter();
            if last != Some(counter) {
                tracing::info!("frame {} / {}", counter.0, counter.1);
                last = Some(counter);
            }
        }
        if let Some(rest) = refresh.checked_sub(started.elapsed()) {
            std::thread::sleep(rest);
        }
    }
    lp.teardown();

    tracing::info!(ticks, "stopped");
    Ok(())
}

