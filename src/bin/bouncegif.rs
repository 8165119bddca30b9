use std::path::PathBuf;

use anyhow::Context as _;
use bouncegif::{
    AutoFetcher, HeadlessHost, Hotkey, HostClock, OverlayConfig, ScriptedSignal, Size,
};
use clap::{Parser, ValueEnum};

/// Bounce an animated image around the screen until the exit hotkey is pressed.
///
/// This build drives the overlay with the in-process headless host: timers run on the
/// wall clock (or a virtual one) and the exit hotkey is pressed after `--run-for-ms`.
#[derive(Parser, Debug)]
#[command(name = "bouncegif", version)]
struct Cli {
    /// Image path or http(s) URL. Overrides the config file.
    #[arg(long)]
    source: Option<String>,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Screen size the sprite bounces within.
    #[arg(long, default_value = "1920x1080")]
    screen: String,

    /// Press the exit hotkey after this many milliseconds (0 = never).
    #[arg(long, default_value_t = 10_000)]
    run_for_ms: u64,

    /// Time source for the event loop.
    #[arg(long, value_enum, default_value_t = ClockChoice::Realtime)]
    clock: ClockChoice,

    /// Write the last presented frame to this PNG on exit.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log: tracing::Level,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ClockChoice {
    Realtime,
    Virtual,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => OverlayConfig::from_path(path)?,
        None => OverlayConfig::default(),
    };
    if let Some(source) = cli.source {
        config.source = source;
    }
    let hotkey: Hotkey = config.exit_hotkey()?;
    let screen = Size::parse(&cli.screen)?;

    let clock = match cli.clock {
        ClockChoice::Realtime => HostClock::Realtime,
        // Nothing would ever end a virtual run: timers re-arm forever without waiting.
        ClockChoice::Virtual if cli.run_for_ms == 0 => {
            anyhow::bail!("--clock virtual needs a non-zero --run-for-ms")
        }
        ClockChoice::Virtual => HostClock::Virtual,
    };
    let mut host = HeadlessHost::new(screen, clock);
    host.capture_frames(cli.snapshot.is_some());
    if cli.run_for_ms > 0 {
        host.schedule(
            std::time::Duration::from_millis(cli.run_for_ms),
            ScriptedSignal::PressHotkey(hotkey),
        );
    }

    let mut fetcher = AutoFetcher::new()?;
    let result = bouncegif::run(&mut host, &mut fetcher, &config);

    for (title, message) in host.notifications() {
        eprintln!("{title}: {message}");
    }
    let reason = result?;

    if let Some(out) = &cli.snapshot {
        let frame = host
            .headless_surface()
            .last_frame()
            .context("no frame was presented")?;
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        frame
            .save_with_format(out, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", out.display()))?;
        eprintln!("wrote {}", out.display());
    }

    let s = host.headless_surface();
    eprintln!(
        "exited ({reason:?}) after {:?}: {} frames presented, last position {:?}",
        host.now(),
        s.accepted(),
        s.last_position()
    );
    Ok(())
}
