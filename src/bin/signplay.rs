use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use signplay::{
    Canvas, Effect, FrameRate, Generation, HandStyle, HttpLandmarkFetcher, LandmarkFetcher,
    LandmarkLayout, NullVideoDelegate, PlaybackState, RenderParams, SequencerConfig,
    SignSequencer, SignplayError, SignplayResult, VideoDelegate, parse_response, render_frame,
};

#[derive(Parser, Debug)]
#[command(name = "signplay", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drive a headless playback run over a translation reply.
    Play(PlayArgs),
    /// Decode a translation reply and print the resolved sign table.
    Parse(ParseArgs),
    /// Render one landmark frame to a draw-op JSON dump.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input translation reply JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Base URL that backend-relative media paths resolve against.
    #[arg(long)]
    base_url: Option<String>,

    /// Landmark animation rate (frames per second).
    #[arg(long, default_value_t = 12)]
    rate: u32,

    /// Dwell after each sign completes or stalls, in milliseconds.
    #[arg(long, default_value_t = 1200)]
    grace_ms: u64,

    /// Refuse remote landmark fetches instead of performing HTTP GETs.
    #[arg(long, default_value_t = false)]
    offline: bool,
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// Input translation reply JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input landmark document JSON (array or structured form).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    index: usize,

    /// Canvas size as WIDTHxHEIGHT.
    #[arg(long, default_value = "640x480")]
    canvas: String,

    /// Hand style: wire or stylized.
    #[arg(long, default_value = "wire")]
    style: String,

    /// Landmark layout: hand or holistic.
    #[arg(long, default_value = "hand")]
    layout: String,

    /// Output draw-op JSON path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Play(args) => cmd_play(args),
        Command::Parse(args) => cmd_parse(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let value = read_json(&args.in_path)?;
    let parsed = parse_response(&value)?;
    for w in &parsed.warnings {
        eprintln!("skipped entry {}: {}", w.index, w.reason);
    }

    let cfg = SequencerConfig {
        rate: FrameRate::new(args.rate)?,
        grace_delay: Duration::from_millis(args.grace_ms),
        base_url: args.base_url,
        ..SequencerConfig::default()
    };
    let mut seq = SignSequencer::new(parsed.signs, cfg);

    let mut fetcher: Box<dyn LandmarkFetcher> = if args.offline {
        Box::new(OfflineFetcher::default())
    } else {
        Box::new(HttpLandmarkFetcher::new(Duration::from_secs(10))?)
    };
    let mut video = NullVideoDelegate::default();

    let mut pending = seq.start(Instant::now());
    loop {
        for effect in pending.drain(..) {
            execute(effect, fetcher.as_mut(), &mut video);
        }
        if matches!(seq.state(), PlaybackState::AllPlayed) {
            break;
        }

        let now = Instant::now();
        let mut next = Vec::new();
        if let Some((token, result)) = fetcher.poll() {
            next.extend(seq.on_landmarks(token, result, now));
        }
        if let Some((token, event)) = video.poll() {
            next.extend(seq.on_video_event(token, event, now));
        }
        next.extend(seq.tick(now));
        if next.is_empty() {
            std::thread::sleep(Duration::from_millis(10));
        }
        pending = next;
    }

    println!("played {} sign(s)", seq.sign_count());
    Ok(())
}

fn execute(effect: Effect, fetcher: &mut dyn LandmarkFetcher, video: &mut NullVideoDelegate) {
    match effect {
        Effect::FetchLandmarks { uri, token, .. } => fetcher.begin_fetch(&uri, token),
        Effect::VideoInitialize { uri, token, .. } => video.initialize(&uri, token),
        Effect::VideoPlay => video.play(),
        Effect::VideoDispose => video.dispose(),
        Effect::Announce { message } => println!("{message}"),
    }
}

fn cmd_parse(args: ParseArgs) -> anyhow::Result<()> {
    let value = read_json(&args.in_path)?;
    let parsed = parse_response(&value)?;
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let body = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read '{}'", args.in_path.display()))?;
    let frames = signplay::decode_landmark_document(&body)?;
    let frame = frames
        .get(args.index)
        .with_context(|| format!("frame {} out of range ({} frames)", args.index, frames.len()))?;

    let mut params = RenderParams::new(parse_canvas(&args.canvas)?, parse_layout(&args.layout)?);
    params.style = parse_style(&args.style)?;

    let ops = render_frame(frame, &params);

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let file = std::fs::File::create(&args.out)
        .with_context(|| format!("create '{}'", args.out.display()))?;
    serde_json::to_writer_pretty(file, &ops)?;

    eprintln!("wrote {} ops to {}", ops.len(), args.out.display());
    Ok(())
}

fn read_json(path: &PathBuf) -> anyhow::Result<serde_json::Value> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse '{}' as JSON", path.display()))
}

fn parse_canvas(s: &str) -> anyhow::Result<Canvas> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .with_context(|| format!("canvas '{s}' is not WIDTHxHEIGHT"))?;
    Ok(Canvas {
        width: w.trim().parse()?,
        height: h.trim().parse()?,
    })
}

fn parse_style(s: &str) -> anyhow::Result<HandStyle> {
    match s {
        "wire" => Ok(HandStyle::Wire),
        "stylized" => Ok(HandStyle::Stylized),
        other => anyhow::bail!("unknown style '{other}' (expected wire or stylized)"),
    }
}

fn parse_layout(s: &str) -> anyhow::Result<LandmarkLayout> {
    match s {
        "hand" => Ok(LandmarkLayout::hand_only()),
        "holistic" => Ok(LandmarkLayout::holistic_upper_body()),
        other => anyhow::bail!("unknown layout '{other}' (expected hand or holistic)"),
    }
}

/// Fetcher for `--offline` runs: every request completes with a refusal so
/// remote signs stall and the sequence advances.
#[derive(Default)]
struct OfflineFetcher {
    pending: Vec<Generation>,
}

impl LandmarkFetcher for OfflineFetcher {
    fn begin_fetch(&mut self, _uri: &str, token: Generation) {
        self.pending.push(token);
    }

    fn poll(&mut self) -> Option<(Generation, SignplayResult<Vec<signplay::Frame>>)> {
        let token = self.pending.pop()?;
        Some((token, Err(SignplayError::fetch("offline mode"))))
    }
}
