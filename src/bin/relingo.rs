use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use relingo::audio::buffer::ChannelSelect;
use relingo::audio::decode::extract_transcription_audio;
use relingo::render::text::{BlockShaper, FontShaper, TextShaper};
use relingo::{
    CaptionStore, CaptionStyle, FfmpegRuntime, FrameCompositor, MediaRuntime, OriginalAudio,
    OutputFormat, RenderOpts, RenderRequest, Renderer, ResourceTracker, SubstituteAudio,
};

#[derive(Parser, Debug)]
#[command(name = "relingo", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Burn captions into a video (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Composite a single captioned frame as a PNG.
    Frame(FrameArgs),
    /// Convert captions between JSON and SubRip.
    Srt(SrtArgs),
    /// Extract the 16 kHz mono WAV used for transcription.
    ExtractAudio(ExtractAudioArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Source video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Captions (`.json` list or `.srt`).
    #[arg(long)]
    captions: PathBuf,

    /// Output directory; the file name gets a timestamp suffix.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Output file stem.
    #[arg(long, default_value = "captioned")]
    stem: String,

    /// Caption style JSON (`{"textColor": .., "backgroundColor": .., "fontScale": ..}`).
    #[arg(long)]
    style: Option<PathBuf>,

    /// Narration WAV replacing the original audio.
    #[arg(long)]
    narration: Option<PathBuf>,

    /// Font file for caption text.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output frame rate (`30`, `30000/1001`); defaults to the source rate.
    #[arg(long)]
    fps: Option<String>,

    /// Only consider this output format (`vp9`, `vp8`, `webm`, `mp4` or a MIME type).
    #[arg(long)]
    format: Option<OutputFormat>,

    /// What to do with the source audio when there is no narration (`passthrough`, `drop`).
    #[arg(long)]
    original_audio: Option<OriginalAudio>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Source video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Captions (`.json` list or `.srt`).
    #[arg(long)]
    captions: PathBuf,

    /// Playback time in seconds.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Caption style JSON.
    #[arg(long)]
    style: Option<PathBuf>,

    /// Font file for caption text.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SrtArgs {
    /// Input captions (`.json` or `.srt`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path; `.srt` writes SubRip, anything else JSON. Prints SubRip when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ExtractAudioArgs {
    /// Source video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output WAV path.
    #[arg(long)]
    out: PathBuf,

    /// Channel used for the mono track (`first`, `average` or an index).
    #[arg(long)]
    channel: Option<ChannelSelect>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("relingo=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args).await,
        Command::Frame(args) => cmd_frame(args).await,
        Command::Srt(args) => cmd_srt(args),
        Command::ExtractAudio(args) => cmd_extract_audio(args),
    }
}

fn is_srt(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("srt"))
}

fn load_captions(path: &Path) -> anyhow::Result<CaptionStore> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read captions '{}'", path.display()))?;
    let store = if is_srt(path) {
        relingo::parse_srt(&text)
    } else {
        CaptionStore::from_json_str(&text)
    };
    store.with_context(|| format!("parse captions '{}'", path.display()))
}

fn load_style(path: Option<&Path>) -> anyhow::Result<CaptionStyle> {
    let Some(path) = path else {
        return Ok(CaptionStyle::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read style '{}'", path.display()))?;
    CaptionStyle::from_json_str(&json).with_context(|| format!("parse style '{}'", path.display()))
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut opts = RenderOpts::from_env()?;
    if let Some(fps) = &args.fps {
        opts.fps = Some(relingo::Fps::parse(fps)?);
    }
    if let Some(font) = args.font {
        opts.font_path = Some(font);
    }
    if let Some(format) = args.format {
        opts.formats = vec![format];
    }
    if let Some(policy) = args.original_audio {
        opts.original_audio = policy;
    }

    let mut req = RenderRequest::new(&args.in_path, load_captions(&args.captions)?)
        .with_style(load_style(args.style.as_deref())?);
    if let Some(path) = &args.narration {
        let wav = std::fs::read(path)
            .with_context(|| format!("read narration '{}'", path.display()))?;
        req = req.with_substitute(SubstituteAudio::Wav(wav));
    }

    let renderer = Renderer::new(Arc::new(FfmpegRuntime::new()), opts);
    let mut next_report = 0.0;
    let out = renderer
        .render(req, |p| {
            if p >= next_report {
                tracing::info!(progress = format!("{:.0}%", p * 100.0), "rendering");
                next_report = p + 0.1;
            }
        })
        .await
        .with_context(|| format!("render '{}'", args.in_path.display()))?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    let path = out.blob.write_to(&args.out_dir, &args.stem)?;
    eprintln!(
        "wrote {} ({} frames, audio: {:?})",
        path.display(),
        out.frames,
        out.audio_origin
    );
    Ok(())
}

async fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let captions = load_captions(&args.captions)?;
    let style = load_style(args.style.as_deref())?;
    let runtime = FfmpegRuntime::new().with_audio_capture(false);
    let mut source = runtime.open_video(&args.in_path, None).await?;
    let canvas = source.info().canvas;

    let shaper: Box<dyn TextShaper> = match &args.font {
        Some(path) => Box::new(FontShaper::from_path(path)?),
        None => Box::new(BlockShaper),
    };
    let tracker = ResourceTracker::new();
    let mut compositor = FrameCompositor::new(canvas, style, shaper, &tracker)?;

    let half_frame = source.fps().frame_duration_secs() / 2.0;
    let mut picked = None;
    while let Some(frame) = source.next_frame().await? {
        let reached = frame.time + half_frame >= args.time;
        picked = Some(frame);
        if reached {
            break;
        }
    }
    let frame = picked.context("source produced no frames")?;

    let composed = compositor.compose(&frame.frame, args.time, &captions)?;
    compositor.release();
    if let Some(overlay) = &composed.overlay {
        eprintln!("caption '{}': {:?}", overlay.caption_id, overlay.lines);
    }

    ensure_parent(&args.out)?;
    let png = composed.frame.to_png()?;
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_srt(args: SrtArgs) -> anyhow::Result<()> {
    let store = load_captions(&args.in_path)?;
    let Some(out) = args.out else {
        print!("{}", relingo::export_srt(&store));
        return Ok(());
    };
    let text = if is_srt(&out) {
        relingo::export_srt(&store)
    } else {
        store.to_json_string()?
    };
    ensure_parent(&out)?;
    std::fs::write(&out, text).with_context(|| format!("write '{}'", out.display()))?;
    eprintln!("wrote {} ({} captions)", out.display(), store.len());
    Ok(())
}

fn cmd_extract_audio(args: ExtractAudioArgs) -> anyhow::Result<()> {
    let select = match args.channel {
        Some(select) => select,
        None => RenderOpts::from_env()?.channel_select,
    };
    let wav = extract_transcription_audio(&args.in_path, select)?;
    ensure_parent(&args.out)?;
    std::fs::write(&args.out, &wav)
        .with_context(|| format!("write wav '{}'", args.out.display()))?;
    eprintln!("wrote {} ({} bytes)", args.out.display(), wav.len());
    Ok(())
}
