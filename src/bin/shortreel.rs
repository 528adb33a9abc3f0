use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use shortreel::{
    FfmpegLoader, FfmpegLoaderOpts, FontSet, FrameRasterizer, LongOutlineTemplate, Manifest,
    Pipeline, PipelineState, Rasterize, ScriptGenerator, ScriptLine, ShortsTemplate,
    TopicPrediction, frame_slot_name, load_feed, script_lines,
};

#[derive(Parser, Debug)]
#[command(name = "shortreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print the concat manifest a script would be staged with.
    Manifest(ManifestArgs),
    /// Render an MP4 video (requires `ffmpeg`).
    Render(RenderArgs),
    /// List the topics of a prediction feed.
    Topics(TopicsArgs),
}

#[derive(Args, Debug, Default)]
struct FontArgs {
    /// Bold font used for script lines. Discovered from system fonts when omitted.
    #[arg(long, requires = "font_regular")]
    font_bold: Option<PathBuf>,

    /// Regular font used for the caption.
    #[arg(long, requires = "font_bold")]
    font_regular: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ScriptArgs {
    /// Topic used as caption and output name. Defaults to the first topic of `--feed`.
    #[arg(long)]
    topic: Option<String>,

    /// Prediction feed JSON the topic is taken from when `--topic` is absent.
    #[arg(long)]
    feed: Option<PathBuf>,

    /// Script text file, one frame per non-blank line. Generated from the topic when omitted.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Generate the long-form outline instead of the four-beat shorts script.
    #[arg(long, default_value_t = false, conflicts_with = "script")]
    long: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Script line drawn in the center.
    #[arg(long)]
    line: String,

    /// Topic caption drawn near the bottom.
    #[arg(long)]
    topic: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    fonts: FontArgs,
}

#[derive(Parser, Debug)]
struct ManifestArgs {
    #[command(flatten)]
    script: ScriptArgs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    script: ScriptArgs,

    /// Output MP4 path. Overrides `--out-dir`.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Directory the video is saved in under its download name.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Encoder program.
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,

    /// Directory scratch areas are created in (system temp dir when omitted).
    #[arg(long)]
    work_root: Option<PathBuf>,

    /// Keep the scratch area with staged frames and manifest after the run.
    #[arg(long, default_value_t = false)]
    keep_workdir: bool,

    /// Print a JSON summary on stdout.
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(flatten)]
    fonts: FontArgs,
}

#[derive(Parser, Debug)]
struct TopicsArgs {
    /// Prediction feed JSON (a record or an array of records).
    #[arg(long)]
    feed: Option<PathBuf>,

    /// Print the records as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Manifest(args) => cmd_manifest(args),
        Command::Render(args) => cmd_render(args),
        Command::Topics(args) => cmd_topics(args),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let fonts = load_fonts(&args.fonts)?;
    let mut rasterizer = FrameRasterizer::cpu(&fonts)?;
    let image = rasterizer.render(&args.line, &args.topic)?;

    write_file(&args.out, &image.png)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_manifest(args: ManifestArgs) -> anyhow::Result<()> {
    let (_, lines) = resolve_script(&args.script)?;
    let names: Vec<String> = (0..lines.len())
        .map(|i| u32::try_from(i).map(|i| frame_slot_name(shortreel::FrameIndex(i))))
        .collect::<Result<_, _>>()
        .context("script has too many lines")?;
    let manifest = Manifest::for_frames(names.as_slice())?;
    println!("{}", manifest.to_text());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (topic, lines) = resolve_script(&args.script)?;
    let fonts = load_fonts(&args.fonts)?;

    let loader = FfmpegLoader::new(
        FfmpegLoaderOpts::default()
            .with_program(args.ffmpeg.clone())
            .with_work_root(args.work_root.clone())
            .with_keep_workdir(args.keep_workdir),
    );
    let rasterizer = FrameRasterizer::cpu(&fonts)?;
    let pipeline = Pipeline::new(loader, rasterizer).with_observer(Box::new(|s: &PipelineState| {
        if let PipelineState::Rendering { done, total } = s {
            tracing::info!(done, total, "rendering");
        }
    }));

    let artifact = pipeline.run(&topic, &lines).into_result()?;
    let path = match &args.out {
        Some(out) => {
            artifact.save_to(out)?;
            out.clone()
        }
        None => artifact.save_in_dir(&args.out_dir)?,
    };

    if args.json {
        let summary = serde_json::json!({
            "topic": artifact.topic,
            "path": path.display().to_string(),
            "bytes": artifact.video.len(),
            "frames": artifact.frame_count,
            "nominal_duration_secs": artifact.nominal_duration_secs,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_topics(args: TopicsArgs) -> anyhow::Result<()> {
    let records = feed_records(args.feed.as_deref());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    for r in &records {
        println!(
            "{}\tprob={:.2}\tgate={}",
            r.topic,
            r.model_prob_60d,
            if r.fast_gate_passed { "pass" } else { "fail" }
        );
    }
    Ok(())
}

fn feed_records(path: Option<&Path>) -> Vec<TopicPrediction> {
    match path {
        Some(p) => load_feed(p),
        None => vec![TopicPrediction::fallback()],
    }
}

fn resolve_script(args: &ScriptArgs) -> anyhow::Result<(String, Vec<ScriptLine>)> {
    let topic = match &args.topic {
        Some(t) => t.clone(),
        None => feed_records(args.feed.as_deref())
            .into_iter()
            .next()
            .map(|r| r.topic)
            .context("prediction feed has no records")?,
    };

    let lines = match &args.script {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read script '{}'", path.display()))?;
            script_lines(&text)
        }
        None if args.long => LongOutlineTemplate.lines(&topic),
        None => ShortsTemplate.lines(&topic),
    };
    Ok((topic, lines))
}

fn load_fonts(args: &FontArgs) -> anyhow::Result<FontSet> {
    let fonts = match (&args.font_bold, &args.font_regular) {
        (Some(bold), Some(regular)) => FontSet::from_paths(bold, regular)?,
        _ => FontSet::discover()?,
    };
    Ok(fonts)
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}
