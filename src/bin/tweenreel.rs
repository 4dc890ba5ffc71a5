use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tweenreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the compositions of a project.
    List(ListArgs),
    /// Render a single frame snapshot as JSON.
    Still(StillArgs),
    /// Render a frame range as JSON lines (header line, then one snapshot per frame).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Project JSON (`{ "compositions": [...] }`).
    #[arg(long)]
    project: PathBuf,
}

#[derive(Parser, Debug)]
struct StillArgs {
    #[arg(long)]
    project: PathBuf,

    /// Composition id.
    #[arg(long)]
    id: String,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output JSON path. Defaults to stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[arg(long)]
    project: PathBuf,

    /// Composition id.
    #[arg(long)]
    id: String,

    /// Output `.jsonl` path.
    #[arg(long)]
    out: PathBuf,

    /// First frame (inclusive).
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// Last frame (exclusive). Defaults to the composition duration.
    #[arg(long)]
    end: Option<u64>,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Render chunk size.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::List(args) => cmd_list(args),
        Command::Still(args) => cmd_still(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load(project: &std::path::Path) -> anyhow::Result<tweenreel::CompositionRegistry> {
    tweenreel::CompositionRegistry::from_path(project)
        .with_context(|| format!("load project '{}'", project.display()))
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let reg = load(&args.project)?;
    let mut out = std::io::stdout().lock();
    for def in reg.iter() {
        let v = def.video_config();
        writeln!(
            out,
            "{}\t{}/{} fps\t{}x{}\t{} frames",
            def.id, v.fps.num, v.fps.den, v.width, v.height, v.duration_in_frames
        )?;
    }
    Ok(())
}

fn cmd_still(args: StillArgs) -> anyhow::Result<()> {
    let reg = load(&args.project)?;
    let def = reg.require(&args.id)?;
    let mut sess =
        tweenreel::RenderSession::new(def, tweenreel::RenderSessionOpts::default())?;
    let snap = sess
        .render_frame(tweenreel::FrameIndex(args.frame))
        .with_context(|| format!("render frame {} of '{}'", args.frame, args.id))?;
    let json = serde_json::to_string_pretty(&snap)?;

    match args.out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&path, json)
                .with_context(|| format!("write snapshot '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let reg = load(&args.project)?;
    let def = reg.require(&args.id)?;

    let opts = tweenreel::RenderSessionOpts {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
    };
    let mut sess = tweenreel::RenderSession::new(def, opts)?;
    let end = args.end.unwrap_or(def.duration_in_frames);
    let range =
        tweenreel::FrameRange::new(tweenreel::FrameIndex(args.start), tweenreel::FrameIndex(end))?;

    let mut sink = tweenreel::JsonLinesSink::create(&args.out)?;
    let stats = sess.render_range(range, &mut sink)?;

    eprintln!(
        "wrote {} ({} frames, {} static)",
        args.out.display(),
        stats.frames_total,
        stats.frames_static
    );
    Ok(())
}
