use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use imprint::{
    AssetStore, CloudinaryConfig, CloudinaryStore, CompositionRequest, CompositionResult,
    HttpFetcher, ImprintError, ImprintOpts, ImprintResult, Pipeline, PublishPolicy,
    RenderResponse,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "imprint", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a request and write the JPEG.
    Render(RenderArgs),
    /// Composite a request and print the JSON response on stdout.
    Respond(RespondArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Input request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Upload the composite to the store named by `CLOUDINARY_URL`.
    #[arg(long, default_value_t = false)]
    publish: bool,

    /// Fail the request when the upload fails (implies --publish).
    #[arg(long, default_value_t = false)]
    require_publish: bool,

    /// Background fetch timeout.
    #[arg(long)]
    fetch_timeout_secs: Option<u64>,

    /// Upload timeout.
    #[arg(long)]
    upload_timeout_secs: Option<u64>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RespondArgs {
    #[command(flatten)]
    run: RunArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("imprint=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start tokio runtime")?;
    match cli.cmd {
        Command::Render(args) => rt.block_on(cmd_render(args)),
        Command::Respond(args) => {
            let ok = rt.block_on(cmd_respond(args))?;
            if !ok {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let result = execute(&args.run).await?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &result.jpeg)
        .with_context(|| format!("write jpeg '{}'", args.out.display()))?;

    if let Some(asset) = result.publish.asset() {
        eprintln!("published {}", asset.secure_url);
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_respond(args: RespondArgs) -> anyhow::Result<bool> {
    let result = execute(&args.run).await;
    let resp = RenderResponse::from_result(&result);
    println!("{}", resp.to_json()?);
    Ok(resp.success)
}

fn opts_from_args(args: &RunArgs) -> ImprintOpts {
    let mut opts = ImprintOpts::default();
    if let Some(secs) = args.fetch_timeout_secs {
        opts.fetch_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = args.upload_timeout_secs {
        opts.upload_timeout = Duration::from_secs(secs);
    }
    if args.require_publish {
        opts.publish_policy = PublishPolicy::Required;
    }
    opts
}

async fn execute(args: &RunArgs) -> ImprintResult<CompositionResult> {
    let opts = opts_from_args(args);
    let req = CompositionRequest::from_path(&args.in_path)?;
    let fetcher = HttpFetcher::new(&opts)?;

    if !(args.publish || args.require_publish) {
        return run_until_interrupted(&Pipeline::new(fetcher, opts), req).await;
    }

    let config = CloudinaryConfig::from_env()?.ok_or_else(|| {
        ImprintError::validation(format!(
            "--publish needs {} to be set",
            imprint::CLOUDINARY_URL_ENV
        ))
    })?;
    let store = CloudinaryStore::new(config, &opts)?;
    run_until_interrupted(&Pipeline::new(fetcher, opts).with_store(store), req).await
}

async fn run_until_interrupted<S: AssetStore>(
    pipeline: &Pipeline<HttpFetcher, S>,
    req: CompositionRequest,
) -> ImprintResult<CompositionResult> {
    tokio::select! {
        res = pipeline.run(req) => res,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted; render cancelled");
            Err(ImprintError::Other(anyhow::anyhow!("render cancelled")))
        }
    }
}
