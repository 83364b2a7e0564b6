mod analyze;
mod collect;
mod export;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "komentar")]
#[command(about = "Collect product reviews and video comments from Shopee and TikTok")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Output and post-processing flags shared by every collecting command.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct OutputArgs {
    /// Output file. A path without an extension is treated as a directory
    /// and receives a timestamped file name. Writes to stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Drop records repeating an (item, user, comment, time) already seen
    #[arg(long)]
    pub dedupe: bool,

    /// Drop comments with fewer words than this
    #[arg(long, default_value_t = 0)]
    pub min_words: usize,

    /// Comma-separated keywords; comments containing any are dropped
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,
}

/// Flags for render-and-scroll sources.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct RenderArgs {
    /// Maximum number of comments (10-1000)
    #[arg(long)]
    pub max: Option<usize>,

    /// Skip reading like counts
    #[arg(long)]
    pub no_likes: bool,

    /// Skip reading reply counts
    #[arg(long)]
    pub no_replies: bool,
}

/// Flags for Shopee rating sources.
#[derive(Debug, Clone, Args)]
pub(crate) struct ShopeeArgs {
    /// Maximum number of reviews (10-1000)
    #[arg(long)]
    pub max: Option<usize>,

    /// Only collect reviews with this star rating
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub stars: Option<u8>,

    /// Reviews requested per page
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub limit: u32,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect reviews of one Shopee product
    Shopee {
        /// Product URL containing i.<shopid>.<itemid>
        #[arg(long)]
        url: String,
        #[command(flatten)]
        shopee: ShopeeArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Collect reviews for every "shopid,itemid" line of a file
    ShopeeBatch {
        #[arg(long)]
        ids: PathBuf,
        #[command(flatten)]
        shopee: ShopeeArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Collect comments from a TikTok Shop product page
    TiktokProduct {
        #[arg(long)]
        url: String,
        #[command(flatten)]
        render: RenderArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Collect comments from a TikTok video, by URL or numeric id
    TiktokVideo {
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        url: Option<String>,
        #[arg(long)]
        id: Option<String>,
        #[command(flatten)]
        render: RenderArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Collect comments for every TikTok video URL in a file (one per line)
    TiktokBatch {
        #[arg(long)]
        urls: PathBuf,
        #[command(flatten)]
        render: RenderArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Collect every target listed in a YAML targets file
    Batch {
        #[arg(long)]
        targets: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Concatenate JSON record files in argument order
    Merge {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print rating distribution, frequent words and recent daily volume
    Analyze {
        file: PathBuf,
        /// Number of frequent words to list
        #[arg(long, default_value_t = 10)]
        top: usize,
        /// Number of most recent dates to list
        #[arg(long, default_value_t = 7)]
        days: usize,
    },
}

/// Logs go to stderr; stdout is reserved for the JSON sink.
fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `--help` and usage errors must not depend on KOMENTAR_* values.
    let cli = Cli::parse();
    let config = komentar_core::load_app_config()?;
    init_tracing(&config.log_level)?;

    match cli.command {
        Commands::Shopee {
            url,
            shopee,
            output,
        } => collect::run_shopee(&config, &url, &shopee, &output).await,
        Commands::ShopeeBatch {
            ids,
            shopee,
            output,
        } => collect::run_shopee_batch(&config, &ids, &shopee, &output).await,
        Commands::TiktokProduct {
            url,
            render,
            output,
        } => collect::run_tiktok_product(&config, &url, &render, &output).await,
        Commands::TiktokVideo {
            url,
            id,
            render,
            output,
        } => {
            let input = url.or(id).unwrap_or_default();
            collect::run_tiktok_video(&config, &input, &render, &output).await
        }
        Commands::TiktokBatch {
            urls,
            render,
            output,
        } => collect::run_tiktok_batch(&config, &urls, &render, &output).await,
        Commands::Batch { targets, output } => {
            collect::run_targets_batch(&config, &targets, &output).await
        }
        Commands::Merge { files, out } => export::run_merge(&files, out.as_deref()),
        Commands::Analyze { file, top, days } => analyze::run_analyze(&file, top, days),
    }
}

#[cfg(test)]
mod tests;
