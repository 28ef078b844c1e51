use anyhow::{Result, anyhow};
use blinkdo_site::{
    carousel::{Carousel, CarouselCommand, CarouselDriver},
    config::SiteConfig,
    content::{self, Testimonial},
    environment::{Environment, RealEnvironment},
    github::GitHubRepo,
    platform::{self, PlatformInfo},
    release::{ReleaseAssets, select_download_url},
    stars::StarTracker,
};
use clap::Parser;
use log::warn;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// blinkdo-site - BlinkDo landing page toolkit
///
/// Resolves the visitor platform and download link, reads the repository star
/// count and runs the testimonial carousel.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
#[derive(Parser, Debug)]
#[command(author, version = env!("BLINKDO_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Site configuration file (JSON; also via BLINKDO_CONFIG)
    #[arg(
        long = "config",
        short = 'c',
        env = "BLINKDO_CONFIG",
        value_name = "PATH",
        global = true
    )]
    pub config: Option<PathBuf>,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Classify the visitor platform from a user agent
    Platform(PlatformArgs),

    /// Print the download link for the visitor platform
    Download(DownloadArgs),

    /// Print the star count of a GitHub repository
    Stars(StarsArgs),

    /// Cycle through the testimonials
    Testimonials(TestimonialsArgs),
}

#[derive(clap::Args, Debug)]
pub struct PlatformArgs {
    /// User agent to classify (defaults to BLINKDO_USER_AGENT or this machine)
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct DownloadArgs {
    /// User agent to classify (defaults to BLINKDO_USER_AGENT or this machine)
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Use the configured static links instead of the latest release assets
    #[arg(long = "static")]
    pub static_links: bool,
}

#[derive(clap::Args, Debug)]
pub struct StarsArgs {
    /// Repository URL (defaults to the configured repository)
    #[arg(value_name = "URL")]
    pub repo_url: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct TestimonialsArgs {
    /// Time each testimonial stays on screen
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub dwell_ms: Option<u64>,

    /// Number of testimonials to show before exiting
    #[arg(long, default_value_t = 8)]
    pub count: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let env = RealEnvironment;
    let config = SiteConfig::load(&env, cli.config.as_deref())?;

    match cli.command {
        Commands::Platform(args) => {
            let info = resolve_platform(&env, args.user_agent.as_deref());
            if args.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print!("{}", describe_platform(&info));
            }
        }
        Commands::Download(args) => {
            let info = resolve_platform(&env, args.user_agent.as_deref());
            let assets = if args.static_links {
                Some(ReleaseAssets::from_links(&config.downloads))
            } else {
                latest_assets(&env, &config, cli.api_url).await?
            };
            let url = select_download_url(info.platform, assets.as_ref(), &config.downloads.fallback);
            println!("{}", url);
        }
        Commands::Stars(args) => {
            let repo_url = args.repo_url.unwrap_or_else(|| config.repository.clone());
            let github = config.github(&env, cli.api_url)?;
            let mut tracker = StarTracker::spawn(Arc::new(github), repo_url);
            let state = tracker.settled().await;
            match (state.stars, state.error) {
                (Some(stars), _) => println!("{}", stars),
                (None, Some(error)) => return Err(anyhow!(error)),
                (None, None) => return Err(anyhow!("Star count unavailable")),
            }
        }
        Commands::Testimonials(args) => {
            let dwell = Duration::from_millis(args.dwell_ms.unwrap_or(config.carousel_dwell_ms));
            run_testimonials(dwell, args.count).await?;
        }
    }
    Ok(())
}

fn resolve_platform(env: &impl Environment, user_agent: Option<&str>) -> PlatformInfo {
    match user_agent {
        Some(ua) => PlatformInfo::from_user_agent(ua),
        None => platform::detect(env),
    }
}

fn describe_platform(info: &PlatformInfo) -> String {
    format!(
        "platform: {}\ndisplay name: {}\napple silicon: {}\n",
        info.platform,
        info.display_name,
        if info.is_apple_silicon { "yes" } else { "no" }
    )
}

/// Release assets of the configured repository; `None` when they cannot be fetched.
async fn latest_assets(
    env: &impl Environment,
    config: &SiteConfig,
    api_url: Option<String>,
) -> Result<Option<ReleaseAssets>> {
    let Some(repo) = GitHubRepo::from_url(&config.repository) else {
        warn!(
            "Configured repository is not a GitHub repository: {}",
            config.repository
        );
        return Ok(None);
    };
    let github = config.github(env, api_url)?;
    match ReleaseAssets::fetch_latest(&github, &repo).await {
        Ok(assets) => Ok(Some(assets)),
        Err(e) => {
            warn!("{:#}", e);
            Ok(None)
        }
    }
}

async fn run_testimonials(dwell: Duration, count: usize) -> Result<()> {
    let testimonials = content::testimonials();
    let carousel = Carousel::new(testimonials.clone())?.with_dwell(dwell)?;
    let mut driver = CarouselDriver::spawn(carousel);

    let mut snapshot = driver.snapshot();
    let mut shown = 0;
    let mut last_index = None;

    while shown < count {
        if last_index != Some(snapshot.index) {
            println!(
                "{}",
                render_testimonial(&testimonials[snapshot.index], &snapshot.progress)
            );
            println!("{}", render_up_next(&testimonials, &snapshot.window));
            driver.send(CarouselCommand::FinishTransition)?;
            last_index = Some(snapshot.index);
            shown += 1;
            if shown == count {
                break;
            }
        }
        snapshot = driver.changed().await?;
    }
    Ok(())
}

fn render_testimonial(testimonial: &Testimonial, label: &str) -> String {
    format!(
        "[{}] \"{}\"\n    {} {} {} ({})\n",
        label,
        testimonial.content,
        "*".repeat(testimonial.rating as usize),
        testimonial.avatar(),
        testimonial.name,
        testimonial.byline()
    )
}

/// Names on the cards shown next to the current one.
fn render_up_next(testimonials: &[Testimonial], window: &[usize]) -> String {
    let names: Vec<&str> = window
        .iter()
        .skip(1)
        .map(|&i| testimonials[i].name.as_str())
        .collect();
    format!("    up next: {}\n", names.join(", "))
}
