//! E2E runner entry point
//!
//! Runs the Previso scenario set against an already running application and
//! exits with the standard pass/fail code.
//! Run with: cargo run --release -- [options]

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use previso_e2e::config::{base_url_or_default, SuiteConfig};
use previso_e2e::{previso_suite, Browser, E2eResult, Scenario, SuiteRunner};

#[derive(Parser, Debug)]
#[command(name = "previso-e2e")]
#[command(about = "Browser E2E test runner for the Previso web app")]
struct Args {
    /// Application origin to test against
    #[arg(long, env = "BASE_URL", default_value = previso_e2e::DEFAULT_BASE_URL)]
    base_url: String,

    /// Directory of extra YAML scenario files to run after the built-in suite
    #[arg(short, long)]
    scenarios: Option<PathBuf>,

    /// Run only scenarios carrying this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Run only the scenario with this name
    #[arg(short, long)]
    name: Option<String>,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long, default_value = "chromium")]
    browser: Browser,

    /// Run in headless mode
    #[arg(long, default_value = "true")]
    headless: bool,

    /// Record a video of each scenario (off by default)
    #[arg(long)]
    record_video: bool,

    /// Output directory for results and screenshots
    #[arg(short, long, default_value = "test-results")]
    output: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("info".parse().expect("valid directive")),
        )
        .init();

    let args = Args::parse();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let result = rt.block_on(async_main(args));

    match result {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: Args) -> E2eResult<bool> {
    let mut config = SuiteConfig {
        base_url: base_url_or_default(Some(args.base_url)),
        screenshot_dir: args.output.join("screenshots"),
        results_dir: args.output.clone(),
        headless: args.headless,
        ..SuiteConfig::default()
    };
    if args.record_video {
        config.context.record_video_dir = Some(args.output.join("videos"));
    }

    let mut scenarios = previso_suite();
    if let Some(dir) = &args.scenarios {
        scenarios.extend(Scenario::load_all(dir)?);
    }
    if let Some(name) = &args.name {
        scenarios.retain(|s| &s.name == name);
    }

    let runner = SuiteRunner::new(config, args.browser);

    let result = match &args.tag {
        Some(tag) => runner.run_tagged(&scenarios, tag).await?,
        None => runner.run_all(&scenarios).await?,
    };

    runner.write_results(&result)?;

    Ok(result.all_green())
}
