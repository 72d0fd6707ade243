use clap::Parser;
use merit_claimer::{
    private_key_from_env, Identity, MeritBot, RunConfig, RunOutcome, WebDriverEngine,
};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "merit-claimer")]
#[command(about = "Daily Blockscout merit claiming bot")]
#[command(version)]
struct Cli {
    /// Run the browser headless (always on under GitHub Actions)
    #[arg(long)]
    headless: bool,

    /// WebDriver endpoint to connect to
    #[arg(long, default_value = "http://localhost:9515")]
    webdriver_url: String,

    /// Blockscout instance to claim on
    #[arg(long, default_value = "https://eth.blockscout.com")]
    base_url: String,

    /// Claim history file
    #[arg(long, default_value = "claim_history.json")]
    history_file: PathBuf,

    /// Directory for debug screenshots
    #[arg(long, default_value = ".")]
    screenshot_dir: PathBuf,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,

    /// Validate the key and config without launching a browser
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> merit_claimer::Result<()> {
    let cli = Cli::parse();

    let mut run_config = RunConfig::from_env();
    run_config.headless |= cli.headless;
    run_config.webdriver_url = cli.webdriver_url;
    run_config.base_url = cli.base_url;
    run_config.history_path = cli.history_file;
    run_config.screenshot_dir = cli.screenshot_dir;

    // CI mode gets full debug output for the workflow logs.
    let level = if cli.quiet {
        Level::ERROR
    } else if run_config.ci_mode || cli.verbose >= 2 {
        Level::DEBUG
    } else if cli.verbose == 1 {
        Level::INFO
    } else {
        Level::WARN
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    if run_config.ci_mode {
        info!("running in GitHub Actions environment");
    }

    // Setup failures (missing/invalid key, engine init) exit non-zero.
    let secret = private_key_from_env()?;
    let identity = Identity::derive(&secret)?;
    info!("wallet initialized: {}", identity.masked());

    if cli.check {
        println!("Setup valid");
        println!("  Wallet: {}", identity.masked());
        println!("  Target: {}", run_config.base_url);
        println!("  History: {}", run_config.history_path.display());
        println!("  Run id: {}", run_config.run_id);
        return Ok(());
    }

    let engine = WebDriverEngine::launch(&run_config).await?;
    let bot = MeritBot::new(run_config, identity, Box::new(engine));

    // A failed attempt is recorded, not a process failure; only setup
    // errors propagate out of main.
    match bot.run().await? {
        RunOutcome::AlreadyClaimed => {
            println!("✓ Already claimed today, nothing to do");
        }
        RunOutcome::Recorded {
            success: true,
            claim_type,
            ..
        } => {
            println!("✓ Success ({claim_type})");
        }
        RunOutcome::Recorded { error, .. } => {
            println!("✗ Failed");
            if let Some(error) = error {
                println!("  Error: {error}");
            }
        }
    }

    Ok(())
}
