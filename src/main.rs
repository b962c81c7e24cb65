use anyhow::Result;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tmws::config::{Config, Settings};
use tmws::discovery::WalkDirWalker;
use tmws::launcher::format_listing;
use tmws::materialize::{AttachMode, Materialized};
use tmws::picker::FzfPicker;
use tmws::tmux::TmuxClient;
use tmws::{LaunchError, Launcher, Outcome};

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging
    setup_logging(cli.debug);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            let code = e
                .downcast_ref::<LaunchError>()
                .map(LaunchError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Config) -> Result<()> {
    // Load settings
    let mut settings = Settings::load(cli.config.as_ref())?;
    settings.merge_env();
    settings.merge_cli(cli);
    settings.validate();
    let config = settings.launch_config();

    let tmux = TmuxClient::new();
    let picker = FzfPicker::new(&settings.picker);
    let walker = WalkDirWalker::new();
    let launcher = Launcher::new(&config, &tmux, &picker, &walker, AttachMode::from_env());

    if cli.list {
        let records = launcher.list()?;
        if !records.is_empty() {
            println!("{}", format_listing(&records, cli.json)?);
        }
        return Ok(());
    }

    match launcher.run(cli.query())? {
        Outcome::NothingFound => {
            eprintln!(
                "No tmux sessions or projects found under {}",
                config.base_dir.display()
            );
        }
        Outcome::Cancelled => {}
        Outcome::Opened(Materialized::Created { name }) => {
            tracing::debug!("Created and opened {}", name);
        }
        Outcome::Opened(Materialized::Attached { name }) => {
            tracing::debug!("Opened {}", name);
        }
    }

    Ok(())
}

fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("tmws=debug")
    } else {
        EnvFilter::new("tmws=warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
