use std::process;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use git_bump::bump::BumpOutcome;
use git_bump::cli::{orchestration, Cli, Command};
use git_bump::{config, ui};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        ui::display_error(&format!("{:#}", e));
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("git_bump=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Error loading config: {}", e))?;
    let workdir = std::env::current_dir()?;

    match cli.command {
        Command::Bump(args) => {
            match orchestration::run_bump(&args, &config, &workdir)? {
                BumpOutcome::Released(_) => {}
                BumpOutcome::NoIncrement(_) => {
                    ui::display_status("[NO_NEW_VERSION] No commits warrant a new version");
                }
                BumpOutcome::DryRun(_) => {
                    ui::display_status("Dry run: nothing was changed");
                }
                BumpOutcome::FilesOnly(_) => {}
            }
        }
        Command::Changelog(args) => {
            let rendered = orchestration::run_changelog(&args, &config, &workdir)?;
            if args.dry_run {
                print!("{}", rendered.content);
            } else {
                ui::display_success("Wrote changelog");
            }
        }
        Command::Metadata(args) => {
            println!("{}", orchestration::run_metadata(&args)?);
        }
    }

    Ok(())
}
