use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use sopmaker::app::App;
use sopmaker::config::Config;
use sopmaker::logging;
use sopmaker::sop::{Document, DocumentStore};
use sopmaker::ui::install_panic_hook;

#[derive(Parser)]
#[command(name = "sopmaker")]
#[command(about = "Terminal editor for Standard Operating Procedure documents")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved SOPs
    List,

    /// Print the steps of a saved SOP
    Show {
        /// Name of the SOP
        name: String,
    },

    /// Verify that every step of a saved SOP has a title
    Check {
        /// Name of the SOP
        name: String,
    },

    /// Write the effective configuration to .sopmaker/config.toml
    Init {
        /// Replace an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = cli.command.is_none();
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::List) => cmd_list(&config)?,
        Some(Commands::Show { name }) => cmd_show(&config, &name)?,
        Some(Commands::Check { name }) => cmd_check(&config, &name)?,
        Some(Commands::Init { force }) => cmd_init(&config, force)?,
        None => {
            install_panic_hook();
            let result = App::new(config).run();

            if let Some(log_path) = logging_handle.written_log_file() {
                eprintln!("Session log: {}", log_path.display());
            }
            result?;
        }
    }

    Ok(())
}

fn cmd_list(config: &Config) -> Result<()> {
    let store = DocumentStore::from_config(config);
    let names = store.list()?;

    if names.is_empty() {
        println!("No SOPs in {}", store.dir().display());
        return Ok(());
    }

    println!("SOPs in {} ({})", store.dir().display(), names.len());
    println!("{}", "─".repeat(60));

    for name in names {
        match store.load(&name) {
            Ok(steps) => println!("{:<40} {:>3} steps", name, steps.len()),
            Err(e) => println!("{:<40} unreadable: {}", name, e),
        }
    }

    Ok(())
}

fn cmd_show(config: &Config, name: &str) -> Result<()> {
    let store = DocumentStore::from_config(config);
    let doc = Document::new(name.trim(), store.load(name)?);

    println!("{} ({} steps)", doc.name, doc.steps.len());
    println!("{}", "─".repeat(60));

    for (i, step) in doc.steps.iter().enumerate() {
        println!("{}. {}", i + 1, step.title);
        for line in step.summary.lines() {
            println!("   {}", line);
        }
        if step.has_image() {
            println!("   [image: {}]", step.image_reference);
        }
        println!();
    }

    Ok(())
}

fn cmd_check(config: &Config, name: &str) -> Result<()> {
    let store = DocumentStore::from_config(config);
    let doc = Document::new(name.trim(), store.load(name)?);

    if let Some(step) = doc.first_untitled_step() {
        bail!("{}: step {} has no title", doc.name, step);
    }

    println!("{}: {} steps, all titled", doc.name, doc.steps.len());
    Ok(())
}

fn cmd_init(config: &Config, force: bool) -> Result<()> {
    let path = Config::local_config_path();
    if path.exists() && !force {
        bail!("{} already exists (use --force to replace it)", path.display());
    }

    config.save()?;
    tracing::info!(path = %path.display(), "Wrote config");
    println!("Wrote {}", path.display());
    Ok(())
}
