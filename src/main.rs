use std::path::PathBuf;

use anyhow::Context;
use cabinet_designer::event;
use cabinet_designer::presets::Preset;
use cabinet_designer::{Config, Designer, LayoutParams};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cabinet", about = "Constrained cabinet layout designer")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a preset cabinet
    Show {
        #[arg(default_value = "classic")]
        preset: String,
    },
    /// Replay a JSON-lines event script against a preset and print the result
    Replay {
        script: PathBuf,
        #[arg(short, long, default_value = "classic")]
        preset: String,
    },
    /// List the available presets
    Presets,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut clog = colog::default_builder();
    clog.filter(
        None,
        match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        },
    );
    clog.init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    let params = LayoutParams::from(&config.limits);

    let command = cli.command.unwrap_or(Commands::Show {
        preset: "classic".to_string(),
    });
    match command {
        Commands::Show { preset } => {
            let cabinet = preset_named(&preset)?.build(&params);
            cabinet
                .check(&params)
                .with_context(|| format!("preset '{}' does not fit the configured limits", preset))?;
            print!("{}", cabinet);
            Ok(())
        }
        Commands::Replay { script, preset } => {
            let events = event::read_script(&script)?;
            let mut designer = Designer::new(preset_named(&preset)?.build(&params), &config)
                .with_context(|| format!("preset '{}' does not fit the configured limits", preset))?;
            let mut changed = 0;
            for ev in &events {
                if designer.handle_event(ev) {
                    changed += 1;
                }
            }
            log::info!("{} events, {} changed the layout", events.len(), changed);
            print!("{}", designer.cabinet());
            Ok(())
        }
        Commands::Presets => {
            for name in Preset::NAMES {
                println!("{}", name);
            }
            println!("even-<shelves>x<partitions>");
            Ok(())
        }
    }
}

fn preset_named(name: &str) -> anyhow::Result<Preset> {
    Preset::from_name(name).with_context(|| {
        format!(
            "unknown preset '{}' (try one of: {})",
            name,
            Preset::NAMES.join(", ")
        )
    })
}
