//! Workspace tasks: `cargo run -p trajview-xtask -- <command>`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use trajview::assets::{asset_names, enable_script, install_assets};
use trajview::options::Options;

#[derive(Parser)]
#[command(name = "xtask", about = "trajview asset staging tasks")]
struct Cli {
    /// TOML options file; defaults apply when omitted.
    #[arg(long, global = true)]
    options: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy the browser assets into a directory the host serves.
    InstallAssets {
        /// Target directory, e.g. `~/.local/share/jupyter/nbextensions`.
        #[arg(long)]
        target: PathBuf,
        /// Also write the activation script next to the assets.
        #[arg(long)]
        with_script: bool,
    },
    /// Print the activation script (require config + bridge).
    Script,
    /// List embedded asset files.
    List,
    /// Print the options JSON schema.
    Schema,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let cli = Cli::parse();
    let options = match &cli.options {
        Some(path) => Options::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Options::default(),
    };

    match cli.command {
        Command::InstallAssets {
            target,
            with_script,
        } => {
            let written = install_assets(&target).with_context(|| {
                format!("installing assets into {}", target.display())
            })?;
            if with_script {
                let path = target.join("trajview-enable.js");
                std::fs::write(&path, enable_script(&options.assets)?)
                    .with_context(|| format!("writing {}", path.display()))?;
                log::info!("wrote {}", path.display());
            }
            for path in written {
                println!("{}", path.display());
            }
        }
        Command::Script => println!("{}", enable_script(&options.assets)?),
        Command::List => {
            for name in asset_names() {
                println!("{name}");
            }
        }
        Command::Schema => println!(
            "{}",
            serde_json::to_string_pretty(&Options::json_schema())
                .context("serializing schema")?
        ),
    }
    Ok(())
}
