// CLI application
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use melonrip_cli::commands::{describe_scene, export_dump, load_dump, write_default_config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "melonrip")]
#[command(about = "MelonRipper Nintendo DS GPU dump decoder")]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print a summary of a dump
    Info {
        /// Path to the .dump file
        dump_file: PathBuf,
    },
    /// Export mesh, materials and textures of a dump
    Export {
        /// Path to the .dump file
        dump_file: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output_dir: PathBuf,

        /// JSON export config (defaults if omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Manage export config files
    Config {
        /// Write the default export config to this path
        #[arg(long)]
        write_default: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Info { dump_file } => {
            let pb = create_progress_bar("Decoding dump...");
            let scene = load_dump(&dump_file)?;
            pb.finish_and_clear();
            print!("{}", describe_scene(&scene));
        }
        Commands::Export {
            dump_file,
            output_dir,
            config,
        } => {
            let pb = create_progress_bar("Exporting dump...");
            let summary = export_dump(&dump_file, &output_dir, config.as_deref())?;
            pb.finish_with_message(format!(
                "Export complete: {} ({} textures{})",
                summary.scene_path.display(),
                summary.textures_written,
                if summary.toon_ramp_written { ", toon ramp" } else { "" }
            ));
        }
        Commands::Config { write_default } => {
            write_default_config(&write_default)?;
        }
    }

    Ok(())
}

fn create_progress_bar(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
