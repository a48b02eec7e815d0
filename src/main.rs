//! skylight command line interface

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use skylight::client::http_client::HttpAccessoryClient;
use skylight::config::{self, ControllerConfig};
use skylight::logging;
use skylight::model::MAX_POSITION;
use skylight::{Controller, SetStatus, SkylightError, Status, WindowKind, WindowSelection};

/// Read sensors and set window/blind positions on paired accessories
#[derive(Parser, Debug)]
#[command(name = "skylight")]
#[command(about = "Read sensors and set window/blind positions on paired accessories")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Directory holding controller profiles
    #[arg(long, global = true, env = "SKYLIGHT_CONFIG_PATH")]
    config_path: Option<PathBuf>,

    /// Controller profile to use
    #[arg(long, global = true, default_value = "default")]
    profile: String,

    /// Accessory pairing to connect to (first configured when omitted)
    #[arg(short = 'n', long, global = true, default_value = "")]
    name: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Window selection flags shared by status and set
#[derive(Args, Debug)]
struct SelectionArgs {
    /// Select windows with matching codes
    #[arg(short = 'c', long = "code", value_name = "CODE")]
    codes: Vec<String>,

    /// Select windows with matching serials
    #[arg(short = 's', long = "serial", value_name = "SERIAL")]
    serials: Vec<String>,

    /// Select windows by kind: (w)indow or (b)lind
    #[arg(short = 'k', long = "kind", value_name = "KIND", value_parser = parse_kind)]
    kinds: Vec<WindowKind>,
}

impl From<SelectionArgs> for WindowSelection {
    fn from(args: SelectionArgs) -> Self {
        WindowSelection {
            codes: args.codes,
            serials: args.serials,
            kinds: args.kinds,
        }
    }
}

fn parse_kind(s: &str) -> Result<WindowKind, String> {
    s.parse().map_err(|e: SkylightError| e.to_string())
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read temperature, humidity and CO2 sensors and window positions
    #[command(alias = "s")]
    Status {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Set the target position of selected windows and/or blinds
    Set {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Position to move to, 0 (closed) to 100 (open)
        #[arg(short, long)]
        position: u8,
    },

    /// Assign a friendly name and short code to a window serial
    Setup {
        /// Serial number of the window to set up
        #[arg(long)]
        serial: String,

        /// Friendly name to assign
        #[arg(long)]
        desc: String,

        /// Short code to assign
        #[arg(long)]
        code: String,
    },

    /// Merge controller identity and pairings from another profile file
    Import {
        /// Profile file to import from
        #[arg(long)]
        from: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_dir = cli
        .config_path
        .clone()
        .or_else(config::default_config_dir)
        .context("cannot resolve a config directory, pass --config-path")?;

    match cli.command {
        Commands::Status { selection } => {
            run_status(&config_dir, &cli.profile, &cli.name, selection.into()).await
        }
        Commands::Set {
            selection,
            position,
        } => run_set(&config_dir, &cli.profile, &cli.name, selection.into(), position).await,
        Commands::Setup { serial, desc, code } => {
            run_setup(&config_dir, &cli.profile, &cli.name, &serial, &desc, &code).await
        }
        Commands::Import { from } => run_import(&config_dir, &cli.profile, &from),
    }
}

/// Build a controller from the profile's pairing and mappings
fn connect(config: &ControllerConfig, name: &str) -> anyhow::Result<Controller> {
    if config.pairings.is_empty() {
        anyhow::bail!("no paired accessories in profile");
    }

    let pairing = config
        .pairing(name)
        .with_context(|| format!("accessory {name} not found"))?;

    let client = HttpAccessoryClient::new(pairing.address.clone(), config.timeout)?;
    Ok(Controller::new(
        Box::new(client),
        config.window_mappings.clone(),
    ))
}

async fn run_status(
    dir: &Path,
    profile: &str,
    name: &str,
    selection: WindowSelection,
) -> anyhow::Result<()> {
    let config = config::load(dir, profile)?;
    let controller = connect(&config, name)?;

    let status = controller.read_status(&selection).await?;
    print_status(&status);
    Ok(())
}

fn print_status(status: &Status) {
    println!("Temperature: {:.1}F", status.reading.temperature_f);
    println!("Relative Humidity: {:.1}", status.reading.relative_humidity);
    println!("CO2 PPM: {:.0}", status.reading.co2_ppm);

    for window in &status.windows {
        println!(
            "{} ({}): {} ({})",
            window.friendly_name(),
            window.code(),
            window.current_position,
            window.target_position
        );
    }
}

async fn run_set(
    dir: &Path,
    profile: &str,
    name: &str,
    selection: WindowSelection,
    position: u8,
) -> anyhow::Result<()> {
    if position > MAX_POSITION {
        anyhow::bail!("out of range position: {position}");
    }

    let config = config::load(dir, profile)?;
    let controller = connect(&config, name)?;

    match controller.set_position(&selection, position).await {
        Ok(status) => {
            print_set_status(&status, position);
            Ok(())
        }
        Err(SkylightError::Write { status, source }) => {
            // Classification finished but the batch may not have landed.
            eprintln!("Write failed; intended changes:");
            for window in &status.modified {
                eprintln!(
                    "{} ({}): {} -> {}",
                    window.friendly_name(),
                    window.code(),
                    window.target_position,
                    position
                );
            }
            Err(anyhow::Error::new(*source).context("write characteristics"))
        }
        Err(e) => Err(e.into()),
    }
}

fn print_set_status(status: &SetStatus, position: u8) {
    if status.total() == 0 {
        println!("No windows selected");
    } else if status.modified.is_empty() {
        println!("Selected windows already in position");
    } else {
        println!("Updated windows:");
        for window in &status.modified {
            println!(
                "{} ({}): {} ({})",
                window.friendly_name(),
                window.code(),
                window.current_position,
                position
            );
        }
    }
}

async fn run_setup(
    dir: &Path,
    profile: &str,
    name: &str,
    serial: &str,
    desc: &str,
    code: &str,
) -> anyhow::Result<()> {
    let mut config = config::load(dir, profile)?;
    let controller = connect(&config, name)?;

    let status = controller.read_status(&WindowSelection::default()).await?;
    if !status.windows.iter().any(|w| w.serial_number == serial) {
        return Err(
            SkylightError::not_found(format!("no window with serial {serial}")).into(),
        );
    }

    config.upsert_mapping(serial, desc, code);
    config::save(dir, profile, &config, true)?;

    println!("Mapped {serial} to {desc} ({code})");
    Ok(())
}

fn run_import(dir: &Path, profile: &str, from: &Path) -> anyhow::Result<()> {
    let imported = config::load_file(from)?;

    let merged = match config::load(dir, profile) {
        Ok(mut existing) => {
            existing.merge_identity(&imported);
            existing
        }
        Err(SkylightError::NotFound(_)) => ControllerConfig {
            window_mappings: Vec::new(),
            ..imported
        },
        Err(e) => return Err(e.into()),
    };

    config::save(dir, profile, &merged, true)?;
    println!(
        "Imported controller identity and {} pairing(s) into profile {profile}",
        merged.pairings.len()
    );
    Ok(())
}
