mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sharedwalk_cli::locations::parse_location;
use sharedwalk_cli::output::OutputFormat;
use sharedwalk_lib::{WalkerPair, DEFAULT_MAP_FILE};

use commands::interactive::handle_interactive_command;
use commands::route::{handle_route_command, RouteCommandArgs};

#[derive(Parser, Debug)]
#[command(
    name = "sharedwalk",
    author,
    version,
    about = "Plan walking routes for two people who share the way"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Route two walkers over addresses given on the command line.
    Route(RouteArgs),
    /// Prompt for addresses and walkers on the terminal.
    Interactive {
        /// File to write the route map to.
        #[arg(long, value_name = "FILE", default_value = DEFAULT_MAP_FILE)]
        map: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// A location as ID=ADDRESS, e.g. A="1 Shields Ave, Davis, CA". Repeatable.
    #[arg(
        long = "location",
        value_name = "ID=ADDRESS",
        value_parser = parse_location,
        required = true
    )]
    locations: Vec<(String, String)>,
    /// Walker A's start location id.
    #[arg(long)]
    start1: String,
    /// Walker A's end location id.
    #[arg(long)]
    end1: String,
    /// Walker B's start location id.
    #[arg(long)]
    start2: String,
    /// Walker B's end location id.
    #[arg(long)]
    end2: String,
    /// File to write the route map to.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_MAP_FILE, conflicts_with = "no_map")]
    map: PathBuf,
    /// Do not render a route map.
    #[arg(long)]
    no_map: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl From<RouteArgs> for RouteCommandArgs {
    fn from(args: RouteArgs) -> Self {
        RouteCommandArgs {
            locations: args.locations,
            walkers: WalkerPair::new(args.start1, args.end1, args.start2, args.end2),
            map: (!args.no_map).then_some(args.map),
            format: args.format,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Route(args) => handle_route_command(&args.into()),
        Command::Interactive { map } => handle_interactive_command(&map),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
