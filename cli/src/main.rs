use clap::{Parser, Subcommand};
use rezwatch_cli::{CliContext, commands, logging, readline};
use std::io::Write;

fn main() -> Result<(), String> {
    let _log_guard = logging::init();
    let mut ctx = CliContext::new();

    while let Some(line) = readline()? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &mut ctx) {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "rezwatch")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a TOML scenario file
    Load {
        #[arg(short, long)]
        path: String,
    },
    /// Advance the pipeline
    Tick {
        #[arg(short, long, default_value_t = 1)]
        count: u32,
    },
    /// Run the rest of the loaded scenario
    Run,
    /// Show tracked actors and their highlights
    Show,
    /// Describe one actor's render output
    Inspect {
        #[arg(short, long)]
        name: String,
    },
    /// Force a synthetic state (or `off`)
    TestMode {
        #[arg(short, long)]
        state: String,
    },
    /// List monitored (or ignored) statuses
    Statuses {
        #[arg(short, long, default_value = "")]
        filter: String,
        #[arg(short, long)]
        disabled: bool,
    },
    /// Move a status between the monitored and ignored lists
    Swap {
        #[arg(short, long)]
        id: u32,
    },
    EnableAll,
    DisableAll,
    Config,
    Save,
    Exit,
}

fn respond(line: &str, ctx: &mut CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "rezwatch".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Load { path }) => commands::load_scenario(path, ctx)?,
        Some(Commands::Tick { count }) => {
            commands::tick(ctx, *count)?;
        }
        Some(Commands::Run) => commands::run(ctx)?,
        Some(Commands::Show) => commands::show(ctx),
        Some(Commands::Inspect { name }) => commands::inspect(name, ctx)?,
        Some(Commands::TestMode { state }) => commands::set_test_mode(state, ctx)?,
        Some(Commands::Statuses { filter, disabled }) => {
            commands::list_statuses(ctx, filter, *disabled)
        }
        Some(Commands::Swap { id }) => commands::swap_status(*id, ctx)?,
        Some(Commands::EnableAll) => commands::enable_all(ctx),
        Some(Commands::DisableAll) => commands::disable_all(ctx),
        Some(Commands::Config) => commands::show_config(ctx)?,
        Some(Commands::Save) => commands::save(ctx)?,
        Some(Commands::Exit) => {
            commands::exit()?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
