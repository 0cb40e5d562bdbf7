use anyhow::Result;
use clap::{Parser, Subcommand};

mod config;
mod gym_cmd;
mod reminders_cmd;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "liftcue",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LIFTCUE_BUILD_SHA"), ")"),
    about = "Gym and supplement reminders from plain sentences"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one command sentence, e.g. `liftcue say gym on mon and thu at 6pm`
    Say {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },

    /// List upcoming reminders (from the start of today)
    List {
        /// Include past reminders
        #[arg(long, default_value_t = false)]
        all: bool,
    },

    /// Show the current gym streak
    Streak,

    /// Flip a reminder between done and not done
    Toggle { id: i64 },

    /// Edit a reminder's label and/or time
    Edit {
        id: i64,

        #[arg(long)]
        label: Option<String>,

        /// Local time, "YYYY-MM-DD HH:MM"
        #[arg(long)]
        at: Option<String>,
    },

    /// Delete one reminder
    Delete { id: i64 },

    /// Delete every reminder
    Clear,

    /// Weekly gym sessions
    Gym {
        #[command(subcommand)]
        command: gym_cmd::GymCommand,
    },

    /// Config helpers (~/.liftcue/config.toml)
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("LIFTCUE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Say { words } => reminders_cmd::say(&words)?,
        Command::List { all } => reminders_cmd::list(all)?,
        Command::Streak => reminders_cmd::streak()?,
        Command::Toggle { id } => reminders_cmd::toggle(id)?,
        Command::Edit { id, label, at } => reminders_cmd::edit(id, label, at)?,
        Command::Delete { id } => reminders_cmd::delete(id)?,
        Command::Clear => reminders_cmd::clear()?,
        Command::Gym { command } => gym_cmd::run(command)?,
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}
