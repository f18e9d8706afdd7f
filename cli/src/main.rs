mod bridge;
mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;
use tracing_subscriber::EnvFilter;

use crate::bridge::TerminalBridge;
use crate::commands::{
    SettingsArgs, cmd_audit, cmd_button, cmd_menu, cmd_settings_set, cmd_settings_show,
    cmd_shop_check_all, cmd_shop_export, cmd_shop_list, cmd_shop_reset, cmd_shop_select,
    cmd_shop_toggle, cmd_shop_undo, cmd_tab, cmd_week,
};
use crate::config::Config;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "FAMENU_LOG";

#[derive(Parser)]
#[command(
    name = "famenu",
    version,
    about = "A four-week rotating dinner menu with a shared shopping checklist"
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current week of the cycle, or the nearest week with a given number
    Week {
        /// Week of the cycle (1-4)
        #[arg(short, long)]
        index: Option<u8>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the dinner menu
    Menu {
        /// Week of the cycle (1-4, default: the tracked week)
        #[arg(short, long)]
        week: Option<u8>,
        /// Single day: 1-7, mon-sun, or today
        #[arg(short, long)]
        day: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Work with the shopping checklist
    Shop {
        #[command(subcommand)]
        command: ShopCommands,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Switch the current tab (menu or shopping)
    Tab {
        /// menu or shopping
        tab: String,
    },
    /// Show the primary action for the current tab, or press it
    Button {
        /// Run the action instead of only showing it
        #[arg(long)]
        press: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List dishes and ingredient ids the catalog cannot resolve
    Audit {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ShopCommands {
    /// Show the shopping list grouped by category
    List {
        /// Week of the cycle (1-4, default: the shopping week)
        #[arg(short, long)]
        week: Option<u8>,
        /// Only show items not yet bought
        #[arg(long)]
        pending: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark or unmark one item by ingredient id
    Toggle {
        /// Ingredient id (e.g. chicken-breast)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark every item on the list as bought
    CheckAll {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear every mark on the list
    Reset {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Revert the last check-all or reset (within a few seconds)
    Undo {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pin the shopping list to a week (1-4), or `current` to follow the calendar
    Select {
        week: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the list as CSV to stdout
    Export {
        /// Week of the cycle (1-4, default: the shopping week)
        #[arg(short, long)]
        week: Option<u8>,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show all settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change one or more settings
    Set {
        /// ISO week the cycle starts on (1-53)
        #[arg(long)]
        base_week: Option<i32>,
        /// Interface language: ru or en
        #[arg(long)]
        language: Option<String>,
        /// Show week navigation
        #[arg(long)]
        navigation: Option<bool>,
        /// Enable household sync
        #[arg(long)]
        sync: Option<bool>,
        /// Household id shown in settings
        #[arg(long)]
        household: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let mut service = config.open_service();
    service.initialize();

    match cli.command {
        Commands::Week { index, json } => cmd_week(&service, index, json),
        Commands::Menu { week, day, json } => cmd_menu(&service, week, day.as_deref(), json),
        Commands::Shop { command } => match command {
            ShopCommands::List {
                week,
                pending,
                json,
            } => cmd_shop_list(&service, week, pending, json),
            ShopCommands::Toggle { id, json } => cmd_shop_toggle(&mut service, &id, json),
            ShopCommands::CheckAll { json } => cmd_shop_check_all(&mut service, json),
            ShopCommands::Reset { yes, json } => {
                let mut host = TerminalBridge::new(yes);
                cmd_shop_reset(&mut service, &mut host, json)
            }
            ShopCommands::Undo { json } => cmd_shop_undo(&mut service, json),
            ShopCommands::Select { week, json } => cmd_shop_select(&mut service, &week, json),
            ShopCommands::Export { week } => cmd_shop_export(&service, week),
        },
        Commands::Settings { command } => match command {
            SettingsCommands::Show { json } => cmd_settings_show(&service, json),
            SettingsCommands::Set {
                base_week,
                language,
                navigation,
                sync,
                household,
                json,
            } => cmd_settings_set(
                &mut service,
                SettingsArgs {
                    base_week,
                    language,
                    navigation,
                    sync,
                    household,
                },
                json,
            ),
        },
        Commands::Tab { tab } => cmd_tab(&mut service, &tab),
        Commands::Button { press, json } => {
            let mut host = TerminalBridge::new(false);
            cmd_button(&mut service, &mut host, press, json)
        }
        Commands::Audit { json } => cmd_audit(&service, json),
    }
}
