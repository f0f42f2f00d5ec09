use clap::{Parser, Subcommand};
use microhabit_core::CalendarDay;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "microhabit", version, about = "MicroHabit CLI")]
struct Cli {
    /// Treat this day as today (YYYY-MM-DD) instead of the local date
    #[arg(long, global = true)]
    today: Option<CalendarDay>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Mark a habit complete for today
    Done {
        /// Habit id or name
        habit: String,
    },
    /// Undo today's completion of a habit
    Undo {
        /// Habit id or name
        habit: String,
    },
    /// Today's checklist
    Today {
        /// Print JSON instead of a checklist
        #[arg(long)]
        json: bool,
    },
    /// Progress statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Month calendar of completions
    Calendar {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,
    },
    /// Backup and restore
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a motivational message
    Motivate {
        /// Name to address
        #[arg(long)]
        name: Option<String>,
    },
    /// Send enabled reminders and summaries
    Remind {
        /// Send the daily reminder even before the configured time
        #[arg(long)]
        force: bool,
    },
    /// Show this week's insight
    Insight,
    /// Suggest new habits
    Suggest,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MICROHABIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let clock = commands::CliClock::from_override(cli.today);
    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action, clock),
        Commands::Done { habit } => commands::progress::done(&habit, clock),
        Commands::Undo { habit } => commands::progress::undo(&habit, clock),
        Commands::Today { json } => commands::progress::today(json, clock),
        Commands::Stats { action } => commands::stats::run(action, clock),
        Commands::Calendar { year, month } => commands::stats::calendar(year, month, clock),
        Commands::Data { action } => commands::data::run(action, clock),
        Commands::Config { action } => commands::config::run(action),
        Commands::Motivate { name } => commands::progress::motivate(name.as_deref(), clock),
        Commands::Remind { force } => commands::progress::remind(force, clock),
        Commands::Insight => commands::progress::insight(clock),
        Commands::Suggest => commands::progress::suggest(clock),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
