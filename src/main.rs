use clap::Parser;
use color_eyre::Result;
use pocket::{
    Config, MemoryStore, Profile, Responder, SqliteStore, Workspace, WorkspaceOptions,
    cli::{self, Cli, Commands},
    logging::init_logging,
    storage::KeyValueStore,
};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    // An explicit --config file is read as-is; otherwise the profile's file is used
    let config = match &cli.config {
        Some(path) => Config::load_from_path(Path::new(path))?,
        None => Config::load_with_profile(profile)?,
    };

    init_logging(&config.log_level, cli.verbose);

    let kv: Arc<dyn KeyValueStore> = if cli.ephemeral {
        debug!("using in-memory storage");
        Arc::new(MemoryStore::new())
    } else {
        let db_path = config.get_database_path();
        debug!(path = %db_path.display(), "opening database");
        Arc::new(SqliteStore::new(db_path.to_str().ok_or_else(|| {
            color_eyre::eyre::eyre!("Database path contains invalid UTF-8")
        })?)?)
    };

    let mut workspace = Workspace::open(
        kv,
        WorkspaceOptions {
            seed_demo_inbox: config.inbox.seed_demo_messages,
            history_limit: config.assistant.history_limit,
        },
    );

    let delays = config.assistant.delays();
    let mut responder = match config.assistant.rng_seed {
        Some(seed) => Responder::seeded(seed, delays),
        None => Responder::from_entropy(delays),
    };

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Task(command) => cli::handle_task(command, &mut workspace)?,
        Commands::Event(command) => cli::handle_event(command, &mut workspace)?,
        Commands::Mail(command) => cli::handle_mail(command, &mut workspace)?,
        Commands::Doc(command) => cli::handle_doc(command, &mut workspace, &mut responder)?,
        Commands::Ask { text } => {
            cli::handle_ask(&text.join(" "), &mut workspace, &mut responder)?;
        }
        Commands::History { clear } => cli::handle_history(clear, &mut workspace)?,
        Commands::Draft { topic, tone } => cli::handle_draft(&topic, tone, &mut responder),
        Commands::Optimize => cli::handle_optimize(&workspace, &mut responder),
        Commands::Dashboard => cli::handle_dashboard(&workspace),
        Commands::Profile(command) => cli::handle_profile(command, &mut workspace)?,
        Commands::Reset { yes } => cli::handle_reset(yes, &mut workspace)?,
    }

    Ok(())
}
