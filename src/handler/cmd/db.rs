use clap::{Arg, ArgAction, ArgMatches, Command};
use snafu::ResultExt;

use super::{
    error::{CmdError, DatabaseSnafu, MigrateSnafu, MissingArgumentSnafu, OutputSnafu},
    Context,
};

pub const MIGRATE: &str = "migrate";
pub const LOG_ENTRIES: &str = "log-entries";

pub fn migrate_command() -> Command {
    Command::new(MIGRATE).about("run database migrations")
}

pub fn log_entries_command() -> Command {
    Command::new(LOG_ENTRIES)
        .about("list failed gateway calls recorded for an operation")
        .arg(
            Arg::new("operation")
                .long("operation")
                .help("gateway operation, e.g. void or create_profile")
                .required(true)
                .action(ArgAction::Set),
        )
}

pub async fn run_migrate(ctx: &Context) -> Result<(), CmdError> {
    sqlx::migrate!("./migrations")
        .run(&ctx.db)
        .await
        .context(MigrateSnafu)?;
    tracing::info!("migrations applied");
    Ok(())
}

pub async fn run_log_entries(ctx: &Context, matches: &ArgMatches) -> Result<(), CmdError> {
    let operation = matches
        .get_one::<String>("operation")
        .ok_or_else(|| MissingArgumentSnafu { name: "operation" }.build())?;
    let entries = ctx
        .repo
        .get_log_entries_by_operation(&ctx.db, operation)
        .await
        .context(DatabaseSnafu)?;
    let output = serde_json::to_string_pretty(&entries).context(OutputSnafu)?;
    println!("{}", output);
    Ok(())
}
