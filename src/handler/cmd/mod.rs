pub mod command;
pub mod db;
pub mod error;
pub mod payment;

use clap::ArgMatches;
use snafu::ResultExt;
use sqlx::{Pool, Postgres};

use crate::client::{moneris::MonerisClient, postgres};
use crate::config::Settings;
use crate::repository::db::Repository;
use crate::service::gateway::{
    moneris::MonerisGateway, reporter::LogEntryReporter, source::PgSourceStore,
};

use self::error::{CmdError, ConfigSnafu, DatabaseSnafu, GatewaySnafu};

pub type CliGateway = MonerisGateway<MonerisClient, PgSourceStore, LogEntryReporter>;

pub struct Context {
    pub db: Pool<Postgres>,
    pub repo: Repository,
    pub store: PgSourceStore,
    pub gateway: CliGateway,
}

impl Context {
    pub async fn build(cfg: Settings) -> Result<Self, CmdError> {
        let db = postgres::new_pg_pool(&cfg.db.dsn)
            .await
            .context(DatabaseSnafu)?;
        let repo = Repository::new();
        let store = PgSourceStore::new(db.clone(), repo.clone());
        let reporter = LogEntryReporter::new(db.clone(), repo.clone());
        let gateway =
            MonerisGateway::new(cfg.moneris, store.clone(), reporter).context(GatewaySnafu)?;
        Ok(Context {
            db,
            repo,
            store,
            gateway,
        })
    }
}

pub async fn run(matches: ArgMatches) -> Result<(), CmdError> {
    let cfg = Settings::new().context(ConfigSnafu)?;
    let ctx = Context::build(cfg).await?;

    match matches.subcommand() {
        Some((payment::AUTHORIZE, sub)) => payment::run_authorize(&ctx, sub).await,
        Some((payment::PURCHASE, sub)) => payment::run_purchase(&ctx, sub).await,
        Some((payment::CAPTURE, sub)) => payment::run_capture(&ctx, sub).await,
        Some((payment::VOID, sub)) => payment::run_void(&ctx, sub).await,
        Some((payment::CREDIT, sub)) => payment::run_credit(&ctx, sub).await,
        Some((payment::ADD_CARD, sub)) => payment::run_add_card(&ctx, sub).await,
        Some((payment::CREATE_PROFILE, sub)) => payment::run_create_profile(&ctx, sub).await,
        Some((payment::DISABLE_PROFILE, sub)) => payment::run_disable_profile(&ctx, sub).await,
        Some((db::MIGRATE, _)) => db::run_migrate(&ctx).await,
        Some((db::LOG_ENTRIES, sub)) => db::run_log_entries(&ctx, sub).await,
        Some((name, _)) => Err(CmdError::UnknownCommand {
            name: name.to_string(),
        }),
        None => Err(CmdError::MissingArgument {
            name: "command".to_string(),
        }),
    }
}
