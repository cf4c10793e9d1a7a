use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use secrecy::Secret;
use snafu::ResultExt;
use validator::Validate;

use crate::client::moneris::Response;
use crate::repository::credit_card::CreateCreditCardArgs;
use crate::service::gateway::{
    provider::TransactionOptions,
    source::{CreditCard, Payment},
    Gateway,
};

use super::{
    error::{
        CmdError, DatabaseSnafu, GatewaySnafu, InvalidCardSnafu, OutputSnafu, StoreSnafu,
    },
    Context,
};

pub const AUTHORIZE: &str = "authorize";
pub const PURCHASE: &str = "purchase";
pub const CAPTURE: &str = "capture";
pub const VOID: &str = "void";
pub const CREDIT: &str = "credit";
pub const ADD_CARD: &str = "add-card";
pub const CREATE_PROFILE: &str = "create-profile";
pub const DISABLE_PROFILE: &str = "disable-profile";

fn amount_arg() -> Arg {
    Arg::new("amount")
        .long("amount")
        .help("amount in cents")
        .required(true)
        .value_parser(value_parser!(u64))
        .action(ArgAction::Set)
}

fn authorization_arg() -> Arg {
    Arg::new("authorization")
        .long("authorization")
        .help("reference returned by a previous authorize or purchase")
        .required(true)
        .action(ArgAction::Set)
}

fn order_id_arg() -> Arg {
    Arg::new("order-id")
        .long("order-id")
        .help("order id sent to moneris, generated when missing")
        .action(ArgAction::Set)
}

fn card_id_arg() -> Arg {
    Arg::new("card-id")
        .long("card-id")
        .help("id of the stored credit card")
        .required(true)
        .value_parser(value_parser!(i64))
        .action(ArgAction::Set)
}

/// Card details are never persisted, they have to be given for every raw card call.
fn card_detail_args(required: bool) -> Vec<Arg> {
    vec![
        Arg::new("number")
            .long("number")
            .required(required)
            .action(ArgAction::Set),
        Arg::new("month")
            .long("month")
            .required(required)
            .value_parser(value_parser!(u32))
            .action(ArgAction::Set),
        Arg::new("year")
            .long("year")
            .required(required)
            .value_parser(value_parser!(i32))
            .action(ArgAction::Set),
        Arg::new("name")
            .long("name")
            .required(required)
            .action(ArgAction::Set),
        Arg::new("cvv").long("cvv").action(ArgAction::Set),
    ]
}

pub fn authorize_command() -> Command {
    Command::new(AUTHORIZE)
        .about("authorize an amount on a card, using its stored token when it has one")
        .arg(amount_arg())
        .arg(card_id_arg())
        .arg(order_id_arg())
        .args(card_detail_args(false))
}

pub fn purchase_command() -> Command {
    Command::new(PURCHASE)
        .about("authorize and capture an amount in one step")
        .arg(amount_arg())
        .arg(card_id_arg())
        .arg(order_id_arg())
        .args(card_detail_args(false))
}

pub fn capture_command() -> Command {
    Command::new(CAPTURE)
        .about("capture a previous authorization")
        .arg(amount_arg())
        .arg(authorization_arg())
}

pub fn void_command() -> Command {
    Command::new(VOID)
        .about("void a pending transaction")
        .arg(authorization_arg())
        .arg(
            Arg::new("purchase-correction")
                .long("purchase-correction")
                .help("correct a same-day purchase or completion instead of releasing a preauth")
                .action(ArgAction::SetTrue),
        )
}

pub fn credit_command() -> Command {
    Command::new(CREDIT)
        .about("refund a captured transaction")
        .arg(amount_arg())
        .arg(authorization_arg())
}

pub fn add_card_command() -> Command {
    Command::new(ADD_CARD)
        .about("save a credit card and store it in the moneris vault")
        .args(card_detail_args(true))
        .arg(Arg::new("cc-type").long("cc-type").action(ArgAction::Set))
}

pub fn create_profile_command() -> Command {
    Command::new(CREATE_PROFILE)
        .about("store a saved credit card in the moneris vault")
        .arg(card_id_arg())
        .args(card_detail_args(false))
}

pub fn disable_profile_command() -> Command {
    Command::new(DISABLE_PROFILE)
        .about("remove a credit card from the moneris vault and delete it")
        .arg(card_id_arg())
}

fn required<T: Clone + Send + Sync + 'static>(
    matches: &ArgMatches,
    name: &str,
) -> Result<T, CmdError> {
    matches
        .get_one::<T>(name)
        .cloned()
        .ok_or_else(|| CmdError::MissingArgument {
            name: name.to_string(),
        })
}

fn options(matches: &ArgMatches) -> TransactionOptions {
    TransactionOptions {
        order_id: matches.try_get_one::<String>("order-id").ok().flatten().cloned(),
        purchase_correction: matches
            .try_get_one::<bool>("purchase-correction")
            .ok()
            .flatten()
            .copied()
            .unwrap_or_default(),
        ..Default::default()
    }
}

/// Overrides the stored card with the details given on the command line.
pub(crate) fn apply_card_details(card: &mut CreditCard, matches: &ArgMatches) {
    if let Some(number) = matches.get_one::<String>("number") {
        card.number = Secret::new(number.clone());
    }
    if let Some(month) = matches.get_one::<u32>("month") {
        card.month = *month;
    }
    if let Some(year) = matches.get_one::<i32>("year") {
        card.year = *year;
    }
    if let Some(name) = matches.get_one::<String>("name") {
        card.name = name.clone();
    }
    if let Some(cvv) = matches.get_one::<String>("cvv") {
        card.verification_value = Some(Secret::new(cvv.clone()));
    }
}

async fn load_card(ctx: &Context, matches: &ArgMatches) -> Result<CreditCard, CmdError> {
    let card_id = required::<i64>(matches, "card-id")?;
    let mut card = ctx.store.get_credit_card(card_id).await.context(StoreSnafu)?;
    apply_card_details(&mut card, matches);
    Ok(card)
}

fn print_response(response: &Response) -> Result<(), CmdError> {
    let output = serde_json::to_string_pretty(response).context(OutputSnafu)?;
    println!("{}", output);
    Ok(())
}

pub async fn run_authorize(ctx: &Context, matches: &ArgMatches) -> Result<(), CmdError> {
    let card = load_card(ctx, matches).await?;
    let response = ctx
        .gateway
        .authorize(required(matches, "amount")?, &card, &options(matches))
        .await
        .context(GatewaySnafu)?;
    print_response(&response)
}

pub async fn run_purchase(ctx: &Context, matches: &ArgMatches) -> Result<(), CmdError> {
    let card = load_card(ctx, matches).await?;
    let response = ctx
        .gateway
        .purchase(required(matches, "amount")?, &card, &options(matches))
        .await
        .context(GatewaySnafu)?;
    print_response(&response)
}

pub async fn run_capture(ctx: &Context, matches: &ArgMatches) -> Result<(), CmdError> {
    let authorization = required::<String>(matches, "authorization")?;
    let response = ctx
        .gateway
        .capture(
            required(matches, "amount")?,
            &authorization,
            &TransactionOptions::default(),
        )
        .await
        .context(GatewaySnafu)?;
    print_response(&response)
}

pub async fn run_void(ctx: &Context, matches: &ArgMatches) -> Result<(), CmdError> {
    let authorization = required::<String>(matches, "authorization")?;
    let response = ctx
        .gateway
        .void(&authorization, None, &options(matches))
        .await
        .context(GatewaySnafu)?;
    print_response(&response)
}

pub async fn run_credit(ctx: &Context, matches: &ArgMatches) -> Result<(), CmdError> {
    let authorization = required::<String>(matches, "authorization")?;
    let response = ctx
        .gateway
        .credit(
            required(matches, "amount")?,
            None,
            &authorization,
            &TransactionOptions::default(),
        )
        .await
        .context(GatewaySnafu)?;
    print_response(&response)
}

pub async fn run_add_card(ctx: &Context, matches: &ArgMatches) -> Result<(), CmdError> {
    let mut card = CreditCard {
        id: 0,
        number: Secret::new(required::<String>(matches, "number")?),
        month: required(matches, "month")?,
        year: required(matches, "year")?,
        name: required(matches, "name")?,
        cc_type: matches.get_one::<String>("cc-type").cloned(),
        verification_value: matches
            .get_one::<String>("cvv")
            .map(|cvv| Secret::new(cvv.clone())),
        gateway_customer_profile_id: None,
        gateway_payment_profile_id: None,
    };
    card.validate().context(InvalidCardSnafu)?;

    let last_digits = card.last_digits();
    let mut conn = ctx.db.acquire().await.context(DatabaseSnafu)?;
    let record = ctx
        .repo
        .create_credit_card(
            &mut conn,
            CreateCreditCardArgs {
                month: i32::try_from(card.month).unwrap_or_default(),
                year: card.year,
                name: &card.name,
                cc_type: card.cc_type.as_deref(),
                last_digits: last_digits.as_deref(),
            },
        )
        .await
        .context(DatabaseSnafu)?;
    card.id = record.id;
    tracing::info!(card_id = card.id, "credit card saved");

    create_profile(ctx, card).await
}

pub async fn run_create_profile(ctx: &Context, matches: &ArgMatches) -> Result<(), CmdError> {
    let card = load_card(ctx, matches).await?;
    card.validate().context(InvalidCardSnafu)?;
    create_profile(ctx, card).await
}

async fn create_profile(ctx: &Context, card: CreditCard) -> Result<(), CmdError> {
    let mut payment = Payment {
        number: format!("CARD-{}", card.id),
        source: card,
    };
    match ctx
        .gateway
        .create_profile(&mut payment)
        .await
        .context(GatewaySnafu)?
    {
        Some(response) => print_response(&response),
        None => {
            println!(
                "credit card {} already has a profile",
                payment.source.id
            );
            Ok(())
        }
    }
}

pub async fn run_disable_profile(ctx: &Context, matches: &ArgMatches) -> Result<(), CmdError> {
    let mut card = load_card(ctx, matches).await?;
    match ctx
        .gateway
        .disable_customer_profile(&mut card)
        .await
        .context(GatewaySnafu)?
    {
        Some(response) => print_response(&response),
        None => {
            println!("credit card {} deleted", card.id);
            Ok(())
        }
    }
}
