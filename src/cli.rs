use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::debug;
use serde::Serialize;
use uphold::oauth::{configure_oauth, Credential, Permission};
use uphold::types::Card;
use uphold::{Client, Config, Currency};
use url::Url;

pub fn build_cli() -> Command {
    Command::new("uphold")
        .about("Command line client for the Uphold API")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .num_args(1)
                .global(true)
                .help("Override RUST_LOG level (e.g., info, debug)"),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .help("Print version and exit")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("ticker")
                .about("Show exchange rates, optionally for one currency")
                .arg(Arg::new("currency").num_args(1)),
        )
        .subcommand(
            Command::new("accounts")
                .about("List linked accounts or show one")
                .arg(Arg::new("id").num_args(1)),
        )
        .subcommand(
            Command::new("cards")
                .about("List cards or show one")
                .arg(Arg::new("id").num_args(1)),
        )
        .subcommand(
            Command::new("contacts")
                .about("List contacts or show one")
                .arg(Arg::new("id").num_args(1)),
        )
        .subcommand(
            Command::new("transactions")
                .about("List the user's transactions")
                .arg(
                    Arg::new("card")
                        .long("card")
                        .num_args(1)
                        .help("Only transactions of this card"),
                )
                .arg(
                    Arg::new("public")
                        .long("public")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("card")
                        .help("Public reserve transactions instead"),
                ),
        )
        .subcommand(
            Command::new("authorize-url")
                .about("Print the OAuth authorization URL")
                .arg(Arg::new("client-id").long("client-id").num_args(1).required(true))
                .arg(Arg::new("redirect-url").long("redirect-url").num_args(1))
                .arg(
                    Arg::new("scope")
                        .long("scope")
                        .num_args(1)
                        .action(ArgAction::Append)
                        .help("OAuth scope such as cards:read; repeatable"),
                )
                .arg(Arg::new("state").long("state").num_args(1).default_value(""))
                .arg(
                    Arg::new("sandbox")
                        .long("sandbox")
                        .action(ArgAction::SetTrue)
                        .help("Use the sandbox authorization endpoint"),
                ),
        )
}

pub fn init_logging(level: Option<&str>) {
    // Explicit level wins, then RUST_LOG, then info. Logs go to stderr.
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(lvl) = level {
        builder.parse_filters(lvl);
    }
    builder.init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn arg<'a>(m: &'a ArgMatches, name: &str) -> Option<&'a str> {
    m.get_one::<String>(name).map(String::as_str)
}

pub async fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let mut cfg = Config::from_env().context("invalid UPHOLD_* URL")?;

    let Some((name, sub)) = matches.subcommand() else {
        build_cli().print_help()?;
        return Ok(());
    };

    if name == "authorize-url" {
        if sub.get_flag("sandbox") {
            cfg = cfg.use_sandbox();
        }
        return authorize_url(cfg, sub);
    }

    let client = Client::new(cfg)?;
    match name {
        "ticker" => match arg(sub, "currency") {
            Some(code) => {
                let currency: Currency = code.parse()?;
                let (pairs, _) = client.ticker().for_currency(currency).await?;
                print_json(&pairs)?;
            }
            None => print_json(&client.ticker().list_all().await?.0)?,
        },
        "accounts" => match arg(sub, "id") {
            Some(id) => print_json(&client.accounts().get(id).await?.0)?,
            None => print_json(&client.accounts().list_all().await?.0)?,
        },
        "cards" => match arg(sub, "id") {
            Some(id) => print_json(&client.cards().get(id).await?.0)?,
            None => print_json(&client.cards().list_all().await?.0)?,
        },
        "contacts" => match arg(sub, "id") {
            Some(id) => print_json(&client.contacts().get(id).await?.0)?,
            None => print_json(&client.contacts().list_all().await?.0)?,
        },
        "transactions" => {
            let txns = client.transactions();
            let (list, _) = if sub.get_flag("public") {
                txns.list_public().await?
            } else if let Some(id) = arg(sub, "card") {
                let card = Card {
                    id: Some(id.to_string()),
                    ..Card::default()
                };
                txns.list_for_card(&card).await?
            } else {
                txns.list_for_user().await?
            };
            print_json(&list)?;
        }
        other => anyhow::bail!("unknown command: {}", other),
    }

    debug!("rate after call: {:?}", client.rate());
    Ok(())
}

fn authorize_url(cfg: Config, sub: &ArgMatches) -> anyhow::Result<()> {
    let scopes = sub
        .get_many::<String>("scope")
        .into_iter()
        .flatten()
        .map(|s| Permission::from_scope(s).with_context(|| format!("unknown scope: {}", s)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let redirect_url = arg(sub, "redirect-url")
        .map(Url::parse)
        .transpose()
        .context("invalid --redirect-url")?;

    let credential = Credential {
        client_id: arg(sub, "client-id").unwrap_or_default().to_string(),
        client_secret: std::env::var("UPHOLD_CLIENT_SECRET").unwrap_or_default(),
    };
    let client = Client::new(cfg)?;
    let oauth = configure_oauth(credential, client.terminals(redirect_url), &scopes);
    println!("{}", oauth.authorize_url(arg(sub, "state").unwrap_or_default()));
    Ok(())
}
