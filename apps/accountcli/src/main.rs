// apps/accountcli/src/main.rs

use account_lib::{AccountConfig, AccountService, Principal};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::process;
use tracing_subscriber::EnvFilter;

const EXIT_FATAL: i32 = 1;
const EXIT_UNSATISFIED: i32 = 2;

fn cli() -> Command {
    Command::new("accountcli")
        .about("Show the signed-in account and check its authorities")
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("URL")
                .help("Server base URL (overrides ACCOUNT_API_URL)"),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .value_name("TOKEN")
                .help("Bearer token (overrides ACCOUNT_API_TOKEN)"),
        )
        .arg(
            Arg::new("authority")
                .long("authority")
                .short('a')
                .value_name("ROLE")
                .action(ArgAction::Append)
                .help("Authority the account must hold; repeatable"),
        )
        .arg(
            Arg::new("any")
                .long("any")
                .action(ArgAction::SetTrue)
                .help("Require any of the given authorities instead of all"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the account as JSON (null when anonymous)"),
        )
}

fn config_from(matches: &ArgMatches) -> AccountConfig {
    let mut config = AccountConfig::from_env();
    if let Some(url) = matches.get_one::<String>("url") {
        config.base_url = url.clone();
    }
    if let Some(token) = matches.get_one::<String>("token") {
        config = config.with_token(token.clone());
    }
    config
}

fn required_authorities(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>("authority")
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn describe(account: Option<&Principal>) -> String {
    match account {
        None => "anonymous".to_string(),
        Some(principal) => {
            let login = principal.login.as_deref().unwrap_or("-");
            let authorities = if principal.authorities.is_empty() {
                "(none)".to_string()
            } else {
                principal.authorities.join(", ")
            };
            format!(
                "login: {}\nname: {}\nauthorities: {}",
                login,
                principal.display_name(),
                authorities
            )
        }
    }
}

fn render(account: Option<&Principal>, json: bool) -> serde_json::Result<String> {
    if json {
        serde_json::to_string_pretty(&account)
    } else {
        Ok(describe(account))
    }
}

fn satisfied(service: &AccountService, required: &[String], any: bool) -> bool {
    if required.is_empty() {
        return true;
    }
    if any {
        service.has_any_authority(required)
    } else {
        required.iter().all(|role| service.has_authority(role))
    }
}

async fn run(matches: &ArgMatches) -> Result<bool, Box<dyn std::error::Error>> {
    let config = config_from(matches);
    tracing::info!(url = %config.account_url(), "resolving current account");

    let service = AccountService::from_config(config)?;
    let account = service.identity().await;
    println!("{}", render(account.as_ref(), matches.get_flag("json"))?);

    let required = required_authorities(matches);
    let any = matches.get_flag("any");
    let ok = satisfied(&service, &required, any);
    if !required.is_empty() {
        println!(
            "{} {} of [{}]",
            if ok { "has" } else { "missing" },
            if any { "any" } else { "all" },
            required.join(", ")
        );
    }
    Ok(ok)
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&matches).await {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_UNSATISFIED),
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            process::exit(EXIT_FATAL);
        }
    }
}
