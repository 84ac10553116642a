use clap::{Arg, ArgAction, ArgMatches, Command};
use localize::{LocaleRegistry, LocalizeConfig, Localizer};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let dir = Arg::new("dir")
        .long("dir")
        .short('d')
        .help("Directory containing <locale>.json dictionaries (default: $LOCALIZE_DIR or ./locales)");
    let encoding = Arg::new("encoding")
        .long("encoding")
        .short('e')
        .help("Dictionary file encoding (default: utf-8)");

    Command::new("localize")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render and check control-symbol localization dictionaries")
        .subcommand_required(true)
        .subcommand(
            Command::new("render")
                .about("Render one message")
                .arg(
                    Arg::new("key")
                        .help("Message key to render")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("substitutions")
                        .help("Placeholder values as name=value")
                        .index(2)
                        .num_args(0..)
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("locale")
                        .long("locale")
                        .short('l')
                        .help("Force a locale instead of detecting it from the environment"),
                )
                .arg(
                    Arg::new("default-locale")
                        .long("default-locale")
                        .help("Locale used when the requested one has no dictionary (default: en)"),
                )
                .arg(dir.clone())
                .arg(encoding.clone()),
        )
        .subcommand(
            Command::new("check")
                .about("Load dictionaries and report load failures and authoring warnings")
                .arg(
                    Arg::new("locales")
                        .help("Locales to check (default: $LOCALIZE_LOCALES)")
                        .index(1)
                        .num_args(0..)
                        .action(ArgAction::Append),
                )
                .arg(dir)
                .arg(encoding),
        )
}

fn apply_common(mut config: LocalizeConfig, matches: &ArgMatches) -> LocalizeConfig {
    if let Some(dir) = matches.get_one::<String>("dir") {
        config = config.with_dictionary_dir(dir);
    }
    if let Some(encoding) = matches.get_one::<String>("encoding") {
        config.encoding = encoding.clone();
    }
    config
}

fn parse_substitutions(matches: &ArgMatches) -> Result<HashMap<String, String>, String> {
    matches
        .get_many::<String>("substitutions")
        .into_iter()
        .flatten()
        .map(|pair| {
            pair.split_once('=')
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .ok_or_else(|| format!("Expected name=value, got '{}'", pair))
        })
        .collect()
}

async fn render(config: LocalizeConfig, matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let key = matches
        .get_one::<String>("key")
        .ok_or("Missing message key")?;
    let substitutions = parse_substitutions(matches)?;

    let mut config = apply_common(config, matches);
    if let Some(locale) = matches.get_one::<String>("locale") {
        config = config.with_forced_locale(Some(locale));
    }
    if let Some(locale) = matches.get_one::<String>("default-locale") {
        config = config.with_default_locale(locale);
    }

    let localizer = Localizer::from_config(&config).await;
    if !localizer.is_ready() {
        return Err(format!(
            "No dictionary could be loaded from {}",
            config.dictionary_dir.display()
        )
        .into());
    }

    println!("{}", localizer.get(key, &substitutions));
    Ok(())
}

async fn check(config: LocalizeConfig, matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = apply_common(config, matches);
    if let Some(locales) = matches.get_many::<String>("locales") {
        let locales: Vec<&str> = locales.map(String::as_str).collect();
        config = config.with_locales(&locales);
    }

    let registry = LocaleRegistry::from_config(&config).await;

    let mut failed = 0;
    for outcome in registry.outcomes() {
        match &outcome.error {
            None => {
                let messages = registry
                    .dictionary(&outcome.locale)
                    .map(|d| d.len())
                    .unwrap_or(0);
                println!(
                    "✅ {}: {} messages, {} warnings",
                    outcome.locale,
                    messages,
                    outcome.warnings.len()
                );
                for warning in &outcome.warnings {
                    println!("   ⚠️  {}", warning);
                }
            }
            Some(error) => {
                failed += 1;
                println!("❌ {}: {}", outcome.locale, error);
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} locale(s) failed to load", failed).into());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let config = LocalizeConfig::from_env();
    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("render", sub)) => render(config, sub).await,
        Some(("check", sub)) => check(config, sub).await,
        _ => Err("Unknown subcommand".into()),
    }
}
