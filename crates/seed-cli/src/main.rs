use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use seed_catalog::SeedCatalog;
use seed_core::{ProvisionResult, ProvisioningPipeline};
use seed_store::{EntityType, InMemoryStore, Record};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod render;

fn cli() -> Command {
    Command::new("seedbed")
        .version(seed_core::VERSION)
        .about("Idempotent, staged provisioning of demo records")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Pipeline configuration (TOML)"),
        )
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Seed catalog (TOML); defaults to the built-in dataset"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print results as JSON"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(["text", "json"])
                .help("Log output format"),
        )
        .subcommand(
            Command::new("run")
                .about("Create every missing catalog record")
                .arg(repeat_arg()),
        )
        .subcommand(
            Command::new("reset")
                .about("Delete all provisioned records, then run")
                .arg(repeat_arg()),
        )
        .subcommand(Command::new("catalog").about("Show the seed catalog"))
}

fn repeat_arg() -> Arg {
    Arg::new("repeat")
        .long("repeat")
        .default_value("1")
        .value_parser(value_parser!(u32).range(1..))
        .help("Run the operation n times against the same store")
}

fn init_tracing(format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_catalog(matches: &ArgMatches) -> Result<SeedCatalog> {
    let catalog = match matches.get_one::<PathBuf>("catalog") {
        Some(path) => SeedCatalog::from_toml_file(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => SeedCatalog::standard(),
    };
    catalog.validate().context("validating catalog")?;
    Ok(catalog)
}

/// Store holding the accounts the pipeline expects to exist
fn demo_store() -> Result<InMemoryStore> {
    let store = InMemoryStore::new();
    for user in seed_catalog::demo_accounts() {
        let email = user.email.clone();
        store
            .insert_now(Record::User(user))
            .with_context(|| format!("creating demo account {email}"))?;
    }
    Ok(store)
}

async fn provision(args: &ArgMatches, reset: bool) -> Result<bool> {
    let repeat = *args.get_one::<u32>("repeat").unwrap_or(&1);
    let json = args.get_flag("json");

    let store = demo_store()?;
    let pipeline = ProvisioningPipeline::load(
        Arc::new(store.clone()),
        args.get_one::<PathBuf>("catalog").map(PathBuf::as_path),
        args.get_one::<PathBuf>("config").map(PathBuf::as_path),
    )
    .context("loading pipeline")?;

    let mut results: Vec<ProvisionResult> = Vec::new();
    for pass in 1..=repeat {
        tracing::info!("Pass {} of {}", pass, repeat);
        let result = if reset {
            pipeline.reset_and_run_provisioning().await
        } else {
            pipeline.run_provisioning().await
        };
        if !json {
            render::print_result(pass, &result);
        }
        results.push(result);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        render::print_counts(&store.counts());
    }

    Ok(results.last().is_some_and(|r| r.success))
}

fn show_catalog(matches: &ArgMatches) -> Result<()> {
    let catalog = load_catalog(matches)?;
    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
    } else {
        println!("Seed catalog {}", catalog.version);
        for entity in EntityType::ALL {
            if entity == EntityType::User {
                continue;
            }
            println!("  {:<16} {}", entity.table_name(), catalog.entry_count(entity));
        }
        println!("  {:<16} {}", "total", catalog.total_entries());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let Some((command, args)) = matches.subcommand() else {
        return Ok(());
    };
    // global flags are propagated into the subcommand matches
    let log_format = args
        .get_one::<String>("log-format")
        .map_or("text", String::as_str);
    init_tracing(log_format);

    let ok = match command {
        "run" => provision(args, false).await?,
        "reset" => provision(args, true).await?,
        "catalog" => {
            show_catalog(args)?;
            true
        }
        _ => true,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
