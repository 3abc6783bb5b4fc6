use anyhow::{Context, Result};
use kitchen_prep::aggregation::ShoppingListEngine;
use kitchen_prep::config::AppConfig;
use kitchen_prep::observability;
use kitchen_prep::shopping_list::{to_json, to_plain_text};
use std::env;
use std::fs;
use tracing::info;

const USAGE: &str = "usage: kitchen-prep <recipes.json> <order_counts.json> [--json]";

#[derive(Debug)]
struct CliArgs {
    recipes_path: String,
    order_counts_path: String,
    json_output: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let json_output = args.iter().any(|arg| arg == "--json");
    let paths: Vec<&String> = args.iter().filter(|arg| !arg.starts_with("--")).collect();

    match paths.as_slice() {
        [recipes_path, order_counts_path] => Ok(CliArgs {
            recipes_path: recipes_path.to_string(),
            order_counts_path: order_counts_path.to_string(),
            json_output,
        }),
        _ => Err(anyhow::anyhow!(USAGE)),
    }
}

fn main() -> Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    config.validate()?;

    observability::init_tracing_with_config(&config.observability)?;
    info!("{}", config.summary());

    let args: Vec<String> = env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    let recipes_json = fs::read_to_string(&cli.recipes_path)
        .with_context(|| format!("Failed to read recipes from {}", cli.recipes_path))?;
    let order_counts_json = fs::read_to_string(&cli.order_counts_path)
        .with_context(|| format!("Failed to read order counts from {}", cli.order_counts_path))?;

    let engine = ShoppingListEngine::from_app_config(&config)?;
    let sections = engine.shopping_list_from_json(&recipes_json, &order_counts_json)?;

    if cli.json_output {
        println!("{}", to_json(&sections)?);
    } else {
        println!("{}", to_plain_text(&sections));
    }

    Ok(())
}
