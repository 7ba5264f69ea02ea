use std::process::ExitCode;
use std::sync::Arc;

use env_logger::{Builder, Env};
use log::{error, info};

use portfolio_tracker_core::config::AppConfig;
use portfolio_tracker_core::models::asset::NewAsset;
use portfolio_tracker_core::models::chart::RenderedView;
use portfolio_tracker_core::models::snapshot::PortfolioSnapshot;
use portfolio_tracker_core::notify::{Notice, Notifier};
use portfolio_tracker_core::services::chart_service::format_money;
use portfolio_tracker_core::PortfolioTracker;

const USAGE: &str = "\
usage:
  portfolio-tracker [show]                 print holdings, allocation and performance
  portfolio-tracker json                   print the rendered view as JSON
  portfolio-tracker add <SYMBOL> <QUANTITY> <TYPE> [--name <NAME>] [--price <PRICE>]";

#[derive(Debug, PartialEq)]
enum Command {
    Show,
    Json,
    Add(NewAsset),
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    match args.first().map(String::as_str) {
        None | Some("show") => Ok(Command::Show),
        Some("json") => Ok(Command::Json),
        Some("add") => parse_add(&args[1..]).map(Command::Add),
        Some(other) => Err(format!("unknown command '{other}'")),
    }
}

fn parse_add(args: &[String]) -> Result<NewAsset, String> {
    let mut positional = Vec::new();
    let mut name = String::new();
    let mut purchase_price = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--name" => {
                name = iter.next().ok_or("--name needs a value")?.clone();
            }
            "--price" => {
                let raw = iter.next().ok_or("--price needs a value")?;
                let price: f64 = raw
                    .parse()
                    .map_err(|_| format!("invalid purchase price '{raw}'"))?;
                purchase_price = Some(price);
            }
            _ => positional.push(arg.clone()),
        }
    }

    let [symbol, quantity, asset_type] = positional.as_slice() else {
        return Err("add expects <SYMBOL> <QUANTITY> <TYPE>".into());
    };
    let quantity: f64 = quantity
        .parse()
        .map_err(|_| format!("invalid quantity '{quantity}'"))?;

    Ok(NewAsset {
        symbol: symbol.clone(),
        name,
        quantity,
        asset_type: asset_type.clone(),
        purchase_price,
    })
}

/// Shows user-facing notices on stderr.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Progress {
                operation,
                attempt,
                max_attempts,
            } => {
                if attempt > 1 {
                    eprintln!("{operation}... retrying ({attempt}/{max_attempts})");
                }
            }
            Notice::Error(message) => eprintln!("error: {message}"),
            Notice::Success(message) => eprintln!("{message}"),
        }
    }
}

fn print_view(snapshot: &PortfolioSnapshot, view: &RenderedView) {
    println!(
        "{:<24} {:>10} {:>14} {:>12} {:>20} {:<10}",
        "Asset", "Quantity", "Market Value", "Price", "Gain", "Type"
    );
    for row in &view.rows {
        let asset = format!("{} {}", row.symbol, row.name);
        let gain = format!("{} {}", row.gain_percent, row.gain_value);
        println!(
            "{:<24} {:>10} {:>14} {:>12} {:>20} {:<10}",
            asset, row.quantity, row.market_value, row.market_price, gain, row.asset_type
        );
    }
    println!();
    println!("Total value: {}", format_money(snapshot.total_value));
    println!("Total gain:  {}", format_money(snapshot.total_gain));

    println!();
    println!("Allocation");
    for (label, value) in view.allocation.labels.iter().zip(&view.allocation.values) {
        let share = if snapshot.total_value > 0.0 {
            value / snapshot.total_value * 100.0
        } else {
            0.0
        };
        println!("  {label:<16} {:>14} {share:>6.2}%", format_money(*value));
    }

    println!();
    println!("{}", view.performance.label);
    for (label, value) in view.performance.labels.iter().zip(&view.performance.values) {
        println!("  {label:<16} {:>14}", format_money(*value));
    }
}

async fn run(command: Command) -> Result<(), String> {
    let config = AppConfig::from_env().map_err(|e| e.to_string())?;
    info!(
        "Starting portfolio tracker (canister {}, host {})",
        config.canister_id,
        config.host()
    );

    let tracker = PortfolioTracker::builder(config)
        .notifier(Arc::new(ConsoleNotifier))
        .build();

    // Failure is already reported; the non-backend sources still work.
    let _ = tracker.initialize().await;

    if let Command::Add(new_asset) = &command {
        tracker
            .add_asset(new_asset.clone())
            .await
            .map_err(|e| e.to_string())?;
        return Ok(());
    }

    tracker.load_assets().await.map_err(|e| e.to_string())?;
    if let Some(source) = tracker.active_source() {
        info!("Holdings loaded from {source}");
    }

    let snapshot = tracker.snapshot().await;
    let view = tracker.render(&snapshot);

    match command {
        Command::Json => {
            let json = serde_json::to_string_pretty(&view).map_err(|e| e.to_string())?;
            println!("{json}");
        }
        _ => print_view(&snapshot, &view),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
