use arena::input::LineReader;
use arena::types::{Direction, TickSnapshot, WagerStatus};
use arena::{AppError, Config, SimulationEngine};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "commands: up <amount> | down <amount> | balance | book | history | state | quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arena=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    config.validate()?;
    info!(
        "Starting simulation at {:.2} (volatility {}, balance {:.2})",
        config.initial_price, config.volatility, config.starting_balance
    );

    let mut engine = SimulationEngine::new(config)?;
    let mut ticks = engine.subscribe();
    let mut chat = engine.subscribe_chat();
    engine.start()?;

    println!("{}", HELP);
    let mut lines = LineReader::stdin();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl-C");
                break;
            }
            line = lines.next() => {
                match line {
                    Some(line) => {
                        if !handle_command(&engine, line.trim())? {
                            break;
                        }
                    }
                    None => break,
                }
            }
            tick = ticks.recv() => match tick {
                Ok(snapshot) => log_tick(&snapshot),
                Err(RecvError::Lagged(n)) => warn!("Dropped {} tick snapshots", n),
                Err(RecvError::Closed) => break,
            },
            message = chat.recv() => {
                if let Ok(message) = message {
                    info!(target: "arena::chat", "<{}> {}", message.user, message.text);
                }
            }
        }
    }

    engine.stop().await;
    Ok(())
}

fn log_tick(snapshot: &TickSnapshot) {
    info!(
        "#{} {:.2} ({}) spread {:.2} balance {:.2}",
        snapshot.tick,
        snapshot.current_price,
        snapshot.direction,
        snapshot.order_book.spread,
        snapshot.ledger.balance
    );
    for settlement in &snapshot.settlements {
        info!(
            "{} {} wager of {:.2}: {} (entry {:.2}, exit {:.2}, payout {:.2})",
            settlement.direction,
            settlement.wager_id,
            settlement.amount,
            settlement.outcome,
            settlement.entry_price,
            settlement.exit_price,
            settlement.payout
        );
    }
}

/// Returns `Ok(false)` when the user asked to quit.
fn handle_command(engine: &SimulationEngine, line: &str) -> anyhow::Result<bool> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(true);
    };

    match command.to_ascii_lowercase().as_str() {
        "quit" | "exit" | "q" => return Ok(false),
        "balance" => println!("balance: {:.2}", engine.balance()),
        "book" => {
            let book = engine.snapshot().order_book;
            for level in &book.asks {
                println!("  ask {:>12.2} {:>8.4} {:>12.0}", level.price, level.size, level.total);
            }
            println!("  --- {:.2} ---", book.mid_price);
            for level in &book.bids {
                println!("  bid {:>12.2} {:>8.4} {:>12.0}", level.price, level.size, level.total);
            }
            println!(
                "  bids {:.0}% / asks {:.0}%",
                book.bid_share_pct,
                100.0 - book.bid_share_pct
            );
        }
        "history" => {
            let ledger = engine.snapshot().ledger;
            for wager in ledger.wagers.iter().rev().take(20) {
                let status = match wager.status() {
                    WagerStatus::Pending => "PENDING".to_string(),
                    WagerStatus::Won => format!("WIN +{:.2}", wager.payout),
                    WagerStatus::Lost => "LOSS".to_string(),
                };
                println!(
                    "  {:<4} {:>10.2} @ {:.2}  {}",
                    wager.direction.to_string(),
                    wager.amount,
                    wager.entry_price,
                    status
                );
            }
            println!(
                "  wins {} losses {} pending {} net {:.2}",
                ledger.wins,
                ledger.losses,
                ledger.pending,
                ledger.net_pnl()
            );
        }
        "state" => println!("{}", serde_json::to_string_pretty(&engine.snapshot())?),
        other => match other.parse::<Direction>() {
            Ok(direction) => {
                let Some(amount) = parts.next().and_then(|a| a.parse::<f64>().ok()) else {
                    println!("usage: {} <amount>", direction);
                    return Ok(true);
                };
                match engine.place_wager(direction, amount) {
                    Ok(receipt) => println!(
                        "placed {} {:.2} @ {:.2}; balance {:.2} -> {:.2}; potential win {:.2}",
                        direction,
                        amount,
                        receipt.wager.entry_price,
                        receipt.balance_before,
                        receipt.balance_after,
                        engine.potential_payout(amount)
                    ),
                    Err(e) if e.is_recoverable() => println!("rejected: {}", e),
                    Err(AppError::EngineStopped) => return Ok(false),
                    Err(e) => return Err(e.into()),
                }
            }
            Err(_) => println!("{}", HELP),
        },
    }

    Ok(true)
}
