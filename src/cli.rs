//! 명령줄 인터페이스
//!
//! 인자가 없으면 번호 메뉴로 명령을 입력받는다.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use futures_bot::config::Config;
use futures_bot::exchange::FuturesClient;
use futures_bot::order_core::{cancel_all_orders, check_balance, place_limit_order, place_market_order};
use futures_bot::strategies::{place_oco_order, place_twap_order, OcoOptions, TwapHandle, TwapOptions};
use futures_bot::TimeInForce;

/// Binance Futures Trading Bot
#[derive(Parser, Debug)]
#[command(name = "futures-bot")]
#[command(author, version, about = "Binance Futures Trading Bot")]
pub struct Cli {
    /// Config file (default: ./config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use the live exchange instead of the testnet
    #[arg(long, global = true)]
    pub live: bool,

    /// Log orders without sending them
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Place a Market Order
    #[command(allow_negative_numbers = true)]
    Market {
        /// Trading Pair (e.g., BTCUSDT)
        symbol: String,
        /// Order Side (BUY/SELL)
        side: String,
        /// Quantity to trade
        quantity: String,
    },
    /// Place a Limit Order
    #[command(allow_negative_numbers = true)]
    Limit {
        symbol: String,
        side: String,
        quantity: String,
        /// Limit Price
        price: String,
        /// Time in force (GTC, IOC, FOK, GTX)
        #[arg(long, default_value = "GTC")]
        tif: TimeInForce,
    },
    /// Place OCO Order (Stop Loss + Take Profit)
    #[command(allow_negative_numbers = true)]
    Oco {
        symbol: String,
        /// Position Side (e.g. BUY for Long)
        side: String,
        quantity: String,
        /// Stop Loss Trigger Price
        stop_price: String,
        /// Take Profit Trigger Price
        tp_price: String,
        /// Leave the stop loss open if the take profit fails
        #[arg(long)]
        no_compensate: bool,
    },
    /// Execute TWAP Strategy
    #[command(allow_negative_numbers = true)]
    Twap {
        symbol: String,
        side: String,
        /// Total Quantity
        quantity: f64,
        /// Total Duration (seconds)
        duration: i64,
        /// Interval between orders (seconds)
        interval: i64,
        /// Round each slice down to this step size
        #[arg(long)]
        step_size: Option<f64>,
    },
    /// Cancel All Open Orders for Symbol
    Cancel { symbol: String },
    /// Check Account Balance (Test Connection)
    Balance {
        #[arg(long, default_value = "USDT")]
        asset: String,
    },
}

/// 메뉴 선택 결과
pub enum MenuChoice {
    Run(Commands),
    Exit,
    Invalid,
}

fn prompt<R: BufRead>(input: &mut R, label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// 번호 메뉴에서 명령 하나를 입력받는다
pub fn interactive_menu<R: BufRead>(input: &mut R) -> io::Result<MenuChoice> {
    println!("Welcome to Binance Futures Bot!");
    println!("1. Market Order");
    println!("2. Limit Order");
    println!("3. OCO Order");
    println!("4. TWAP Strategy");
    println!("5. Check Balance");
    println!("6. Cancel All Orders");
    println!("7. Exit");

    let choice = prompt(input, "Select an option (1-7): ")?;
    let command = match choice.as_str() {
        "1" => Commands::Market {
            symbol: prompt(input, "Symbol (e.g., BTCUSDT): ")?,
            side: prompt(input, "Side (BUY/SELL): ")?,
            quantity: prompt(input, "Quantity: ")?,
        },
        "2" => Commands::Limit {
            symbol: prompt(input, "Symbol (e.g., BTCUSDT): ")?,
            side: prompt(input, "Side (BUY/SELL): ")?,
            quantity: prompt(input, "Quantity: ")?,
            price: prompt(input, "Price: ")?,
            tif: TimeInForce::Gtc,
        },
        "3" => Commands::Oco {
            symbol: prompt(input, "Symbol: ")?,
            side: prompt(input, "Position Side (BUY/SELL): ")?,
            quantity: prompt(input, "Quantity: ")?,
            stop_price: prompt(input, "Stop Price: ")?,
            tp_price: prompt(input, "Take Profit Price: ")?,
            no_compensate: false,
        },
        "4" => {
            let symbol = prompt(input, "Symbol: ")?;
            let side = prompt(input, "Side: ")?;
            let quantity = prompt(input, "Total Quantity: ")?;
            let duration = prompt(input, "Duration (s): ")?;
            let interval = prompt(input, "Interval (s): ")?;
            match (quantity.parse::<f64>(), duration.parse::<i64>(), interval.parse::<i64>()) {
                (Ok(quantity), Ok(duration), Ok(interval)) => Commands::Twap {
                    symbol,
                    side,
                    quantity,
                    duration,
                    interval,
                    step_size: None,
                },
                _ => return Ok(MenuChoice::Invalid),
            }
        }
        "5" => Commands::Balance { asset: "USDT".to_string() },
        "6" => Commands::Cancel { symbol: prompt(input, "Symbol to Cancel All: ")? },
        "7" => return Ok(MenuChoice::Exit),
        _ => return Ok(MenuChoice::Invalid),
    };
    Ok(MenuChoice::Run(command))
}

/// 명령 실행. 주문 실패는 각 함수가 로그로 남기므로 여기서는 결과를 버린다
pub async fn run_command(client: &dyn FuturesClient, command: Commands, config: &Config) {
    match command {
        Commands::Market { symbol, side, quantity } => {
            let _ = place_market_order(client, &symbol, &side, quantity).await;
        }
        Commands::Limit { symbol, side, quantity, price, tif } => {
            let _ = place_limit_order(client, &symbol, &side, quantity, price, Some(tif)).await;
        }
        Commands::Oco { symbol, side, quantity, stop_price, tp_price, no_compensate } => {
            let options = OcoOptions { compensate: config.execution.oco_compensate && !no_compensate };
            let _ = place_oco_order(client, &symbol, &side, quantity, stop_price, tp_price, options).await;
        }
        Commands::Twap { symbol, side, quantity, duration, interval, step_size } => {
            let (handle, stop) = TwapHandle::channel();
            let options = TwapOptions {
                quantity_step: step_size.or(config.execution.quantity_step),
                stop,
            };
            let twap = place_twap_order(client, &symbol, &side, quantity, duration, interval, options);
            tokio::pin!(twap);

            let result = tokio::select! {
                r = &mut twap => r,
                _ = tokio::signal::ctrl_c() => {
                    log::warn!("Interrupt received; stopping TWAP");
                    handle.stop();
                    twap.await
                }
            };
            if let Ok(report) = result {
                log::info!(
                    "TWAP report: {}/{} attempted, {} failed, executed {}",
                    report.attempted(),
                    report.planned,
                    report.failed,
                    report.executed_quantity()
                );
            }
        }
        Commands::Cancel { symbol } => {
            let _ = cancel_all_orders(client, &symbol).await;
        }
        Commands::Balance { asset } => {
            let _ = check_balance(client, &asset).await;
        }
    }
}
