/**
* filename : main
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

mod cli;

use std::process::ExitCode;

use clap::Parser;

use futures_bot::config::Config;
use futures_bot::exchange::{BinanceFuturesExchange, DryRunExchange, FuturesClient};
use futures_bot::utils::logging;
use futures_bot::VERSION;

use crate::cli::{Cli, MenuChoice};

#[tokio::main]
async fn main() -> ExitCode {
    // .env 파일이 없어도 계속 진행
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        // 로깅 초기화 전에 난 오류만 여기로 온다
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, anyhow::Error> {
    // 설정 로드
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if cli.live {
        config.exchange.testnet = false;
    }

    // 로깅 초기화. guard가 drop 될 때 로그 파일 flush
    let _log_guard = logging::init(&config.logging)?;
    log::debug!("futures-bot v{}", VERSION);

    match dispatch(cli, &config).await {
        Ok(code) => Ok(code),
        Err(e) => {
            log::error!("{:#}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn dispatch(cli: Cli, config: &Config) -> Result<ExitCode, anyhow::Error> {
    let command = match cli.command {
        Some(command) => command,
        None => {
            let stdin = std::io::stdin();
            match cli::interactive_menu(&mut stdin.lock())? {
                MenuChoice::Run(command) => command,
                MenuChoice::Exit => return Ok(ExitCode::SUCCESS),
                MenuChoice::Invalid => {
                    println!("Invalid choice.");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    };

    // 거래소 인스턴스 생성. 자격 증명이 없으면 여기서 종료
    let client: Box<dyn FuturesClient> = if cli.dry_run {
        log::info!("드라이런 모드: 주문을 전송하지 않습니다");
        Box::new(DryRunExchange::new())
    } else {
        let (api_key, api_secret) = config.require_credentials()?;
        let exchange = BinanceFuturesExchange::from_config(&config.exchange, api_key, api_secret)?;
        log::info!("거래소 연결 대상: {}", exchange.base_url);
        Box::new(exchange)
    };

    cli::run_command(client.as_ref(), command, config).await;
    Ok(ExitCode::SUCCESS)
}
