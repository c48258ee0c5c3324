//! relayrpc CLI — fire JSON-RPC calls at a node from the terminal.
//!
//! Usage:
//! ```bash
//! # Send a raw JSON-RPC call
//! relayrpc call --url https://cloudflare-eth.com --method eth_blockNumber
//!
//! # With positional parameters (JSON array)
//! relayrpc call --url https://cloudflare-eth.com \
//!     --method eth_getBalance \
//!     --params '["0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045","latest"]'
//! ```

use std::env;
use std::process;

use anyhow::{anyhow, Context, Result};
use relayrpc_core::transport::RpcTransport;
use relayrpc_http::HttpRpcClient;

#[tokio::main]
async fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "call" => cmd_call(&args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("relayrpc {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

fn print_usage() {
    println!("relayrpc {}", env!("CARGO_PKG_VERSION"));
    println!("Fire JSON-RPC calls at a node\n");
    println!("USAGE:");
    println!("    relayrpc <COMMAND>\n");
    println!("COMMANDS:");
    println!("    call       Send a raw JSON-RPC call");
    println!("    version    Print version");
    println!("    help       Print this help\n");
    println!("CALL FLAGS:");
    println!("    --url <URL>         RPC endpoint URL        [required]");
    println!("    --method <METHOD>   JSON-RPC method name    [required]");
    println!("    --params <JSON>     Parameters, JSON array  [default: []]");
}

async fn cmd_call(args: &[String]) -> Result<()> {
    let url = parse_flag(args, "--url").ok_or_else(|| anyhow!("--url is required"))?;
    let method = parse_flag(args, "--method").ok_or_else(|| anyhow!("--method is required"))?;
    let params = match parse_flag(args, "--params") {
        Some(raw) => serde_json::from_str::<Vec<serde_json::Value>>(&raw)
            .context("--params must be a JSON array")?,
        None => vec![],
    };

    let client = HttpRpcClient::default_for(&url);

    let start = std::time::Instant::now();
    let result: serde_json::Value = client.call(1, &method, params).await?;
    let latency = start.elapsed();

    println!("{}", serde_json::to_string_pretty(&result).unwrap_or_default());
    tracing::info!(url = %url, method = %method, latency_ms = latency.as_millis(), "call completed");
    Ok(())
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}
