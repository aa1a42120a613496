//! Demo signaling server
//!
//! Runs the signaling server with the in-process engine. Clients connect
//! over WebSocket with a token, e.g. `ws://localhost:3000/?token=dev`.
//!
//! Usage: signaling-server [BIND_ADDR]
//!
//!   signaling-server                   # binds to 0.0.0.0:3000
//!   signaling-server localhost         # binds to 127.0.0.1:3000
//!   signaling-server 127.0.0.1:3001    # binds to 127.0.0.1:3001

use std::net::SocketAddr;
use std::sync::Arc;

use signaling_rs::{LocalEngine, ServerConfig, SignalingServer};

/// Parse bind address from command line argument.
///
/// Accepts "localhost", an IP, or IP:PORT; the port defaults to 3000.
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    const DEFAULT_PORT: u16 = 3000;

    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: signaling-server [BIND_ADDR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR    Address to bind to (default: 0.0.0.0:3000)");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let bind_addr = match args.get(1) {
        Some(addr_str) => match parse_bind_addr(addr_str) {
            Ok(addr) => addr,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => "0.0.0.0:3000".parse().unwrap(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("signaling_rs=debug".parse()?),
        )
        .init();

    let config = ServerConfig {
        bind_addr,
        ..ServerConfig::default()
    };

    println!("Starting signaling server on {}", config.bind_addr);
    println!("Connect with: ws://{}/?token=<token>", config.bind_addr);

    let server = SignalingServer::new(config, Arc::new(LocalEngine::new()));

    server.run_until(async {
        let _ = tokio::signal::ctrl_c().await;
        println!("\nShutting down...");
    })
    .await?;

    Ok(())
}
