use clap::{Parser, Subcommand};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::{frame::coding::CloseCode, CloseFrame};
use tokio_tungstenite::tungstenite::Message;

#[derive(Parser)]
#[command(name = "dashboard-cli")]
#[command(about = "Probe a running counting dashboard", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:80")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Liveness check (/health)
    Health,
    /// Counting service connectivity (/health/api)
    Connectivity,
    /// Prometheus metrics (/metrics)
    Metrics,
    /// Request one count over the WebSocket relay (/ws)
    Count,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let base = cli.url.trim_end_matches('/');
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Connectivity => {
            let res = client.get(format!("{}/health/api", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Metrics => {
            let res = client.get(format!("{}/metrics", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Count => {
            request_count(base).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body = res.text().await?;
    if status.is_success() {
        println!("{}", body.trim_end());
    } else {
        eprintln!("Error: dashboard returned status {}", status);
        eprintln!("Response: {}", body.trim_end());
    }
    Ok(())
}

async fn request_count(base: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ws_url = ws_url(base);
    let (mut ws, _) = connect_async(ws_url.as_str()).await?;

    ws.send(Message::Text("get count".into())).await?;

    while let Some(msg) = ws.next().await {
        match msg? {
            Message::Text(text) => {
                let json: Value = serde_json::from_str(text.as_str())?;
                println!("{}", serde_json::to_string_pretty(&json)?);
                break;
            }
            Message::Close(frame) => {
                eprintln!("Error: dashboard closed the connection: {:?}", frame);
                break;
            }
            _ => continue,
        }
    }

    let _ = ws
        .close(Some(CloseFrame {
            code: CloseCode::Normal,
            reason: "done".into(),
        }))
        .await;
    Ok(())
}

fn ws_url(base: &str) -> String {
    if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}/ws", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}/ws", rest)
    } else {
        format!("ws://{}/ws", base)
    }
}
