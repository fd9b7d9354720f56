use clap::Parser;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::json;

#[derive(Parser)]
#[command(name = "priority-cli")]
#[command(about = "Probe the classification of a running priority proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Path to request
    #[arg(long, default_value = "/")]
    path: String,

    /// Send X-Priority with this value (header_only deployments)
    #[arg(long)]
    priority: Option<String>,

    /// Send X-Premium-User: true (premium-override deployments)
    #[arg(long)]
    premium: bool,

    /// Header the proxy publishes the label on
    #[arg(long, default_value = "x-priority-label")]
    label_header: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(priority) = &cli.priority {
        headers.insert("X-Priority", HeaderValue::from_str(priority)?);
    }
    if cli.premium {
        headers.insert("X-Premium-User", HeaderValue::from_static("true"));
    }

    let res = client
        .get(format!("{}{}", cli.url, cli.path))
        .headers(headers)
        .send()
        .await?;

    let label_header: HeaderName = cli.label_header.parse()?;
    let label = res
        .headers()
        .get(&label_header)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();
    let request_id = res
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    let report = json!({
        "status": res.status().as_u16(),
        "label": label,
        "request_id": request_id,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
