use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "transit-cli")]
#[command(about = "Query a running transit proxy from the command line", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List organizations
    Orgs {
        /// Search term forwarded upstream
        #[arg(short, long)]
        q: Option<String>,
    },
    /// List routes of an organization
    Routes { org: String },
    /// Show route metadata
    Meta { org: String, route: String },
    /// Show stops of a route
    Stops { org: String, route: String },
    /// Show live vehicle positions of a route
    Vehicles { org: String, route: String },
    /// Check proxy liveness
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match &cli.command {
        Commands::Orgs { q } => {
            let mut req = client.get(format!("{}/orgs-data", base));
            if let Some(q) = q {
                req = req.query(&[("q", q)]);
            }
            req
        }
        Commands::Routes { org } => client
            .get(format!("{}/routes-data", base))
            .query(&[("orgId", org)]),
        Commands::Meta { org, route } => route_request(&client, base, "meta", org, route),
        Commands::Stops { org, route } => route_request(&client, base, "stops", org, route),
        Commands::Vehicles { org, route } => route_request(&client, base, "vehicles", org, route),
        Commands::Health => client.get(format!("{}/healthz", base)),
    };

    print_response(request.send().await?).await
}

fn route_request(
    client: &reqwest::Client,
    base: &str,
    resource: &str,
    org: &str,
    route: &str,
) -> reqwest::RequestBuilder {
    client
        .get(format!("{}/{}", base, resource))
        .query(&[("orgId", org), ("routeId", route)])
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        eprintln!("Details: {}", text);
        std::process::exit(1);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
