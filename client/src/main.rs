use clap::Parser;
use log::info;
use pong_client::network::Client;
use pong_shared::DEFAULT_PORT;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal participant for the pong server", long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1")]
    server: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();
    let address = format!("{}:{}", args.server, args.port);

    info!("Starting client...");
    info!("Connecting to: {}", address);

    let mut client = Client::new(&address).await?;
    client.run().await?;

    Ok(())
}
