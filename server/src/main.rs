use clap::Parser;
use log::{error, info};
use server::network::Server;
use server::round::RoundState;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value_t = shared::DEFAULT_PORT)]
    port: u16,

    /// Seed for the secret generator, for replayable sessions
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let round = match args.seed {
        Some(seed) => {
            info!("Using fixed seed {}", seed);
            RoundState::seeded(seed)
        }
        None => RoundState::from_entropy(),
    };

    let address = format!("{}:{}", args.host, args.port);
    let server = match Server::bind(&address, round).await {
        Ok(server) => server,
        Err(e) => {
            error!("Error listening on {}: {}", address, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}
