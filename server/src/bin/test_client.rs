use clap::Parser;
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Interactive terminal client: type a number per line, server lines are printed as they arrive
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    server: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let stream = TcpStream::connect(&args.server).await?;
    info!("Connected to {} from {}", args.server, stream.local_addr()?);
    println!("Guess a number between {} and {}", shared::SECRET_MIN, shared::SECRET_MAX);

    let (reader, mut writer) = stream.into_split();

    // Print server lines concurrently so broadcasts show up while typing
    let mut printer = tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => println!("{}", line),
                Ok(None) => break,
                Err(e) => {
                    warn!("Error reading from server: {}", e);
                    break;
                }
            }
        }
    });

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = stdin.next_line() => match line? {
                Some(line) => {
                    writer.write_all(line.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                }
                None => break,
            },
            _ = &mut printer => {
                println!("Server closed the connection");
                return Ok(());
            }
        }
    }

    writer.shutdown().await?;
    printer.await?;

    Ok(())
}
