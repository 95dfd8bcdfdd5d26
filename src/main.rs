use std::path::PathBuf;

use clap::{Parser, Subcommand};

use wordbook::protocol::DEFAULT_PORT;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the document-store server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// JSON file the store is persisted to.
        #[arg(short, long, default_value = "wordbook.json")]
        data: PathBuf,
    },

    /// Connect to a server as an interactive client.
    Connect {
        /// Server host.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Server port.
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let result = match args.command {
        Command::Serve { port, data } => wordbook::server::run(port, data).await,
        Command::Connect { host, port } => wordbook::client::run(host, port).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
