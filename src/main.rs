use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = customer_service::cli::Cli::parse();
    if let Err(e) = customer_service::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
