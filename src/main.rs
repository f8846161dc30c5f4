#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = seatboard::run().await {
        eprintln!("seatboard fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
