#[tokio::main]
async fn main() -> eyre::Result<()> {
    lipa::run().await
}
