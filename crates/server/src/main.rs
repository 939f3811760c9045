#[tokio::main]
async fn main() -> anyhow::Result<()> {
    smartstay_server::start().await
}
