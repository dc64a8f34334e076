#[tokio::main]
async fn main() -> anyhow::Result<()> {
    swiftspeak_backend::run().await
}
