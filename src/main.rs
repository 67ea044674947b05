#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fitdesk_api::run().await
}
