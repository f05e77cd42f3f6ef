#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pos_referral::bootstrapper::run().await
}
