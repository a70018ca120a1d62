use itax_credentials_server::{run, AppConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    run(config).await?;
    Ok(())
}
