use rugloom_server::utils::logger;
use rugloom_server::{Config, Server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log_dir = std::env::var("LOG_DIR").ok();
    logger::init_logger_with_file(None, log_dir.as_deref());

    let config = Config::from_env()?;
    Server::new(config).run().await?;
    Ok(())
}
