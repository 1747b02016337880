use assistbot_backend::core::config::AppConfig;
use assistbot_backend::core::logging;
use assistbot_backend::llm::openai::OpenAiProvider;
use assistbot_backend::rag::ingest;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    logging::init(config.log_dir.as_deref());

    let provider = OpenAiProvider::new(
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
    );

    ingest::run(&config, &provider).await
}
