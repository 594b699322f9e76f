use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{error, info};
use wa_summarizer::api::handler;
use wa_summarizer::core::config::AppConfig;
use wa_summarizer::whatsapp::VoiceBot;

#[tokio::main]
async fn main() -> Result<(), Error> {
    wa_summarizer::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    let bot = VoiceBot::new(&config);
    info!("Webhook Lambda initialized");

    let bot = &bot;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(bot, event).await
    }))
    .await
}
