use promptforge::{
    ExtractionStrategy, GeminiClient, GeminiConfig, ModificationKind, PromptGenerator,
};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found"),
    }
    promptforge::logger::init()?;

    let theme = env::args()
        .nth(1)
        .unwrap_or_else(|| "a red fox asleep in fresh snow".to_string());
    let strategy: ExtractionStrategy = env::var("EXTRACTION_STRATEGY")
        .ok()
        .map(|s| s.parse::<ExtractionStrategy>())
        .transpose()?
        .unwrap_or_default();

    let client = GeminiClient::new(GeminiConfig::from_env())?;
    let generator = PromptGenerator::new(Arc::new(client), strategy);

    let title = generator.generate_title(&theme).await?;
    println!("Title: {}\n", title);

    let prompt = generator.generate_prompt(&title).await?;
    println!("{}\n{}\n", prompt.to_pretty_json()?, prompt.char_count()?);

    let restyled = generator.modify_prompt(&prompt, ModificationKind::Style).await?;
    println!("{}\n{}", restyled.to_pretty_json()?, restyled.char_count()?);

    Ok(())
}
