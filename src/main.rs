use promptforge::{
    logger::{self, LoggerConfig},
    AppConfig, InteractionController, PromptError,
};
#[cfg(not(feature = "server"))]
use promptforge::{CopyTarget, GeminiClient, ModificationKind};
#[cfg(not(feature = "server"))]
use std::env;

#[tokio::main]
async fn main() {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    if let Err(e) = logger::init_with_config(LoggerConfig::from_env()) {
        eprintln!("Logger setup failed: {}", e);
    }
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    if let Err(e) = run().await {
        if e.is_config() {
            print_blocking_message(&e);
        } else {
            log::error!("❌ {}", e);
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<(), PromptError> {
    let config = AppConfig::from_env()?;
    logger::log_config_info(&config);

    let controller = promptforge::build_controller(&config)?;
    log::info!("✅ Gemini client initialized");

    serve(controller, &config).await
}

#[cfg(feature = "server")]
async fn serve(controller: InteractionController, config: &AppConfig) -> Result<(), PromptError> {
    promptforge::server::run(controller, config.port)
        .await
        .map_err(|e| PromptError::ConfigError(format!("Server failed: {}", e)))
}

/// Without the HTTP front-end: `promptforge <theme> [color|style]...`
#[cfg(not(feature = "server"))]
async fn serve(mut controller: InteractionController, _config: &AppConfig) -> Result<(), PromptError> {
    let mut args = env::args().skip(1);
    let theme = args
        .next()
        .or_else(|| env::var("THEME").ok())
        .unwrap_or_default();

    log::info!("📚 Known models:");
    for model in GeminiClient::supported_models() {
        log::info!("  {} - {}", model.id, model.name);
    }

    controller.generate(&theme).await?;
    print_result(&mut controller);

    for arg in args {
        let kind: ModificationKind = arg.parse()?;
        log::info!("🎨 Applying {} modification", kind);
        controller.modify(kind).await?;
        print_result(&mut controller);
    }

    Ok(())
}

#[cfg(not(feature = "server"))]
fn print_result(controller: &mut InteractionController) {
    if let Some(title) = controller.copy(CopyTarget::Title) {
        println!("Title: {}\n", title);
    }
    if let Some(json) = controller.copy(CopyTarget::Json) {
        println!("{}\n", json);
    }
    if let Some(count) = controller.char_count() {
        println!("Characters: {}", count);
    }
    if let Some(url) = controller.keyword_checker_url() {
        println!("Keyword checker: {}", url);
    }
    println!();
}

fn print_blocking_message(err: &PromptError) {
    let rule = "═".repeat(72);
    eprintln!("{}", rule);
    eprintln!("  promptforge cannot start");
    eprintln!();
    eprintln!("  {}", err);
    eprintln!();
    eprintln!("  Set GEMINI_API_KEY in the environment or in a .env file next to the");
    eprintln!("  binary, then run promptforge again.");
    eprintln!("{}", rule);
}
