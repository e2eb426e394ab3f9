use smart_cook::chat::ChatSession;
use smart_cook::commands::CommandHandler;
use smart_cook::persona::{self, PersonaProfile};
use smart_cook::providers::deepseek::DeepSeekProvider;
use smart_cook::providers::gemini::GeminiProvider;
use smart_cook::providers::traits::CompletionProvider;
use smart_cook::retrieval::Retriever;

use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::env;
use thiserror::Error;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    api_key: Option<String>,

    /// Which hosted model to talk to: gemini or deepseek
    #[arg(long, default_value = "gemini")]
    provider: String,

    /// Ground answers in the built-in knowledge base and enable the
    /// kitchen tools
    #[arg(long)]
    rag: bool,

    /// Character file under characters/ overriding the Smart Cook persona
    #[arg(long)]
    character: Option<String>,

    /// Passages injected per query in retrieval mode
    #[arg(long, default_value = "3")]
    top_k: usize,

    /// Minimum cosine similarity for a passage to be used
    #[arg(long, default_value = "0.3")]
    min_score: f32,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("Missing API key: set --api-key or the {0} environment variable")]
    MissingApiKey(String),
    #[error("Unknown provider '{0}': expected gemini or deepseek")]
    UnknownProvider(String),
}

fn resolve_api_key(args: &Args) -> Result<String, AppError> {
    if let Some(key) = &args.api_key {
        return Ok(key.clone());
    }
    let env_var = format!("{}_API_KEY", args.provider.to_uppercase());
    env::var(&env_var).map_err(|_| AppError::MissingApiKey(env_var))
}

async fn build_provider(
    args: &Args,
    profile: &PersonaProfile,
) -> Result<Box<dyn CompletionProvider + Send + Sync>, AppError> {
    let api_key = resolve_api_key(args)?;
    let system_prompt = profile.generate_system_prompt();

    match args.provider.as_str() {
        "gemini" => Ok(Box::new(
            GeminiProvider::new(api_key, system_prompt)
                .await
                .map_err(|e| AppError::Provider(e.to_string()))?,
        )),
        "deepseek" => Ok(Box::new(
            DeepSeekProvider::new(api_key, system_prompt)
                .await
                .map_err(|e| AppError::Provider(e.to_string()))?,
        )),
        other => Err(AppError::UnknownProvider(other.to_string())),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    colored::control::set_override(true);
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let profile = match &args.character {
        Some(file) => persona::load_persona(file),
        None => persona::default_persona(),
    };

    let provider = build_provider(&args, &profile).await?;

    let retriever = if args.rag {
        println!("{}", "Embedding the knowledge base...".dimmed());
        let retriever = Retriever::from_builtin(provider.as_ref(), args.top_k, args.min_score)
            .await
            .map_err(|e| AppError::Provider(format!("knowledge base indexing failed: {}", e)))?;
        println!(
            "{}",
            format!("Knowledge base ready ({} entries).", retriever.len()).dimmed()
        );
        Some(retriever)
    } else {
        None
    };

    let session = ChatSession::new(provider, retriever);

    println!("\n--- 🍳 {} ---", profile.name.bold());
    if let Ok(model) = session.model_info().await {
        println!("Model in use: {}", model.cyan());
    }
    println!(
        "Mode: {}",
        if args.rag {
            "retrieval-augmented (kb + kitchen tools)".green()
        } else {
            "plain chat".yellow()
        }
    );
    println!("Type 'exit' to quit.");
    println!("{}", "-".repeat(35));

    let mut command_handler = CommandHandler::new(session);
    command_handler.handle_command("help").await?;

    let mut rl = Editor::<(), DefaultHistory>::new()?;

    loop {
        match rl.readline("👤 ") {
            Ok(line) => {
                let input = line.trim();
                let _ = rl.add_history_entry(input);

                if let Err(e) = command_handler.handle_command(input).await {
                    println!("{}", e.red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    println!("\n👋 Sampai jumpa! Have fun trying new recipes!");
    Ok(())
}
