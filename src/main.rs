//! limma binary entry point

use color_eyre::Result;
use limma::{
    cli::{mask_secret, speak_options, Cli, Commands},
    config::{Config, ProviderConfig},
    services::{create_provider, generate},
    voice::{PersonaSelection, SpeakOptions, Speaker},
};
use tokio::task;

#[tokio::main]
async fn main() -> Result<()> {
    // Install error handler
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Set up logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("limma=debug,tts=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Generate { prompt } => {
            let config = Config::load()?;
            let provider = create_provider(&config.provider)?;
            let reply = generate(provider.as_ref(), &prompt).await?;
            println!("{reply}");
        }
        Commands::Speak {
            text,
            female,
            no_female,
            rate,
            volume,
        } => {
            let config = Config::load()?;
            let defaults = SpeakOptions::from(config.speech);
            let options = speak_options(defaults, female, no_female, rate, volume);

            let outcome =
                task::spawn_blocking(move || Speaker::espeak().speak(&text, &options)).await??;
            if outcome.persona == PersonaSelection::DefaultVoice {
                eprintln!("No female voice available, used the default voice");
            }
        }
        Commands::Voices => {
            let voices = task::spawn_blocking(|| Speaker::espeak().voices()).await??;
            for voice in voices {
                println!("{:<40} {:<16} {}", voice.name, voice.language, voice.id);
            }
        }
        Commands::Config {
            get,
            set,
            value,
            list,
        } => {
            let path = Config::config_path();
            if list {
                let config = Config::load()?;
                for key in ProviderConfig::KEYS {
                    print_entry(key, config.provider.get(key)?);
                }
            } else if let Some(key) = get {
                let config = Config::load()?;
                print_entry(&key, config.provider.get(&key)?);
            } else if let (Some(key), Some(val)) = (set, value) {
                // Write back only what is on disk, not env overrides
                let mut config = Config::load_from_path(&path)?;
                config.provider.set(&key, val)?;
                config.save_to_path(&path)?;
                println!("Saved {key} to {}", path.display());
            }
        }
        Commands::Version => {
            println!("limma version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn print_entry(key: &str, value: Option<String>) {
    let value = match (key, value) {
        (_, None) => "<unset>".to_string(),
        ("api_key", Some(v)) => mask_secret(&v),
        (_, Some(v)) => v,
    };
    println!("{key} = {value}");
}
