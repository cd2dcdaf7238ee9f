use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use tracing::info;

use voiceover_studio::{RefinementMode, StudioConfig, StudioSession, VoiceProfile};

/// Voice-over studio - tone-aware script refinement and speech synthesis
#[derive(Parser, Debug)]
#[command(name = "voiceover-studio")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the available voices
    Voices,

    /// Synthesize a script into a WAV file
    Generate {
        /// Script text
        #[arg(short = 't', long = "text", conflicts_with = "file")]
        text: Option<String>,

        /// Read the script from a file
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file: Option<PathBuf>,

        /// Voice id (see `voices`)
        #[arg(short = 'v', long = "voice")]
        voice: Option<String>,

        /// Speaking speed between 0.5 and 2.0
        #[arg(short = 's', long = "speed")]
        speed: Option<f32>,

        /// Rewrite the script first (formal, story, promo or natural)
        #[arg(short = 'r', long = "refine", value_name = "MODE")]
        refine: Option<RefinementMode>,

        /// Skip automatic tone detection
        #[arg(long = "no-tone")]
        no_tone: bool,

        /// Directory for the WAV file (defaults to the configured output dir)
        #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Voices => {
            for voice in VoiceProfile::all() {
                println!("{:<8} {:<7} {}", voice.id, voice.gender.as_str(), voice.style);
            }
            Ok(())
        }
        Commands::Generate {
            text,
            file,
            voice,
            speed,
            refine,
            no_tone,
            output_dir,
        } => {
            let config = if let Some(config_path) = cli.config {
                println!("Loading configuration from {}", config_path.display());
                StudioConfig::from_file(&config_path).map_err(|e| anyhow!(e.to_string()))?
            } else {
                StudioConfig::from_env().map_err(|e| anyhow!(e.to_string()))?
            };
            if config.api_key.is_none() {
                anyhow::bail!("GEMINI_API_KEY is not set");
            }

            let script = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?,
                (None, None) => anyhow::bail!("Provide a script with --text or --file"),
            };

            let session = StudioSession::new(config)?;
            // Tone is analyzed once, right before synthesis
            let detect_tone = session.tone_enabled() && !no_tone;
            session.set_tone_enabled(false);
            session.set_script(script);
            if let Some(voice) = voice {
                session.set_voice(&voice)?;
            }
            if let Some(speed) = speed {
                session.set_speed(speed)?;
            }

            if let Some(mode) = refine {
                session.set_refinement_mode(mode);
                session
                    .refine()
                    .await
                    .map_err(|e| anyhow!(e.user_message()))?;
                println!("Refined script:\n{}\n", session.script());
            }

            if detect_tone {
                session.set_tone_enabled(true);
                if let Some(tone) = session.analyze_tone_now().await {
                    info!(tone = %tone, "Using detected tone");
                    println!("Detected tone: {tone}");
                }
            }

            let result = session.generate().await;
            let artifact = match result {
                Ok(artifact) => artifact,
                Err(e) => {
                    session.shutdown();
                    return Err(anyhow!(e.user_message()));
                }
            };
            let path = session.download(output_dir.as_deref()).await?;
            println!(
                "Saved {} ({:.1}s, {} Hz)",
                path.display(),
                artifact.duration_secs(),
                artifact.sample_rate()
            );

            session.shutdown();
            Ok(())
        }
    }
}
