//! Binary entrypoint for the meme generator.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use meme_generator::config::Configuration;
use meme_generator::events::{Captions, Command};
use meme_generator::render::canvas::Canvas;
use meme_generator::render::caption::CaptionRenderer;
use meme_generator::session::{Outcome, Session};
use meme_generator::speech;
use meme_generator::tasks;

#[derive(Debug, Parser)]
#[command(name = "meme-generator", version, about = "Caption an image and read it aloud")]
struct Cli {
    /// Path to YAML config (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Draw one image with captions and write it as PNG
    Render {
        #[arg(long, value_name = "FILE")]
        image: PathBuf,
        #[arg(long, default_value = "")]
        top: String,
        #[arg(long, default_value = "")]
        bottom: String,
        #[arg(short, long, value_name = "PNG")]
        output: PathBuf,
        /// Read the captions aloud after drawing
        #[arg(long)]
        speak: bool,
        /// Volume slider position, 0-100
        #[arg(long, requires = "speak", value_parser = clap::value_parser!(u8).range(0..=100))]
        volume: Option<u8>,
        #[arg(long, requires = "speak")]
        voice: Option<String>,
    },
    /// Apply commands line by line from a script or stdin
    Session {
        #[arg(long, value_name = "FILE")]
        script: Option<PathBuf>,
    },
    /// List the voices of the speech backend
    Voices,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(format!("meme_generator={level}").parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<Configuration> {
    let cfg = match path {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Configuration::default(),
    };
    cfg.validated().context("invalid configuration values")
}

/// `render` needs captions drawn; `session` can carry on for speech alone.
fn build_session(cfg: &Configuration, require_font: bool) -> Result<Session> {
    let renderer = match CaptionRenderer::from_options(cfg.caption.clone()) {
        Ok(renderer) => renderer,
        Err(err) if !require_font => {
            warn!("{err}; captions will not be drawn");
            CaptionRenderer::new(None, cfg.caption.clone())
        }
        Err(err) => return Err(err).context("failed to resolve a caption font"),
    };
    Ok(Session::new(
        Canvas::new(&cfg.canvas),
        renderer,
        speech::from_options(&cfg.speech),
        cfg.speech.volume,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    let cfg = load_config(cli.config.as_ref())?;

    match cli.mode {
        Mode::Render {
            image,
            top,
            bottom,
            output,
            speak,
            volume,
            voice,
        } => {
            let mut session = build_session(&cfg, true)?;
            let mut script = vec![
                Command::LoadImage(image),
                Command::GenerateOverlay(Captions::new(top, bottom)),
                Command::Save(output),
            ];
            if speak {
                if let Some(volume) = volume {
                    script.push(Command::SetVolume(volume));
                }
                if let Some(voice) = voice {
                    script.push(Command::ListVoices);
                    script.push(Command::SelectVoice(voice));
                }
                script.push(Command::Speak);
            }
            for command in script {
                let outcome = session.dispatch(command)?;
                if let Outcome::Saved(path) = &outcome {
                    println!("{}", path.display());
                }
            }
        }
        Mode::Session { script } => {
            let session = build_session(&cfg, false)?;
            let (tx, rx) = mpsc::channel::<Command>(16);
            let cancel = CancellationToken::new();

            {
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        info!("ctrl-c received; stopping session");
                        cancel.cancel();
                    }
                });
            }

            let script_input = match script {
                Some(path) => {
                    let file = tokio::fs::File::open(&path)
                        .await
                        .with_context(|| format!("failed to open script {}", path.display()))?;
                    Some(tokio::spawn(tasks::input::run(
                        BufReader::new(file),
                        tx,
                        cancel.clone(),
                    )))
                }
                None => {
                    // Detached; a pending terminal read must not hold up shutdown.
                    tasks::input::spawn_stdin(tx).context("failed to start stdin reader")?;
                    None
                }
            };
            let session = tasks::dispatcher::run(rx, session, cancel.clone())
                .await
                .context("dispatcher failed")?;
            cancel.cancel();
            if let Some(input) = script_input {
                input.await.context("input task panicked")??;
            }
            info!(state = %session.state(), "session finished");
        }
        Mode::Voices => {
            let synth = speech::from_options(&cfg.speech);
            for voice in synth.voices().context("failed to list voices")? {
                println!("{}", voice.label());
            }
        }
    }
    Ok(())
}
