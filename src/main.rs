use anyhow::{anyhow, Context, Result};
use base64::Engine as _;
use clap::{Parser, Subcommand};
use image_relay::ai::mime::ImageKind;
use image_relay::models::{parse_bind_addr, Config};
use image_relay::ui::{view, HttpRelayClient, Session, UiState, DATA_URI_PREFIX};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "image-relay")]
#[command(about = "Relay text prompts to a hosted text-to-image model")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the relay endpoint and the web page.
    Serve {
        /// Listen address; overrides BIND_ADDR.
        #[arg(long, value_parser = parse_addr_arg)]
        addr: Option<SocketAddr>,
    },
    /// Generate one image through a running relay.
    Generate {
        prompt: String,
        #[arg(long, default_value = "http://127.0.0.1:3000/api/generate")]
        relay_url: String,
        /// Output file; the extension follows the image type when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn parse_addr_arg(input: &str) -> std::result::Result<SocketAddr, String> {
    parse_bind_addr(input).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_relay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    match args.command {
        Command::Serve { addr } => {
            let config = Config::from_env()?;
            let addr = config.listen_addr(addr)?;
            if let Err(e) = image_relay::web::run(config, addr).await {
                error!("Server failed: {}", e);
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Generate {
            prompt,
            relay_url,
            output,
        } => generate(prompt, relay_url, output).await,
    }
}

async fn generate(prompt: String, relay_url: String, output: Option<PathBuf>) -> Result<()> {
    let mut session = Session::new(Box::new(HttpRelayClient::new(relay_url))).on_change(|state| {
        let text = view::render_text(state);
        if !text.is_empty() {
            println!("{}", text);
        }
    });
    session.set_prompt(prompt);
    session.submit().await;

    let image = match generated_image(session.state()) {
        Ok(image) => image,
        Err(e) => {
            error!("Generation failed: {}", e);
            std::process::exit(1);
        }
    };

    let path = save_data_uri(image, output.as_deref())?;
    info!("Saved image to {}", path.display());
    println!("{}", path.display());
    Ok(())
}

/// The image from a finished cycle, or why there is none.
fn generated_image(state: &UiState) -> Result<&str> {
    match (&state.image, &state.error) {
        (Some(image), _) => Ok(image.as_str()),
        (None, Some(message)) => Err(anyhow!("{}", message)),
        (None, None) => Err(anyhow!("Relay responded without an image payload")),
    }
}

/// Decodes a data URI produced by the client cycle and writes it to disk.
fn save_data_uri(image: &str, output: Option<&Path>) -> Result<PathBuf> {
    let payload = image
        .strip_prefix(DATA_URI_PREFIX)
        .context("Image is not a base64 data URI")?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .context("Failed to decode image payload")?;

    let kind = ImageKind::sniff(&bytes);
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(format!("generated.{}", kind.extension())),
    };
    info!("Writing {} ({} bytes)", kind.mime_type(), bytes.len());
    std::fs::write(&path, &bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_addr_arg_invalid() {
        let err = parse_addr_arg("localhost").unwrap_err();
        assert!(err.contains("Invalid bind address"));
    }

    #[test]
    fn test_save_data_uri_writes_decoded_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fox.png");

        let written = save_data_uri("data:image/png;base64,iVBORw==", Some(&path)).unwrap();

        assert_eq!(written, path);
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_generated_image_without_payload_is_an_error() {
        let err = generated_image(&UiState::default()).unwrap_err();
        assert!(err.to_string().contains("without an image payload"));
    }

    #[test]
    fn test_generated_image_reports_relay_error() {
        let state = UiState {
            error: Some("model loading".to_string()),
            ..UiState::default()
        };
        assert_eq!(generated_image(&state).unwrap_err().to_string(), "model loading");
    }

    #[test]
    fn test_generated_image_returns_data_uri() {
        let state = UiState {
            image: Some("data:image/png;base64,AAEC".to_string()),
            ..UiState::default()
        };
        assert_eq!(generated_image(&state).unwrap(), "data:image/png;base64,AAEC");
    }

    #[test]
    fn test_save_data_uri_rejects_other_schemes() {
        assert!(save_data_uri("https://example.com/fox.png", None).is_err());
    }
}
