//! pushwire CLI
//!
//! Encodes notifications into gateway frames and inspects existing frames.

mod config;

use anyhow::{Context, Result};
use base64::Engine;
use clap::{Args, Parser, Subcommand};
use pushwire_payload::{Notification, Payload};
use pushwire_protocol::{DeviceToken, Frame, FrameEncoder};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use config::{CliConfig, OutputFormat};

/// pushwire - push gateway frame encoder
#[derive(Parser, Debug)]
#[command(name = "pushwire")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "pushwire.toml")]
    config: String,

    /// Extra configuration files merged over the main one, in order
    #[arg(long)]
    overlay: Vec<String>,

    /// Run in verbose mode
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a notification into a frame
    Encode {
        /// Device token, hex with optional `<...>` and spaces
        #[arg(short, long)]
        token: String,

        #[command(flatten)]
        notification: NotificationArgs,

        /// Output encoding (overrides the config file)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Print the JSON payload without framing
    Payload {
        #[command(flatten)]
        notification: NotificationArgs,
    },
    /// Decode a hex frame and print its token and payload
    Inspect {
        /// Frame bytes as hex
        frame: String,
    },
}

#[derive(Args, Debug)]
struct NotificationArgs {
    /// Read the notification from a JSON file (other flags override it)
    #[arg(long)]
    json: Option<String>,

    /// Alert text
    #[arg(short, long)]
    alert: Option<String>,

    /// Badge count
    #[arg(short, long)]
    badge: Option<u32>,

    /// Sound file name
    #[arg(short, long, conflicts_with = "default_sound")]
    sound: Option<String>,

    /// Play the default sound
    #[arg(long)]
    default_sound: bool,

    /// Custom property as key=value, repeatable
    #[arg(long = "custom", value_parser = parse_key_value)]
    custom: Vec<(String, String)>,
}

impl NotificationArgs {
    fn into_notification(self) -> Result<Notification> {
        let mut notification = match &self.json {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("reading notification {}", path))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("parsing notification {}", path))?
            }
            None => Notification::new(),
        };

        if let Some(alert) = self.alert {
            notification.set_alert(alert);
        }
        if let Some(badge) = self.badge {
            notification.badge = Some(badge);
        }
        if let Some(sound) = self.sound {
            notification = notification.with_sound(sound);
        } else if self.default_sound {
            notification = notification.with_default_sound();
        }
        for (key, value) in self.custom {
            notification.set_custom_property(key, value);
        }

        Ok(notification)
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got `{}`", raw)),
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn render(bytes: &[u8], format: OutputFormat) -> String {
    match format {
        OutputFormat::Hex => hex::encode(bytes),
        OutputFormat::Base64 => base64::engine::general_purpose::STANDARD.encode(bytes),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut config = CliConfig::load_or_default(&cli.config)?;
    for path in &cli.overlay {
        config.load_merge(path)?;
        info!("Merged configuration from {}", path);
    }
    debug!("Using configuration: {:?}", config);

    match cli.command {
        Commands::Encode {
            token,
            notification,
            format,
        } => {
            let encoder = FrameEncoder::from_config(&config.encoder)?;
            let notification = notification.into_notification()?;
            let token: DeviceToken = token.parse()?;

            match encoder.encode_for(&notification, &token) {
                Ok(outcome) => {
                    if outcome.truncated {
                        warn!("Alert truncated to fit {} bytes", encoder.max_frame_size());
                    }
                    info!("Encoded frame: {} bytes", outcome.frame.len());
                    println!(
                        "{}",
                        render(outcome.frame.as_bytes(), format.unwrap_or(config.output.format))
                    );
                }
                Err(err) => {
                    if let Some(frame) = err.frame() {
                        debug!("Rejected frame: {}", hex::encode(frame.as_bytes()));
                    }
                    return Err(err.into());
                }
            }
        }
        Commands::Payload { notification } => {
            let notification = notification.into_notification()?;
            let encoder = FrameEncoder::from_config(&config.encoder)?;
            let bytes = encoder.builder().build_fields(&notification).serialize()?;
            println!("{}", String::from_utf8_lossy(&bytes));
        }
        Commands::Inspect { frame } => {
            let bytes = hex::decode(frame.trim()).context("frame is not valid hex")?;
            let frame = Frame::parse(bytes)?;
            let payload = Payload::parse(frame.payload())?;

            println!("command: {}", frame.command());
            println!("token:   {}", hex::encode(frame.device_token()));
            println!(
                "size:    {} bytes (fits: {})",
                frame.len(),
                frame.fits_within(config.encoder.max_frame_size)
            );
            println!("{}", serde_json::to_string_pretty(&payload.into_value())?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("typ=1").unwrap(),
            ("typ".to_string(), "1".to_string())
        );
        assert_eq!(
            parse_key_value("url=a=b").unwrap(),
            ("url".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_notification_args_override_flags() {
        let args = NotificationArgs {
            json: None,
            alert: Some("Hello!".to_string()),
            badge: Some(5),
            sound: None,
            default_sound: true,
            custom: vec![("typ".to_string(), "1".to_string())],
        };

        let notification = args.into_notification().unwrap();
        let text = pushwire_payload::serialize(&notification).unwrap();
        assert_eq!(
            text,
            br#"{"aps":{"alert":"Hello!","badge":5,"sound":"1.aiff"},"typ":"1"}"#
        );
    }

    #[test]
    fn test_cli_parses_encode() {
        let cli = Cli::try_parse_from([
            "pushwire",
            "encode",
            "--token",
            "<abcd>",
            "--alert",
            "hi",
            "--custom",
            "k=v",
            "--format",
            "base64",
        ])
        .unwrap();

        match cli.command {
            Commands::Encode { token, format, .. } => {
                assert_eq!(token, "<abcd>");
                assert_eq!(format, Some(OutputFormat::Base64));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_overlays() {
        let cli = Cli::try_parse_from([
            "pushwire",
            "--overlay",
            "a.toml",
            "--overlay",
            "b.toml",
            "inspect",
            "00",
        ])
        .unwrap();

        assert_eq!(cli.overlay, ["a.toml", "b.toml"]);
    }

    #[test]
    fn test_render_formats() {
        assert_eq!(render(&[0, 255], OutputFormat::Hex), "00ff");
        assert_eq!(render(b"hi", OutputFormat::Base64), "aGk=");
    }
}
