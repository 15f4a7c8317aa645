mod demos;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use pictech::request::{CropRequest, OutputFormat, ResizeMode, ResizeRequest, WatermarkRequest};
use pictech::{ClientConfig, ParameterSet, PicTechClient, ReqwestTransport, TimestampUnit};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TimestampArg {
    Seconds,
    Millis,
}

impl From<TimestampArg> for TimestampUnit {
    fn from(arg: TimestampArg) -> Self {
        match arg {
            TimestampArg::Seconds => TimestampUnit::Seconds,
            TimestampArg::Millis => TimestampUnit::Millis,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Jpeg,
    Png,
    Webp,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Webp => OutputFormat::Webp,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Lfit,
    Fixed,
}

impl From<ModeArg> for ResizeMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Lfit => ResizeMode::Lfit,
            ModeArg::Fixed => ResizeMode::Fixed,
        }
    }
}

#[derive(Parser)]
#[clap(name = "pictech", about = "Signed requests against the PicTech image API")]
struct Args {
    #[clap(long, env = "PICTECH_API_HOST", default_value = pictech::config::DEFAULT_API_HOST)]
    api_host: String,
    #[clap(long, env = "PICTECH_ACCOUNT_ID")]
    account_id: String,
    #[clap(long, env = "PICTECH_SECRET_KEY", hide_env_values = true)]
    secret_key: String,
    #[clap(long, env = "PICTECH_TIMESTAMP_UNIT", value_enum, default_value = "seconds")]
    timestamp_unit: TimestampArg,
    /// Connect timeout in seconds.
    #[clap(long, env = "PICTECH_CONNECT_TIMEOUT", default_value = "15")]
    connect_timeout: u64,
    #[clap(long, default_value = ".")]
    out_dir: PathBuf,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the signed request body for KEY=VALUE parameters.
    Sign {
        #[clap(value_parser = parse_key_value, required = true)]
        params: Vec<(String, String)>,
    },
    /// Resize an image by scale or to a target size.
    Resize {
        #[clap(long)]
        image: String,
        #[clap(long)]
        width: Option<u32>,
        #[clap(long)]
        height: Option<u32>,
        #[clap(long)]
        scale: Option<f64>,
        #[clap(long, value_enum)]
        mode: Option<ModeArg>,
        #[clap(long, value_enum, default_value = "jpeg")]
        format: FormatArg,
        #[clap(long)]
        quality: Option<u8>,
        #[clap(long, default_value = "resize")]
        name: String,
    },
    /// Crop a rectangle out of an image.
    Crop {
        #[clap(long)]
        image: String,
        #[clap(long)]
        x: u32,
        #[clap(long)]
        y: u32,
        #[clap(long)]
        width: u32,
        #[clap(long)]
        height: u32,
        #[clap(long, value_enum, default_value = "jpeg")]
        format: FormatArg,
        #[clap(long)]
        quality: Option<u8>,
        #[clap(long, default_value = "crop")]
        name: String,
    },
    /// Stamp a watermark template onto an image.
    Watermark {
        #[clap(long)]
        image: String,
        #[clap(long)]
        template: String,
        #[clap(long)]
        text: Option<String>,
        #[clap(long)]
        color: Option<String>,
        #[clap(long)]
        opacity: Option<u8>,
        #[clap(long)]
        size: Option<u32>,
        #[clap(long, value_enum, default_value = "jpeg")]
        format: FormatArg,
        #[clap(long)]
        quality: Option<u8>,
        #[clap(long, default_value = "watermark")]
        name: String,
    },
    /// Run the resize, crop and watermark scenarios against one image.
    Showcase {
        #[clap(long)]
        image: String,
    },
    /// Render every known watermark template.
    Templates {
        #[clap(long)]
        image: String,
        /// Pause between requests, in milliseconds.
        #[clap(long, default_value = "500")]
        delay_ms: u64,
        /// Also run the colour/opacity/size override cases.
        #[clap(long)]
        overrides: bool,
    },
    /// Recognise text in a local image.
    Ocr { path: PathBuf },
    /// Repair the white areas of a mask.
    Inpaint {
        #[clap(long)]
        image: String,
        #[clap(long)]
        mask: String,
        #[clap(long, default_value = "inpaint_result")]
        name: String,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    if key.is_empty() {
        return Err(format!("empty key in {s:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "pictech=info".to_string());
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = ClientConfig::new(args.account_id, args.secret_key)
        .with_api_host(args.api_host)
        .with_connect_timeout(Duration::from_secs(args.connect_timeout))
        .with_timestamp_unit(args.timestamp_unit.into());

    let transport = ReqwestTransport::new(config.connect_timeout).context("building HTTP client")?;
    let client = PicTechClient::new(config, Arc::new(transport)).context("invalid configuration")?;
    let out_dir = args.out_dir;

    match args.command {
        Command::Sign { params } => {
            let params: ParameterSet = params.into_iter().collect();
            let signed = client.sign_params(params).context("signing parameters")?;
            println!("{}", serde_json::to_string_pretty(&signed)?);
            Ok(())
        }
        Command::Resize {
            image,
            width,
            height,
            scale,
            mode,
            format,
            quality,
            name,
        } => {
            if width.is_none() && height.is_none() && scale.is_none() {
                bail!("resize needs --width, --height or --scale");
            }
            let mut request = ResizeRequest::new(image)
                .size(width, height)
                .output(format.into(), quality);
            request.scale = scale;
            request.mode = mode.map(Into::into);
            let file = format!("{name}.{}", request.encoding.extension());
            demos::save_image(&out_dir, &file, client.resize(&request).await).await
        }
        Command::Crop {
            image,
            x,
            y,
            width,
            height,
            format,
            quality,
            name,
        } => {
            let request =
                CropRequest::new(image, x, y, width, height).output(format.into(), quality);
            let file = format!("{name}.{}", request.encoding.extension());
            demos::save_image(&out_dir, &file, client.crop(&request).await).await
        }
        Command::Watermark {
            image,
            template,
            text,
            color,
            opacity,
            size,
            format,
            quality,
            name,
        } => {
            let mut request = WatermarkRequest::new(image, template)
                .style(color, opacity, size)
                .output(format.into(), quality);
            request.text = text;
            let file = format!("{name}.{}", request.encoding.extension());
            demos::save_image(&out_dir, &file, client.watermark(&request).await).await
        }
        Command::Showcase { image } => demos::showcase(&client, &image, &out_dir).await,
        Command::Templates {
            image,
            delay_ms,
            overrides,
        } => {
            demos::templates(&client, &image, &out_dir, Duration::from_millis(delay_ms)).await?;
            if overrides {
                demos::overrides(&client, &image, &out_dir).await?;
            }
            Ok(())
        }
        Command::Ocr { path } => demos::ocr(&client, &path).await,
        Command::Inpaint { image, mask, name } => {
            demos::inpaint(&client, &image, &mask, &out_dir, &name).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_splits_on_first_equals() {
        assert_eq!(
            parse_key_value("Image=https://x.test/?a=1").unwrap(),
            ("Image".to_string(), "https://x.test/?a=1".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
