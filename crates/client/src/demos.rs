//! Scenario runners behind the CLI subcommands.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use pictech::output::save_payload;
use pictech::request::{
    CropRequest, InpaintRequest, OcrRequest, OutputFormat, ResizeMode, ResizeRequest,
    WATERMARK_TEMPLATES, WatermarkRequest,
};
use pictech::{ImageResult, PicTechClient, PicTechError};
use tracing::{error, info};

/// One request in a batch run.
pub enum Operation {
    Resize(ResizeRequest),
    Crop(CropRequest),
    Watermark(WatermarkRequest),
}

impl Operation {
    async fn run(&self, client: &PicTechClient) -> Result<ImageResult, PicTechError> {
        match self {
            Operation::Resize(request) => client.resize(request).await,
            Operation::Crop(request) => client.crop(request).await,
            Operation::Watermark(request) => client.watermark(request).await,
        }
    }
}

pub struct Scenario {
    pub title: String,
    pub file_name: String,
    pub operation: Operation,
}

impl Scenario {
    fn new(title: impl Into<String>, file_name: impl Into<String>, operation: Operation) -> Self {
        Self {
            title: title.into(),
            file_name: file_name.into(),
            operation,
        }
    }
}

/// Saves a successful result, or turns the failure into a reportable error.
pub async fn save_image(
    out_dir: &Path,
    file_name: &str,
    result: Result<ImageResult, PicTechError>,
) -> Result<()> {
    let image = result.with_context(|| format!("requesting {file_name}"))?;
    let path = save_payload(out_dir, file_name, &image.bytes)
        .await
        .with_context(|| format!("saving {file_name}"))?;
    println!("saved {} ({} bytes)", path.display(), image.bytes.len());
    Ok(())
}

/// Runs each scenario in turn. A failure is logged and the run continues.
async fn run_batch(
    client: &PicTechClient,
    scenarios: &[Scenario],
    out_dir: &Path,
    delay: Duration,
) -> Result<()> {
    let mut failures = 0;
    for (index, scenario) in scenarios.iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        info!(case = index + 1, title = %scenario.title, "running scenario");

        let started = Instant::now();
        let result = scenario.operation.run(client).await;
        let elapsed = started.elapsed();

        match save_image(out_dir, &scenario.file_name, result).await {
            Ok(()) => info!(case = index + 1, elapsed_ms = elapsed.as_millis() as u64, "ok"),
            Err(e) => {
                failures += 1;
                error!(case = index + 1, title = %scenario.title, "{e:#}");
            }
        }
    }

    println!("{} of {} scenarios succeeded", scenarios.len() - failures, scenarios.len());
    if failures == scenarios.len() && !scenarios.is_empty() {
        bail!("every scenario failed");
    }
    Ok(())
}

pub fn showcase_scenarios(image: &str) -> Vec<Scenario> {
    vec![
        Scenario::new(
            "scale down to 50%",
            "result_1_resize_50pct.jpg",
            Operation::Resize(
                ResizeRequest::new(image)
                    .scale(0.5)
                    .output(OutputFormat::Jpeg, Some(90)),
            ),
        ),
        Scenario::new(
            "diagonal tiled anti-theft watermark",
            "result_2_watermark_pattern.jpg",
            Operation::Watermark(
                WatermarkRequest::new(image, "pattern_diagonal_da")
                    .text("绝密资料 禁止外传")
                    .output(OutputFormat::Jpeg, Some(95)),
            ),
        ),
        Scenario::new(
            "centered approval stamp",
            "result_3_watermark_approved.jpg",
            Operation::Watermark(
                WatermarkRequest::new(image, "special_approved")
                    .output(OutputFormat::Jpeg, Some(90)),
            ),
        ),
        Scenario::new(
            "stretch to 200x300 as PNG",
            "result_4_fixed_200x300.png",
            Operation::Resize(
                ResizeRequest::new(image)
                    .size(Some(200), Some(300))
                    .mode(ResizeMode::Fixed)
                    .output(OutputFormat::Png, Some(100)),
            ),
        ),
        Scenario::new(
            "crop a 300x150 region",
            "result_5_crop_300x150.jpg",
            Operation::Crop(
                CropRequest::new(image, 100, 50, 300, 150).output(OutputFormat::Jpeg, None),
            ),
        ),
        Scenario::new(
            "watermark in all four corners",
            "result_6_corners.jpg",
            Operation::Watermark(
                WatermarkRequest::new(image, "multiple_corners")
                    .text("Company Logo")
                    .output(OutputFormat::Jpeg, None),
            ),
        ),
        Scenario::new(
            "width 300, height follows",
            "result_7_width_300.jpg",
            Operation::Resize(
                ResizeRequest::new(image)
                    .size(Some(300), None)
                    .mode(ResizeMode::Lfit),
            ),
        ),
    ]
}

/// Text to render for a template; `None` uses the template's own default.
fn sample_text(template: &str) -> Option<&'static str> {
    match template {
        "single_subtle_light" => Some("PicTech © 2026"),
        "special_multiline" => Some("内部资料\n仅供参考"),
        "single_strong_red" => Some("DANGER"),
        "multiple_corners" => Some("UID: 9527"),
        "multiple_edges" => Some("Edge Mark"),
        "pattern_subtle" => Some("PicTech"),
        "pattern_diagonal_da" => Some("禁止盗图 @PicTech"),
        "special_photography" => Some("ISO 200  f/1.8  1/500s"),
        _ => None,
    }
}

pub fn template_scenarios(image: &str) -> Vec<Scenario> {
    WATERMARK_TEMPLATES
        .iter()
        .enumerate()
        .map(|(index, (key, description))| {
            let mut request =
                WatermarkRequest::new(image, *key).output(OutputFormat::Jpeg, Some(90));
            request.text = sample_text(key).map(str::to_string);
            Scenario::new(
                format!("{description} [{key}]"),
                format!("test_{:02}_{key}.jpg", index + 1),
                Operation::Watermark(request),
            )
        })
        .collect()
}

pub fn override_scenarios(image: &str) -> Vec<Scenario> {
    vec![
        Scenario::new(
            "corners in opaque red, size 30",
            "debug_multiple_corners_RED.jpg",
            Operation::Watermark(
                WatermarkRequest::new(image, "multiple_corners")
                    .text("CORNER-TEST")
                    .style(Some("#FF0000".into()), Some(100), Some(30))
                    .output(OutputFormat::Jpeg, None),
            ),
        ),
        Scenario::new(
            "edges in opaque blue",
            "debug_multiple_edges_BLUE.jpg",
            Operation::Watermark(
                WatermarkRequest::new(image, "multiple_edges")
                    .text("EDGE-TEST")
                    .style(Some("#0000FF".into()), Some(100), None)
                    .output(OutputFormat::Jpeg, None),
            ),
        ),
    ]
}

pub async fn showcase(client: &PicTechClient, image: &str, out_dir: &Path) -> Result<()> {
    run_batch(client, &showcase_scenarios(image), out_dir, Duration::ZERO).await
}

pub async fn templates(
    client: &PicTechClient,
    image: &str,
    out_dir: &Path,
    delay: Duration,
) -> Result<()> {
    println!("rendering {} watermark templates", WATERMARK_TEMPLATES.len());
    run_batch(client, &template_scenarios(image), out_dir, delay).await
}

pub async fn overrides(client: &PicTechClient, image: &str, out_dir: &Path) -> Result<()> {
    run_batch(client, &override_scenarios(image), out_dir, Duration::ZERO).await
}

pub async fn ocr(client: &PicTechClient, path: &Path) -> Result<()> {
    let request = OcrRequest::from_path(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    info!(path = %path.display(), "sending OCR request");

    let result = client.ocr(&request).await.context("OCR request")?;

    println!("recognised {} text regions", result.texts.len());
    for (index, text) in result.texts.iter().enumerate() {
        println!("region {}: {text}", index + 1);
    }
    if let Some(request_id) = &result.request_id {
        println!("request id: {request_id}");
    }
    println!("{}", serde_json::to_string_pretty(&result.raw)?);
    Ok(())
}

pub async fn inpaint(
    client: &PicTechClient,
    image_url: &str,
    mask_url: &str,
    out_dir: &Path,
    name: &str,
) -> Result<()> {
    let image = client
        .download_base64(image_url)
        .await
        .with_context(|| format!("downloading source image {image_url}"))?;
    let mask = client
        .download_base64(mask_url)
        .await
        .with_context(|| format!("downloading mask {mask_url}"))?;

    let bytes = client
        .inpaint(&InpaintRequest::new(image, mask))
        .await
        .context("inpaint request")?;

    let file_name = format!("{name}.png");
    let path = save_payload(out_dir, &file_name, &bytes)
        .await
        .with_context(|| format!("saving {file_name}"))?;
    println!("saved {}", path.display());
    Ok(())
}
