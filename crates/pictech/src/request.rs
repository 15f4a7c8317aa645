//! Typed builders for each remote operation.

use std::fmt;
use std::path::Path;

use crate::params::ParameterSet;
use crate::payload::{encode_data_uri, mime_for_path};

pub const RESIZE_PATH: &str = "/tools/resize";
pub const CROP_PATH: &str = "/tools/crop";
pub const WATERMARK_PATH: &str = "/tools/watermark";
pub const OCR_PATH: &str = "/image_ocr_sync";
pub const INPAINT_PATH: &str = "/inpaint_image_sync";

/// Watermark template keys the service knows, with what each looks like.
pub const WATERMARK_TEMPLATES: &[(&str, &str)] = &[
    ("single_subtle_light", "bottom right, translucent white"),
    ("special_multiline", "bottom left, multi-line text"),
    ("single_strong_red", "centered red warning"),
    ("multiple_corners", "one mark per corner"),
    ("multiple_edges", "centered on each edge"),
    ("pattern_subtle", "straight tiled pattern"),
    ("pattern_diagonal_da", "diagonal anti-theft tiling"),
    ("special_photography", "camera settings, monospace"),
    ("special_confidential", "confidential stamp, default text"),
    ("special_approved", "green approval stamp, default text"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::Webp => "WEBP",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Fit inside the box, keeping the aspect ratio.
    Lfit,
    /// Stretch to exactly the given size.
    Fixed,
}

impl ResizeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ResizeMode::Lfit => "lfit",
            ResizeMode::Fixed => "fixed",
        }
    }
}

/// Options shared by the image-returning tools.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Encoding {
    pub output_format: Option<OutputFormat>,
    pub quality: Option<u8>,
}

impl Encoding {
    fn apply(&self, params: &mut ParameterSet) {
        params.insert_opt("OutputFormat", self.output_format.map(OutputFormat::as_str));
        params.insert_opt("Quality", self.quality);
    }

    /// Extension of the file the result should be saved as.
    pub fn extension(&self) -> &'static str {
        self.output_format.unwrap_or(OutputFormat::Jpeg).extension()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeRequest {
    pub image: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub scale: Option<f64>,
    pub mode: Option<ResizeMode>,
    pub encoding: Encoding,
}

impl ResizeRequest {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            width: None,
            height: None,
            scale: None,
            mode: None,
            encoding: Encoding::default(),
        }
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn size(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn mode(mut self, mode: ResizeMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn output(mut self, format: OutputFormat, quality: Option<u8>) -> Self {
        self.encoding = Encoding {
            output_format: Some(format),
            quality,
        };
        self
    }

    pub fn to_params(&self) -> ParameterSet {
        let mut params = ParameterSet::new().with("Image", &self.image);
        params.insert_opt("Width", self.width);
        params.insert_opt("Height", self.height);
        params.insert_opt("Scale", self.scale);
        params.insert_opt("Mode", self.mode.map(ResizeMode::as_str));
        self.encoding.apply(&mut params);
        params
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CropRequest {
    pub image: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub encoding: Encoding,
}

impl CropRequest {
    pub fn new(image: impl Into<String>, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            image: image.into(),
            x,
            y,
            width,
            height,
            encoding: Encoding::default(),
        }
    }

    pub fn output(mut self, format: OutputFormat, quality: Option<u8>) -> Self {
        self.encoding = Encoding {
            output_format: Some(format),
            quality,
        };
        self
    }

    pub fn to_params(&self) -> ParameterSet {
        let mut params = ParameterSet::new()
            .with("Image", &self.image)
            .with("X", self.x)
            .with("Y", self.y)
            .with("Width", self.width)
            .with("Height", self.height);
        self.encoding.apply(&mut params);
        params
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkRequest {
    pub image: String,
    pub template_key: String,
    /// `None` keeps the template's default text.
    pub text: Option<String>,
    pub color: Option<String>,
    pub opacity: Option<u8>,
    pub size: Option<u32>,
    pub encoding: Encoding,
}

impl WatermarkRequest {
    pub fn new(image: impl Into<String>, template_key: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            template_key: template_key.into(),
            text: None,
            color: None,
            opacity: None,
            size: None,
            encoding: Encoding::default(),
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Override the template's colour (`#RRGGBB`), opacity (0-100) and font size.
    pub fn style(mut self, color: Option<String>, opacity: Option<u8>, size: Option<u32>) -> Self {
        self.color = color;
        self.opacity = opacity;
        self.size = size;
        self
    }

    pub fn output(mut self, format: OutputFormat, quality: Option<u8>) -> Self {
        self.encoding = Encoding {
            output_format: Some(format),
            quality,
        };
        self
    }

    pub fn to_params(&self) -> ParameterSet {
        let mut params = ParameterSet::new()
            .with("Image", &self.image)
            .with("TemplateKey", &self.template_key);
        params.insert_opt("Text", self.text.as_deref());
        params.insert_opt("Color", self.color.as_deref());
        params.insert_opt("Opacity", self.opacity);
        params.insert_opt("Size", self.size);
        self.encoding.apply(&mut params);
        params
    }
}

/// OCR over an uploaded image, sent as a data URI.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrRequest {
    pub image_base64: String,
}

impl OcrRequest {
    pub fn from_bytes(bytes: &[u8], mime: &str) -> Self {
        Self {
            image_base64: encode_data_uri(bytes, mime),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::from_bytes(&bytes, mime_for_path(path)))
    }

    pub fn to_params(&self) -> ParameterSet {
        ParameterSet::new().with("ImageBase64", &self.image_base64)
    }
}

/// Inpainting: white mask pixels mark the area to repaint.
///
/// Both fields are plain Base64 without a data-URI prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct InpaintRequest {
    pub image: String,
    pub mask: String,
}

impl InpaintRequest {
    pub fn new(image: impl Into<String>, mask: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            mask: mask.into(),
        }
    }

    pub fn to_params(&self) -> ParameterSet {
        ParameterSet::new()
            .with("image", &self.image)
            .with("mask", &self.mask)
    }
}
