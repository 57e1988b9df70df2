//! QR encoder backed by `qrcode` for symbol layout and `image` for PNG output.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{GrayImage, ImageFormat, Luma};
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Cursor;

/// MIME type of every encoded image.
pub const PNG_MIME_TYPE: &str = "image/png";

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// QR error correction strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCorrection {
    /// ~7% recoverable.
    Low,
    /// ~15% recoverable.
    Medium,
    /// ~25% recoverable.
    Quartile,
    /// ~30% recoverable.
    High,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(value: ErrorCorrection) -> Self {
        match value {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

/// Rendering parameters. These tune print quality only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEncoderOptions {
    pub error_correction: ErrorCorrection,
    /// Pixels per QR module (edge length of one square).
    pub module_px: u32,
    /// Quiet zone width in modules on each side.
    pub quiet_zone: u32,
}

impl Default for CodeEncoderOptions {
    fn default() -> Self {
        Self {
            error_correction: ErrorCorrection::Medium,
            module_px: 10,
            quiet_zone: 4,
        }
    }
}

#[derive(Debug)]
pub enum EncodeError {
    EmptyInput,
    /// Input does not fit a QR symbol at the chosen correction level.
    Symbol(QrError),
    Image(image::ImageError),
    InvalidOptions(String),
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "cannot encode empty text"),
            Self::Symbol(err) => write!(f, "QR symbol construction failed: {err}"),
            Self::Image(err) => write!(f, "PNG rendering failed: {err}"),
            Self::InvalidOptions(message) => write!(f, "invalid encoder options: {message}"),
        }
    }
}

impl Error for EncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Symbol(err) => Some(err),
            Self::Image(err) => Some(err),
            Self::EmptyInput | Self::InvalidOptions(_) => None,
        }
    }
}

impl From<QrError> for EncodeError {
    fn from(value: QrError) -> Self {
        Self::Symbol(value)
    }
}

impl From<image::ImageError> for EncodeError {
    fn from(value: image::ImageError) -> Self {
        Self::Image(value)
    }
}

/// Encoded code image plus its transport form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCode {
    pub image_bytes: Vec<u8>,
    pub mime_type: &'static str,
    /// Standard base64 of `image_bytes`, padded, without line breaks.
    pub transport_encoding: String,
    /// Edge length of the square image in pixels.
    pub size_px: u32,
}

impl EncodedCode {
    /// Returns a `data:` URL suitable for an `<img src>` attribute.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.transport_encoding)
    }
}

/// Encodes `text` with default rendering options.
pub fn encode(text: &str) -> Result<EncodedCode, EncodeError> {
    encode_with(text, &CodeEncoderOptions::default())
}

/// Encodes `text` into a QR PNG using explicit rendering options.
///
/// # Errors
/// - `EmptyInput` for empty text.
/// - `Symbol` when the text exceeds QR capacity.
/// - `InvalidOptions` for a zero module size.
pub fn encode_with(text: &str, options: &CodeEncoderOptions) -> Result<EncodedCode, EncodeError> {
    if text.is_empty() {
        return Err(EncodeError::EmptyInput);
    }
    if options.module_px == 0 {
        return Err(EncodeError::InvalidOptions(
            "module_px must be at least 1".to_string(),
        ));
    }

    let code = QrCode::with_error_correction_level(text.as_bytes(), options.error_correction.into())?;
    let image = render(&code, options)?;

    let mut image_bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut image_bytes), ImageFormat::Png)?;
    let transport_encoding = STANDARD.encode(&image_bytes);

    Ok(EncodedCode {
        image_bytes,
        mime_type: PNG_MIME_TYPE,
        transport_encoding,
        size_px: image.width(),
    })
}

fn render(code: &QrCode, options: &CodeEncoderOptions) -> Result<GrayImage, EncodeError> {
    let modules = u32::try_from(code.width())
        .map_err(|_| EncodeError::InvalidOptions("symbol width overflow".to_string()))?;
    let size_px = modules
        .checked_add(options.quiet_zone.saturating_mul(2))
        .and_then(|total| total.checked_mul(options.module_px))
        .ok_or_else(|| EncodeError::InvalidOptions("image size overflow".to_string()))?;

    let mut image = GrayImage::from_pixel(size_px, size_px, LIGHT);
    let offset = options.quiet_zone * options.module_px;

    for (index, color) in code.to_colors().into_iter().enumerate() {
        if color != Color::Dark {
            continue;
        }
        let index = index as u32;
        let left = offset + (index % modules) * options.module_px;
        let top = offset + (index / modules) * options.module_px;
        for y in top..top + options.module_px {
            for x in left..left + options.module_px {
                image.put_pixel(x, y, DARK);
            }
        }
    }

    Ok(image)
}
