use qrcode::render::unicode;
use qrcode::QrCode;

use shared::error::AppError;

/// Rendering options for generated QR images.
///
/// `width` caps the rendered module grid, `margin` toggles the quiet zone,
/// and the palette fields carry the two display colors requested by the
/// caller (the terminal renderer only honors them as light/dark inversion).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrOptions {
    pub width: u32,
    pub margin: u32,
    pub dark: String,
    pub light: String,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            width: 200,
            margin: 2,
            dark: String::from("#0f172a"),
            light: String::from("#ffffff"),
        }
    }
}

/// Encode an arbitrary UTF-8 payload into a unicode-block QR image.
///
/// Oversized payloads fail; the caller decides whether that failure is
/// surfaced or silently degrades the display.
pub fn encode(payload: &str, options: &QrOptions) -> Result<String, AppError> {
    let code = QrCode::new(payload.as_bytes())
        .map_err(|err| AppError::Qr(err.to_string()))?;

    let mut renderer = code.render::<unicode::Dense1x2>();
    renderer.quiet_zone(options.margin > 0);
    let max = options.width.max(1);
    renderer.max_dimensions(max, max);
    Ok(renderer.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_payload_renders_lines() {
        let image = encode("https://myhealth.app/share/abc", &QrOptions::default())
            .expect("encode share link");
        assert!(!image.is_empty());
        assert!(image.lines().count() > 4);
    }

    #[test]
    fn oversized_payload_reports_an_error() {
        let huge = "x".repeat(8_000);
        let err = encode(&huge, &QrOptions::default()).expect_err("payload too large");
        assert!(matches!(err, AppError::Qr(_)));
    }
}
