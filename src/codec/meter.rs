use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::errors::AppError;

const METER_WIDTH: u32 = 400;
const METER_HEIGHT: u32 = 24;

const BORDER: Rgba<u8> = Rgba([0x2a, 0x2f, 0x52, 0xff]);
const TRACK: Rgba<u8> = Rgba([0x11, 0x19, 0x35, 0xff]);
const FILL: Rgba<u8> = Rgba([0xf5, 0x8a, 0x1f, 0xff]);

/// PNG snapshot of the carrot meter at `percentage` fill.
pub fn render_meter_png(percentage: u8) -> Result<Vec<u8>, AppError> {
    let inner_width = METER_WIDTH - 2;
    let fill_width = inner_width * u32::from(percentage.min(100)) / 100;

    let img = RgbaImage::from_fn(METER_WIDTH, METER_HEIGHT, |x, y| {
        if x == 0 || y == 0 || x == METER_WIDTH - 1 || y == METER_HEIGHT - 1 {
            BORDER
        } else if x - 1 < fill_width {
            FILL
        } else {
            TRACK
        }
    });

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| AppError::Internal(format!("Failed to encode meter snapshot: {}", e)))?;
    Ok(buf.into_inner())
}

/// The meter snapshot as an inline `data:` URI.
pub fn meter_data_uri(percentage: u8) -> Result<String, AppError> {
    let png = render_meter_png(percentage)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}
