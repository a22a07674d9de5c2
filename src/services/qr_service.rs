//! Síntesis de códigos QR
//!
//! Este módulo codifica la URL destino de un vehículo en una matriz QR,
//! la rasteriza en el color de su categoría sobre fondo blanco y superpone
//! el logo centrado. La corrección de errores va fija en el nivel H: la
//! redundancia extra es lo que permite tapar ~20% del área con el logo sin
//! perder legibilidad.

use std::io::Cursor;
use std::path::Path;

use image::{imageops, DynamicImage, ImageFormat, Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};

use crate::utils::errors::AppError;

/// Módulos de zona de silencio alrededor del código
const QUIET_ZONE_MODULES: u32 = 1;

/// Fracción del lado del QR que ocupa el logo (1/5 = 20% por eje)
const LOGO_FRACTION: u32 = 5;

/// Margen blanco alrededor del logo, en píxeles
const LOGO_PADDING_PX: u32 = 5;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Servicio de generación de QR.
///
/// El logo se resuelve una sola vez al construir el servicio: si el archivo
/// no existe o no se puede decodificar, los QR se generan sin logo. Esa
/// degradación no es un error, solo se deja constancia en el log.
pub struct QrService {
    logo: Option<RgbaImage>,
}

impl QrService {
    pub fn new(logo_path: &str) -> Self {
        let logo = match image::open(Path::new(logo_path)) {
            Ok(img) => {
                tracing::info!("Logo cargado desde '{}'", logo_path);
                Some(img.to_rgba8())
            }
            Err(e) => {
                tracing::warn!(
                    "Logo no disponible en '{}' ({}), los QR se generarán sin logo",
                    logo_path,
                    e
                );
                None
            }
        };

        Self { logo }
    }

    /// Construir el servicio con un logo ya cargado (o sin logo)
    pub fn with_logo(logo: Option<RgbaImage>) -> Self {
        Self { logo }
    }

    /// Generar el PNG de un QR de `size_px` x `size_px` que codifica
    /// `payload_url`, con los módulos oscuros pintados en `color_hex`.
    pub fn synthesize(
        &self,
        payload_url: &str,
        color_hex: &str,
        size_px: u32,
    ) -> Result<Vec<u8>, AppError> {
        let dark = parse_hex_color(color_hex)?;

        let code = QrCode::with_error_correction_level(payload_url.as_bytes(), EcLevel::H)
            .map_err(|e| AppError::Render(format!("Error codificando QR: {}", e)))?;

        let mut img = rasterize(&code, dark, size_px);

        if let Some(ref logo) = self.logo {
            overlay_logo(&mut img, logo, size_px);
        }

        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| AppError::Render(format!("Error escribiendo PNG: {}", e)))?;

        Ok(bytes)
    }
}

/// Pintar la matriz de módulos a `size_px` x `size_px`, con zona de
/// silencio de un módulo por lado. Cada píxel se mapea al módulo más
/// cercano, así el tamaño de salida es exacto aunque no sea múltiplo del
/// ancho de la matriz.
fn rasterize(code: &QrCode, dark: Rgba<u8>, size_px: u32) -> RgbaImage {
    let modules = code.to_colors();
    let width = code.width() as u32;
    let total = width + 2 * QUIET_ZONE_MODULES;

    RgbaImage::from_fn(size_px, size_px, |x, y| {
        let mx = x * total / size_px;
        let my = y * total / size_px;

        let in_code = mx >= QUIET_ZONE_MODULES
            && mx < QUIET_ZONE_MODULES + width
            && my >= QUIET_ZONE_MODULES
            && my < QUIET_ZONE_MODULES + width;

        if in_code {
            let cx = mx - QUIET_ZONE_MODULES;
            let cy = my - QUIET_ZONE_MODULES;
            match modules[(cy * width + cx) as usize] {
                Color::Dark => dark,
                Color::Light => WHITE,
            }
        } else {
            WHITE
        }
    })
}

/// Superponer el logo centrado, escalado al 20% del lado, sobre un
/// recuadro blanco que sobresale `LOGO_PADDING_PX` del logo para que no
/// apoye directamente sobre módulos del código.
fn overlay_logo(img: &mut RgbaImage, logo: &RgbaImage, size_px: u32) {
    let logo_size = size_px / LOGO_FRACTION;
    if logo_size == 0 {
        return;
    }

    let scaled = imageops::resize(logo, logo_size, logo_size, imageops::FilterType::Lanczos3);

    let logo_x = (size_px - logo_size) / 2;
    let logo_y = (size_px - logo_size) / 2;

    let pad_x0 = logo_x.saturating_sub(LOGO_PADDING_PX);
    let pad_y0 = logo_y.saturating_sub(LOGO_PADDING_PX);
    let pad_x1 = (logo_x + logo_size + LOGO_PADDING_PX).min(size_px);
    let pad_y1 = (logo_y + logo_size + LOGO_PADDING_PX).min(size_px);

    for y in pad_y0..pad_y1 {
        for x in pad_x0..pad_x1 {
            img.put_pixel(x, y, WHITE);
        }
    }

    imageops::overlay(img, &scaled, logo_x as i64, logo_y as i64);
}

/// Parsear un color `#RRGGBB` a RGBA opaco
fn parse_hex_color(hex: &str) -> Result<Rgba<u8>, AppError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::Render(format!("Color inválido: '{}'", hex)));
    }

    let r = u8::from_str_radix(&digits[0..2], 16)
        .map_err(|_| AppError::Render(format!("Color inválido: '{}'", hex)))?;
    let g = u8::from_str_radix(&digits[2..4], 16)
        .map_err(|_| AppError::Render(format!("Color inválido: '{}'", hex)))?;
    let b = u8::from_str_radix(&digits[4..6], 16)
        .map_err(|_| AppError::Render(format!("Color inválido: '{}'", hex)))?;

    Ok(Rgba([r, g, b, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_URL: &str = "http://localhost:8080/car/a1b2c3d4";

    fn decode_png(png: &[u8]) -> String {
        let gray = image::load_from_memory(png).unwrap().to_luma8();
        let (width, height) = gray.dimensions();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            width as usize,
            height as usize,
            |x, y| gray.get_pixel(x as u32, y as u32)[0],
        );
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1, "se esperaba exactamente un QR en la imagen");
        let (_meta, content) = grids[0].decode().unwrap();
        content
    }

    fn test_logo() -> RgbaImage {
        RgbaImage::from_pixel(64, 64, Rgba([200, 30, 30, 255]))
    }

    #[test]
    fn test_roundtrip_without_logo() {
        let service = QrService::with_logo(None);
        let png = service.synthesize(TEST_URL, "#800000", 300).unwrap();

        assert_eq!(decode_png(&png), TEST_URL);
    }

    #[test]
    fn test_roundtrip_with_logo() {
        let service = QrService::with_logo(Some(test_logo()));
        let png = service.synthesize(TEST_URL, "#00008B", 300).unwrap();

        assert_eq!(decode_png(&png), TEST_URL);
    }

    #[test]
    fn test_missing_logo_degrades_gracefully() {
        let service = QrService::new("no/existe/logo.png");
        let png = service.synthesize(TEST_URL, "#800000", 300).unwrap();

        assert_eq!(decode_png(&png), TEST_URL);
    }

    #[test]
    fn test_output_dimensions() {
        let service = QrService::with_logo(Some(test_logo()));
        let png = service.synthesize(TEST_URL, "#00008B", 300).unwrap();

        let img = image::load_from_memory(&png).unwrap();
        assert_eq!(img.width(), 300);
        assert_eq!(img.height(), 300);
    }

    #[test]
    fn test_invalid_color_is_render_error() {
        let service = QrService::with_logo(None);
        let result = service.synthesize(TEST_URL, "granate", 300);

        assert!(matches!(result, Err(AppError::Render(_))));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#800000").unwrap(), Rgba([128, 0, 0, 255]));
        assert_eq!(parse_hex_color("#00008B").unwrap(), Rgba([0, 0, 139, 255]));
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#zzzzzz").is_err());
    }
}
