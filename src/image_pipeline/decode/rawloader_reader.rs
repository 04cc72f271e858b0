//! Camera RAW reader built on the rawloader library.
//!
//! Handles the RAW formats rawloader knows about (ARW, CR2, NEF, DNG, RAF, ...).
//! The sensor data goes through a small development pipeline before it reaches
//! the luma conversion:
//! black level -> demosaic -> white balance -> camera to sRGB matrix -> sRGB curve.
//! Everything up to the curve stays linear at 16 bits.

use std::io::Cursor;

use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use rawloader::RawImageData as RawloaderImageData;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::decode::reader::ColorImageReader;
use crate::image_pipeline::decode::types::RgbImageData;

/// RAW image reader that uses the rawloader library for decoding.
#[derive(Default)]
pub struct RawLoaderReader;

type Matrix3 = [[f32; 3]; 3];

const IDENTITY: Matrix3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Linear sRGB (D65) to XYZ
const SRGB_TO_XYZ: Matrix3 = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

impl ColorImageReader for RawLoaderReader {
    fn read_rgb(&self, data: &[u8]) -> Result<RgbImageData> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        let width = decoded.width;
        let height = decoded.height;
        let cpp = decoded.cpp;

        debug!("Decoded RAW image: {}x{}, {} component(s) per pixel", width, height, cpp);

        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        let black = decoded.blacklevels[0];
        let white = decoded.whitelevels[0];
        let samples: Vec<u16> = match &decoded.data {
            RawloaderImageData::Integer(values) => scale_to_u16(values, black, white),
            // Float data is already normalized to 0.0-1.0
            RawloaderImageData::Float(values) => values
                .iter()
                .map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16)
                .collect(),
        };

        let expected = width * height * cpp;
        if samples.len() < expected {
            return Err(ConversionError::DecodeError(format!(
                "RAW data holds {} samples, expected {}",
                samples.len(),
                expected
            )));
        }

        let linear = match cpp {
            1 => {
                let cfa = cfa_from_name(&decoded.cfa.name).ok_or_else(|| {
                    ConversionError::DecodeError(format!(
                        "unsupported CFA pattern: {}",
                        decoded.cfa.name
                    ))
                })?;
                demosaic(&samples[..expected], width, height, cfa)?
            }
            3 => samples[..expected].to_vec(),
            other => {
                return Err(ConversionError::DecodeError(format!(
                    "unsupported component count: {}",
                    other
                )));
            }
        };

        let wb = white_balance(decoded.wb_coeffs);
        let matrix = camera_to_srgb(&decoded.xyz_to_cam);
        debug!(?wb, ?matrix, "Developing RAW image");

        Ok(RgbImageData {
            width,
            height,
            data: develop(&linear, wb, &matrix),
        })
    }
}

fn demosaic(mosaic: &[u16], width: usize, height: usize, cfa: CFA) -> Result<Vec<u16>> {
    debug!("Running demosaic with CFA={:?}, algo=Linear", cfa);

    let bayer_bytes: Vec<u8> = mosaic.iter().flat_map(|v| v.to_le_bytes()).collect();
    let mut output_buf = vec![0u8; width * height * RgbImageData::CHANNELS * 2];
    let mut raster = RasterMut::new(width, height, RasterDepth::Depth16, &mut output_buf);

    bayer::run_demosaic(
        &mut Cursor::new(&bayer_bytes[..]),
        BayerDepth::Depth16LE,
        cfa,
        Demosaic::Linear,
        &mut raster,
    )
    .map_err(|e| ConversionError::DecodeError(format!("Demosaic failed: {:?}", e)))?;

    // 16-bit raster rows are stored as native u16
    Ok(output_buf
        .chunks_exact(2)
        .map(|b| u16::from_ne_bytes([b[0], b[1]]))
        .collect())
}

/// Maps sensor values in `black..=white` onto the full u16 range.
fn scale_to_u16(values: &[u16], black: u16, white: u16) -> Vec<u16> {
    let black = black as f32;
    let range = (white as f32 - black).max(1.0);

    values
        .iter()
        .map(|&v| (((v as f32 - black).max(0.0) / range).min(1.0) * u16::MAX as f32).round() as u16)
        .collect()
}

/// Per-channel multipliers normalized to green. Missing or invalid
/// coefficients (rawloader reports NaN for unknown cameras) leave the
/// channel untouched.
fn white_balance(coeffs: [f32; 4]) -> [f32; 3] {
    let green = coeffs[1];
    if !(green.is_finite() && green > 0.0) {
        return [1.0; 3];
    }

    let ratio = |c: f32| if c.is_finite() && c > 0.0 { c / green } else { 1.0 };
    [ratio(coeffs[0]), 1.0, ratio(coeffs[2])]
}

/// Camera RGB to linear sRGB, with rows normalized so that white-balanced
/// camera white stays white. Identity when the camera matrix is unknown.
fn camera_to_srgb(xyz_to_cam: &[[f32; 3]; 4]) -> Matrix3 {
    // Rows are camera channels, the 4th only matters for four-color sensors.
    let xyz_to_cam: Matrix3 = [xyz_to_cam[0], xyz_to_cam[1], xyz_to_cam[2]];
    let mut cam_from_srgb = multiply(&xyz_to_cam, &SRGB_TO_XYZ);

    for row in cam_from_srgb.iter_mut() {
        let sum: f32 = row.iter().sum();
        if !sum.is_finite() || sum.abs() < 1e-6 {
            return IDENTITY;
        }
        row.iter_mut().for_each(|v| *v /= sum);
    }

    invert(&cam_from_srgb).unwrap_or(IDENTITY)
}

fn develop(rgb: &[u16], wb: [f32; 3], matrix: &Matrix3) -> Vec<u8> {
    rgb.chunks_exact(RgbImageData::CHANNELS)
        .flat_map(|px| {
            let linear = [
                px[0] as f32 / u16::MAX as f32 * wb[0],
                px[1] as f32 / u16::MAX as f32 * wb[1],
                px[2] as f32 / u16::MAX as f32 * wb[2],
            ];
            (*matrix).map(|row| encode_srgb(row[0] * linear[0] + row[1] * linear[1] + row[2] * linear[2]))
        })
        .collect()
}

/// Linear light to 8-bit sRGB.
fn encode_srgb(v: f32) -> u8 {
    let v = v.clamp(0.0, 1.0);
    let encoded = if v <= 0.0031308 {
        12.92 * v
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round() as u8
}

fn multiply(a: &Matrix3, b: &Matrix3) -> Matrix3 {
    let mut out = [[0.0f32; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            out[r][c] = (0..3).map(|k| a[r][k] * b[k][c]).sum();
        }
    }
    out
}

fn invert(m: &Matrix3) -> Option<Matrix3> {
    let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
    if !det.is_finite() || det.abs() < 1e-9 {
        return None;
    }

    let inv_det = 1.0 / det;
    Some([
        [
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
        ],
        [
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
        ],
    ])
}

fn cfa_from_name(name: &str) -> Option<CFA> {
    match name {
        "RGGB" => Some(CFA::RGGB),
        "BGGR" => Some(CFA::BGGR),
        "GRBG" => Some(CFA::GRBG),
        "GBRG" => Some(CFA::GBRG),
        _ => None,
    }
}
