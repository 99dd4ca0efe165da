use image::RgbImage;
use rayon::prelude::*;

use crate::error::LutError;

/// Immutable 3D color lookup table
///
/// Grid values are stored red-fastest (`r + g*n + b*n*n`), matching the
/// order of `.cube` data lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Lut3D {
    size: usize,
    domain_min: [f32; 3],
    domain_max: [f32; 3],
    data: Vec<[f32; 3]>,
    title: Option<String>,
}

impl Lut3D {
    /// Build a LUT from grid values in red-fastest order
    pub fn from_data(data: Vec<[f32; 3]>, size: usize) -> Result<Self, LutError> {
        if size < 2 {
            return Err(LutError::ParseFailed {
                reason: format!("LUT_3D_SIZE must be at least 2, got {}", size),
            });
        }

        let expected = size
            .checked_pow(3)
            .ok_or_else(|| LutError::ParseFailed { reason: format!("LUT_3D_SIZE {} is too large", size) })?;
        if data.len() != expected {
            return Err(LutError::ParseFailed {
                reason: format!("expected {} values, found {}", expected, data.len()),
            });
        }

        if data.iter().flatten().any(|v| !v.is_finite()) {
            return Err(LutError::ParseFailed { reason: "non-finite grid value".to_string() });
        }

        Ok(Self {
            size,
            domain_min: [0.0; 3],
            domain_max: [1.0; 3],
            data,
            title: None,
        })
    }

    /// Identity transform sampled on a `size`³ grid
    pub fn identity(size: usize) -> Self {
        let size = size.max(2);
        let n = (size - 1) as f32;
        let mut data = Vec::with_capacity(size * size * size);
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    data.push([r as f32 / n, g as f32 / n, b as f32 / n]);
                }
            }
        }

        Self {
            size,
            domain_min: [0.0; 3],
            domain_max: [1.0; 3],
            data,
            title: None,
        }
    }

    /// Set the input domain mapped onto the grid
    pub fn with_domain(mut self, min: [f32; 3], max: [f32; 3]) -> Result<Self, LutError> {
        if (0..3).any(|c| !(max[c] > min[c])) {
            return Err(LutError::ParseFailed {
                reason: format!("invalid domain {:?}..{:?}", min, max),
            });
        }
        self.domain_min = min;
        self.domain_max = max;
        Ok(self)
    }

    pub fn with_title(mut self, title: String) -> Self {
        self.title = Some(title);
        self
    }

    /// Grid resolution along each axis
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[inline]
    fn get(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        self.data[r + g * self.size + b * self.size * self.size]
    }

    #[inline]
    fn normalize(&self, rgb: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0; 3];
        for c in 0..3 {
            let span = self.domain_max[c] - self.domain_min[c];
            out[c] = ((rgb[c] - self.domain_min[c]) / span).clamp(0.0, 1.0);
        }
        out
    }

    /// Map one RGB triple through the table with trilinear interpolation
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let [r, g, b] = self.normalize(rgb);
        let n = (self.size - 1) as f32;

        let ri = ((r * n).floor() as usize).min(self.size - 2);
        let gi = ((g * n).floor() as usize).min(self.size - 2);
        let bi = ((b * n).floor() as usize).min(self.size - 2);

        let rf = r * n - ri as f32;
        let gf = g * n - gi as f32;
        let bf = b * n - bi as f32;

        let c000 = self.get(ri, gi, bi);
        let c100 = self.get(ri + 1, gi, bi);
        let c010 = self.get(ri, gi + 1, bi);
        let c110 = self.get(ri + 1, gi + 1, bi);
        let c001 = self.get(ri, gi, bi + 1);
        let c101 = self.get(ri + 1, gi, bi + 1);
        let c011 = self.get(ri, gi + 1, bi + 1);
        let c111 = self.get(ri + 1, gi + 1, bi + 1);

        let mut result = [0.0f32; 3];
        for c in 0..3 {
            let c00 = c000[c] * (1.0 - rf) + c100[c] * rf;
            let c10 = c010[c] * (1.0 - rf) + c110[c] * rf;
            let c01 = c001[c] * (1.0 - rf) + c101[c] * rf;
            let c11 = c011[c] * (1.0 - rf) + c111[c] * rf;

            let c0 = c00 * (1.0 - gf) + c10 * gf;
            let c1 = c01 * (1.0 - gf) + c11 * gf;

            result[c] = c0 * (1.0 - bf) + c1 * bf;
        }
        result
    }

    /// Grade every pixel of an 8-bit RGB image
    ///
    /// Samples are normalized to [0, 1], mapped, clamped and rounded back to
    /// 8 bits. Rows are processed in parallel.
    pub fn grade(&self, image: &RgbImage) -> Result<RgbImage, LutError> {
        let (width, height) = image.dimensions();
        let mut data = image.as_raw().clone();
        let row_len = width as usize * 3;

        if row_len > 0 {
            data.par_chunks_mut(row_len).for_each(|row| {
                for px in row.chunks_exact_mut(3) {
                    let rgb = [
                        px[0] as f32 / 255.0,
                        px[1] as f32 / 255.0,
                        px[2] as f32 / 255.0,
                    ];
                    let out = self.apply(rgb);
                    for c in 0..3 {
                        px[c] = (out[c].clamp(0.0, 1.0) * 255.0).round() as u8;
                    }
                }
            });
        }

        RgbImage::from_raw(width, height, data).ok_or_else(|| LutError::TransformFailed {
            reason: format!("graded buffer does not fit {}x{}", width, height),
        })
    }
}
