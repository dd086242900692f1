//! Rendered frames and image export

use crate::{Error, Result};
use glam::Vec3;
use image::{ImageBuffer, Rgba, RgbaImage};
use std::path::Path;

/// Linear RGB pixels in row-major order, row 0 at the top
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Vec3>,
}

impl Frame {
    /// Frame filled with `fill`
    pub fn new(width: u32, height: u32, fill: Vec3) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    /// Wrap an existing pixel buffer; the length must be `width * height`
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Vec3>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "frame of {width}x{height} needs {expected} pixels, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Vec3] {
        &mut self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the frame
    pub fn get(&self, x: u32, y: u32) -> Option<Vec3> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Largest per-channel difference against another frame of the same size
    pub fn max_difference(&self, other: &Frame) -> Option<f32> {
        if self.width != other.width || self.height != other.height {
            return None;
        }
        Some(
            self.pixels
                .iter()
                .zip(&other.pixels)
                .map(|(a, b)| (*a - *b).abs().max_element())
                .fold(0.0, f32::max),
        )
    }

    /// Gamma-encode into 8-bit RGBA
    pub fn to_rgba8(&self, gamma: f32) -> RgbaImage {
        let inv_gamma = 1.0 / gamma;
        let encode = |c: f32| (c.clamp(0.0, 1.0).powf(inv_gamma) * 255.0).round() as u8;

        let mut img = ImageBuffer::new(self.width, self.height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let c = self.pixels[y as usize * self.width as usize + x as usize];
            *pixel = Rgba([encode(c.x), encode(c.y), encode(c.z), 255]);
        }
        img
    }

    /// Write the frame to disk; the format follows the file extension
    pub fn save(&self, path: impl AsRef<Path>, gamma: f32) -> Result<()> {
        self.to_rgba8(gamma).save(path.as_ref())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pixels_checks_length() {
        assert!(Frame::from_pixels(2, 2, vec![Vec3::ZERO; 3]).is_err());
        assert!(Frame::from_pixels(2, 2, vec![Vec3::ZERO; 4]).is_ok());
    }

    #[test]
    fn get_is_row_major() {
        let pixels = (0..6).map(|i| Vec3::splat(i as f32)).collect();
        let frame = Frame::from_pixels(3, 2, pixels).unwrap();
        assert_eq!(frame.get(1, 1), Some(Vec3::splat(4.0)));
        assert_eq!(frame.get(3, 0), None);
    }

    #[test]
    fn rgba8_clamps_and_encodes() {
        let pixels = vec![Vec3::new(-1.0, 0.5, 2.0)];
        let frame = Frame::from_pixels(1, 1, pixels).unwrap();

        let linear = frame.to_rgba8(1.0);
        assert_eq!(linear.get_pixel(0, 0).0, [0, 128, 255, 255]);

        let encoded = frame.to_rgba8(2.2);
        assert!(encoded.get_pixel(0, 0).0[1] > 128);
    }

    #[test]
    fn max_difference_needs_matching_sizes() {
        let a = Frame::new(2, 2, Vec3::ZERO);
        let b = Frame::new(2, 2, Vec3::splat(0.25));
        assert_eq!(a.max_difference(&b), Some(0.25));
        assert_eq!(a.max_difference(&Frame::new(1, 1, Vec3::ZERO)), None);
    }
}
