//! Fingerprint image checks
//!
//! Uploads are decoded and reduced to 8-bit grayscale, then rejected when
//! they are flat, small or lack tonal variety. Each rejection carries the
//! message shown to the user.

use image::GrayImage;

/// Minimum grayscale standard deviation
pub const MIN_CONTRAST: f64 = 30.0;
/// Minimum width and height in pixels
pub const MIN_SIDE: u32 = 100;
/// Minimum Shannon entropy of the 256-bin histogram, in bits
pub const MIN_ENTROPY: f64 = 4.0;

pub const MSG_LOW_CONTRAST: &str =
    "Image has low contrast. Please upload a clearer fingerprint image.";
pub const MSG_TOO_SMALL: &str = "Image is too small. Please upload a larger fingerprint image.";
pub const MSG_TOO_UNIFORM: &str =
    "Image appears to be too uniform. Please upload a proper fingerprint image.";

/// Decode `bytes` and check that they look like a fingerprint scan
pub fn validate_fingerprint(bytes: &[u8]) -> Result<(), String> {
    let gray = image::load_from_memory(bytes)
        .map_err(|e| format!("Error validating image: {}", e))?
        .to_luma8();

    if contrast(&gray) < MIN_CONTRAST {
        return Err(MSG_LOW_CONTRAST.to_string());
    }
    if gray.width() < MIN_SIDE || gray.height() < MIN_SIDE {
        return Err(MSG_TOO_SMALL.to_string());
    }
    if entropy(&gray) < MIN_ENTROPY {
        return Err(MSG_TOO_UNIFORM.to_string());
    }
    Ok(())
}

/// Population standard deviation of the pixel values
fn contrast(gray: &GrayImage) -> f64 {
    let n = gray.as_raw().len();
    if n == 0 {
        return 0.0;
    }
    let mean = gray.as_raw().iter().map(|&p| p as f64).sum::<f64>() / n as f64;
    let variance = gray
        .as_raw()
        .iter()
        .map(|&p| (p as f64 - mean).powi(2))
        .sum::<f64>()
        / n as f64;
    variance.sqrt()
}

fn entropy(gray: &GrayImage) -> f64 {
    let mut histogram = [0u64; 256];
    for &p in gray.as_raw() {
        histogram[p as usize] += 1;
    }
    let total = gray.as_raw().len() as f64;
    if total == 0.0 {
        return 0.0;
    }

    histogram
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// PNG bytes for a grayscale image built pixel by pixel
#[cfg(test)]
pub(crate) fn encode_png(width: u32, height: u32, pixel: impl Fn(u32, u32) -> u8) -> Vec<u8> {
    let img = GrayImage::from_fn(width, height, |x, y| image::Luma([pixel(x, y)]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// A 128x128 image with plenty of contrast and tonal range
#[cfg(test)]
pub(crate) fn sample_print() -> Vec<u8> {
    encode_png(128, 128, |x, y| ((x * 7 + y * 13) % 256) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_textured_image() {
        assert_eq!(validate_fingerprint(&sample_print()), Ok(()));
    }

    #[test]
    fn test_rejects_flat_image() {
        let flat = encode_png(128, 128, |_, _| 200);
        assert_eq!(validate_fingerprint(&flat).unwrap_err(), MSG_LOW_CONTRAST);
    }

    #[test]
    fn test_rejects_small_image() {
        let checker = encode_png(40, 40, |x, y| if (x + y) % 2 == 0 { 0 } else { 255 });
        assert_eq!(validate_fingerprint(&checker).unwrap_err(), MSG_TOO_SMALL);
    }

    #[test]
    fn test_rejects_two_tone_image() {
        // High contrast but a single bit of entropy
        let stripes = encode_png(128, 128, |x, _| if (x / 4) % 2 == 0 { 0 } else { 255 });
        assert_eq!(validate_fingerprint(&stripes).unwrap_err(), MSG_TOO_UNIFORM);
    }

    #[test]
    fn test_rejects_undecodable_bytes() {
        let err = validate_fingerprint(b"not an image").unwrap_err();
        assert!(err.starts_with("Error validating image:"));
    }
}
