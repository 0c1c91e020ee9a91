use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::ImageTensor;

/// Side length of the square model input.
pub const INPUT_SIZE: u32 = 460;

/// Shape of every preprocessed tensor (NHWC).
pub const INPUT_SHAPE: [usize; 4] = [1, INPUT_SIZE as usize, INPUT_SIZE as usize, 3];

/// File extensions offered by the file pickers.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Resampling filter. Bicubic, matching how the models' training images were resized.
const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

/// Open and decode an image, detecting the format from its contents.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let decode_err = |source| Error::Decode {
        path: path.to_path_buf(),
        source,
    };
    ImageReader::open(path)
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)
}

/// Decode `path` and build the raw model input tensor.
pub fn preprocess(path: &Path) -> Result<ImageTensor> {
    let img = load_image(path)?;
    preprocess_image(&img)
}

/// Force RGB, stretch to 460x460 and widen to `f32` in `0.0..=255.0`.
///
/// The aspect ratio is not preserved. Both models expect stretched inputs.
pub fn preprocess_image(img: &DynamicImage) -> Result<ImageTensor> {
    debug!(
        "Preprocessing {}x{} image to {}x{}",
        img.width(),
        img.height(),
        INPUT_SIZE,
        INPUT_SIZE
    );
    let rgb = img.to_rgb8();
    let resized = image::imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, RESIZE_FILTER);
    let data: Vec<f32> = resized.into_raw().into_iter().map(f32::from).collect();
    ImageTensor::new(INPUT_SHAPE, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, Luma, Rgb, Rgba, RgbaImage};
    use std::io::Write;

    #[test]
    fn test_shape_is_fixed_for_any_input_size() {
        for (w, h) in [(460, 460), (100, 100), (1024, 300), (3, 999), (1, 1)] {
            let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(w, h, Rgb([10u8, 20, 30])));
            let tensor = preprocess_image(&img).unwrap();
            assert_eq!(tensor.shape(), [1, 460, 460, 3], "input {w}x{h}");
            assert_eq!(tensor.data().len(), 460 * 460 * 3);
        }
    }

    #[test]
    fn test_values_stay_in_pixel_range() {
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(50, 80, Rgb([200u8, 100, 0])));
        let tensor = preprocess_image(&img).unwrap();
        // Uniform input stays uniform after resampling.
        assert_eq!(tensor.pixel(0, 0), [200.0, 100.0, 0.0]);
        assert_eq!(tensor.pixel(459, 459), [200.0, 100.0, 0.0]);
        assert!(tensor.data().iter().all(|v| (0.0..=255.0).contains(v)));
    }

    #[test]
    fn test_grayscale_and_alpha_forced_to_rgb() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(20, 20, Luma([77u8])));
        let tensor = preprocess_image(&gray).unwrap();
        assert_eq!(tensor.pixel(5, 5), [77.0, 77.0, 77.0]);

        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 20, Rgba([1u8, 2, 3, 0])));
        let tensor = preprocess_image(&rgba).unwrap();
        assert_eq!(tensor.channels(), 3);
        assert_eq!(tensor.pixel(5, 5), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"definitely not a png").unwrap();
        let err = preprocess(file.path()).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = preprocess(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_image(Path::new("scan.png")));
        assert!(is_supported_image(Path::new("scan.JPG")));
        assert!(is_supported_image(Path::new("/tmp/scan.jpeg")));
        assert!(!is_supported_image(Path::new("scan.bmp")));
        assert!(!is_supported_image(Path::new("scan")));
    }
}
