//! Per-model input normalization.
//!
//! The two ensemble members were trained with different preprocessing, so each
//! gets its own transform of the shared raw tensor. Both produce a new tensor
//! and leave the input untouched.

use crate::models::ImageTensor;

/// Channel means subtracted in caffe mode, in BGR order.
pub const CAFFE_MEAN_BGR: [f32; 3] = [103.939, 116.779, 123.68];

/// ImageNet channel means for torch mode, in RGB order.
pub const TORCH_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// ImageNet channel standard deviations for torch mode, in RGB order.
pub const TORCH_STD: [f32; 3] = [0.229, 0.224, 0.225];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// RGB to BGR, then per-channel mean subtraction. No rescaling.
    Caffe,
    /// Scale to `[0, 1]`, then subtract mean and divide by std per channel.
    Torch,
}

impl Normalization {
    pub fn apply(self, input: &ImageTensor) -> ImageTensor {
        let mut data = Vec::with_capacity(input.data().len());
        for px in input.data().chunks_exact(3) {
            match self {
                Normalization::Caffe => {
                    for c in 0..3 {
                        data.push(px[2 - c] - CAFFE_MEAN_BGR[c]);
                    }
                }
                Normalization::Torch => {
                    for c in 0..3 {
                        data.push((px[c] / 255.0 - TORCH_MEAN[c]) / TORCH_STD[c]);
                    }
                }
            }
        }
        ImageTensor::from_normalized(input.shape(), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_pixel(rgb: [f32; 3]) -> ImageTensor {
        ImageTensor::new([1, 1, 1, 3], rgb.to_vec()).unwrap()
    }

    fn assert_close(actual: [f32; 3], expected: [f32; 3]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-4, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_caffe_reverses_channels_and_subtracts_mean() {
        let out = Normalization::Caffe.apply(&single_pixel([10.0, 20.0, 30.0]));
        assert_close(
            out.pixel(0, 0),
            [30.0 - 103.939, 20.0 - 116.779, 10.0 - 123.68],
        );
    }

    #[test]
    fn test_torch_rescales_and_standardizes() {
        let out = Normalization::Torch.apply(&single_pixel([255.0, 0.0, 127.5]));
        assert_close(
            out.pixel(0, 0),
            [
                (1.0 - 0.485) / 0.229,
                (0.0 - 0.456) / 0.224,
                (0.5 - 0.406) / 0.225,
            ],
        );
    }

    #[test]
    fn test_input_is_not_mutated() {
        let raw = ImageTensor::new([1, 1, 2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let before = raw.clone();
        let a = Normalization::Caffe.apply(&raw);
        let b = Normalization::Torch.apply(&raw);
        assert_eq!(raw, before);
        assert_eq!(a.shape(), raw.shape());
        assert_eq!(b.shape(), raw.shape());
        assert_ne!(a, b);
    }
}
