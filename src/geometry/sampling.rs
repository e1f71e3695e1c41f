//! Average-pool downsampling of domain blocks
//!
//! Domain blocks are twice the linear size of range blocks, so every fit runs
//! them through a 2x2 mean pool first to bring both operands to equal shape.

use crate::io::error::{Result, invalid_parameter};
use ndarray::{Array2, ArrayView2};

/// Halve both dimensions of a block by averaging disjoint 2x2 groups
///
/// # Errors
///
/// Returns an error if either dimension of the block is odd
pub fn downsample2x(block: &ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    let (height, width) = block.dim();
    if height % 2 != 0 || width % 2 != 0 {
        return Err(invalid_parameter(
            "block",
            &format!("{height}x{width}"),
            &"2x2 pooling requires even dimensions",
        ));
    }

    Ok(Array2::from_shape_fn((height / 2, width / 2), |(i, j)| {
        let group = [
            (2 * i, 2 * j),
            (2 * i + 1, 2 * j),
            (2 * i, 2 * j + 1),
            (2 * i + 1, 2 * j + 1),
        ];
        let sum: f64 = group
            .iter()
            .map(|&pos| block.get(pos).copied().unwrap_or(0.0))
            .sum();
        0.25 * sum
    }))
}

#[cfg(test)]
mod tests {
    use super::downsample2x;
    use ndarray::array;

    #[test]
    fn test_downsample_averages_disjoint_groups() {
        let block = array![
            [1.0, 1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 0.5, 0.5],
            [0.0, 0.0, 0.5, 0.5],
        ];
        let pooled = downsample2x(&block.view()).unwrap();
        assert_eq!(pooled, array![[1.0, 0.0], [0.0, 0.5]]);
    }

    #[test]
    fn test_downsample_mixed_group() {
        let block = array![[0.0, 1.0], [1.0, 0.0]];
        let pooled = downsample2x(&block.view()).unwrap();
        assert_eq!(pooled.dim(), (1, 1));
        assert!((pooled.get((0, 0)).copied().unwrap_or(f64::NAN) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_odd_dimensions_rejected() {
        let block = ndarray::Array2::<f64>::zeros((3, 4));
        assert!(downsample2x(&block.view()).is_err());
        let block = ndarray::Array2::<f64>::zeros((4, 3));
        assert!(downsample2x(&block.view()).is_err());
    }
}
