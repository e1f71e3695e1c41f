//! The eight distance-preserving symmetries of the square
//!
//! Domain blocks are transformed by one of these before affine fitting, which
//! multiplies the search space eightfold at negligible cost. Rotations follow
//! the counter-clockwise convention.

use crate::io::error::{Result, invalid_parameter};
use ndarray::{Array2, ArrayView2, s};

/// One of the eight square symmetry operations
///
/// The discriminants match the on-disk isometry ids used by [`crate::codec::Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Isometry {
    /// Leave the block unchanged
    Identity,
    /// Rotate 90 degrees counter-clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees counter-clockwise
    Rotate270,
    /// Mirror left-right
    FlipHorizontal,
    /// Mirror top-bottom
    FlipVertical,
    /// Reflect across the main diagonal
    Transpose,
    /// Reflect across the anti-diagonal
    AntiTranspose,
}

impl Isometry {
    /// All isometries in id order, the order the encoder searches them
    pub const ALL: [Self; 8] = [
        Self::Identity,
        Self::Rotate90,
        Self::Rotate180,
        Self::Rotate270,
        Self::FlipHorizontal,
        Self::FlipVertical,
        Self::Transpose,
        Self::AntiTranspose,
    ];

    /// Numeric id of this isometry, in 0..=7
    pub const fn index(self) -> u8 {
        match self {
            Self::Identity => 0,
            Self::Rotate90 => 1,
            Self::Rotate180 => 2,
            Self::Rotate270 => 3,
            Self::FlipHorizontal => 4,
            Self::FlipVertical => 5,
            Self::Transpose => 6,
            Self::AntiTranspose => 7,
        }
    }

    /// Look up an isometry by its numeric id
    ///
    /// # Errors
    ///
    /// Returns an error if the id is outside 0..=7
    pub fn from_index(id: u8) -> Result<Self> {
        match id {
            0 => Ok(Self::Identity),
            1 => Ok(Self::Rotate90),
            2 => Ok(Self::Rotate180),
            3 => Ok(Self::Rotate270),
            4 => Ok(Self::FlipHorizontal),
            5 => Ok(Self::FlipVertical),
            6 => Ok(Self::Transpose),
            7 => Ok(Self::AntiTranspose),
            _ => Err(invalid_parameter(
                "isometry_id",
                &id,
                &"isometry ids are 0..=7",
            )),
        }
    }

    /// Apply this isometry to a block, returning a transformed copy
    ///
    /// Transpose-family operations swap height and width for non-square
    /// blocks; the codec only ever passes square blocks.
    pub fn apply(self, block: &ArrayView2<'_, f64>) -> Array2<f64> {
        match self {
            Self::Identity => block.to_owned(),
            Self::Rotate90 => block.t().slice(s![..;-1, ..]).to_owned(),
            Self::Rotate180 => block.slice(s![..;-1, ..;-1]).to_owned(),
            Self::Rotate270 => block.t().slice(s![.., ..;-1]).to_owned(),
            Self::FlipHorizontal => block.slice(s![.., ..;-1]).to_owned(),
            Self::FlipVertical => block.slice(s![..;-1, ..]).to_owned(),
            Self::Transpose => block.t().to_owned(),
            Self::AntiTranspose => block.t().slice(s![..;-1, ..;-1]).to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Isometry;
    use ndarray::{Array2, array};

    fn sample() -> Array2<f64> {
        array![[1.0, 2.0], [3.0, 4.0]]
    }

    #[test]
    fn test_index_round_trip() {
        for iso in Isometry::ALL {
            let recovered = Isometry::from_index(iso.index()).unwrap();
            assert_eq!(recovered, iso);
        }
    }

    #[test]
    fn test_out_of_range_id_rejected() {
        assert!(Isometry::from_index(8).is_err());
        assert!(Isometry::from_index(255).is_err());
    }

    #[test]
    fn test_rotate_90_counter_clockwise() {
        let block = sample();
        let rotated = Isometry::Rotate90.apply(&block.view());
        assert_eq!(rotated, array![[2.0, 4.0], [1.0, 3.0]]);
    }

    #[test]
    fn test_involutions_restore_block() {
        let block = sample();
        for iso in [
            Isometry::Rotate180,
            Isometry::FlipHorizontal,
            Isometry::FlipVertical,
            Isometry::Transpose,
            Isometry::AntiTranspose,
        ] {
            let twice = iso.apply(&iso.apply(&block.view()).view());
            assert_eq!(twice, block, "{iso:?} applied twice should be identity");
        }
    }

    #[test]
    fn test_quarter_turns_compose_to_half_turn() {
        let block = sample();
        let twice_90 = Isometry::Rotate90.apply(&Isometry::Rotate90.apply(&block.view()).view());
        assert_eq!(twice_90, Isometry::Rotate180.apply(&block.view()));
    }

    #[test]
    fn test_transpose_family_swaps_dimensions() {
        let block = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        assert_eq!(Isometry::Transpose.apply(&block.view()).dim(), (3, 2));
        assert_eq!(Isometry::AntiTranspose.apply(&block.view()).dim(), (3, 2));
        assert_eq!(Isometry::Rotate90.apply(&block.view()).dim(), (3, 2));
    }

    #[test]
    fn test_anti_transpose_reflects_anti_diagonal() {
        let block = array![[1.0, 2.0], [3.0, 4.0]];
        let reflected = Isometry::AntiTranspose.apply(&block.view());
        assert_eq!(reflected, array![[4.0, 2.0], [3.0, 1.0]]);
    }
}
