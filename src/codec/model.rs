//! The code model produced by the encoder and its binary serialization
//!
//! On disk: a 4-byte magic, a little-endian header of
//! `{height, width, range_size, domain_stride}` as `u32`, then one
//! fixed-width record per range block in raster order:
//! `{domain_y: u32, domain_x: u32, isometry: u8, scale: f64, offset: f64}`.

use crate::geometry::Isometry;
use crate::io::error::{Result, invalid_parameter, malformed_model};
use std::io::Read;

/// File identification tag for serialized models
pub const MODEL_MAGIC: [u8; 4] = *b"FRM1";

/// Byte length of one serialized code record
const RECORD_LEN: usize = 4 + 4 + 1 + 8 + 8;

/// One affine self-similarity transform for a single range block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Code {
    /// Top-left row of the domain block in source pixel units
    pub domain_y: u32,
    /// Top-left column of the domain block in source pixel units
    pub domain_x: u32,
    /// Symmetry applied to the downsampled domain block
    pub isometry: Isometry,
    /// Multiplicative factor, in [-1, 1]
    pub scale: f64,
    /// Additive offset
    pub offset: f64,
}

/// Immutable encoding of one image: header plus one code per range block
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    height: usize,
    width: usize,
    range_size: usize,
    domain_stride: usize,
    codes: Vec<Code>,
}

impl Model {
    /// Assemble a model, validating every invariant
    ///
    /// # Errors
    ///
    /// Returns an error if the header parameters are invalid, the code count
    /// does not match the range grid, or any code references a domain block
    /// outside the image
    pub fn new(
        height: usize,
        width: usize,
        range_size: usize,
        domain_stride: usize,
        codes: Vec<Code>,
    ) -> Result<Self> {
        if range_size == 0 {
            return Err(invalid_parameter(
                "range_size",
                &range_size,
                &"must be at least 1",
            ));
        }
        if domain_stride == 0 {
            return Err(invalid_parameter(
                "domain_stride",
                &domain_stride,
                &"must be at least 1",
            ));
        }
        if height % range_size != 0 || width % range_size != 0 {
            return Err(invalid_parameter(
                "image",
                &format!("{height}x{width}"),
                &format!("dimensions must be divisible by range size {range_size}"),
            ));
        }

        let expected = (height / range_size) * (width / range_size);
        if codes.len() != expected {
            return Err(malformed_model(&format!(
                "code count {} does not match {expected} range blocks",
                codes.len()
            )));
        }

        let domain_size = 2 * range_size;
        for (index, code) in codes.iter().enumerate() {
            let y = code.domain_y as usize;
            let x = code.domain_x as usize;
            if y + domain_size > height || x + domain_size > width {
                return Err(malformed_model(&format!(
                    "code {index} references domain origin ({y}, {x}) outside a {height}x{width} image"
                )));
            }
        }

        Ok(Self {
            height,
            width,
            range_size,
            domain_stride,
            codes,
        })
    }

    /// Image height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Image width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Side length of a range block
    pub const fn range_size(&self) -> usize {
        self.range_size
    }

    /// Stride of the domain enumeration used at encode time
    pub const fn domain_stride(&self) -> usize {
        self.domain_stride
    }

    /// Number of range-block rows
    pub const fn grid_rows(&self) -> usize {
        self.height / self.range_size
    }

    /// Number of range-block columns
    pub const fn grid_cols(&self) -> usize {
        self.width / self.range_size
    }

    /// All codes in raster order over the range grid
    pub fn codes(&self) -> &[Code] {
        &self.codes
    }

    /// Code for the range block at the given grid coordinates
    pub fn code_at(&self, range_row: usize, range_col: usize) -> Option<&Code> {
        if range_col >= self.grid_cols() {
            return None;
        }
        self.codes.get(range_row * self.grid_cols() + range_col)
    }

    /// Serialize the model to its binary form
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(4 + 16 + self.codes.len() * RECORD_LEN);
        bytes.extend_from_slice(&MODEL_MAGIC);
        bytes.extend_from_slice(&(self.height as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.width as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.range_size as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.domain_stride as u32).to_le_bytes());

        for code in &self.codes {
            bytes.extend_from_slice(&code.domain_y.to_le_bytes());
            bytes.extend_from_slice(&code.domain_x.to_le_bytes());
            bytes.push(code.isometry.index());
            bytes.extend_from_slice(&code.scale.to_le_bytes());
            bytes.extend_from_slice(&code.offset.to_le_bytes());
        }

        bytes
    }

    /// Deserialize a model, validating every invariant
    ///
    /// # Errors
    ///
    /// Returns an error if the magic or header is invalid, the data is
    /// truncated or has trailing bytes, an isometry id is out of range, or
    /// any decoded code violates the model invariants
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = bytes;

        let magic = read_array::<4>(&mut reader)?;
        if magic != MODEL_MAGIC {
            return Err(malformed_model(&"unrecognized magic bytes"));
        }

        let height = read_u32(&mut reader)? as usize;
        let width = read_u32(&mut reader)? as usize;
        let range_size = read_u32(&mut reader)? as usize;
        let domain_stride = read_u32(&mut reader)? as usize;

        if range_size == 0 || height % range_size != 0 || width % range_size != 0 {
            return Err(malformed_model(&format!(
                "header {height}x{width} is not divisible into range blocks of {range_size}"
            )));
        }

        let expected = (height / range_size)
            .checked_mul(width / range_size)
            .ok_or_else(|| malformed_model(&"header range grid overflows"))?;
        let payload_len = expected
            .checked_mul(RECORD_LEN)
            .and_then(|records| records.checked_add(4 + 16))
            .ok_or_else(|| malformed_model(&"header range grid overflows"))?;
        if bytes.len() != payload_len {
            return Err(malformed_model(&format!(
                "{} bytes where {expected} codes need {payload_len}",
                bytes.len()
            )));
        }

        let mut codes = Vec::with_capacity(expected);
        for _ in 0..expected {
            let domain_y = read_u32(&mut reader)?;
            let domain_x = read_u32(&mut reader)?;
            let [isometry_id] = read_array::<1>(&mut reader)?;
            let isometry = Isometry::from_index(isometry_id)
                .map_err(|_| malformed_model(&format!("isometry id {isometry_id} out of range")))?;
            let scale = f64::from_le_bytes(read_array::<8>(&mut reader)?);
            let offset = f64::from_le_bytes(read_array::<8>(&mut reader)?);

            codes.push(Code {
                domain_y,
                domain_x,
                isometry,
                scale,
                offset,
            });
        }

        debug_assert!(reader.is_empty());
        Self::new(height, width, range_size, domain_stride, codes)
    }
}

fn read_array<const N: usize>(reader: &mut &[u8]) -> Result<[u8; N]> {
    let mut buffer = [0u8; N];
    reader
        .read_exact(&mut buffer)
        .map_err(|_| malformed_model(&"model data is truncated"))?;
    Ok(buffer)
}

fn read_u32(reader: &mut &[u8]) -> Result<u32> {
    Ok(u32::from_le_bytes(read_array::<4>(reader)?))
}

#[cfg(test)]
mod tests {
    use super::{Code, Model};
    use crate::geometry::Isometry;

    fn sample_codes(count: usize) -> Vec<Code> {
        (0..count)
            .map(|i| Code {
                domain_y: 0,
                domain_x: 0,
                isometry: Isometry::ALL.get(i % 8).copied().unwrap_or(Isometry::Identity),
                scale: 0.5,
                offset: 0.25,
            })
            .collect()
    }

    #[test]
    fn test_code_count_must_match_grid() {
        // 8x8 image with range 4 has a 2x2 grid
        assert!(Model::new(8, 8, 4, 4, sample_codes(4)).is_ok());
        assert!(Model::new(8, 8, 4, 4, sample_codes(3)).is_err());
    }

    #[test]
    fn test_out_of_bounds_domain_rejected() {
        let mut codes = sample_codes(4);
        if let Some(code) = codes.get_mut(2) {
            code.domain_y = 1; // domain block would extend past row 8
        }
        assert!(Model::new(8, 8, 4, 4, codes).is_err());
    }

    #[test]
    fn test_non_divisible_dimensions_rejected() {
        assert!(Model::new(10, 8, 4, 4, sample_codes(4)).is_err());
    }

    #[test]
    fn test_code_addressing_by_grid_coordinates() {
        let mut codes = sample_codes(4);
        if let Some(code) = codes.get_mut(3) {
            code.offset = 0.9;
        }
        let model = Model::new(8, 8, 4, 4, codes).unwrap();

        let corner = model.code_at(1, 1).unwrap();
        assert!((corner.offset - 0.9).abs() < f64::EPSILON);
        assert!(model.code_at(2, 0).is_none());
        assert!(model.code_at(0, 2).is_none());
    }

    #[test]
    fn test_binary_round_trip() {
        let model = Model::new(8, 8, 4, 2, sample_codes(4)).unwrap();
        let restored = Model::from_bytes(&model.to_bytes()).unwrap();
        assert_eq!(restored, model);
    }

    #[test]
    fn test_truncated_bytes_rejected() {
        let model = Model::new(8, 8, 4, 2, sample_codes(4)).unwrap();
        let mut bytes = model.to_bytes();
        bytes.truncate(bytes.len() - 3);
        assert!(Model::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_oversized_header_claim_rejected() {
        // A 20-byte file whose header promises u32::MAX^2 codes must fail
        // cleanly instead of attempting the allocation
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&super::MODEL_MAGIC);
        bytes.extend_from_slice(&u32::MAX.to_le_bytes()); // height
        bytes.extend_from_slice(&u32::MAX.to_le_bytes()); // width
        bytes.extend_from_slice(&1u32.to_le_bytes()); // range_size
        bytes.extend_from_slice(&1u32.to_le_bytes()); // domain_stride
        assert!(Model::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let model = Model::new(8, 8, 4, 2, sample_codes(4)).unwrap();
        let mut bytes = model.to_bytes();
        bytes.push(0);
        assert!(Model::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_bad_magic_rejected() {
        let model = Model::new(8, 8, 4, 2, sample_codes(4)).unwrap();
        let mut bytes = model.to_bytes();
        if let Some(first) = bytes.first_mut() {
            *first = b'X';
        }
        assert!(Model::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_bad_isometry_id_rejected() {
        let model = Model::new(8, 8, 4, 2, sample_codes(4)).unwrap();
        let mut bytes = model.to_bytes();
        // First record's isometry byte sits after magic + header + y + x
        if let Some(byte) = bytes.get_mut(4 + 16 + 8) {
            *byte = 9;
        }
        assert!(Model::from_bytes(&bytes).is_err());
    }
}
