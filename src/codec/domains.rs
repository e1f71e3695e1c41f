//! Enumeration and sampling of candidate domain-block origins
//!
//! The full enumeration walks the image at a fixed stride. Per range block the
//! encoder may restrict it to a spatial window and subsample it to a cap, both
//! of which trade search exhaustiveness for speed.

use crate::io::error::{Result, invalid_parameter};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

/// Spatial restriction of the candidate search around one range block
///
/// Distances are measured between block centers, independently per axis.
#[derive(Debug, Clone, Copy)]
pub struct SearchWindow {
    /// Center of the range block in image pixel coordinates (row, col)
    pub center: [usize; 2],
    /// Maximum per-axis center distance in pixels
    pub radius: usize,
}

/// Precomputed grid of domain-block origins for one image shape
#[derive(Debug, Clone)]
pub struct DomainIndex {
    origins: Vec<[usize; 2]>,
    domain_size: usize,
}

impl DomainIndex {
    /// Enumerate all domain origins for an image at the given stride
    ///
    /// Domain blocks are `2 * range_size` on a side. Origins step by
    /// `stride` in both axes and must leave a full block inside the image.
    ///
    /// # Errors
    ///
    /// Returns an error if `range_size` or `stride` is zero, or if the image
    /// is too small to hold a single domain block
    pub fn build(height: usize, width: usize, range_size: usize, stride: usize) -> Result<Self> {
        if range_size == 0 {
            return Err(invalid_parameter(
                "range_size",
                &range_size,
                &"must be at least 1",
            ));
        }
        if stride == 0 {
            return Err(invalid_parameter(
                "domain_stride",
                &stride,
                &"must be at least 1",
            ));
        }

        let domain_size = 2 * range_size;
        if height < domain_size || width < domain_size {
            return Err(invalid_parameter(
                "image",
                &format!("{height}x{width}"),
                &format!("too small for one {domain_size}x{domain_size} domain block"),
            ));
        }

        let mut origins = Vec::new();
        for y in (0..=height - domain_size).step_by(stride) {
            for x in (0..=width - domain_size).step_by(stride) {
                origins.push([y, x]);
            }
        }

        Ok(Self {
            origins,
            domain_size,
        })
    }

    /// Side length of the domain blocks this index enumerates
    pub const fn domain_size(&self) -> usize {
        self.domain_size
    }

    /// Number of origins in the full enumeration
    pub const fn len(&self) -> usize {
        self.origins.len()
    }

    /// Whether the enumeration is empty (never true for a valid index)
    pub const fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Candidate origins for one range block
    ///
    /// Applies the window first, falling back to the full enumeration when it
    /// excludes everything, then draws a uniform subset without replacement
    /// when a cap is given and the set exceeds it. Windowing and capping make
    /// the search heuristic rather than exhaustive by intent.
    pub fn candidates(
        &self,
        window: Option<&SearchWindow>,
        cap: Option<usize>,
        rng: &mut StdRng,
    ) -> Vec<[usize; 2]> {
        let half = self.domain_size / 2;

        let mut filtered: Vec<[usize; 2]> = window.map_or_else(
            || self.origins.clone(),
            |w| {
                self.origins
                    .iter()
                    .filter(|origin| {
                        let center = [origin[0] + half, origin[1] + half];
                        center[0].abs_diff(w.center[0]) <= w.radius
                            && center[1].abs_diff(w.center[1]) <= w.radius
                    })
                    .copied()
                    .collect()
            },
        );

        // A window that excludes every origin widens to the full enumeration
        if filtered.is_empty() {
            filtered.clone_from(&self.origins);
        }

        if let Some(limit) = cap
            && filtered.len() > limit
        {
            filtered = filtered.choose_multiple(rng, limit).copied().collect();
        }

        filtered
    }
}
