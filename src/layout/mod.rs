//! Layout - Adaptive Tile Geometry
//!
//! ## Responsibilities
//!
//! - Partition a pixel span into gap-free integer segments
//! - Select the tile topology for a group of 1-6 streams
//! - Compute absolute pixel rectangles per slot
//!
//! Topologies are fixed per stream count:
//! - 1: single full-surface tile
//! - 2-3: 2x2 grid, trailing slots are padding (blank tiles)
//! - 4: 2x2 grid, all slots occupied
//! - 5-6: 3x3 grid, slot 0 spans the 2x2 top-left block, the rest are 1x1
//!   along the right column then the bottom row

use serde::{Deserialize, Serialize};

/// Absolute pixel rectangle, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Grid cell span of one slot: [col_start, col_end) x [row_start, row_end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpan {
    pub col_start: u32,
    pub row_start: u32,
    pub col_end: u32,
    pub row_end: u32,
}

impl TileSpan {
    const fn new(col_start: u32, row_start: u32, col_end: u32, row_end: u32) -> Self {
        Self {
            col_start,
            row_start,
            col_end,
            row_end,
        }
    }
}

/// Slot -> grid span mapping for one group
///
/// Slots `0..occupied` carry streams; the rest are padding tiles that are
/// created once, rendered blank, and never torn down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    slots: Vec<TileSpan>,
    occupied: usize,
}

impl Topology {
    /// Fixed topology for a stream count
    ///
    /// Callers must truncate their stream list to 6 before calling.
    pub fn for_stream_count(stream_count: usize) -> Self {
        assert!(
            (1..=6).contains(&stream_count),
            "stream_count must be 1..=6, got {stream_count}"
        );
        let slots = match stream_count {
            1 => vec![TileSpan::new(0, 0, 1, 1)],
            2..=4 => vec![
                TileSpan::new(0, 0, 1, 1), // top-left
                TileSpan::new(1, 0, 2, 1), // top-right
                TileSpan::new(0, 1, 1, 2), // bottom-left
                TileSpan::new(1, 1, 2, 2), // bottom-right
            ],
            _ => vec![
                TileSpan::new(0, 0, 2, 2), // 2x2 top-left block
                TileSpan::new(2, 0, 3, 1), // col 2, row 0
                TileSpan::new(2, 1, 3, 2), // col 2, row 1
                TileSpan::new(2, 2, 3, 3), // col 2, row 2
                TileSpan::new(0, 2, 1, 3), // col 0, row 2
                TileSpan::new(1, 2, 2, 3), // col 1, row 2
            ],
        };
        Self {
            slots,
            occupied: stream_count,
        }
    }

    pub fn slots(&self) -> &[TileSpan] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots bound to real streams; the rest are padding
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    pub fn is_padding(&self, slot_index: usize) -> bool {
        slot_index >= self.occupied
    }

    pub fn grid_cols(&self) -> u32 {
        self.slots.iter().map(|s| s.col_end).max().unwrap_or(0)
    }

    pub fn grid_rows(&self) -> u32 {
        self.slots.iter().map(|s| s.row_end).max().unwrap_or(0)
    }
}

/// Partition `total_pixels` into `segments` contiguous integer spans.
///
/// Returns `segments + 1` boundaries with `boundaries[0] == 0` and
/// `boundaries[segments] == total_pixels`, each inner boundary the
/// round-half-up of `i * total_pixels / segments`. Boundaries are
/// non-decreasing and the segment widths sum exactly to `total_pixels`,
/// which is what makes the tiling gap-free for any parity.
pub fn compute_boundaries(total_pixels: u32, segments: u32) -> Vec<u32> {
    assert!(segments >= 1, "segments must be >= 1");
    let total = total_pixels as u64;
    let segs = segments as u64;
    (0..=segs)
        .map(|i| ((i * total * 2 + segs) / (segs * 2)) as u32)
        .collect()
}

/// Compute the absolute rectangle of every slot for a surface size.
///
/// Pure function; callers apply the result to the rendering surface. Must be
/// re-run whenever the surface size or the topology changes.
pub fn compute_rectangles(width: u32, height: u32, topology: &Topology) -> Vec<Rect> {
    let col_bounds = compute_boundaries(width, topology.grid_cols().max(1));
    let row_bounds = compute_boundaries(height, topology.grid_rows().max(1));

    topology
        .slots()
        .iter()
        .map(|span| {
            let x = col_bounds[span.col_start as usize];
            let y = row_bounds[span.row_start as usize];
            Rect {
                x,
                y,
                width: col_bounds[span.col_end as usize] - x,
                height: row_bounds[span.row_end as usize] - y,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_even_split() {
        assert_eq!(compute_boundaries(1536, 3), vec![0, 512, 1024, 1536]);
    }

    #[test]
    fn test_boundaries_uneven_split_no_leak() {
        let bounds = compute_boundaries(1535, 3);
        assert_eq!(bounds.len(), 4);
        assert_eq!(bounds[0], 0);
        assert_eq!(bounds[3], 1535);
        // Each segment within 1px of the ideal 511.67
        for pair in bounds.windows(2) {
            let width = pair[1] - pair[0];
            assert!((511..=512).contains(&width), "segment width {width}");
        }
    }

    #[test]
    fn test_boundaries_properties() {
        for total in [0u32, 1, 7, 99, 1080, 1919, 3841] {
            for segments in 1u32..=9 {
                let bounds = compute_boundaries(total, segments);
                assert_eq!(bounds.len(), (segments + 1) as usize);
                assert_eq!(bounds[0], 0);
                assert_eq!(*bounds.last().unwrap(), total);
                for pair in bounds.windows(2) {
                    assert!(pair[1] >= pair[0]);
                }
                let sum: u32 = bounds.windows(2).map(|p| p[1] - p[0]).sum();
                assert_eq!(sum, total);
            }
        }
    }

    #[test]
    fn test_topology_slot_counts() {
        assert_eq!(Topology::for_stream_count(1).slot_count(), 1);
        for n in 2..=4 {
            let topo = Topology::for_stream_count(n);
            assert_eq!(topo.slot_count(), 4);
            assert_eq!(topo.occupied(), n);
        }
        for n in 5..=6 {
            let topo = Topology::for_stream_count(n);
            assert_eq!(topo.slot_count(), 6);
            assert_eq!(topo.occupied(), n);
        }
    }

    #[test]
    fn test_topology_padding_flags() {
        let topo = Topology::for_stream_count(2);
        assert!(!topo.is_padding(0));
        assert!(!topo.is_padding(1));
        assert!(topo.is_padding(2));
        assert!(topo.is_padding(3));
    }

    #[test]
    fn test_topology_covers_grid_without_overlap() {
        for n in 1..=6 {
            let topo = Topology::for_stream_count(n);
            let cols = topo.grid_cols();
            let rows = topo.grid_rows();
            // Every unit cell claimed by exactly one slot
            let mut claimed = vec![vec![false; cols as usize]; rows as usize];
            for span in topo.slots() {
                for row in span.row_start..span.row_end {
                    for col in span.col_start..span.col_end {
                        let cell = &mut claimed[row as usize][col as usize];
                        assert!(!*cell, "cell ({col},{row}) claimed twice for n={n}");
                        *cell = true;
                    }
                }
            }
            for row in claimed {
                assert!(row.into_iter().all(|c| c), "uncovered cell for n={n}");
            }
        }
    }

    #[test]
    fn test_rectangles_six_cam_1080p() {
        let topo = Topology::for_stream_count(6);
        let rects = compute_rectangles(1920, 1080, &topo);

        assert_eq!(
            rects[0],
            Rect {
                x: 0,
                y: 0,
                width: 1280,
                height: 720
            }
        );
        assert_eq!(
            rects[1],
            Rect {
                x: 1280,
                y: 0,
                width: 640,
                height: 360
            }
        );
        let total: u64 = rects.iter().map(Rect::area).sum();
        assert_eq!(total, 1920 * 1080);
    }

    #[test]
    fn test_rectangles_exact_cover_odd_sizes() {
        for n in 1..=6 {
            let topo = Topology::for_stream_count(n);
            for (w, h) in [(1921u32, 1079u32), (1366, 768), (5, 3)] {
                let rects = compute_rectangles(w, h, &topo);
                let total: u64 = rects.iter().map(Rect::area).sum();
                assert_eq!(total, w as u64 * h as u64, "n={n} surface {w}x{h}");
            }
        }
    }

    #[test]
    fn test_single_stream_fills_surface() {
        let topo = Topology::for_stream_count(1);
        let rects = compute_rectangles(800, 600, &topo);
        assert_eq!(
            rects,
            vec![Rect {
                x: 0,
                y: 0,
                width: 800,
                height: 600
            }]
        );
    }
}
