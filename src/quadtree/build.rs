use tracing::debug;

use crate::{
    operations::block_stats,
    picture::Picture,
    quadtree::{QuadTree, Quadrant},
};

/// Counters gathered while building a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of leaves produced.
    pub leaves: u64,

    /// Side of the largest block merged into a single leaf.
    ///
    /// Only blocks wider than one pixel that passed the threshold count
    /// here; single pixel leaves never do. Starts at 1.
    pub largest_merged: u32,
}

impl BuildStats {
    fn pixel() -> Self {
        Self {
            leaves: 1,
            largest_merged: 1,
        }
    }

    fn merged(size: u32) -> Self {
        Self {
            leaves: 1,
            largest_merged: size,
        }
    }

    fn combine(self, other: Self) -> Self {
        Self {
            leaves: self.leaves + other.leaves,
            largest_merged: self.largest_merged.max(other.largest_merged),
        }
    }
}

impl Default for BuildStats {
    fn default() -> Self {
        Self {
            leaves: 0,
            largest_merged: 1,
        }
    }
}

/// The result of decomposing a picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Build {
    pub tree: QuadTree,
    pub stats: BuildStats,
}

/// Decompose a whole picture. Blocks whose error does not exceed `threshold`
/// become leaves.
pub fn build(picture: &Picture, threshold: u64) -> Build {
    let (tree, stats) = build_block(picture, picture.size(), (0, 0), threshold);

    debug!(
        size = picture.size(),
        threshold,
        leaves = stats.leaves,
        largest_merged = stats.largest_merged,
        "built quadtree"
    );

    Build { tree, stats }
}

/// Decompose the `size`×`size` block at `pivot`.
pub fn build_block(
    picture: &Picture,
    size: u32,
    pivot: (u32, u32),
    threshold: u64,
) -> (QuadTree, BuildStats) {
    if size == 1 {
        return (QuadTree::Leaf(picture.pixel(pivot.0, pivot.1)), BuildStats::pixel());
    }

    let stats = block_stats(picture, pivot, size);
    if stats.error <= threshold {
        return (QuadTree::Leaf(stats.mean), BuildStats::merged(size));
    }

    let half = size / 2;
    let mut totals = BuildStats::default();
    let children = Quadrant::ALL.map(|q| {
        let (child, child_stats) = build_block(picture, half, q.pivot(pivot, half), threshold);
        totals = totals.combine(child_stats);
        child
    });

    (QuadTree::internal(children), totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picture::Pixel;

    fn gradient(size: u32) -> Picture {
        let mut raw = Vec::new();
        for y in 0..size {
            for x in 0..size {
                raw.extend_from_slice(&[(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8]);
            }
        }
        Picture::from_raw(size, &raw).unwrap()
    }

    #[test]
    fn uniform_picture_is_one_leaf() {
        let mut picture = Picture::new(8).unwrap();
        picture.fill_block((0, 0), 8, Pixel::new(3, 4, 5));

        let result = build(&picture, 0);
        assert_eq!(result.tree, QuadTree::Leaf(Pixel::new(3, 4, 5)));
        assert_eq!(result.stats, BuildStats { leaves: 1, largest_merged: 8 });
    }

    #[test]
    fn single_pixel_picture() {
        let picture = Picture::from_raw(1, &[9, 8, 7]).unwrap();

        let result = build(&picture, 1000);
        assert_eq!(result.tree, QuadTree::Leaf(Pixel::new(9, 8, 7)));
        assert_eq!(result.stats, BuildStats { leaves: 1, largest_merged: 1 });
    }

    #[test]
    fn zero_threshold_keeps_every_pixel() {
        let picture = gradient(8);

        let result = build(&picture, 0);
        assert_eq!(result.tree.height(), 4);
        assert_eq!(result.stats.leaves, 64);
        assert_eq!(result.tree.leaf_count(), 64);
        assert_eq!(result.stats.largest_merged, 1);
    }

    #[test]
    fn children_follow_quadrant_order() {
        let mut picture = Picture::new(2).unwrap();
        picture.set_pixel(0, 0, Pixel::new(1, 0, 0));
        picture.set_pixel(1, 0, Pixel::new(2, 0, 0));
        picture.set_pixel(1, 1, Pixel::new(3, 0, 0));
        picture.set_pixel(0, 1, Pixel::new(4, 0, 0));

        let result = build(&picture, 0);
        let reds: Vec<u8> = result
            .tree
            .children()
            .unwrap()
            .iter()
            .map(|c| c.pixel().unwrap().r)
            .collect();
        assert_eq!(reds, [1, 2, 3, 4]);
    }

    #[test]
    fn merges_at_high_threshold() {
        let raw = [[0u8; 3], [255; 3], [255; 3], [0; 3]].concat();
        let picture = Picture::from_raw(2, &raw).unwrap();

        let result = build(&picture, u64::MAX);
        assert_eq!(result.tree, QuadTree::Leaf(Pixel::new(127, 127, 127)));
        assert_eq!(result.stats, BuildStats { leaves: 1, largest_merged: 2 });
    }

    #[test]
    fn largest_merged_ignores_single_pixels() {
        // Top-left 2x2 block is uniform, everything else is noisy down to
        // single pixels.
        let mut picture = gradient(4);
        picture.fill_block((0, 0), 2, Pixel::new(50, 50, 50));

        let result = build(&picture, 0);
        assert_eq!(result.stats.leaves, 1 + 12);
        assert_eq!(result.stats.largest_merged, 2);

        // A fully split tree never reports anything beyond the starting value,
        // even though all of its leaves are single pixels.
        let result = build(&gradient(4), 0);
        assert_eq!(result.stats.largest_merged, 1);
    }
}
