use crate::{
    picture::Picture,
    quadtree::{QuadTree, Quadrant},
};

/// Paint `tree`, covering the `size`×`size` block at `pivot`, into `target`.
///
/// Uses the same quadrant order as [`build_block`](super::build::build_block),
/// so painting a built tree restores the block it came from, up to merging.
pub fn paint(tree: &QuadTree, size: u32, pivot: (u32, u32), target: &mut Picture) {
    match tree {
        QuadTree::Leaf(pixel) => target.fill_block(pivot, size, *pixel),
        QuadTree::Internal(children) => {
            let half = size / 2;
            for (quadrant, child) in Quadrant::ALL.into_iter().zip(children.iter()) {
                paint(child, half, quadrant.pivot(pivot, half), target);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picture::Pixel;

    #[test]
    fn paints_quadrants_in_order() {
        let colors = [
            Pixel::new(1, 0, 0),
            Pixel::new(2, 0, 0),
            Pixel::new(3, 0, 0),
            Pixel::new(4, 0, 0),
        ];
        let tree = QuadTree::internal(colors.map(QuadTree::Leaf));

        let mut picture = Picture::new(4).unwrap();
        paint(&tree, 4, (0, 0), &mut picture);

        assert_eq!(picture.pixel(0, 0), colors[0]);
        assert_eq!(picture.pixel(3, 1), colors[1]);
        assert_eq!(picture.pixel(2, 3), colors[2]);
        assert_eq!(picture.pixel(1, 2), colors[3]);
    }

    #[test]
    fn paints_only_its_block() {
        let tree = QuadTree::Leaf(Pixel::new(200, 100, 0));

        let mut picture = Picture::new(4).unwrap();
        paint(&tree, 2, (2, 2), &mut picture);

        assert_eq!(picture.pixels().iter().filter(|p| **p == Pixel::new(200, 100, 0)).count(), 4);
        assert_eq!(picture.pixel(1, 1), Pixel::default());
    }

    #[test]
    fn nested_split() {
        let inner = QuadTree::internal([
            QuadTree::Leaf(Pixel::new(9, 9, 9)),
            QuadTree::Leaf(Pixel::default()),
            QuadTree::Leaf(Pixel::default()),
            QuadTree::Leaf(Pixel::default()),
        ]);
        let tree = QuadTree::internal([
            QuadTree::Leaf(Pixel::default()),
            QuadTree::Leaf(Pixel::default()),
            inner,
            QuadTree::Leaf(Pixel::default()),
        ]);

        let mut picture = Picture::new(4).unwrap();
        paint(&tree, 4, (0, 0), &mut picture);

        assert_eq!(picture.pixel(2, 2), Pixel::new(9, 9, 9));
        assert_eq!(picture.pixels().iter().filter(|p| **p != Pixel::default()).count(), 1);
    }
}
