use crate::picture::{Picture, Pixel};

/// Summary of a square block of a picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockStats {
    /// Per channel mean, rounded down.
    pub mean: Pixel,

    /// Mean squared deviation from `mean`, over every pixel and channel,
    /// rounded down.
    pub error: u64,
}

/// Compute the mean color and error of the `size`×`size` block whose top-left
/// corner is `pivot`.
pub fn block_stats(picture: &Picture, pivot: (u32, u32), size: u32) -> BlockStats {
    let (x0, y0) = pivot;
    let count = u64::from(size) * u64::from(size);

    let mut sum = [0u64; 3];
    for y in y0..y0 + size {
        for x in x0..x0 + size {
            let p = picture.pixel(x, y);
            sum[0] += u64::from(p.r);
            sum[1] += u64::from(p.g);
            sum[2] += u64::from(p.b);
        }
    }

    // Each mean is at most 255 since it is an average of u8 values
    let mean = sum.map(|s| (s / count) as u8);

    let mut deviation = 0u64;
    for y in y0..y0 + size {
        for x in x0..x0 + size {
            let p = picture.pixel(x, y).to_bytes();
            for (m, c) in mean.iter().zip(p) {
                let d = u64::from(m.abs_diff(c));
                deviation += d * d;
            }
        }
    }

    BlockStats {
        mean: Pixel::from_bytes(mean),
        error: deviation / (3 * count),
    }
}
