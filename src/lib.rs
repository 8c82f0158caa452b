//! quadpic compresses square pictures by splitting them into a quadtree.
//!
//! A picture whose side is a power of two is cut into four quadrants, and
//! each quadrant again, until a block is uniform enough to be stored as a
//! single averaged color. The resulting tree is written in level order as a
//! compact binary stream, and can be painted back into a full picture.
//!
//! Higher thresholds merge more blocks and give smaller, blurrier output. A
//! threshold of 0 only merges perfectly uniform blocks, so it is lossless.
//!
//! # Example
//! ## Compressing a PPM
//! ```no_run
//! use quadpic::CompressedPicture;
//!
//! let picture = quadpic::open("input.ppm").expect("Could not open picture");
//!
//! // Build the tree. Nothing is written at this point.
//! let (compressed, stats) = CompressedPicture::compress(&picture, 20);
//! println!("{} leaves, height {}", stats.leaves, compressed.tree.height());
//!
//! compressed.save("output.bin").expect("Could not save the compressed picture");
//! ```
//!
//! ## Restoring it
//! ```no_run
//! use quadpic::CompressedPicture;
//!
//! let compressed = CompressedPicture::open("output.bin").expect("Could not open file");
//! let picture = compressed.to_picture().expect("Invalid size");
//! picture.save("restored.ppm").expect("Could not save the picture");
//! ```

mod binio;
mod operations;
mod queue;

pub mod header;
pub mod picture;
pub mod quadtree;

// ----------------------- //
// INLINED USEFUL FEATURES //
// ----------------------- //
#[doc(inline)]
pub use picture::{open, Error, Picture, Pixel};

#[doc(inline)]
pub use quadtree::{height, QuadTree, Quadrant};

#[doc(inline)]
pub use quadtree::build::{build, Build, BuildStats};

#[doc(inline)]
pub use quadtree::codec::{decode, encode, CompressedPicture};

#[doc(inline)]
pub use quadtree::paint::paint;

pub use operations::{block_stats, BlockStats};
pub use queue::Queue;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
