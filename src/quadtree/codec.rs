//! The compressed stream.
//!
//! ```text
//! [4 bytes] image side length, u32 little-endian
//! then one record per node, in level order:
//!   [1 byte]  1 for a leaf, 0 for an internal node
//!   [3 bytes] r, g, b (leaves only)
//! ```
//!
//! An internal node's four children follow later in the stream, in
//! [`Quadrant`](super::Quadrant) order, so the tree shape needs no pointers or
//! lengths.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use byteorder::{ReadBytesExt, WriteBytesExt};
use tracing::trace;

use crate::{
    binio::{RecordReader, RecordWriter},
    picture::{Error, Picture, Pixel},
    quadtree::{
        build::{build, BuildStats},
        paint::paint,
        QuadTree,
    },
    queue::Queue,
};

/// A quadtree together with the side length of the picture it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedPicture {
    pub size: u32,
    pub tree: QuadTree,
}

impl CompressedPicture {
    /// Decompose `picture`, merging blocks whose error is at most `threshold`.
    pub fn compress(picture: &Picture, threshold: u64) -> (Self, BuildStats) {
        let result = build(picture, threshold);

        let compressed = CompressedPicture {
            size: picture.size(),
            tree: result.tree,
        };

        (compressed, result.stats)
    }

    /// Encode the tree into anything that implements [Write]
    pub fn encode<O: Write + WriteBytesExt>(&self, output: O) -> Result<usize, Error> {
        encode(&self.tree, self.size, output)
    }

    /// Decode a tree from anything that implements [Read]
    pub fn decode<I: Read + ReadBytesExt>(input: I) -> Result<Self, Error> {
        decode(input)
    }

    /// Paint the tree into a new picture.
    pub fn to_picture(&self) -> Result<Picture, Error> {
        let mut picture = Picture::new(self.size)?;
        paint(&self.tree, self.size, (0, 0), &mut picture);

        Ok(picture)
    }

    /// Save the compressed stream to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut out_file = BufWriter::new(File::create(path.as_ref())?);

        self.encode(&mut out_file)?;
        out_file.flush()?;

        Ok(())
    }

    /// Open a compressed stream from a file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let input = BufReader::new(File::open(path.as_ref())?);

        Self::decode(input)
    }
}

/// Write `tree` in level order, returning the number of bytes written.
pub fn encode<O: Write + WriteBytesExt>(
    tree: &QuadTree,
    size: u32,
    mut output: O,
) -> Result<usize, Error> {
    let mut writer = RecordWriter::new(&mut output);
    writer.write_size(size)?;

    let mut queue = Queue::new();
    queue.enqueue(tree);

    while let Some(node) = queue.dequeue() {
        match node {
            QuadTree::Leaf(pixel) => writer.write_leaf(*pixel)?,
            QuadTree::Internal(children) => {
                writer.write_internal()?;
                for child in children.iter() {
                    queue.enqueue(child);
                }
            }
        }
    }

    trace!(size, bytes = writer.byte_size(), "encoded quadtree");

    Ok(writer.byte_size())
}

/// Read a tree written by [`encode`].
///
/// The stream is checked while reading: it must not end early, flags must be
/// 0 or 1, the size must be a power of two, and no internal node may sit
/// where the block would be a single pixel. Bytes after the last record are
/// left unread.
pub fn decode<I: Read + ReadBytesExt>(mut input: I) -> Result<CompressedPicture, Error> {
    let mut reader = RecordReader::new(&mut input);

    let size = reader.read_size()?;
    if !size.is_power_of_two() {
        return Err(Error::InvalidSize(size));
    }

    let mut tree = read_node(&mut reader, size)?;

    if !tree.is_leaf() {
        // Each queued node is an internal node waiting for its children,
        // paired with the side of the block it covers
        let mut queue = Queue::new();
        queue.enqueue((&mut tree, size));

        while let Some((node, block)) = queue.dequeue() {
            let QuadTree::Internal(children) = node else {
                unreachable!("only internal nodes are queued");
            };

            let half = block / 2;
            for slot in children.iter_mut() {
                *slot = read_node(&mut reader, half)?;
                if !slot.is_leaf() {
                    queue.enqueue((slot, half));
                }
            }
        }
    }

    trace!(size, bytes = reader.byte_offset(), "decoded quadtree");

    Ok(CompressedPicture { size, tree })
}

const PLACEHOLDER: QuadTree = QuadTree::Leaf(Pixel::new(0, 0, 0));

/// Read one node record for a block of side `block`. Internal nodes come back
/// with placeholder children, to be overwritten once their turn in the queue
/// comes.
fn read_node<I: Read + ReadBytesExt>(
    reader: &mut RecordReader<'_, I>,
    block: u32,
) -> Result<QuadTree, Error> {
    let offset = reader.byte_offset();

    if reader.read_is_leaf()? {
        return Ok(QuadTree::Leaf(reader.read_pixel()?));
    }

    if block < 2 {
        return Err(Error::TooDeep { offset });
    }

    Ok(QuadTree::internal([PLACEHOLDER; 4]))
}
