//! Square RGB pictures and their PPM representation.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, ErrorKind, Read, Write},
    path::Path,
};

use thiserror::Error;

use crate::header::Header;

/// A single RGB pixel, 8 bits per channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }
}

impl From<[u8; 3]> for Pixel {
    fn from(value: [u8; 3]) -> Self {
        Self::from_bytes(value)
    }
}

/// A square picture whose side length is a power of two, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    size: u32,
    bitmap: Vec<Pixel>,
}

impl Picture {
    /// Create an all black picture.
    ///
    /// Fails with [`Error::TooLarge`] instead of aborting when the bitmap
    /// cannot be allocated.
    pub fn new(size: u32) -> Result<Self, Error> {
        check_size(size)?;

        let area = area(size)?;
        let mut bitmap = Vec::new();
        bitmap
            .try_reserve_exact(area)
            .map_err(|_| Error::TooLarge(size))?;
        bitmap.resize(area, Pixel::default());

        Ok(Self { size, bitmap })
    }

    /// Create a picture from packed `r, g, b` bytes in row-major order.
    pub fn from_raw(size: u32, bitmap: &[u8]) -> Result<Self, Error> {
        check_size(size)?;

        let expected = byte_len(size)?;
        if bitmap.len() != expected {
            return Err(Error::InvalidBitmapLength {
                expected,
                got: bitmap.len(),
            });
        }

        Ok(Self {
            size,
            bitmap: bitmap
                .chunks_exact(3)
                .map(|c| Pixel::new(c[0], c[1], c[2]))
                .collect(),
        })
    }

    /// Create a picture from pixels in row-major order.
    pub fn from_pixels(size: u32, pixels: Vec<Pixel>) -> Result<Self, Error> {
        check_size(size)?;

        if pixels.len() != area(size)? {
            return Err(Error::InvalidBitmapLength {
                expected: byte_len(size)?,
                got: pixels.len() * 3,
            });
        }

        Ok(Self {
            size,
            bitmap: pixels,
        })
    }

    /// Side length of the picture in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.bitmap
    }

    /// The pixel at column `x`, row `y`.
    ///
    /// # Panics
    /// If the coordinate lies outside the picture.
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        self.bitmap[self.index(x, y)]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        let index = self.index(x, y);
        self.bitmap[index] = pixel;
    }

    /// Fill the `size`×`size` block whose top-left corner is `pivot`.
    pub fn fill_block(&mut self, pivot: (u32, u32), size: u32, pixel: Pixel) {
        let (x, y) = pivot;
        for row in y..y + size {
            let start = self.index(x, row);
            self.bitmap[start..start + size as usize].fill(pixel);
        }
    }

    /// Consume the picture, returning packed `r, g, b` bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.bitmap.into_iter().flat_map(Pixel::to_bytes).collect()
    }

    /// Encode the picture as a binary PPM into anything that implements [Write]
    pub fn encode<O: Write>(&self, mut output: O) -> Result<usize, Error> {
        let mut count = Header::square(self.size).write_into(&mut output)?;

        for row in self.bitmap.chunks_exact(self.size as usize) {
            let line: Vec<u8> = row.iter().flat_map(|p| p.to_bytes()).collect();
            output.write_all(&line)?;
            count += line.len();
        }
        output.flush()?;

        Ok(count)
    }

    /// Decode a binary PPM from anything that implements [BufRead]
    ///
    /// The header is validated before any pixel data is read. The bitmap
    /// grows with the bytes actually present, so a header declaring a huge
    /// size over a short body fails with an I/O error.
    pub fn decode<I: BufRead>(mut input: I) -> Result<Self, Error> {
        let header = Header::read_from(&mut input)?;

        let len = byte_len(header.width)?;
        let mut bitmap = Vec::new();
        input.take(len as u64).read_to_end(&mut bitmap)?;
        if bitmap.len() != len {
            return Err(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                format!("pixel data holds {} of {len} bytes", bitmap.len()),
            )
            .into());
        }

        Self::from_raw(header.width, &bitmap)
    }

    /// Save the picture to a PPM file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut out_file = BufWriter::new(File::create(path.as_ref())?);

        self.encode(&mut out_file)?;

        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.size && y < self.size,
            "pixel ({x}, {y}) outside of {0}x{0} picture",
            self.size
        );
        y as usize * self.size as usize + x as usize
    }
}

/// Open a PPM file from a path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Picture, Error> {
    let input = BufReader::new(File::open(path.as_ref())?);

    Picture::decode(input)
}

fn check_size(size: u32) -> Result<(), Error> {
    if size.is_power_of_two() {
        Ok(())
    } else {
        Err(Error::InvalidDimensions { width: size, height: size })
    }
}

/// Number of pixels in a picture of side `size`.
fn area(size: u32) -> Result<usize, Error> {
    (size as usize)
        .checked_mul(size as usize)
        .ok_or(Error::TooLarge(size))
}

/// Number of packed `r, g, b` bytes in a picture of side `size`.
fn byte_len(size: u32) -> Result<usize, Error> {
    area(size)?.checked_mul(3).ok_or(Error::TooLarge(size))
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("image format must be P6, got {:?}", String::from_utf8_lossy(.0))]
    InvalidMagic([u8; 2]),

    #[error("invalid image size {width}x{height} (must be 2^n x 2^n)")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid color range value {0} (must be 255)")]
    InvalidColorRange(u32),

    #[error("malformed PPM header near {0}")]
    InvalidHeader(&'static str),

    #[error("picture of side {0} is too large to allocate")]
    TooLarge(u32),

    #[error("bitmap holds {got} bytes, expected {expected}")]
    InvalidBitmapLength { expected: usize, got: usize },

    #[error("compressed stream ends early at byte {offset}")]
    Truncated { offset: usize },

    #[error("invalid leaf flag {flag} at byte {offset}")]
    InvalidFlag { flag: u8, offset: usize },

    #[error("invalid compressed image size {0} (must be a power of two)")]
    InvalidSize(u32),

    #[error("internal node at byte {offset} would split a single pixel")]
    TooDeep { offset: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn checkerboard() -> Picture {
        let black = [0, 0, 0];
        let white = [255, 255, 255];
        let raw: Vec<u8> = [black, white, white, black].concat();

        Picture::from_raw(2, &raw).unwrap()
    }

    #[test]
    fn row_major_layout() {
        let picture = checkerboard();

        assert_eq!(picture.pixel(0, 0), Pixel::new(0, 0, 0));
        assert_eq!(picture.pixel(1, 0), Pixel::new(255, 255, 255));
        assert_eq!(picture.pixel(0, 1), Pixel::new(255, 255, 255));
        assert_eq!(picture.pixel(1, 1), Pixel::new(0, 0, 0));
    }

    #[test]
    fn rejects_non_power_of_two() {
        assert!(matches!(Picture::new(6), Err(Error::InvalidDimensions { width: 6, .. })));
        assert!(matches!(Picture::new(0), Err(Error::InvalidDimensions { .. })));
        assert!(matches!(
            Picture::from_raw(2, &[0; 11]),
            Err(Error::InvalidBitmapLength { expected: 12, got: 11 })
        ));
    }

    #[test]
    fn fill_block_stays_inside() {
        let mut picture = Picture::new(4).unwrap();
        let red = Pixel::new(255, 0, 0);
        picture.fill_block((2, 0), 2, red);

        for y in 0..4 {
            for x in 0..4 {
                let expected = if x >= 2 && y < 2 { red } else { Pixel::default() };
                assert_eq!(picture.pixel(x, y), expected, "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn ppm_round_trip() {
        let picture = checkerboard();

        let mut buf = Vec::new();
        let written = picture.encode(&mut buf).unwrap();
        assert_eq!(written, buf.len());
        assert!(buf.starts_with(b"P6\n2 2\n255\n"));

        let decoded = Picture::decode(Cursor::new(buf)).unwrap();
        assert_eq!(decoded, picture);
    }

    #[test]
    fn huge_declared_size_over_short_body() {
        let data = b"P6\n2147483648 2147483648\n255\n\0\0\0".to_vec();

        let err = Picture::decode(Cursor::new(data)).unwrap_err();
        assert!(
            matches!(&err, Error::Io(e) if e.kind() == ErrorKind::UnexpectedEof)
                || matches!(&err, Error::TooLarge(_)),
            "{err}"
        );
    }

    #[test]
    fn unallocatable_picture_is_an_error() {
        assert!(matches!(Picture::new(1 << 31), Err(Error::TooLarge(size)) if size == 1 << 31));
    }

    #[test]
    fn short_bitmap_is_an_io_error() {
        let mut data = b"P6\n2 2\n255\n".to_vec();
        data.extend_from_slice(&[0; 6]);

        assert!(matches!(Picture::decode(Cursor::new(data)), Err(Error::Io(_))));
    }
}
