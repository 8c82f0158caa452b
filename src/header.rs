use std::io::{BufRead, Write};

use crate::picture::Error;

/// The only PPM variant understood here: binary RGB.
pub const MAGIC: [u8; 2] = *b"P6";

/// The only accepted maximum channel value.
pub const MAX_VALUE: u32 = 255;

/// A binary PPM header. This must be included at the beginning
/// of a valid PPM file, directly followed by the raw pixel triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Identifier. Must be set to "P6".
    pub magic: [u8; 2],

    /// Width of the image in pixels.
    pub width: u32,

    /// Height of the image in pixels.
    pub height: u32,

    /// Maximum value of a color channel. Must be 255.
    pub max_value: u32,
}

impl Header {
    /// Create a header for a square picture of the given side length.
    pub fn square(size: u32) -> Self {
        Self {
            magic: MAGIC,
            width: size,
            height: size,
            max_value: MAX_VALUE,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.len());
        buf.extend_from_slice(&self.magic);
        let fields = format!("\n{} {}\n{}\n", self.width, self.height, self.max_value);
        buf.extend_from_slice(fields.as_bytes());

        buf
    }

    pub fn write_into<T: Write>(&self, output: &mut T) -> Result<usize, std::io::Error> {
        let bytes = self.to_bytes();
        output.write_all(&bytes)?;

        Ok(bytes.len())
    }

    /// Length of the header in bytes when written out.
    pub fn len(&self) -> usize {
        // "P6\n" + "W H\n" + "M\n"
        3 + digits(self.width) + 1 + digits(self.height) + 1 + digits(self.max_value) + 1
    }

    /// The side length of the picture, if the header describes a square with
    /// a power of two side.
    pub fn square_size(&self) -> Option<u32> {
        if self.width == self.height && self.width.is_power_of_two() {
            Some(self.width)
        } else {
            None
        }
    }

    /// Read and validate a header, leaving `input` positioned at the first
    /// pixel byte.
    ///
    /// Checks happen in this order: identifier, dimensions, color range.
    pub fn read_from<T: BufRead>(input: &mut T) -> Result<Self, Error> {
        let mut magic = [0u8; 2];
        input.read_exact(&mut magic)?;

        if magic != MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let width = read_number(input, "width")?;
        let height = read_number(input, "height")?;

        let mut header = Self {
            magic,
            width,
            height,
            max_value: MAX_VALUE,
        };
        if header.square_size().is_none() {
            return Err(Error::InvalidDimensions { width, height });
        }

        header.max_value = read_number(input, "color range")?;
        if header.max_value != MAX_VALUE {
            return Err(Error::InvalidColorRange(header.max_value));
        }

        // Exactly one whitespace byte separates the header from the bitmap
        let mut separator = [0u8; 1];
        input.read_exact(&mut separator)?;
        if !separator[0].is_ascii_whitespace() {
            return Err(Error::InvalidHeader("missing separator before pixel data"));
        }

        Ok(header)
    }
}

fn digits(mut value: u32) -> usize {
    let mut count = 1;
    while value >= 10 {
        value /= 10;
        count += 1;
    }
    count
}

/// Skip whitespace and `#` comments, then read an unsigned decimal token.
///
/// The byte terminating the token is left unread.
fn read_number<T: BufRead>(input: &mut T, field: &'static str) -> Result<u32, Error> {
    let mut in_comment = false;
    loop {
        let byte = match input.fill_buf()?.first() {
            Some(b) => *b,
            None => return Err(Error::InvalidHeader(field)),
        };

        if in_comment {
            in_comment = byte != b'\n';
        } else if byte == b'#' {
            in_comment = true;
        } else if !byte.is_ascii_whitespace() {
            break;
        }
        input.consume(1);
    }

    let mut value: u32 = 0;
    let mut seen_digit = false;
    while let Some(&byte) = input.fill_buf()?.first() {
        if !byte.is_ascii_digit() {
            break;
        }

        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(byte - b'0')))
            .ok_or(Error::InvalidHeader(field))?;
        seen_digit = true;
        input.consume(1);
    }

    if !seen_digit {
        return Err(Error::InvalidHeader(field));
    }

    Ok(value)
}
