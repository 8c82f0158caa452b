//! Record level access to the compressed stream.

use std::io::{ErrorKind, Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt, LE};

use crate::picture::{Error, Pixel};

pub const FLAG_INTERNAL: u8 = 0;
pub const FLAG_LEAF: u8 = 1;

pub struct RecordWriter<'a, O: Write + WriteBytesExt> {
    output: &'a mut O,

    byte_size: usize,
}

impl<'a, O: Write + WriteBytesExt> RecordWriter<'a, O> {
    pub fn new(output: &'a mut O) -> Self {
        Self {
            output,

            byte_size: 0,
        }
    }

    /// Number of bytes written so far
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    pub fn write_size(&mut self, size: u32) -> Result<(), Error> {
        self.output.write_u32::<LE>(size)?;
        self.byte_size += 4;

        Ok(())
    }

    pub fn write_leaf(&mut self, pixel: Pixel) -> Result<(), Error> {
        self.output.write_u8(FLAG_LEAF)?;
        self.output.write_all(&pixel.to_bytes())?;
        self.byte_size += 4;

        Ok(())
    }

    pub fn write_internal(&mut self) -> Result<(), Error> {
        self.output.write_u8(FLAG_INTERNAL)?;
        self.byte_size += 1;

        Ok(())
    }
}

pub struct RecordReader<'a, I: Read + ReadBytesExt> {
    input: &'a mut I,

    byte_offset: usize,
}

impl<'a, I: Read + ReadBytesExt> RecordReader<'a, I> {
    pub fn new(input: &'a mut I) -> Self {
        Self {
            input,

            byte_offset: 0,
        }
    }

    /// Offset of the next unread byte
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    pub fn read_size(&mut self) -> Result<u32, Error> {
        let size = self.input.read_u32::<LE>().map_err(|e| self.truncated(e))?;
        self.byte_offset += 4;

        Ok(size)
    }

    /// Read a node flag, returning whether the node is a leaf
    pub fn read_is_leaf(&mut self) -> Result<bool, Error> {
        let offset = self.byte_offset;
        let flag = self.input.read_u8().map_err(|e| self.truncated(e))?;
        self.byte_offset += 1;

        match flag {
            FLAG_LEAF => Ok(true),
            FLAG_INTERNAL => Ok(false),
            flag => Err(Error::InvalidFlag { flag, offset }),
        }
    }

    pub fn read_pixel(&mut self) -> Result<Pixel, Error> {
        let mut bytes = [0u8; 3];
        self.input.read_exact(&mut bytes).map_err(|e| self.truncated(e))?;
        self.byte_offset += 3;

        Ok(Pixel::from_bytes(bytes))
    }

    fn truncated(&self, error: std::io::Error) -> Error {
        if error.kind() == ErrorKind::UnexpectedEof {
            Error::Truncated {
                offset: self.byte_offset,
            }
        } else {
            Error::Io(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn records_are_byte_aligned() {
        let mut buf = Vec::new();
        let mut writer = RecordWriter::new(&mut buf);
        writer.write_size(0x0102_0304).unwrap();
        writer.write_internal().unwrap();
        writer.write_leaf(Pixel::new(7, 8, 9)).unwrap();
        assert_eq!(writer.byte_size(), 9);

        assert_eq!(buf, [4, 3, 2, 1, 0, 1, 7, 8, 9]);
    }

    #[test]
    fn reads_back_records() {
        let mut input = Cursor::new(vec![16, 0, 0, 0, 0, 1, 7, 8, 9]);
        let mut reader = RecordReader::new(&mut input);

        assert_eq!(reader.read_size().unwrap(), 16);
        assert!(!reader.read_is_leaf().unwrap());
        assert!(reader.read_is_leaf().unwrap());
        assert_eq!(reader.read_pixel().unwrap(), Pixel::new(7, 8, 9));
        assert_eq!(reader.byte_offset(), 9);
    }

    #[test]
    fn reports_offsets() {
        let mut input = Cursor::new(vec![2, 0, 0, 0, 5]);
        let mut reader = RecordReader::new(&mut input);
        reader.read_size().unwrap();
        assert!(matches!(reader.read_is_leaf(), Err(Error::InvalidFlag { flag: 5, offset: 4 })));

        let mut input = Cursor::new(vec![2, 0, 0, 0, 1, 9]);
        let mut reader = RecordReader::new(&mut input);
        reader.read_size().unwrap();
        reader.read_is_leaf().unwrap();
        assert!(matches!(reader.read_pixel(), Err(Error::Truncated { offset: 5 })));
    }
}
