//! Wire format: a `u32` container count, then per-container a 6-byte big-endian
//! high key and a tagged, little-endian body. See `SPEC_FULL.md` §6.1.
//!
//! Not promised stable across versions — round-trips with this crate's own
//! reader, and rejects malformed input with [`Error::FormatError`] rather than
//! panicking or silently truncating.

use std::io::{Read, Write};

use bytemuck::cast_slice_mut;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::art::Art;
use crate::bitmap::Bitmap64;
use crate::container::array::ArrayContainer;
use crate::container::bitmap::{BitmapArray, BITMAP_LENGTH};
use crate::container::run::{Interval, RunContainer};
use crate::container::Container;
use crate::error::{Error, Result};
use crate::key::{self, HighKey};

type Words = Box<[u64; BITMAP_LENGTH]>;

const KIND_ARRAY: u8 = 0;
const KIND_BITMAP: u8 = 1;
const KIND_RUN: u8 = 2;

const MAX_ARRAY_LEN: usize = 4096;
const MAX_RUN_COUNT: usize = 2048;

impl Bitmap64 {
    /// Write this bitmap to `writer` in the current wire format.
    pub fn serialize_into<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_u32::<LittleEndian>(self.art().len() as u32)?;
        for (high, container) in self.art().iter() {
            writer.write_all(&high)?;
            write_container(&mut writer, container)?;
        }
        Ok(())
    }

    /// Read a bitmap previously written by [`Bitmap64::serialize_into`].
    pub fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        let count = reader.read_u32::<LittleEndian>()?;
        let mut art = Art::new();
        let mut prev: Option<HighKey> = None;
        for _ in 0..count {
            let mut high = [0u8; key::HIGH_BYTES];
            reader.read_exact(&mut high)?;
            if let Some(p) = prev {
                if high <= p {
                    return Err(Error::FormatError("container high keys out of order"));
                }
            }
            prev = Some(high);
            let container = read_container(&mut reader)?;
            art.insert(high, container);
        }
        Ok(Bitmap64::from_art(art))
    }
}

fn write_container<W: Write>(writer: &mut W, container: &Container) -> Result<()> {
    match container {
        Container::Array(c) => {
            writer.write_u8(KIND_ARRAY)?;
            let slice = c.as_slice();
            writer.write_u16::<LittleEndian>(slice.len() as u16)?;
            for &v in slice {
                writer.write_u16::<LittleEndian>(v)?;
            }
        }
        Container::Bitmap(c) => {
            writer.write_u8(KIND_BITMAP)?;
            // `n` is cardinality minus one: a full bitmap has 65536 set bits,
            // which doesn't fit a u16 directly.
            writer.write_u16::<LittleEndian>((c.len() - 1) as u16)?;
            for word in c.words().iter() {
                writer.write_u64::<LittleEndian>(*word)?;
            }
        }
        Container::Run(c) => {
            writer.write_u8(KIND_RUN)?;
            let runs = c.runs();
            writer.write_u16::<LittleEndian>(runs.len() as u16)?;
            for r in runs {
                writer.write_u16::<LittleEndian>(r.start)?;
                writer.write_u16::<LittleEndian>(r.end - r.start)?;
            }
        }
    }
    Ok(())
}

fn read_container<R: Read>(reader: &mut R) -> Result<Container> {
    let kind = reader.read_u8()?;
    match kind {
        KIND_ARRAY => {
            let n = reader.read_u16::<LittleEndian>()? as usize;
            if n > MAX_ARRAY_LEN {
                return Err(Error::FormatError("array container length exceeds maximum"));
            }
            let mut vec = vec![0u16; n];
            reader.read_exact(cast_slice_mut(&mut vec))?;
            vec.iter_mut().for_each(|v| *v = u16::from_le(*v));
            Ok(Container::Array(ArrayContainer::from_vec_unchecked(vec)))
        }
        KIND_BITMAP => {
            let _n = reader.read_u16::<LittleEndian>()?;
            let mut words: Words = Box::new([0u64; BITMAP_LENGTH]);
            reader.read_exact(cast_slice_mut(&mut words[..]))?;
            words.iter_mut().for_each(|w| *w = u64::from_le(*w));
            Ok(Container::Bitmap(BitmapArray::from_words_unchecked(words)))
        }
        KIND_RUN => {
            let r = reader.read_u16::<LittleEndian>()? as usize;
            if r > MAX_RUN_COUNT {
                return Err(Error::FormatError("run container count exceeds maximum"));
            }
            let mut raw = vec![[0u16; 2]; r];
            reader.read_exact(cast_slice_mut(&mut raw))?;
            let mut runs = Vec::with_capacity(r);
            for [start, length_minus_one] in raw {
                let start = u16::from_le(start);
                let length_minus_one = u16::from_le(length_minus_one);
                let end = start
                    .checked_add(length_minus_one)
                    .ok_or(Error::FormatError("run interval overflows u16"))?;
                runs.push(Interval::new(start, end));
            }
            Ok(Container::Run(RunContainer::from_runs_unchecked(runs)))
        }
        _ => Err(Error::FormatError("unknown container kind tag")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_mixed_forms() {
        let mut b = Bitmap64::new();
        b.add_range(0, 100).unwrap();
        b.add(1_000_000);
        b.add_range(2_000_000, 2_010_000).unwrap();
        b.run_optimize();

        let mut buf = Vec::new();
        b.serialize_into(&mut buf).unwrap();
        let restored = Bitmap64::deserialize_from(&buf[..]).unwrap();
        assert_eq!(b, restored);
    }

    #[test]
    fn rejects_unknown_kind_tag() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&[0u8; 6]);
        buf.push(9);
        let err = Bitmap64::deserialize_from(&buf[..]).unwrap_err();
        assert!(matches!(err, Error::FormatError(_)));
    }

    #[test]
    fn rejects_oversized_array_length() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&[0u8; 6]);
        buf.push(0);
        buf.extend_from_slice(&5000u16.to_le_bytes());
        let err = Bitmap64::deserialize_from(&buf[..]).unwrap_err();
        assert!(matches!(err, Error::FormatError(_)));
    }

    #[test]
    fn rejects_truncated_stream() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&[0u8; 3]);
        let err = Bitmap64::deserialize_from(&buf[..]).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }
}
