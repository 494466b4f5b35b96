//! Base 128 varints, zigzag encoded when signed.
//!
//! The lower 7 bits of every byte are accumulated little-endian. The most
//! significant bit is a continuation flag.
use bytes::BufMut;

use crate::errors::{OrcError, Result};
use crate::input::OrcInputStream;

/// Max number of bytes a 64-bit varint may occupy.
pub const MAX_VARINT_LEN: usize = 10;

#[inline]
pub const fn zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

#[inline]
pub const fn zigzag_decode(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

/// Reads a single varint from the input.
pub fn read_vint<S>(signed: bool, input: &mut S) -> Result<i64>
where
    S: OrcInputStream + ?Sized,
{
    let raw = read_unsigned_vint(signed, input)?;
    if signed {
        Ok(zigzag_decode(raw))
    } else {
        Ok(raw as i64)
    }
}

fn read_unsigned_vint<S>(signed: bool, input: &mut S) -> Result<u64>
where
    S: OrcInputStream + ?Sized,
{
    let mut result = 0u64;
    let mut shift = 0u32;
    loop {
        let b = match input.read_byte()? {
            Some(b) => b,
            None => {
                let msg = if signed {
                    "EOF while reading signed varint"
                } else {
                    "EOF while reading unsigned varint"
                };
                return Err(OrcError::corruption(input.data_source_id(), msg));
            }
        };
        result |= ((b & 0x7F) as u64) << shift;
        if b & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
        if shift >= 64 {
            return Err(OrcError::corruption(
                input.data_source_id(),
                "Varint is longer than 10 bytes",
            ));
        }
    }
}

/// Writes a single varint to `out`.
pub fn write_vint(signed: bool, value: i64, out: &mut impl BufMut) {
    let mut v = if signed {
        zigzag_encode(value)
    } else {
        value as u64
    };
    while v >= 0x80 {
        out.put_u8((v as u8 & 0x7F) | 0x80);
        v >>= 7;
    }
    out.put_u8(v as u8);
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;

    use super::*;
    use crate::input::{MemoryInputStream, OrcDataSourceId};

    fn stream(bs: &[u8]) -> MemoryInputStream {
        MemoryInputStream::new(OrcDataSourceId::new("varint"), bs.to_vec())
    }

    #[test]
    fn zigzag() {
        assert_eq!(0, zigzag_encode(0));
        assert_eq!(1, zigzag_encode(-1));
        assert_eq!(2, zigzag_encode(1));
        assert_eq!(3, zigzag_encode(-2));
        assert_eq!(u64::MAX, zigzag_encode(i64::MIN));
        assert_eq!(u64::MAX - 1, zigzag_encode(i64::MAX));

        for v in [0, 1, -1, 63, -64, 1000, i64::MIN, i64::MAX] {
            assert_eq!(v, zigzag_decode(zigzag_encode(v)));
        }
    }

    #[test]
    fn read_unsigned() {
        // 300 => 0xAC 0x02, 127 => 0x7F
        let mut input = stream(&[0xAC, 0x02, 0x7F]);
        assert_eq!(300, read_vint(false, &mut input).unwrap());
        assert_eq!(127, read_vint(false, &mut input).unwrap());
    }

    #[test]
    fn read_signed() {
        // zigzag(-3) = 5, zigzag(150) = 300
        let mut input = stream(&[0x05, 0xAC, 0x02]);
        assert_eq!(-3, read_vint(true, &mut input).unwrap());
        assert_eq!(150, read_vint(true, &mut input).unwrap());
    }

    #[test]
    fn truncated_is_corruption() {
        let mut input = stream(&[0xAC]);
        let err = read_vint(false, &mut input).unwrap_err();
        assert!(err.is_corruption());
        assert!(err.to_string().contains("unsigned varint"));

        let mut input = stream(&[]);
        let err = read_vint(true, &mut input).unwrap_err();
        assert!(err.to_string().contains("signed varint"));
    }

    #[test]
    fn too_long_is_corruption() {
        let mut input = stream(&[0xFF; 11]);
        let err = read_vint(false, &mut input).unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn write_then_read_extremes() {
        let mut buf = BytesMut::new();
        write_vint(true, i64::MIN, &mut buf);
        write_vint(true, i64::MAX, &mut buf);
        write_vint(false, -1, &mut buf);
        assert_eq!(3 * MAX_VARINT_LEN, buf.len());

        let mut input = stream(&buf);
        assert_eq!(i64::MIN, read_vint(true, &mut input).unwrap());
        assert_eq!(i64::MAX, read_vint(true, &mut input).unwrap());
        assert_eq!(-1, read_vint(false, &mut input).unwrap());
        assert_eq!(0, input.remaining());
    }
}
