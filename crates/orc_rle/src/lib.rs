//! Run length encoded integer streams as found in ORC files.
//!
//! Provides the version 1 integer RLE decoder used by column readers, with
//! support for seeking to row group checkpoints and for scanning only the
//! values at a set of selected positions.
//!
//! ```
//! use orc_rle::input::{MemoryInputStream, OrcDataSourceId};
//! use orc_rle::stream::LongInputStream;
//! use orc_rle::stream::long_v1::LongInputStreamV1;
//!
//! // Repeat run of 8 values starting at 10 with a delta of 2.
//! let input = MemoryInputStream::new(OrcDataSourceId::new("example"), vec![0x05u8, 0x02, 0x0A]);
//! let mut stream = LongInputStreamV1::new(input, false);
//!
//! stream.skip(3).unwrap();
//! assert_eq!(16, stream.next().unwrap());
//! ```

pub mod checkpoint;
pub mod errors;
pub mod input;
pub mod stream;
pub mod varint;
