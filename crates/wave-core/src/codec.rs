//! Fixed big-endian byte layout for [`SampleBuffer`]
//!
//! ```text
//! offset  size  field
//!      0     8  start_time           f64
//!      8     8  sampling_rate        f64
//!     16     8  registration_offset  f64 (NaN when unset)
//!     24     4  sample count n       i32
//!     28   4·n  samples              i32 each
//!  28+4n     4  data type            2 × u16, optional
//! ```
//!
//! Decoding accepts input that ends right after the samples and leaves the
//! data type unset.

use crate::buffer::{DataType, SampleBuffer};
use crate::error::{Error, Result};
use tracing::debug;

const HEADER_LEN: usize = 28;
const SAMPLE_LEN: usize = 4;
const DATA_TYPE_LEN: usize = 4;

/// Encoder and decoder for the buffer byte layout
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl BinaryCodec {
    /// Number of bytes [`encode`](BinaryCodec::encode) produces for `buffer`
    pub fn encoded_len(buffer: &SampleBuffer) -> usize {
        HEADER_LEN + buffer.len() * SAMPLE_LEN + DATA_TYPE_LEN
    }

    /// Encode a buffer, always including the data type field
    ///
    /// # Errors
    /// Returns `Error::InvalidParameter` if the buffer holds more samples than
    /// the 32-bit count field can declare.
    pub fn encode(buffer: &SampleBuffer) -> Result<Vec<u8>> {
        let count = i32::try_from(buffer.len()).map_err(|_| {
            Error::InvalidParameter(format!(
                "{} samples exceed the encodable count",
                buffer.len()
            ))
        })?;

        let mut out = Vec::with_capacity(Self::encoded_len(buffer));
        out.extend_from_slice(&buffer.start_time.to_be_bytes());
        out.extend_from_slice(&buffer.sampling_rate.to_be_bytes());
        out.extend_from_slice(&buffer.registration_offset.unwrap_or(f64::NAN).to_be_bytes());
        out.extend_from_slice(&count.to_be_bytes());
        for &sample in &buffer.samples {
            out.extend_from_slice(&sample.to_be_bytes());
        }
        let units = buffer.data_type.as_ref().map_or([0; 2], DataType::to_units);
        for unit in units {
            out.extend_from_slice(&unit.to_be_bytes());
        }
        Ok(out)
    }

    /// Decode a buffer
    ///
    /// # Errors
    /// Returns `Error::MalformedEncoding` if the header is truncated, the
    /// sample count is negative, or fewer bytes remain than the count
    /// declares. Nothing is allocated before the count is validated.
    pub fn decode(bytes: &[u8]) -> Result<SampleBuffer> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::malformed(format!(
                "header needs {HEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut reader = Reader::new(bytes);
        let start_time = f64::from_be_bytes(reader.take()?);
        let sampling_rate = f64::from_be_bytes(reader.take()?);
        let registration = f64::from_be_bytes(reader.take()?);
        let count = i32::from_be_bytes(reader.take()?);

        let count = usize::try_from(count)
            .map_err(|_| Error::malformed(format!("negative sample count {count}")))?;
        let needed = count
            .checked_mul(SAMPLE_LEN)
            .ok_or_else(|| Error::malformed(format!("sample count {count} overflows")))?;
        if needed > reader.remaining() {
            return Err(Error::malformed(format!(
                "sample count {count} needs {needed} bytes, {} remain",
                reader.remaining()
            )));
        }

        let mut samples = Vec::with_capacity(count);
        for _ in 0..count {
            samples.push(i32::from_be_bytes(reader.take()?));
        }

        let data_type = if reader.remaining() >= DATA_TYPE_LEN {
            let first = u16::from_be_bytes(reader.take()?);
            let second = u16::from_be_bytes(reader.take()?);
            DataType::from_units([first, second])
        } else {
            None
        };
        debug!(count, has_data_type = data_type.is_some(), "decoded buffer");

        let mut buffer = SampleBuffer::new(samples, start_time, sampling_rate);
        buffer.registration_offset = (!registration.is_nan()).then_some(registration);
        buffer.data_type = data_type;
        Ok(buffer)
    }
}

/// Bounds-checked cursor over the input bytes
struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn remaining(&self) -> usize {
        self.bytes.len()
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let (head, rest) = self
            .bytes
            .split_first_chunk::<N>()
            .ok_or_else(|| Error::malformed(format!("unexpected end of input reading {N} bytes")))?;
        self.bytes = rest;
        Ok(*head)
    }
}

impl SampleBuffer {
    /// Encode with [`BinaryCodec`]
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        BinaryCodec::encode(self)
    }

    /// Decode with [`BinaryCodec`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        BinaryCodec::decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::NO_DATA;

    fn tagged() -> SampleBuffer {
        SampleBuffer::new(vec![1, -2, NO_DATA, i32::MAX], 1000.25, 40.0)
            .with_data_type(DataType::new("TL").unwrap())
    }

    #[test]
    fn test_layout() {
        let bytes = tagged().to_bytes().unwrap();
        assert_eq!(bytes.len(), 28 + 16 + 4);
        assert_eq!(&bytes[0..8], &1000.25f64.to_be_bytes());
        assert_eq!(&bytes[8..16], &40.0f64.to_be_bytes());
        assert!(f64::from_be_bytes(bytes[16..24].try_into().unwrap()).is_nan());
        assert_eq!(&bytes[24..28], &[0, 0, 0, 4]);
        assert_eq!(&bytes[32..36], &(-2i32).to_be_bytes());
        assert_eq!(&bytes[44..48], &[0, b'T', 0, b'L']);
    }

    #[test]
    fn test_round_trip() {
        let mut buffer = tagged();
        buffer.set_start_time(1000.26);
        buffer.register();
        let decoded = SampleBuffer::from_bytes(&buffer.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded.samples(), buffer.samples());
        assert_eq!(decoded.start_time(), buffer.start_time());
        assert_eq!(decoded.sampling_rate(), buffer.sampling_rate());
        assert_eq!(decoded.registration_offset(), buffer.registration_offset());
        assert_eq!(decoded.data_type().map(DataType::as_str), Some("TL"));
    }

    #[test]
    fn test_missing_data_type_is_tolerated() {
        let bytes = tagged().to_bytes().unwrap();
        let decoded = BinaryCodec::decode(&bytes[..bytes.len() - 4]).unwrap();
        assert_eq!(decoded.len(), 4);
        assert!(decoded.data_type().is_none());

        let partial = BinaryCodec::decode(&bytes[..bytes.len() - 2]).unwrap();
        assert!(partial.data_type().is_none());
    }

    #[test]
    fn test_untagged_buffer_decodes_without_tag() {
        let buffer = SampleBuffer::new(vec![7], 0.0, 1.0);
        let decoded = BinaryCodec::decode(&BinaryCodec::encode(&buffer).unwrap()).unwrap();
        assert!(decoded.data_type().is_none());
        assert!(decoded.registration_offset().is_none());
    }

    #[test]
    fn test_truncated_header() {
        let err = BinaryCodec::decode(&[0u8; 27]).unwrap_err();
        assert!(matches!(err, Error::MalformedEncoding(_)));
    }

    #[test]
    fn test_inconsistent_counts() {
        let mut bytes = tagged().to_bytes().unwrap();
        bytes[24..28].copy_from_slice(&(-1i32).to_be_bytes());
        assert!(matches!(BinaryCodec::decode(&bytes), Err(Error::MalformedEncoding(_))));

        bytes[24..28].copy_from_slice(&i32::MAX.to_be_bytes());
        assert!(matches!(BinaryCodec::decode(&bytes), Err(Error::MalformedEncoding(_))));

        bytes[24..28].copy_from_slice(&6i32.to_be_bytes());
        assert!(matches!(BinaryCodec::decode(&bytes), Err(Error::MalformedEncoding(_))));
    }
}
