use super::error::BencodeError;
use super::value::Value;
use crate::constants::{MAX_BYTE_STRING_LENGTH, MAX_INPUT_LENGTH, MAX_NESTING_DEPTH};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::Read;

/// Limits applied while decoding.
///
/// The defaults bound memory use against corrupt or hostile input; callers
/// decoding trusted data may raise them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Longest byte string accepted, in bytes.
    pub max_byte_string_length: usize,
    /// Deepest list/dictionary nesting accepted.
    pub max_depth: usize,
    /// Most bytes [`decode_reader`] will pull from its source.
    pub max_input_length: usize,
    /// Ignore bytes after the first complete value instead of failing with
    /// [`BencodeError::TrailingData`].
    pub allow_trailing_data: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_byte_string_length: MAX_BYTE_STRING_LENGTH,
            max_depth: MAX_NESTING_DEPTH,
            max_input_length: MAX_INPUT_LENGTH,
            allow_trailing_data: false,
        }
    }
}

/// Decodes a single bencode value using the default limits.
///
/// The whole buffer must be consumed by the value; anything left over is
/// reported as [`BencodeError::TrailingData`].
///
/// # Examples
///
/// ```
/// use metabit::bencode::{decode, Value};
///
/// assert_eq!(decode(b"i-1e").unwrap(), Value::Integer(-1));
/// assert!(decode(b"i-0e").is_err());
/// ```
pub fn decode(data: &[u8]) -> Result<Value, BencodeError> {
    decode_with(data, &DecodeOptions::default())
}

/// Decodes a single bencode value with explicit limits.
///
/// With `allow_trailing_data` set, only the leading value is decoded and the
/// rest of the buffer is skipped.
pub fn decode_with(data: &[u8], options: &DecodeOptions) -> Result<Value, BencodeError> {
    tracing::trace!("decoding {} bytes of bencode", data.len());

    let mut decoder = Decoder {
        data,
        pos: 0,
        options,
    };
    let value = decoder.value(0)?;

    if decoder.pos != data.len() {
        if !options.allow_trailing_data {
            return Err(BencodeError::TrailingData(decoder.pos));
        }
        tracing::debug!(
            "ignoring {} trailing bytes after offset {}",
            data.len() - decoder.pos,
            decoder.pos
        );
    }

    Ok(value)
}

/// Reads `reader` to the end and decodes the collected bytes.
///
/// At most `options.max_input_length` bytes are buffered; a longer source
/// fails with [`BencodeError::InputTooLarge`] without reading further.
pub fn decode_reader<R: Read>(reader: R, options: &DecodeOptions) -> Result<Value, BencodeError> {
    let limit = options.max_input_length;
    let mut buf = Vec::new();
    reader.take(limit as u64 + 1).read_to_end(&mut buf)?;

    if buf.len() > limit {
        return Err(BencodeError::InputTooLarge(limit));
    }

    decode_with(&buf, options)
}

struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
    options: &'a DecodeOptions,
}

impl<'a> Decoder<'a> {
    fn peek(&self) -> Result<u8, BencodeError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(BencodeError::UnexpectedEof(self.pos))
    }

    fn value(&mut self, depth: usize) -> Result<Value, BencodeError> {
        if depth > self.options.max_depth {
            return Err(BencodeError::NestingTooDeep(self.pos));
        }

        match self.peek()? {
            b'i' => self.integer(),
            b'l' => self.list(depth),
            b'd' => self.dict(depth),
            b'0'..=b'9' => self.bytes(),
            byte => Err(BencodeError::UnexpectedByte {
                byte,
                offset: self.pos,
            }),
        }
    }

    /// Scans forward to `terminator`, returning the bytes before it and
    /// leaving the cursor just past it.
    fn take_until(&mut self, terminator: u8) -> Result<&'a [u8], BencodeError> {
        let data = self.data;
        let start = self.pos;
        let len = data[start..]
            .iter()
            .position(|&b| b == terminator)
            .ok_or(BencodeError::UnexpectedEof(data.len()))?;

        self.pos = start + len + 1;
        Ok(&data[start..start + len])
    }

    fn integer(&mut self) -> Result<Value, BencodeError> {
        let offset = self.pos;
        self.pos += 1;
        let raw = self.take_until(b'e')?;
        let invalid = |reason: &'static str| BencodeError::InvalidInteger { offset, reason };

        let digits = raw.strip_prefix(b"-").unwrap_or(raw);
        if digits.is_empty() {
            return Err(invalid("empty"));
        }
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(invalid("non-digit character"));
        }
        if digits[0] == b'0' && digits.len() > 1 {
            return Err(invalid("leading zeros"));
        }
        if digits == b"0" && digits.len() != raw.len() {
            return Err(invalid("negative zero"));
        }

        // Only ASCII digits and an optional sign remain.
        let text = std::str::from_utf8(raw).map_err(|_| invalid("invalid utf8"))?;
        let value: i64 = text.parse().map_err(|_| invalid("out of range"))?;

        Ok(Value::Integer(value))
    }

    fn bytes(&mut self) -> Result<Value, BencodeError> {
        let offset = self.pos;
        let raw = self.take_until(b':')?;

        if !raw.iter().all(u8::is_ascii_digit) {
            return Err(BencodeError::InvalidStringLength(offset));
        }
        let len: usize = std::str::from_utf8(raw)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(BencodeError::InvalidStringLength(offset))?;

        let max = self.options.max_byte_string_length;
        if len > max {
            return Err(BencodeError::ByteStringTooLong { offset, len, max });
        }

        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(BencodeError::UnexpectedEof(self.data.len()))?;

        let bytes = Bytes::copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;

        Ok(Value::Bytes(bytes))
    }

    fn list(&mut self, depth: usize) -> Result<Value, BencodeError> {
        self.pos += 1;
        let mut list = Vec::new();

        while self.peek()? != b'e' {
            list.push(self.value(depth + 1)?);
        }

        self.pos += 1;
        Ok(Value::List(list))
    }

    fn dict(&mut self, depth: usize) -> Result<Value, BencodeError> {
        self.pos += 1;
        let mut dict = BTreeMap::new();

        while self.peek()? != b'e' {
            let key_offset = self.pos;
            let key = match self.value(depth + 1)? {
                Value::Bytes(b) => b,
                other => {
                    return Err(BencodeError::NonStringKey {
                        offset: key_offset,
                        found: other.type_name(),
                    })
                }
            };

            // Duplicate keys: the last occurrence wins.
            let value = self.value(depth + 1)?;
            dict.insert(key, value);
        }

        self.pos += 1;
        Ok(Value::Dict(dict))
    }
}
