use super::error::BencodeError;
use super::value::Value;
use std::io::Write;

/// Serializes `value` into a freshly allocated buffer.
///
/// Output is canonical: dictionaries are emitted in ascending key byte order
/// whatever order the input had, integers carry no padding, and byte strings
/// are prefixed with their byte count. Equal values therefore always produce
/// identical bytes, which is what info hashes rely on.
///
/// Writing into a `Vec` cannot fail, so in practice this never returns
/// [`BencodeError::Io`]; the `Result` mirrors [`encode_to`].
///
/// # Examples
///
/// ```
/// use metabit::bencode::{encode, Value};
/// use std::collections::BTreeMap;
/// use bytes::Bytes;
///
/// let mut dict = BTreeMap::new();
/// dict.insert(Bytes::from_static(b"spam"), Value::string("eggs"));
/// dict.insert(Bytes::from_static(b"cow"), Value::string("moo"));
/// dict.insert(Bytes::from_static(b"count"), Value::Integer(42));
///
/// let encoded = encode(&Value::Dict(dict)).unwrap();
/// assert_eq!(encoded, b"d5:counti42e3:cow3:moo4:spam4:eggse");
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>, BencodeError> {
    let mut buf = Vec::new();
    encode_to(value, &mut buf)?;
    Ok(buf)
}

/// Encodes a bencode value directly into `writer`.
///
/// Useful when the caller already owns a buffer or stream and wants to avoid
/// the intermediate allocation made by [`encode`].
pub fn encode_to<W: Write>(value: &Value, writer: &mut W) -> Result<(), BencodeError> {
    match value {
        Value::Integer(i) => {
            write!(writer, "i{}e", i)?;
        }
        Value::Bytes(b) => {
            write_bytes(b, writer)?;
        }
        Value::List(l) => {
            writer.write_all(b"l")?;
            for item in l {
                encode_to(item, writer)?;
            }
            writer.write_all(b"e")?;
        }
        Value::Dict(d) => {
            writer.write_all(b"d")?;
            // BTreeMap iterates keys in ascending byte order.
            for (key, val) in d {
                write_bytes(key, writer)?;
                encode_to(val, writer)?;
            }
            writer.write_all(b"e")?;
        }
    }
    Ok(())
}

fn write_bytes<W: Write>(bytes: &[u8], writer: &mut W) -> Result<(), BencodeError> {
    write!(writer, "{}:", bytes.len())?;
    writer.write_all(bytes)?;
    Ok(())
}
