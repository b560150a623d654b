use super::value::Value;
use std::fmt::{self, Write};

/// Byte strings longer than this are shown truncated when not valid UTF-8.
const HEX_PREVIEW_LEN: usize = 32;

impl Value {
    /// Renders the value as an indented, type-labelled tree for debugging.
    ///
    /// Byte strings that are not valid UTF-8 (such as `pieces`) are shown as
    /// their length and a hex preview.
    ///
    /// # Examples
    ///
    /// ```
    /// use metabit::bencode::decode;
    ///
    /// let value = decode(b"d3:cow3:mooe").unwrap();
    /// assert_eq!(
    ///     value.to_pretty_string(),
    ///     "dictionary:\n  key: \"cow\"\n    string: \"moo\"\n"
    /// );
    /// ```
    pub fn to_pretty_string(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = write_pretty(&mut out, self, 0);
        out
    }
}

fn write_pretty(out: &mut String, value: &Value, level: usize) -> fmt::Result {
    let indent = "  ".repeat(level);

    match value {
        Value::Integer(i) => writeln!(out, "{indent}integer: {i}"),
        Value::Bytes(b) => match std::str::from_utf8(b) {
            Ok(s) => writeln!(out, "{indent}string: {s:?}"),
            Err(_) => {
                let preview = hex::encode(&b[..b.len().min(HEX_PREVIEW_LEN)]);
                let ellipsis = if b.len() > HEX_PREVIEW_LEN { "..." } else { "" };
                writeln!(out, "{indent}bytes[{}]: {preview}{ellipsis}", b.len())
            }
        },
        Value::List(l) => {
            writeln!(out, "{indent}list:")?;
            for (i, item) in l.iter().enumerate() {
                writeln!(out, "{indent}  [{i}]:")?;
                write_pretty(out, item, level + 2)?;
            }
            Ok(())
        }
        Value::Dict(d) => {
            writeln!(out, "{indent}dictionary:")?;
            for (key, item) in d {
                writeln!(out, "{indent}  key: {:?}", String::from_utf8_lossy(key))?;
                write_pretty(out, item, level + 2)?;
            }
            Ok(())
        }
    }
}
