use super::error::BencodeError;
use bytes::Bytes;
use std::collections::BTreeMap;

/// A bencode value.
///
/// Bencode has four data types: integers, byte strings, lists, and dictionaries.
/// This enum represents any bencode value and provides methods for type-safe access.
///
/// # Examples
///
/// ```
/// use metabit::bencode::Value;
///
/// // Creating values directly
/// let int = Value::Integer(42);
/// let string = Value::string("hello");
/// let list = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
///
/// // Using From implementations
/// let int: Value = 42i64.into();
/// let string: Value = "hello".into();
///
/// // Accessing values
/// assert_eq!(int.as_integer(), Some(42));
/// assert_eq!(string.as_str(), Some("hello"));
/// assert_eq!(list.type_name(), "list");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A byte string (may or may not be valid UTF-8).
    Bytes(Bytes),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A dictionary with byte string keys, kept in ascending key order.
    Dict(BTreeMap<Bytes, Value>),
}

impl Value {
    /// Creates a byte string value from a UTF-8 string.
    pub fn string(s: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Returns a short description of the variant, used in error messages.
    ///
    /// One of `"byte string"`, `"integer"`, `"list"` or `"dictionary"`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Bytes(_) => "byte string",
            Value::List(_) => "list",
            Value::Dict(_) => "dictionary",
        }
    }

    /// Returns the value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a byte string, if it is one.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as a UTF-8 string, if it is a valid UTF-8 byte string.
    ///
    /// Returns `None` if the value is not a byte string or if the bytes are not valid UTF-8.
    ///
    /// # Examples
    ///
    /// ```
    /// use metabit::bencode::Value;
    /// use bytes::Bytes;
    ///
    /// assert_eq!(Value::string("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::Bytes(Bytes::from_static(&[0xff, 0xfe])).as_str(), None);
    /// assert_eq!(Value::Integer(42).as_str(), None);
    /// ```
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Returns the value as a list, if it is one.
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the value as a dictionary reference, if it is one.
    pub fn as_dict(&self) -> Option<&BTreeMap<Bytes, Value>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Consumes the value and returns the dictionary, if it is one.
    pub fn into_dict(self) -> Option<BTreeMap<Bytes, Value>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up a key in this value if it is a dictionary.
    ///
    /// Returns `None` if the value is not a dictionary or if the key is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use metabit::bencode::decode;
    ///
    /// let value = decode(b"d3:cow3:moo4:spam4:eggse").unwrap();
    /// assert_eq!(value.get(b"cow").and_then(|v| v.as_str()), Some("moo"));
    /// assert_eq!(value.get(b"missing"), None);
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.as_dict()?.get(key)
    }

    /// Like [`as_integer`](Self::as_integer), but reports the actual type on mismatch.
    pub fn try_as_integer(&self) -> Result<i64, BencodeError> {
        self.as_integer().ok_or_else(|| self.mismatch("integer"))
    }

    /// Like [`as_bytes`](Self::as_bytes), but reports the actual type on mismatch.
    pub fn try_as_bytes(&self) -> Result<&Bytes, BencodeError> {
        self.as_bytes().ok_or_else(|| self.mismatch("byte string"))
    }

    /// Returns the byte string as text.
    ///
    /// Fails with [`BencodeError::TypeMismatch`] for other variants and with
    /// [`BencodeError::InvalidUtf8`] when the bytes are not UTF-8.
    pub fn try_as_str(&self) -> Result<&str, BencodeError> {
        let bytes = self.try_as_bytes()?;
        std::str::from_utf8(bytes).map_err(|_| BencodeError::InvalidUtf8)
    }

    /// Like [`as_list`](Self::as_list), but reports the actual type on mismatch.
    pub fn try_as_list(&self) -> Result<&Vec<Value>, BencodeError> {
        self.as_list().ok_or_else(|| self.mismatch("list"))
    }

    /// Like [`as_dict`](Self::as_dict), but reports the actual type on mismatch.
    pub fn try_as_dict(&self) -> Result<&BTreeMap<Bytes, Value>, BencodeError> {
        self.as_dict().ok_or_else(|| self.mismatch("dictionary"))
    }

    /// Converts a list of byte strings into owned strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use metabit::bencode::decode;
    ///
    /// let value = decode(b"l4:spam4:eggse").unwrap();
    /// assert_eq!(value.string_list().unwrap(), vec!["spam", "eggs"]);
    ///
    /// let mixed = decode(b"l4:spami1ee").unwrap();
    /// assert!(mixed.string_list().is_err());
    /// ```
    pub fn string_list(&self) -> Result<Vec<String>, BencodeError> {
        self.try_as_list()?
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.try_as_str()
                    .map(String::from)
                    .map_err(|e| BencodeError::ListElement {
                        index,
                        source: Box::new(e),
                    })
            })
            .collect()
    }

    /// Converts a list of integers into a vector.
    pub fn integer_list(&self) -> Result<Vec<i64>, BencodeError> {
        self.try_as_list()?
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.try_as_integer().map_err(|e| BencodeError::ListElement {
                    index,
                    source: Box::new(e),
                })
            })
            .collect()
    }

    fn mismatch(&self, expected: &'static str) -> BencodeError {
        BencodeError::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<BTreeMap<Bytes, Value>> for Value {
    fn from(d: BTreeMap<Bytes, Value>) -> Self {
        Value::Dict(d)
    }
}
