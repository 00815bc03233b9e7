use bytes::Bytes;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// A string handle that is either owned text or a span of UTF-8 bytes inside a shared buffer.
///
/// Equality, ordering and hashing always operate on the byte content, so a decoded span and
/// an owned string with the same text are interchangeable. Ordering is unsigned-byte
/// lexicographic, which for valid UTF-8 matches code point order.
#[derive(Clone)]
pub struct Utf8String {
    repr: Repr,
    text: OnceLock<Arc<str>>,
}

#[derive(Clone)]
enum Repr {
    Text(Arc<str>),
    Bytes(Bytes),
}

impl Utf8String {
    pub fn from_text(text: impl Into<Arc<str>>) -> Self {
        Self {
            repr: Repr::Text(text.into()),
            text: OnceLock::new(),
        }
    }

    /// Wrap a span of UTF-8 bytes without copying. Invalid sequences are replaced when the
    /// text form is first requested.
    pub fn from_utf8(bytes: Bytes) -> Self {
        Self {
            repr: Repr::Bytes(bytes),
            text: OnceLock::new(),
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.repr {
            Repr::Text(s) => s.as_bytes(),
            Repr::Bytes(b) => b,
        }
    }

    /// Text form; decoded once on first use for byte-backed strings.
    pub fn as_str(&self) -> &str {
        match &self.repr {
            Repr::Text(s) => s,
            Repr::Bytes(b) => self
                .text
                .get_or_init(|| Arc::from(String::from_utf8_lossy(b).as_ref())),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl Default for Utf8String {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Utf8String {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Utf8String {}

impl PartialOrd for Utf8String {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Utf8String {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl Hash for Utf8String {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Debug for Utf8String {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Utf8String {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Utf8String {
    fn from(value: &str) -> Self {
        Self::from_text(value)
    }
}

impl From<String> for Utf8String {
    fn from(value: String) -> Self {
        Self::from_text(value)
    }
}

impl From<Arc<str>> for Utf8String {
    fn from(value: Arc<str>) -> Self {
        Self::from_text(value)
    }
}
