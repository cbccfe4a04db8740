// Non-owning views over template text

use std::cmp::Ordering;
use std::fmt;

/// A sub-range view was addressed past the end of its backing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("range {offset}..{offset}+{length} is out of bounds for a view of length {available}")]
pub struct OutOfRange {
    pub offset: usize,
    pub length: usize,
    pub available: usize,
}

/// Borrowed window `[start, start + len)` into a string.
///
/// The view never copies or mutates its origin and cannot outlive it.
/// Offsets are in bytes; `slice` only accepts offsets that land on
/// character boundaries of the origin.
#[derive(Clone, Copy)]
pub struct TextSpan<'a> {
    origin: &'a str,
    start: usize,
    len: usize,
}

impl<'a> TextSpan<'a> {
    /// View over the whole of `source`.
    pub const fn of(source: &'a str) -> Self {
        Self {
            origin: source,
            start: 0,
            len: source.len(),
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset of this view inside the string it was created from.
    pub const fn start(&self) -> usize {
        self.start
    }

    pub fn origin(&self) -> &'a str {
        self.origin
    }

    /// Sub-view of `length` bytes at `offset`, relative to this view.
    pub fn slice(&self, offset: usize, length: usize) -> Result<Self, OutOfRange> {
        let out_of_range = OutOfRange {
            offset,
            length,
            available: self.len,
        };
        let fits = offset
            .checked_add(length)
            .is_some_and(|end| end <= self.len);
        if !fits {
            return Err(out_of_range);
        }
        let start = self.start + offset;
        if !self.origin.is_char_boundary(start) || !self.origin.is_char_boundary(start + length) {
            return Err(out_of_range);
        }
        Ok(Self {
            origin: self.origin,
            start,
            len: length,
        })
    }

    /// Everything from `offset` to the end of this view.
    pub fn slice_from(&self, offset: usize) -> Result<Self, OutOfRange> {
        let length = self.len.checked_sub(offset).ok_or(OutOfRange {
            offset,
            length: 0,
            available: self.len,
        })?;
        self.slice(offset, length)
    }

    /// Relative offset of the first `needle` at or after `from`.
    pub fn find(&self, needle: u8, from: usize) -> Option<usize> {
        self.as_bytes()
            .get(from..)?
            .iter()
            .position(|&b| b == needle)
            .map(|pos| pos + from)
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        &self.origin.as_bytes()[self.start..self.start + self.len]
    }

    /// Borrowed text of the view. Boundaries are validated on construction.
    pub fn as_str(&self) -> &'a str {
        &self.origin[self.start..self.start + self.len]
    }

    pub fn to_owned_string(&self) -> String {
        self.as_str().to_string()
    }
}

impl<'a> From<&'a str> for TextSpan<'a> {
    fn from(source: &'a str) -> Self {
        Self::of(source)
    }
}

impl<'a> From<&'a String> for TextSpan<'a> {
    fn from(source: &'a String) -> Self {
        Self::of(source.as_str())
    }
}

impl PartialEq for TextSpan<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for TextSpan<'_> {}

impl PartialEq<str> for TextSpan<'_> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for TextSpan<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialOrd for TextSpan<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Byte-wise; a proper prefix orders before its extension.
impl Ord for TextSpan<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl fmt::Display for TextSpan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for TextSpan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TextSpan({:?} @ {})", self.as_str(), self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_covers_whole_source() {
        let span = TextSpan::of("hello");
        assert_eq!(span.len(), 5);
        assert_eq!(span.start(), 0);
        assert_eq!(span, "hello");
    }

    #[test]
    fn test_slice_is_relative_to_view() {
        let span = TextSpan::of("ten: {}, twenty: {}");
        let tail = span.slice_from(9).unwrap();
        assert_eq!(tail, "twenty: {}");
        assert_eq!(tail.start(), 9);

        let word = tail.slice(0, 6).unwrap();
        assert_eq!(word, "twenty");
        assert_eq!(word.start(), 9);
    }

    #[test]
    fn test_slice_out_of_range() {
        let span = TextSpan::of("abc");
        let err = span.slice(2, 5).unwrap_err();
        assert_eq!(
            err,
            OutOfRange {
                offset: 2,
                length: 5,
                available: 3
            }
        );
        assert!(span.slice_from(4).is_err());
        assert!(span.slice(usize::MAX, 2).is_err());
        assert!(span.slice_from(3).unwrap().is_empty());
    }

    #[test]
    fn test_slice_rejects_split_characters() {
        let span = TextSpan::of("é{}");
        assert!(span.slice(1, 1).is_err());
        assert_eq!(span.slice_from(2).unwrap(), "{}");
    }

    #[test]
    fn test_find() {
        let span = TextSpan::of("a{b}c{d}");
        assert_eq!(span.find(b'{', 0), Some(1));
        assert_eq!(span.find(b'{', 2), Some(5));
        assert_eq!(span.find(b'x', 0), None);
        assert_eq!(span.find(b'{', 100), None);

        let tail = span.slice_from(4).unwrap();
        assert_eq!(tail.find(b'{', 0), Some(1));
    }

    #[test]
    fn test_ordering() {
        let abc = TextSpan::of("abc");
        let ab = TextSpan::of("ab");
        let abd = TextSpan::of("abd");

        assert!(ab < abc);
        assert!(abc < abd);
        assert_eq!(abc.cmp(&TextSpan::of("abc")), Ordering::Equal);

        let source = "xabcx";
        let inner = TextSpan::of(source).slice(1, 3).unwrap();
        assert_eq!(inner, abc);
    }

    #[test]
    fn test_to_owned_string() {
        let owned = String::from("owned {}");
        let span = TextSpan::from(&owned).slice(0, 5).unwrap();
        assert_eq!(span.to_owned_string(), "owned");
    }
}
