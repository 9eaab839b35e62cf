//! Exact byte-string search.
//!
//! All functions match raw bytes with no case folding or encoding awareness. An
//! empty needle never matches anything. Repeated matches are non-overlapping: after
//! a match the scan resumes past the whole matched span, so `"aa"` occurs twice in
//! `"aaaa"`, not three times.

use std::iter::FusedIterator;

use crate::DString;

/// Returns the offset of the first occurrence of `needle` in `haystack`.
///
/// ```
/// use dstring::search::find;
///
/// assert_eq!(find(b"abcabc", b"ca"), Some(2));
/// assert_eq!(find(b"abc", b""), None);
/// ```
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Returns the offset of the last occurrence of `needle` in `haystack`.
pub fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle)
}

/// Returns an iterator over the offsets of the non-overlapping occurrences of
/// `needle`, scanning from the front.
pub fn matches<'a>(haystack: &'a [u8], needle: &'a [u8]) -> Matches<'a> {
    Matches {
        haystack,
        needle,
        pos: 0,
    }
}

/// Returns an iterator over the offsets of the non-overlapping occurrences of
/// `needle`, scanning from the back. Offsets are yielded in decreasing order.
///
/// Scanning from the back can pick different occurrences than scanning from the
/// front when occurrences overlap:
///
/// ```
/// use dstring::search::{matches, rmatches};
///
/// assert_eq!(matches(b"aaa", b"aa").collect::<Vec<_>>(), [0]);
/// assert_eq!(rmatches(b"aaa", b"aa").collect::<Vec<_>>(), [1]);
/// ```
pub fn rmatches<'a>(haystack: &'a [u8], needle: &'a [u8]) -> RMatches<'a> {
    RMatches {
        haystack,
        needle,
        end: haystack.len(),
    }
}

/// Counts the non-overlapping occurrences of `needle`.
pub fn count(haystack: &[u8], needle: &[u8]) -> usize {
    matches(haystack, needle).count()
}

/// Returns the offset of the `n`-th non-overlapping occurrence of `needle`,
/// counting from `1`. `n == 0` never matches.
pub fn find_nth(haystack: &[u8], needle: &[u8], n: usize) -> Option<usize> {
    let skip = n.checked_sub(1)?;
    matches(haystack, needle).nth(skip)
}

/// Forward iterator returned by [`matches`].
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    haystack: &'a [u8],
    needle: &'a [u8],
    pos: usize,
}

impl Iterator for Matches<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let rest = self.haystack.get(self.pos..)?;
        let start = self.pos + find(rest, self.needle)?;
        self.pos = start + self.needle.len();
        Some(start)
    }
}

impl FusedIterator for Matches<'_> {}

/// Backward iterator returned by [`rmatches`].
#[derive(Debug, Clone)]
pub struct RMatches<'a> {
    haystack: &'a [u8],
    needle: &'a [u8],
    end: usize,
}

impl Iterator for RMatches<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let start = rfind(&self.haystack[..self.end], self.needle)?;
        self.end = start;
        Some(start)
    }
}

impl FusedIterator for RMatches<'_> {}

impl DString {
    /// Returns `true` if the content begins with a non-empty `needle`.
    pub fn starts_with(&self, needle: impl AsRef<[u8]>) -> bool {
        let needle = needle.as_ref();
        !needle.is_empty() && self.as_bytes().starts_with(needle)
    }

    /// Returns `true` if the content ends with a non-empty `needle`.
    pub fn ends_with(&self, needle: impl AsRef<[u8]>) -> bool {
        let needle = needle.as_ref();
        !needle.is_empty() && self.as_bytes().ends_with(needle)
    }

    /// Returns `true` if a non-empty `needle` occurs anywhere in the content.
    pub fn contains(&self, needle: impl AsRef<[u8]>) -> bool {
        self.find(needle).is_some()
    }

    /// Returns the offset of the first occurrence of `needle`.
    pub fn find(&self, needle: impl AsRef<[u8]>) -> Option<usize> {
        find(self.as_bytes(), needle.as_ref())
    }

    /// Returns the offset of the last occurrence of `needle`.
    pub fn rfind(&self, needle: impl AsRef<[u8]>) -> Option<usize> {
        rfind(self.as_bytes(), needle.as_ref())
    }

    /// Counts the non-overlapping occurrences of `needle`.
    ///
    /// ```
    /// use dstring::DString;
    ///
    /// let s = DString::from_text("aaaa").unwrap();
    /// assert_eq!(s.count("aa"), 2);
    /// ```
    pub fn count(&self, needle: impl AsRef<[u8]>) -> usize {
        count(self.as_bytes(), needle.as_ref())
    }

    /// Returns the offset of the `n`-th non-overlapping occurrence of `needle`,
    /// counting from `1`.
    pub fn find_nth(&self, needle: impl AsRef<[u8]>, n: usize) -> Option<usize> {
        find_nth(self.as_bytes(), needle.as_ref(), n)
    }

    /// Iterates over the non-overlapping occurrences of `needle` from the front.
    pub fn match_indices<'a, N>(&'a self, needle: &'a N) -> Matches<'a>
    where
        N: AsRef<[u8]> + ?Sized,
    {
        matches(self.as_bytes(), needle.as_ref())
    }

    /// Iterates over the non-overlapping occurrences of `needle` from the back.
    pub fn rmatch_indices<'a, N>(&'a self, needle: &'a N) -> RMatches<'a>
    where
        N: AsRef<[u8]> + ?Sized,
    {
        rmatches(self.as_bytes(), needle.as_ref())
    }
}
