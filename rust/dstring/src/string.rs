use std::{cmp::Ordering, ffi::CStr};

use dstring_budget::Budget;
use dstring_common::{Error, Result, verify_arg};

use crate::{
    capacity,
    storage::{self, Storage},
};

/// A mutable, exclusively owned, growable byte string that keeps its content
/// null-terminated.
///
/// All indices and lengths are raw byte offsets. Whenever storage is held,
/// `len() < capacity()` and the byte at `len()` is `0`; a capacity of `0` means no
/// storage is held and the string is empty. Non-zero capacities are multiples of
/// [`capacity::ALIGNMENT`] and never below the floor set by [`DString::reserve`].
///
/// Mutators either succeed or leave the string exactly as it was. The one exception
/// is the best-effort shrink that follows an erase or a shrinking replace: if the
/// smaller allocation cannot be obtained, the larger one is kept silently.
///
/// `DString` does not implement `Clone`; use [`DString::try_clone`] for an explicit,
/// fallible copy.
pub struct DString {
    storage: Storage,
    len: usize,
    floor: usize,
}

impl DString {
    /// Creates a new empty string with no storage.
    pub fn new() -> DString {
        DString {
            storage: Storage::new(),
            len: 0,
            floor: 0,
        }
    }

    /// Creates a new empty string whose storage is charged to `budget`.
    pub fn with_budget(budget: &Budget) -> DString {
        DString {
            storage: Storage::with_budget(budget),
            len: 0,
            floor: 0,
        }
    }

    /// Creates a string holding a copy of `text`.
    ///
    /// Empty text yields a string without storage.
    pub fn from_text(text: impl AsRef<[u8]>) -> Result<DString> {
        let mut s = DString::new();
        s.init(text.as_ref())?;
        Ok(s)
    }

    /// Creates a string holding a copy of `text`, charged to `budget`.
    pub fn from_text_in(text: impl AsRef<[u8]>, budget: &Budget) -> Result<DString> {
        let mut s = DString::with_budget(budget);
        s.init(text.as_ref())?;
        Ok(s)
    }

    /// Returns an independent copy with the same content, capacity and floor, charged
    /// to the same budget.
    pub fn try_clone(&self) -> Result<DString> {
        Ok(DString {
            storage: self.storage.try_clone()?,
            len: self.len,
            floor: self.floor,
        })
    }

    /// Returns the content length in bytes, excluding the terminator.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the allocated size in bytes, including room for the terminator.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns the capacity floor set by the last successful [`DString::reserve`].
    #[inline]
    pub fn floor(&self) -> usize {
        self.floor
    }

    /// Returns the content, excluding the terminator.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage.bytes()[..self.len]
    }

    /// Returns the content followed by its terminator, or `None` when no storage is
    /// held.
    pub fn as_bytes_with_nul(&self) -> Option<&[u8]> {
        if self.capacity() == 0 {
            None
        } else {
            Some(&self.storage.bytes()[..=self.len])
        }
    }

    /// Returns the content as a C string, or `None` when no storage is held.
    ///
    /// Content containing interior `0` bytes is cut at the first of them, the way any
    /// C consumer would read it.
    pub fn as_c_str(&self) -> Option<&CStr> {
        self.as_bytes_with_nul()
            .and_then(|bytes| CStr::from_bytes_until_nul(bytes).ok())
    }

    /// Returns the content as UTF-8 text.
    pub fn to_str(&self) -> std::result::Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(self.as_bytes())
    }

    /// Empties the string without releasing or shrinking its storage.
    pub fn clear(&mut self) {
        if self.capacity() != 0 {
            self.storage.bytes_mut()[0] = 0;
        }
        self.len = 0;
    }

    /// Sets the capacity floor and immediately reallocates to the planned capacity for
    /// it.
    ///
    /// A floor smaller than the current content truncates the content to fit, and a
    /// floor of `0` releases the storage altogether. If the reallocation fails, both
    /// the floor and the content are left unchanged.
    pub fn reserve(&mut self, floor: usize) -> Result<()> {
        let target = capacity::plan(floor, floor);
        if target < floor {
            return Err(Error::allocation_failure(floor));
        }
        self.grow_to(target)?;
        self.floor = floor;
        Ok(())
    }

    /// Replaces the whole content with `text`.
    pub fn assign(&mut self, text: impl AsRef<[u8]>) -> Result<()> {
        let text = text.as_ref();
        self.ensure_capacity(text.len())?;
        let buf = self.storage.bytes_mut();
        storage::splice(buf, 0, 0, text);
        self.set_len(text.len());
        Ok(())
    }

    /// Appends `text` to the end of the content.
    pub fn append(&mut self, text: impl AsRef<[u8]>) -> Result<()> {
        let index = self.len;
        self.splice_at(index, text.as_ref())
    }

    /// Inserts `text` at byte offset `index`, which may equal `len()`.
    pub fn insert(&mut self, index: usize, text: impl AsRef<[u8]>) -> Result<()> {
        verify_arg!(index, index <= self.len);
        self.splice_at(index, text.as_ref())
    }

    /// Removes `count` bytes starting at `index`; a `count` of `0` removes everything
    /// from `index` to the end.
    ///
    /// The range must lie within the content. Afterwards the storage is shrunk to the
    /// planned capacity for the remaining content when possible.
    pub fn erase(&mut self, index: usize, count: usize) -> Result<()> {
        if self.capacity() == 0 {
            return Err(Error::missing_arg("storage"));
        }
        let count = resolve_range(self.len, index, count)?;

        let len = self.len;
        storage::close_gap(self.storage.bytes_mut(), len, index, count);
        self.set_len(len - count);
        self.shrink_best_effort();
        Ok(())
    }

    /// Replaces the content with `count` bytes of `source` starting at `index`; a
    /// `count` of `0` extracts everything from `index` to the end.
    ///
    /// The range must lie within `source`.
    pub fn substring_of(
        &mut self,
        source: impl AsRef<[u8]>,
        index: usize,
        count: usize,
    ) -> Result<()> {
        let source = source.as_ref();
        let count = resolve_range(source.len(), index, count)?;
        self.assign(&source[index..index + count])
    }

    /// Returns a new string holding `count` bytes of this one starting at `index`; a
    /// `count` of `0` extracts everything from `index` to the end.
    ///
    /// The new string is charged to no budget.
    pub fn substring(&self, index: usize, count: usize) -> Result<DString> {
        if self.capacity() == 0 {
            return Err(Error::missing_arg("source"));
        }
        let mut s = DString::new();
        s.substring_of(self, index, count)?;
        Ok(s)
    }

    /// Returns `true` when both strings hold the same bytes.
    pub fn equals(&self, other: impl AsRef<[u8]>) -> bool {
        self.as_bytes() == other.as_ref()
    }

    /// Compares the content with `other` lexicographically, byte by byte.
    pub fn compare(&self, other: impl AsRef<[u8]>) -> Ordering {
        self.as_bytes().cmp(other.as_ref())
    }
}

impl DString {
    fn init(&mut self, text: &[u8]) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.assign(text)
    }

    /// Opens a gap at `index` and copies `text` into it. `index` must already be
    /// validated.
    fn splice_at(&mut self, index: usize, text: &[u8]) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let required = self
            .len
            .checked_add(text.len())
            .ok_or_else(|| Error::allocation_failure(usize::MAX))?;
        self.ensure_capacity(required)?;

        let len = self.len;
        storage::splice(self.storage.bytes_mut(), len, index, text);
        self.set_len(required);
        Ok(())
    }

    /// Makes sure `content_len` bytes plus the terminator fit, growing to the planned
    /// capacity if they do not. Never shrinks.
    pub(crate) fn ensure_capacity(&mut self, content_len: usize) -> Result<()> {
        let required = content_len
            .checked_add(1)
            .ok_or_else(|| Error::allocation_failure(usize::MAX))?;
        if required <= self.capacity() {
            return Ok(());
        }
        let target = capacity::plan(required, self.floor);
        if target < required {
            return Err(Error::allocation_failure(required));
        }
        self.grow_to(target)
    }

    /// Reallocates the storage to exactly `target` bytes, truncating the content when
    /// it no longer fits. A target of `0` releases the storage.
    pub(crate) fn grow_to(&mut self, target: usize) -> Result<()> {
        self.storage.resize(target)?;
        if target == 0 {
            self.len = 0;
        } else {
            let len = self.len.min(target - 1);
            self.set_len(len);
        }
        Ok(())
    }

    /// Shrinks the storage to the planned capacity for the current content. Failure
    /// keeps the current storage and is not reported.
    pub(crate) fn shrink_best_effort(&mut self) {
        let target = capacity::plan(self.len + 1, self.floor);
        self.restore_capacity(target);
    }

    /// Reallocates to `target` if it differs from the current capacity and still holds
    /// the content. Failure keeps the current storage and is not reported.
    pub(crate) fn restore_capacity(&mut self, target: usize) {
        let capacity = self.capacity();
        if target == capacity || (target != 0 && target <= self.len) {
            return;
        }
        if target == 0 && self.len != 0 {
            return;
        }
        if let Err(e) = self.grow_to(target) {
            log::debug!("keeping {capacity} bytes of storage, resize to {target} failed: {e}");
        }
    }

    /// Sets the content length and writes the terminator after it.
    #[inline]
    pub(crate) fn set_len(&mut self, len: usize) {
        debug_assert!(len < self.capacity());
        self.storage.bytes_mut()[len] = 0;
        self.len = len;
    }

    #[inline]
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        self.storage.bytes_mut()
    }
}

/// Validates `index`/`count` against content of length `len` and returns the
/// effective count, mapping `0` to "up to the end".
fn resolve_range(len: usize, index: usize, count: usize) -> Result<usize> {
    verify_arg!(index, index < len);
    let end = index
        .checked_add(count)
        .ok_or_else(|| Error::invalid_arg("count", "index + count overflows"))?;
    verify_arg!(count, end <= len);
    Ok(if count == 0 { len - index } else { count })
}

impl Default for DString {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<[u8]> for DString {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl std::fmt::Debug for DString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DString")
            .field("text", &String::from_utf8_lossy(self.as_bytes()))
            .field("len", &self.len)
            .field("cap", &self.capacity())
            .field("floor", &self.floor)
            .finish()
    }
}

/// Writes the content as UTF-8, replacing invalid sequences with `U+FFFD`.
impl std::fmt::Display for DString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write;

        for chunk in self.as_bytes().utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_char(char::REPLACEMENT_CHARACTER)?;
            }
        }
        Ok(())
    }
}

impl PartialEq for DString {
    fn eq(&self, other: &DString) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for DString {}

impl PartialEq<str> for DString {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for DString {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<[u8]> for DString {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialOrd for DString {
    fn partial_cmp(&self, other: &DString) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DString {
    fn cmp(&self, other: &DString) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl std::hash::Hash for DString {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl TryFrom<&str> for DString {
    type Error = Error;

    fn try_from(text: &str) -> Result<DString> {
        DString::from_text(text)
    }
}

impl TryFrom<&[u8]> for DString {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<DString> {
        DString::from_text(bytes)
    }
}
