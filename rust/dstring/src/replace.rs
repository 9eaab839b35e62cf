use dstring_common::{Error, Result, verify_arg};

use crate::{DString, search};

impl DString {
    /// Replaces up to `n` non-overlapping occurrences of `old` with `new`, or every
    /// occurrence when `n == 0`, and returns how many were replaced.
    ///
    /// Occurrences are located scanning from the front, or from the back when
    /// `backward` is set; the two can differ when occurrences of `old` overlap or when
    /// `n` limits the replacement. `old` must be non-empty and no longer than the
    /// content. On failure the string is unchanged.
    ///
    /// ```
    /// use dstring::DString;
    ///
    /// let mut s = DString::from_text("a-b-c-d").unwrap();
    /// assert_eq!(s.replace("-", "+", 2, true).unwrap(), 2);
    /// assert_eq!(s, "a-b+c+d");
    /// ```
    pub fn replace(
        &mut self,
        old: impl AsRef<[u8]>,
        new: impl AsRef<[u8]>,
        n: usize,
        backward: bool,
    ) -> Result<usize> {
        let (old, new) = (old.as_ref(), new.as_ref());
        verify_arg!(old, !old.is_empty());
        verify_arg!(old, old.len() <= self.len());

        let positions = self.locate(old, n, backward)?;
        if positions.is_empty() {
            return Ok(0);
        }

        let len = self.len();
        let replaced = positions.len();
        // Matches never overlap, so they cover at most `len` bytes.
        let kept = len - replaced * old.len();
        let new_len = replaced
            .checked_mul(new.len())
            .and_then(|added| added.checked_add(kept))
            .ok_or_else(|| Error::allocation_failure(usize::MAX))?;

        if new.len() > old.len() {
            self.ensure_capacity(new_len)?;
            expand(self.bytes_mut(), len, new_len, &positions, old.len(), new);
            self.set_len(new_len);
        } else {
            contract(self.bytes_mut(), len, &positions, old.len(), new);
            self.set_len(new_len);
            self.shrink_best_effort();
        }
        Ok(replaced)
    }

    /// Collects the offsets of the occurrences to replace, in increasing order.
    fn locate(&self, old: &[u8], n: usize, backward: bool) -> Result<Vec<usize>> {
        let limit = if n == 0 { usize::MAX } else { n };
        let bytes = self.as_bytes();

        let found = if backward {
            search::rmatches(bytes, old).take(limit).count()
        } else {
            search::matches(bytes, old).take(limit).count()
        };
        let mut positions = Vec::new();
        positions.try_reserve_exact(found)?;
        if backward {
            positions.extend(search::rmatches(bytes, old).take(found));
            positions.reverse();
        } else {
            positions.extend(search::matches(bytes, old).take(found));
        }
        Ok(positions)
    }
}

/// Rebuilds `buf[..len]` into `buf[..new_len]` when the replacement is longer than
/// the pattern. Works right to left so every destination lies at or after the source
/// bytes still to be read.
fn expand(
    buf: &mut [u8],
    len: usize,
    new_len: usize,
    positions: &[usize],
    old_len: usize,
    new: &[u8],
) {
    let mut src_end = len;
    let mut dst_end = new_len;
    for &pos in positions.iter().rev() {
        let tail = pos + old_len..src_end;
        let tail_len = tail.len();
        buf.copy_within(tail, dst_end - tail_len);
        dst_end -= tail_len;
        buf[dst_end - new.len()..dst_end].copy_from_slice(new);
        dst_end -= new.len();
        src_end = pos;
    }
    debug_assert_eq!(src_end, dst_end);
}

/// Rebuilds `buf[..len]` in place when the replacement is not longer than the
/// pattern. Works left to right so every destination lies at or before the source
/// bytes still to be read.
fn contract(buf: &mut [u8], len: usize, positions: &[usize], old_len: usize, new: &[u8]) {
    let mut src = 0;
    let mut dst = 0;
    for &pos in positions {
        buf.copy_within(src..pos, dst);
        dst += pos - src;
        buf[dst..dst + new.len()].copy_from_slice(new);
        dst += new.len();
        src = pos + old_len;
    }
    buf.copy_within(src..len, dst);
}
