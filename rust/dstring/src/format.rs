//! Formatted writes into a [`DString`].
//!
//! Each write runs in two passes: the arguments are first formatted into a
//! counting sink to measure the exact output size, then storage is grown once and
//! the arguments are formatted again. Appends and inserts write directly into a gap
//! opened in place; an assign writes into scratch space and replaces the content
//! only once the write succeeds. If the second pass fails or produces a different
//! number of bytes, the string is left as it was.

use std::fmt;

use dstring_common::{Error, Result, verify_arg};

use crate::{DString, storage};

impl DString {
    /// Replaces the whole content with the formatted `args`.
    ///
    /// Fails with `InvalidArgument` when formatting fails or produces no output, and
    /// with `AllocationFailure` when storage cannot be grown or the write pass does
    /// not reproduce the measured output. On failure the string is unchanged.
    ///
    /// ```
    /// use dstring::DString;
    ///
    /// let mut s = DString::from_text("old").unwrap();
    /// s.assign_fmt(format_args!("{}-{:03}", "id", 7)).unwrap();
    /// assert_eq!(s, "id-007");
    /// ```
    pub fn assign_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        let measured = measure_nonempty(args)?;

        // The old content must survive a failed write pass, so the text is formatted
        // into scratch space first and only assigned once it matches the measurement.
        let mut scratch = Vec::new();
        scratch.try_reserve_exact(measured)?;
        scratch.resize(measured, 0);
        if write_into(&mut scratch, args) != Some(measured) {
            return Err(rolled_back(measured));
        }
        self.assign(&scratch)
    }

    /// Appends the formatted `args` to the end of the content.
    ///
    /// Failure modes are those of [`DString::assign_fmt`].
    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        let measured = measure_nonempty(args)?;
        self.write_measured(self.len(), args, measured)
    }

    /// Inserts the formatted `args` at byte offset `index`, which may equal `len()`.
    pub fn insert_fmt(&mut self, index: usize, args: fmt::Arguments<'_>) -> Result<()> {
        verify_arg!(index, index <= self.len());
        let measured = measure_nonempty(args)?;
        self.write_measured(index, args, measured)
    }

    /// Opens a gap of `measured` bytes at `index` and formats `args` into it.
    fn write_measured(
        &mut self,
        index: usize,
        args: fmt::Arguments<'_>,
        measured: usize,
    ) -> Result<()> {
        let len = self.len();
        let old_capacity = self.capacity();
        let required = checked_len(len, measured)?;
        self.ensure_capacity(required)?;

        let buf = self.bytes_mut();
        storage::open_gap(buf, len, index, measured);
        let written = write_into(&mut buf[index..index + measured], args);
        if written != Some(measured) {
            storage::close_gap(buf, required, index, measured);
            self.set_len(len);
            self.restore_capacity(old_capacity);
            return Err(rolled_back(measured));
        }
        self.set_len(required);
        Ok(())
    }
}

/// Appends through the formatting machinery, so `write!(s, ...)` works on a
/// `DString`. Each `write!` call is applied as a whole or not at all.
impl fmt::Write for DString {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s).map_err(|_| fmt::Error)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        let measured = measure(args).map_err(|_| fmt::Error)?;
        if measured == 0 {
            return Ok(());
        }
        self.write_measured(self.len(), args, measured)
            .map_err(|_| fmt::Error)
    }
}

/// Counts the bytes that formatting `args` produces.
struct Measure(usize);

impl fmt::Write for Measure {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 = self.0.checked_add(s.len()).ok_or(fmt::Error)?;
        Ok(())
    }
}

/// Formats into a fixed slice, failing once the slice is full.
struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.pos.checked_add(s.len()).ok_or(fmt::Error)?;
        let dst = self.buf.get_mut(self.pos..end).ok_or(fmt::Error)?;
        dst.copy_from_slice(s.as_bytes());
        self.pos = end;
        Ok(())
    }
}

fn measure(args: fmt::Arguments<'_>) -> Result<usize> {
    if let Some(s) = args.as_str() {
        return Ok(s.len());
    }
    let mut sink = Measure(0);
    fmt::write(&mut sink, args).map_err(|_| Error::invalid_arg("args", "formatting failed"))?;
    Ok(sink.0)
}

fn measure_nonempty(args: fmt::Arguments<'_>) -> Result<usize> {
    let measured = measure(args)?;
    if measured == 0 {
        return Err(Error::invalid_arg("args", "formatted output is empty"));
    }
    Ok(measured)
}

/// Formats `args` into `buf`, returning the number of bytes written, or `None` if
/// formatting failed or overflowed `buf`.
fn write_into(buf: &mut [u8], args: fmt::Arguments<'_>) -> Option<usize> {
    let mut writer = SliceWriter { buf, pos: 0 };
    fmt::write(&mut writer, args).ok()?;
    Some(writer.pos)
}

fn checked_len(len: usize, additional: usize) -> Result<usize> {
    len.checked_add(additional)
        .ok_or_else(|| Error::allocation_failure(usize::MAX))
}

fn rolled_back(measured: usize) -> Error {
    log::debug!("formatted write of {measured} bytes did not match its measurement, rolled back");
    Error::allocation_failure(measured)
}
