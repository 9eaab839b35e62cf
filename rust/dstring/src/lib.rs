//! A growable, exclusively owned byte string that is always null-terminated.
//!
//! [`DString`] keeps its content followed by a `0` byte in a single allocation, so
//! the content can be handed to C-style consumers through [`DString::as_c_str`]
//! without copying. Capacity grows in multiples of [`capacity::ALIGNMENT`] and never
//! drops below a caller-set floor. Every mutation either succeeds or leaves the
//! string as it was, and allocation failures are reported as errors rather than
//! aborting the process.
//!
//! ```
//! use dstring::DString;
//!
//! let mut s = DString::new();
//! s.assign("Hello").unwrap();
//! s.append(" World!").unwrap();
//! assert_eq!(s, "Hello World!");
//! assert_eq!(s.len(), 12);
//! assert_eq!(s.capacity(), 16);
//! ```
//!
//! Storage can be charged to a [`Budget`] to cap the memory used by a group of
//! strings:
//!
//! ```
//! use dstring::{Budget, DString};
//!
//! let budget = Budget::new(16);
//! let mut s = DString::from_text_in("0123456789", &budget).unwrap();
//! assert!(s.append("abcdef").unwrap_err().is_allocation_failure());
//! assert_eq!(s, "0123456789");
//! ```

pub mod capacity;
pub mod search;

mod format;
mod replace;
mod storage;
mod string;

pub use dstring_budget::Budget;
pub use dstring_common::{Error, ErrorKind, Result};
pub use string::DString;
