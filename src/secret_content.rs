use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use unicode_segmentation::UnicodeSegmentation;
use zeroize::Zeroizing;

use crate::storage::ZeroizedArrayString;

/// Maximum secret length in bytes.
pub(crate) const CAPACITY: usize = 256;

/// Shared handle to a secret string.
///
/// This is the binding between a [`TogglableSecretField`] and its caller: the
/// caller keeps one clone, the view another, and both observe the same cell.
/// The view never caches a private copy of the value.
///
/// The cell is backed by fixed-capacity storage that is zeroized when the last
/// handle is dropped. Writes that would exceed the capacity leave the content
/// unchanged and report failure.
///
/// Not `Send`: all access is expected to happen on the cursive event loop
/// thread.
///
/// [`TogglableSecretField`]: crate::TogglableSecretField
#[derive(Clone, Default)]
pub struct SecretContent {
    inner: Rc<RefCell<Zeroizing<ZeroizedArrayString<CAPACITY>>>>,
}

impl SecretContent {
    /// Creates a new, empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire content with `s`.
    ///
    /// Returns `false` (and leaves the content untouched) if `s` does not fit.
    pub fn set(&self, s: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        if s.len() > CAPACITY {
            log::debug!("rejected {}-byte secret, capacity is {}", s.len(), CAPACITY);
            return false;
        }
        inner.0.clear();
        inner.0.push_str(s);
        true
    }

    /// Empties the cell.
    pub fn clear(&self) {
        self.inner.borrow_mut().0.clear();
    }

    /// Runs `f` with the current content.
    pub fn with_str<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        f(&self.inner.borrow().0)
    }

    /// Returns an owned, zeroize-on-drop copy of the content.
    pub fn value(&self) -> Zeroizing<String> {
        Zeroizing::new(self.inner.borrow().0.to_string())
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.inner.borrow().0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().0.is_empty()
    }

    /// Insert `ch` at byte position `at`. Returns `false` if the cell is full.
    pub(crate) fn insert(&self, at: usize, ch: char) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.try_insert(at, ch) {
            Ok(()) => true,
            Err(_) => {
                log::debug!("secret cell full, dropping input character");
                false
            }
        }
    }

    /// Remove the grapheme cluster starting at byte position `at`.
    /// Returns the number of bytes removed.
    pub(crate) fn remove_grapheme(&self, at: usize) -> usize {
        self.inner.borrow_mut().remove_grapheme(at)
    }

    /// Byte length of the grapheme cluster ending at byte position `at`.
    pub(crate) fn grapheme_before(&self, at: usize) -> Option<usize> {
        let inner = self.inner.borrow();
        inner.0[..at].graphemes(true).last().map(str::len)
    }

    /// Byte length of the grapheme cluster starting at byte position `at`.
    pub(crate) fn grapheme_at(&self, at: usize) -> Option<usize> {
        let inner = self.inner.borrow();
        inner.0[at..].graphemes(true).next().map(str::len)
    }

    pub(crate) fn is_char_boundary(&self, at: usize) -> bool {
        self.inner.borrow().0.is_char_boundary(at)
    }
}

impl fmt::Debug for SecretContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretContent(***redacted***)")
    }
}
