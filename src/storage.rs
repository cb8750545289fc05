use arrayvec::{ArrayString, CapacityError};
use unicode_segmentation::UnicodeSegmentation;
use zeroize::Zeroize;

/// Fixed-capacity string storage for secret values.
///
/// The backing buffer never reallocates, so no stray copies of the secret are
/// left behind when the content grows, and `zeroize` can scrub the whole
/// buffer (not just the initialized prefix).
pub(crate) struct ZeroizedArrayString<const N: usize>(pub ArrayString<N>);

impl<const N: usize> Zeroize for ZeroizedArrayString<N> {
    fn zeroize(&mut self) {
        unsafe {
            self.0.set_len(N);
            self.0.as_bytes_mut()
        }
        .zeroize()
    }
}

impl<const N: usize> ZeroizedArrayString<N> {
    pub const fn new() -> Self {
        Self(ArrayString::new_const())
    }

    /// Insert a character at byte position `i`, shifting the tail in place.
    ///
    /// Errors if the character does not fit in the remaining capacity. Panics
    /// if `i` is past the end or not on a character boundary.
    pub fn try_insert(&mut self, i: usize, c: char) -> Result<(), CapacityError<char>> {
        let c_len = c.len_utf8();
        if self.0.remaining_capacity() < c_len {
            return Err(CapacityError::new(c));
        }

        if i > self.0.len() {
            panic!("Tried to insert character beyond the end of the string");
        }

        if !self.0.is_char_boundary(i) {
            panic!("Tried to insert character in a position that is not a char boundary");
        }

        unsafe {
            // Safety: length expansion is safe as the capacity check is done
            // above. This leaves some uninitialized elements in the underlying
            // buffer, but we immediately initialize them using copy_within
            // (copying the tail of the buffer forward to make space for the new character)
            let prev_len = self.0.len();
            self.0.set_len(prev_len + c_len);

            let buf = self.0.as_bytes_mut();
            // Move each byte in the tail forward so that there's space for c
            buf.copy_within(i..prev_len, i + c_len);

            // Write the new character in the created space
            c.encode_utf8(&mut buf[i..i + c_len]);
        }

        Ok(())
    }

    /// Remove the whole grapheme cluster starting at byte position `i`.
    /// Returns the number of bytes removed (0 if `i` is at the end).
    pub fn remove_grapheme(&mut self, i: usize) -> usize {
        let len = match self.0[i..].graphemes(true).next() {
            Some(g) => g.len(),
            None => return 0,
        };
        let chars = self.0[i..i + len].chars().count();
        for _ in 0..chars {
            self.0.remove(i);
        }
        len
    }
}

impl<const N: usize> Default for ZeroizedArrayString<N> {
    fn default() -> Self {
        Self::new()
    }
}
