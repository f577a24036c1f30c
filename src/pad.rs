/// The number of zero bytes needed after a field of `length` bytes to reach
/// the next 4-byte boundary.
///
/// Always in `0..=3`: a length that is already a multiple of 4 (including
/// `0`) needs no padding.
#[inline]
pub const fn pad_length(length: usize) -> usize {
    (4 - (length % 4)) % 4
}

/// `length` rounded up to a multiple of 4.
#[inline]
pub const fn padded_length(length: usize) -> usize {
    length + pad_length(length)
}
