//! Uniform buffer offset alignment

/// Round `size` up to the next multiple of `min_alignment`
///
/// A zero alignment means the device imposes none and `size` is returned
/// unchanged. Devices report power-of-two alignments, where this equals
/// `(size + a - 1) & !(a - 1)`, but any positive alignment is accepted.
pub fn aligned_size(size: u64, min_alignment: u64) -> u64 {
    if min_alignment == 0 {
        size
    } else {
        size.div_ceil(min_alignment) * min_alignment
    }
}
