use std::mem;

/// Rounds `size` up to the next machine-word multiple.
///
/// Every size entering the allocator passes through here, so block
/// headers always land on word boundaries: the header itself is a word
/// multiple, and physically adjacent blocks therefore start aligned.
pub(crate) fn word_align(size: usize) -> usize {
  (size + mem::size_of::<usize>() - 1) & !(mem::size_of::<usize>() - 1)
}
