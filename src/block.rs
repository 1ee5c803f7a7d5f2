use std::mem;

/// Metadata record prefixed to every block in the arena.
///
/// The header sits immediately before the payload it describes, so a
/// payload pointer maps back to its header by a fixed offset in O(1) —
/// no side table. Blocks form a singly linked chain in ascending
/// address order that mirrors their physical layout: each block's
/// payload is immediately followed by its successor's header.
#[repr(C)]
pub struct Block {
  /// Usable payload size in bytes, excluding this header.
  pub size: usize,
  /// Allocation state. Flipped on release, never reset by the chain.
  pub is_free: bool,
  /// Next block in the chain, or null for the tail.
  pub next: *mut Block,
}

/// Bytes occupied by a header. A word multiple on every target, so
/// word-aligned block sizes keep successor headers word-aligned.
pub const HEADER_SIZE: usize = mem::size_of::<Block>();

/// Smallest residual payload worth carving off when splitting. A free
/// block below this would never satisfy a request once word-rounded.
pub const MIN_SPLIT: usize = 8;

impl Block {
  /// Returns the payload pointer for `block`: the byte immediately
  /// following its header.
  ///
  /// # Safety
  ///
  /// `block` must point to a live header inside the arena.
  pub unsafe fn payload(block: *mut Block) -> *mut u8 {
    unsafe { (block as *mut u8).add(HEADER_SIZE) }
  }

  /// Recovers the owning header from a payload pointer.
  ///
  /// # Safety
  ///
  /// `ptr` must be a payload pointer previously produced by
  /// [`Block::payload`] for a block that is still live.
  pub unsafe fn from_payload(ptr: *mut u8) -> *mut Block {
    unsafe { ptr.sub(HEADER_SIZE) as *mut Block }
  }
}
