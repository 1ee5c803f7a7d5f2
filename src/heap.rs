use std::ptr;

use libc::sbrk;
use log::{debug, trace};

use crate::{
  align::word_align,
  block::{Block, HEADER_SIZE, MIN_SPLIT},
  source::{HeapSource, Sbrk},
};

pub fn print_alloc(
  size: usize,
  addr: *mut u8,
) {
  println!(
    "Allocated {} bytes, address = {:?}, program break = {:?}",
    size,
    addr,
    unsafe { sbrk(0) }
  );
}

/// Strategy used to pick a free block for an allocation request.
///
/// One mode is active per allocator, chosen at construction. Mixing
/// strategies within one chain changes coalescing and fragmentation
/// behavior, so the mode is not a per-call parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
  /// First matching block scanning from the chain head. Cheap
  /// searches, fragmentation concentrates near the head over time.
  #[default]
  FirstFit,
  /// Smallest matching block over the whole chain, ties broken by
  /// lowest address. Full scan on every request, least fragmentation.
  BestFit,
  /// First matching block scanning from a cursor that advances past
  /// each successful allocation, wrapping at the chain end. Spreads
  /// search cost across the chain.
  NextFit,
}

/// Snapshot of the block chain, taken in one walk by
/// [`HeapAllocator::stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeapStats {
  /// Total blocks in the chain.
  pub blocks: usize,
  /// Blocks currently free.
  pub free_blocks: usize,
  /// Payload bytes held by allocated blocks.
  pub used_bytes: usize,
  /// Payload bytes held by free blocks.
  pub free_bytes: usize,
  /// Total bytes claimed from the heap source, headers included.
  /// Constant across release/reuse cycles; grows only on extension.
  pub arena_bytes: usize,
}

/// A free-list allocator over a single monotonically growing arena.
///
/// Blocks form a singly linked, address-ordered chain that mirrors
/// their physical layout. A request first searches the chain for a
/// free block under the configured [`SearchMode`]; a hit is claimed
/// and split if the leftover is worth keeping, a miss extends the
/// arena through the [`HeapSource`]. Releasing a block marks it free
/// and merges chain-adjacent free runs, so fragmentation is bounded
/// to non-adjacent gaps. Arena memory is never returned to the
/// operating system.
pub struct HeapAllocator<S: HeapSource = Sbrk> {
  first: *mut Block,
  last: *mut Block,
  cursor: *mut Block,
  mode: SearchMode,
  source: S,
}

impl HeapAllocator<Sbrk> {
  /// An sbrk-backed allocator using [`SearchMode::FirstFit`].
  pub fn new() -> Self {
    Self::with_mode(SearchMode::default())
  }

  /// An sbrk-backed allocator using the given search mode.
  pub fn with_mode(mode: SearchMode) -> Self {
    Self::from_source(Sbrk, mode)
  }
}

impl Default for HeapAllocator<Sbrk> {
  fn default() -> Self {
    Self::new()
  }
}

impl<S: HeapSource> HeapAllocator<S> {
  /// An allocator drawing arena memory from `source`.
  pub fn from_source(
    source: S,
    mode: SearchMode,
  ) -> Self {
    Self {
      first: ptr::null_mut(),
      last: ptr::null_mut(),
      cursor: ptr::null_mut(),
      mode,
      source,
    }
  }

  /// The search mode this allocator was built with.
  pub fn mode(&self) -> SearchMode {
    self.mode
  }

  /// The heap source this allocator draws from.
  pub fn source(&self) -> &S {
    &self.source
  }

  /// Allocates `size` usable bytes and returns the payload pointer,
  /// or null if the request is zero-sized or the arena cannot grow.
  ///
  /// The size is rounded up to a machine-word multiple, so the block
  /// may hold slightly more than requested. The payload is
  /// uninitialized; on reuse it still carries whatever the previous
  /// owner wrote.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> *mut u8 {
    if size == 0 {
      return ptr::null_mut();
    }

    let size = word_align(size);

    unsafe {
      let block = self.find_free_block(size);

      if !block.is_null() {
        (*block).is_free = false;
        self.split(block, size);

        let addr = Block::payload(block);
        trace!("allocate({size}) -> {addr:?} (reused)");
        return addr;
      }

      let block = self.extend(size);

      if block.is_null() {
        trace!("allocate({size}) -> out of memory");
        return ptr::null_mut();
      }

      let addr = Block::payload(block);
      trace!("allocate({size}) -> {addr:?} (extended)");
      addr
    }
  }

  /// Allocates `count * size` bytes and zero-fills them. Returns null
  /// if the product overflows, is zero, or the arena cannot grow.
  pub fn zero_allocate(
    &mut self,
    count: usize,
    size: usize,
  ) -> *mut u8 {
    let Some(total) = count.checked_mul(size) else {
      return ptr::null_mut();
    };

    let addr = self.allocate(total);

    if !addr.is_null() {
      unsafe {
        addr.write_bytes(0, total);
      }
    }

    addr
  }

  /// Resizes the allocation at `addr` to `size` usable bytes.
  ///
  /// A null `addr` behaves as [`allocate`](Self::allocate). If the
  /// owning block already holds the rounded size, the same pointer is
  /// returned with contents untouched and any leftover split off.
  /// Otherwise the contents move to a fresh block, the old block is
  /// released, and the new pointer is returned; if that fallback
  /// allocation fails, null is returned and the original block is
  /// left untouched.
  ///
  /// # Safety
  ///
  /// `addr` must be null or a live payload pointer obtained from this
  /// allocator.
  pub unsafe fn resize(
    &mut self,
    addr: *mut u8,
    size: usize,
  ) -> *mut u8 {
    if addr.is_null() {
      return self.allocate(size);
    }

    let size = word_align(size);

    unsafe {
      let block = Block::from_payload(addr);

      if (*block).size >= size {
        self.split(block, size);
        trace!("resize({addr:?}, {size}) -> in place");
        return addr;
      }

      let new_addr = self.allocate(size);

      if new_addr.is_null() {
        return ptr::null_mut();
      }

      ptr::copy_nonoverlapping(addr, new_addr, (*block).size);
      self.release(addr);

      trace!("resize({addr:?}, {size}) -> moved to {new_addr:?}");
      new_addr
    }
  }

  /// Releases the allocation at `addr`, making its block available
  /// for reuse and merging it with free neighbors. A null `addr` is a
  /// no-op. The memory is recycled, never returned to the operating
  /// system.
  ///
  /// # Safety
  ///
  /// `addr` must be null or a live payload pointer obtained from this
  /// allocator, and must not be released twice.
  pub unsafe fn release(
    &mut self,
    addr: *mut u8,
  ) {
    if addr.is_null() {
      return;
    }

    unsafe {
      let block = Block::from_payload(addr);
      (*block).is_free = true;

      trace!("release({addr:?}) ({} bytes)", (*block).size);
      self.coalesce();
    }
  }

  /// Walks the chain once and reports its current shape.
  pub fn stats(&self) -> HeapStats {
    let mut stats = HeapStats::default();
    let mut current = self.first;

    unsafe {
      while !current.is_null() {
        stats.blocks += 1;
        stats.arena_bytes += HEADER_SIZE + (*current).size;

        if (*current).is_free {
          stats.free_blocks += 1;
          stats.free_bytes += (*current).size;
        } else {
          stats.used_bytes += (*current).size;
        }

        current = (*current).next;
      }
    }

    stats
  }

  unsafe fn find_free_block(
    &mut self,
    size: usize,
  ) -> *mut Block {
    match self.mode {
      SearchMode::FirstFit => unsafe { self.find_first_fit(size) },
      SearchMode::BestFit => unsafe { self.find_best_fit(size) },
      SearchMode::NextFit => unsafe { self.find_next_fit(size) },
    }
  }

  unsafe fn find_first_fit(
    &self,
    size: usize,
  ) -> *mut Block {
    unsafe {
      let mut current = self.first;

      while !current.is_null() {
        if (*current).is_free && (*current).size >= size {
          return current;
        }
        current = (*current).next;
      }

      ptr::null_mut()
    }
  }

  unsafe fn find_best_fit(
    &self,
    size: usize,
  ) -> *mut Block {
    unsafe {
      let mut best: *mut Block = ptr::null_mut();
      let mut current = self.first;

      while !current.is_null() {
        if (*current).is_free
          && (*current).size >= size
          && (best.is_null() || (*current).size < (*best).size)
        {
          best = current;
        }
        current = (*current).next;
      }

      best
    }
  }

  // Scans from the cursor, wrapping through the chain exactly once.
  // On a match the cursor moves to the block after it; on a miss it
  // stays at the wrap point.
  unsafe fn find_next_fit(
    &mut self,
    size: usize,
  ) -> *mut Block {
    if self.first.is_null() {
      return ptr::null_mut();
    }

    unsafe {
      let start = if self.cursor.is_null() { self.first } else { self.cursor };
      let mut current = start;

      loop {
        if (*current).is_free && (*current).size >= size {
          self.cursor = (*current).next;
          return current;
        }

        current = if (*current).next.is_null() {
          self.first
        } else {
          (*current).next
        };

        if current == start {
          return ptr::null_mut();
        }
      }
    }
  }

  // Grows the arena by one block of `size` payload bytes and appends
  // it at the chain tail. No prior state is touched on failure.
  unsafe fn extend(
    &mut self,
    size: usize,
  ) -> *mut Block {
    let addr = self.source.grow(HEADER_SIZE + size);

    if addr.is_null() {
      return ptr::null_mut();
    }

    debug!("extending arena by {} bytes ({size} payload)", HEADER_SIZE + size);

    unsafe {
      let block = addr as *mut Block;
      (*block).size = size;
      (*block).is_free = false;
      (*block).next = ptr::null_mut();

      if self.first.is_null() {
        self.first = block;
      } else {
        (*self.last).next = block;
      }
      self.last = block;

      block
    }
  }

  // Carves a free residual off the tail of a just-claimed block when
  // the leftover can hold a header plus a usable payload. Otherwise
  // the block keeps its full size and the slack stays internal.
  unsafe fn split(
    &mut self,
    block: *mut Block,
    size: usize,
  ) {
    unsafe {
      if (*block).size < size + HEADER_SIZE + MIN_SPLIT {
        return;
      }

      let residual = Block::payload(block).add(size) as *mut Block;
      (*residual).size = (*block).size - size - HEADER_SIZE;
      (*residual).is_free = true;
      (*residual).next = (*block).next;

      (*block).size = size;
      (*block).next = residual;

      if block == self.last {
        self.last = residual;
      }
    }
  }

  // Full left-to-right sweep merging chain-adjacent free blocks. The
  // survivor is re-examined after each merge, so one pass reaches a
  // fixed point: no two adjacent blocks are left both free. The tail
  // pointer and the next-fit cursor are redirected when the block
  // they reference is absorbed.
  unsafe fn coalesce(&mut self) {
    unsafe {
      let mut current = self.first;

      while !current.is_null() && !(*current).next.is_null() {
        let next = (*current).next;

        if (*current).is_free && (*next).is_free {
          (*current).size += HEADER_SIZE + (*next).size;
          (*current).next = (*next).next;

          if next == self.last {
            self.last = current;
          }
          if next == self.cursor {
            self.cursor = current;
          }
        } else {
          current = next;
        }
      }
    }
  }
}
