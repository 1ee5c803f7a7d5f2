use std::ptr;

use libc::{MAP_ANONYMOUS, MAP_FAILED, MAP_PRIVATE, PROT_READ, PROT_WRITE, c_void, intptr_t, sbrk};

/// A one-way heap-growth primitive: the allocator's only collaborator.
///
/// `grow` models the program-break extension call. Given a request for
/// `increment` additional bytes contiguous with the current arena end,
/// it either returns the previous arena end as the newly usable
/// address or reports failure with a null pointer. The arena never
/// shrinks; released blocks are recycled by the allocator, not handed
/// back here.
///
/// # Safety
///
/// Implementors must return either null or a pointer to `increment`
/// writable bytes that stay valid for the lifetime of the source, with
/// successive successful grows returning physically contiguous
/// regions. The allocator stores block headers in this memory and
/// merges chain neighbors on the assumption of contiguity.
pub unsafe trait HeapSource {
  /// Extends the arena by `increment` bytes. Returns the previous
  /// arena end, or null if the arena cannot grow.
  fn grow(&mut self, increment: usize) -> *mut u8;
}

/// The production source: extends the program's data segment with
/// `sbrk(2)`.
///
/// The program break is process-wide state, so at most one
/// `Sbrk`-backed allocator should be live per process, and only on one
/// thread.
pub struct Sbrk;

unsafe impl HeapSource for Sbrk {
  fn grow(&mut self, increment: usize) -> *mut u8 {
    let previous = unsafe { sbrk(increment as intptr_t) };

    if previous == usize::MAX as *mut c_void {
      return ptr::null_mut();
    }

    previous as *mut u8
  }
}

/// A fixed-capacity arena backed by one private anonymous mapping.
///
/// Growth bumps an offset inside the mapping and fails once capacity
/// is exhausted, which makes out-of-memory paths testable and lets
/// several independent arenas coexist in one process. The whole
/// mapping is unmapped on drop, so payload pointers must not outlive
/// the owning allocator.
pub struct MappedArena {
  base: *mut u8,
  capacity: usize,
  used: usize,
}

impl MappedArena {
  /// Maps a new arena of `capacity` bytes. Returns `None` if the
  /// mapping cannot be created.
  pub fn new(capacity: usize) -> Option<Self> {
    let base = unsafe {
      libc::mmap(
        ptr::null_mut(),
        capacity,
        PROT_READ | PROT_WRITE,
        MAP_PRIVATE | MAP_ANONYMOUS,
        -1,
        0,
      )
    };

    if base == MAP_FAILED {
      return None;
    }

    Some(Self {
      base: base as *mut u8,
      capacity,
      used: 0,
    })
  }

  /// Bytes claimed from the arena so far.
  pub fn used(&self) -> usize {
    self.used
  }

  /// Total bytes the arena can hand out.
  pub fn capacity(&self) -> usize {
    self.capacity
  }
}

unsafe impl HeapSource for MappedArena {
  fn grow(&mut self, increment: usize) -> *mut u8 {
    if increment > self.capacity - self.used {
      return ptr::null_mut();
    }

    let previous = unsafe { self.base.add(self.used) };
    self.used += increment;

    previous
  }
}

impl Drop for MappedArena {
  fn drop(&mut self) {
    unsafe {
      libc::munmap(self.base as *mut c_void, self.capacity);
    }
  }
}
