//! # rmalloc - A Free-List Memory Allocator Library
//!
//! This crate provides a **free-list allocator** in Rust offering the four
//! core entry points of a general-purpose allocator — allocate,
//! zero-allocate, resize, release — over a single arena grown with the
//! `sbrk` system call.
//!
//! ## Overview
//!
//! Every allocation is tagged with an inline metadata header, and the
//! headers form a singly linked chain mirroring the physical layout of
//! the arena:
//!
//! ```text
//!   Free-List Allocator Concept:
//!
//!   ┌────────────────────────────────────────────────────────────────────┐
//!   │                          HEAP MEMORY                               │
//!   │                                                                    │
//!   │   ┌───┬──────┬───┬──────┬───┬──────┬───┬──────┐                    │
//!   │   │ H │ used │ H │ FREE │ H │ used │ H │ FREE │   ← block chain    │
//!   │   └─┬─┴──────┴─▲─┴──────┴─▲─┴──────┴─▲─┴──────┘                ▲   │
//!   │     │          │          │          │                        │   │
//!   │     └── next ──┴── next ──┴── next ──┘                   Program   │
//!   │                                                           Break    │
//!   └────────────────────────────────────────────────────────────────────┘
//!
//!   A request reuses the first suitable FREE block (splitting off any
//!   leftover) and only extends the arena when nothing fits. Releasing
//!   a block merges it with free neighbors.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   rmalloc
//!   ├── align      - Word rounding for request sizes (internal)
//!   ├── block      - Block metadata structure (internal)
//!   ├── source     - HeapSource trait, Sbrk and MappedArena sources
//!   └── heap       - HeapAllocator implementation
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rmalloc::{HeapAllocator, SearchMode};
//!
//! fn main() {
//!     let mut allocator = HeapAllocator::with_mode(SearchMode::BestFit);
//!
//!     unsafe {
//!         // Allocate 100 bytes and use them.
//!         let ptr = allocator.allocate(100);
//!         ptr.write_bytes(0x2A, 100);
//!
//!         // Grow the allocation; the low 100 bytes are preserved.
//!         let ptr = allocator.resize(ptr, 200);
//!
//!         // Release the memory back to the free list.
//!         allocator.release(ptr);
//!     }
//! }
//! ```
//!
//! ## How It Works
//!
//! Each block carries a header immediately before its payload:
//!
//! ```text
//!   Single Block:
//!   ┌───────────────────────┬────────────────────────────────┐
//!   │    Block Header       │         User Data              │
//!   │  ┌─────────────────┐  │                                │
//!   │  │ size: N         │  │  ┌──────────────────────────┐  │
//!   │  │ is_free: false  │  │  │                          │  │
//!   │  │ next: null/ptr  │  │  │     N bytes usable       │  │
//!   │  └─────────────────┘  │  └──────────────────────────┘  │
//!   └───────────────────────┴────────────────────────────────┘
//!                           ▲
//!                           └── Pointer returned to user
//! ```
//!
//! The header is recovered from a payload pointer by a fixed offset, so
//! release and resize need no side table. Free blocks are found by one
//! of three interchangeable strategies ([`SearchMode`]): first-fit,
//! best-fit, or next-fit, fixed per allocator at construction time.
//!
//! Arena memory comes from a [`HeapSource`]: [`Sbrk`] extends the
//! program's data segment in production, while [`MappedArena`] serves a
//! fixed-capacity private mapping, which keeps tests deterministic and
//! lets several independent arenas coexist.
//!
//! ## Features
//!
//! - **Block reuse**: released blocks are recycled before the arena grows
//! - **Splitting**: oversized free blocks shed their tail as a new free block
//! - **Coalescing**: adjacent free blocks merge on every release
//! - **Pluggable strategy**: first-fit, best-fit, or next-fit per allocator
//! - **Pluggable arena**: `sbrk` or a fixed mmap-backed region
//!
//! ## Limitations
//!
//! - **Single-threaded only**: no synchronization primitives
//! - **Monotonic arena**: memory is recycled, never returned to the OS
//! - **Word alignment only**: sizes are rounded to machine-word multiples,
//!   no stronger alignment is guaranteed
//! - **Unix-only**: requires `libc` (`sbrk`, `mmap`)
//!
//! ## Safety
//!
//! This crate is inherently unsafe as it deals with raw memory
//! management. Pointers passed to `resize` and `release` must originate
//! from the same allocator and must not be released twice; the header
//! recovery scheme cannot validate authenticity at runtime.

mod align;
mod block;
mod heap;
mod source;

pub use heap::{HeapAllocator, HeapStats, SearchMode, print_alloc};
pub use source::{HeapSource, MappedArena, Sbrk};
