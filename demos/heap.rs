use std::ptr;

use libc::sbrk;
use rmalloc::{HeapAllocator, SearchMode, print_alloc};

/// Prints the current program break using `sbrk(0)`.
/// The program break is the upper boundary of the heap managed via brk/sbrk,
/// so watching it shows when the allocator actually grows the arena versus
/// recycling freed blocks.
fn print_program_break(label: &str) {
  println!(
    "[{}] PID = {}, program break (sbrk(0)) = {:?}",
    label,
    std::process::id(),
    unsafe { sbrk(0) },
  );
}

fn main() {
  env_logger::init();

  // First-fit is the default; try SearchMode::BestFit or
  // SearchMode::NextFit to watch the same workload land differently.
  let mut allocator = HeapAllocator::with_mode(SearchMode::FirstFit);

  unsafe {
    print_program_break("start");

    // --------------------------------------------------------------------
    // 1) Allocate a 100-byte string buffer.
    // --------------------------------------------------------------------
    let message = b"Hello, custom allocator!";
    let first = allocator.allocate(100);
    println!("\n[1] Allocate 100-byte string buffer");
    print_alloc(100, first);

    ptr::copy_nonoverlapping(message.as_ptr(), first, message.len());
    println!(
      "[1] Wrote: {}",
      std::str::from_utf8(std::slice::from_raw_parts(first, message.len())).unwrap()
    );

    // --------------------------------------------------------------------
    // 2) Zero-allocate an array of 10 ints.
    // --------------------------------------------------------------------
    let second = allocator.zero_allocate(10, size_of::<u32>());
    println!("\n[2] Zero-allocate [u32; 10]");
    print_alloc(10 * size_of::<u32>(), second);
    println!("[2] First element = {}", (second as *mut u32).read());

    // --------------------------------------------------------------------
    // 3) Grow the string buffer to 200 bytes.
    //    The block is too small to grow in place, so the payload moves
    //    and the old block goes back on the free list.
    // --------------------------------------------------------------------
    let first = allocator.resize(first, 200);
    println!("\n[3] Resize string buffer to 200 bytes");
    print_alloc(200, first);
    println!(
      "[3] Content survived the move: {}",
      std::str::from_utf8(std::slice::from_raw_parts(first, message.len())).unwrap()
    );

    // --------------------------------------------------------------------
    // 4) Release both pointers and inspect the chain.
    //    Adjacent free blocks merge, so the arena collapses back into a
    //    single free block.
    // --------------------------------------------------------------------
    allocator.release(second);
    allocator.release(first);
    let stats = allocator.stats();
    println!("\n[4] Released both pointers");
    println!(
      "[4] Chain: {} block(s), {} free, {} free bytes",
      stats.blocks, stats.free_blocks, stats.free_bytes
    );

    // --------------------------------------------------------------------
    // 5) Allocate the combined freed size.
    //    Everything is recycled: the program break does not move.
    // --------------------------------------------------------------------
    print_program_break("before recycling alloc");
    let third = allocator.allocate(stats.free_bytes);
    println!("\n[5] Allocate {} bytes from the free list", stats.free_bytes);
    print_alloc(stats.free_bytes, third);
    print_program_break("after recycling alloc");

    allocator.release(third);

    // --------------------------------------------------------------------
    // 6) End of demo. The arena stays with the process; the OS reclaims
    //    it on exit.
    // --------------------------------------------------------------------
    println!("\n[6] End of example.");
  }
}
