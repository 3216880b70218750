//! Raw allocation primitives for element arrays.
//!
//! Thin checked wrappers around the global allocator. Every size precondition
//! is validated here, before the allocator is consulted, so the callers in
//! `buffer.rs` only ever hand valid layouts downward. Failure of the resize
//! primitive leaves the original region live and untouched, which is what
//! lets `Buffer::reallocate` offer its no-partial-mutation guarantee.

use std::alloc::{self, Layout};
use std::mem;
use std::ptr::NonNull;

use log::trace;

use crate::error::{BufferError, BufferResult};

/// Computes the layout for `count` elements of `T`, validating the size
/// preconditions shared by every allocating operation.
///
/// Rejects zero counts, zero-sized element types, and counts whose byte size
/// overflows the address space.
pub(crate) fn array_layout<T>(count: usize) -> BufferResult<Layout> {
    if mem::size_of::<T>() == 0 {
        return Err(BufferError::InvalidArgument(
            "zero-sized element types are not supported",
        ));
    }
    if count == 0 {
        return Err(BufferError::InvalidArgument("cannot allocate zero elements"));
    }
    Layout::array::<T>(count)
        .map_err(|_| BufferError::InvalidArgument("allocation size overflows the address space"))
}

/// Reconstructs the layout of a live region of `count` elements.
///
/// # Safety
///
/// `count` must be a count that previously passed [`array_layout`] for the
/// same `T`.
pub(crate) unsafe fn live_layout<T>(count: usize) -> Layout {
    debug_assert!(count > 0 && mem::size_of::<T>() > 0);
    // SAFETY: the size and alignment were validated when the region was
    // allocated, per this function's contract.
    unsafe {
        Layout::from_size_align_unchecked(mem::size_of::<T>() * count, mem::align_of::<T>())
    }
}

/// Acquires fresh storage for `count` elements of `T`.
///
/// The contents of the returned region are uninitialized.
pub(crate) fn allocate<T>(count: usize) -> BufferResult<NonNull<T>> {
    let layout = array_layout::<T>(count)?;
    // SAFETY: `array_layout` only produces layouts with a non-zero size.
    let ptr = unsafe { alloc::alloc(layout) };
    let region = NonNull::new(ptr.cast::<T>())
        .ok_or(BufferError::AllocationFailure { bytes: layout.size() })?;
    trace!("allocated {count} elements ({} bytes) at {region:p}", layout.size());
    Ok(region)
}

/// Acquires zero-initialized storage for `count` elements of `T`.
pub(crate) fn allocate_zeroed<T>(count: usize) -> BufferResult<NonNull<T>> {
    let layout = array_layout::<T>(count)?;
    // SAFETY: `array_layout` only produces layouts with a non-zero size.
    let ptr = unsafe { alloc::alloc_zeroed(layout) };
    let region = NonNull::new(ptr.cast::<T>())
        .ok_or(BufferError::AllocationFailure { bytes: layout.size() })?;
    trace!(
        "allocated {count} zeroed elements ({} bytes) at {region:p}",
        layout.size()
    );
    Ok(region)
}

/// Resizes a live region in place or by moving it, preserving the contents of
/// the overlapping prefix.
///
/// On failure the original region is still live and unchanged, and remains
/// owned by the caller.
///
/// # Safety
///
/// `region` must have been returned by one of this module's acquisition
/// functions with an element count of exactly `old_count`, and must not have
/// been released since.
pub(crate) unsafe fn grow_or_shrink<T>(
    region: NonNull<T>,
    old_count: usize,
    new_count: usize,
) -> BufferResult<NonNull<T>> {
    let new_layout = array_layout::<T>(new_count)?;
    // SAFETY: per this function's contract, `old_count` is the count the
    // region was allocated with.
    let old_layout = unsafe { live_layout::<T>(old_count) };
    // SAFETY: `region` is live and was allocated with `old_layout`; the new
    // size is non-zero.
    let ptr = unsafe { alloc::realloc(region.as_ptr().cast::<u8>(), old_layout, new_layout.size()) };
    let resized = NonNull::new(ptr.cast::<T>())
        .ok_or(BufferError::AllocationFailure { bytes: new_layout.size() })?;
    trace!(
        "resized region {region:p} from {old_count} to {new_count} elements at {resized:p}"
    );
    Ok(resized)
}

/// Releases a live region of `count` elements.
///
/// # Safety
///
/// `region` must have been returned by one of this module's acquisition
/// functions with an element count of exactly `count`, must not have been
/// released since, and must not be used afterwards.
pub(crate) unsafe fn release<T>(region: NonNull<T>, count: usize) {
    trace!("releasing {count} elements at {region:p}");
    // SAFETY: per this function's contract, the region is live and `count`
    // matches its allocation.
    unsafe {
        alloc::dealloc(region.as_ptr().cast::<u8>(), live_layout::<T>(count));
    }
}
