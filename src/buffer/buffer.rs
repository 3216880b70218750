//! Buffer: a single-owner handle for one contiguous heap region.
//!
//! The handle has exactly two states: empty (no storage, count zero) and
//! owning (a live region of `count > 0` elements). Every operation below
//! preserves that two-state model, and every transfer operation empties the
//! donor before the recipient reports ownership, so a given region is owned
//! by at most one handle at any instant.
//!
//! Elements are plain data (`T: Copy`): dropping the handle releases the
//! region without running element destructors, and freshly allocated storage
//! is uninitialized unless acquired through a zeroed operation.

use std::alloc::handle_alloc_error;
use std::fmt;
use std::mem;
use std::ops::Range;
use std::ptr::{self, NonNull};

use super::raw;
use crate::error::{BufferError, BufferResult};

/// An owned contiguous buffer of `count` elements of `T`.
///
/// The buffer manages exactly one dynamically sized heap region. It is
/// created empty or sized on construction, mutated in place by reallocation,
/// resize, fill, and copy-in operations, and releases its region when
/// dropped, deallocated, or emptied through a transfer.
///
/// # Ownership
///
/// Single-holder and transferable, never shared: [`swap`](Self::swap),
/// [`take_from`](Self::take_from), and assignment move whole regions between
/// handles, and the donor is always left empty. The handle provides no
/// internal synchronization; concurrent mutation of one handle from multiple
/// threads requires external locking by the caller.
///
/// # Initialization
///
/// [`allocate`](Self::allocate) and [`reallocate`](Self::reallocate) yield
/// uninitialized storage. Reading an element that was never written returns
/// unspecified garbage; callers that need a known starting state use
/// [`zeroed`](Self::zeroed), [`allocate_zeroed`](Self::allocate_zeroed), or
/// [`fill`](Self::fill) first.
pub struct Buffer<T: Copy> {
    /// Start of the owned region; dangling while the buffer is empty.
    ptr: NonNull<T>,
    /// Number of elements addressed; zero while the buffer is empty.
    len: usize,
}

impl<T: Copy> Buffer<T> {
    /// Create an empty buffer that owns no storage.
    #[inline]
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
        }
    }

    /// Create a buffer sized for `count` elements of uninitialized storage.
    pub fn with_count(count: usize) -> BufferResult<Self> {
        let mut buffer = Self::new();
        buffer.allocate(count)?;
        Ok(buffer)
    }

    /// Create a buffer of `count` zero-initialized elements.
    pub fn zeroed(count: usize) -> BufferResult<Self> {
        let mut buffer = Self::new();
        buffer.allocate_zeroed(count, mem::size_of::<T>())?;
        Ok(buffer)
    }

    /// Get the number of elements the buffer currently addresses.
    #[inline]
    pub const fn count(&self) -> usize {
        self.len
    }

    /// Check whether the handle currently owns live storage.
    #[inline]
    pub const fn is_allocated(&self) -> bool {
        self.len != 0
    }

    /// Check whether the buffer is empty (owns no storage).
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Acquire storage for `count` elements.
    ///
    /// On a buffer that already owns storage this is a resize: the
    /// overlapping prefix is preserved, exactly as
    /// [`reallocate`](Self::reallocate). On an empty buffer the acquired
    /// storage is uninitialized.
    pub fn allocate(&mut self, count: usize) -> BufferResult<()> {
        if self.is_allocated() {
            return self.reallocate(count);
        }
        self.ptr = raw::allocate::<T>(count)?;
        self.len = count;
        Ok(())
    }

    /// Release any existing storage, then acquire `count` zero-initialized
    /// elements.
    ///
    /// `elem_size` is the caller's per-element byte size and must equal
    /// `size_of::<T>()`; the pair of element type, element count, and element
    /// byte size is a checked contract, so a disagreement is rejected before
    /// anything is released. Callers that want zeroed raw bytes use
    /// `Buffer<u8>`, where the contract is the identity.
    pub fn allocate_zeroed(&mut self, count: usize, elem_size: usize) -> BufferResult<()> {
        if elem_size == 0 {
            return Err(BufferError::InvalidArgument("element size must be non-zero"));
        }
        if elem_size != mem::size_of::<T>() {
            return Err(BufferError::InvalidArgument(
                "element size does not match the buffer's element type",
            ));
        }
        // Validate the count before the existing region is released.
        raw::array_layout::<T>(count)?;
        self.deallocate();
        self.ptr = raw::allocate_zeroed::<T>(count)?;
        self.len = count;
        Ok(())
    }

    /// Resize the owned region to `count` elements, preserving the contents
    /// of the overlapping prefix.
    ///
    /// On an empty buffer this behaves as [`allocate`](Self::allocate). A
    /// failed resize leaves the buffer exactly as it was before the call: no
    /// partial mutation, no ownership loss.
    pub fn reallocate(&mut self, count: usize) -> BufferResult<()> {
        if !self.is_allocated() {
            return self.allocate(count);
        }
        // SAFETY: `ptr`/`len` is the live allocation owned by this handle.
        self.ptr = unsafe { raw::grow_or_shrink(self.ptr, self.len, count)? };
        self.len = count;
        Ok(())
    }

    /// Release the owned storage and return to the empty state.
    ///
    /// A no-op if nothing is owned. Never fails; the buffer may be re-sized
    /// again afterwards without constructing a new handle.
    pub fn deallocate(&mut self) {
        if self.is_allocated() {
            // SAFETY: `ptr`/`len` is the live allocation owned by this
            // handle, and it is released exactly once before being reset.
            unsafe { raw::release(self.ptr, self.len) };
            self.ptr = NonNull::dangling();
            self.len = 0;
        }
    }

    /// Resize the buffer to `count` elements.
    ///
    /// Resizing to the current count is a no-op, resizing to zero releases
    /// the storage, and any other count defers to
    /// [`reallocate`](Self::reallocate).
    pub fn resize(&mut self, count: usize) -> BufferResult<()> {
        if count == self.len {
            return Ok(());
        }
        if count == 0 {
            self.deallocate();
            return Ok(());
        }
        self.reallocate(count)
    }

    /// Detach the handle from its storage.
    ///
    /// With `release = true` this is [`deallocate`](Self::deallocate): the
    /// region is freed. With `release = false` the handle drops to the empty
    /// state **without invoking the deallocation primitive** — the region
    /// leaks unless its address was retained elsewhere. This is a deliberate
    /// ownership hand-off hatch for callers who have passed the raw region
    /// on; prefer [`into_raw_parts`](Self::into_raw_parts) when the parts
    /// are still wanted.
    pub fn clear(&mut self, release: bool) {
        if release {
            self.deallocate();
        } else {
            self.ptr = NonNull::dangling();
            self.len = 0;
        }
    }

    /// Consume the buffer and return its raw region without releasing it.
    ///
    /// Returns `None` when the buffer is empty. The caller becomes
    /// responsible for the region; it can be handed back to a buffer with
    /// [`adopt_raw`](Self::adopt_raw).
    pub fn into_raw_parts(self) -> Option<(NonNull<T>, usize)> {
        if !self.is_allocated() {
            return None;
        }
        let parts = (self.ptr, self.len);
        mem::forget(self);
        Some(parts)
    }

    /// Adopt externally-created storage as if it had been allocated here,
    /// releasing any prior storage first.
    ///
    /// # Safety
    ///
    /// The caller certifies that `region` is a unique region of exactly
    /// `count > 0` elements, allocated by the global allocator with the
    /// layout of `[T; count]`, and that nobody else will resize or free it.
    /// Typically the parts come from [`into_raw_parts`](Self::into_raw_parts).
    pub unsafe fn adopt_raw(&mut self, region: NonNull<T>, count: usize) {
        debug_assert!(count > 0, "adopted region must hold at least one element");
        self.deallocate();
        self.ptr = region;
        self.len = count;
    }

    /// Assign `value` to every element.
    pub fn fill(&mut self, value: T) -> BufferResult<()> {
        self.fill_range(0, self.len, value)
    }

    /// Assign `value` to every element in `[from, to)`.
    ///
    /// Fails with [`BufferError::IllegalState`] on an empty buffer and with
    /// [`BufferError::InvalidArgument`] when the range exceeds the owned
    /// region.
    pub fn fill_range(&mut self, from: usize, to: usize, value: T) -> BufferResult<()> {
        if !self.is_allocated() {
            return Err(BufferError::IllegalState);
        }
        self.check_range(from, to)?;
        for index in from..to {
            // SAFETY: `index < len`, so the write stays inside the live
            // region.
            unsafe { self.ptr.as_ptr().add(index).write(value) };
        }
        Ok(())
    }

    /// Write `value` at `index`.
    pub fn set_value(&mut self, value: T, index: usize) -> BufferResult<()> {
        if !self.is_allocated() {
            return Err(BufferError::IllegalState);
        }
        if index >= self.len {
            return Err(BufferError::InvalidArgument("index exceeds the owned region"));
        }
        // SAFETY: `index < len`, so the write stays inside the live region.
        unsafe { self.ptr.as_ptr().add(index).write(value) };
        Ok(())
    }

    /// Read the element at `index`.
    ///
    /// An element that was never written reads as unspecified garbage.
    pub fn get_value(&self, index: usize) -> BufferResult<T> {
        if !self.is_allocated() {
            return Err(BufferError::IllegalState);
        }
        if index >= self.len {
            return Err(BufferError::InvalidArgument("index exceeds the owned region"));
        }
        // SAFETY: `index < len`, so the read stays inside the live region.
        Ok(unsafe { self.ptr.as_ptr().add(index).read() })
    }

    /// Copy `src` into the buffer starting at element `dst_start`.
    ///
    /// Fails with [`BufferError::InvalidArgument`] when the source is larger
    /// than the space remaining between `dst_start` and the end of the owned
    /// region.
    pub fn set_values(&mut self, src: &[T], dst_start: usize) -> BufferResult<()> {
        if !self.is_allocated() {
            return Err(BufferError::IllegalState);
        }
        if dst_start > self.len || src.len() > self.len - dst_start {
            return Err(BufferError::InvalidArgument(
                "source range exceeds destination space",
            ));
        }
        // SAFETY: the destination range was checked against the live region,
        // and `src` is an exclusive-borrow-disjoint slice.
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), self.ptr.as_ptr().add(dst_start), src.len());
        }
        Ok(())
    }

    /// Copy the elements in `[from, to)` out of the buffer into `dst`.
    pub fn get_values(&self, from: usize, to: usize, dst: &mut [T]) -> BufferResult<()> {
        if !self.is_allocated() {
            return Err(BufferError::IllegalState);
        }
        self.check_range(from, to)?;
        let count = to - from;
        if dst.len() < count {
            return Err(BufferError::InvalidArgument("destination slice is too small"));
        }
        // SAFETY: the source range was checked against the live region, and
        // `dst` is an exclusive-borrow-disjoint slice.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr().add(from), dst.as_mut_ptr(), count);
        }
        Ok(())
    }

    /// Copy the whole buffer into `dst`.
    pub fn read_into(&self, dst: &mut [T]) -> BufferResult<()> {
        self.get_values(0, self.len, dst)
    }

    /// Replace this buffer's contents with the first `count` elements of
    /// `source`, in freshly sized storage.
    ///
    /// Fails with [`BufferError::IllegalState`] when `source` owns no
    /// storage and with [`BufferError::InvalidArgument`] when `count`
    /// exceeds the source or is zero.
    pub fn copy_from(&mut self, source: &Self, count: usize) -> BufferResult<()> {
        if !source.is_allocated() {
            return Err(BufferError::IllegalState);
        }
        if count > source.len {
            return Err(BufferError::InvalidArgument("count exceeds the source buffer"));
        }
        self.allocate(count)?;
        // SAFETY: both regions are live, this buffer was just sized for
        // `count` elements, and two handles never own the same region.
        unsafe {
            ptr::copy_nonoverlapping(source.ptr.as_ptr(), self.ptr.as_ptr(), count);
        }
        Ok(())
    }

    /// Take ownership of `source`'s storage, releasing this buffer's own.
    ///
    /// `source` is left empty. The borrow rules make self-transfer
    /// unrepresentable, so no aliasing guard is needed.
    pub fn take_from(&mut self, source: &mut Self) {
        self.deallocate();
        mem::swap(self, source);
    }

    /// Exchange storage and count with `other`.
    ///
    /// Never fails, and swapping twice restores both buffers.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Produce an independently owned buffer with the same count and
    /// element-wise-copied contents.
    pub fn try_clone(&self) -> BufferResult<Self> {
        if !self.is_allocated() {
            return Ok(Self::new());
        }
        let region = raw::allocate::<T>(self.len)?;
        // SAFETY: both regions are live and sized for `len` elements, and
        // the destination was freshly allocated.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), region.as_ptr(), self.len);
        }
        Ok(Self {
            ptr: region,
            len: self.len,
        })
    }

    /// Check whether both handles currently reference the same storage
    /// region.
    ///
    /// This is identity, not content comparison. Two empty handles compare
    /// equal.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }

    /// Get a raw pointer to the start of the region, or null when empty.
    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        if self.is_allocated() {
            self.ptr.as_ptr()
        } else {
            ptr::null()
        }
    }

    /// Get a raw mutable pointer to the start of the region, or null when
    /// empty.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        if self.is_allocated() {
            self.ptr.as_ptr()
        } else {
            ptr::null_mut()
        }
    }

    /// Get the begin/end pointer pair of the owned region.
    ///
    /// Both ends are null for an empty buffer.
    pub fn as_ptr_range(&self) -> Range<*const T> {
        let start = self.as_ptr();
        // SAFETY: `len` elements are in bounds of the live region; for an
        // empty buffer this is a zero offset, which is always valid.
        let end = unsafe { start.add(self.len) };
        start..end
    }

    /// View the buffer as a slice.
    ///
    /// # Safety
    ///
    /// Every element of the buffer must have been initialized (written
    /// through a fill, set, copy, or zeroed operation) before the slice is
    /// read.
    pub unsafe fn as_slice(&self) -> &[T] {
        if self.is_allocated() {
            // SAFETY: the region is live for `len` elements; the caller
            // vouches for initialization.
            unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
        } else {
            &[]
        }
    }

    /// View the buffer as a mutable slice.
    ///
    /// # Safety
    ///
    /// Same obligation as [`as_slice`](Self::as_slice).
    pub unsafe fn as_mut_slice(&mut self) -> &mut [T] {
        if self.is_allocated() {
            // SAFETY: the region is live for `len` elements and exclusively
            // borrowed; the caller vouches for initialization.
            unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
        } else {
            &mut []
        }
    }

    fn check_range(&self, from: usize, to: usize) -> BufferResult<()> {
        if from > to || to > self.len {
            return Err(BufferError::InvalidArgument("range exceeds the owned region"));
        }
        Ok(())
    }
}

impl<T: Copy> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(buffer) => buffer,
            // Allocation failure during `clone` aborts through the global
            // handler, matching the std collections' contract.
            Err(_) => handle_alloc_error(
                // SAFETY: `try_clone` only fails on a live buffer, whose
                // count was validated at allocation time.
                unsafe { raw::live_layout::<T>(self.len) },
            ),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        if source.is_allocated() {
            if self.copy_from(source, source.len).is_err() {
                handle_alloc_error(
                    // SAFETY: `source` is live, so its count was validated
                    // at allocation time.
                    unsafe { raw::live_layout::<T>(source.len) },
                );
            }
        } else {
            self.deallocate();
        }
    }
}

impl<T: Copy> Default for Buffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Drop for Buffer<T> {
    fn drop(&mut self) {
        self.deallocate();
    }
}

impl<T: Copy> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("count", &self.len)
            .field("allocated", &self.is_allocated())
            .finish()
    }
}

// SAFETY: the handle exclusively owns its region, so sending it to another
// thread transfers that ownership whole, and shared access exposes nothing
// beyond reads of `T`.
unsafe impl<T: Copy + Send> Send for Buffer<T> {}
// SAFETY: `&Buffer<T>` only permits reading elements, which is `Sync` for
// `T: Sync`.
unsafe impl<T: Copy + Sync> Sync for Buffer<T> {}
