//! Thread-safe pool of scratch buffers used to assemble log records.
//!
//! # Design
//!
//! The pool is a stack of [`Buffer`] values behind a [`Mutex`]: a release
//! pushes, an acquire pops, and the lock is held only for the push or pop.
//! Buffers move in and out of the pool by value, so a buffer handed to
//! [`BufferPool::release`] can no longer be reached by the caller and the same
//! instance is never issued to two callers at once.
//!
//! # Capacity
//!
//! The pool retains at most `max_buffers` buffers. Buffers whose allocation
//! grew past [`MAX_RETAINED_CAPACITY`] while holding an unusually large record
//! are dropped instead of recycled.

use std::fmt;
use std::io;
use std::sync::{Mutex, PoisonError};

use crate::numbers::{write_fixed_width, write_variable_width};

/// Initial allocation of a fresh buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 256;

/// Largest allocation a released buffer may keep and still be recycled.
pub const MAX_RETAINED_CAPACITY: usize = 16 * 1024;

/// Default number of buffers the pool keeps around.
pub const DEFAULT_MAX_BUFFERS: usize = 64;

/// Size of the temporary array used for field formatting.
pub const TMP_LEN: usize = 64;

/// Growable byte buffer with a fixed temporary array for digit formatting.
///
/// Header fields are first assembled in `tmp` and then appended in one piece,
/// so short runs such as `" 1234 ["` cost a single copy.
pub struct Buffer {
    bytes: Vec<u8>,
    tmp: [u8; TMP_LEN],
}

impl Buffer {
    /// Creates an empty buffer with [`DEFAULT_BUFFER_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(DEFAULT_BUFFER_CAPACITY),
            tmp: [0; TMP_LEN],
        }
    }

    /// Returns the written bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the number of written bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Reports whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the current allocation size.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// Discards the written bytes, keeping the allocation.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Shortens the written bytes to `len`, keeping the allocation. Has no
    /// effect when `len` is not shorter than the current length.
    pub fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }

    /// Appends one byte.
    pub fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Appends raw bytes.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Appends a string.
    pub fn push_str(&mut self, text: &str) {
        self.bytes.extend_from_slice(text.as_bytes());
    }

    /// Stores `byte` at position `index` of the temporary array.
    pub fn set_tmp(&mut self, index: usize, byte: u8) {
        self.tmp[index] = byte;
    }

    /// Writes `value` right-aligned into `tmp[start..start + width]`, padding
    /// with `pad`.
    pub fn n_digits(&mut self, width: usize, start: usize, value: u64, pad: u8) {
        write_fixed_width(&mut self.tmp, width, start, value, pad);
    }

    /// Writes `value` into `tmp` at `start` and returns the digit count.
    pub fn some_digits(&mut self, start: usize, value: u64) -> usize {
        write_variable_width(&mut self.tmp, start, value)
    }

    /// Appends `tmp[..len]` to the written bytes.
    pub fn write_tmp(&mut self, len: usize) {
        self.bytes.extend_from_slice(&self.tmp[..len]);
    }

    /// Reports whether the written bytes end with `\n`.
    #[must_use]
    pub fn ends_with_newline(&self) -> bool {
        self.bytes.last() == Some(&b'\n')
    }

    /// Appends `\n` unless the buffer already ends with one.
    ///
    /// An empty buffer receives a newline as well, so every record is
    /// terminated.
    pub fn ensure_trailing_newline(&mut self) {
        if !self.ends_with_newline() {
            self.bytes.push(b'\n');
        }
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("bytes", &String::from_utf8_lossy(&self.bytes))
            .field("capacity", &self.bytes.capacity())
            .finish_non_exhaustive()
    }
}

impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.push_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A thread-safe pool of reusable [`Buffer`] values.
///
/// # Example
///
/// ```
/// use taglog::BufferPool;
///
/// let pool = BufferPool::new(4);
/// let mut buffer = pool.acquire();
/// buffer.push_str("partial record");
/// pool.release(buffer);
///
/// let recycled = pool.acquire();
/// assert!(recycled.is_empty());
/// ```
#[derive(Debug)]
pub struct BufferPool {
    buffers: Mutex<Vec<Buffer>>,
    max_buffers: usize,
}

impl BufferPool {
    /// Creates a pool that retains at most `max_buffers` buffers.
    #[must_use]
    pub fn new(max_buffers: usize) -> Self {
        Self {
            buffers: Mutex::new(Vec::with_capacity(max_buffers)),
            max_buffers,
        }
    }

    /// Returns an empty buffer, recycled when one is available.
    #[must_use]
    pub fn acquire(&self) -> Buffer {
        let recycled = self
            .buffers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        recycled.unwrap_or_default()
    }

    /// Returns `buffer` to the pool.
    ///
    /// The buffer is cleared first, so partially written buffers are accepted.
    /// Oversized buffers and buffers beyond the retention limit are dropped.
    pub fn release(&self, mut buffer: Buffer) {
        if buffer.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        buffer.clear();

        let mut buffers = self.buffers.lock().unwrap_or_else(PoisonError::into_inner);
        if buffers.len() < self.max_buffers {
            buffers.push(buffer);
        }
    }

    /// Returns the number of buffers currently waiting in the pool.
    #[must_use]
    pub fn available(&self) -> usize {
        self.buffers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns the maximum number of buffers the pool retains.
    #[must_use]
    pub fn max_buffers(&self) -> usize {
        self.max_buffers
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BUFFERS)
    }
}
