use parking_lot::{Condvar, Mutex};

/// Thread-safe circular byte buffer between a realtime producer and a
/// blocking consumer.
///
/// Share it as `Arc<RingBuffer>`; all methods take `&self` and lock the
/// internal mutex. Writes never wait: if a block does not fit it is rejected
/// whole and the buffer is left untouched. Reads can block until enough data
/// has arrived or [`RingBuffer::notify_shutdown`] is called.
#[derive(Debug)]
pub struct RingBuffer {
    inner: Mutex<Inner>,
    data_available: Condvar,
}

#[derive(Debug)]
struct Inner {
    storage: Vec<u8>,
    write_index: usize,
    read_index: usize,
    // Tracked explicitly: write_index == read_index is both empty and full.
    available: usize,
    shutdown: bool,
}

impl Inner {
    fn capacity(&self) -> usize {
        self.storage.len()
    }

    fn free(&self) -> usize {
        self.capacity() - self.available
    }

    fn copy_in(&mut self, data: &[u8]) {
        let capacity = self.capacity();
        let first = data.len().min(capacity - self.write_index);
        let (head, tail) = data.split_at(first);

        self.storage[self.write_index..self.write_index + first].copy_from_slice(head);
        self.storage[..tail.len()].copy_from_slice(tail);

        self.write_index = (self.write_index + data.len()) % capacity;
        self.available += data.len();
    }

    fn copy_out(&mut self, out: &mut [u8]) {
        let capacity = self.capacity();
        let first = out.len().min(capacity - self.read_index);
        let (head, tail) = out.split_at_mut(first);

        head.copy_from_slice(&self.storage[self.read_index..self.read_index + first]);
        let tail_len = tail.len();
        tail.copy_from_slice(&self.storage[..tail_len]);

        self.read_index = (self.read_index + out.len()) % capacity;
        self.available -= out.len();
    }

    fn clear(&mut self) {
        self.write_index = 0;
        self.read_index = 0;
        self.available = 0;
        self.shutdown = false;
    }
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                storage: vec![0; capacity],
                write_index: 0,
                read_index: 0,
                available: 0,
                shutdown: false,
            }),
            data_available: Condvar::new(),
        }
    }

    /// Copy `data` into the buffer without blocking.
    ///
    /// Returns `false` and leaves the buffer unchanged if fewer than
    /// `data.len()` bytes are free, or once [`RingBuffer::notify_shutdown`]
    /// has been called. Never allocates.
    pub fn write(&self, data: &[u8]) -> bool {
        if data.is_empty() {
            return true;
        }

        let mut inner = self.inner.lock();
        // Readers drain and exit after shutdown; later bytes would be stranded.
        if inner.shutdown || data.len() > inner.free() {
            return false;
        }
        inner.copy_in(data);
        drop(inner);

        self.data_available.notify_one();
        true
    }

    /// Fill `out` completely, waiting for data as needed.
    ///
    /// Returns `out.len()` once enough bytes were buffered. After
    /// [`RingBuffer::notify_shutdown`] it stops waiting and copies whatever is
    /// left instead, returning the (possibly zero) number of bytes copied.
    /// A request larger than the capacity only completes through shutdown.
    pub fn read(&self, out: &mut [u8]) -> usize {
        let mut inner = self.inner.lock();
        while inner.available < out.len() && !inner.shutdown {
            self.data_available.wait(&mut inner);
        }

        let count = out.len().min(inner.available);
        if count > 0 {
            inner.copy_out(&mut out[..count]);
        }
        count
    }

    /// Fill `out` only if enough bytes are already buffered.
    pub fn try_read(&self, out: &mut [u8]) -> bool {
        let mut inner = self.inner.lock();
        if inner.available < out.len() {
            return false;
        }
        if !out.is_empty() {
            inner.copy_out(out);
        }
        true
    }

    /// Wake every blocked reader and make further reads return without
    /// waiting. Idempotent; cleared by [`RingBuffer::reset`].
    pub fn notify_shutdown(&self) {
        self.inner.lock().shutdown = true;
        self.data_available.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        self.inner.lock().shutdown
    }

    /// Discard buffered data, rewind both cursors and clear the shutdown flag.
    pub fn reset(&self) {
        self.inner.lock().clear();
    }

    /// Reallocate the storage, discarding its contents.
    ///
    /// Must not be called while a capture session is recording.
    pub fn resize(&self, capacity: usize) {
        let mut inner = self.inner.lock();
        inner.storage = vec![0; capacity];
        inner.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().available == 0
    }

    /// Number of bytes currently available for reading.
    pub fn available_to_read(&self) -> usize {
        self.inner.lock().available
    }

    /// Largest block that [`RingBuffer::write`] would currently accept.
    pub fn available_to_write(&self) -> usize {
        self.inner.lock().free()
    }

    /// The total capacity of the buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }
}
