//! In-memory sink for output written by a flag set.
//!
//! A flag set owns its writer, so tests hand it one clone of the buffer and
//! keep another to inspect what was written.
//!
//! # Examples
//!
//! ```
//! use std::io::Write;
//! use flagbind_test_helpers::OutputBuffer;
//!
//! let buffer = OutputBuffer::default();
//! let mut writer = buffer.clone();
//! write!(writer, "hello").expect("write to buffer");
//! assert_eq!(buffer.contents(), "hello");
//! ```

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// Cloneable writer whose clones share one byte buffer.
#[derive(Clone, Debug, Default)]
pub struct OutputBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl OutputBuffer {
    /// Returns everything written so far, lossily decoded as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    /// Reports whether nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }

    /// Discards the captured bytes.
    pub fn clear(&self) {
        self.bytes.lock().clear();
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
