//! A shared writer with a stack of in-memory redirection layers.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

/// Where reporters write.
///
/// Clones share both the sink and the layer stack. [`Stream::fork`] shares only the sink, so a forked handle keeps
/// writing straight through while the original is redirected into a buffer.
#[derive(Clone)]
pub struct Stream {
    sink: Rc<RefCell<Box<dyn Write>>>,
    layers: Rc<RefCell<Vec<String>>>,
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("layers", &self.layers.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Stream {
    pub fn new(sink: impl Write + 'static) -> Self {
        Self {
            sink: Rc::new(RefCell::new(Box::new(sink))),
            layers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// An in-memory stream, and a handle to read what was written.
    pub fn memory() -> (Self, SharedBuffer) {
        let buffer = SharedBuffer::default();
        (Self::new(buffer.clone()), buffer)
    }

    /// A handle on the same sink with its own, empty, layer stack.
    pub fn fork(&self) -> Self {
        Self {
            sink: Rc::clone(&self.sink),
            layers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn write_str(&self, text: &str) {
        if let Some(top) = self.layers.borrow_mut().last_mut() {
            top.push_str(text);
            return;
        }
        let mut sink = self.sink.borrow_mut();
        if let Err(err) = sink.write_all(text.as_bytes()).and_then(|()| sink.flush()) {
            tracing::warn!(%err, "failed to write report output");
        }
    }

    /// Write `text` followed by a newline.
    pub fn line(&self, text: &str) {
        self.write_str(&format!("{text}\n"));
    }

    /// Redirect subsequent writes into a fresh buffer.
    pub fn push_layer(&self) {
        self.layers.borrow_mut().push(String::new());
    }

    /// Stop the innermost redirection and return what it collected.
    pub fn pop_layer(&self) -> String {
        self.layers.borrow_mut().pop().unwrap_or_default()
    }

    pub fn is_redirected(&self) -> bool {
        !self.layers.borrow().is_empty()
    }
}

/// A cloneable in-memory sink.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
