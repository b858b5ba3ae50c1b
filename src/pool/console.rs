/*!
 * Console Output
 * Line-atomic writer shared by the launcher and its workers
 */

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::warn;

/// Shared output stream; each call emits one whole line under the lock
pub struct Console {
    out: Mutex<Box<dyn Write + Send>>,
}

impl Console {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// In-memory console plus a handle for reading what was written
    pub fn capture() -> (Self, CapturedOutput) {
        let captured = CapturedOutput::default();
        (Self::new(captured.clone()), captured)
    }

    /// Write `text` followed by a newline, then flush
    pub fn line(&self, text: impl AsRef<str>) {
        let mut out = self.out.lock();
        let result = writeln!(out, "{}", text.as_ref()).and_then(|_| out.flush());
        if let Err(e) = result {
            warn!(error = %e, "console write failed");
        }
    }
}

/// Buffer behind [`Console::capture`]
#[derive(Clone, Default)]
pub struct CapturedOutput {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
