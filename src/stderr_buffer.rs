use std::io::{self, Write};
use std::sync::Mutex;

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

/// Activate buffering. While active, log lines are stored instead of
/// printed to stderr.
pub fn activate() {
    if let Ok(mut guard) = BUFFER.lock() {
        *guard = Some(Vec::new());
    }
}

/// Deactivate buffering and return all collected messages.
pub fn drain() -> Vec<String> {
    match BUFFER.lock() {
        Ok(mut guard) => guard.take().unwrap_or_default(),
        Err(_) => Vec::new(),
    }
}

// Hands the message back when buffering is off
fn store(msg: String) -> Option<String> {
    let mut guard = match BUFFER.lock() {
        Ok(guard) => guard,
        Err(_) => return Some(msg),
    };
    match guard.as_mut() {
        Some(buf) => {
            buf.push(msg);
            None
        }
        None => Some(msg),
    }
}

/// `io::Write` handle for the log subscriber. Each formatted event arrives
/// as one write and is routed through the buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferedStderr;

pub fn writer() -> BufferedStderr {
    BufferedStderr
}

impl Write for BufferedStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let line = text.trim_end_matches('\n').to_string();
        if store(line).is_some() {
            io::stderr().write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: the buffer is process-global state
    #[test]
    fn test_buffering_lifecycle() {
        activate();
        let mut w = writer();
        w.write_all(b"first\n").unwrap();
        w.write_all(b"second line\n").unwrap();

        let messages = drain();
        assert_eq!(messages, vec!["first", "second line"]);

        // Inactive again
        assert!(drain().is_empty());
    }
}
