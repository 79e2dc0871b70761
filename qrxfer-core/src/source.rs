use std::io::BufRead;

use tracing::warn;

/// Pull-based supplier of decoded QR text, one record per tick.
///
/// Keeps the reassembly core independent of any particular decoder
/// library's event model: camera glue polls its decoder and hands finished
/// strings over, test harnesses replay captures.
pub trait ScanSource {
    fn next_text(&mut self) -> Option<String>;
}

/// Adapts a line-oriented reader (a capture log, a pipe from an external
/// decoder process) into a [`ScanSource`]. Blank lines are skipped.
pub struct LineSource<R: BufRead> {
    inner: R,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BufRead> ScanSource for LineSource<R> {
    fn next_text(&mut self) -> Option<String> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.inner.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    let text = line.trim();
                    if !text.is_empty() {
                        return Some(text.to_string());
                    }
                }
                Err(e) => {
                    warn!(error = %e, "scan source read failed");
                    return None;
                }
            }
        }
    }
}
