//! Line splitting for ffmpeg's diagnostic stream.
//!
//! ffmpeg redraws its status line with a bare carriage return, so a plain
//! `BufRead::lines` would see one enormous line per encode. This iterator
//! treats `\n`, `\r` and `\r\n` each as a single terminator.

use std::io::{self, BufRead};

/// Iterator over the lines of a diagnostic stream.
pub struct DiagnosticLines<R> {
    reader: R,
    skip_lf: bool,
    finished: bool,
}

impl<R: BufRead> DiagnosticLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            skip_lf: false,
            finished: false,
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = Vec::new();
        loop {
            let (consumed, terminated) = {
                let available = match self.reader.fill_buf() {
                    Ok(buf) => buf,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };
                if available.is_empty() {
                    self.finished = true;
                    return Ok((!line.is_empty()).then(|| lossy(line)));
                }

                let mut start = 0;
                if self.skip_lf {
                    self.skip_lf = false;
                    if available[0] == b'\n' {
                        start = 1;
                    }
                }

                match available[start..]
                    .iter()
                    .position(|&b| b == b'\n' || b == b'\r')
                {
                    Some(offset) => {
                        let end = start + offset;
                        line.extend_from_slice(&available[start..end]);
                        self.skip_lf = available[end] == b'\r';
                        (end + 1, true)
                    }
                    None => {
                        line.extend_from_slice(&available[start..]);
                        (available.len(), false)
                    }
                }
            };
            self.reader.consume(consumed);
            if terminated {
                return Ok(Some(lossy(line)));
            }
        }
    }
}

fn lossy(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

impl<R: BufRead> Iterator for DiagnosticLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_line() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
