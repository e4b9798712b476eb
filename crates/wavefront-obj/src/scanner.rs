//! Logical line scanning shared by the OBJ and MTL parsers.

use std::io::{self, BufRead};

/// One logical statement line: comments stripped, continuations joined,
/// whitespace trimmed, never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based physical line the statement started on.
    pub number: usize,
    pub text: String,
}

impl Line {
    /// The statement keyword and its whitespace-separated arguments.
    pub fn split(&self) -> (&str, Vec<&str>) {
        let mut tokens = self.text.split_whitespace();
        let keyword = tokens.next().unwrap_or("");
        (keyword, tokens.collect())
    }

    /// Everything after the keyword, trimmed.
    pub fn rest(&self) -> &str {
        let text = self.text.as_str();
        match text.find(char::is_whitespace) {
            Some(at) => text[at..].trim(),
            None => "",
        }
    }
}

/// Single-pass iterator over the logical lines of a stream.
///
/// A trailing backslash joins the next physical line. A backslash on the
/// final line has nothing to join and the text before it is used as is.
pub struct LineScanner<R> {
    reader: R,
    physical_line: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> LineScanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            physical_line: 0,
            buf: Vec::new(),
        }
    }

    /// Number of physical lines consumed so far.
    pub fn physical_line(&self) -> usize {
        self.physical_line
    }
}

fn strip_comment(raw: &str) -> &str {
    match raw.find('#') {
        Some(at) => &raw[..at],
        None => raw,
    }
}

impl<R: BufRead> Iterator for LineScanner<R> {
    type Item = io::Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut pending = String::new();
        let mut start = 0;

        loop {
            self.buf.clear();
            let read = match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(read) => read,
                Err(e) => return Some(Err(e)),
            };

            if read == 0 {
                let text = pending.trim();
                if text.is_empty() {
                    return None;
                }
                return Some(Ok(Line {
                    number: start,
                    text: text.to_string(),
                }));
            }

            self.physical_line += 1;
            if pending.is_empty() {
                start = self.physical_line;
            }

            let raw = String::from_utf8_lossy(&self.buf);
            let content = strip_comment(&raw).trim();

            if let Some(head) = content.strip_suffix('\\') {
                pending.push_str(head.trim_end());
                pending.push(' ');
                continue;
            }

            pending.push_str(content);
            let text = pending.trim();
            if text.is_empty() {
                pending.clear();
                continue;
            }

            return Some(Ok(Line {
                number: start,
                text: text.to_string(),
            }));
        }
    }
}
