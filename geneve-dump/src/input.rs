use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// A non-blank, non-comment input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line number in the input
    pub line: usize,
    pub text: String,
}

impl Record {
    /// Decodes the line as hex. Whitespace and `:` separators and an
    /// optional `0x` prefix are accepted.
    pub fn decode_hex(&self) -> Result<Vec<u8>, hex::FromHexError> {
        let text = self.text.trim();
        let text = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        let digits: String = text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ':')
            .collect();
        hex::decode(digits)
    }
}

/// Opens `path` for reading, `-` meaning stdin
pub fn open(path: &Path) -> io::Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

/// Iterator over the records of a line-oriented hex dump
pub struct Records<R> {
    lines: io::Lines<R>,
    line: usize,
}

impl<R: BufRead> Records<R> {
    pub fn new(reader: R) -> Self {
        Records {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = io::Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e)),
            };
            self.line += 1;

            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            return Some(Ok(Record {
                line: self.line,
                text,
            }));
        }
    }
}
