use std::io::BufRead;

use crate::Error;

/// Forward-only reader handing out one integer token per input line.
pub(crate) struct TokenReader<R> {
    reader: R,
    line: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> TokenReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        TokenReader {
            reader,
            line: 0,
            buf: Vec::new(),
        }
    }

    /// Number of the line the last token was read from (1-based, 0 before any read).
    pub(crate) fn line(&self) -> usize {
        self.line
    }

    /// Reads the next line as an integer. `Ok(None)` at end of input.
    pub(crate) fn next_token(&mut self) -> Result<Option<i64>, Error> {
        if !self.advance()? {
            return Ok(None);
        }
        let line = self.line;
        let text = std::str::from_utf8(&self.buf).map_err(|_| Error::MalformedToken {
            line,
            token: String::from_utf8_lossy(self.buf.trim_ascii()).into_owned(),
        })?;
        let text = text.trim();
        text.parse::<i64>()
            .map(Some)
            .map_err(|_| Error::MalformedToken {
                line,
                token: text.to_string(),
            })
    }

    /// Like [`next_token`](Self::next_token), but running out of input is an error.
    pub(crate) fn expect_token(&mut self) -> Result<i64, Error> {
        match self.next_token()? {
            Some(value) => Ok(value),
            None => Err(Error::TruncatedInput { line: self.line + 1 }),
        }
    }

    /// Skips blank lines and reports whether anything else remains.
    pub(crate) fn has_more_content(&mut self) -> Result<bool, Error> {
        while self.advance()? {
            if !self.buf.trim_ascii().is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Loads the next line into the buffer, `false` at end of input.
    fn advance(&mut self) -> Result<bool, Error> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(false);
        }
        self.line += 1;
        Ok(true)
    }
}

/// Narrows a token to a pixel-sized integer, treating overflow as malformed.
pub(crate) fn to_i32(value: i64, line: usize) -> Result<i32, Error> {
    i32::try_from(value).map_err(|_| Error::MalformedToken {
        line,
        token: value.to_string(),
    })
}
