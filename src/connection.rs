use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::console::decode_line;
use crate::errors::{Result, ShellError, ShellErrorType};

pub(crate) const MAX_LINE: usize = 64 * 1024;

/// A line-framed client connection. Lines end in `\n`, optionally preceded by `\r`.
pub(crate) struct Connection {
    stream: TcpStream,
    buffer: BytesMut,
}

impl Connection {
    pub(crate) fn new(stream: TcpStream) -> Connection {
        Connection {
            stream,
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Read the next line, or `None` once the peer has closed the stream.
    pub(crate) async fn read_line(&mut self) -> Result<Option<String>> {
        loop {
            // Attempt to take a complete line from the buffered data.
            if let Some(line) = self.parse_line() {
                return Ok(Some(line));
            }
            if self.buffer.len() > MAX_LINE {
                return Err(ShellError::new(
                    ShellErrorType::IOError,
                    format!("Line exceeds {} bytes", MAX_LINE),
                ));
            }

            // `0` means the peer closed its side. Whatever is left is the last line.
            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let rest = self.buffer.split();
                return Ok(Some(decode_line(&rest)));
            }
        }
    }

    pub(crate) async fn send(&mut self, text: &str) -> Result<()> {
        self.stream.write_all(text.as_bytes()).await?;
        self.stream.flush().await?;
        Ok(())
    }

    fn parse_line(&mut self) -> Option<String> {
        let end = self.buffer.iter().position(|b| *b == b'\n')?;
        let frame = self.buffer.split_to(end + 1);
        Some(decode_line(&frame))
    }
}
