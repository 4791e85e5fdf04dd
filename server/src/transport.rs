//! Byte transports: stdin/stdout and TCP.

use std::future::Future;
use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::handler::{SharedRanker, handle_line};
use crate::protocol::{ErrorKind, Response};

/// Longest request line accepted, excluding the newline.
pub const MAX_LINE_BYTES: usize = 1 << 20;

/// One newline-delimited unit read from the peer.
#[derive(Debug, PartialEq)]
enum Frame {
    Line(String),
    Rejected(String),
}

/// Read the next line, holding at most `limit` bytes of it in memory.
///
/// Lines that are too long or not UTF-8 come back as [`Frame::Rejected`]
/// with the rest of the line consumed, so the stream stays aligned.
async fn read_frame<R>(reader: &mut R, buf: &mut Vec<u8>, limit: usize) -> io::Result<Option<Frame>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let read = (&mut *reader)
        .take(limit as u64 + 1)
        .read_until(b'\n', buf)
        .await?;
    if read == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if buf.len() > limit {
        skip_line(reader).await?;
        return Ok(Some(Frame::Rejected(format!(
            "request line exceeds {limit} bytes"
        ))));
    }

    match std::str::from_utf8(buf) {
        Ok(line) => Ok(Some(Frame::Line(line.to_string()))),
        Err(err) => Ok(Some(Frame::Rejected(format!(
            "request line is not valid UTF-8: {err}"
        )))),
    }
}

/// Discard input up to and including the next newline.
async fn skip_line<R>(reader: &mut R) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let chunk = reader.fill_buf().await?;
        if chunk.is_empty() {
            return Ok(());
        }
        let newline = chunk.iter().position(|byte| *byte == b'\n');
        let len = chunk.len();
        match newline {
            Some(newline) => {
                reader.consume(newline + 1);
                return Ok(());
            }
            None => reader.consume(len),
        }
    }
}

async fn write_response<W>(writer: &mut W, response: &Response) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let encoded = response.to_line().map_err(io::Error::other)?;
    writer.write_all(encoded.as_bytes()).await?;
    writer.flush().await
}

/// Serve newline-delimited requests from `reader` until EOF.
///
/// Each non-blank line gets exactly one response line on `writer`. Lines
/// longer than [`MAX_LINE_BYTES`] or not valid UTF-8 are answered with a
/// `bad_request` error.
pub async fn serve_lines<R, W>(mut reader: R, mut writer: W, ranker: SharedRanker) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    while let Some(frame) = read_frame(&mut reader, &mut buf, MAX_LINE_BYTES).await? {
        let response = match frame {
            Frame::Line(line) => match handle_line(&ranker, &line).await {
                Some(response) => response,
                None => continue,
            },
            Frame::Rejected(message) => {
                warn!("Rejected request line: {message}");
                Response::error(ErrorKind::BadRequest, message)
            }
        };

        write_response(&mut writer, &response).await?;
    }

    debug!("Input closed");
    Ok(())
}

/// Serve requests from this process's stdin, answering on stdout.
pub async fn serve_stdio(ranker: SharedRanker) -> io::Result<()> {
    info!("Serving requests on stdin");
    serve_lines(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), ranker).await
}

/// Accept TCP connections until `shutdown` resolves.
///
/// Every connection runs as its own task; they share one ranker.
pub async fn serve_tcp<F>(listener: TcpListener, ranker: SharedRanker, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()>,
{
    info!("Listening on {}", listener.local_addr()?);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, addr) = match accepted {
                    Ok(accepted) => accepted,
                    Err(err) => {
                        warn!("Failed to accept connection: {err}");
                        continue;
                    }
                };

                debug!("Connected by {addr}");
                let ranker = ranker.clone();
                tokio::spawn(async move {
                    let (read_half, write_half) = stream.into_split();
                    if let Err(err) = serve_lines(BufReader::new(read_half), write_half, ranker).await {
                        warn!("Connection {addr} ended with error: {err}");
                    }
                    debug!("Disconnected {addr}");
                });
            }
            () = &mut shutdown => {
                info!("Shutting down listener");
                break;
            }
        }
    }

    Ok(())
}
