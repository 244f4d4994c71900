//! Bounded output capture from a child's pipes.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const CHUNK_SIZE: usize = 8 * 1024;

/// Bytes read from one stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub bytes: Vec<u8>,
    /// More was written than the limit allowed
    pub truncated: bool,
}

impl Captured {
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Reads a stream in the background, keeping at most `limit` bytes.
///
/// Excess output is still drained so the writer never blocks on a full
/// pipe.
pub struct OutputCapture {
    stop: oneshot::Sender<()>,
    task: JoinHandle<io::Result<Captured>>,
}

impl OutputCapture {
    pub fn spawn<R>(reader: R, limit: usize) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (stop, stop_rx) = oneshot::channel();
        let task = tokio::spawn(read_bounded(reader, limit, stop_rx));
        Self { stop, task }
    }

    /// Wait for end of stream, or for `grace` and then stop reading.
    ///
    /// The grace period covers writers that outlive the program, such as
    /// detached grandchildren holding the pipe open.
    pub async fn finish(self, grace: Duration) -> io::Result<Captured> {
        let Self { stop, mut task } = self;

        let joined = match tokio::time::timeout(grace, &mut task).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::debug!("Output still open after {:?}, stopping reader", grace);
                let _ = stop.send(());
                task.await
            }
        };

        joined.map_err(io::Error::other)?
    }
}

async fn read_bounded<R>(
    mut reader: R,
    limit: usize,
    mut stop: oneshot::Receiver<()>,
) -> io::Result<Captured>
where
    R: AsyncRead + Unpin,
{
    let mut captured = Captured::default();
    let mut chunk = vec![0u8; CHUNK_SIZE];

    loop {
        let n = tokio::select! {
            biased;
            _ = &mut stop => break,
            read = reader.read(&mut chunk) => read?,
        };

        if n == 0 {
            break;
        }

        let room = limit.saturating_sub(captured.bytes.len());
        if n > room {
            captured.truncated = true;
        }
        captured.bytes.extend_from_slice(&chunk[..n.min(room)]);
    }

    if captured.truncated {
        tracing::debug!("Output truncated to {} bytes", limit);
    }

    Ok(captured)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[tokio::test]
    async fn test_reads_to_end() {
        let capture = OutputCapture::spawn(Cursor::new(b"hello\nworld\n".to_vec()), 1024);
        let captured = capture.finish(Duration::from_secs(1)).await.unwrap();

        assert_eq!(captured.to_string_lossy(), "hello\nworld\n");
        assert!(!captured.truncated);
    }

    #[tokio::test]
    async fn test_truncates_but_drains() {
        let input = vec![b'a'; 3 * CHUNK_SIZE + 17];
        let capture = OutputCapture::spawn(Cursor::new(input), 100);
        let captured = capture.finish(Duration::from_secs(1)).await.unwrap();

        assert_eq!(captured.bytes.len(), 100);
        assert!(captured.truncated);
    }

    #[tokio::test]
    async fn test_stops_after_grace_when_writer_lingers() {
        let (mut writer, reader) = tokio::io::duplex(64);
        tokio::io::AsyncWriteExt::write_all(&mut writer, b"partial")
            .await
            .unwrap();

        let capture = OutputCapture::spawn(reader, 1024);
        let captured = capture.finish(Duration::from_millis(50)).await.unwrap();

        assert_eq!(captured.bytes, b"partial");
        drop(writer);
    }

    #[test]
    fn test_lossy_decoding() {
        let captured = Captured {
            bytes: vec![b'o', b'k', 0xff],
            truncated: false,
        };
        assert_eq!(captured.to_string_lossy(), "ok\u{fffd}");
    }
}
