//! Console plumbing: reading command lines and printing pool notifications.

use shoal::EventReceiver;
use std::{io, thread};
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::mpsc,
};

/// Lines read from the console, or the read error that ended input.
pub type InputLines = mpsc::Receiver<io::Result<String>>;

/// Reads stdin on a dedicated thread and forwards each line.
///
/// A blocking read cannot be cancelled, so it lives on a plain OS thread
/// rather than the runtime's blocking pool; the process can then exit while
/// a read is still pending. The channel closes at end of input or after the
/// first read error.
pub fn stdin_lines() -> InputLines {
    let (tx, rx) = mpsc::channel(16);
    thread::spawn(move || {
        for line in io::stdin().lines() {
            let failed = line.is_err();
            if tx.blocking_send(line).is_err() || failed {
                break;
            }
        }
    });
    rx
}

/// Writes every pool notification to `out`, one per line, until the pool and
/// all of its workers are gone.
pub async fn print_events<W>(mut events: EventReceiver, mut out: W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(event) = events.recv().await {
        out.write_all(format!("{event}\n").as_bytes()).await?;
        out.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoal::{PoolConfig, WorkerPool};

    #[tokio::test]
    async fn prints_one_line_per_event() {
        let (pool, events) = WorkerPool::new(PoolConfig::default()).unwrap();
        pool.add_job("x").await;
        let worker = pool.add_worker().unwrap();
        assert!(pool.remove_worker(worker));
        pool.shutdown().await.unwrap();
        drop(pool);

        let mut out = Vec::new();
        print_events(events, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            [
                r#"no workers available for job "x""#,
                "worker 1 added",
                "worker 1 received the stop signal",
                "worker 1 stopped",
            ]
        );
    }
}
