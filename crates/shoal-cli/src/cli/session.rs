//! Interactive session: turns console lines into pool operations.

use super::{
    command::{self, Command, ParseError},
    console::InputLines,
};
use shoal::{JobHandler, WorkerPool};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// How a session ended. Every exit path shuts the pool down exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The user typed `quit`.
    Quit,
    /// Input ran out.
    EndOfInput,
    /// `interrupt` resolved (Ctrl+C or SIGTERM).
    Interrupted,
}

/// Dispatches commands from `input` to `pool` until `quit`, end of input or
/// `interrupt`, then shuts the pool down.
///
/// Malformed commands and unknown worker ids are reported on `out` and the
/// session carries on. Pool notifications are not written here; they flow
/// through the pool's event stream.
pub async fn run<H, W, S>(
    pool: &WorkerPool<H>,
    input: InputLines,
    out: &mut W,
    interrupt: S,
) -> anyhow::Result<Exit>
where
    H: JobHandler,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    let exit = dispatch(pool, input, out, interrupt).await;
    pool.shutdown().await?;
    exit
}

async fn dispatch<H, W, S>(
    pool: &WorkerPool<H>,
    mut input: InputLines,
    out: &mut W,
    interrupt: S,
) -> anyhow::Result<Exit>
where
    H: JobHandler,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    tokio::pin!(interrupt);

    loop {
        let line = tokio::select! {
            () = &mut interrupt => return Ok(Exit::Interrupted),
            line = input.recv() => line,
        };
        let Some(line) = line.transpose()? else {
            return Ok(Exit::EndOfInput);
        };

        match command::parse(&line) {
            Ok(None) => {}
            Ok(Some(Command::AddWorker)) => {
                pool.add_worker()?;
            }
            Ok(Some(Command::RemoveWorker(id))) => {
                if !pool.remove_worker(id) {
                    report(out, &ParseError::InvalidId(id.to_string())).await?;
                }
            }
            Ok(Some(Command::Quit)) => return Ok(Exit::Quit),
            Ok(Some(Command::Job(payload))) => {
                // A full queue can hold the submission indefinitely.
                tokio::select! {
                    biased;
                    () = &mut interrupt => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!("Interrupted while waiting for queue space, job not submitted");
                        return Ok(Exit::Interrupted);
                    }
                    _ = pool.add_job(payload) => {}
                }
            }
            Err(err) => report(out, &err).await?,
        }
    }
}

async fn report<W>(out: &mut W, err: &ParseError) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    #[cfg(feature = "tracing")]
    tracing::debug!("Rejected command: {err:?}");
    out.write_all(format!("{err}\n").as_bytes()).await?;
    out.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::future::pending;
    use core::time::Duration;
    use shoal::{EventReceiver, Job, PoolConfig, PoolEvent, WorkerId};
    use std::{io, sync::Arc};
    use tokio::{
        sync::{Semaphore, mpsc},
        time::{sleep, timeout},
    };

    fn lines(script: &str) -> InputLines {
        let script: Vec<_> = script.lines().map(|l| Ok(l.to_owned())).collect();
        let (tx, rx) = mpsc::channel(script.len().max(1));
        for line in script {
            tx.try_send(line).unwrap();
        }
        rx
    }

    fn drain(rx: &mut EventReceiver) -> Vec<PoolEvent> {
        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push(event);
        }
        seen
    }

    #[tokio::test]
    async fn quit_shuts_the_pool_down() {
        let (pool, mut events) = WorkerPool::new(PoolConfig::default()).unwrap();
        let mut out = Vec::new();

        let exit = run(&pool, lines("add\nadd\njob one\nquit\nadd\n"), &mut out, pending())
            .await
            .unwrap();

        assert_eq!(exit, Exit::Quit);
        assert!(pool.is_shut_down());
        assert!(out.is_empty());

        let events = drain(&mut events);
        let added: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                PoolEvent::WorkerAdded { worker } => Some(worker.get()),
                _ => None,
            })
            .collect();
        assert_eq!(added, [1, 2], "lines after quit are not read");
        let stopped = events
            .iter()
            .filter(|e| matches!(e, PoolEvent::WorkerStopped { .. }))
            .count();
        assert_eq!(stopped, 2);
    }

    #[tokio::test]
    async fn bad_removals_are_reported_and_the_session_continues() {
        let (pool, mut events) = WorkerPool::new(PoolConfig::default()).unwrap();
        let mut out = Vec::new();

        let script = "add\nremove\nremove x\nremove 7\nremove 1 2\nremove 1\nremove 1\n";
        let exit = run(&pool, lines(script), &mut out, pending()).await.unwrap();

        assert_eq!(exit, Exit::EndOfInput);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "usage: remove <worker id>\n\
             invalid id or worker not found: x\n\
             invalid id or worker not found: 7\n\
             usage: remove <worker id>\n\
             invalid id or worker not found: 1\n"
        );
        assert!(drain(&mut events).contains(&PoolEvent::WorkerSignaled {
            worker: WorkerId::from(1)
        }));
    }

    #[tokio::test]
    async fn jobs_without_workers_are_rejected_not_fatal() {
        let (pool, mut events) = WorkerPool::new(PoolConfig::default()).unwrap();
        let mut out = Vec::new();

        let exit = run(&pool, lines("\n  lonely job  \n"), &mut out, pending())
            .await
            .unwrap();

        assert_eq!(exit, Exit::EndOfInput);
        assert_eq!(
            drain(&mut events),
            [PoolEvent::JobRejected {
                payload: "lonely job".into(),
                reason: shoal::RejectReason::NoWorkers,
            }]
        );
    }

    #[tokio::test]
    async fn interrupt_ends_the_session() {
        let (pool, _events) = WorkerPool::new(PoolConfig::default()).unwrap();
        let (_tx, rx) = mpsc::channel::<io::Result<String>>(1);
        let mut out = Vec::new();

        let exit = run(&pool, rx, &mut out, async {}).await.unwrap();
        assert_eq!(exit, Exit::Interrupted);
        assert!(pool.is_shut_down());
    }

    /// Holds every job until the gate closes.
    struct Gated(Arc<Semaphore>);

    impl JobHandler for Gated {
        async fn handle(&self, _worker: WorkerId, _job: &Job) {
            let _ = self.0.acquire().await;
        }
    }

    #[tokio::test]
    async fn interrupt_is_seen_while_a_job_waits_for_space() {
        let gate = Arc::new(Semaphore::new(0));
        let (pool, mut events) =
            WorkerPool::with_handler(PoolConfig::new(1).unwrap(), Gated(Arc::clone(&gate)))
                .unwrap();
        let mut out = Vec::new();

        // `held` occupies the worker, `queued` fills the only slot and
        // `blocked` waits for space until the interrupt arrives.
        let exit = timeout(
            Duration::from_secs(5),
            dispatch(
                &pool,
                lines("add\nheld\nqueued\nblocked\n"),
                &mut out,
                sleep(Duration::from_millis(50)),
            ),
        )
        .await
        .expect("interrupt ignored while a job was waiting")
        .unwrap();
        assert_eq!(exit, Exit::Interrupted);

        gate.close();
        pool.shutdown().await.unwrap();

        let events = drain(&mut events);
        assert!(events.contains(&PoolEvent::JobDiscarded {
            payload: "queued".into()
        }));
        assert!(events.iter().all(|e| !matches!(
            e,
            PoolEvent::JobProcessing { payload, .. } | PoolEvent::JobRejected { payload, .. }
                if &**payload == "blocked"
        )));
    }

    #[tokio::test]
    async fn read_errors_end_the_session_after_shutdown() {
        let (pool, _events) = WorkerPool::new(PoolConfig::default()).unwrap();
        let (tx, rx) = mpsc::channel(1);
        tx.try_send(Err(io::Error::other("broken pipe"))).unwrap();
        let mut out = Vec::new();

        let err = run(&pool, rx, &mut out, pending()).await.unwrap_err();
        assert!(err.to_string().contains("broken pipe"));
        assert!(pool.is_shut_down());
    }
}
