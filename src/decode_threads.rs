use crate::compression::Zlib;
use crate::errors::Result;
use crate::extract::decode::{decode, Decoded};
use crate::thread::Joiner;
use slog::Logger;
use std::collections::BTreeMap;
use std::fmt;

/// Decodes payloads on a pool of worker threads.
///
/// Results arrive in completion order; [`InOrder`] puts them back in file table order.
pub(crate) struct ParallelDecoder {
    // Destructors are run in top-down order, so this closes the sender before joining
    sender: flume::Sender<Request>,
    replies: flume::Receiver<Response>,
    threads: Joiner<()>,
}

struct Request {
    index: u32,
    data: Vec<u8>,
}

pub(crate) struct Response {
    pub index: u32,
    pub result: Result<Decoded>,
}

impl ParallelDecoder {
    pub(crate) fn new(threads: usize, logger: &Logger) -> Self {
        assert!(threads > 0);

        // Bounded, so the reader can't run arbitrarily far ahead of the decoders
        let (tx, rx) = flume::bounded(threads * 2);
        let (reply_tx, reply_rx) = flume::unbounded();
        let threads = Joiner::new(threads, |i| {
            let logger = logger.new(slog::o!("decoder" => i));
            thread_fn(rx.clone(), reply_tx.clone(), logger)
        });

        Self {
            sender: tx,
            replies: reply_rx,
            threads,
        }
    }

    pub(crate) fn submit(&self, index: u32, data: Vec<u8>) {
        self.sender
            .send(Request { index, data })
            .expect("decoder threads exited while requests were pending");
    }

    /// A response, if any is ready
    pub(crate) fn try_recv(&self) -> Option<Response> {
        self.replies.try_recv().ok()
    }

    /// Wait for the next response
    pub(crate) fn recv(&self) -> Response {
        self.replies
            .recv()
            .expect("decoder threads exited while requests were pending")
    }
}

fn thread_fn(
    rx: flume::Receiver<Request>,
    tx: flume::Sender<Response>,
    logger: Logger,
) -> impl FnOnce() {
    move || {
        let mut zlib = Zlib::new();
        for request in rx {
            let result = decode(&mut zlib, request.index, request.data);
            slog::trace!(logger, "Decoded payload"; "entry" => request.index, "ok" => result.is_ok());
            // The receiver only goes away once the extraction has already failed
            if tx
                .send(Response {
                    index: request.index,
                    result,
                })
                .is_err()
            {
                break;
            }
        }
    }
}

impl fmt::Debug for ParallelDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParallelDecoder")
            .field("threads", &self.threads.len())
            .finish_non_exhaustive()
    }
}

/// Re-sequences responses by entry index
#[derive(Debug, Default)]
pub(crate) struct InOrder {
    pending: BTreeMap<u32, Result<Decoded>>,
    next: u32,
}

impl InOrder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, response: Response) {
        self.pending.insert(response.index, response.result);
    }

    /// The index of the next entry to be released
    pub(crate) fn next_index(&self) -> u32 {
        self.next
    }

    /// Release the next entry, if it has arrived
    pub(crate) fn pop(&mut self) -> Option<(u32, Result<Decoded>)> {
        let result = self.pending.remove(&self.next)?;
        let index = self.next;
        self.next += 1;
        Some((index, result))
    }
}
