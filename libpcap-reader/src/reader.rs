use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::capture::{CaptureHandle, ReadOutcome};
use crate::error::Error;
use crate::listener::PacketListener;

/// Reads packets from a capture handle (file-backed or live) and delivers
/// each one, in capture order, to a fixed group of listeners.
///
/// The reader exclusively owns the handle: [`run`](Self::run) closes it on
/// every exit path, so the handle must not be used after `run` returns.
/// Shutdown is cooperative, see [`StopHandle`].
pub struct PcapHandleReader<H: CaptureHandle> {
    handle: H,
    listeners: Vec<Box<dyn PacketListener>>,
    terminated: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
}

/// Cloneable control handle for a [`PcapHandleReader`].
///
/// Lets another thread request a stop and observe shutdown completion while
/// the reading thread owns the reader itself. The flags are single-bit and
/// only ever transition to true, so atomics with release/acquire ordering
/// are enough.
#[derive(Clone, Debug)]
pub struct StopHandle {
    terminated: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
}

impl StopHandle {
    /// Request the read loop to stop.
    ///
    /// This only *initiates* the shutdown by setting the termination flag:
    /// an in-flight blocking read is not interrupted, so shutdown is
    /// deferred until that read returns a packet, times out, or reaches
    /// end-of-source. Use [`has_terminated`](Self::has_terminated) to check
    /// whether shutdown has completed. Requesting a stop more than once has
    /// no additional effect.
    pub fn request_stop(&self) {
        self.terminated.store(true, Ordering::Release);
    }

    /// True once the read loop has exited gracefully *and* the capture
    /// handle has been closed. A pending stop request alone is not enough:
    /// the loop may still be inside a blocking read.
    pub fn has_terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire) && self.closed.load(Ordering::Acquire)
    }
}

impl<H: CaptureHandle> PcapHandleReader<H> {
    /// Build a reader over an open capture handle. Every packet read from
    /// `handle` will be delivered to each listener, in the order of
    /// `listeners`.
    pub fn new(handle: H, listeners: Vec<Box<dyn PacketListener>>) -> Result<Self, Error> {
        if listeners.is_empty() {
            return Err(Error::InvalidArgument(
                "no listener provided, it makes no sense to read packets only to ignore them",
            ));
        }
        // open-ness is verified here, once, not per iteration
        if !handle.is_open() {
            return Err(Error::IllegalState("capture handle is not open"));
        }
        Ok(PcapHandleReader {
            handle,
            listeners,
            terminated: Arc::new(AtomicBool::new(false)),
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Control handle for requesting a stop from another thread
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            terminated: Arc::clone(&self.terminated),
            closed: Arc::clone(&self.closed),
        }
    }

    /// See [`StopHandle::request_stop`]
    pub fn request_stop(&self) {
        self.terminated.store(true, Ordering::Release);
    }

    /// See [`StopHandle::has_terminated`]
    pub fn has_terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire) && self.closed.load(Ordering::Acquire)
    }

    /// Main function: read packets until end-of-source, a stop request or a
    /// failure, dispatching each packet to every listener in registration
    /// order, synchronously, on the calling thread.
    ///
    /// Read timeouts on a live source are logged and retried. End-of-source
    /// and stop requests return `Ok(())`; fatal capture errors and listener
    /// errors propagate. On every exit path the capture handle is closed,
    /// exactly once, before this function returns.
    pub fn run(&mut self) -> Result<(), Error> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::IllegalState("reader has already terminated"));
        }
        let result = self.read_loop();
        self.handle.close();
        self.closed.store(true, Ordering::Release);
        result
    }

    fn read_loop(&mut self) -> Result<(), Error> {
        while !self.terminated.load(Ordering::Acquire) {
            match self.handle.next_packet()? {
                ReadOutcome::Packet(packet) => {
                    trace!("packet {} ({} bytes)", packet.index, packet.data.len());
                    for listener in self.listeners.iter_mut() {
                        listener.handle_packet(&packet)?;
                    }
                }
                ReadOutcome::Timeout => {
                    // The interface may just be experiencing a silent
                    // period. No need to check the termination flag here,
                    // the loop condition is the next instruction anyway.
                    warn!("read timeout expired while capturing from a live source");
                }
                ReadOutcome::EndOfSource => {
                    debug!("end of capture source reached");
                    self.terminated.store(true, Ordering::Release);
                }
            }
        }
        Ok(())
    }
}
