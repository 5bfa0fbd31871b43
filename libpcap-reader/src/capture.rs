use pcap::{Activated, Capture, Precision};

use crate::duration::Duration;
use crate::error::Error;
use crate::packet::Packet;

/// Outcome of one read on a capture handle.
///
/// Fatal capture failures are reported through the `Err` arm of
/// [`CaptureHandle::next_packet`], not through a dedicated variant.
#[derive(Debug)]
pub enum ReadOutcome<'a> {
    /// A packet was read from the source
    Packet(Packet<'a>),
    /// Live source only: no packet arrived within the configured read
    /// timeout. Not an end condition.
    Timeout,
    /// No more packets will ever be produced (e.g. physical end of file)
    EndOfSource,
}

/// An open capture session, file-backed or live.
///
/// Once handed to a reader the handle is exclusively owned by it: nothing
/// else may read from or close the session concurrently.
pub trait CaptureHandle: Send {
    /// Read the next packet. May block on a live source until a packet
    /// arrives or the read timeout expires.
    fn next_packet(&mut self) -> Result<ReadOutcome<'_>, Error>;

    /// True while the underlying session has not been closed
    fn is_open(&self) -> bool;

    /// Close the underlying session. Called exactly once by the reader,
    /// after its read loop exits.
    fn close(&mut self);
}

/// [`CaptureHandle`] implementation over a libpcap session.
pub struct PcapCapture<T: Activated> {
    cap: Option<Capture<T>>,
    precision: Precision,
    index: usize,
}

impl<T: Activated> PcapCapture<T> {
    /// Wrap an open capture. `precision` must be the timestamp precision
    /// the capture was opened with, so packet timestamps can be scaled to
    /// nanoseconds.
    pub fn new(cap: Capture<T>, precision: Precision) -> Self {
        PcapCapture {
            cap: Some(cap),
            precision,
            index: 0,
        }
    }
}

impl<T: Activated> CaptureHandle for PcapCapture<T> {
    fn next_packet(&mut self) -> Result<ReadOutcome<'_>, Error> {
        let cap = self
            .cap
            .as_mut()
            .ok_or(Error::IllegalState("capture handle is closed"))?;
        match cap.next_packet() {
            Ok(packet) => {
                self.index += 1;
                let header = *packet.header;
                let nanos = if self.precision == Precision::Nano {
                    header.ts.tv_usec as u32
                } else {
                    (header.ts.tv_usec as u32) * 1000
                };
                Ok(ReadOutcome::Packet(Packet {
                    ts: Duration::new(header.ts.tv_sec as u32, nanos),
                    data: packet.data,
                    caplen: header.caplen,
                    origlen: header.len,
                    index: self.index,
                }))
            }
            Err(pcap::Error::TimeoutExpired) => Ok(ReadOutcome::Timeout),
            Err(pcap::Error::NoMorePackets) => Ok(ReadOutcome::EndOfSource),
            Err(e) => Err(Error::Pcap(e)),
        }
    }

    fn is_open(&self) -> bool {
        self.cap.is_some()
    }

    fn close(&mut self) {
        // dropping the capture closes the libpcap session
        self.cap = None;
    }
}
