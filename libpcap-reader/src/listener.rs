use crate::error::Error;
use crate::packet::Packet;

/// Common trait for packet consumers.
///
/// Listeners are invoked synchronously on the reading thread, in
/// registration order. Returning an error aborts the read loop immediately
/// and propagates to the caller of
/// [`PcapHandleReader::run`](crate::PcapHandleReader::run): consumer bugs
/// are not swallowed by the loop.
pub trait PacketListener: Send {
    /// Callback function for every packet read from the capture handle
    fn handle_packet(&mut self, packet: &Packet) -> Result<(), Error>;
}
