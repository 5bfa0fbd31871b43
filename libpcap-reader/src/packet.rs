use crate::duration::Duration;

/// A captured packet, borrowed from the capture handle for the duration of
/// one dispatch. Listeners receive a shared reference and must not assume
/// the bytes outlive the callback.
#[derive(Debug)]
pub struct Packet<'a> {
    pub ts: Duration,
    pub data: &'a [u8],
    pub caplen: u32,
    pub origlen: u32,
    /// 1-based index of this packet within its capture source
    pub index: usize,
}
