use std::path::{Path, PathBuf};

use pcap::{Capture, Offline, Precision};

use crate::capture::PcapCapture;
use crate::error::Error;
use crate::listener::PacketListener;
use crate::reader::PcapHandleReader;

/// Wrapper for the boilerplate of opening and reading a pcap file.
///
/// The file is opened with nanosecond timestamp precision when the capture
/// library supports it, falling back to microsecond precision otherwise.
pub struct PcapFileReader {
    path: PathBuf,
}

impl PcapFileReader {
    /// Create a reader for the given pcap file. Fails if the file does not
    /// exist.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(Error::InvalidArgument("input pcap file not found"));
        }
        Ok(PcapFileReader { path })
    }

    /// Read the whole file, delivering every packet to each listener in the
    /// order of `listeners`. Returns when end-of-file is reached; errors
    /// from opening the file or from the read loop surface unchanged, and
    /// the underlying handle is closed on every exit path.
    pub fn read_file(&self, listeners: Vec<Box<dyn PacketListener>>) -> Result<(), Error> {
        let capture = self.open()?;
        let mut reader = PcapHandleReader::new(capture, listeners)?;
        reader.run()
    }

    fn open(&self) -> Result<PcapCapture<Offline>, Error> {
        match Capture::from_file_with_precision(&self.path, Precision::Nano) {
            Ok(cap) => Ok(PcapCapture::new(cap, Precision::Nano)),
            Err(e) => {
                debug!("nanosecond-precision open failed ({e}), retrying with microseconds");
                let cap = Capture::from_file(&self.path)?;
                Ok(PcapCapture::new(cap, Precision::Micro))
            }
        }
    }
}
