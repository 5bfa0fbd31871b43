#[macro_use]
extern crate log;

mod capture;
mod duration;
mod error;
mod file_reader;
mod listener;
mod packet;
mod reader;

pub use capture::*;
pub use duration::Duration;
pub use error::*;
pub use file_reader::*;
pub use listener::*;
pub use packet::*;
pub use reader::*;

pub use pcap;
