#![warn(clippy::all)]

#[macro_use]
extern crate log;

use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use libpcap_reader::{Duration, Error, Packet, PacketListener, PcapFileReader};

/// Pcap reading tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log every packet (index, timestamp, lengths)
    #[arg(short, long)]
    verbose: bool,

    /// Capture from a network interface instead of reading a file
    #[cfg(feature = "live")]
    #[arg(short, long, value_name = "IFACE", conflicts_with = "input")]
    interface: Option<String>,

    /// Set promiscuous mode on the capture interface
    #[cfg(feature = "live")]
    #[arg(long)]
    promisc: bool,

    /// Input file
    input: Option<String>,
}

#[derive(Debug, Default)]
struct Stats {
    packets: usize,
    bytes: u64,
    first_ts: Duration,
    last_ts: Duration,
}

/// Listener counting packets and bytes behind a shared handle, so results
/// stay available after the reader has consumed the listener group.
struct StatsListener {
    stats: Arc<Mutex<Stats>>,
    verbose: bool,
}

impl PacketListener for StatsListener {
    fn handle_packet(&mut self, packet: &Packet) -> Result<(), Error> {
        if self.verbose {
            info!(
                "packet {:>6}: ts {}.{:09} caplen {} origlen {}",
                packet.index, packet.ts.secs, packet.ts.nanos, packet.caplen, packet.origlen
            );
        }
        let mut stats = self
            .stats
            .lock()
            .map_err(|_| Error::Generic("stats lock poisoned"))?;
        stats.packets += 1;
        stats.bytes += packet.data.len() as u64;
        if stats.first_ts.is_null() {
            stats.first_ts = packet.ts;
        }
        stats.last_ts = packet.ts;
        Ok(())
    }
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_env("PCAP_READ_LOG")
        .unwrap_or_else(|_| EnvFilter::from_default_env().add_directive(Level::INFO.into()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .compact()
        .init();

    let stats = Arc::new(Mutex::new(Stats::default()));
    let listeners: Vec<Box<dyn PacketListener>> = vec![Box::new(StatsListener {
        stats: Arc::clone(&stats),
        verbose: args.verbose,
    })];

    #[cfg(feature = "live")]
    if let Some(interface) = args.interface.as_deref() {
        run_live(interface, args.promisc, listeners)?;
        report(&stats);
        return Ok(());
    }

    let input = match args.input.as_deref() {
        Some(s) => s,
        None => return Err(Error::InvalidArgument("no input file provided")),
    };
    info!("reading capture file {input}");
    let reader = PcapFileReader::new(input)?;
    reader.read_file(listeners)?;
    report(&stats);

    Ok(())
}

fn report(stats: &Arc<Mutex<Stats>>) {
    let stats = stats.lock().expect("stats lock poisoned");
    info!("{} packets, {} bytes", stats.packets, stats.bytes);
    if !stats.last_ts.is_null() {
        let span = stats.last_ts - stats.first_ts;
        info!("capture spans {}.{:09}s", span.secs, span.nanos);
    }
}

#[cfg(feature = "live")]
fn run_live(
    interface: &str,
    promisc: bool,
    listeners: Vec<Box<dyn PacketListener>>,
) -> Result<(), Error> {
    use libpcap_reader::pcap::{Capture, Device, Precision};
    use libpcap_reader::{PcapCapture, PcapHandleReader};

    let device = Device::list()?
        .into_iter()
        .find(|d| d.name == interface)
        .ok_or(Error::InvalidArgument("capture interface not found"))?;
    let cap = Capture::from_device(device)?
        .promisc(promisc)
        .timeout(1000)
        .open()?;
    let mut reader = PcapHandleReader::new(PcapCapture::new(cap, Precision::Micro), listeners)?;

    let stop = reader.stop_handle();
    ctrlc::set_handler(move || {
        info!("stop requested, waiting for the in-flight read to return");
        stop.request_stop();
    })
    .map_err(|_| Error::Generic("could not install signal handler"))?;

    info!("capturing from {interface}, press Ctrl-C to stop");
    let stop = reader.stop_handle();
    let res = reader.run();
    if stop.has_terminated() {
        info!("capture terminated, handle closed");
    }
    res
}
