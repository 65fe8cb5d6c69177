//! UDP ingest. The listener only copies datagrams into a bounded queue;
//! parsing happens on the parser threads.

use crossbeam_channel::{Sender, TrySendError};
use tokio::net::UdpSocket;
use tracing::{info, warn};

use crate::metrics::{DATAGRAMS_TOTAL, DROPPED_TOTAL};

/// Largest UDP payload.
const MAX_DATAGRAM: usize = 65_535;

/// Receive datagrams until the socket fails or the queue is closed.
pub async fn run_udp_listener(socket: UdpSocket, tx: Sender<Vec<u8>>) -> std::io::Result<()> {
    if let Ok(addr) = socket.local_addr() {
        info!(%addr, "UDP listener active.");
    }
    let mut buf = vec![0u8; MAX_DATAGRAM];

    loop {
        let (len, _peer) = socket.recv_from(&mut buf).await?;
        DATAGRAMS_TOTAL.inc();

        match tx.try_send(buf[..len].to_vec()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                DROPPED_TOTAL.inc();
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!("Datagram queue closed, listener exiting");
                return Ok(());
            }
        }
    }
}
