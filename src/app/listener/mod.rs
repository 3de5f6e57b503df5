mod datagram;

use embassy_futures::select::{select, Either};
use embassy_net::{
    udp::{PacketMetadata, RecvError, UdpSocket},
    IpEndpoint, Stack,
};
use embassy_time::{with_timeout, Duration, Ticker, TimeoutError};
use esp_println::println;

use super::config::{
    DATAGRAM_CAPACITY, LISTENER_STOP, RECV_POLL_INTERVAL_MS, SSDP_GROUP, SSDP_PORT,
};
use super::connection;
use super::types::ListenerSetupError;
use datagram::SsdpDatagram;

const RX_META_COUNT: usize = 4;
const TX_META_COUNT: usize = 1;
const RX_BUFFER_SIZE: usize = 2 * DATAGRAM_CAPACITY;
// Receive-only socket; smallest send backing the stack accepts.
const TX_BUFFER_SIZE: usize = 32;

// Empty and Failed both keep the loop running; only Failed gets a log line.
#[derive(Debug)]
enum RecvOutcome {
    Datagram(SsdpDatagram),
    Empty,
    Failed(RecvError),
}

#[embassy_executor::task]
pub(crate) async fn listener_task(stack: Stack<'static>) {
    // No socket work before an address exists.
    println!(
        "ssdp: waiting for connectivity (state {:?})",
        connection::current_state()
    );
    if let Err(err) = connection::wait_until_connected(None).await {
        println!("ssdp: connection gate unavailable err={:?}", err);
        return;
    }

    match run(stack).await {
        Ok(()) => println!("ssdp: listener stopped"),
        Err(err) => println!("ssdp: socket setup err={:?}", err),
    }
}

// Production firmware never calls this; test builds drive the teardown.
#[allow(dead_code)]
pub(crate) fn request_stop() {
    LISTENER_STOP.signal(());
}

async fn run(stack: Stack<'static>) -> Result<(), ListenerSetupError> {
    let mut rx_meta = [PacketMetadata::EMPTY; RX_META_COUNT];
    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_meta = [PacketMetadata::EMPTY; TX_META_COUNT];
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];
    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );

    stack
        .join_multicast_group(SSDP_GROUP)
        .map_err(ListenerSetupError::Join)?;
    socket.bind(SSDP_PORT).map_err(ListenerSetupError::Bind)?;
    println!("ssdp: listening on 0.0.0.0:{} group {}", SSDP_PORT, SSDP_GROUP);

    receive_loop(&mut socket).await;

    socket.close();
    if let Err(err) = stack.leave_multicast_group(SSDP_GROUP) {
        println!("ssdp: igmp leave err={:?}", err);
    }
    Ok(())
}

async fn receive_loop(socket: &mut UdpSocket<'_>) {
    let mut buffer = [0u8; DATAGRAM_CAPACITY];
    // Ticker keeps the cadence fixed no matter how the attempt went.
    let mut ticker = Ticker::every(Duration::from_millis(RECV_POLL_INTERVAL_MS));
    loop {
        let attempt = with_timeout(
            Duration::from_millis(RECV_POLL_INTERVAL_MS),
            socket.recv_from(&mut buffer),
        );
        match select(LISTENER_STOP.wait(), attempt).await {
            Either::First(()) => return,
            Either::Second(polled) => {
                let polled = polled.map(|result| result.map(|(len, meta)| (len, meta.endpoint)));
                match classify(polled, &buffer) {
                    RecvOutcome::Datagram(datagram) => log_datagram(&datagram),
                    RecvOutcome::Empty => {}
                    RecvOutcome::Failed(err) => println!("ssdp: recv err={:?}", err),
                }
            }
        }
        if let Either::First(()) = select(LISTENER_STOP.wait(), ticker.next()).await {
            return;
        }
    }
}

fn classify(
    polled: Result<Result<(usize, IpEndpoint), RecvError>, TimeoutError>,
    buffer: &[u8],
) -> RecvOutcome {
    match polled {
        Err(TimeoutError) => RecvOutcome::Empty,
        Ok(Err(err)) => RecvOutcome::Failed(err),
        Ok(Ok((len, source))) => RecvOutcome::Datagram(SsdpDatagram::from_wire(buffer, len, source)),
    }
}

fn log_datagram(datagram: &SsdpDatagram) {
    match datagram.as_text() {
        Some(text) => println!(
            "ssdp: {} bytes from {}\n{}",
            datagram.len(),
            datagram.source,
            text
        ),
        None => println!(
            "ssdp: {} bytes from {} (non-utf8)",
            datagram.len(),
            datagram.source
        ),
    }
}
