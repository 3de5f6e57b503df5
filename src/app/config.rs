use core::net::Ipv4Addr;

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel, signal::Signal, watch::Watch,
};

use super::types::{ConnectionEvent, ConnectionState};

// SSDP well-known group and port, fixed for the process lifetime.
pub const SSDP_GROUP: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);
pub const SSDP_PORT: u16 = 1900;

pub const DATAGRAM_CAPACITY: usize = 1024;
// One receive attempt per interval, trading latency for radio/CPU economy.
pub const RECV_POLL_INTERVAL_MS: u64 = 1_000;

pub const CONNECTION_WAITERS_MAX: usize = 4;

pub static CONNECTION_EVENTS: Channel<CriticalSectionRawMutex, ConnectionEvent, 8> = Channel::new();
pub static CONNECTION_STATE: Watch<
    CriticalSectionRawMutex,
    ConnectionState,
    CONNECTION_WAITERS_MAX,
> = Watch::new();
pub static LISTENER_STOP: Signal<CriticalSectionRawMutex, ()> = Signal::new();
