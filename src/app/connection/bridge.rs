use embassy_net::Stack;
use esp_println::println;
use esp_radio::wifi::event::{self, EventExt};

use super::super::config::CONNECTION_EVENTS;
use super::super::types::ConnectionEvent;

/// Must run before the radio is started so the first `StaStart` is not missed.
/// Handlers run in the radio's delivery context and must not block.
pub(crate) fn install_event_bridge() {
    event::StaStart::update_handler(|_| {
        forward(ConnectionEvent::LinkStarted);
    });

    event::StaDisconnected::update_handler(|event| {
        println!("conn: sta_disconnected reason={}", event.reason());
        forward(ConnectionEvent::LinkDropped);
    });
}

// The radio has no "got IP" event of its own; address acquisition is a
// stack-config edge.
#[embassy_executor::task]
pub(crate) async fn address_watch_task(stack: Stack<'static>) {
    loop {
        stack.wait_config_up().await;
        if let Some(config) = stack.config_v4() {
            forward(ConnectionEvent::AddressAcquired(config.address.address()));
        }
        // Config loss always follows a StaDisconnected, which already emitted
        // LinkDropped; nothing to forward here.
        stack.wait_config_down().await;
    }
}

fn forward(event: ConnectionEvent) {
    if CONNECTION_EVENTS.try_send(event).is_err() {
        println!("conn: event queue full, dropped {:?}", event);
    }
}
