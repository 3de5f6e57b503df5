use core::net::Ipv4Addr;

use statig::prelude::*;

use super::super::types::{ConnectionEvent, ConnectionState};

// Side effect requested by a dispatch; the machine itself never touches
// the radio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionAction {
    Connect,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct ConnectionMachine {
    pub(super) state: ConnectionState,
    pub(super) address: Option<Ipv4Addr>,
}

#[derive(Clone, Copy, Debug, Default)]
pub(super) struct DispatchContext {
    pub(super) action: Option<ConnectionAction>,
    pub(super) acquired: Option<Ipv4Addr>,
}

impl ConnectionMachine {
    pub(super) fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            address: None,
        }
    }
}

#[state_machine(initial = "State::disconnected()")]
impl ConnectionMachine {
    #[state]
    fn disconnected(
        &mut self,
        context: &mut DispatchContext,
        event: &ConnectionEvent,
    ) -> Outcome<State> {
        match event {
            ConnectionEvent::LinkStarted => {
                self.state = ConnectionState::Connecting;
                context.action = Some(ConnectionAction::Connect);
                Transition(State::connecting())
            }
            // Drops and stale lease reports before the link starts carry no
            // information; ignore them.
            _ => Handled,
        }
    }

    #[state]
    fn connecting(
        &mut self,
        context: &mut DispatchContext,
        event: &ConnectionEvent,
    ) -> Outcome<State> {
        match event {
            ConnectionEvent::LinkDropped => {
                // One reconnect attempt per drop, forever, no backoff.
                context.action = Some(ConnectionAction::Connect);
                Handled
            }
            ConnectionEvent::AddressAcquired(address) => {
                self.state = ConnectionState::Connected;
                self.address = Some(*address);
                context.acquired = Some(*address);
                Transition(State::connected())
            }
            ConnectionEvent::LinkStarted => Handled,
        }
    }

    #[state]
    fn connected(
        &mut self,
        context: &mut DispatchContext,
        event: &ConnectionEvent,
    ) -> Outcome<State> {
        match event {
            ConnectionEvent::LinkDropped => {
                self.state = ConnectionState::Connecting;
                context.action = Some(ConnectionAction::Connect);
                Transition(State::connecting())
            }
            ConnectionEvent::AddressAcquired(address) => {
                // Lease renewals re-report the address; record it in place.
                self.address = Some(*address);
                context.acquired = Some(*address);
                Handled
            }
            ConnectionEvent::LinkStarted => Handled,
        }
    }
}
