use core::net::Ipv4Addr;

use statig::blocking::IntoStateMachineExt as _;

use super::super::types::{ConnectionEvent, ConnectionState};
use super::machine::{ConnectionAction, ConnectionMachine, DispatchContext};

#[derive(Clone, Copy, Debug)]
pub struct ConnectionApplyResult {
    pub before: ConnectionState,
    pub after: ConnectionState,
    pub action: Option<ConnectionAction>,
    pub acquired: Option<Ipv4Addr>,
}

impl ConnectionApplyResult {
    pub fn transitioned(self) -> bool {
        self.before != self.after
    }

    pub fn ready_set(self) -> bool {
        self.transitioned() && matches!(self.after, ConnectionState::Connected)
    }

    pub fn ready_cleared(self) -> bool {
        matches!(self.before, ConnectionState::Connected)
            && !matches!(self.after, ConnectionState::Connected)
    }
}

pub struct ConnectionEngine {
    machine: statig::blocking::StateMachine<ConnectionMachine>,
}

impl ConnectionEngine {
    pub fn new() -> Self {
        Self {
            machine: ConnectionMachine::new().state_machine(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.machine.inner().state
    }

    pub fn address(&self) -> Option<Ipv4Addr> {
        self.machine.inner().address
    }

    pub fn apply(&mut self, event: ConnectionEvent) -> ConnectionApplyResult {
        let before = self.state();
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        let after = self.state();
        ConnectionApplyResult {
            before,
            after,
            action: context.action,
            acquired: context.acquired,
        }
    }
}
