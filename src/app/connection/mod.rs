mod bridge;
mod engine;
mod machine;

pub(crate) use bridge::{address_watch_task, install_event_bridge};
pub use engine::{ConnectionApplyResult, ConnectionEngine};
pub use machine::ConnectionAction;

use embassy_time::{with_timeout, Duration};
use esp_println::println;
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController};

use super::config::{CONNECTION_EVENTS, CONNECTION_STATE};
use super::halt_forever;
use super::types::{ConnectionState, WaitError, WifiCredentials};

// Owns the radio controller and the connection machine. The driver answers
// the start with StaStart, which arrives through the bridge as the first
// LinkStarted. A failed prologue is fatal: without a configured, started
// station there is nothing left for this firmware to do.
#[embassy_executor::task]
pub(crate) async fn connection_task(
    mut controller: WifiController<'static>,
    credentials: WifiCredentials,
) {
    let state_sender = CONNECTION_STATE.sender();
    state_sender.send(ConnectionState::Disconnected);

    let mode = match mode_config_from_credentials(credentials) {
        Some(mode) => mode,
        None => {
            println!("conn: wifi credentials invalid utf8 or length");
            halt_forever();
        }
    };
    if let Err(err) = controller.set_config(&mode) {
        println!("conn: wifi station config err={:?}", err);
        halt_forever();
    }
    if let Err(err) = controller.start_async().await {
        println!("conn: wifi start err={:?}", err);
        halt_forever();
    }

    let mut engine = ConnectionEngine::new();
    loop {
        let event = CONNECTION_EVENTS.receive().await;
        let result = engine.apply(event);

        if let Some(address) = result.acquired {
            println!("conn: got ip {}", address);
        }

        if let Some(ConnectionAction::Connect) = result.action {
            // Fire-and-forget; a failed attempt surfaces as another
            // StaDisconnected and retriggers from there.
            if let Err(err) = controller.connect() {
                println!("conn: wifi connect err={:?}", err);
            }
        }

        if result.transitioned() {
            println!("conn: {:?} -> {:?}", result.before, result.after);
            state_sender.send(result.after);
        }
    }
}

/// Blocks the caller until the connection gate reports `Connected`. Returns
/// immediately if it already does. `None` waits forever.
pub async fn wait_until_connected(timeout: Option<Duration>) -> Result<(), WaitError> {
    let Some(mut receiver) = CONNECTION_STATE.receiver() else {
        return Err(WaitError::TooManyWaiters);
    };
    let wait = receiver.get_and(|state| matches!(state, ConnectionState::Connected));
    match timeout {
        Some(limit) => match with_timeout(limit, wait).await {
            Ok(_) => Ok(()),
            Err(_) => Err(WaitError::Timeout),
        },
        None => {
            wait.await;
            Ok(())
        }
    }
}

/// Snapshot read for observability; never blocks.
pub fn current_state() -> ConnectionState {
    CONNECTION_STATE
        .try_get()
        .unwrap_or(ConnectionState::Disconnected)
}

fn mode_config_from_credentials(credentials: WifiCredentials) -> Option<ModeConfig> {
    let ssid = core::str::from_utf8(&credentials.ssid[..credentials.ssid_len as usize]).ok()?;
    let password =
        core::str::from_utf8(&credentials.password[..credentials.password_len as usize]).ok()?;
    Some(ModeConfig::Client(
        ClientConfig::default()
            .with_ssid(ssid.into())
            .with_password(password.into()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::types::{WIFI_PASSWORD_MAX, WIFI_SSID_MAX};

    fn credentials_from(ssid: &[u8], password: &[u8]) -> WifiCredentials {
        let mut result = WifiCredentials {
            ssid: [0u8; WIFI_SSID_MAX],
            ssid_len: ssid.len() as u8,
            password: [0u8; WIFI_PASSWORD_MAX],
            password_len: password.len() as u8,
        };
        result.ssid[..ssid.len()].copy_from_slice(ssid);
        result.password[..password.len()].copy_from_slice(password);
        result
    }

    #[test]
    fn valid_credentials_produce_station_config() {
        let credentials = credentials_from(b"lab-net", b"hunter22");
        assert!(mode_config_from_credentials(credentials).is_some());
    }

    #[test]
    fn non_utf8_credentials_produce_no_station_config() {
        let credentials = credentials_from(&[0xFF, 0xFE, b'a', b'b'], b"");
        assert!(mode_config_from_credentials(credentials).is_none());
    }
}
