//! Async embedded-test harness for xtensa/ESP32. Drives the real connection
//! engine and the watch-based readiness gate without touching the radio.

#![no_std]
#![no_main]

#[cfg(test)]
#[embedded_test::tests(executor = esp_rtos::embassy::Executor::new())]
mod tests {
    use core::net::Ipv4Addr;

    use embassy_time::{Duration, Instant, Ticker, Timer};
    use ssdpwatch::app::config::{CONNECTION_STATE, CONNECTION_WAITERS_MAX};
    use ssdpwatch::app::connection::{wait_until_connected, ConnectionAction, ConnectionEngine};
    use ssdpwatch::app::types::{ConnectionEvent, ConnectionState, WaitError};

    #[init]
    fn init() {
        let peripherals = esp_hal::init(esp_hal::Config::default());
        let timg0 = esp_hal::timer::timg::TimerGroup::new(peripherals.TIMG0);
        esp_rtos::start(timg0.timer0);
    }

    #[test]
    async fn harness_smoke_async() {
        Timer::after(Duration::from_millis(10)).await;
        assert_eq!(2 + 2, 4);
    }

    #[test]
    async fn connection_engine_drives_gate_end_to_end() {
        let sender = CONNECTION_STATE.sender();
        sender.send(ConnectionState::Disconnected);

        let mut engine = ConnectionEngine::new();
        let result = engine.apply(ConnectionEvent::LinkStarted);
        assert_eq!(result.action, Some(ConnectionAction::Connect));
        sender.send(result.after);

        // Connecting must not release waiters.
        assert_eq!(
            wait_until_connected(Some(Duration::from_millis(50))).await,
            Err(WaitError::Timeout)
        );

        let address = Ipv4Addr::new(192, 168, 1, 42);
        let result = engine.apply(ConnectionEvent::AddressAcquired(address));
        assert!(result.ready_set());
        assert_eq!(result.acquired, Some(address));
        sender.send(result.after);

        assert_eq!(
            wait_until_connected(Some(Duration::from_millis(50))).await,
            Ok(())
        );
    }

    #[test]
    async fn wait_fails_cleanly_when_waiter_slots_run_out() {
        CONNECTION_STATE.sender().send(ConnectionState::Disconnected);

        let mut held: heapless::Vec<_, CONNECTION_WAITERS_MAX> = heapless::Vec::new();
        while let Some(receiver) = CONNECTION_STATE.receiver() {
            if held.push(receiver).is_err() {
                break;
            }
        }

        assert_eq!(
            wait_until_connected(Some(Duration::from_millis(10))).await,
            Err(WaitError::TooManyWaiters)
        );
        drop(held);
    }

    #[test]
    async fn fixed_interval_pacing_holds_across_busy_iterations() {
        let start = Instant::now();
        let mut ticker = Ticker::every(Duration::from_millis(50));
        for _ in 0..2 {
            // Stand-in for a quick receive; the tick still pins the cadence.
            Timer::after(Duration::from_millis(10)).await;
            ticker.next().await;
        }
        let elapsed = Instant::now().saturating_duration_since(start);
        assert!(elapsed >= Duration::from_millis(100));
    }
}
