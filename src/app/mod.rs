pub mod config;
pub mod connection;
mod listener;
mod net;
pub mod types;

use esp_hal::timer::timg::TimerGroup;
use esp_println::println;

// The radio driver allocates its rx/tx bookkeeping from the heap.
const HEAP_BYTES: usize = 96 * 1024;

pub fn run() -> ! {
    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    esp_alloc::heap_allocator!(size: HEAP_BYTES);

    let credentials = match net::compiled_wifi_credentials() {
        Some(credentials) => credentials,
        None => {
            println!("ssdpwatch: missing wifi credentials (set SSDPWATCH_WIFI_SSID)");
            halt_forever();
        }
    };

    let runtime = match net::setup(peripherals.WIFI) {
        Ok(runtime) => runtime,
        Err(err) => {
            println!("{}", err);
            halt_forever();
        }
    };

    // Before the radio starts, so the first StaStart is not missed.
    connection::install_event_bridge();

    let mut executor = esp_rtos::embassy::Executor::new();
    let executor = unsafe { make_static(&mut executor) };
    executor.run(move |spawner| {
        spawner.must_spawn(net::net_task(runtime.net_runner));
        spawner.must_spawn(connection::address_watch_task(runtime.stack));
        spawner.must_spawn(connection::connection_task(
            runtime.wifi_controller,
            credentials,
        ));
        spawner.must_spawn(listener::listener_task(runtime.stack));
    });
}

unsafe fn make_static<T>(value: &mut T) -> &'static mut T {
    unsafe { core::mem::transmute(value) }
}

pub(crate) fn halt_forever() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
