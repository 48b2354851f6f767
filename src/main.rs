//! tatacon2usb firmware entry point.
//!
//! Brings up the TWIM bus and the USB keyboard, sends the drum
//! controller its init handshake, then runs three cooperative loops on a
//! single executor task: the USB device stack, the host-report reader and
//! the 1 ms controller poll.

#![no_std]
#![no_main]

mod usb;

use core::cell::RefCell;
use defmt::{debug, info, warn};
use embassy_executor::Spawner;
use embassy_futures::join::join3;
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Ticker};
use embassy_usb::class::hid::HidWriter;
use embedded_hal::i2c::I2c;
use tatacon2usb::config;
use tatacon2usb::debounce::StatusFilter;
use tatacon2usb::hid::keyboard::KEYBOARD_REPORT_SIZE;
use tatacon2usb::{ControllerLink, DrumBridge, DrumPoller, Error};
use usb::hid_device::{SharedBridge, UsbDriver};
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

static BRIDGE: SharedBridge = Mutex::new(RefCell::new(DrumBridge::new(config::KEY_MAPPING)));

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("tatacon2usb starting");

    let mut twim_config = twim::Config::default();
    twim_config.frequency = match config::I2C_FREQUENCY_KHZ {
        400 => twim::Frequency::K400,
        250 => twim::Frequency::K250,
        _ => twim::Frequency::K100,
    };
    // SDA → P0.26, SCL → P0.27
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim_config);
    let link = ControllerLink::new(i2c);

    #[cfg(feature = "debounce")]
    let mut poller = DrumPoller::with_filter(
        link,
        tatacon2usb::debounce::Debouncer::new(config::DEBOUNCE_POLLS),
    );
    #[cfg(not(feature = "debounce"))]
    let mut poller = DrumPoller::new(link);

    // A missing drum is not fatal: it reads as idle or noise until plugged
    // in and the board is reset.
    match poller.initialize() {
        Ok(()) => info!("Drum controller initialised"),
        Err(e) => warn!("Drum controller init failed: {}", e),
    }

    let usb = usb::hid_device::init(p.USBD, &BRIDGE);

    join3(
        usb::hid_device::run_usb_device(usb.device),
        usb::hid_device::host_report_task(usb.reader, &BRIDGE),
        poll_loop(&mut poller, usb.writer, &BRIDGE),
    )
    .await;
}

/// Poll the drum, update the bridge and push any resulting report.
///
/// The bus transaction runs outside the bridge lock; the lock is only
/// held to apply the byte and synthesize.
async fn poll_loop<I2C, F>(
    poller: &mut DrumPoller<I2C, F>,
    mut writer: HidWriter<'static, UsbDriver, KEYBOARD_REPORT_SIZE>,
    bridge: &'static SharedBridge,
) -> !
where
    I2C: I2c,
    F: StatusFilter,
{
    info!("Poll loop started");

    let mut ticker = Ticker::every(Duration::from_millis(config::POLL_INTERVAL_MS));
    let mut buf = [0u8; KEYBOARD_REPORT_SIZE];

    loop {
        let failures_before = poller.consecutive_failures();
        let status = match poller.read() {
            Ok(status) => {
                if failures_before > 0 {
                    info!("Drum controller back after {} failed polls", failures_before);
                }
                Some(status)
            }
            Err(e) => {
                if failures_before == 0 {
                    warn!("Drum poll failed: {} - holding last state", e);
                }
                None
            }
        };

        let report = bridge.lock(|b| {
            let mut b = b.borrow_mut();
            if let Some(status) = status {
                b.update(status);
            }
            b.service(config::POLL_INTERVAL_MS as u32)
        });

        if let Some(report) = report {
            debug!("Report: {}", report);
            let n = report.serialize(&mut buf);
            if let Err(e) = writer.write(&buf[..n]).await.map_err(|_| Error::Usb) {
                warn!("Report not sent: {}", e);
            }
        }

        ticker.next().await;
    }
}
