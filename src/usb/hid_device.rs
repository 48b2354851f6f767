//! USB HID keyboard device.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral and exposes one boot-keyboard HID interface.

use core::cell::RefCell;
use defmt::{debug, info};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_usb::class::hid::{
    Config as HidConfig, HidReader, HidReaderWriter, HidWriter, ReportId, RequestHandler, State,
};
use embassy_usb::control::OutResponse;
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;
use tatacon2usb::config;
use tatacon2usb::hid::keyboard::{KEYBOARD_REPORT_DESCRIPTOR, KEYBOARD_REPORT_SIZE};
use tatacon2usb::DrumBridge;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

/// Concrete USB driver type for this board.
pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

/// Bridge state shared between the poll loop and the USB callbacks.
pub type SharedBridge = Mutex<CriticalSectionRawMutex, RefCell<DrumBridge>>;

/// Host-to-device report size: one LED byte.
const OUT_REPORT_SIZE: usize = 1;

static KB_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static USB_STATE_HANDLER: StaticCell<UsbStateHandler> = StaticCell::new();
static KB_REQUEST_HANDLER: StaticCell<KeyboardRequestHandler> = StaticCell::new();

/// Tracks host configuration so the first report after enumeration
/// carries the current drum state.
struct UsbStateHandler {
    bridge: &'static SharedBridge,
}

impl embassy_usb::Handler for UsbStateHandler {
    fn configured(&mut self, configured: bool) {
        if configured {
            info!("USB configured");
            self.bridge.lock(|b| b.borrow_mut().on_configured());
        } else {
            info!("USB unconfigured");
        }
    }

    fn suspended(&mut self, suspended: bool) {
        info!("USB suspended={}", suspended);
    }
}

/// Answers HID class requests (GET/SET_REPORT, GET/SET_IDLE) and
/// host reports on the OUT endpoint.
pub struct KeyboardRequestHandler {
    bridge: &'static SharedBridge,
}

impl KeyboardRequestHandler {
    pub fn new(bridge: &'static SharedBridge) -> Self {
        Self { bridge }
    }
}

impl RequestHandler for KeyboardRequestHandler {
    fn get_report(&mut self, id: ReportId, buf: &mut [u8]) -> Option<usize> {
        match id {
            ReportId::In(_) => {
                let n = self.bridge.lock(|b| b.borrow().last_report().serialize(buf));
                (n > 0).then_some(n)
            }
            _ => None,
        }
    }

    fn set_report(&mut self, _id: ReportId, data: &[u8]) -> OutResponse {
        debug!("Host report ({} bytes) ignored", data.len());
        self.bridge
            .lock(|b| b.borrow_mut().process_host_report(data));
        OutResponse::Accepted
    }

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        Some(self.bridge.lock(|b| b.borrow().idle_ms()))
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, duration_ms: u32) {
        info!("HID idle rate set to {} ms", duration_ms);
        self.bridge.lock(|b| b.borrow_mut().set_idle_ms(duration_ms));
    }
}

/// Build result containing the USB device runner and the HID endpoints.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub reader: HidReader<'static, UsbDriver, OUT_REPORT_SIZE>,
    pub writer: HidWriter<'static, UsbDriver, KEYBOARD_REPORT_SIZE>,
}

/// Initialise the USB stack and create the keyboard HID interface.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD, bridge: &'static SharedBridge) -> UsbHidDevice {
    // Create the low-level USB driver with hardware VBUS detection.
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = config::USB_MAX_POWER_MA;
    usb_config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        usb_config,
        USB_CONFIG_DESC.init([0u8; 256]),
        USB_BOS_DESC.init([0u8; 256]),
        USB_MSOS_DESC.init([0u8; 256]),
        USB_CTRL_BUF.init([0u8; 128]),
    );

    builder.handler(USB_STATE_HANDLER.init(UsbStateHandler { bridge }));

    let kb_config = HidConfig {
        report_descriptor: KEYBOARD_REPORT_DESCRIPTOR,
        request_handler: Some(KB_REQUEST_HANDLER.init(KeyboardRequestHandler::new(bridge))),
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: KEYBOARD_REPORT_SIZE as u16,
    };
    let hid = HidReaderWriter::<_, OUT_REPORT_SIZE, KEYBOARD_REPORT_SIZE>::new(
        &mut builder,
        KB_STATE.init(State::new()),
        kb_config,
    );
    let (reader, writer) = hid.split();

    let device = builder.build();

    info!("USB HID keyboard initialised");

    UsbHidDevice {
        device,
        reader,
        writer,
    }
}

/// Run the USB device stack.
///
/// This handles USB enumeration, suspend/resume, and endpoint servicing.
/// It runs forever (or until the USB cable is disconnected).
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// Drain host reports arriving on the interrupt OUT endpoint.
pub async fn host_report_task(
    reader: HidReader<'static, UsbDriver, OUT_REPORT_SIZE>,
    bridge: &'static SharedBridge,
) -> ! {
    let mut handler = KeyboardRequestHandler::new(bridge);
    reader.run(false, &mut handler).await
}
