//! Firmware entry point: spawns the read loop, status LED loop,
//! watchdog supervisor, and USB HID tasks, and wires them together.
#![no_std]
#![no_main]

#[link_section = ".boot2"]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_GENERIC_03H;

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{AnyPin, Flex, Pin as _};
use embassy_rp::peripherals::{PIO0, PIO1, USB};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::usb::Driver;
use embassy_rp::watchdog::Watchdog;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use ps2usb::config::READ_LOOP_POLL_MS;
use ps2usb::embedded::led::{self, Ws2812};
use ps2usb::embedded::pio_sampler::PioSampler;
use ps2usb::embedded::sender::{CommandSender, LineSender};
use ps2usb::embedded::status_cell::StatusCell;
use ps2usb::embedded::supervisor::{self, supervisor_task};
use ps2usb::embedded::usb::{self, build_report, usb_leds_to_ps2, UsbResources};
use ps2usb::hid::mapping::lookup;
use ps2usb::hid::report::ReportBuilder;
use ps2usb::ps2::frame::decode_frame;
use ps2usb::ps2::scancode::{Outcome, ScancodeFsm};
use ps2usb::Status;

const SET_LEDS: u8 = 0xED;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
    PIO1_IRQ_0 => PioInterruptHandler<PIO1>;
});

static STATUS: StatusCell = StatusCell::new();
static ACK: Signal<CriticalSectionRawMutex, ()> = Signal::new();
static LED_REQUEST: Signal<CriticalSectionRawMutex, u8> = Signal::new();
static USB_RESOURCES: StaticCell<UsbResources> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("starting PS/2 to USB HID bridge");

    let p = embassy_rp::init(Default::default());

    // Pin numbers are fixed at build time; they must match
    // `config::PS2_CLK_PIN`/`PS2_DATA_PIN`.
    let clk_pin: AnyPin = p.PIN_0.degrade();
    let data_pin: AnyPin = p.PIN_1.degrade();

    // The PIO sampler and the bit-banged sender are never active at
    // the same time (`PioSampler::stop`/`restart` bracket every send),
    // so it's sound for both to independently own the same physical pin.
    let clk_for_pio = unsafe { clk_pin.clone_unchecked() };
    let data_for_pio = unsafe { data_pin.clone_unchecked() };

    let Pio { common, sm0, .. } = Pio::new(p.PIO0, Irqs);
    let mut sampler = PioSampler::new(common, sm0, clk_for_pio, data_for_pio);

    // Host-to-device commands (Set LEDs, Reset, ...) go through here,
    // bracketed by `sampler.stop()`/`restart()` around each byte.
    let mut sender = CommandSender::new(LineSender::new(Flex::new(clk_pin), Flex::new(data_pin)));

    // Status LED pin matches `config::STATUS_LED_PIN`.
    let Pio {
        common: mut led_common,
        sm0: led_sm0,
        ..
    } = Pio::new(p.PIO1, Irqs);
    let led = Ws2812::new(&mut led_common, led_sm0, p.PIN_16);

    let resources = USB_RESOURCES.init(UsbResources::new());
    let (mut usb_device, hid_reader, mut hid_writer) = usb::build(p.USB, resources);

    let watchdog = Watchdog::new(p.WATCHDOG);
    spawner.spawn(supervisor_task(watchdog)).unwrap();
    spawner.spawn(status_task(led)).unwrap();
    spawner.spawn(led_output_task(hid_reader)).unwrap();

    info!("waiting for USB enumeration");
    let usb_fut = usb_device.run();

    let ps2_fut = async {
        let mut fsm = ScancodeFsm::new();
        let mut report_builder = ReportBuilder::new();
        STATUS.set(Status::Ready);

        loop {
            let frame = match select(sampler.next_frame(), LED_REQUEST.wait()).await {
                Either::First(frame) => frame,
                Either::Second(usb_leds) => {
                    let mask = usb_leds_to_ps2(usb_leds);
                    match sender.send_cmd(&mut sampler, &ACK, SET_LEDS, Some(mask)).await {
                        Ok(()) => info!("LEDs set to {:x}", mask),
                        Err(e) => {
                            warn!("set LEDs failed: {:?}", e);
                            STATUS.trigger_ps2_error();
                        }
                    }
                    continue;
                }
            };
            supervisor::pulse();

            let byte = match decode_frame(frame) {
                Ok(byte) => byte,
                Err(_) => {
                    STATUS.trigger_ps2_error();
                    continue;
                }
            };

            match fsm.feed(byte) {
                Outcome::Ack => ACK.signal(()),
                Outcome::Event(event) => {
                    STATUS.trigger_activity();
                    match lookup(event.scancode, event.extended) {
                        Some(action) => {
                            if report_builder.apply(&action, event.pressed) {
                                if let Some(report) = report_builder.next_report() {
                                    send_report(&mut hid_writer, &report).await;
                                }
                            }
                        }
                        None => {
                            warn!("unmapped scancode {:x} extended={}", event.scancode, event.extended);
                            STATUS.trigger_ps2_error();
                        }
                    }
                }
                Outcome::Pending | Outcome::Suppressed => {}
            }

            Timer::after(Duration::from_millis(READ_LOOP_POLL_MS)).await;
        }
    };

    embassy_futures::join::join(usb_fut, ps2_fut).await;
}

/// Reads boot-protocol LED output reports from the host and forwards
/// each one as a Set LEDs request to the PS/2 read loop, which owns
/// the line sender and sampler.
#[embassy_executor::task]
async fn led_output_task(mut reader: embassy_usb::class::hid::HidReader<'static, Driver<'static, USB>, 1>) {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf).await {
            Ok(_) => LED_REQUEST.signal(buf[0]),
            Err(_) => Timer::after(Duration::from_millis(50)).await,
        }
    }
}

async fn send_report(
    writer: &mut embassy_usb::class::hid::HidWriter<'_, embassy_rp::usb::Driver<'_, embassy_rp::peripherals::USB>, 8>,
    report: &ps2usb::hid::report::KeyReport,
) {
    let hid_report = build_report(report);
    if writer.write_serialize(&hid_report).await.is_err() {
        warn!("USB write failed");
        STATUS.set(Status::UsbErr);
    } else if matches!(STATUS.get(), Status::UsbErr) {
        STATUS.set(Status::Ready);
    }
}

#[embassy_executor::task]
async fn status_task(mut led: Ws2812<'static, PIO1, 0>) {
    loop {
        let status = STATUS.get();
        led::render(&mut led, status, STATUS.ms_since_activity()).await;
    }
}
