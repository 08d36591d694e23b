//! USB HID keyboard class wiring: `embassy_usb::Builder` plus a single
//! `HidReaderWriter` exposing the standard boot-protocol
//! `usbd_hid::descriptor::KeyboardReport`. Device identity constants
//! come from `crate::config`. The reader side carries host-to-device
//! LED output reports, which the firmware forwards to the PS/2 device
//! as a Set LEDs command.

use embassy_rp::peripherals::USB;
use embassy_rp::usb::{Driver, InterruptHandler as UsbInterruptHandler};
use embassy_rp::{bind_interrupts, Peripheral};
use embassy_usb::class::hid::{Config as HidConfig, HidReaderWriter, State as HidState};
use embassy_usb::{Builder, Config as UsbConfig};
use usbd_hid::descriptor::{KeyboardReport, SerializedDescriptor};

use crate::config::{USB_HID_POLL_MS, USB_MANUFACTURER, USB_PID, USB_PRODUCT, USB_SERIAL, USB_VID};
use crate::hid::report::KeyReport;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => UsbInterruptHandler<USB>;
});

/// Translates a [`KeyReport`] (a sorted flat list of active USB HID
/// usages, modifiers included) into the boot-protocol wire shape: an
/// explicit modifier bitfield plus up to 6 non-modifier keycodes.
///
/// More than 6 simultaneous non-modifier keys is the standard HID
/// rollover condition; this reports it the conventional way (all six
/// keycode slots set to `ErrorRollOver`, usage `0x01`) rather than
/// silently truncating.
pub fn build_report(active: &KeyReport) -> KeyboardReport {
    const ERROR_ROLL_OVER: u8 = 0x01;

    let mut modifier = 0u8;
    let mut keycodes = [0u8; 6];
    let mut n = 0usize;
    let mut overflow = false;

    for &code in active.iter() {
        if (0xE0..=0xE7).contains(&code) {
            modifier |= 1 << (code - 0xE0);
        } else if n < keycodes.len() {
            keycodes[n] = code;
            n += 1;
        } else {
            overflow = true;
        }
    }

    if overflow {
        keycodes = [ERROR_ROLL_OVER; 6];
    }

    KeyboardReport {
        modifier,
        reserved: 0,
        leds: 0,
        keycodes,
    }
}

/// Translates a boot-protocol keyboard LED output report (bit 0 Num
/// Lock, bit 1 Caps Lock, bit 2 Scroll Lock) into the argument byte for
/// a PS/2 Set LEDs (`0xED`) command, which uses a different bit order
/// (bit 0 Scroll Lock, bit 1 Num Lock, bit 2 Caps Lock).
pub fn usb_leds_to_ps2(usb_leds: u8) -> u8 {
    let num = usb_leds & 0x01;
    let caps = (usb_leds >> 1) & 0x01;
    let scroll = (usb_leds >> 2) & 0x01;
    (caps << 2) | (num << 1) | scroll
}

/// 'static buffers `embassy_usb::Builder` needs; one instance lives for
/// the firmware's whole lifetime.
pub struct UsbResources {
    config_descriptor: [u8; 256],
    bos_descriptor: [u8; 256],
    msos_descriptor: [u8; 256],
    control_buf: [u8; 128],
    hid_state: HidState<'static>,
}

impl UsbResources {
    pub fn new() -> Self {
        Self {
            config_descriptor: [0; 256],
            bos_descriptor: [0; 256],
            msos_descriptor: [0; 256],
            control_buf: [0; 128],
            hid_state: HidState::new(),
        }
    }
}

impl Default for UsbResources {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the USB device and HID class, returning the device future to
/// drive alongside the writer used to push keyboard reports.
///
/// `resources` must be a `'static` cell (e.g. a [`static_cell::StaticCell`]
/// in the binary's `main`), since `embassy_usb::Builder` borrows its
/// descriptor buffers for the device's lifetime.
pub fn build<'d>(
    usb: impl Peripheral<P = USB> + 'd,
    resources: &'d mut UsbResources,
) -> (
    embassy_usb::UsbDevice<'d, Driver<'d, USB>>,
    embassy_usb::class::hid::HidReader<'d, Driver<'d, USB>, 1>,
    embassy_usb::class::hid::HidWriter<'d, Driver<'d, USB>, 8>,
) {
    let driver = Driver::new(usb, Irqs);

    let mut config = UsbConfig::new(USB_VID, USB_PID);
    config.manufacturer = Some(USB_MANUFACTURER);
    config.product = Some(USB_PRODUCT);
    config.serial_number = Some(USB_SERIAL);
    config.max_power = 100;
    config.max_packet_size_0 = 64;
    // Required for Windows to treat this as a plain boot keyboard
    // rather than probing for a composite/vendor device.
    config.device_class = 0x00;
    config.device_sub_class = 0x00;
    config.device_protocol = 0x00;
    config.composite_with_iads = false;

    let mut builder = Builder::new(
        driver,
        config,
        &mut resources.config_descriptor,
        &mut resources.bos_descriptor,
        &mut resources.msos_descriptor,
        &mut resources.control_buf,
    );

    let hid_config = HidConfig {
        report_descriptor: KeyboardReport::desc(),
        request_handler: None,
        poll_ms: USB_HID_POLL_MS,
        max_packet_size: 64,
    };
    let hid = HidReaderWriter::<_, 1, 8>::new(&mut builder, &mut resources.hid_state, hid_config);
    let (reader, writer) = hid.split();

    (builder.build(), reader, writer)
}
