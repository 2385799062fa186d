//! Serial device discovery and configuration.
//!
//! The capture core only needs a blocking byte-readable handle; this module
//! produces one. The firmware's UART shows up as a USB CDC-ACM device
//! (`/dev/ttyACM*` on Linux, `/dev/cu.usbmodem*` on macOS), configured raw:
//! 8 data bits, no parity, one stop bit, no flow control. The read timeout
//! is the capture loop's bounded readiness wait.

use std::path::Path;
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::debug;

use mm_common::{Error, Result};

/// Baud rates the firmware-side UART and the host line discipline both
/// support. Anything else is a configuration error before I/O begins.
pub const SUPPORTED_BAUDS: &[u32] = &[
    9_600, 19_200, 38_400, 57_600, 115_200, 230_400, 460_800, 921_600, 1_000_000, 2_000_000,
];

/// Read timeout: the loop's readiness wait, also the cadence at which the
/// stop flag is observed.
pub const READ_TIMEOUT: Duration = Duration::from_millis(250);

/// Validate the operator-supplied baud rate against the supported set.
pub fn validate_baud(baud: u32) -> Result<()> {
    if SUPPORTED_BAUDS.contains(&baud) {
        Ok(())
    } else {
        Err(Error::UnsupportedBaud { baud })
    }
}

/// True for port names that look like a USB-attached UART on this platform.
fn is_usb_uart_name(name: &str) -> bool {
    let base = name.rsplit('/').next().unwrap_or(name);
    base.starts_with("ttyACM")
        || base.starts_with("ttyUSB")
        || base.starts_with("cu.usbmodem")
        || base.starts_with("cu.usbserial")
        || base.starts_with("tty.usbmodem")
        || base.starts_with("tty.usbserial")
}

/// Pick the first USB-style serial port, in sorted name order.
pub fn detect_port() -> Option<String> {
    let mut names: Vec<String> = serialport::available_ports()
        .ok()?
        .into_iter()
        .map(|p| p.port_name)
        .filter(|n| is_usb_uart_name(n))
        .collect();
    names.sort();
    names.into_iter().next()
}

/// List all port names for the not-found hint.
fn candidate_ports() -> String {
    match serialport::available_ports() {
        Ok(ports) if !ports.is_empty() => ports
            .into_iter()
            .map(|p| p.port_name)
            .collect::<Vec<_>>()
            .join(", "),
        _ => "none detected".to_string(),
    }
}

/// Resolve `auto` (or empty) to a detected port, or pass an explicit path
/// through after checking it exists.
pub fn resolve_port(requested: &str) -> Result<String> {
    if requested.is_empty() || requested == "auto" {
        return detect_port().ok_or_else(|| {
            Error::DeviceNotFound(format!(
                "no UART detected (available ports: {})",
                candidate_ports()
            ))
        });
    }
    if !Path::new(requested).exists() {
        return Err(Error::DeviceNotFound(format!(
            "{requested} (available ports: {})",
            candidate_ports()
        )));
    }
    Ok(requested.to_string())
}

/// Open the device raw at the given rate, ready for the capture loop.
pub fn open_port(path: &str, baud: u32) -> Result<Box<dyn SerialPort>> {
    debug!(path, baud, "opening serial device");
    serialport::new(path, baud)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(READ_TIMEOUT)
        .open()
        .map_err(|e| Error::DeviceOpen {
            path: path.into(),
            source: e.into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_bauds_pass_validation() {
        for &baud in SUPPORTED_BAUDS {
            validate_baud(baud).unwrap();
        }
    }

    #[test]
    fn unsupported_baud_is_fatal_config_error() {
        let err = validate_baud(1234).unwrap_err();
        assert!(matches!(err, Error::UnsupportedBaud { baud: 1234 }));
        assert_eq!(err.code(), 11);
    }

    #[test]
    fn usb_uart_names() {
        assert!(is_usb_uart_name("/dev/ttyACM0"));
        assert!(is_usb_uart_name("/dev/ttyUSB3"));
        assert!(is_usb_uart_name("/dev/cu.usbmodem14201"));
        assert!(!is_usb_uart_name("/dev/ttyS0"));
        assert!(!is_usb_uart_name("/dev/cu.Bluetooth-Incoming-Port"));
    }

    #[test]
    fn explicit_missing_path_reports_not_found() {
        let err = resolve_port("/dev/definitely-not-a-port").unwrap_err();
        assert!(matches!(err, Error::DeviceNotFound(_)));
    }
}
