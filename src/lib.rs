//!
//! This library provides communication with a UNI-T UT61E+ digital multimeter.
//!
//! <br>
//!
//! # Details
//!
//! - You need the UT-D09A USB cable attached to your DMM. The cable contains
//!   a CH9329 UART-to-HID bridge, so the meter shows up as a plain USB HID
//!   device rather than a serial port.
//!
//! - The library speaks the wire protocol only. Opening the HID device and
//!   moving raw 65-byte reports is left to the embedder: create a transport
//!   channel pair, hand the [`transport::ReportPump`] end to your HID glue
//!   and the [`transport::ReportChannel`] end to [`Device`].
//!
//! - Basic setup and connection
//!
//!   ```no_run
//!   use ut61ectrl::{transport, Device};
//!   #[tokio::main]
//!   async fn main() -> ut61ectrl::Result<()> {
//!       let (chan, _pump) = transport::channel(8);
//!       // ... spawn HID glue driving `_pump` against the opened device ...
//!       let mut device = Device::new(chan);
//!       eprintln!("Connected to: {}\n", device.name().await?);
//!       let mea = device.measurement().await?;
//!       println!("{}", mea);
//!       Ok(())
//!   }
//!   ```
//!
//! # Supported devices
//!
//!  * UNI-T UT61E+ (UT-D09A cable)
//!

pub mod device;
pub mod measurement;
pub mod proto;
pub mod transport;

pub use device::Device;
pub use measurement::{DisplayValue, Measurement, Mode};
pub use proto::command::{Button, Command};
pub use proto::Result;

/// USB vendor id of the CH9329 bridge inside the UT-D09A cable.
pub const VENDOR_ID: u16 = 0x1A86;

/// USB product id of the CH9329 bridge inside the UT-D09A cable.
pub const PRODUCT_ID: u16 = 0xE429;
