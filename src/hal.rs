//! Hardware Abstraction Layer
//!
//! STM32G474 glue for the front panel: sampling the panel inputs and keeping
//! the settings record in on-chip flash. Output peripherals need no glue;
//! the embassy drivers implement the `embedded-hal` traits the drivers take.

pub mod flash;
pub mod gpio;
