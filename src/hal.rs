//! Hardware Abstraction Layer
//!
//! STM32G474 implementations of the register seams: a GPIO port as a
//! [`PinBank`](crate::io::pins::PinBank), the embassy time driver as a
//! [`Clock`](crate::io::timing::Clock), and software execution contexts for
//! the generator workers.

pub mod clock;
pub mod context;
pub mod port;

pub use clock::EmbassyClock;
pub use context::{GpioContext, GpioContexts};
pub use port::{GpioBank, GpioPort};
