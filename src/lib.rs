//! # sn3218 library
//! A small library for the Si-En SN3218, an 18-channel PWM LED driver
//! controlled over I2C.
//!
//! The driver keeps a purely in-memory picture of the desired chip state
//! (per-channel brightness, enable flags, gamma tables) and only touches the
//! bus when [`Sn3218::update`] is called, which serializes the whole state as
//! a single register burst. This keeps write timing under caller control,
//! which matters when the commit runs on a tight schedule such as an audio
//! callback.
//!
//! ```no_run
//! # fn example<I2C: embedded_hal::blocking::i2c::Write>(i2c: I2C) -> Result<(), sn3218::Error<I2C::Error>> {
//! let mut leds = sn3218::Sn3218::new(i2c);
//! leds.init()?;
//! leds.register_name("status", 4)?;
//! leds.turn_on(["status"])?;
//! leds.set_brightness("status", 128)?;
//! leds.update()?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), no_std)]

mod driver;
mod gamma;
pub mod registers;
mod registry;
pub mod vu;

pub use crate::driver::Sn3218;
pub use crate::gamma::GammaTable;
pub use crate::registry::{ChannelRegistry, ChannelSel};

/// Number of PWM output channels on the chip.
pub const NUM_CHANNELS: usize = 18;

/// Enable mask with all 18 channel bits set.
pub const ALL_CHANNELS_MASK: u32 = 0x3FFFF;

#[derive(Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// Channel id outside 0..18, or a name that was never registered
    UnknownChannel,
    /// Channel id outside 0..18 passed to name registration
    InvalidChannel,
    /// Name is already bound to a channel
    DuplicateName,
    /// The fixed-capacity name table is full
    RegistryFull,
    /// Gamma table does not have exactly 256 entries
    InvalidTable,
    /// I2C bus error reported by the transport
    Transport(E),
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for Error<E> {
    fn format(&self, fmt: defmt::Formatter) {
        let msg = match self {
            Error::UnknownChannel => "unknown channel",
            Error::InvalidChannel => "invalid channel",
            Error::DuplicateName => "duplicate name",
            Error::RegistryFull => "registry full",
            Error::InvalidTable => "invalid gamma table",
            Error::Transport(_) => "transport error",
        };
        defmt::write!(fmt, "{}", msg);
    }
}
