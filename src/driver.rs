//! Driver facade owning the I2C handle and the channel registry.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::Write;

use crate::gamma::GammaTable;
use crate::registers;
use crate::registry::{ChannelRegistry, ChannelSel};
use crate::{Error, ALL_CHANNELS_MASK, NUM_CHANNELS};

/// Commit burst: register address + 18 PWM values + 3 control bytes + latch.
const BURST_LEN: usize = NUM_CHANNELS + 5;

/// SN3218 driver.
///
/// One instance per bus/chip; the SN3218 has a single fixed address, so there
/// is never more than one per bus. All mutators only touch the in-memory
/// registry; [`Sn3218::update`] is the single point where state is written
/// out, as one bounded I2C transaction.
///
/// No internal locking is provided. Callers on multiple threads must
/// serialize access externally.
pub struct Sn3218<I2C> {
    i2c: I2C,
    registry: ChannelRegistry,
}

impl<I2C, E> Sn3218<I2C>
where
    I2C: Write<u8, Error = E>,
{
    /// Creates the driver. No bus traffic happens until [`Sn3218::init`] or
    /// one of the write operations is called.
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            registry: ChannelRegistry::new(),
        }
    }

    /// Commits the all-off state and enables the output stage.
    pub fn init(&mut self) -> Result<(), Error<E>> {
        self.update()?;
        self.enable()
    }

    /// Enables the output stage (software shutdown register).
    pub fn enable(&mut self) -> Result<(), Error<E>> {
        self.write(&[registers::SHUTDOWN, 0x01])
    }

    /// Disables the output stage without losing register contents.
    pub fn disable(&mut self) -> Result<(), Error<E>> {
        self.write(&[registers::SHUTDOWN, 0x00])
    }

    /// Resets the chip to its power-on register defaults. The in-memory
    /// desired state is kept, so a subsequent [`Sn3218::update`] restores it.
    pub fn reset(&mut self) -> Result<(), Error<E>> {
        self.write(&[registers::RESET, 0xFF])
    }

    /// Flags the given channels (ids or names) as enabled.
    pub fn turn_on<'a, I, C>(&mut self, channels: I) -> Result<(), Error<E>>
    where
        I: IntoIterator<Item = C>,
        C: Into<ChannelSel<'a>>,
    {
        for channel in channels {
            self.registry.set_enabled(channel.into(), true)?;
        }
        Ok(())
    }

    /// Flags the given channels (ids or names) as disabled.
    pub fn turn_off<'a, I, C>(&mut self, channels: I) -> Result<(), Error<E>>
    where
        I: IntoIterator<Item = C>,
        C: Into<ChannelSel<'a>>,
    {
        for channel in channels {
            self.registry.set_enabled(channel.into(), false)?;
        }
        Ok(())
    }

    /// Flags all 18 channels as enabled.
    pub fn turn_on_all(&mut self) {
        self.registry.set_enable_mask(ALL_CHANNELS_MASK);
    }

    /// Flags all 18 channels as disabled.
    pub fn turn_off_all(&mut self) {
        self.registry.set_enable_mask(0);
    }

    /// Overwrites all enable flags from an 18-bit mask, bit n = channel n.
    pub fn enable_leds(&mut self, mask: u32) {
        self.registry.set_enable_mask(mask);
    }

    /// Stores the linear brightness for a channel. Gamma correction is
    /// applied at commit time, not here.
    pub fn set_brightness<'a>(
        &mut self,
        channel: impl Into<ChannelSel<'a>>,
        value: u8,
    ) -> Result<(), Error<E>> {
        self.registry.set_brightness(channel.into(), value)
    }

    /// Returns the stored linear brightness for a channel.
    pub fn brightness<'a>(&self, channel: impl Into<ChannelSel<'a>>) -> Result<u8, Error<E>> {
        self.registry.brightness(channel.into())
    }

    /// Installs a private gamma table for one channel, replacing the default
    /// curve for that channel only.
    pub fn set_channel_gamma<'a>(
        &mut self,
        channel: impl Into<ChannelSel<'a>>,
        table: GammaTable,
    ) -> Result<(), Error<E>> {
        self.registry.set_gamma(channel.into(), table)
    }

    /// Binds a name to a channel id. Names are `&'static str` (in practice
    /// string literals) and the table holds at most 32 bindings.
    pub fn register_name(&mut self, name: &'static str, id: u8) -> Result<(), Error<E>> {
        self.registry.register_name(name, id)
    }

    /// Resolves an id-or-name selector to a channel index.
    pub fn resolve<'a>(&self, channel: impl Into<ChannelSel<'a>>) -> Result<u8, Error<E>> {
        self.registry.resolve(channel.into())
    }

    /// Commits the desired state to the chip.
    ///
    /// The whole output state goes out as one auto-increment burst: the 18
    /// gamma-corrected PWM values (0 for disabled channels), the three LED
    /// control registers holding the enable mask, and the update latch. The
    /// chip applies everything atomically at the latch write.
    ///
    /// On a transport error nothing is retried and the desired state is
    /// untouched; calling `update` again reproduces the identical burst, so
    /// retrying after a failure is always safe.
    pub fn update(&mut self) -> Result<(), Error<E>> {
        // Byte 0 is the start register; byte n maps to register PWM_BASE+n-1.
        const CONTROL: usize = (registers::LED_CONTROL_BASE - registers::PWM_BASE) as usize + 1;
        const LATCH: usize = (registers::UPDATE - registers::PWM_BASE) as usize + 1;
        let levels = self.registry.corrected_levels();
        let mask = self.registry.enable_mask();
        let mut buf = [0u8; BURST_LEN];
        buf[0] = registers::PWM_BASE;
        buf[1..=NUM_CHANNELS].copy_from_slice(&levels);
        buf[CONTROL] = (mask & 0x3F) as u8;
        buf[CONTROL + 1] = (mask >> 6 & 0x3F) as u8;
        buf[CONTROL + 2] = (mask >> 12 & 0x3F) as u8;
        buf[LATCH] = 0xFF;
        self.write(&buf)
    }

    /// Stores brightness for all 18 channels and commits.
    pub fn output(&mut self, values: &[u8; NUM_CHANNELS]) -> Result<(), Error<E>> {
        for (id, value) in values.iter().enumerate() {
            self.registry.set_brightness(ChannelSel::Id(id as u8), *value)?;
        }
        self.update()
    }

    /// Writes raw PWM values straight to the chip, bypassing gamma, enable
    /// flags and the registry. The desired state is left alone, so the next
    /// [`Sn3218::update`] restores it.
    pub fn output_raw(&mut self, values: &[u8; NUM_CHANNELS]) -> Result<(), Error<E>> {
        let mut buf = [0u8; NUM_CHANNELS + 1];
        buf[0] = registers::PWM_BASE;
        buf[1..].copy_from_slice(values);
        self.write(&buf)?;
        self.write(&[registers::UPDATE, 0xFF])
    }

    /// Scripted sweep across all channels for visual verification. Not a
    /// stable interface.
    pub fn demo<D: DelayMs<u16>>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        self.turn_on_all();
        for lit in 0..NUM_CHANNELS as u8 {
            for id in 0..NUM_CHANNELS as u8 {
                let value = if id == lit { 255 } else { 0 };
                self.registry.set_brightness(ChannelSel::Id(id), value)?;
            }
            self.update()?;
            delay.delay_ms(50);
        }
        for step in 0..=8u16 {
            let value = (step * 32).min(255) as u8;
            self.output(&[value; NUM_CHANNELS])?;
            delay.delay_ms(100);
        }
        self.turn_off_all();
        self.update()
    }

    /// Read-only view of the desired state.
    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// Releases the underlying I2C handle.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), Error<E>> {
        self.i2c
            .write(registers::I2C_ADDRESS, buf)
            .map_err(Error::Transport)
    }
}
