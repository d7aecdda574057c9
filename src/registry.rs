//! In-memory desired state for the 18 output channels.

use heapless::FnvIndexMap;

use crate::gamma::{self, GammaTable};
use crate::{Error, NUM_CHANNELS};

/// Maximum number of user-assigned channel names.
const NAME_CAPACITY: usize = 32;

/// Selects a channel either by index (0..18) or by a registered name.
///
/// The driver facade accepts `impl Into<ChannelSel>`, so a plain `u8` or
/// `&str` works directly there.
#[derive(Clone, Copy, Debug)]
pub enum ChannelSel<'a> {
    Id(u8),
    Name(&'a str),
}

impl From<u8> for ChannelSel<'static> {
    fn from(id: u8) -> Self {
        ChannelSel::Id(id)
    }
}

impl<'a> From<&'a str> for ChannelSel<'a> {
    fn from(name: &'a str) -> Self {
        ChannelSel::Name(name)
    }
}

#[derive(Clone, Copy)]
struct ChannelState {
    brightness: u8,
    enabled: bool,
    gamma: Option<GammaTable>,
}

impl ChannelState {
    const OFF: ChannelState = ChannelState {
        brightness: 0,
        enabled: false,
        gamma: None,
    };
}

/// Desired state for all 18 channels plus the name table.
///
/// Every mutation here is purely in-memory; nothing reaches the chip until
/// the driver commits. Stored brightness is the raw linear value, gamma is
/// applied only when the register block is built.
pub struct ChannelRegistry {
    channels: [ChannelState; NUM_CHANNELS],
    names: FnvIndexMap<&'static str, u8, NAME_CAPACITY>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self {
            channels: [ChannelState::OFF; NUM_CHANNELS],
            names: FnvIndexMap::new(),
        }
    }

    /// Resolves an id-or-name selector to a channel index.
    pub fn resolve<E>(&self, channel: ChannelSel<'_>) -> Result<u8, Error<E>> {
        match channel {
            ChannelSel::Id(id) if (id as usize) < NUM_CHANNELS => Ok(id),
            ChannelSel::Id(_) => Err(Error::UnknownChannel),
            ChannelSel::Name(name) => self.names.get(name).copied().ok_or(Error::UnknownChannel),
        }
    }

    /// Binds a name to a channel. Names are unique; several names may point
    /// at the same channel.
    ///
    /// Names are `&'static str` (in practice string literals), since the
    /// table cannot own heap strings on a no_std target. It holds at most 32
    /// bindings; further registrations fail with [`Error::RegistryFull`].
    pub fn register_name<E>(&mut self, name: &'static str, id: u8) -> Result<(), Error<E>> {
        if id as usize >= NUM_CHANNELS {
            return Err(Error::InvalidChannel);
        }
        if self.names.contains_key(name) {
            return Err(Error::DuplicateName);
        }
        self.names
            .insert(name, id)
            .map(|_| ())
            .map_err(|_| Error::RegistryFull)
    }

    pub fn set_brightness<E>(&mut self, channel: ChannelSel<'_>, value: u8) -> Result<(), Error<E>> {
        let id = self.resolve(channel)?;
        self.channels[id as usize].brightness = value;
        Ok(())
    }

    /// Returns the stored linear brightness, unmodified by gamma.
    pub fn brightness<E>(&self, channel: ChannelSel<'_>) -> Result<u8, Error<E>> {
        let id = self.resolve(channel)?;
        Ok(self.channels[id as usize].brightness)
    }

    pub fn set_enabled<E>(&mut self, channel: ChannelSel<'_>, on: bool) -> Result<(), Error<E>> {
        let id = self.resolve(channel)?;
        self.channels[id as usize].enabled = on;
        Ok(())
    }

    pub fn is_enabled<E>(&self, channel: ChannelSel<'_>) -> Result<bool, Error<E>> {
        let id = self.resolve(channel)?;
        Ok(self.channels[id as usize].enabled)
    }

    /// Installs a private gamma table for one channel.
    pub fn set_gamma<E>(
        &mut self,
        channel: ChannelSel<'_>,
        table: GammaTable,
    ) -> Result<(), Error<E>> {
        let id = self.resolve(channel)?;
        self.channels[id as usize].gamma = Some(table);
        Ok(())
    }

    /// Overwrites all enable flags from an 18-bit mask, bit n = channel n.
    pub fn set_enable_mask(&mut self, mask: u32) {
        for (i, channel) in self.channels.iter_mut().enumerate() {
            channel.enabled = mask & (1 << i) != 0;
        }
    }

    /// The 18-bit enable mask, bit n = channel n.
    pub fn enable_mask(&self) -> u32 {
        self.channels
            .iter()
            .enumerate()
            .filter(|(_, c)| c.enabled)
            .fold(0, |mask, (i, _)| mask | 1 << i)
    }

    /// Gamma-corrected output levels in channel order; disabled channels
    /// yield 0 regardless of their stored brightness.
    pub fn corrected_levels(&self) -> [u8; NUM_CHANNELS] {
        let mut levels = [0u8; NUM_CHANNELS];
        for (level, channel) in levels.iter_mut().zip(self.channels.iter()) {
            if channel.enabled {
                let table = channel.gamma.as_ref().unwrap_or(&gamma::DEFAULT);
                *level = table.correct(channel.brightness);
            }
        }
        levels
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestError = Error<()>;

    #[test]
    fn brightness_round_trips_raw_value() {
        let mut registry = ChannelRegistry::new();
        for v in [0u8, 1, 127, 128, 255] {
            registry.set_brightness::<()>(7.into(), v).unwrap();
            assert_eq!(registry.brightness::<()>(7.into()).unwrap(), v);
        }
    }

    #[test]
    fn resolve_rejects_out_of_range_id() {
        let registry = ChannelRegistry::new();
        assert_eq!(
            registry.resolve::<()>(18.into()).unwrap_err(),
            TestError::UnknownChannel
        );
        assert_eq!(registry.resolve::<()>(17.into()).unwrap(), 17);
    }

    #[test]
    fn resolve_rejects_unregistered_name() {
        let registry = ChannelRegistry::new();
        assert_eq!(
            registry.resolve::<()>("warp_core".into()).unwrap_err(),
            TestError::UnknownChannel
        );
    }

    #[test]
    fn names_resolve_to_channels() {
        let mut registry = ChannelRegistry::new();
        registry.register_name::<()>("power", 0).unwrap();
        registry.register_name::<()>("status", 17).unwrap();
        // An alias for the same channel is fine.
        registry.register_name::<()>("ok", 17).unwrap();
        assert_eq!(registry.resolve::<()>("power".into()).unwrap(), 0);
        assert_eq!(registry.resolve::<()>("status".into()).unwrap(), 17);
        assert_eq!(registry.resolve::<()>("ok".into()).unwrap(), 17);
    }

    #[test]
    fn register_name_rejects_duplicates_and_bad_ids() {
        let mut registry = ChannelRegistry::new();
        registry.register_name::<()>("power", 0).unwrap();
        assert_eq!(
            registry.register_name::<()>("power", 1).unwrap_err(),
            TestError::DuplicateName
        );
        assert_eq!(
            registry.register_name::<()>("broken", 18).unwrap_err(),
            TestError::InvalidChannel
        );
        // The failed registrations left the original binding alone.
        assert_eq!(registry.resolve::<()>("power".into()).unwrap(), 0);
    }

    #[test]
    fn name_table_capacity_is_bounded() {
        const NAMES: [&str; 32] = [
            "n00", "n01", "n02", "n03", "n04", "n05", "n06", "n07", "n08", "n09", "n10", "n11",
            "n12", "n13", "n14", "n15", "n16", "n17", "n18", "n19", "n20", "n21", "n22", "n23",
            "n24", "n25", "n26", "n27", "n28", "n29", "n30", "n31",
        ];
        let mut registry = ChannelRegistry::new();
        for (i, &name) in NAMES.iter().enumerate() {
            registry.register_name::<()>(name, (i % 18) as u8).unwrap();
        }
        assert_eq!(
            registry.register_name::<()>("overflow", 0).unwrap_err(),
            TestError::RegistryFull
        );
        // The failed registration left the full table intact.
        assert_eq!(registry.resolve::<()>("n00".into()).unwrap(), 0);
        assert_eq!(registry.resolve::<()>("n31".into()).unwrap(), 13);
        assert_eq!(
            registry.resolve::<()>("overflow".into()).unwrap_err(),
            TestError::UnknownChannel
        );
    }

    #[test]
    fn enable_mask_tracks_flags() {
        let mut registry = ChannelRegistry::new();
        assert_eq!(registry.enable_mask(), 0);
        registry.set_enabled::<()>(0.into(), true).unwrap();
        registry.set_enabled::<()>(5.into(), true).unwrap();
        registry.set_enabled::<()>(17.into(), true).unwrap();
        assert_eq!(registry.enable_mask(), 1 | 1 << 5 | 1 << 17);
        registry.set_enabled::<()>(5.into(), false).unwrap();
        assert_eq!(registry.enable_mask(), 1 | 1 << 17);
    }

    #[test]
    fn set_enable_mask_round_trips() {
        let mut registry = ChannelRegistry::new();
        registry.set_enable_mask(0b101010_101010_101010);
        assert_eq!(registry.enable_mask(), 0b101010_101010_101010);
        assert!(!registry.is_enabled::<()>(0.into()).unwrap());
        assert!(registry.is_enabled::<()>(1.into()).unwrap());
    }

    #[test]
    fn disabled_channel_outputs_zero() {
        let mut registry = ChannelRegistry::new();
        registry.set_brightness::<()>(5.into(), 255).unwrap();
        registry.set_enabled::<()>(5.into(), false).unwrap();
        assert_eq!(registry.corrected_levels()[5], 0);
        // The stored brightness survives the disable.
        assert_eq!(registry.brightness::<()>(5.into()).unwrap(), 255);
        registry.set_enabled::<()>(5.into(), true).unwrap();
        assert_eq!(registry.corrected_levels()[5], 249);
    }

    #[test]
    fn per_channel_gamma_override() {
        let mut registry = ChannelRegistry::new();
        registry
            .set_gamma::<()>(3.into(), GammaTable::new([7; 256]))
            .unwrap();
        registry.set_brightness::<()>(3.into(), 100).unwrap();
        registry.set_brightness::<()>(4.into(), 100).unwrap();
        registry.set_enable_mask(crate::ALL_CHANNELS_MASK);
        let levels = registry.corrected_levels();
        assert_eq!(levels[3], 7);
        assert_eq!(levels[4], GammaTable::default().correct(100));
    }
}
