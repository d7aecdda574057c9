//! SN3218 register map.
//!
//! The PWM, LED control and update registers are contiguous, so the whole
//! output state can be written as one auto-increment burst starting at
//! [`PWM_BASE`].

/// Factory assigned, non-configurable device address.
pub const I2C_ADDRESS: u8 = 0x54;

/// Software shutdown register; 0x01 enables the outputs, 0x00 disables them.
pub const SHUTDOWN: u8 = 0x00;

/// First of the 18 PWM brightness registers (0x01..=0x12).
pub const PWM_BASE: u8 = 0x01;

/// First of the 3 LED control registers, 6 enable bits each (0x13..=0x15).
pub const LED_CONTROL_BASE: u8 = 0x13;

/// Update register; any write latches the PWM and control values.
pub const UPDATE: u8 = 0x16;

/// Reset register; any write restores power-on register defaults.
pub const RESET: u8 = 0x17;
