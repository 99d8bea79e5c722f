//! Serial line parameters for opening the reader's port.
//!
//! Opening the port is the host's job; these settings only describe what the
//! reader expects so hosts and configuration files agree on it.

use std::fmt;

/// Default reader baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 19_200;

/// Parity bit mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parity {
    /// No parity bit
    #[default]
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
}

impl Parity {
    /// Single-letter form used in "8N1" notation
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::None => 'N',
            Self::Even => 'E',
            Self::Odd => 'O',
        }
    }
}

/// Flow control mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlowControl {
    /// No flow control
    #[default]
    None,
    /// XON/XOFF
    Software,
    /// RTS/CTS
    Hardware,
}

/// Line settings for the reader's serial port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkSettings {
    /// Bits per second
    pub baud_rate: u32,
    /// Data bits per character (5 to 8)
    pub data_bits: u8,
    /// Parity mode
    pub parity: Parity,
    /// Stop bits (1 or 2)
    pub stop_bits: u8,
    /// Flow control mode
    pub flow_control: FlowControl,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
            flow_control: FlowControl::None,
        }
    }
}

impl LinkSettings {
    /// Check the settings describe a real UART framing.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.baud_rate > 0 && (5..=8).contains(&self.data_bits) && matches!(self.stop_bits, 1 | 2)
    }
}

impl fmt::Display for LinkSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}{}",
            self.baud_rate,
            self.data_bits,
            self.parity.letter(),
            self.stop_bits
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_defaults() {
        let link = LinkSettings::default();
        assert_eq!(link.baud_rate, 19_200);
        assert_eq!(link.flow_control, FlowControl::None);
        assert!(link.is_valid());
        assert_eq!(link.to_string(), "19200 8N1");
    }

    #[test]
    fn test_invalid_framing() {
        let link = LinkSettings {
            data_bits: 9,
            ..LinkSettings::default()
        };
        assert!(!link.is_valid());

        let link = LinkSettings {
            stop_bits: 0,
            parity: Parity::Even,
            ..LinkSettings::default()
        };
        assert!(!link.is_valid());
        assert_eq!(link.to_string(), "19200 8E0");
    }
}
