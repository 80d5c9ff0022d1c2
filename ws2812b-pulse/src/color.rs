//! Colors and their wire order.

use core::fmt;

use crate::error::{Error, Result};

/// A 24-bit color, one byte per channel.
pub type Color = rgb::RGB8;

/// A handful of named colors.
pub mod colors {
    use super::Color;

    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255);
}

/// One of the three color channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        })
    }
}

/// Build a color from `[r, g, b]` values given as wide integers.
///
/// Fails with [`Error::InvalidColor`] on the first channel outside `0..=255`.
pub fn from_channels(channels: [i32; 3]) -> Result<Color> {
    let [r, g, b] = channels;
    Ok(Color::new(
        channel(Channel::Red, r)?,
        channel(Channel::Green, g)?,
        channel(Channel::Blue, b)?,
    ))
}

fn channel(channel: Channel, value: i32) -> Result<u8> {
    u8::try_from(value).map_err(|_| Error::InvalidColor { channel, value })
}

/// Order in which the channels of a color go out on the wire.
///
/// WS2812B parts expect green first; some clones differ.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorOrder {
    #[default]
    Grb,
    Rgb,
    Brg,
    Rbg,
    Gbr,
    Bgr,
}

impl ColorOrder {
    /// Pack a color into 24 bits, first wire channel in the most significant byte.
    pub const fn pack(self, color: Color) -> u32 {
        let (a, b, c) = match self {
            ColorOrder::Grb => (color.g, color.r, color.b),
            ColorOrder::Rgb => (color.r, color.g, color.b),
            ColorOrder::Brg => (color.b, color.r, color.g),
            ColorOrder::Rbg => (color.r, color.b, color.g),
            ColorOrder::Gbr => (color.g, color.b, color.r),
            ColorOrder::Bgr => (color.b, color.g, color.r),
        };
        ((a as u32) << 16) | ((b as u32) << 8) | (c as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_channels_accepts_full_range() {
        assert_eq!(from_channels([0, 127, 255]), Ok(Color::new(0, 127, 255)));
    }

    #[test]
    fn from_channels_rejects_out_of_range() {
        assert_eq!(
            from_channels([10, 256, 0]),
            Err(Error::InvalidColor {
                channel: Channel::Green,
                value: 256
            })
        );
        assert_eq!(
            from_channels([-1, 0, 0]),
            Err(Error::InvalidColor {
                channel: Channel::Red,
                value: -1
            })
        );
    }

    #[test]
    fn grb_puts_green_first() {
        let color = Color::new(0x11, 0x22, 0x33);
        assert_eq!(ColorOrder::Grb.pack(color), 0x22_11_33);
        assert_eq!(ColorOrder::Rgb.pack(color), 0x11_22_33);
        assert_eq!(ColorOrder::Bgr.pack(color), 0x33_22_11);
    }
}
