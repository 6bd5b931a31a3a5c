use std::fmt;
use std::str::FromStr;

use image::Rgb;

/// Maps an intensity in `[0, 1]` to a display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    /// Black for 0, white for 1.
    #[default]
    Gray,
    /// White for 0, black for 1.
    GrayReversed,
}

impl Colormap {
    pub fn color(self, intensity: f32) -> Rgb<u8> {
        let v = intensity.clamp(0.0, 1.0);
        let v = match self {
            Colormap::Gray => v,
            Colormap::GrayReversed => 1.0 - v,
        };
        let c = (v * 255.0).round() as u8;
        Rgb([c, c, c])
    }
}

impl FromStr for Colormap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gray" | "grey" => Ok(Colormap::Gray),
            "gray_r" | "grey_r" => Ok(Colormap::GrayReversed),
            other => Err(format!("unknown colormap '{other}', expected 'gray' or 'gray_r'")),
        }
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Colormap::Gray => write!(f, "gray"),
            Colormap::GrayReversed => write!(f, "gray_r"),
        }
    }
}
