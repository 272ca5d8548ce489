use std::ops::{ Add, Mul };

use crate::feq;
use crate::consts::BACKGROUND_RGB;

/// A linear color.
///
/// Represented conventionally with red-green-blue (RGB) values. Shading may
/// push components outside of 0.0 to 1.0; they are only clamped when the
/// color is quantized for an image file.
///
/// # Examples
///
/// Scale a color by a light intensity:
///
/// ```
/// # use whitted_tracer::color::Color;
/// let ivory = Color::rgb(0.4, 0.4, 0.3);
/// assert_eq!(ivory * 2.0, Color::rgb(0.8, 0.8, 0.6));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Similar to the `PartialEq` implementation on `Vector3`, `Color`s are
/// compared component-wise, accounting for possible floating point error in
/// comparisons.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

/// Conversion from a slice to a `Color`.
///
/// Takes the first `n` elements of the slice, and assigns them to the `r`,
/// `g` and `b` fields of the `Color`, in that order. Missing elements default
/// to zero.
impl From<&[f64]> for Color {
    fn from(v: &[f64]) -> Color {
        match v.len() {
            0 => Default::default(),
            1 => Color { r: v[0], ..Default::default() },
            2 => Color { r: v[0], g: v[1], ..Default::default() },
            _ => Color { r: v[0], g: v[1], b: v[2] }
        }
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// The color black.
    pub fn black() -> Color {
        Color {
            r: 0.0,
            g: 0.0,
            b: 0.0
        }
    }

    /// The color white.
    pub fn white() -> Color {
        Color {
            r: 1.0,
            g: 1.0,
            b: 1.0
        }
    }

    /// The sky color returned by rays which escape the scene.
    pub fn background() -> Color {
        let (r, g, b) = BACKGROUND_RGB;

        Color {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Quantizes the color to 8-bit channels.
    ///
    /// Each channel is clamped to 0.0 through 1.0, scaled to 255 and rounded
    /// to the nearest integer.
    ///
    /// # Examples
    ///
    /// ```
    /// # use whitted_tracer::color::Color;
    /// let c = Color::rgb(1.5, 0.5, -0.2);
    /// assert_eq!(c.to_rgb8(), [255, 128, 0]);
    /// ```
    pub fn to_rgb8(&self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

/// Adds two colors together.
///
/// Components are added together individually.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

/// Multiplies a color by a scalar.
///
/// Each component is multiplied by the scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

/// Multiplies a scalar by a color.
impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        other * self
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);
    let c3 = Color { r: 1.6, g: 0.7, b: 1.0 };

    assert_eq!(c1 + c2, c3);
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(0.2, 0.3, 0.4);
    let c2 = Color { r: 0.4, g: 0.6, b: 0.8 };

    assert_eq!(c1 * 2.0, c2);
    assert_eq!(2.0 * c1, c2);
}

#[test]
fn background_round_trips_through_quantization() {
    assert_eq!(Color::background().to_rgb8(), [55, 176, 202]);
}

#[test]
fn quantize_clamps_and_rounds() {
    assert_eq!(Color::black().to_rgb8(), [0, 0, 0]);
    assert_eq!(Color::white().to_rgb8(), [255, 255, 255]);
    assert_eq!(Color::rgb(2.0, -1.0, 0.001).to_rgb8(), [255, 0, 0]);
    assert_eq!(Color::rgb(0.2, 0.6, 0.999).to_rgb8(), [51, 153, 255]);
}

#[test]
fn color_from_short_slice() {
    let v: &[f64] = &[0.5, 0.25];

    assert_eq!(Color::from(v), Color::rgb(0.5, 0.25, 0.0));
}
