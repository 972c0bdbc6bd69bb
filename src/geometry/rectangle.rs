use std::f64::consts::{PI, TAU};

use crate::error::{GeometryError, Result};
use crate::math::negative_pi_to_pi;

use super::Cartographic;

/// A geographic rectangle bounded by two meridians and two parallels, in
/// radians.
///
/// `west > east` means the rectangle crosses the antimeridian.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rectangle {
    /// Westernmost longitude.
    pub west: f64,
    /// Southernmost latitude.
    pub south: f64,
    /// Easternmost longitude.
    pub east: f64,
    /// Northernmost latitude.
    pub north: f64,
}

impl Rectangle {
    /// Creates a new rectangle from radians.
    #[must_use]
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Creates a new rectangle from degrees.
    #[must_use]
    pub fn from_degrees(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self::new(
            west.to_radians(),
            south.to_radians(),
            east.to_radians(),
            north.to_radians(),
        )
    }

    /// East edge unwrapped past the antimeridian, so that `east >= west`.
    fn unwrapped_east(&self) -> f64 {
        if self.east < self.west {
            self.east + TAU
        } else {
            self.east
        }
    }

    /// Angular width, accounting for antimeridian crossing.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.unwrapped_east() - self.west
    }

    /// Angular height, `north - south`. Negative for inverted rectangles.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Returns `true` if the rectangle contains the equator in its interior.
    #[must_use]
    pub fn straddles_equator(&self) -> bool {
        self.south < 0.0 && self.north > 0.0
    }

    /// Geographic center at zero height. The longitude is wrapped into
    /// `[-pi, pi]`.
    #[must_use]
    pub fn center(&self) -> Cartographic {
        Cartographic::new(
            negative_pi_to_pi((self.west + self.unwrapped_east()) * 0.5),
            (self.south + self.north) * 0.5,
            0.0,
        )
    }

    /// Checks `0 <= width <= 2*pi` and `0 <= height <= pi`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidRectangle`] naming the first violated
    /// range.
    pub fn validate(&self) -> Result<()> {
        let width = self.width();
        if !(0.0..=TAU).contains(&width) {
            return Err(GeometryError::InvalidRectangle {
                parameter: "width",
                value: width,
                min: 0.0,
                max: TAU,
            }
            .into());
        }
        let height = self.height();
        if !(0.0..=PI).contains(&height) {
            return Err(GeometryError::InvalidRectangle {
                parameter: "height",
                value: height,
                min: 0.0,
                max: PI,
            }
            .into());
        }
        Ok(())
    }
}
