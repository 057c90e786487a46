//! Snap-to-grid arithmetic.
//!
//! Rounding is to the nearest multiple of the grid unit with ties going away
//! from zero: with a unit of 20, `10` snaps to `20` and `-10` to `-20`.
//! A unit below 1 turns snapping off and returns the value unchanged.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Grid spacing used when no config overrides it.
pub const DEFAULT_GRID_UNIT: i32 = 20;

/// An integer canvas coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Snap both axes to `unit`.
    #[must_use]
    pub fn snapped(self, unit: i32) -> Self {
        Self {
            x: snap(self.x, unit),
            y: snap(self.y, unit),
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// Round `value` to the nearest multiple of `unit` (ties away from zero).
#[must_use]
pub fn snap(value: i32, unit: i32) -> i32 {
    if unit < 1 {
        return value;
    }
    let unit = i64::from(unit);
    let magnitude = i64::from(value).abs();
    let rounded = (magnitude + unit / 2) / unit * unit;
    let signed = if value < 0 { -rounded } else { rounded };
    // Values near i32::MAX can round one unit past the range; pull back inside.
    if signed > i64::from(i32::MAX) {
        (signed - unit) as i32
    } else if signed < i64::from(i32::MIN) {
        (signed + unit) as i32
    } else {
        signed as i32
    }
}

/// Whether `value` already lies on the grid.
pub fn is_aligned(value: i32, unit: i32) -> bool {
    unit < 1 || value % unit == 0
}
