use std::f32::consts::PI;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// An angle measured in radians.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Radian(pub f32);

/// An angle measured in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Degree(pub f32);

/// Maps `value` into `[0, turn)` with floor-based wraparound, so negative inputs land on the
/// equivalent positive angle instead of staying negative as `%` would leave them.
fn wrap_into_turn(value: f32, turn: f32) -> f32 {
    let wrapped = value - turn * (value / turn).floor();
    // `value / turn` may round across an integer, landing just outside the range.
    if wrapped < 0.0 {
        let wrapped = wrapped + turn;
        if wrapped >= turn {
            0.0
        } else {
            wrapped
        }
    } else if wrapped >= turn {
        0.0
    } else {
        wrapped
    }
}

impl Radian {
    pub const FULL_TURN: Radian = Radian(2.0 * PI);

    pub fn to_degree(self) -> Degree {
        Degree(self.0.to_degrees())
    }
    pub fn value(self) -> f32 {
        self.0
    }
    pub fn sin(self) -> f32 {
        self.0.sin()
    }
    pub fn cos(self) -> f32 {
        self.0.cos()
    }
    pub fn tan(self) -> f32 {
        self.0.tan()
    }
    pub fn sin_cos(self) -> (f32, f32) {
        self.0.sin_cos()
    }

    /// Returns the equivalent angle in `[0, 2π)`.
    /// ```
    /// use math::Radian;
    /// use std::f32::consts::PI;
    /// let r = Radian(-0.5 * PI).reduce_to_one_turn();
    /// assert!((r.0 - 1.5 * PI).abs() < 1e-5);
    /// ```
    pub fn reduce_to_one_turn(self) -> Radian {
        Radian(wrap_into_turn(self.0, Self::FULL_TURN.0))
    }
}

impl Degree {
    pub const FULL_TURN: Degree = Degree(360.0);

    pub fn to_radian(self) -> Radian {
        Radian(self.0.to_radians())
    }
    pub fn value(self) -> f32 {
        self.0
    }
    pub fn sin_cos(self) -> (f32, f32) {
        self.to_radian().sin_cos()
    }

    /// Returns the equivalent angle in `[0, 360)`.
    /// ```
    /// use math::Degree;
    /// assert_eq!(Degree(-450.0).reduce_to_one_turn(), Degree(270.0));
    /// assert_eq!(Degree(725.0).reduce_to_one_turn(), Degree(5.0));
    /// ```
    pub fn reduce_to_one_turn(self) -> Degree {
        Degree(wrap_into_turn(self.0, Self::FULL_TURN.0))
    }
}

impl From<Degree> for Radian {
    fn from(d: Degree) -> Self {
        d.to_radian()
    }
}
impl From<Radian> for Degree {
    fn from(r: Radian) -> Self {
        r.to_degree()
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}deg", self.0)
    }
}
impl fmt::Display for Radian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}rad", self.0)
    }
}

// Arithmetic stays within one unit; mixing needs an explicit conversion.
macro_rules! angle_arithmetic {
    ($unit:ident) => {
        impl Add for $unit {
            type Output = $unit;
            fn add(self, rhs: $unit) -> $unit {
                $unit(self.0 + rhs.0)
            }
        }
        impl Sub for $unit {
            type Output = $unit;
            fn sub(self, rhs: $unit) -> $unit {
                $unit(self.0 - rhs.0)
            }
        }
        impl Neg for $unit {
            type Output = $unit;
            fn neg(self) -> $unit {
                $unit(-self.0)
            }
        }
        impl Mul<f32> for $unit {
            type Output = $unit;
            fn mul(self, s: f32) -> $unit {
                $unit(self.0 * s)
            }
        }
        impl Div<f32> for $unit {
            type Output = $unit;
            fn div(self, s: f32) -> $unit {
                $unit(self.0 / s)
            }
        }
    };
}

angle_arithmetic!(Radian);
angle_arithmetic!(Degree);
