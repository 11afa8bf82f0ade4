/// Tolerance used uniformly for near-zero and coincidence tests across the workspace.
pub const EPSILON: f32 = 1e-6;

/// Computes the linear interpolation between `a` and `b`: (0, 1) -> (a, b).
///
/// This function also works if `a` and `b` are not "Scalable" by themselves - as long as `a-b` can
/// be scaled by a `f32`, and the difference can be added to either `a` or `b` to get back `T` then
/// `lerp` can be used.
/// ```
/// use math::{float::lerp, vec3};
/// let mid = lerp(vec3(0.0, 0.0, -1.0), vec3(0.0, 2.0, 1.0), 0.5);
/// assert_eq!(mid, vec3(0.0, 1.0, 0.0));
/// assert_eq!(lerp(2.0f32, 4.0, 0.25), 2.5);
/// ```
pub fn lerp<T, U>(a: T, b: T, t: f32) -> T
where
    T: Copy + std::ops::Sub<T, Output = U>,
    U: Copy + std::ops::Mul<f32, Output = U> + std::ops::Add<T, Output = T>,
{
    (b - a) * t + a
}

pub trait Float: Sized {
    /// Computes `x / y` if y is nonzero; returns `None` if y is zero.
    fn try_divide(self, divisor: Self) -> Option<Self>;
    /// Returns true if `self` is within [`EPSILON`] of zero.
    fn is_near_zero(self) -> bool;
}

impl Float for f32 {
    /// ```
    /// use math::float::Float;
    /// assert_eq!(1.0f32.try_divide(0.0), None);
    /// assert_eq!(1.0f32.try_divide(2.5), Some(0.4));
    /// assert_eq!(0.0f32.try_divide(0.0), None);
    /// assert_eq!(0.0f32.try_divide(2.5), Some(0.0));
    /// ```
    fn try_divide(self, divisor: Self) -> Option<Self> {
        if divisor == 0.0 {
            None
        } else {
            Some(self / divisor)
        }
    }

    fn is_near_zero(self) -> bool {
        self.abs() < EPSILON
    }
}

/// Squared magnitude of a math quantity: `x^2` for scalars, squared length for vectors, squared
/// Frobenius norm for matrices. Used by `assert_close!` to compare any of them.
pub trait Magnitude {
    fn magnitude_squared(&self) -> f32;
}

impl Magnitude for f32 {
    fn magnitude_squared(&self) -> f32 {
        self * self
    }
}

#[macro_export]
macro_rules! assert_le {
    ($left:expr, $right:expr) => {
        if $left > $right {
            panic!(
                "Assertion failed: {} <= {} (values: {} vs. {})",
                stringify!($left),
                stringify!($right),
                $left,
                $right
            )
        }
    };
}

#[macro_export]
macro_rules! assert_lt {
    ($left:expr, $right:expr) => {
        if $left >= $right {
            panic!(
                "Assertion failed: {} < {} (values: {} vs. {})",
                stringify!($left),
                stringify!($right),
                $left,
                $right
            )
        }
    };
}

#[macro_export]
macro_rules! assert_gt {
    ($left:expr, $right:expr) => {
        if $left <= $right {
            panic!(
                "Assertion failed: {} > {} (values: {} vs. {})",
                stringify!($left),
                stringify!($right),
                $left,
                $right
            )
        }
    };
}

#[macro_export]
macro_rules! assert_ge {
    ($left:expr, $right:expr) => {
        if $left < $right {
            panic!(
                "Assertion failed: {} >= {} (values: {} vs. {})",
                stringify!($left),
                stringify!($right),
                $left,
                $right
            )
        }
    };
}

/// Asserts that two scalars, vectors or matrices are close: the squared magnitude of their
/// difference is at most `1e-4`, or the given tolerance.
#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr) => {
        $crate::assert_close!($left, $right, 1e-4)
    };
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let dist2 = $crate::float::Magnitude::magnitude_squared(&($left - $right));
        if dist2 > $tolerance {
            panic!(
                "Assertion failed: Close({}, {}) values: {} vs. {}, dist = {}",
                stringify!($left),
                stringify!($right),
                $left,
                $right,
                dist2.sqrt()
            )
        }
    }};
}
