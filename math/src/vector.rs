use crate::error::{MathError, MathResult};
use crate::float::Magnitude;
use std::convert::TryFrom;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub, SubAssign};

/// Fixed-size vector of `N` `f32` components.
///
/// Components can be accessed using indices `v[i]`, or through the named aliases `x/y/z/w` and
/// `r/g/b/a` that sizes 2, 3 and 4 provide. Aliases read and write the same storage:
/// ```
/// let mut color = math::vec4(0.1, 0.2, 0.3, 1.0);
/// color.set_g(0.9);
/// assert_eq!(color.y(), 0.9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<const N: usize> {
    pub data: [f32; N],
}

pub type Vec2 = Vector<2>;
pub type Vec3 = Vector<3>;
pub type Vec4 = Vector<4>;

pub fn vec2(x: f32, y: f32) -> Vec2 {
    Vector::new([x, y])
}

pub fn vec3(x: f32, y: f32, z: f32) -> Vec3 {
    Vector::new([x, y, z])
}

pub fn vec4(x: f32, y: f32, z: f32, w: f32) -> Vec4 {
    Vector::new([x, y, z, w])
}

impl<const N: usize> Vector<N> {
    pub const ZERO: Self = Self { data: [0.0; N] };

    pub const fn new(data: [f32; N]) -> Self {
        Self { data }
    }

    /// Returns a vector with 1.0 at `axis` and zeros elsewhere.
    pub fn unit(axis: usize) -> Self {
        let mut v = Self::ZERO;
        v[axis] = 1.0;
        v
    }

    pub const fn size(&self) -> usize {
        N
    }

    pub fn as_array(&self) -> [f32; N] {
        self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f32> {
        self.data.iter()
    }

    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        let mut res = self;
        res.data.iter_mut().for_each(|x| *x = f(*x));
        res
    }

    fn zip_with(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        let mut res = self;
        for (x, y) in res.data.iter_mut().zip(other.data.iter()) {
            *x = f(*x, *y);
        }
        res
    }

    pub fn dot(self, v: Self) -> f32 {
        self.data.iter().zip(v.data.iter()).map(|(a, b)| a * b).sum()
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }
    pub fn distance_to(self, other: Self) -> f32 {
        (self - other).length()
    }
    pub fn is_zero(self) -> bool {
        self.length_squared() == 0.0
    }
    pub fn is_finite(self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// Returns a unit-length copy of `self`.
    /// Fails with `DegenerateVector` if the length is zero, NaN or infinite.
    /// ```
    /// use math::{vec3, MathError};
    /// let v = vec3(3.0, 0.0, 4.0).normalized().unwrap();
    /// assert!((v.length() - 1.0).abs() < 1e-6);
    /// assert_eq!(vec3(0.0, 0.0, 0.0).normalized(), Err(MathError::DegenerateVector));
    /// ```
    pub fn normalized(self) -> MathResult<Self> {
        let length = self.length();
        if length == 0.0 || !length.is_finite() {
            return Err(MathError::DegenerateVector);
        }
        Ok(self / length)
    }

    /// Normalizes `self` IN PLACE. On error `self` is left untouched.
    pub fn normalize(&mut self) -> MathResult<()> {
        *self = self.normalized()?;
        Ok(())
    }

    /// Projects `self` onto `other`. `other` must be non-zero.
    pub fn projected_onto(self, other: Self) -> Self {
        other * (self.dot(other) / other.length_squared())
    }
}

impl Vec2 {
    pub const X: Vec2 = Vector::new([1.0, 0.0]);
    pub const Y: Vec2 = Vector::new([0.0, 1.0]);

    /// 2D cross product, i.e., the z-component of the 3D cross product of the two vectors lying
    /// in the xy-plane.
    pub fn cross(self, v: Vec2) -> f32 {
        self[0] * v[1] - self[1] * v[0]
    }

    pub fn extend(self, z: f32) -> Vec3 {
        vec3(self[0], self[1], z)
    }
}

impl Vec3 {
    pub const X: Vec3 = Vector::new([1.0, 0.0, 0.0]);
    pub const Y: Vec3 = Vector::new([0.0, 1.0, 0.0]);
    pub const Z: Vec3 = Vector::new([0.0, 0.0, 1.0]);

    pub fn cross(self, v: Vec3) -> Vec3 {
        // x1 y1 z1
        // x2 y2 z2
        // i  j  k
        vec3(
            self[1] * v[2] - self[2] * v[1],
            self[2] * v[0] - self[0] * v[2],
            self[0] * v[1] - self[1] * v[0],
        )
    }

    pub fn extend(self, w: f32) -> Vec4 {
        vec4(self[0], self[1], self[2], w)
    }
    pub fn truncate(self) -> Vec2 {
        vec2(self[0], self[1])
    }
}

impl Vec4 {
    pub const X: Vec4 = Vector::new([1.0, 0.0, 0.0, 0.0]);
    pub const Y: Vec4 = Vector::new([0.0, 1.0, 0.0, 0.0]);
    pub const Z: Vec4 = Vector::new([0.0, 0.0, 1.0, 0.0]);
    pub const W: Vec4 = Vector::new([0.0, 0.0, 0.0, 1.0]);

    /// Cross product of the xyz parts; the resulting w is 0.
    pub fn cross3(self, v: Vec4) -> Vec4 {
        self.truncate().cross(v.truncate()).extend(0.0)
    }

    pub fn truncate(self) -> Vec3 {
        vec3(self[0], self[1], self[2])
    }
}

// Named component aliases. `x/r`, `y/g`, `z/b` and `w/a` share storage.
macro_rules! component_alias {
    ($($size:literal => [$(($get:ident, $alias:ident, $set:ident, $set_alias:ident, $i:literal)),*]);* $(;)?) => {
        $($(
            impl Vector<$size> {
                pub fn $get(&self) -> f32 {
                    self.data[$i]
                }
                pub fn $alias(&self) -> f32 {
                    self.data[$i]
                }
                pub fn $set(&mut self, value: f32) {
                    self.data[$i] = value;
                }
                pub fn $set_alias(&mut self, value: f32) {
                    self.data[$i] = value;
                }
            }
        )*)*
    };
}

component_alias! {
    2 => [(x, r, set_x, set_r, 0), (y, g, set_y, set_g, 1)];
    3 => [(x, r, set_x, set_r, 0), (y, g, set_y, set_g, 1), (z, b, set_z, set_b, 2)];
    4 => [
        (x, r, set_x, set_r, 0),
        (y, g, set_y, set_g, 1),
        (z, b, set_z, set_b, 2),
        (w, a, set_w, set_a, 3)
    ];
}

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> fmt::Display for Vector<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(2);
        write!(f, "(")?;
        for (i, x) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.p$}", x, p = precision)?;
        }
        write!(f, ")")
    }
}

impl<const N: usize> Add for Vector<N> {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }
}
impl<const N: usize> AddAssign for Vector<N> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl<const N: usize> Sub for Vector<N> {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a - b)
    }
}
impl<const N: usize> SubAssign for Vector<N> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
impl<const N: usize> Neg for Vector<N> {
    type Output = Self;
    fn neg(self) -> Self {
        self.map(|x| -x)
    }
}
impl<const N: usize> Mul<f32> for Vector<N> {
    type Output = Self;
    fn mul(self, s: f32) -> Self {
        self.map(|x| x * s)
    }
}
impl<const N: usize> Mul<Vector<N>> for f32 {
    type Output = Vector<N>;
    fn mul(self, v: Vector<N>) -> Vector<N> {
        v * self
    }
}
impl<const N: usize> Div<f32> for Vector<N> {
    type Output = Self;
    fn div(self, s: f32) -> Self {
        self.map(|x| x / s)
    }
}

impl<const N: usize> Index<usize> for Vector<N> {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        &self.data[i]
    }
}
impl<const N: usize> IndexMut<usize> for Vector<N> {
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.data[i]
    }
}

impl<const N: usize> From<[f32; N]> for Vector<N> {
    fn from(data: [f32; N]) -> Self {
        Self::new(data)
    }
}
impl<const N: usize> From<Vector<N>> for [f32; N] {
    fn from(v: Vector<N>) -> Self {
        v.data
    }
}

/// Builds a vector from runtime-sized data, e.g., a row of a generic `Matrix`.
impl<const N: usize> TryFrom<&[f32]> for Vector<N> {
    type Error = MathError;
    fn try_from(values: &[f32]) -> MathResult<Self> {
        if values.len() != N {
            return Err(MathError::DimensionMismatch {
                expected: N,
                actual: values.len(),
            });
        }
        let mut v = Self::ZERO;
        v.data.copy_from_slice(values);
        Ok(v)
    }
}

impl<const N: usize> Magnitude for Vector<N> {
    fn magnitude_squared(&self) -> f32 {
        self.length_squared()
    }
}

// Interop with glam for consumers that already use it.
// -------------------------------------------------------------------------------------------------
impl From<Vec3> for glam::Vec3 {
    fn from(v: Vec3) -> Self {
        glam::Vec3::new(v[0], v[1], v[2])
    }
}
impl From<glam::Vec3> for Vec3 {
    fn from(v: glam::Vec3) -> Self {
        vec3(v.x, v.y, v.z)
    }
}
impl From<Vec4> for glam::Vec4 {
    fn from(v: Vec4) -> Self {
        glam::Vec4::new(v[0], v[1], v[2], v[3])
    }
}
impl From<glam::Vec4> for Vec4 {
    fn from(v: glam::Vec4) -> Self {
        vec4(v.x, v.y, v.z, v.w)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{assert_close, assert_le};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_arithmetic() {
        let a = vec3(1.0, 2.0, 3.0);
        let b = vec3(-1.0, 0.5, 2.0);
        assert_eq!(a + b, vec3(0.0, 2.5, 5.0));
        assert_eq!(a - b, vec3(2.0, 1.5, 1.0));
        assert_eq!(-a, vec3(-1.0, -2.0, -3.0));
        assert_eq!(a * 2.0, 2.0 * a);
        assert_eq!(a / 2.0, vec3(0.5, 1.0, 1.5));
        assert_eq!(a.dot(b), -1.0 + 1.0 + 6.0);
    }

    #[test]
    fn test_cross() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::X), -Vec3::Z);
        assert_eq!(vec2(1.0, 0.0).cross(vec2(0.0, 2.0)), 2.0);
        assert_eq!(vec4(1.0, 0.0, 0.0, 5.0).cross3(vec4(0.0, 1.0, 0.0, 7.0)), Vec4::Z);
    }

    #[test]
    fn test_normalize() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let v = vec3(
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
            );
            let n = v.normalized().unwrap();
            assert_le!((n.length() - 1.0).abs(), 1e-5);
            assert_le!(n.cross(v).length(), 1e-3);
        }
        assert_eq!(Vec4::ZERO.normalized(), Err(MathError::DegenerateVector));
    }

    #[test]
    fn test_normalize_in_place() {
        let mut v = vec2(0.0, -4.0);
        v.normalize().unwrap();
        assert_eq!(v, vec2(0.0, -1.0));

        let mut zero = Vec2::ZERO;
        assert_eq!(zero.normalize(), Err(MathError::DegenerateVector));
        assert_eq!(zero, Vec2::ZERO);
    }

    #[test]
    fn test_aliases_share_storage() {
        let mut v = vec3(1.0, 2.0, 3.0);
        v.set_r(7.0);
        assert_eq!(v.x(), 7.0);
        v.set_z(-1.0);
        assert_eq!(v.b(), -1.0);
        v[1] = 4.0;
        assert_eq!(v.g(), 4.0);
    }

    #[test]
    fn test_try_from_slice() {
        let values = [1.0, 2.0, 3.0];
        let v = Vec3::try_from(&values[..]).unwrap();
        assert_eq!(v, vec3(1.0, 2.0, 3.0));
        assert_eq!(
            Vec4::try_from(&values[..]),
            Err(MathError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_projection() {
        let a = vec3(1.0, 2.5, 0.0);
        let b = vec3(0.6, 0.0, 0.0);
        let c = b - b.projected_onto(a);
        assert_le!(c.dot(a).abs(), 1e-6);
        assert_close!(vec3(2.0, 3.0, 0.0).projected_onto(Vec3::X), vec3(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", vec3(1.0, 0.5, -2.0)), "(1.00, 0.50, -2.00)");
        assert_eq!(format!("{:.1}", vec2(1.0, 0.3)), "(1.0, 0.3)");
    }
}
