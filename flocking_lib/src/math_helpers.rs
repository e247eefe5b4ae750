use glam::Vec2;

/// Scales a vector to unit length, a zero vector stays zero instead of turning into NaN
pub fn normalize(v: Vec2) -> Vec2 {
    let magnitude = (v.x * v.x + v.y * v.y).sqrt();
    if magnitude == 0. {
        return Vec2::ZERO;
    }

    Vec2::new(v.x / magnitude, v.y / magnitude)
}

/// Euclidean distance in between points p1 and p2
pub fn distance(p1: Vec2, p2: Vec2) -> f32 {
    distance_sq(p1, p2).sqrt()
}

pub fn distance_sq(p1: Vec2, p2: Vec2) -> f32 {
    (p1.x - p2.x).powi(2) + (p1.y - p2.y).powi(2)
}

/// Mean of a sum of `count` vectors, zero when nothing was summed
#[inline]
pub fn mean(sum: Vec2, count: usize) -> Vec2 {
    if count == 0 {
        Vec2::ZERO
    } else {
        sum / count as f32
    }
}

// glam's own rotate moved around in between minor versions,
// so the complex multiplication is kept here
pub(crate) trait MyRotate {
    fn rotate(&self, rhs: Vec2) -> Self;
}

impl MyRotate for Vec2 {
    /// Rotates by the angle of `rhs`, which is expected to be a unit vector
    #[inline]
    fn rotate(&self, rhs: Vec2) -> Self {
        Vec2::new(
            self.x * rhs.x - self.y * rhs.y,
            self.y * rhs.x + self.x * rhs.y,
        )
    }
}
