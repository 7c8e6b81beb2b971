pub mod math {
    use glam::Vec3;

    pub fn degree_to_radian(degree: f32) -> f32 {
        degree * std::f32::consts::PI / 180.0
    }

    /// Blend `a` towards `b` by `mix`.
    pub fn mix(a: f32, b: f32, mix: f32) -> f32 {
        b * mix + a * (1.0 - mix)
    }

    /// Unit vector with the direction of `v`. A zero vector is returned as is.
    pub fn normalized(v: Vec3) -> Vec3 {
        let len2 = v.length_squared();
        if len2 > 0.0 {
            v * (1.0 / len2.sqrt())
        } else {
            v
        }
    }

    /// Mirror `direction` about `normal`.
    pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
        direction - normal * 2.0 * direction.dot(normal)
    }

    /// Bend `direction` through a boundary with relative index `eta`.
    ///
    /// `normal` must face against `direction`. Returns `None` on total
    /// internal reflection.
    pub fn refract(direction: Vec3, normal: Vec3, eta: f32) -> Option<Vec3> {
        let cos_i = -normal.dot(direction);
        let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
        if k < 0.0 {
            return None;
        }
        Some(direction * eta + normal * (eta * cos_i - k.sqrt()))
    }

}
