/// Numerical tolerances shared by collision records.
///
/// Every record copies the tolerances in force when it is created,
/// so changing them affects only records built afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct Tolerances {
    /// Gap below which bodies are considered touching.
    pub distance_tol: f64,
    /// Normal velocity below which touching bodies are in resting contact
    /// rather than colliding.
    pub velocity_tol: f64,
    /// Fraction of the target gap a detected collision may deviate by
    /// before the search driver should refine the collision time.
    pub accuracy: f64,
    /// Nearness used for deduplication when both sides of a contact are straight.
    pub straight_nearness: f64,
    /// Minimum absolute dot product of two normals for their contacts to count as similar.
    pub normal_similarity: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            distance_tol: 0.01,
            velocity_tol: 0.5,
            accuracy: 0.6,
            straight_nearness: 0.1,
            normal_similarity: 0.9,
        }
    }
}

impl Tolerances {
    pub fn with_distance_tol(mut self, distance_tol: f64) -> Self {
        self.distance_tol = distance_tol;
        self
    }

    pub fn with_velocity_tol(mut self, velocity_tol: f64) -> Self {
        self.velocity_tol = velocity_tol;
        self
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_straight_nearness(mut self, nearness: f64) -> Self {
        self.straight_nearness = nearness;
        self
    }

    pub fn with_normal_similarity(mut self, similarity: f64) -> Self {
        self.normal_similarity = similarity;
        self
    }

    /// The gap a collision search aims for when it stops at a collision.
    #[inline]
    pub fn target_gap(&self) -> f64 {
        self.distance_tol / 2.0
    }

    /// How far apart two contact points may be and still describe the same contact,
    /// given the smaller radius of curvature involved.
    ///
    /// This is the distance along a tangent at which a circle of that radius
    /// departs from the tangent by `distance_tol`. Straight surfaces (infinite radius)
    /// use `straight_nearness` instead.
    pub fn nearness(&self, radius: f64) -> f64 {
        if radius.is_finite() {
            let d = self.distance_tol;
            (2.0 * radius * d + d * d).sqrt()
        } else {
            self.straight_nearness
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearness_grows_with_radius() {
        let tol = Tolerances::default();
        let small = tol.nearness(0.1);
        let large = tol.nearness(10.0);
        assert!(small < large);
        // circle of radius 0.5 with distance_tol 0.01: sqrt(0.01 + 0.0001)
        assert!((tol.nearness(0.5) - 0.0101f64.sqrt()).abs() < 1e-12);
        assert_eq!(tol.nearness(f64::INFINITY), tol.straight_nearness);
        assert_eq!(tol.target_gap(), 0.005);
    }

    #[test]
    fn setters_chain() {
        let tol = Tolerances::default()
            .with_distance_tol(0.02)
            .with_normal_similarity(0.95);
        assert_eq!(tol.distance_tol, 0.02);
        assert_eq!(tol.normal_similarity, 0.95);
        assert_eq!(tol.velocity_tol, Tolerances::default().velocity_tol);
    }

    #[cfg(feature = "serde-types")]
    #[test]
    fn partial_config_fills_in_defaults() {
        let tol: Tolerances = ron::from_str("(distance_tol: 0.05, accuracy: 0.3)").unwrap();
        assert_eq!(tol.distance_tol, 0.05);
        assert_eq!(tol.accuracy, 0.3);
        assert_eq!(tol.straight_nearness, 0.1);

        let text = ron::to_string(&tol).unwrap();
        let back: Tolerances = ron::from_str(&text).unwrap();
        assert_eq!(back, tol);
    }
}
