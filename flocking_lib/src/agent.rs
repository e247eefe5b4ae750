use glam::f32::Vec2;

use crate::{
    geometry,
    math_helpers::{distance, mean, normalize},
    options::{PlaneSize, Tunable, Tunables},
};

pub const DEFAULT_MASS: f32 = 1.;
pub const DEFAULT_MAX_SPEED: f32 = 0.5;

/// Added to the separation distance so coincident neighbours do not blow the force up
const SEPARATION_SOFTENING: f32 = 0.01;

/// Below this distance to the neighbourhood's centre the cohesion pull tapers off linearly
const COHESION_TAPER_DISTANCE: f32 = 50.;

#[derive(Debug, Clone, Copy)]
pub struct Agent {
    // sequential id starting from 0
    pub id: usize,
    pub position: Vec2,
    pub velocity: Vec2,
    acceleration: Vec2,
    mass: f32,
    max_speed: f32,
    plane: PlaneSize,
    wrap: bool,
    tunables: Tunables,
    // number of tunable writes received
    revision: u64,
}

impl Agent {
    /// Creates a new [`Agent`] at rest with unit mass and the default speed limit.
    pub fn new(id: usize, position: Vec2, plane: PlaneSize, wrap: bool, tunables: Tunables) -> Self {
        Agent {
            id,
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass: DEFAULT_MASS,
            max_speed: DEFAULT_MAX_SPEED,
            plane,
            wrap,
            tunables,
            revision: 0,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Mass must be non-zero, forces are divided by it
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Heading in radians, (-π, π]
    pub fn heading(&self) -> f32 {
        self.velocity.y.atan2(self.velocity.x)
    }

    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn plane(&self) -> PlaneSize {
        self.plane
    }

    pub fn wraps(&self) -> bool {
        self.wrap
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_tunable(&mut self, tunable: Tunable, value: f32) {
        self.tunables.set(tunable, value);
        self.revision += 1;
    }

    pub fn outline(&self, side_length: f32) -> [Vec2; 4] {
        geometry::outline(self.position, self.heading(), side_length)
    }

    /// Accumulates a force, effects of repeated calls add up until the next position update
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force / self.mass;
    }

    /// Runs all three rules against the same neighbours, then moves
    pub fn update(&mut self, neighbours: &[&Agent]) {
        let separation = self.separation(neighbours);
        let cohesion = self.cohesion(neighbours);
        let alignment = self.alignment(neighbours);

        self.apply_force(separation);
        self.apply_force(cohesion);
        self.apply_force(alignment);
        self.update_position();
    }

    pub fn separation(&self, neighbours: &[&Agent]) -> Vec2 {
        let mut res = Vec2::ZERO;
        let mut count = 0;

        for other in neighbours {
            let distance = distance(self.position, other.position);
            if distance < self.tunables.separation_distance {
                // pointing away from the neighbour, the closer the stronger
                let away = normalize(self.position - other.position);
                res += away / (distance + SEPARATION_SOFTENING);
                count += 1;
            }
        }

        if count > 0 {
            mean(res, count) * self.tunables.separation_strength
        } else {
            Vec2::ZERO
        }
    }

    pub fn cohesion(&self, neighbours: &[&Agent]) -> Vec2 {
        let mut center = Vec2::ZERO;
        let mut count = 0;

        for other in neighbours {
            if distance(self.position, other.position) < self.tunables.cohesion_distance {
                center += other.position;
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        let displacement = mean(center, count) - self.position;
        let distance = displacement.length();
        let mut desired = normalize(displacement);

        if distance < COHESION_TAPER_DISTANCE {
            desired *= distance / COHESION_TAPER_DISTANCE;
        }

        desired * self.tunables.cohesion_strength
    }

    pub fn alignment(&self, neighbours: &[&Agent]) -> Vec2 {
        let mut avg = Vec2::ZERO;
        let mut count = 0;

        for other in neighbours {
            if distance(self.position, other.position) < self.tunables.alignment_distance {
                avg += other.velocity;
                count += 1;
            }
        }

        mean(avg, count) * self.tunables.alignment_strength
    }

    // Actually shifts the individual's location
    pub fn update_position(&mut self) {
        self.velocity += self.acceleration;

        // per axis, so a diagonal heading may go up to max_speed * √2
        self.velocity.x = Self::clamp_axis(self.velocity.x, self.max_speed);
        self.velocity.y = Self::clamp_axis(self.velocity.y, self.max_speed);

        if self.wrap {
            self.position.x = Self::wrap_axis(self.position.x + self.velocity.x, self.plane.width);
            self.position.y = Self::wrap_axis(self.position.y + self.velocity.y, self.plane.height);
        } else {
            self.position += self.velocity;
        }

        self.acceleration = Vec2::ZERO;
    }

    #[inline]
    fn clamp_axis(v: f32, max: f32) -> f32 {
        if v.abs() > max {
            v.signum() * max
        } else {
            v
        }
    }

    /// Remainder keeps the sign of the dividend, anything that left through the
    /// low edge re-enters at the full extent rather than at 0.
    #[inline]
    fn wrap_axis(p: f32, extent: f32) -> f32 {
        let wrapped = p % extent;
        if wrapped < 0. {
            extent
        } else {
            wrapped
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec2;
    use rstest::rstest;

    use super::Agent;
    use crate::options::{PlaneSize, Tunable, Tunables};

    macro_rules! assert_eqf32 {
        ($x:expr, $y:expr) => {
            assert_relative_eq!($x, $y, epsilon = 1e-5_f32)
        };
    }

    fn all_on() -> Tunables {
        Tunables {
            separation_strength: 1.,
            separation_distance: 30.,
            alignment_strength: 0.5,
            alignment_distance: 40.,
            cohesion_strength: 0.1,
            cohesion_distance: 100.,
        }
    }

    fn agent_at(x: f32, y: f32, wrap: bool, tunables: Tunables) -> Agent {
        Agent::new(0, Vec2::new(x, y), PlaneSize::new(100., 100.), wrap, tunables)
    }

    #[test]
    fn new_agent_is_at_rest() {
        let a = agent_at(10., 20., true, all_on());

        assert_eq!(a.velocity, Vec2::ZERO);
        assert_eq!(a.acceleration(), Vec2::ZERO);
        assert_eq!(a.mass(), 1.);
        assert_eq!(a.max_speed(), 0.5);
        assert_eq!(a.revision(), 0);
    }

    #[rstest]
    #[case(Vec2::new(1., 0.), 0.)]
    #[case(Vec2::new(0., 1.), std::f32::consts::FRAC_PI_2)]
    #[case(Vec2::new(-1., 0.), std::f32::consts::PI)]
    #[case(Vec2::new(0., -2.), -std::f32::consts::FRAC_PI_2)]
    fn heading_is_atan2_of_velocity(#[case] velocity: Vec2, #[case] expected: f32) {
        let a = agent_at(0., 0., false, all_on()).with_velocity(velocity);
        assert_eqf32!(a.heading(), expected);
    }

    #[test]
    fn forces_accumulate_divided_by_mass() {
        let mut a = agent_at(0., 0., false, all_on()).with_mass(2.);

        a.apply_force(Vec2::new(1., -4.));
        a.apply_force(Vec2::new(1., 0.));

        assert_eq!(a.acceleration(), Vec2::new(1., -2.));
    }

    #[test]
    fn rules_without_neighbours_are_zero() {
        let a = agent_at(50., 50., false, all_on());

        assert_eq!(a.separation(&[]), Vec2::ZERO);
        assert_eq!(a.cohesion(&[]), Vec2::ZERO);
        assert_eq!(a.alignment(&[]), Vec2::ZERO);
    }

    #[test]
    fn lone_agent_drifts_by_its_velocity() {
        let mut a = agent_at(10., 10., false, all_on()).with_velocity(Vec2::new(0.3, -0.2));

        a.update(&[]);

        assert_eqf32!(a.position.x, 10.3);
        assert_eqf32!(a.position.y, 9.8);
        assert_eq!(a.velocity, Vec2::new(0.3, -0.2));
        assert_eq!(a.acceleration(), Vec2::ZERO);
    }

    #[test]
    fn neighbours_beyond_every_radius_are_ignored() {
        let a = agent_at(0., 0., false, all_on());
        let far = agent_at(500., 0., false, all_on()).with_velocity(Vec2::new(0.4, 0.4));

        assert_eq!(a.separation(&[&far]), Vec2::ZERO);
        assert_eq!(a.cohesion(&[&far]), Vec2::ZERO);
        assert_eq!(a.alignment(&[&far]), Vec2::ZERO);
    }

    #[test]
    fn separation_points_away_and_averages() {
        let a = agent_at(50., 50., false, all_on());
        let left = agent_at(40., 50., false, all_on());
        let below = agent_at(50., 45., false, all_on());

        let res = a.separation(&[&left, &below]);

        // (1/10.01, 0) and (0, 1/5.01) averaged, strength 1
        assert_eqf32!(res.x, 0.5 / 10.01);
        assert_eqf32!(res.y, 0.5 / 5.01);
    }

    #[test]
    fn separation_distance_is_strict() {
        let mut tunables = all_on();
        tunables.separation_distance = 10.;
        let a = agent_at(50., 50., false, tunables);
        let edge = agent_at(60., 50., false, tunables);

        assert_eq!(a.separation(&[&edge]), Vec2::ZERO);
    }

    #[test]
    fn separation_scales_with_strength() {
        let mut tunables = all_on();
        tunables.separation_strength = 3.;
        let a = agent_at(50., 50., false, tunables);
        let right = agent_at(52., 50., false, tunables);

        let res = a.separation(&[&right]);

        assert_eqf32!(res.x, -3. / 2.01);
        assert_eqf32!(res.y, 0.);
    }

    #[test]
    fn cohesion_is_full_strength_far_from_center() {
        let mut tunables = all_on();
        tunables.cohesion_distance = 200.;
        let a = agent_at(0., 0., false, tunables);
        let other = agent_at(60., 80., false, tunables);

        let res = a.cohesion(&[&other]);

        // distance 100 > 50, unit direction times strength
        assert_eqf32!(res.x, 0.06);
        assert_eqf32!(res.y, 0.08);
    }

    #[test]
    fn cohesion_tapers_near_center() {
        let a = agent_at(0., 0., false, all_on());
        let one = agent_at(10., 0., false, all_on());
        let two = agent_at(30., 0., false, all_on());

        let res = a.cohesion(&[&one, &two]);

        // centre at 20, 20/50 of the strength
        assert_eqf32!(res.x, 0.1 * 20. / 50.);
        assert_eqf32!(res.y, 0.);
    }

    #[test]
    fn alignment_averages_qualifying_velocities() {
        let a = agent_at(0., 0., false, all_on());
        let one = agent_at(10., 0., false, all_on()).with_velocity(Vec2::new(0.4, 0.));
        let two = agent_at(0., 10., false, all_on()).with_velocity(Vec2::new(0., -0.2));
        let far = agent_at(0., 45., false, all_on()).with_velocity(Vec2::new(5., 5.));

        let res = a.alignment(&[&one, &two, &far]);

        assert_eqf32!(res.x, 0.2 * 0.5);
        assert_eqf32!(res.y, -0.1 * 0.5);
    }

    #[test]
    fn rules_filter_independently() {
        let mut tunables = all_on();
        tunables.separation_distance = 5.;
        let a = agent_at(0., 0., false, tunables);
        let other = agent_at(20., 0., false, tunables);

        // cohesion neighbour without being a separation neighbour
        assert_eq!(a.separation(&[&other]), Vec2::ZERO);
        assert_ne!(a.cohesion(&[&other]), Vec2::ZERO);
    }

    #[rstest]
    #[case(Vec2::new(3., 0.2), Vec2::new(0.5, 0.2))]
    #[case(Vec2::new(-3., -3.), Vec2::new(-0.5, -0.5))]
    #[case(Vec2::new(0.1, -0.7), Vec2::new(0.1, -0.5))]
    #[case(Vec2::new(0.5, -0.5), Vec2::new(0.5, -0.5))]
    fn velocity_is_clamped_per_axis(#[case] force: Vec2, #[case] expected: Vec2) {
        let mut a = agent_at(50., 50., false, all_on());

        a.apply_force(force);
        a.update_position();

        assert_eq!(a.velocity, expected);
        assert!(a.velocity.x.abs() <= a.max_speed());
        assert!(a.velocity.y.abs() <= a.max_speed());
    }

    #[test]
    fn diagonal_speed_may_exceed_max_speed() {
        let mut a = agent_at(50., 50., false, all_on());

        a.apply_force(Vec2::new(10., 10.));
        a.update_position();

        assert_eqf32!(a.velocity.length(), 0.5 * 2_f32.sqrt());
    }

    #[test]
    fn acceleration_is_reset_after_moving() {
        let mut a = agent_at(50., 50., true, all_on());

        a.apply_force(Vec2::new(0.1, 0.1));
        a.update_position();

        assert_eq!(a.acceleration(), Vec2::ZERO);
    }

    #[test]
    fn wrap_past_far_edge() {
        let mut a = agent_at(99., 50., true, all_on())
            .with_max_speed(10.)
            .with_velocity(Vec2::new(5., 0.));

        a.update_position();

        assert_eq!(a.position.x, 4.);
        assert_eq!(a.position.y, 50.);
    }

    #[test]
    fn wrap_past_near_edge_lands_on_extent() {
        let mut a = agent_at(1., 1., true, all_on())
            .with_max_speed(10.)
            .with_velocity(Vec2::new(-5., -3.));

        a.update_position();

        assert_eq!(a.position.x, 100.);
        assert_eq!(a.position.y, 100.);

        // and keeps evolving off the extent on the next tick
        a.update_position();
        assert_eq!(a.position.x, 95.);
        assert_eq!(a.position.y, 97.);
    }

    #[test]
    fn no_wrap_is_unbounded() {
        let mut a = agent_at(99., 1., false, all_on())
            .with_max_speed(10.)
            .with_velocity(Vec2::new(5., -5.));

        a.update_position();

        assert_eq!(a.position, Vec2::new(104., -4.));
    }

    #[test]
    fn set_tunable_writes_and_counts() {
        let mut a = agent_at(0., 0., false, Tunables::default());

        a.set_tunable(Tunable::AlignmentDistance, 12.);
        a.set_tunable(Tunable::AlignmentDistance, 12.);

        assert_eq!(a.tunables().alignment_distance, 12.);
        assert_eq!(a.revision(), 2);
    }

    #[test]
    fn nearly_coincident_agents_push_apart() {
        let tunables = Tunables {
            separation_strength: 1.,
            separation_distance: 10.,
            ..Default::default()
        };
        let mut a = agent_at(50., 50., false, tunables);
        let b = agent_at(50.001, 50., false, tunables);

        a.update(&[&b]);

        assert!(a.position.x < 50.);
        assert_eq!(a.velocity.x, -0.5);
    }
}
