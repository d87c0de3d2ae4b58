// petal.rs - A single falling petal
//
// Kinematic only: vertical drift, sinusoidal sway, slow spin.
// Petals are recycled in place when they fall out of view.

use std::f64::consts::TAU;

use rand::Rng;

use crate::config::FieldConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct Petal {
    // Position (CSS px)
    pub x: f64,
    pub y: f64,

    // Fixed for the petal's lifetime
    pub size: f64,
    pub rotation_speed: f64,

    // Re-rolled on recycle
    pub speed: f64,
    pub sway_amp: f64,
    pub sway_freq: f64,
    pub phase: f64,

    // Accumulated rotation (radians)
    pub angle: f64,
}

impl Petal {
    /// Fresh petal anywhere inside the viewport.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64, config: &FieldConfig) -> Self {
        let x = rng.r#gen::<f64>() * width;
        let y = rng.r#gen::<f64>() * height;
        Self {
            x,
            y,
            size: config.size.sample(rng),
            speed: config.speed.sample(rng),
            angle: config.initial_angle.sample(rng),
            rotation_speed: config.rotation_speed.sample(rng),
            sway_amp: config.sway_amp.sample(rng),
            sway_freq: config.sway_freq.sample(rng),
            phase: rng.r#gen::<f64>() * TAU,
        }
    }

    /// Bottom edge past which the petal is fully out of view.
    #[inline]
    pub fn exit_line(&self, height: f64) -> f64 {
        height + self.size * 2.0
    }

    /// Move by `ticks` nominal frames.
    ///
    /// Sway is a fixed per-frame nudge driven by the petal's height, so it is
    /// applied once per call regardless of `ticks`. `sway_amp` does not enter here.
    #[inline]
    pub fn advance(&mut self, ticks: f64, sway_magnitude: f64) {
        self.x += (self.y * self.sway_freq + self.phase).sin() * sway_magnitude;
        self.y += self.speed * ticks;
        self.angle += self.rotation_speed * ticks;
    }

    /// Send the petal back above the top edge with new motion.
    ///
    /// Re-entry height is staggered over a band above the viewport so a
    /// wave of exits doesn't reappear as a single row.
    pub fn respawn<R: Rng + ?Sized>(&mut self, rng: &mut R, width: f64, height: f64, config: &FieldConfig) {
        let top = -self.size * 2.0;
        // (0, 1] keeps the band half-open at the top edge
        let depth = 1.0 - rng.r#gen::<f64>();
        self.x = rng.r#gen::<f64>() * width;
        self.y = top - depth * height * config.recycle_stagger;
        self.speed = config.speed.sample(rng);
        self.sway_amp = config.sway_amp.sample(rng);
        self.sway_freq = config.sway_freq.sample(rng);
        self.phase = rng.r#gen::<f64>() * TAU;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn petal() -> Petal {
        Petal {
            x: 100.0,
            y: 50.0,
            size: 10.0,
            rotation_speed: 0.005,
            speed: 0.5,
            sway_amp: 12.0,
            sway_freq: 0.01,
            phase: 0.0,
            angle: 0.0,
        }
    }

    #[test]
    fn spawn_draws_from_configured_ranges() {
        let cfg = FieldConfig::default();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..500 {
            let p = Petal::spawn(&mut rng, 800.0, 600.0, &cfg);
            assert!((0.0..800.0).contains(&p.x));
            assert!((0.0..600.0).contains(&p.y));
            assert!((6.0..22.0).contains(&p.size));
            assert!((0.35..0.95).contains(&p.speed));
            assert!((-0.25..0.25).contains(&p.angle));
            assert!((-0.01..0.01).contains(&p.rotation_speed));
            assert!((6.0..24.0).contains(&p.sway_amp));
            assert!((0.006..0.026).contains(&p.sway_freq));
            assert!((0.0..TAU).contains(&p.phase));
        }
    }

    #[test]
    fn advance_applies_kinematics() {
        let mut p = petal();
        p.advance(2.0, 0.5);
        let sway = (50.0f64 * 0.01).sin() * 0.5;
        assert!((p.x - (100.0 + sway)).abs() < 1e-12);
        assert!((p.y - 51.0).abs() < 1e-12);
        assert!((p.angle - 0.01).abs() < 1e-12);
    }

    #[test]
    fn zero_ticks_only_sways() {
        let mut p = petal();
        p.phase = std::f64::consts::PI;
        p.y = 0.0;
        p.advance(0.0, 0.5);
        assert_eq!(p.y, 0.0);
        assert_eq!(p.angle, 0.0);
        assert!((p.x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn amplitude_is_inert() {
        let mut a = petal();
        let mut b = Petal { sway_amp: 1000.0, ..petal() };
        a.advance(1.0, 0.5);
        b.advance(1.0, 0.5);
        assert_eq!(a.x, b.x);
    }

    #[test]
    fn respawn_keeps_size_and_spin() {
        let cfg = FieldConfig::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut p = petal();
        p.y = 700.0;
        p.respawn(&mut rng, 800.0, 600.0, &cfg);

        assert_eq!(p.size, 10.0);
        assert_eq!(p.rotation_speed, 0.005);
        assert!(p.y < -20.0 && p.y >= -170.0);
        assert!((0.0..800.0).contains(&p.x));
    }

    #[test]
    fn respawn_with_zero_height_sits_on_top_edge() {
        let cfg = FieldConfig::default();
        let mut rng = SmallRng::seed_from_u64(9);
        let mut p = petal();
        p.respawn(&mut rng, 0.0, 0.0, &cfg);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, -20.0);
    }
}
