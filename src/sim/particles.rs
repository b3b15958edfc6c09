//! Cosmetic particle bursts
//!
//! Purely visual: particles never collide with anything and never affect
//! scoring. Motion is per-frame like the ball, with a constant downward pull
//! and horizontal drag. The system owns its own RNG stream so cosmetic
//! jitter never perturbs gameplay randomness.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Counts down from max_life by 0.05 per frame
    pub life: f32,
    pub max_life: f32,
    /// Inherited from the block that spawned the burst
    pub color: u32,
    pub size: f32,
}

impl Particle {
    /// Alpha for rendering, proportional to remaining life
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

#[derive(Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: Pcg32,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Radial burst for a destroyed block: `count` particles fanned evenly
    /// around the circle with jittered speed and size
    pub fn emit_destruction(&mut self, origin: Vec2, color: u32, count: usize) {
        for i in 0..count {
            let angle = (i as f32 / count as f32) * TAU;
            let speed = 3.0 + self.rng.random::<f32>() * 4.0;
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                max_life: 1.0,
                color,
                size: 4.0 + self.rng.random::<f32>() * 4.0,
            });
        }
    }

    /// Shockwave for a block bounce: an even fan like the destruction burst
    /// but smaller and slower, with a little angular jitter per particle
    pub fn emit_impact(&mut self, origin: Vec2, color: u32, count: usize) {
        for i in 0..count {
            let angle =
                (i as f32 / count as f32) * TAU + (self.rng.random::<f32>() - 0.5) * 0.5;
            let speed = 2.0 + self.rng.random::<f32>() * 3.0;
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                max_life: 1.0,
                color,
                size: 2.0 + self.rng.random::<f32>() * 3.0,
            });
        }
    }

    /// Advance all particles one frame and drop the expired ones
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel.y += 0.2;
            p.vel.x *= 0.98;
            p.life -= 0.05;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destruction_burst_fans_evenly() {
        let mut ps = ParticleSystem::new(7);
        ps.emit_destruction(Vec2::new(10.0, 20.0), 0xF16584, 15);
        assert_eq!(ps.len(), 15);

        // Directions cover the full circle: some left, some right, some up,
        // some down.
        let p = ps.particles();
        assert!(p.iter().any(|p| p.vel.x > 0.0));
        assert!(p.iter().any(|p| p.vel.x < 0.0));
        assert!(p.iter().any(|p| p.vel.y > 0.0));
        assert!(p.iter().any(|p| p.vel.y < 0.0));

        for p in p {
            let speed = p.vel.length();
            assert!((3.0..7.0).contains(&speed));
            assert!((4.0..8.0).contains(&p.size));
            assert_eq!(p.color, 0xF16584);
            assert_eq!(p.pos, Vec2::new(10.0, 20.0));
        }
    }

    #[test]
    fn test_impact_fan_is_smaller_and_slower() {
        let mut ps = ParticleSystem::new(7);
        ps.emit_impact(Vec2::ZERO, 0x4ECDC4, 8);
        assert_eq!(ps.len(), 8);
        for p in ps.particles() {
            let speed = p.vel.length();
            assert!((2.0..5.0).contains(&speed));
            assert!((2.0..5.0).contains(&p.size));
        }
        // Jitter is at most 0.25 rad, so the fan still covers the circle.
        let p = ps.particles();
        assert!(p.iter().any(|p| p.vel.x > 0.0));
        assert!(p.iter().any(|p| p.vel.x < 0.0));
    }

    #[test]
    fn test_update_applies_gravity_and_drag() {
        let mut ps = ParticleSystem::new(1);
        ps.emit_destruction(Vec2::ZERO, 0xFFFFFF, 1);
        let before = ps.particles()[0].clone();
        ps.update();
        let after = &ps.particles()[0];
        assert_eq!(after.pos, before.pos + before.vel);
        assert!((after.vel.y - (before.vel.y + 0.2)).abs() < 1e-5);
        assert!((after.vel.x - before.vel.x * 0.98).abs() < 1e-5);
        assert!((after.life - 0.95).abs() < 1e-5);
    }

    #[test]
    fn test_particles_expire_after_twenty_frames() {
        let mut ps = ParticleSystem::new(1);
        ps.emit_destruction(Vec2::ZERO, 0xFFFFFF, 3);
        for _ in 0..19 {
            ps.update();
        }
        assert_eq!(ps.len(), 3);
        ps.update();
        assert!(ps.is_empty());
    }

    #[test]
    fn test_clear_discards_everything() {
        let mut ps = ParticleSystem::new(1);
        ps.emit_destruction(Vec2::ZERO, 0xFFFFFF, 5);
        ps.clear();
        assert!(ps.is_empty());
    }

    #[test]
    fn test_seeded_streams_are_deterministic() {
        let mut a = ParticleSystem::new(42);
        let mut b = ParticleSystem::new(42);
        a.emit_destruction(Vec2::ZERO, 0xFFFFFF, 10);
        b.emit_destruction(Vec2::ZERO, 0xFFFFFF, 10);
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.vel, pb.vel);
            assert_eq!(pa.size, pb.size);
        }
    }
}
