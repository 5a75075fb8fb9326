//! CPU particle emitter

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ParticleConfig;
use crate::foundation::math::Vec3;

/// A single particle instance
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Current position
    pub position: Vec3,
    /// Current velocity
    pub velocity: Vec3,
    /// Time since spawn
    pub age: f32,
    /// Total lifetime
    pub lifetime: f32,
}

impl Particle {
    /// Get normalized age (0 = just spawned, 1 = about to die)
    pub fn normalized_age(&self) -> f32 {
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }

    /// Check if particle should be killed
    pub fn is_dead(&self) -> bool {
        self.age >= self.lifetime
    }
}

/// Fountain-style emitter with a fixed-capacity pool
#[derive(Debug)]
pub struct ParticleEmitter {
    settings: ParticleConfig,
    particles: Vec<Particle>,
    spawn_accumulator: f32,
    rng: StdRng,
}

impl ParticleEmitter {
    /// Emitter with entropy-seeded spread
    pub fn new(settings: ParticleConfig) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Emitter with reproducible spread
    pub fn with_seed(settings: ParticleConfig, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: ParticleConfig, rng: StdRng) -> Self {
        Self {
            particles: Vec::with_capacity(settings.capacity),
            settings,
            spawn_accumulator: 0.0,
            rng,
        }
    }

    /// Empty the pool
    pub fn init(&mut self) {
        self.particles.clear();
        self.spawn_accumulator = 0.0;
        log::debug!(
            "Particle emitter ready: {} max, {}/s at {:?}",
            self.settings.capacity,
            self.settings.spawn_rate,
            self.settings.origin
        );
    }

    /// Age, move and spawn particles
    pub fn update(&mut self, dt: f32) {
        let gravity = Vec3::new(0.0, -self.settings.gravity, 0.0);
        for particle in &mut self.particles {
            particle.age += dt;
            particle.velocity += gravity * dt;
            particle.position += particle.velocity * dt;
        }
        self.particles.retain(|particle| !particle.is_dead());

        self.spawn_accumulator += self.settings.spawn_rate * dt;
        while self.spawn_accumulator >= 1.0 {
            self.spawn_accumulator -= 1.0;
            if self.particles.len() < self.settings.capacity {
                let particle = self.spawn();
                self.particles.push(particle);
            }
        }
    }

    fn spawn(&mut self) -> Particle {
        let spread = self.settings.spread.abs();
        let mut jitter = || if spread > 0.0 { self.rng.gen_range(-spread..=spread) } else { 0.0 };
        let offset = Vec3::new(jitter(), jitter().abs(), jitter());
        Particle {
            position: Vec3::from(self.settings.origin),
            velocity: Vec3::from(self.settings.initial_velocity) + offset,
            age: 0.0,
            lifetime: self.settings.lifetime,
        }
    }

    /// Live particles
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether no particle is alive
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Bounding box of the live particles
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.particles.first()?.position;
        Some(self.particles.iter().fold((first, first), |(min, max), p| {
            (min.inf(&p.position), max.sup(&p.position))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ParticleConfig {
        ParticleConfig {
            capacity: 5,
            spawn_rate: 10.0,
            lifetime: 1.0,
            ..ParticleConfig::default()
        }
    }

    #[test]
    fn test_spawn_rate_and_capacity() {
        let mut emitter = ParticleEmitter::with_seed(settings(), 7);
        emitter.init();

        emitter.update(0.25);
        assert_eq!(emitter.len(), 2);

        emitter.update(0.5);
        assert_eq!(emitter.len(), 5);
    }

    #[test]
    fn test_particles_expire() {
        let mut emitter = ParticleEmitter::with_seed(settings(), 7);
        emitter.update(0.15);
        assert_eq!(emitter.len(), 1);

        let mut stopped = settings();
        stopped.spawn_rate = 0.0;
        let mut emitter = ParticleEmitter { settings: stopped, ..emitter };
        emitter.update(1.5);
        assert!(emitter.is_empty());
        assert!(emitter.bounds().is_none());
    }

    #[test]
    fn test_particles_rise_from_origin() {
        let mut emitter = ParticleEmitter::with_seed(settings(), 3);
        emitter.update(0.15);
        emitter.update(0.05);

        let (min, _) = emitter.bounds().unwrap();
        assert!(min.y >= 5.0);
    }
}
