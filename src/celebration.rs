use rand::seq::SliceRandom;
use rand::Rng;
use std::time::{Duration, SystemTime};

const WIN_WORDS: &[&str] = &["GOT IT!", "SHARP EAR!", "BULLSEYE!", "SPOT ON!", "NAILED IT!"];
const BURST_SYMBOLS: &[char] = &['*', '•', '+', '✦', '·'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Thrown outward and pulled down by gravity.
    Burst,
    /// Flies to a fixed spot and parks there, spelling out the win word.
    Letter,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
    pub kind: ParticleKind,
    pub target_x: f64,
    pub target_y: f64,
}

impl Particle {
    fn burst(x: f64, y: f64) -> Self {
        let mut rng = rand::thread_rng();

        Self {
            x,
            y,
            vel_x: rng.gen_range(-3.0..3.0),
            vel_y: rng.gen_range(-4.0..-1.0),
            symbol: *BURST_SYMBOLS.choose(&mut rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(2.0..4.0),
            kind: ParticleKind::Burst,
            target_x: x,
            target_y: y,
        }
    }

    fn letter(x: f64, y: f64, target_x: f64, target_y: f64, symbol: char, color: usize) -> Self {
        let mut rng = rand::thread_rng();

        Self {
            x,
            y,
            vel_x: target_x - x,
            vel_y: target_y - y,
            symbol,
            color_index: color,
            age: 0.0,
            max_age: rng.gen_range(3.0..5.0),
            kind: ParticleKind::Letter,
            target_x,
            target_y,
        }
    }

    /// Advance by `dt` seconds; false means the particle has expired.
    fn update(&mut self, dt: f64) -> bool {
        match self.kind {
            ParticleKind::Letter => {
                let dist = ((self.target_x - self.x).powi(2)
                    + (self.target_y - self.y).powi(2))
                .sqrt();
                if dist > 1.0 {
                    self.x += self.vel_x * dt;
                    self.y += self.vel_y * dt;
                    self.vel_x *= 0.95;
                    self.vel_y *= 0.95;
                } else {
                    self.x = self.target_x;
                    self.y = self.target_y;
                    self.vel_x = 0.0;
                    self.vel_y = 0.0;
                }
            }
            ParticleKind::Burst => {
                self.x += self.vel_x * dt;
                self.y += self.vel_y * dt;
                self.vel_y += 15.0 * dt;
            }
        }

        self.age += dt;
        self.age < self.max_age
    }
}

/// Short overlay animation played on a win.
#[derive(Debug)]
pub struct CelebrationAnimation {
    pub particles: Vec<Particle>,
    pub start_time: SystemTime,
    pub duration: f64,
    pub is_active: bool,
    pub terminal_width: f64,
    pub terminal_height: f64,
}

impl CelebrationAnimation {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            start_time: SystemTime::now(),
            duration: 3.0,
            is_active: false,
            terminal_width: 80.0,
            terminal_height: 24.0,
        }
    }

    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();

        self.particles.clear();
        self.start_time = SystemTime::now();
        self.is_active = true;
        self.terminal_width = width as f64;
        self.terminal_height = height as f64;

        let center_x = width as f64 / 2.0;
        let center_y = height as f64 / 2.0;

        let word = WIN_WORDS.choose(&mut rng).unwrap_or(&"GOT IT!");
        self.spell_word(word, center_x, center_y, &mut rng);

        for _ in 0..30 {
            let offset_x = rng.gen_range(-15.0..15.0);
            let offset_y = rng.gen_range(-8.0..8.0);
            self.particles
                .push(Particle::burst(center_x + offset_x, center_y + offset_y));
        }
    }

    fn spell_word(
        &mut self,
        word: &str,
        center_x: f64,
        center_y: f64,
        rng: &mut rand::rngs::ThreadRng,
    ) {
        let char_width = 2.0;
        let word_width = (word.len() as f64 - 1.0) * char_width;
        let left = center_x - word_width / 2.0;

        for (i, ch) in word.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let target_x = left + (i as f64 * char_width);
            let target_y = center_y - 2.0;

            let from_x = center_x + rng.gen_range(-10.0..10.0);
            let from_y = center_y + rng.gen_range(-5.0..5.0);
            let color = rng.gen_range(0..7);

            self.particles
                .push(Particle::letter(from_x, from_y, target_x, target_y, ch, color));
        }
    }

    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }

        let elapsed = self.start_time.elapsed().unwrap_or_default().as_secs_f64();
        if elapsed >= self.duration {
            self.is_active = false;
            self.particles.clear();
            return;
        }

        let dt = 0.1;
        let width = self.terminal_width;
        let height = self.terminal_height;
        self.particles.retain_mut(|particle| {
            let alive = particle.update(dt);
            if particle.kind == ParticleKind::Burst {
                let buffer = 5.0;
                let off_screen = particle.y > height + buffer
                    || particle.x < -buffer
                    || particle.x > width + buffer;
                alive && !off_screen
            } else {
                alive
            }
        });
    }
}

impl Default for CelebrationAnimation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_particle_falls_under_gravity() {
        let mut particle = Particle::burst(10.0, 10.0);
        let initial_y = particle.y;
        let initial_vel_y = particle.vel_y;

        assert!(particle.update(0.1));
        assert_ne!(particle.y, initial_y);
        assert!(particle.vel_y > initial_vel_y);
    }

    #[test]
    fn letter_particle_parks_on_its_target() {
        let mut letter = Particle::letter(0.0, 0.0, 10.0, 5.0, 'A', 0);
        assert_eq!(letter.kind, ParticleKind::Letter);
        assert_eq!(letter.symbol, 'A');

        for _ in 0..30 {
            letter.update(0.1);
        }

        let dist =
            ((letter.target_x - letter.x).powi(2) + (letter.target_y - letter.y).powi(2)).sqrt();
        assert!(dist < 5.0);
    }

    #[test]
    fn start_spawns_letters_and_burst() {
        let mut celebration = CelebrationAnimation::new();
        assert!(!celebration.is_active);
        assert!(celebration.particles.is_empty());

        celebration.start(80, 24);

        assert!(celebration.is_active);
        let letters = celebration
            .particles
            .iter()
            .filter(|p| p.kind == ParticleKind::Letter)
            .count();
        let bursts = celebration
            .particles
            .iter()
            .filter(|p| p.kind == ParticleKind::Burst)
            .count();
        assert!(letters > 0);
        assert_eq!(bursts, 30);
    }

    #[test]
    fn animation_survives_early_updates() {
        let mut celebration = CelebrationAnimation::new();
        celebration.start(80, 24);

        for _ in 0..10 {
            celebration.update();
        }
        assert!(celebration.is_active);
        assert!(!celebration.particles.is_empty());
    }

    #[test]
    fn animation_expires_after_its_duration() {
        let mut celebration = CelebrationAnimation::new();
        celebration.start(80, 24);
        celebration.start_time = SystemTime::now() - Duration::from_secs(4);

        celebration.update();

        assert!(!celebration.is_active);
        assert!(celebration.particles.is_empty());
    }

    #[test]
    fn off_screen_burst_particles_are_culled() {
        let mut celebration = CelebrationAnimation::new();
        celebration.start(20, 10);

        celebration.particles.push(Particle::burst(100.0, 100.0));

        for _ in 0..10 {
            celebration.update();
        }

        for particle in &celebration.particles {
            if particle.kind == ParticleKind::Burst {
                assert!(particle.x > -5.0 && particle.x < 25.0 && particle.y < 15.0);
            }
        }
    }
}
