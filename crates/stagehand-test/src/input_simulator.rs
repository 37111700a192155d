//! Seeded raw event generator

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use stagehand_core::{RawEventKind, SurfaceBox};
use stagehand_input::{RawEvent, TouchPoint};

/// Keys a simulated user may press on a hardware keyboard
pub const DEFAULT_KEY_POOL: [&str; 8] = [
    "ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", " ", "a", "z", "Enter",
];

/// Generates raw host events of a requested class
pub struct InputSimulator {
    rng: StdRng,
    surface: SurfaceBox,
    keys: Vec<String>,
}

impl InputSimulator {
    pub fn new(seed: u64, surface: SurfaceBox) -> Self {
        InputSimulator {
            rng: StdRng::seed_from_u64(seed),
            surface,
            keys: DEFAULT_KEY_POOL.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn with_keys(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_surface(&mut self, surface: SurfaceBox) {
        self.surface = surface;
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Client coordinates somewhere on the surface
    fn point_on_surface(&mut self) -> (f64, f64) {
        let x = self.surface.left + self.rng.gen_range(0.0..=self.surface.width);
        let y = self.surface.top + self.rng.gen_range(0.0..=self.surface.height);
        (x, y)
    }

    /// A realistic event of class `kind`
    pub fn event(&mut self, kind: RawEventKind) -> RawEvent {
        if kind.is_keyboard() {
            let key = self
                .keys
                .choose(&mut self.rng)
                .cloned()
                .unwrap_or_else(|| "a".to_string());
            return RawEvent::key(kind, key);
        }

        let (x, y) = self.point_on_surface();
        match kind {
            RawEventKind::TouchStart | RawEventKind::TouchEnd | RawEventKind::TouchMove => {
                let fingers = self.rng.gen_range(1..=2);
                let mut touches = vec![TouchPoint::new(x, y)];
                for _ in 1..fingers {
                    let (x, y) = self.point_on_surface();
                    touches.push(TouchPoint::new(x, y));
                }
                RawEvent::touch(kind, touches)
            }
            _ => RawEvent::mouse(kind, x, y),
        }
    }

    /// A pointer event with no coordinates at all
    pub fn bare(&mut self, kind: RawEventKind) -> RawEvent {
        RawEvent::new(kind)
    }
}
