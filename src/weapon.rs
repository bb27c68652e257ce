use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::surface::{RenderSurface, pack_rgb};

/// Weapon overlay state. Firing flips to the fired look, and a one-shot
/// timer thread flips it back after `revert_after`, independent of frames.
#[derive(Clone, Debug)]
pub struct Weapon {
    firing: Arc<AtomicBool>,
    revert_after: Duration,
}

impl Weapon {
    pub fn new(revert_after: Duration) -> Self {
        Self {
            firing: Arc::new(AtomicBool::new(false)),
            revert_after,
        }
    }

    pub fn is_firing(&self) -> bool {
        self.firing.load(Ordering::Acquire)
    }

    /// Fires unless already firing. Returns whether a shot was taken.
    pub fn fire(&self) -> bool {
        if self
            .firing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        let firing = Arc::clone(&self.firing);
        let delay = self.revert_after;
        thread::spawn(move || {
            thread::sleep(delay);
            firing.store(false, Ordering::Release);
        });
        tracing::trace!("weapon fired");
        true
    }

    /// Draws the weapon at the bottom centre of the surface.
    pub fn draw<S: RenderSurface>(&self, surface: &mut S) {
        let (w, h) = (surface.width(), surface.height());
        let unit = (h / 40).max(1);
        let gun_w = unit * 6;
        let gun_h = unit * 10;
        if gun_w > w || gun_h > h {
            return;
        }
        let x = (w - gun_w) / 2;
        let y = h - gun_h;

        if self.is_firing() {
            let flash = unit * 4;
            surface.fill_rect(
                x - unit.min(x),
                y.saturating_sub(flash),
                gun_w + 2 * unit,
                flash,
                pack_rgb(255, 210, 60),
            );
        }
        // Barrel, then grip
        surface.fill_rect(x + unit * 2, y, unit * 2, unit * 5, pack_rgb(70, 70, 80));
        surface.fill_rect(x, y + unit * 5, gun_w, unit * 5, pack_rgb(50, 45, 40));
    }
}
