use fish_survivor_core::ANIMATION_FRAMES;

/// Looping sprite-sheet cursor advanced on a fixed per-frame timer.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Animation {
    frame: u8,
    timer: f32,
    step: f32,
}

impl Animation {
    pub(crate) const fn new(step: f32) -> Self {
        Self {
            frame: 0,
            timer: 0.0,
            step,
        }
    }

    pub(crate) fn advance(&mut self, dt: f32) {
        self.timer += dt;
        if self.timer >= self.step {
            self.frame = (self.frame + 1) % ANIMATION_FRAMES;
            self.timer = 0.0;
        }
    }

    pub(crate) fn rewind(&mut self) {
        self.frame = 0;
    }

    pub(crate) const fn frame(&self) -> u8 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::Animation;

    #[test]
    fn wraps_after_four_frames() {
        let mut animation = Animation::new(0.1);
        for _ in 0..4 {
            animation.advance(0.1);
        }
        assert_eq!(animation.frame(), 0);
        animation.advance(0.05);
        assert_eq!(animation.frame(), 0);
        animation.advance(0.05);
        assert_eq!(animation.frame(), 1);
    }
}
