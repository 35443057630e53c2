/// Settings for computing and updating a neighbor list
#[derive(Clone, Copy, Debug)]
pub struct UpdateSettings {
    /// Only consider rebuilding on multiples of this step, at least 1
    every: usize,
    /// Minimum number of steps between rebuilds
    delay: usize,
    /// Rebuild only after a particle moved more than half the skin
    check: bool,
    last_update_step: usize,
}

impl UpdateSettings {
    pub fn new(every: usize, delay: usize, check: bool) -> Self {
        Self {
            every: every.max(1),
            delay,
            check,
            last_update_step: 0,
        }
    }
    pub fn every(&self) -> usize {
        self.every
    }
    pub fn delay(&self) -> usize {
        self.delay
    }
    pub fn check(&self) -> bool {
        self.check
    }
    pub fn set_every(&mut self, every: usize) {
        self.every = every.max(1);
    }
    pub fn set_delay(&mut self, delay: usize) {
        self.delay = delay;
    }
    pub fn set_check(&mut self, check: bool) {
        self.check = check;
    }
    pub fn should_update_neighbors(&self, step: usize) -> bool {
        (step % self.every == 0) && (step.saturating_sub(self.last_update_step) >= self.delay)
    }
    pub(crate) fn set_last_update_step(&mut self, step: usize) {
        self.last_update_step = step;
    }
    pub fn last_update_step(&self) -> usize {
        self.last_update_step
    }
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self::new(1, 0, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn honors_every_and_delay() {
        let mut settings = UpdateSettings::new(5, 10, true);
        settings.set_last_update_step(20);
        assert!(!settings.should_update_neighbors(25));
        assert!(!settings.should_update_neighbors(31));
        assert!(settings.should_update_neighbors(30));
    }

    #[test]
    fn zero_every_is_clamped() {
        let mut settings = UpdateSettings::new(0, 0, false);
        assert_eq!(settings.every(), 1);
        assert!(settings.should_update_neighbors(7));
        settings.set_every(0);
        assert_eq!(settings.every(), 1);
        assert!(settings.should_update_neighbors(3));
        settings.set_every(4);
        assert!(!settings.should_update_neighbors(3));
        assert!(settings.should_update_neighbors(8));
    }
}
