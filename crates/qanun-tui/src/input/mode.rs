use qanun_types::Mode;

/// Exactly one mode is active at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeSelector {
    active: Mode,
}

impl ModeSelector {
    pub fn new(initial: Mode) -> Self {
        Self { active: initial }
    }

    pub fn active(&self) -> Mode {
        self.active
    }

    pub fn is_active(&self, mode: Mode) -> bool {
        self.active == mode
    }

    pub fn activate(&mut self, mode: Mode) {
        self.active = mode;
    }

    /// 1-based slot, as bound to Alt+1..Alt+6.
    pub fn activate_slot(&mut self, slot: usize) -> bool {
        match slot.checked_sub(1).and_then(|i| Mode::ALL.get(i)) {
            Some(mode) => {
                self.active = *mode;
                true
            }
            None => false,
        }
    }

    pub fn cycle(&mut self) {
        let next = (self.active.index() + 1) % Mode::ALL.len();
        self.active = Mode::ALL[next];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_is_exclusive() {
        let mut selector = ModeSelector::default();
        assert!(selector.is_active(Mode::General));
        selector.activate(Mode::Criminal);
        let active: Vec<Mode> = Mode::ALL
            .iter()
            .copied()
            .filter(|m| selector.is_active(*m))
            .collect();
        assert_eq!(active, vec![Mode::Criminal]);
    }

    #[test]
    fn cycle_wraps() {
        let mut selector = ModeSelector::new(Mode::Commercial);
        selector.cycle();
        assert_eq!(selector.active(), Mode::General);
    }

    #[test]
    fn slots_are_one_based() {
        let mut selector = ModeSelector::default();
        assert!(selector.activate_slot(4));
        assert_eq!(selector.active(), Mode::RealEstate);
        assert!(!selector.activate_slot(0));
        assert!(!selector.activate_slot(7));
        assert_eq!(selector.active(), Mode::RealEstate);
    }
}
