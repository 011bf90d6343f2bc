#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Running,
    Exiting,
}

/// Which pane receives plain keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Sidebar,
    Keyboard,
}

impl Focus {
    /// Next pane in Tab order, skipping panes that are not on screen.
    pub fn next(self, sidebar: bool, keyboard: bool) -> Self {
        let order = [Focus::Input, Focus::Sidebar, Focus::Keyboard];
        let start = order.iter().position(|f| *f == self).unwrap_or(0);
        (1..=order.len())
            .map(|step| order[(start + step) % order.len()])
            .find(|candidate| match candidate {
                Focus::Input => true,
                Focus::Sidebar => sidebar,
                Focus::Keyboard => keyboard,
            })
            .unwrap_or(Focus::Input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_order_skips_hidden_panes() {
        assert_eq!(Focus::Input.next(true, true), Focus::Sidebar);
        assert_eq!(Focus::Sidebar.next(true, true), Focus::Keyboard);
        assert_eq!(Focus::Keyboard.next(true, true), Focus::Input);
        assert_eq!(Focus::Input.next(false, true), Focus::Keyboard);
        assert_eq!(Focus::Input.next(false, false), Focus::Input);
        assert_eq!(Focus::Sidebar.next(false, false), Focus::Input);
    }
}
