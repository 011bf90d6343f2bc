use ratatui::{
    style::{Color, Style},
    text::Span,
};

const FRAME_INTERVAL_MS: u64 = 80;
const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Clone, Debug)]
pub struct Spinner {
    frame_index: usize,
    tick_accumulator_ms: u64,
    color: Color,
}

impl Spinner {
    pub fn new(color: Color) -> Self {
        Self {
            frame_index: 0,
            tick_accumulator_ms: 0,
            color,
        }
    }

    /// Advances by elapsed wall time; returns whether the frame changed.
    pub fn tick(&mut self, elapsed_ms: u64) -> bool {
        self.tick_accumulator_ms += elapsed_ms;
        if self.tick_accumulator_ms < FRAME_INTERVAL_MS {
            return false;
        }
        let steps = (self.tick_accumulator_ms / FRAME_INTERVAL_MS) as usize;
        self.tick_accumulator_ms %= FRAME_INTERVAL_MS;
        self.frame_index = (self.frame_index + steps) % FRAMES.len();
        true
    }

    pub fn frame(&self) -> &'static str {
        FRAMES[self.frame_index]
    }

    pub fn span(&self) -> Span<'static> {
        Span::styled(self.frame(), Style::default().fg(self.color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_after_interval() {
        let mut spinner = Spinner::new(Color::White);
        assert!(!spinner.tick(50));
        assert_eq!(spinner.frame(), FRAMES[0]);
        assert!(spinner.tick(50));
        assert_eq!(spinner.frame(), FRAMES[1]);
        assert!(spinner.tick(FRAME_INTERVAL_MS * 10));
        assert_eq!(spinner.frame(), FRAMES[1]);
    }
}
