use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const SIDEBAR_WIDTH: u16 = 32;
/// Narrower terminals hide the sidebar even when it is toggled on.
pub const MIN_WIDTH_FOR_SIDEBAR: u16 = 60;

/// Screen regions for one frame. Hidden regions have zero height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppLayout {
    pub header: Rect,
    pub mode_bar: Rect,
    pub transcript: Rect,
    pub recording: Rect,
    pub keyboard: Rect,
    pub prompt: Rect,
    pub footer: Rect,
    pub sidebar: Option<Rect>,
}

impl AppLayout {
    pub fn compute(
        area: Rect,
        show_sidebar: bool,
        recording: bool,
        keyboard_height: u16,
        prompt_height: u16,
    ) -> Self {
        let (main, sidebar) = if show_sidebar && area.width >= MIN_WIDTH_FOR_SIDEBAR {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(1), Constraint::Length(SIDEBAR_WIDTH)])
                .split(area);
            (columns[0], Some(columns[1]))
        } else {
            (area, None)
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(u16::from(recording)),
                Constraint::Length(keyboard_height),
                Constraint::Length(prompt_height),
                Constraint::Length(1),
            ])
            .split(main);

        Self {
            header: rows[0],
            mode_bar: rows[1],
            transcript: rows[2],
            recording: rows[3],
            keyboard: rows[4],
            prompt: rows[5],
            footer: rows[6],
            sidebar,
        }
    }
}

pub fn contains(area: Rect, x: u16, y: u16) -> bool {
    area.width > 0
        && area.height > 0
        && x >= area.x
        && x < area.x + area.width
        && y >= area.y
        && y < area.y + area.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidebar_sits_on_the_right_when_wide_enough() {
        let layout = AppLayout::compute(Rect::new(0, 0, 100, 40), true, false, 0, 3);
        let sidebar = layout.sidebar.unwrap();
        assert_eq!(sidebar.x, 100 - SIDEBAR_WIDTH);
        assert_eq!(sidebar.height, 40);
        assert_eq!(layout.prompt.width, 100 - SIDEBAR_WIDTH);
        assert_eq!(layout.recording.height, 0);
        assert_eq!(layout.keyboard.height, 0);
        assert_eq!(layout.prompt.height, 3);
        assert_eq!(layout.footer.y, 39);
    }

    #[test]
    fn narrow_terminal_hides_sidebar() {
        let layout = AppLayout::compute(Rect::new(0, 0, 50, 30), true, true, 7, 3);
        assert!(layout.sidebar.is_none());
        assert_eq!(layout.recording.height, 1);
        assert_eq!(layout.keyboard.height, 7);
        assert!(layout.transcript.height >= 3);
    }

    #[test]
    fn contains_rejects_empty_rects() {
        assert!(contains(Rect::new(1, 1, 2, 2), 2, 2));
        assert!(!contains(Rect::new(1, 1, 2, 2), 3, 1));
        assert!(!contains(Rect::new(1, 1, 0, 2), 1, 1));
    }
}
