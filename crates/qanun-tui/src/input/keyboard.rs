use crate::input::InputField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Insert(char),
    Space,
    Delete,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCap {
    pub label: &'static str,
    pub action: KeyAction,
}

const fn letter(label: &'static str, ch: char) -> KeyCap {
    KeyCap {
        label,
        action: KeyAction::Insert(ch),
    }
}

const ROW_1: &[KeyCap] = &[
    letter("ض", 'ض'),
    letter("ص", 'ص'),
    letter("ث", 'ث'),
    letter("ق", 'ق'),
    letter("ف", 'ف'),
    letter("غ", 'غ'),
    letter("ع", 'ع'),
    letter("ه", 'ه'),
    letter("خ", 'خ'),
    letter("ح", 'ح'),
    letter("ج", 'ج'),
    letter("د", 'د'),
];

const ROW_2: &[KeyCap] = &[
    letter("ش", 'ش'),
    letter("س", 'س'),
    letter("ي", 'ي'),
    letter("ب", 'ب'),
    letter("ل", 'ل'),
    letter("ا", 'ا'),
    letter("ت", 'ت'),
    letter("ن", 'ن'),
    letter("م", 'م'),
    letter("ك", 'ك'),
    letter("ط", 'ط'),
];

const ROW_3: &[KeyCap] = &[
    letter("ئ", 'ئ'),
    letter("ء", 'ء'),
    letter("ؤ", 'ؤ'),
    letter("ر", 'ر'),
    letter("ى", 'ى'),
    letter("ة", 'ة'),
    letter("و", 'و'),
    letter("ز", 'ز'),
    letter("ظ", 'ظ'),
    letter("ذ", 'ذ'),
];

const ROW_4: &[KeyCap] = &[
    letter("أ", 'أ'),
    letter("إ", 'إ'),
    letter("آ", 'آ'),
    letter("،", '،'),
    letter("؟", '؟'),
    letter(".", '.'),
];

const CONTROL_ROW: &[KeyCap] = &[
    KeyCap {
        label: "مسافة",
        action: KeyAction::Space,
    },
    KeyCap {
        label: "حذف",
        action: KeyAction::Delete,
    },
    KeyCap {
        label: "إغلاق",
        action: KeyAction::Close,
    },
];

pub const LAYOUT: &[&[KeyCap]] = &[ROW_1, ROW_2, ROW_3, ROW_4, CONTROL_ROW];

/// On-screen Arabic keyboard with a key cursor.
#[derive(Debug, Clone, Default)]
pub struct ArabicKeyboard {
    visible: bool,
    row: usize,
    col: usize,
}

impl ArabicKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn rows(&self) -> &'static [&'static [KeyCap]] {
        LAYOUT
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn selected(&self) -> KeyCap {
        LAYOUT[self.row][self.col]
    }

    pub fn set_cursor(&mut self, row: usize, col: usize) {
        self.row = row.min(LAYOUT.len() - 1);
        self.col = col.min(LAYOUT[self.row].len() - 1);
    }

    pub fn move_up(&mut self) {
        self.set_cursor(self.row.saturating_sub(1), self.col);
    }

    pub fn move_down(&mut self) {
        self.set_cursor(self.row + 1, self.col);
    }

    /// Rows render right to left, so "left" advances along the row.
    pub fn move_left(&mut self) {
        let len = LAYOUT[self.row].len();
        self.col = (self.col + 1) % len;
    }

    pub fn move_right(&mut self) {
        let len = LAYOUT[self.row].len();
        self.col = (self.col + len - 1) % len;
    }

    pub fn press_selected(&mut self, input: &mut InputField) -> KeyAction {
        let action = self.selected().action;
        self.apply(action, input);
        action
    }

    pub fn apply(&mut self, action: KeyAction, input: &mut InputField) {
        match action {
            KeyAction::Insert(ch) => input.push_char(ch),
            KeyAction::Space => input.push_char(' '),
            KeyAction::Delete => input.pop_char(),
            KeyAction::Close => self.close(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_edit_the_end_of_the_draft() {
        let mut keyboard = ArabicKeyboard::new();
        keyboard.toggle();
        let mut input = InputField::new();
        keyboard.apply(KeyAction::Insert('ق'), &mut input);
        keyboard.apply(KeyAction::Space, &mut input);
        keyboard.apply(KeyAction::Insert('ع'), &mut input);
        assert_eq!(input.text(), "ق ع");
        keyboard.apply(KeyAction::Delete, &mut input);
        assert_eq!(input.text(), "ق ");
        assert!(keyboard.is_visible());
        keyboard.apply(KeyAction::Close, &mut input);
        assert!(!keyboard.is_visible());
        assert_eq!(input.text(), "ق ");
    }

    #[test]
    fn cursor_is_clamped_to_short_rows() {
        let mut keyboard = ArabicKeyboard::new();
        keyboard.set_cursor(0, 11);
        keyboard.move_down();
        keyboard.move_down();
        keyboard.move_down();
        assert_eq!(keyboard.cursor(), (3, ROW_4.len() - 1));
        keyboard.move_down();
        assert_eq!(keyboard.selected().action, KeyAction::Close);
    }

    #[test]
    fn horizontal_moves_wrap() {
        let mut keyboard = ArabicKeyboard::new();
        keyboard.move_right();
        assert_eq!(keyboard.cursor(), (0, ROW_1.len() - 1));
        keyboard.move_left();
        assert_eq!(keyboard.cursor(), (0, 0));
    }

    #[test]
    fn press_uses_selected_key() {
        let mut keyboard = ArabicKeyboard::new();
        let mut input = InputField::new();
        keyboard.set_cursor(4, 0);
        assert_eq!(keyboard.press_selected(&mut input), KeyAction::Space);
        assert_eq!(input.text(), " ");
    }
}
