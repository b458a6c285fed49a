/// Single-line text field with a character cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position counted in characters.
    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set(&mut self, value: impl Into<String>) {
        *self = Self::new(value);
    }

    pub fn clear(&mut self) {
        self.set(String::new());
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.len() as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, len) as usize;
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn insert(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Slice of the value that fits in `width` cells while keeping the
    /// cursor visible, plus the cursor offset inside that slice.
    pub fn window(&self, width: usize) -> (String, usize) {
        if width == 0 {
            return (String::new(), 0);
        }
        let skip = self.cursor.saturating_sub(width - 1);
        let visible = self.value.chars().skip(skip).take(width).collect();
        (visible, self.cursor - skip)
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map(|(index, _)| index)
            .unwrap_or(self.value.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_at_cursor() {
        let mut input = TextInput::new("Bob");
        input.move_cursor(-1);
        input.insert('o');
        assert_eq!(input.value(), "Boob");
        input.backspace();
        input.backspace();
        assert_eq!(input.value(), "Bb");
        input.move_home();
        input.delete();
        assert_eq!(input.value(), "b");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut input = TextInput::new("Zoë");
        input.backspace();
        input.insert('é');
        assert_eq!(input.value(), "Zoé");
        input.move_cursor(-10);
        input.insert('¡');
        assert_eq!(input.value(), "¡Zoé");
        input.move_end();
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn window_follows_cursor() {
        let input = TextInput::new("/home/player/exports/players.json");
        let (visible, cursor) = input.window(10);
        assert_eq!(visible, "yers.json");
        assert_eq!(cursor, 9);

        let mut short = TextInput::new("abc");
        short.move_home();
        assert_eq!(short.window(10), ("abc".to_string(), 0));
        assert_eq!(short.window(0), (String::new(), 0));
    }

    #[test]
    fn ignores_control_characters() {
        let mut input = TextInput::default();
        input.insert('\u{7}');
        assert_eq!(input.value(), "");
    }
}
