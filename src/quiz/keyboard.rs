/// Quiz keyboard shortcuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    /// `1`–`4`: choose the option at this 0-based index.
    SelectOption(usize),
    /// `Enter`.
    Submit,
    /// `Escape`: leave the quiz after confirmation.
    Abandon,
}

pub const MAX_SHORTCUT_OPTIONS: usize = 4;

impl Shortcut {
    /// Maps a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(Shortcut::Submit),
            "Escape" => Some(Shortcut::Abandon),
            _ => {
                let mut chars = key.chars();
                let digit = chars.next()?.to_digit(10)? as usize;
                if chars.next().is_some() || !(1..=MAX_SHORTCUT_OPTIONS).contains(&digit) {
                    return None;
                }
                Some(Shortcut::SelectOption(digit - 1))
            }
        }
    }
}
