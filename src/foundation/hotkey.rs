use crate::foundation::error::{OverlayError, OverlayResult};

bitflags::bitflags! {
    /// Modifier keys that must be held for a global hotkey.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const CONTROL = 1 << 0;
        const ALT     = 1 << 1;
        const SHIFT   = 1 << 2;
        const SUPER   = 1 << 3;
    }
}

/// A single modifier+key combination registered with the window host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub modifiers: Modifiers,
    /// Uppercase ASCII letter or digit.
    pub key: char,
}

impl Hotkey {
    /// Ctrl+Alt+Q.
    pub const EXIT_DEFAULT: Hotkey = Hotkey {
        modifiers: Modifiers::CONTROL.union(Modifiers::ALT),
        key: 'Q',
    };

    /// Parses strings like `"Ctrl+Alt+Q"`. Modifier names are case-insensitive; at least
    /// one modifier is required so the hotkey cannot swallow plain typing.
    pub fn parse(s: &str) -> OverlayResult<Self> {
        let mut modifiers = Modifiers::empty();
        let mut key = None;

        for part in s.split('+').map(str::trim) {
            if part.is_empty() {
                return Err(OverlayError::config(format!("hotkey '{s}' has an empty part")));
            }
            let m = match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => Some(Modifiers::CONTROL),
                "alt" => Some(Modifiers::ALT),
                "shift" => Some(Modifiers::SHIFT),
                "super" | "win" | "cmd" | "meta" => Some(Modifiers::SUPER),
                _ => None,
            };
            if let Some(m) = m {
                modifiers |= m;
                continue;
            }

            let mut chars = part.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(OverlayError::config(format!(
                    "hotkey '{s}': unknown key '{part}'"
                )));
            };
            if !c.is_ascii_alphanumeric() {
                return Err(OverlayError::config(format!(
                    "hotkey '{s}': key must be a letter or digit"
                )));
            }
            if key.replace(c.to_ascii_uppercase()).is_some() {
                return Err(OverlayError::config(format!("hotkey '{s}' names two keys")));
            }
        }

        let key = key.ok_or_else(|| OverlayError::config(format!("hotkey '{s}' has no key")))?;
        if modifiers.is_empty() {
            return Err(OverlayError::config(format!(
                "hotkey '{s}' needs at least one modifier"
            )));
        }
        Ok(Self { modifiers, key })
    }
}

impl std::fmt::Display for Hotkey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (m, name) in [
            (Modifiers::CONTROL, "Ctrl"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::SHIFT, "Shift"),
            (Modifiers::SUPER, "Super"),
        ] {
            if self.modifiers.contains(m) {
                write!(f, "{name}+")?;
            }
        }
        write!(f, "{}", self.key)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/hotkey.rs"]
mod tests;
