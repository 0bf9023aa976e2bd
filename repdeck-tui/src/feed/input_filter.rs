use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

use crate::logging::targets;

/// Key filter owned by the feed view: while installed, the listed keys never
/// reach the view's handlers. Torn down explicitly or when dropped.
#[derive(Debug)]
pub struct InputFilter {
    suppressed: Vec<char>,
    installed: bool,
}

impl InputFilter {
    /// Install a filter for `keys`, matched case-insensitively and regardless
    /// of modifiers.
    pub fn install(keys: impl IntoIterator<Item = char>) -> Self {
        let mut suppressed: Vec<char> = keys.into_iter().flat_map(char::to_lowercase).collect();
        suppressed.sort_unstable();
        suppressed.dedup();
        log::debug!(target: targets::KEY_EVENTS, "input filter installed for {:?}", suppressed);
        Self {
            suppressed,
            installed: true,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn suppressed_keys(&self) -> &[char] {
        &self.suppressed
    }

    pub fn suppresses(&self, key: &KeyEvent) -> bool {
        if !self.installed || key.kind == KeyEventKind::Release {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => c.to_lowercase().any(|lower| self.suppressed.contains(&lower)),
            _ => false,
        }
    }

    /// Whether `event` should be passed on to the view.
    pub fn admit(&self, event: &Event) -> bool {
        match event {
            Event::Key(key) => !self.suppresses(key),
            _ => true,
        }
    }

    pub fn teardown(&mut self) {
        if self.installed {
            self.installed = false;
            log::debug!(target: targets::KEY_EVENTS, "input filter removed");
        }
    }
}

impl Drop for InputFilter {
    fn drop(&mut self) {
        self.teardown();
    }
}
