//! Automatic keyboard shortcut assignment for labels.

use std::collections::HashSet;

/// Keys handed out to labels without an explicit hotkey, in order.
pub const DEFAULT_KEYS: &str = "1234567890qwetasdfgzxcvbyiopjklnm";

/// Hands out single-character hotkeys, never the same key twice.
///
/// Keys configured explicitly must be [reserved](Self::reserve) before any
/// automatic assignment so they are skipped.
#[derive(Debug, Clone)]
pub struct HotkeyAllocator {
    keys: Vec<char>,
    cursor: usize,
    used: HashSet<String>,
}

impl Default for HotkeyAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl HotkeyAllocator {
    /// Allocator over [`DEFAULT_KEYS`].
    pub fn new() -> Self {
        Self::with_keys(DEFAULT_KEYS)
    }

    /// Allocator over a custom key sequence.
    pub fn with_keys(keys: &str) -> Self {
        Self {
            keys: keys.chars().collect(),
            cursor: 0,
            used: HashSet::new(),
        }
    }

    /// Mark `key` as taken. Returns `false` if it already was.
    pub fn reserve(&mut self, key: &str) -> bool {
        self.used.insert(key.to_ascii_lowercase())
    }

    pub fn is_used(&self, key: &str) -> bool {
        self.used.contains(&key.to_ascii_lowercase())
    }

    /// Next free key, or `None` once the sequence is exhausted.
    pub fn next_key(&mut self) -> Option<String> {
        while let Some(&key) = self.keys.get(self.cursor) {
            self.cursor += 1;
            let key = key.to_string();
            if self.reserve(&key) {
                return Some(key);
            }
        }
        None
    }
}
