use std::collections::BTreeSet;

/// Branches marked for deletion, keyed by local branch name.
///
/// Every name in `remote` is also in `local`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    local: BTreeSet<String>,
    remote: BTreeSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the local mark. Unmarking also drops the remote mark.
    pub fn toggle_local(&mut self, name: &str) {
        if self.local.remove(name) {
            self.remote.remove(name);
        } else {
            self.local.insert(name.to_string());
        }
    }

    /// Flips the remote mark; returns false (and changes nothing) when the
    /// branch is not locally selected.
    pub fn toggle_remote(&mut self, name: &str) -> bool {
        if !self.local.contains(name) {
            return false;
        }
        if !self.remote.remove(name) {
            self.remote.insert(name.to_string());
        }
        true
    }

    pub fn is_local_selected(&self, name: &str) -> bool {
        self.local.contains(name)
    }

    pub fn is_remote_selected(&self, name: &str) -> bool {
        self.remote.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }

    pub fn local_count(&self) -> usize {
        self.local.len()
    }

    pub fn remote_count(&self) -> usize {
        self.remote.len()
    }

    pub fn local(&self) -> impl Iterator<Item = &str> {
        self.local.iter().map(String::as_str)
    }

    pub fn remote(&self) -> impl Iterator<Item = &str> {
        self.remote.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorState {
    index: usize,
}

impl CursorState {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn previous_item(&mut self) {
        if self.index > 0 {
            self.index -= 1;
        }
    }

    pub fn next_item(&mut self, len: usize) {
        if self.index < len.saturating_sub(1) {
            self.index += 1;
        }
    }
}
