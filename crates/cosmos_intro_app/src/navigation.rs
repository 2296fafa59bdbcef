// SPDX-License-Identifier: MIT OR Apache-2.0
//! Navigation sink for the headless host.

use cosmos_intro_sequencer::Navigator;
use std::cell::RefCell;

/// Records navigation requests instead of leaving the page
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    /// Create an empty navigator
    pub fn new() -> Self {
        Self::default()
    }

    /// Every path navigated to, in order
    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }

    /// Most recent destination
    pub fn last(&self) -> Option<String> {
        self.visits.borrow().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!("Navigating to {path}");
        self.visits.borrow_mut().push(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let navigator = RecordingNavigator::new();
        assert_eq!(navigator.last(), None);
        navigator.navigate("/a");
        navigator.navigate("/b");
        assert_eq!(navigator.visits(), vec!["/a".to_string(), "/b".to_string()]);
        assert_eq!(navigator.last().as_deref(), Some("/b"));
    }
}
