use std::cell::Cell;

/// Time-based id generator: milliseconds since the epoch, bumped by one
/// whenever the clock has not advanced past the last issued id.
#[derive(Debug, Default)]
pub struct IdSource {
    last: Cell<i64>,
}

impl IdSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        let id = now.max(self.last.get() + 1);
        self.last.set(id);
        id.to_string()
    }

    /// Account for an id issued in an earlier run
    pub fn observe(&self, id: &str) {
        if let Ok(n) = id.parse::<i64>() {
            if n > self.last.get() {
                self.last.set(n);
            }
        }
    }
}
