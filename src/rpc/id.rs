/// Correlation ids for one session: 1, 2, 3, ...
#[derive(Debug, Clone, Default)]
pub struct RequestIdGenerator {
    last: u64,
}

impl RequestIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// The most recent id handed out, if any.
    pub fn last_issued(&self) -> Option<u64> {
        (self.last > 0).then_some(self.last)
    }

    pub fn reset(&mut self) {
        self.last = 0;
    }
}

impl Iterator for RequestIdGenerator {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_up_from_one() {
        let ids: Vec<u64> = RequestIdGenerator::new().take(5).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn reset_restarts_sequence() {
        let mut ids = RequestIdGenerator::new();
        assert_eq!(ids.last_issued(), None);
        ids.next_id();
        ids.next_id();
        assert_eq!(ids.last_issued(), Some(2));
        ids.reset();
        assert_eq!(ids.next(), Some(1));
    }
}
