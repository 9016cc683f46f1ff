/// One-shot notice meant for the user (a toast, an alert line).
///
/// Notices are structured text; `kind` is a short stable tag such as
/// `"fetch_failed"` or `"route_failed"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub seq: u64,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct NoticeBoard {
    next_seq: u64,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, kind: &'static str, message: impl Into<String>) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.notices.push(Notice {
            seq,
            kind,
            message: message.into(),
        });
        seq
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Takes all pending notices; each notice is delivered at most once.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::NoticeBoard;

    #[test]
    fn sequence_numbers_keep_increasing_across_drains() {
        let mut bus = NoticeBoard::new();
        assert_eq!(bus.emit("a", "first"), 0);
        let _ = bus.drain();
        assert_eq!(bus.emit("b", "second"), 1);
        assert_eq!(bus.notices()[0].kind, "b");
    }

    #[test]
    fn drain_clears_notices() {
        let mut bus = NoticeBoard::new();
        bus.emit("k", "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.is_empty());
        assert!(bus.drain().is_empty());
    }
}
