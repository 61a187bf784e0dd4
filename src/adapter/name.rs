//! Hierarchical logger names

/// Field key carrying the joined logger name
pub const NAME_KEY: &str = "logger";

/// Ordered name segments, joined with `.` on emission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggerName {
    segments: Vec<String>,
}

impl LoggerName {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this name with `segment` appended
    #[must_use]
    pub fn with_segment(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The dotted identifier, or `None` when no segment was ever added
    pub fn joined(&self) -> Option<String> {
        if self.segments.is_empty() {
            None
        } else {
            Some(self.segments.join("."))
        }
    }
}

impl<S: Into<String>> FromIterator<S> for LoggerName {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}
