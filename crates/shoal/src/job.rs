use core::fmt;
use std::sync::Arc;

/// A unit of work submitted to the pool.
///
/// A job carries a single opaque text payload and is immutable once built.
/// Jobs have no identity beyond their payload: two jobs with the same text
/// are both queued and both processed.
///
/// The payload is reference counted so cloning a job (for notifications, for
/// example) never copies the text.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Job {
    payload: Arc<str>,
}

impl Job {
    pub fn new(payload: impl Into<Arc<str>>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Returns the job's payload.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Returns a shared handle to the payload without copying it.
    pub fn shared_payload(&self) -> Arc<str> {
        Arc::clone(&self.payload)
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Job").field(&self.payload()).finish()
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.payload())
    }
}

impl From<&str> for Job {
    fn from(payload: &str) -> Self {
        Self::new(payload)
    }
}

impl From<String> for Job {
    fn from(payload: String) -> Self {
        Self::new(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_preserved_verbatim() {
        let job = Job::from("  resize image 42 ");
        assert_eq!(job.payload(), "  resize image 42 ");
        assert_eq!(job.to_string(), "  resize image 42 ");
    }

    #[test]
    fn jobs_are_compared_by_payload() {
        let a = Job::from(String::from("x"));
        let b = Job::new("x");
        assert_eq!(a, b);
        assert_eq!(format!("{a:?}"), r#"Job("x")"#);
    }
}
