// src/health/status.rs
use serde::{Serialize, Serializer};
use std::fmt;

/// Outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    L4Pass,
    L4Fail,
    L7Pass,
    L7Fail,
}

impl HealthStatus {
    pub fn l4(passed: bool) -> Self {
        if passed {
            HealthStatus::L4Pass
        } else {
            HealthStatus::L4Fail
        }
    }

    pub fn l7(passed: bool) -> Self {
        if passed {
            HealthStatus::L7Pass
        } else {
            HealthStatus::L7Fail
        }
    }

    pub fn is_l4(self) -> bool {
        matches!(self, HealthStatus::L4Pass | HealthStatus::L4Fail)
    }

    pub fn code(self) -> &'static str {
        match self {
            HealthStatus::L4Pass => "L4:P",
            HealthStatus::L4Fail => "L4:F",
            HealthStatus::L7Pass => "L7:P",
            HealthStatus::L7Fail => "L7:F",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for HealthStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusListError {
    #[error("a status list needs an L4 outcome")]
    Empty,

    #[error("a status list must start with an L4 outcome, found {0}")]
    MissingL4(HealthStatus),

    #[error("expected an L7 outcome after L4, found {0}")]
    ExpectedL7(HealthStatus),

    #[error("a status list holds at most two outcomes, found {0}")]
    TooLong(usize),
}

/// Ordered probe outcomes for one endpoint: one L4 code, then at most one
/// L7 code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusList(Vec<HealthStatus>);

impl StatusList {
    pub fn new(l4_passed: bool) -> Self {
        Self(vec![HealthStatus::l4(l4_passed)])
    }

    /// Append the L7 outcome. Replaces any previous one so the list never
    /// holds two L7 codes.
    pub fn with_l7(mut self, l7_passed: bool) -> Self {
        self.0.truncate(1);
        self.0.push(HealthStatus::l7(l7_passed));
        self
    }

    pub fn as_slice(&self) -> &[HealthStatus] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn l4_passed(&self) -> bool {
        self.0[0] == HealthStatus::L4Pass
    }

    /// Reduce to a verdict. Passing means every probe that ran succeeded.
    pub fn classify(&self) -> Verdict {
        let passing = matches!(
            self.as_slice(),
            [HealthStatus::L4Pass] | [HealthStatus::L4Pass, HealthStatus::L7Pass]
        );

        Verdict {
            passing,
            label: self.to_string(),
        }
    }
}

impl fmt::Display for StatusList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, status) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(status.code())?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<HealthStatus>> for StatusList {
    type Error = StatusListError;

    fn try_from(statuses: Vec<HealthStatus>) -> Result<Self, Self::Error> {
        match statuses.as_slice() {
            [] => return Err(StatusListError::Empty),
            [first, ..] if !first.is_l4() => return Err(StatusListError::MissingL4(*first)),
            [_, second] if second.is_l4() => return Err(StatusListError::ExpectedL7(*second)),
            [_] | [_, _] => {}
            _ => return Err(StatusListError::TooLong(statuses.len())),
        }
        Ok(Self(statuses))
    }
}

/// Classifier output for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub passing: bool,
    /// Joined status codes, e.g. `L4:P,L7:F`.
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use HealthStatus::*;

    fn classify(statuses: Vec<HealthStatus>) -> (bool, String) {
        let verdict = StatusList::try_from(statuses).unwrap().classify();
        (verdict.passing, verdict.label)
    }

    #[test]
    fn test_passing_combinations() {
        assert_eq!(classify(vec![L4Pass]), (true, "L4:P".to_string()));
        assert_eq!(classify(vec![L4Pass, L7Pass]), (true, "L4:P,L7:P".to_string()));
    }

    #[test]
    fn test_failing_combinations() {
        assert_eq!(classify(vec![L4Fail]), (false, "L4:F".to_string()));
        assert_eq!(classify(vec![L4Pass, L7Fail]), (false, "L4:P,L7:F".to_string()));
        assert_eq!(classify(vec![L4Fail, L7Fail]), (false, "L4:F,L7:F".to_string()));
        assert_eq!(classify(vec![L4Fail, L7Pass]), (false, "L4:F,L7:P".to_string()));
    }

    #[test]
    fn test_builder_matches_literal_lists() {
        assert_eq!(StatusList::new(true), StatusList::try_from(vec![L4Pass]).unwrap());
        assert_eq!(
            StatusList::new(false).with_l7(true),
            StatusList::try_from(vec![L4Fail, L7Pass]).unwrap()
        );
        assert_eq!(StatusList::new(true).with_l7(false).with_l7(true).len(), 2);
    }

    #[test]
    fn test_invalid_lists_are_rejected() {
        assert_eq!(StatusList::try_from(vec![]), Err(StatusListError::Empty));
        assert_eq!(
            StatusList::try_from(vec![L7Pass]),
            Err(StatusListError::MissingL4(L7Pass))
        );
        assert_eq!(
            StatusList::try_from(vec![L4Pass, L4Fail]),
            Err(StatusListError::ExpectedL7(L4Fail))
        );
        assert_eq!(
            StatusList::try_from(vec![L4Pass, L7Pass, L7Pass]),
            Err(StatusListError::TooLong(3))
        );
    }

    #[test]
    fn test_serializes_as_codes() {
        let list = StatusList::new(true).with_l7(false);
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["L4:P","L7:F"]"#);
    }
}
