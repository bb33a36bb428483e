use std::error::Error;
use std::fmt;

/// Everything that can go wrong between a user action and the companion
/// service. `InvalidSelection` and `NotFound` are defensive: the widgets only
/// ever offer currently-valid choices, but a stale reference must still be
/// rejected cleanly. `InternalConsistency` is a bug in the partition
/// bookkeeping and is never presented as a user mistake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrismError {
    InvalidSelection(String),
    NotFound(String),
    IncompletePartition { unassigned: usize },
    GatewayFailure(String),
    InternalConsistency(String),
}

impl Error for PrismError {}

impl fmt::Display for PrismError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PrismError::InvalidSelection(msg) => write!(f, "invalid selection: {msg}"),
            PrismError::NotFound(msg) => write!(f, "not found: {msg}"),
            PrismError::IncompletePartition { unassigned } => write!(
                f,
                "cannot submit: {unassigned} sample(s) have not been assigned to a group"
            ),
            PrismError::GatewayFailure(msg) => write!(f, "companion service error: {msg}"),
            PrismError::InternalConsistency(msg) => {
                write!(f, "internal consistency error: {msg}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_partition_message_counts_unassigned() {
        let err = PrismError::IncompletePartition { unassigned: 3 };
        assert!(err.to_string().contains("3 sample(s)"));
    }
}
