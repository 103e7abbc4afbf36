//! Error types shared by both layout engines.

/// Errors reported by graph ingestion and the layout engines.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A configuration parameter is out of range. Reported before any layout work starts.
    #[error("invalid configuration: `{parameter}` = {value} ({reason})")]
    InvalidConfiguration {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// JS or JSON input could not be decoded.
    #[error("failed to decode {what}: {message}")]
    Decode { what: &'static str, message: String },

    /// An edge carries a `size` that is not a positive finite number.
    #[error("edge #{index} has invalid size {weight}; sizes must be positive")]
    InvalidEdgeWeight { index: usize, weight: f64 },

    /// No non-colliding position was found for a node within the sampling budget.
    #[error(
        "cannot place node `{node}` after {attempts} attempts \
         (edge_length = {edge_length}, separation = {separation}); \
         consider either increasing `edge_length` or decreasing `separation`"
    )]
    PlacementExhausted {
        node: String,
        attempts: u32,
        edge_length: f64,
        separation: f64,
    },

    /// Nodes with no chain of edges leading to a root can never be placed.
    #[error("nodes unreachable from any root: {}", .nodes.join(", "))]
    UnreachableNodes { nodes: Vec<String> },

    /// The caller's cancellation signal fired mid-layout.
    #[error("layout cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_exhausted_names_remediation() {
        let err = Error::PlacementExhausted {
            node: "A".to_string(),
            attempts: 100_000,
            edge_length: 5.0,
            separation: 10.0,
        };
        let message = err.to_string();
        assert!(message.contains("`A`"));
        assert!(message.contains("edge_length = 5"));
        assert!(message.contains("separation = 10"));
        assert!(message.contains("increasing `edge_length`"));
    }

    #[test]
    fn test_unreachable_lists_nodes() {
        let err = Error::UnreachableNodes {
            nodes: vec!["x".to_string(), "7".to_string()],
        };
        assert_eq!(err.to_string(), "nodes unreachable from any root: x, 7");
    }
}
