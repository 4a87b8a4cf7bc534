//! Spatial-subsystem error type.

use thiserror::Error;

use dt_core::{LaneId, LinkId, NodeId, SegmentId};

/// Errors produced by `dt-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("segment {0} not found in network")]
    SegmentNotFound(SegmentId),

    #[error("lane {0} not found in network")]
    LaneNotFound(LaneId),

    #[error("link {0} has no segments")]
    EmptyLink(LinkId),

    /// A loaded network referenced a node, segment, or lane id that does
    /// not exist — e.g. a CSV row naming a node id past the node table's
    /// range.
    #[error("network inconsistency: {0}")]
    Inconsistent(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
