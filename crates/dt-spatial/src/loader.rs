//! CSV network loader.
//!
//! A convenience ingestion path for the Node/Segment/Lane/Link model — not
//! the data model itself, which is [`RoadNetwork`]/[`RoadNetworkBuilder`].
//! Applications free to assemble a network any other way (their own
//! parser, a database query, a generator for synthetic grids) should just
//! drive the builder directly.
//!
//! # CSV format
//!
//! Two files. `nodes.csv`:
//!
//! ```csv
//! node_id,x,y
//! 0,0.0,0.0
//! 1,1200.0,0.0
//! ```
//!
//! `segments.csv` — one row per **directed** segment; segments sharing a
//! `link_name` are grouped into one [`Link`](crate::network::Link) in
//! first-seen order:
//!
//! ```csv
//! from_node,to_node,length_m,lane_count,free_flow_speed_mps,link_name
//! 0,1,1200.0,2,13.9,Main St EB
//! 1,0,1200.0,2,13.9,Main St WB
//! ```
//!
//! Node ids referenced by `segments.csv` must appear in `nodes.csv`;
//! otherwise loading fails with [`SpatialError::Inconsistent`].

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use dt_core::{NodeId, Point2D};

use crate::network::RoadNetworkBuilder;
use crate::{RoadNetwork, SpatialError};

#[derive(Deserialize)]
struct NodeRecord {
    node_id: u32,
    x: f32,
    y: f32,
}

#[derive(Deserialize)]
struct SegmentRecord {
    from_node: u32,
    to_node: u32,
    length_m: f32,
    lane_count: u8,
    free_flow_speed_mps: f32,
    link_name: String,
}

/// Load a [`RoadNetwork`] from a pair of CSV files on disk.
pub fn load_network_csv(nodes_path: &Path, segments_path: &Path) -> Result<RoadNetwork, SpatialError> {
    let nodes_file = std::fs::File::open(nodes_path)?;
    let segments_file = std::fs::File::open(segments_path)?;
    load_network_readers(nodes_file, segments_file)
}

/// Like [`load_network_csv`] but accepts any `Read` sources (useful for
/// tests and in-memory fixtures).
pub fn load_network_readers<R1: Read, R2: Read>(
    nodes_reader: R1,
    segments_reader: R2,
) -> Result<RoadNetwork, SpatialError> {
    let mut builder = RoadNetworkBuilder::new();
    let mut node_index: HashMap<u32, NodeId> = HashMap::new();

    let mut node_csv = csv::Reader::from_reader(nodes_reader);
    for result in node_csv.deserialize::<NodeRecord>() {
        let row = result?;
        let id = builder.add_node(Point2D::new(row.x, row.y));
        node_index.insert(row.node_id, id);
    }

    let mut link_by_name: HashMap<String, dt_core::LinkId> = HashMap::new();
    let mut segment_csv = csv::Reader::from_reader(segments_reader);
    for result in segment_csv.deserialize::<SegmentRecord>() {
        let row = result?;
        let from = *node_index.get(&row.from_node).ok_or_else(|| {
            SpatialError::Inconsistent(format!("segment references unknown node {}", row.from_node))
        })?;
        let to = *node_index.get(&row.to_node).ok_or_else(|| {
            SpatialError::Inconsistent(format!("segment references unknown node {}", row.to_node))
        })?;
        let link = *link_by_name
            .entry(row.link_name)
            .or_insert_with(|| builder.add_link());

        builder.add_directed_segment(
            from,
            to,
            row.length_m,
            row.lane_count,
            row.free_flow_speed_mps,
            link,
        );
    }

    Ok(builder.build())
}
