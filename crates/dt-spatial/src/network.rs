//! Road network representation and builder.
//!
//! # Data model
//!
//! The network is a directed multigraph over `Node`s, built from six kinds
//! of record:
//!
//! - **Node** — a point in the plane (`Point2D`, metres) where segments meet.
//! - **Segment** — a directed stretch of road between two nodes, with a
//!   lane count and a free-flow speed. Segments are the routing graph's
//!   edges.
//! - **Lane** — one traffic lane within a segment, addressed by `LaneId`.
//!   Driving agents advance along a lane, not a segment as a whole.
//! - **Link** — an ordered run of segments between two decision points
//!   (places where a driver actually chooses a direction). Matches how
//!   the source network names roads: "Main St between 1st and 5th" is one
//!   link made of several segments if intersections subdivide it.
//! - **Turning** — a permitted lane-to-lane move across an intersection
//!   node (e.g. the left-turn lane of an incoming segment onto the lane
//!   of an outgoing segment). Signal phases (`dt-signal`) grant or
//!   withhold right-of-way per turning group, not per segment.
//! - **Crossing** — a pedestrian crossing anchored at a node.
//!
//! # CSR layout
//!
//! Segments are stored in **Compressed Sparse Row** order by source node:
//!
//! ```text
//! segment_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! so a node's outgoing segments are a contiguous scan — the same layout
//! the original edge-based graph used, just renamed to match the richer
//! model. Lanes and turnings are comparatively few per node and are kept
//! in per-node/per-segment `Vec` buckets rather than a second CSR tier.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps a `Point2D` to the nearest `NodeId`, used
//! to snap an agent's origin/destination to the network.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use dt_core::{CrossingId, LaneId, LinkId, NodeId, Point2D, SegmentId, TurningId};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Road-network records ───────────────────────────────────────────────────────

/// One traffic lane within a segment.
#[derive(Clone, Copy, Debug)]
pub struct Lane {
    pub segment: SegmentId,
    /// 0-indexed from the segment's rightmost (shoulder-adjacent) lane.
    pub index: u8,
}

/// An ordered run of segments between two decision points.
#[derive(Clone, Debug, Default)]
pub struct Link {
    pub segments: Vec<SegmentId>,
}

/// A permitted lane-to-lane move across an intersection node.
#[derive(Clone, Copy, Debug)]
pub struct Turning {
    pub from_lane: LaneId,
    pub to_lane: LaneId,
    /// `true` if this turning crosses the path of another turning with
    /// simultaneous right-of-way (used by `dt-signal` to group conflicting
    /// movements into the same phase).
    pub conflicting: bool,
}

/// A pedestrian crossing anchored at a node.
#[derive(Clone, Copy, Debug)]
pub struct Crossing {
    pub node: NodeId,
    pub length_m: f32,
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road graph plus lane/link/turning/crossing metadata and a
/// spatial index for node snapping.
///
/// All fields are `pub` for direct indexed access on hot paths. Do not
/// construct directly; use [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    pub node_pos: Vec<Point2D>,

    // ── CSR segment adjacency ─────────────────────────────────────────────
    /// Outgoing segments of node `n` occupy `SegmentId`s
    /// `node_out_start[n] .. node_out_start[n+1]`. Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Segment data (indexed by SegmentId = position in sorted order) ────
    pub segment_from: Vec<NodeId>,
    pub segment_to: Vec<NodeId>,
    pub segment_length_m: Vec<f32>,
    pub segment_travel_ms: Vec<u32>,
    pub segment_link: Vec<LinkId>,
    /// Lanes belonging to each segment, as a `(start, count)` slice into
    /// [`lanes`](Self::lanes).
    pub segment_lane_range: Vec<(u32, u8)>,

    // ── Lane data ──────────────────────────────────────────────────────────
    pub lanes: Vec<Lane>,

    // ── Link data ────────────────────────────────────────────────────────
    pub links: Vec<Link>,

    // ── Turning data ───────────────────────────────────────────────────────
    pub turnings: Vec<Turning>,
    turnings_from_lane: HashMap<LaneId, Vec<TurningId>>,

    // ── Crossing data ──────────────────────────────────────────────────────
    pub crossings: Vec<Crossing>,
    crossings_at_node: HashMap<NodeId, Vec<CrossingId>>,

    // ── Spatial index ──────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or segments.
    ///
    /// Any routing request against an empty network returns
    /// [`SpatialError::NoRoute`](crate::SpatialError::NoRoute).
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segment_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `SegmentId`s of all segments leaving `node`.
    #[inline]
    pub fn out_segments(&self, node: NodeId) -> impl Iterator<Item = SegmentId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| SegmentId(i as u32))
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Lanes of `segment`, in index order.
    pub fn lanes_of(&self, segment: SegmentId) -> &[Lane] {
        let (start, count) = self.segment_lane_range[segment.index()];
        &self.lanes[start as usize..start as usize + count as usize]
    }

    /// The lane id for `segment`'s lane at `index`, if it exists.
    pub fn lane_id(&self, segment: SegmentId, index: u8) -> Option<LaneId> {
        let (start, count) = self.segment_lane_range[segment.index()];
        (index < count).then(|| LaneId((start + index as u32) as u16))
    }

    /// Segments belonging to `link`, in link order.
    pub fn segments_of(&self, link: LinkId) -> &[SegmentId] {
        &self.links[link.index()].segments
    }

    /// Turnings available from `lane`.
    pub fn turnings_from(&self, lane: LaneId) -> &[TurningId] {
        self.turnings_from_lane
            .get(&lane)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Crossings anchored at `node`.
    pub fn crossings_at(&self, node: NodeId) -> &[CrossingId] {
        self.crossings_at_node
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest road node to `pos`.
    ///
    /// Returns `None` only if the network has no nodes.
    pub fn snap_to_node(&self, pos: Point2D) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }

    /// Return up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: Point2D, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.x, pos.y])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use dt_core::Point2D;
/// use dt_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(Point2D::new(0.0, 0.0));
/// let c = b.add_node(Point2D::new(1_200.0, 0.0));
/// let link = b.add_link();
/// b.add_road(a, c, 1_200.0, 2, 13.9, link); // 1.2 km, 2 lanes, ~50 km/h
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.segment_count(), 2); // bidirectional
/// ```
pub struct RoadNetworkBuilder {
    nodes: Vec<Point2D>,
    raw_segments: Vec<RawSegment>,
    links: Vec<Link>,
    turnings: Vec<Turning>,
    crossings: Vec<Crossing>,
}

struct RawSegment {
    from: NodeId,
    to: NodeId,
    length_m: f32,
    lane_count: u8,
    free_flow_speed_mps: f32,
    link: LinkId,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            raw_segments: Vec::new(),
            links: Vec::new(),
            turnings: Vec::new(),
            crossings: Vec::new(),
        }
    }

    pub fn with_capacity(nodes: usize, segments: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            raw_segments: Vec::with_capacity(segments),
            links: Vec::new(),
            turnings: Vec::new(),
            crossings: Vec::new(),
        }
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Point2D) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Reserve a new, initially-empty `Link`. Pass the returned id to
    /// [`add_directed_segment`](Self::add_directed_segment) for every
    /// segment that belongs to it.
    pub fn add_link(&mut self) -> LinkId {
        let id = LinkId(self.links.len() as u32);
        self.links.push(Link::default());
        id
    }

    /// Add a **directed** segment from `from` to `to`, belonging to `link`.
    /// `lane_count` must be at least 1.
    pub fn add_directed_segment(
        &mut self,
        from: NodeId,
        to: NodeId,
        length_m: f32,
        lane_count: u8,
        free_flow_speed_mps: f32,
        link: LinkId,
    ) -> SegmentId {
        debug_assert!(lane_count >= 1, "a segment needs at least one lane");
        let id = SegmentId(self.raw_segments.len() as u32);
        self.raw_segments.push(RawSegment {
            from,
            to,
            length_m,
            lane_count,
            free_flow_speed_mps,
            link,
        });
        self.links[link.index()].segments.push(id);
        id
    }

    /// Pre-build `LaneId` for lane `index` of `segment`, for use with
    /// [`add_turning`](Self::add_turning). Valid only before [`build`] is
    /// called — `build()` renumbers lanes to match the sorted segment
    /// order and returns the stable, post-build ids via
    /// [`RoadNetwork::lane_id`].
    pub fn raw_lane_id(&self, segment: SegmentId, index: u8) -> LaneId {
        let mut offset = 0u32;
        for seg in &self.raw_segments[..segment.index()] {
            offset += seg.lane_count as u32;
        }
        debug_assert!(index < self.raw_segments[segment.index()].lane_count);
        LaneId((offset + index as u32) as u16)
    }

    /// Convenience: add segments in **both directions** for an undirected
    /// road, both belonging to `link`.
    pub fn add_road(
        &mut self,
        a: NodeId,
        b: NodeId,
        length_m: f32,
        lane_count: u8,
        free_flow_speed_mps: f32,
        link: LinkId,
    ) {
        self.add_directed_segment(a, b, length_m, lane_count, free_flow_speed_mps, link);
        self.add_directed_segment(b, a, length_m, lane_count, free_flow_speed_mps, link);
    }

    /// Register a permitted lane-to-lane move across an intersection.
    /// Lane ids must refer to lanes of segments already added to this
    /// builder; resolve them via the built network's
    /// [`lane_id`](RoadNetwork::lane_id) in a second pass if needed.
    pub fn add_turning(&mut self, from_lane: LaneId, to_lane: LaneId, conflicting: bool) -> TurningId {
        let id = TurningId(self.turnings.len() as u32);
        self.turnings.push(Turning {
            from_lane,
            to_lane,
            conflicting,
        });
        id
    }

    /// Register a pedestrian crossing anchored at `node`.
    pub fn add_crossing(&mut self, node: NodeId, length_m: f32) -> CrossingId {
        let id = CrossingId(self.crossings.len() as u32);
        self.crossings.push(Crossing { node, length_m });
        id
    }

    pub fn node_pos(&self, id: NodeId) -> Point2D {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn segment_count(&self) -> usize {
        self.raw_segments.len()
    }

    /// Consume the builder and produce a [`RoadNetwork`].
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();
        let segment_count = self.raw_segments.len();

        // Sort segments by source node for CSR construction. SegmentIds
        // handed out during building referred to insertion order, which is
        // no longer valid once we reorder — so re-derive turnings/lanes by
        // position *after* sorting using a stable permutation.
        let mut order: Vec<usize> = (0..segment_count).collect();
        order.sort_by_key(|&i| self.raw_segments[i].from.0);

        let mut old_to_new = vec![0u32; segment_count];
        for (new_idx, &old_idx) in order.iter().enumerate() {
            old_to_new[old_idx] = new_idx as u32;
        }

        let sorted: Vec<&RawSegment> = order.iter().map(|&i| &self.raw_segments[i]).collect();

        let segment_from: Vec<NodeId> = sorted.iter().map(|s| s.from).collect();
        let segment_to: Vec<NodeId> = sorted.iter().map(|s| s.to).collect();
        let segment_length_m: Vec<f32> = sorted.iter().map(|s| s.length_m).collect();
        let segment_travel_ms: Vec<u32> = sorted
            .iter()
            .map(|s| (s.length_m / s.free_flow_speed_mps * 1_000.0) as u32)
            .collect();
        let segment_link: Vec<LinkId> = sorted.iter().map(|s| s.link).collect();

        let mut lanes = Vec::with_capacity(segment_count * 2);
        let mut segment_lane_range = vec![(0u32, 0u8); segment_count];
        for (new_idx, s) in sorted.iter().enumerate() {
            let start = lanes.len() as u32;
            for lane_idx in 0..s.lane_count {
                lanes.push(Lane {
                    segment: SegmentId(new_idx as u32),
                    index: lane_idx,
                });
            }
            segment_lane_range[new_idx] = (start, s.lane_count);
        }

        // Build CSR row pointer (node_out_start).
        let mut node_out_start = vec![0u32; node_count + 1];
        for s in &sorted {
            node_out_start[s.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, segment_count);

        // Remap links' segment lists from old SegmentIds to new ones.
        let mut links = self.links;
        for link in &mut links {
            for seg in &mut link.segments {
                *seg = SegmentId(old_to_new[seg.index()]);
            }
        }

        // Remap turnings' lane ids: a LaneId is `segment_lane_range.0 +
        // lane.index`, which shifted when segments were reordered. Rebuild
        // using the old segment's lane_range (pre-sort) mapped to new.
        let mut old_segment_lane_start = vec![0u32; segment_count];
        {
            let mut cursor = 0u32;
            for old_idx in 0..segment_count {
                old_segment_lane_start[old_idx] = cursor;
                cursor += self.raw_segments[old_idx].lane_count as u32;
            }
        }
        let remap_lane = |old_lane: LaneId| -> LaneId {
            // Find which old segment owned this lane by scanning the
            // precomputed start offsets (segment counts are small enough
            // that a reverse linear scan is cheap and avoids a second
            // bookkeeping structure).
            let old_lane_idx = old_lane.0 as u32;
            let mut owner_old_segment = 0usize;
            for (old_idx, &start) in old_segment_lane_start.iter().enumerate() {
                let count = self.raw_segments[old_idx].lane_count as u32;
                if old_lane_idx >= start && old_lane_idx < start + count {
                    owner_old_segment = old_idx;
                    break;
                }
            }
            let lane_offset = old_lane_idx - old_segment_lane_start[owner_old_segment];
            let new_segment = old_to_new[owner_old_segment];
            let (new_start, _) = segment_lane_range[new_segment as usize];
            LaneId((new_start + lane_offset) as u16)
        };

        let turnings: Vec<Turning> = self
            .turnings
            .into_iter()
            .map(|t| Turning {
                from_lane: remap_lane(t.from_lane),
                to_lane: remap_lane(t.to_lane),
                conflicting: t.conflicting,
            })
            .collect();

        let mut turnings_from_lane: HashMap<LaneId, Vec<TurningId>> = HashMap::new();
        for (i, t) in turnings.iter().enumerate() {
            turnings_from_lane
                .entry(t.from_lane)
                .or_default()
                .push(TurningId(i as u32));
        }

        let crossings = self.crossings;
        let mut crossings_at_node: HashMap<NodeId, Vec<CrossingId>> = HashMap::new();
        for (i, c) in crossings.iter().enumerate() {
            crossings_at_node
                .entry(c.node)
                .or_default()
                .push(CrossingId(i as u32));
        }

        // Bulk-load R-tree for O(N log N) construction.
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.x, pos.y],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadNetwork {
            node_pos: self.nodes,
            node_out_start,
            segment_from,
            segment_to,
            segment_length_m,
            segment_travel_ms,
            segment_link,
            segment_lane_range,
            lanes,
            links,
            turnings,
            turnings_from_lane,
            crossings,
            crossings_at_node,
            spatial_idx,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
