//! Unit tests for dt-spatial.

#[cfg(test)]
mod helpers {
    use dt_core::Point2D;
    use crate::{RoadNetwork, RoadNetworkBuilder};

    /// Build a small grid network for testing.
    ///
    /// Nodes (x, y), metres:
    ///   0:(0,0)    1:(100,0)  2:(200,0)
    ///   3:(0,500)             4:(200,500)
    ///
    /// Undirected roads: 0-1, 1-2, 0-3, 2-4, 3-4, all as one-lane links.
    ///
    /// Travel times are chosen so the shortest path 0->4 is deterministically
    /// 0->1->2->4 (30 s) rather than 0->3->4 (60 s).
    pub fn grid_network() -> (RoadNetwork, [dt_core::NodeId; 5]) {
        let mut b = RoadNetworkBuilder::new();

        let n0 = b.add_node(Point2D::new(0.0, 0.0));
        let n1 = b.add_node(Point2D::new(100.0, 0.0));
        let n2 = b.add_node(Point2D::new(200.0, 0.0));
        let n3 = b.add_node(Point2D::new(0.0, 500.0));
        let n4 = b.add_node(Point2D::new(200.0, 500.0));

        let link01 = b.add_link();
        b.add_road(n0, n1, 100.0, 1, 10.0, link01); // 100m / 10 m/s = 10 s
        let link12 = b.add_link();
        b.add_road(n1, n2, 100.0, 1, 10.0, link12);
        let link24 = b.add_link();
        b.add_road(n2, n4, 100.0, 1, 10.0, link24);
        let link03 = b.add_link();
        b.add_road(n0, n3, 500.0, 1, 10.0, link03); // 500m / 10 m/s = 50 s
        let link34 = b.add_link();
        b.add_road(n3, n4, 100.0, 1, 10.0, link34);

        (b.build(), [n0, n1, n2, n3, n4])
    }
}

// ── Builder & network structure ────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use dt_core::Point2D;
    use crate::RoadNetworkBuilder;

    #[test]
    fn empty_build() {
        let net = RoadNetworkBuilder::new().build();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.segment_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn single_road() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point2D::new(0.0, 0.0));
        let c = b.add_node(Point2D::new(1_000.0, 0.0));
        let link = b.add_link();
        b.add_road(a, c, 1_000.0, 2, 13.3, link);
        let net = b.build();
        assert_eq!(net.node_count(), 2);
        assert_eq!(net.segment_count(), 2); // bidirectional
    }

    #[test]
    fn segments_carry_lanes() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point2D::new(0.0, 0.0));
        let c = b.add_node(Point2D::new(1_000.0, 0.0));
        let link = b.add_link();
        let seg = b.add_directed_segment(a, c, 1_000.0, 3, 13.3, link);
        let net = b.build();
        assert_eq!(net.lanes_of(seg).len(), 3);
        assert!(net.lane_id(seg, 0).is_some());
        assert!(net.lane_id(seg, 3).is_none());
    }

    #[test]
    fn link_groups_its_segments() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point2D::new(0.0, 0.0));
        let mid = b.add_node(Point2D::new(100.0, 0.0));
        let c = b.add_node(Point2D::new(200.0, 0.0));
        let link = b.add_link();
        let s1 = b.add_directed_segment(a, mid, 100.0, 1, 10.0, link);
        let s2 = b.add_directed_segment(mid, c, 100.0, 1, 10.0, link);
        let net = b.build();
        assert_eq!(net.segments_of(link), &[s1, s2]);
    }

    #[test]
    fn csr_out_segments() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();

        let n1_out: Vec<_> = net.out_segments(n1).collect();
        assert_eq!(n1_out.len(), 2, "n1 should have 2 outgoing segments");

        assert_eq!(net.out_degree(n0), 2);
        assert_eq!(net.out_degree(n2), 2);
        assert_eq!(net.out_degree(n3), 2);
        assert_eq!(net.out_degree(n4), 2);
    }

    #[test]
    fn out_segments_destination_correctness() {
        let (net, [n0, n1, _, _, _]) = super::helpers::grid_network();
        for s in net.out_segments(n0) {
            assert_eq!(net.segment_from[s.index()], n0);
        }
        let reaches_n1 = net.out_segments(n0).any(|s| net.segment_to[s.index()] == n1);
        assert!(reaches_n1);
    }

    #[test]
    fn directed_only_segment() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point2D::new(0.0, 0.0));
        let c = b.add_node(Point2D::new(0.0, 100.0));
        let link = b.add_link();
        b.add_directed_segment(a, c, 100.0, 1, 10.0, link);
        let net = b.build();
        assert_eq!(net.segment_count(), 1);
        assert_eq!(net.out_degree(a), 1);
        assert_eq!(net.out_degree(c), 0);
    }

    #[test]
    fn turnings_and_crossings_survive_reordering() {
        // Segments are sorted by source node at build() time; turnings
        // reference lanes by pre-sort id and must be remapped correctly.
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point2D::new(0.0, 0.0));
        let mid = b.add_node(Point2D::new(100.0, 0.0));
        let c = b.add_node(Point2D::new(200.0, 0.0));

        // Add the `mid -> c` segment *before* `a -> mid` so sorting actually
        // reorders them (mid.0 > a.0).
        let link1 = b.add_link();
        let out_seg = b.add_directed_segment(mid, c, 100.0, 1, 10.0, link1);
        let link0 = b.add_link();
        let in_seg = b.add_directed_segment(a, mid, 100.0, 1, 10.0, link0);

        let from_lane = b.raw_lane_id(in_seg, 0);
        let to_lane = b.raw_lane_id(out_seg, 0);
        b.add_turning(from_lane, to_lane, false);
        b.add_crossing(mid, 8.0);

        let net = b.build();
        let resolved_in = net.lane_id(
            net.out_segments(a).next().unwrap(),
            0,
        ).unwrap();
        let turnings = net.turnings_from(resolved_in);
        assert_eq!(turnings.len(), 1);
        assert_eq!(net.crossings_at(mid).len(), 1);
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use dt_core::Point2D;
    use crate::RoadNetworkBuilder;

    #[test]
    fn snap_exact_position() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let snapped = net.snap_to_node(Point2D::new(0.0, 0.0)).unwrap();
        assert_eq!(snapped, n0);
    }

    #[test]
    fn snap_nearest() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        let near_n0 = net.snap_to_node(Point2D::new(40.0, 0.0)).unwrap();
        assert_eq!(near_n0, n0);
        let near_n1 = net.snap_to_node(Point2D::new(60.0, 0.0)).unwrap();
        assert_eq!(near_n1, n1);
    }

    #[test]
    fn empty_network_returns_none() {
        let net = RoadNetworkBuilder::new().build();
        assert!(net.snap_to_node(Point2D::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn k_nearest_order() {
        let (net, nodes) = super::helpers::grid_network();
        let nearest = net.k_nearest_nodes(Point2D::new(0.0, 0.0), 2);
        assert_eq!(nearest[0], nodes[0]);
        assert!(nearest[1] == nodes[1] || nearest[1] == nodes[3]);
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use dt_core::TransportMode;
    use crate::{DijkstraRouter, Router, SpatialError};

    #[test]
    fn trivial_same_node() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let r = DijkstraRouter.route(&net, n0, n0, TransportMode::Car).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.total_travel_secs, 0.0);
    }

    #[test]
    fn shortest_path_correct() {
        let (net, [n0, n1, n2, _, n4]) = super::helpers::grid_network();
        let route = DijkstraRouter.route(&net, n0, n4, TransportMode::Car).unwrap();

        assert_eq!(route.total_travel_secs, 30.0);
        assert_eq!(route.segments.len(), 3);

        assert_eq!(net.segment_from[route.segments[0].index()], n0);
        assert_eq!(net.segment_to[route.segments[0].index()], n1);
        assert_eq!(net.segment_to[route.segments[1].index()], n2);
        assert_eq!(net.segment_to[route.segments[2].index()], n4);
    }

    #[test]
    fn no_route_disconnected() {
        use dt_core::Point2D;
        use crate::RoadNetworkBuilder;

        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point2D::new(0.0, 0.0));
        let c = b.add_node(Point2D::new(0.0, 100.0));
        let net = b.build();
        let result = DijkstraRouter.route(&net, a, c, TransportMode::Car);
        assert!(matches!(result, Err(SpatialError::NoRoute { .. })));
    }

    #[test]
    fn directed_one_way_blocks_return() {
        use dt_core::Point2D;
        use crate::RoadNetworkBuilder;

        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point2D::new(0.0, 0.0));
        let c = b.add_node(Point2D::new(0.0, 100.0));
        let link = b.add_link();
        b.add_directed_segment(a, c, 100.0, 1, 10.0, link);
        let net = b.build();

        assert!(DijkstraRouter.route(&net, a, c, TransportMode::Car).is_ok());
        assert!(DijkstraRouter.route(&net, c, a, TransportMode::Car).is_err());
    }

    #[test]
    fn travel_ticks_ceiling() {
        let (net, [n0, _, _, _, n4]) = super::helpers::grid_network();
        let route = DijkstraRouter.route(&net, n0, n4, TransportMode::Car).unwrap();
        assert_eq!(route.travel_ticks(3600), 1);
        assert_eq!(route.travel_ticks(60), 1);
        assert_eq!(route.travel_ticks(10), 3);
    }

    #[test]
    fn walk_mode_slower_than_car() {
        let (net, [n0, _, _, _, n4]) = super::helpers::grid_network();
        let car = DijkstraRouter.route(&net, n0, n4, TransportMode::Car).unwrap();
        let walk = DijkstraRouter.route(&net, n0, n4, TransportMode::Walk).unwrap();
        assert!(walk.total_travel_secs > car.total_travel_secs);
    }
}

// ── SpatialIndex (Aura) ─────────────────────────────────────────────────────────

#[cfg(test)]
mod aura {
    use dt_core::{AgentId, Point2D};
    use crate::SpatialIndex;

    #[test]
    fn empty_index_has_no_results() {
        let idx = SpatialIndex::empty();
        assert!(idx.is_empty());
        assert!(idx.query_rect(Point2D::new(-10.0, -10.0), Point2D::new(10.0, 10.0)).is_empty());
    }

    #[test]
    fn query_rect_finds_contained_agents() {
        let idx = SpatialIndex::build([
            (AgentId(0), Point2D::new(1.0, 1.0)),
            (AgentId(1), Point2D::new(5.0, 5.0)),
            (AgentId(2), Point2D::new(100.0, 100.0)),
        ]);
        let mut found = idx.query_rect(Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0));
        found.sort();
        assert_eq!(found, vec![AgentId(0), AgentId(1)]);
    }

    #[test]
    fn query_radius_excludes_far_agents() {
        let idx = SpatialIndex::build([
            (AgentId(0), Point2D::new(0.0, 0.0)),
            (AgentId(1), Point2D::new(3.0, 4.0)), // distance 5
            (AgentId(2), Point2D::new(100.0, 0.0)),
        ]);
        let mut found = idx.query_radius(Point2D::new(0.0, 0.0), 5.0);
        found.sort();
        assert_eq!(found, vec![AgentId(0), AgentId(1)]);
    }

    #[test]
    fn nearest_returns_closest() {
        let idx = SpatialIndex::build([
            (AgentId(0), Point2D::new(0.0, 0.0)),
            (AgentId(1), Point2D::new(50.0, 50.0)),
        ]);
        assert_eq!(idx.nearest(Point2D::new(1.0, 1.0)), Some(AgentId(0)));
    }
}

// ── CSV loader ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::loader::load_network_readers;

    #[test]
    fn loads_nodes_and_segments() {
        let nodes = "node_id,x,y\n0,0.0,0.0\n1,100.0,0.0\n";
        let segments =
            "from_node,to_node,length_m,lane_count,free_flow_speed_mps,link_name\n0,1,100.0,2,10.0,Main EB\n1,0,100.0,2,10.0,Main WB\n";

        let net = load_network_readers(Cursor::new(nodes), Cursor::new(segments)).unwrap();
        assert_eq!(net.node_count(), 2);
        assert_eq!(net.segment_count(), 2);
    }

    #[test]
    fn rejects_segment_referencing_unknown_node() {
        let nodes = "node_id,x,y\n0,0.0,0.0\n";
        let segments =
            "from_node,to_node,length_m,lane_count,free_flow_speed_mps,link_name\n0,99,100.0,1,10.0,Bad\n";

        let err = load_network_readers(Cursor::new(nodes), Cursor::new(segments)).unwrap_err();
        assert!(matches!(err, crate::SpatialError::Inconsistent(_)));
    }

    #[test]
    fn segments_sharing_link_name_group_together() {
        let nodes = "node_id,x,y\n0,0.0,0.0\n1,100.0,0.0\n2,200.0,0.0\n";
        let segments = "from_node,to_node,length_m,lane_count,free_flow_speed_mps,link_name\n0,1,100.0,1,10.0,Main\n1,2,100.0,1,10.0,Main\n";

        let net = load_network_readers(Cursor::new(nodes), Cursor::new(segments)).unwrap();
        assert_eq!(net.links.len(), 1);
        assert_eq!(net.segments_of(dt_core::LinkId(0)).len(), 2);
    }
}
