//! A 5-node synthetic road network inspired by the geography of Mobile, AL.

use dt_core::{NodeId, Point2D};
use dt_spatial::{RoadNetwork, RoadNetworkBuilder};

/// Build the 5-node network.
///
/// Returns `(network, [north_residential, south_residential, downtown,
/// commerce_park, connector])`. Coordinates are plain planar metres, not
/// lat/lon — the geography only shapes the relative layout.
pub fn build_network() -> (RoadNetwork, [NodeId; 5]) {
    let mut b = RoadNetworkBuilder::new();

    let north_residential = b.add_node(Point2D::new(0.0, 4_500.0));
    let south_residential = b.add_node(Point2D::new(4_200.0, 0.0));
    let downtown = b.add_node(Point2D::new(2_200.0, 2_800.0));
    let commerce_park = b.add_node(Point2D::new(4_200.0, 2_500.0));
    let connector = b.add_node(Point2D::new(1_000.0, 1_400.0));

    // Bidirectional roads, ~45 km/h urban free-flow speed (12.5 m/s), two lanes.
    const SPEED_MPS: f32 = 12.5;
    const LANES: u8 = 2;

    for (a, b_node, length_m) in [
        (north_residential, downtown, 2_500.0),
        (north_residential, connector, 1_500.0),
        (connector, downtown, 1_000.0),
        (south_residential, connector, 1_500.0),
        (south_residential, commerce_park, 2_000.0),
        (downtown, commerce_park, 2_000.0),
    ] {
        let link = b.add_link();
        b.add_road(a, b_node, length_m, LANES, SPEED_MPS, link);
    }

    let net = b.build();
    (
        net,
        [north_residential, south_residential, downtown, commerce_park, connector],
    )
}
