//! Tile catalogs for the base game and the three expansion sets.
//!
//! - Base game: 24 designs, 72 physical tiles, `base_d` seeds the grid
//! - Inns & Cathedrals: 18 designs, one copy each
//! - Traders & Builders: 23 designs, 24 tiles (6 cloth, 9 wheat, 9 wine)
//! - Dragon & Fairy: 26 designs (6 volcano, 12 lair, 4 portal, 4 plain)
//!
//! Uniform sides use `with_side`; mixed sides spell out all three
//! sub-positions in clockwise order, so `SouthLeft` is the east end of the
//! south edge. Adjacency pairs record which segments touch inside the tile;
//! field scoring reads the field-to-city pairs at placement time.

use crate::grid::{Direction, EdgePosition};
use crate::modules::RuleModule;
use crate::tile::{Commodity, Segment, TileDefinition};

/// The 72-tile base set.
pub fn base_game() -> Vec<TileDefinition> {
    vec![
        // base_a: cloister with a road stub south
        TileDefinition::new("base_a", 2)
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::cloister("cloister0"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("field0", "road0")
            .with_adjacency("cloister0", "road0")
            .with_adjacency("cloister0", "field0"),
        // base_b: cloister in open fields
        TileDefinition::new("base_b", 4)
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::cloister("cloister0"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("field0", "cloister0"),
        // base_c: full-tile city with a pennant
        TileDefinition::new("base_c", 1)
            .with_segment(Segment::city("city0").with_pennant())
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "city0")
            .with_side(Direction::West, "city0"),
        // base_d: city cap north over an east-west road (starting tile)
        TileDefinition::new("base_d", 4)
            .starting()
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_edge(EdgePosition::EastLeft, "field1")
            .with_edge(EdgePosition::EastCenter, "road0")
            .with_edge(EdgePosition::EastRight, "field0")
            .with_side(Direction::South, "field0")
            .with_edge(EdgePosition::WestLeft, "field0")
            .with_edge(EdgePosition::WestCenter, "road0")
            .with_edge(EdgePosition::WestRight, "field1")
            .with_adjacency("city0", "field1")
            .with_adjacency("field1", "road0")
            .with_adjacency("road0", "field0"),
        // base_e: city cap north
        TileDefinition::new("base_e", 5)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // base_f: city spanning east to west, pennant
        TileDefinition::new("base_f", 2)
            .with_segment(Segment::city("city0").with_pennant())
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field1")
            .with_side(Direction::West, "city0")
            .with_adjacency("field0", "city0")
            .with_adjacency("city0", "field1"),
        // base_g: city spanning east to west
        TileDefinition::new("base_g", 1)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field1")
            .with_side(Direction::West, "city0")
            .with_adjacency("field0", "city0")
            .with_adjacency("city0", "field1"),
        // base_h: separate city caps north and south
        TileDefinition::new("base_h", 3)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::city("city1"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "city1")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("field0", "city1"),
        // base_i: separate city caps east and south
        TileDefinition::new("base_i", 2)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::city("city1"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "city1")
            .with_side(Direction::West, "field0")
            .with_adjacency("city1", "field0")
            .with_adjacency("field0", "city0"),
        // base_j: city cap east, road curving south to west
        TileDefinition::new("base_j", 3)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "city0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field1")
            .with_edge(EdgePosition::WestLeft, "field1")
            .with_edge(EdgePosition::WestCenter, "road0")
            .with_edge(EdgePosition::WestRight, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("field0", "road0")
            .with_adjacency("road0", "field1"),
        // base_k: city cap north, road curving south to west
        TileDefinition::new("base_k", 3)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field1")
            .with_edge(EdgePosition::WestLeft, "field1")
            .with_edge(EdgePosition::WestCenter, "road0")
            .with_edge(EdgePosition::WestRight, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // base_l: city cap north over a three-way crossroads
        TileDefinition::new("base_l", 3)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road_e"))
            .with_segment(Segment::road("road_s"))
            .with_segment(Segment::road("road_w"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_segment(Segment::field("field2"))
            .with_side(Direction::North, "city0")
            .with_edge(EdgePosition::EastLeft, "field2")
            .with_edge(EdgePosition::EastCenter, "road_e")
            .with_edge(EdgePosition::EastRight, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road_s")
            .with_edge(EdgePosition::SouthRight, "field1")
            .with_edge(EdgePosition::WestLeft, "field1")
            .with_edge(EdgePosition::WestCenter, "road_w")
            .with_edge(EdgePosition::WestRight, "field2")
            .with_adjacency("city0", "field2")
            .with_adjacency("road_w", "field2")
            .with_adjacency("road_e", "field2")
            .with_adjacency("road_e", "field0")
            .with_adjacency("road_s", "field0")
            .with_adjacency("road_s", "field1")
            .with_adjacency("road_w", "field1"),
        // base_m: city filling the north-west corner, pennant
        TileDefinition::new("base_m", 2)
            .with_segment(Segment::city("city0").with_pennant())
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0"),
        // base_n: city filling the north-west corner
        TileDefinition::new("base_n", 3)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0"),
        // base_o: north-west corner city with a pennant, road curving east to south
        TileDefinition::new("base_o", 2)
            .with_segment(Segment::city("city0").with_pennant())
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_edge(EdgePosition::EastLeft, "field1")
            .with_edge(EdgePosition::EastCenter, "road0")
            .with_edge(EdgePosition::EastRight, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field1")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field1")
            .with_adjacency("road0", "field1")
            .with_adjacency("road0", "field0"),
        // base_p: north-west corner city, road curving east to south
        TileDefinition::new("base_p", 3)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_edge(EdgePosition::EastLeft, "field1")
            .with_edge(EdgePosition::EastCenter, "road0")
            .with_edge(EdgePosition::EastRight, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field1")
            .with_side(Direction::West, "city0")
            .with_adjacency("road0", "field1")
            .with_adjacency("road0", "field0")
            .with_adjacency("city0", "field1"),
        // base_q: three-sided city with a pennant, field south
        TileDefinition::new("base_q", 1)
            .with_segment(Segment::city("city0").with_pennant())
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0"),
        // base_r: three-sided city, field south
        TileDefinition::new("base_r", 3)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0"),
        // base_s: three-sided city with a pennant, road stub south
        TileDefinition::new("base_s", 2)
            .with_segment(Segment::city("city0").with_pennant())
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_edge(EdgePosition::SouthLeft, "field1")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0")
            .with_adjacency("city0", "road0")
            .with_adjacency("city0", "field1")
            .with_adjacency("road0", "field1")
            .with_adjacency("road0", "field0"),
        // base_t: three-sided city, road stub south
        TileDefinition::new("base_t", 1)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_edge(EdgePosition::SouthLeft, "field1")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0")
            .with_adjacency("city0", "field1")
            .with_adjacency("city0", "road0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // base_u: road running north to south
        TileDefinition::new("base_u", 8)
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_edge(EdgePosition::NorthLeft, "field1")
            .with_edge(EdgePosition::NorthCenter, "road0")
            .with_edge(EdgePosition::NorthRight, "field0")
            .with_side(Direction::East, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field1")
            .with_side(Direction::West, "field1")
            .with_adjacency("field0", "road0")
            .with_adjacency("field1", "road0"),
        // base_v: road curving south to west
        TileDefinition::new("base_v", 9)
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field1")
            .with_edge(EdgePosition::WestLeft, "field1")
            .with_edge(EdgePosition::WestCenter, "road0")
            .with_edge(EdgePosition::WestRight, "field0")
            .with_adjacency("field1", "road0")
            .with_adjacency("field0", "road0"),
        // base_w: three-way crossroads
        TileDefinition::new("base_w", 4)
            .with_segment(Segment::road("road_e"))
            .with_segment(Segment::road("road_s"))
            .with_segment(Segment::road("road_w"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_segment(Segment::field("field2"))
            .with_side(Direction::North, "field0")
            .with_edge(EdgePosition::EastLeft, "field0")
            .with_edge(EdgePosition::EastCenter, "road_e")
            .with_edge(EdgePosition::EastRight, "field1")
            .with_edge(EdgePosition::SouthLeft, "field1")
            .with_edge(EdgePosition::SouthCenter, "road_s")
            .with_edge(EdgePosition::SouthRight, "field2")
            .with_edge(EdgePosition::WestLeft, "field2")
            .with_edge(EdgePosition::WestCenter, "road_w")
            .with_edge(EdgePosition::WestRight, "field0")
            .with_adjacency("field0", "road_w")
            .with_adjacency("field0", "road_e")
            .with_adjacency("field1", "road_e")
            .with_adjacency("field1", "road_s")
            .with_adjacency("field2", "road_s")
            .with_adjacency("field2", "road_w"),
        // base_x: four-way crossroads
        TileDefinition::new("base_x", 1)
            .with_segment(Segment::road("road_n"))
            .with_segment(Segment::road("road_e"))
            .with_segment(Segment::road("road_s"))
            .with_segment(Segment::road("road_w"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_segment(Segment::field("field2"))
            .with_segment(Segment::field("field3"))
            .with_edge(EdgePosition::NorthLeft, "field3")
            .with_edge(EdgePosition::NorthCenter, "road_n")
            .with_edge(EdgePosition::NorthRight, "field0")
            .with_edge(EdgePosition::EastLeft, "field0")
            .with_edge(EdgePosition::EastCenter, "road_e")
            .with_edge(EdgePosition::EastRight, "field1")
            .with_edge(EdgePosition::SouthLeft, "field1")
            .with_edge(EdgePosition::SouthCenter, "road_s")
            .with_edge(EdgePosition::SouthRight, "field2")
            .with_edge(EdgePosition::WestLeft, "field2")
            .with_edge(EdgePosition::WestCenter, "road_w")
            .with_edge(EdgePosition::WestRight, "field3")
            .with_adjacency("field0", "road_e")
            .with_adjacency("field1", "road_e")
            .with_adjacency("field1", "road_s")
            .with_adjacency("field2", "road_s")
            .with_adjacency("field2", "road_w")
            .with_adjacency("field3", "road_w")
            .with_adjacency("field3", "road_n")
            .with_adjacency("field0", "road_n"),
    ]
}

/// The 18-tile Inns & Cathedrals set. One copy of each design.
pub fn inns_cathedrals() -> Vec<TileDefinition> {
    vec![
        // ic_a: full-tile city with a cathedral
        TileDefinition::new("ic_a", 1)
            .with_segment(Segment::city("city0").with_cathedral())
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "city0")
            .with_side(Direction::West, "city0"),
        // ic_b: three-sided cathedral city, field south
        TileDefinition::new("ic_b", 1)
            .with_segment(Segment::city("city0").with_cathedral())
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0"),
        // ic_c: north-east corner city, road curving south to west
        TileDefinition::new("ic_c", 1)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field1")
            .with_edge(EdgePosition::WestLeft, "field1")
            .with_edge(EdgePosition::WestCenter, "road0")
            .with_edge(EdgePosition::WestRight, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // ic_d: north-east corner city with a pennant, road curving south to west
        TileDefinition::new("ic_d", 1)
            .with_segment(Segment::city("city0").with_pennant())
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field1")
            .with_edge(EdgePosition::WestLeft, "field1")
            .with_edge(EdgePosition::WestCenter, "road0")
            .with_edge(EdgePosition::WestRight, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // ic_e: city cap north, inn road curving south to west
        TileDefinition::new("ic_e", 1)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0").with_inn())
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field1")
            .with_edge(EdgePosition::WestLeft, "field1")
            .with_edge(EdgePosition::WestCenter, "road0")
            .with_edge(EdgePosition::WestRight, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // ic_f: city cap north, inn road east to west
        TileDefinition::new("ic_f", 1)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0").with_inn())
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_edge(EdgePosition::EastLeft, "field1")
            .with_edge(EdgePosition::EastCenter, "road0")
            .with_edge(EdgePosition::EastRight, "field0")
            .with_side(Direction::South, "field0")
            .with_edge(EdgePosition::WestLeft, "field0")
            .with_edge(EdgePosition::WestCenter, "road0")
            .with_edge(EdgePosition::WestRight, "field1")
            .with_adjacency("city0", "field1")
            .with_adjacency("road0", "field1")
            .with_adjacency("road0", "field0"),
        // ic_g: city cap north, road stub south
        TileDefinition::new("ic_g", 1)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("road0", "field0"),
        // ic_h: city cap north with a pennant
        TileDefinition::new("ic_h", 1)
            .with_segment(Segment::city("city0").with_pennant())
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // ic_i: inn road north to south
        TileDefinition::new("ic_i", 1)
            .with_segment(Segment::road("road0").with_inn())
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_edge(EdgePosition::NorthLeft, "field1")
            .with_edge(EdgePosition::NorthCenter, "road0")
            .with_edge(EdgePosition::NorthRight, "field0")
            .with_side(Direction::East, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field1")
            .with_side(Direction::West, "field1")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // ic_j: inn road curving south to west
        TileDefinition::new("ic_j", 1)
            .with_segment(Segment::road("road0").with_inn())
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field1")
            .with_edge(EdgePosition::WestLeft, "field1")
            .with_edge(EdgePosition::WestCenter, "road0")
            .with_edge(EdgePosition::WestRight, "field0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // ic_k: north-east corner city with a pennant, split fields west
        TileDefinition::new("ic_k", 1)
            .with_segment(Segment::city("city0").with_pennant())
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field1")
            .with_edge(EdgePosition::WestLeft, "field1")
            .with_edge(EdgePosition::WestCenter, "field0")
            .with_edge(EdgePosition::WestRight, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("city0", "field1"),
        // ic_l: three-sided city with a pennant, field south
        TileDefinition::new("ic_l", 1)
            .with_segment(Segment::city("city0").with_pennant())
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0"),
        // ic_m: city filling the north-west corner
        TileDefinition::new("ic_m", 1)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0"),
        // ic_n: facing city caps east and west
        TileDefinition::new("ic_n", 1)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::city("city1"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "city1")
            .with_adjacency("city0", "field0")
            .with_adjacency("field0", "city1"),
        // ic_o: four-way crossroads, an inn on every road
        TileDefinition::new("ic_o", 1)
            .with_segment(Segment::road("road_n").with_inn())
            .with_segment(Segment::road("road_e").with_inn())
            .with_segment(Segment::road("road_s").with_inn())
            .with_segment(Segment::road("road_w").with_inn())
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_segment(Segment::field("field2"))
            .with_segment(Segment::field("field3"))
            .with_edge(EdgePosition::NorthLeft, "field3")
            .with_edge(EdgePosition::NorthCenter, "road_n")
            .with_edge(EdgePosition::NorthRight, "field0")
            .with_edge(EdgePosition::EastLeft, "field0")
            .with_edge(EdgePosition::EastCenter, "road_e")
            .with_edge(EdgePosition::EastRight, "field1")
            .with_edge(EdgePosition::SouthLeft, "field1")
            .with_edge(EdgePosition::SouthCenter, "road_s")
            .with_edge(EdgePosition::SouthRight, "field2")
            .with_edge(EdgePosition::WestLeft, "field2")
            .with_edge(EdgePosition::WestCenter, "road_w")
            .with_edge(EdgePosition::WestRight, "field3")
            .with_adjacency("field0", "road_e")
            .with_adjacency("field1", "road_e")
            .with_adjacency("field1", "road_s")
            .with_adjacency("field2", "road_s")
            .with_adjacency("field2", "road_w")
            .with_adjacency("field3", "road_w")
            .with_adjacency("field3", "road_n")
            .with_adjacency("field0", "road_n"),
        // ic_p: city cap north, road curving east to south
        TileDefinition::new("ic_p", 1)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_edge(EdgePosition::EastLeft, "field0")
            .with_edge(EdgePosition::EastCenter, "road0")
            .with_edge(EdgePosition::EastRight, "field1")
            .with_edge(EdgePosition::SouthLeft, "field1")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // ic_q: three-sided city, road stub south
        TileDefinition::new("ic_q", 1)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_edge(EdgePosition::SouthLeft, "field1")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0")
            .with_adjacency("city0", "field1")
            .with_adjacency("city0", "road0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // ic_r: cloister on a road running north to south
        TileDefinition::new("ic_r", 1)
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::cloister("cloister0"))
            .with_edge(EdgePosition::NorthLeft, "field0")
            .with_edge(EdgePosition::NorthCenter, "road0")
            .with_edge(EdgePosition::NorthRight, "field0")
            .with_side(Direction::East, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("field0", "road0")
            .with_adjacency("cloister0", "road0")
            .with_adjacency("cloister0", "field0"),
    ]
}

/// The 24-tile Traders & Builders set. Every city carries a commodity.
pub fn traders_builders() -> Vec<TileDefinition> {
    vec![
        // tb_a: full-tile city, cloth
        TileDefinition::new("tb_a", 1)
            .with_segment(Segment::city("city0").with_commodity(Commodity::Cloth))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "city0")
            .with_side(Direction::West, "city0"),
        // tb_b: north-east corner city with a pennant, cloth
        TileDefinition::new("tb_b", 1)
            .with_segment(
                Segment::city("city0")
                    .with_pennant()
                    .with_commodity(Commodity::Cloth),
            )
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // tb_c: north-west corner city with a pennant, cloth
        TileDefinition::new("tb_c", 1)
            .with_segment(
                Segment::city("city0")
                    .with_pennant()
                    .with_commodity(Commodity::Cloth),
            )
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0"),
        // tb_d: north-east corner city, cloth
        TileDefinition::new("tb_d", 1)
            .with_segment(Segment::city("city0").with_commodity(Commodity::Cloth))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // tb_e: city cap north over an east-west road, cloth
        TileDefinition::new("tb_e", 1)
            .with_segment(Segment::city("city0").with_commodity(Commodity::Cloth))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_edge(EdgePosition::EastLeft, "field1")
            .with_edge(EdgePosition::EastCenter, "road0")
            .with_edge(EdgePosition::EastRight, "field0")
            .with_side(Direction::South, "field0")
            .with_edge(EdgePosition::WestLeft, "field0")
            .with_edge(EdgePosition::WestCenter, "road0")
            .with_edge(EdgePosition::WestRight, "field1")
            .with_adjacency("city0", "field1")
            .with_adjacency("road0", "field1")
            .with_adjacency("road0", "field0"),
        // tb_f: city cap north, cloth
        TileDefinition::new("tb_f", 1)
            .with_segment(Segment::city("city0").with_commodity(Commodity::Cloth))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // tb_g: three-sided city with a pennant, wheat
        TileDefinition::new("tb_g", 1)
            .with_segment(
                Segment::city("city0")
                    .with_pennant()
                    .with_commodity(Commodity::Wheat),
            )
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0"),
        // tb_h: three-sided city, wheat
        TileDefinition::new("tb_h", 1)
            .with_segment(Segment::city("city0").with_commodity(Commodity::Wheat))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0"),
        // tb_i: city across north, east and south, wheat
        TileDefinition::new("tb_i", 1)
            .with_segment(Segment::city("city0").with_commodity(Commodity::Wheat))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "city0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // tb_j: city cap north with a pennant, road curving south to west, wheat
        TileDefinition::new("tb_j", 1)
            .with_segment(
                Segment::city("city0")
                    .with_pennant()
                    .with_commodity(Commodity::Wheat),
            )
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field1")
            .with_edge(EdgePosition::WestLeft, "field1")
            .with_edge(EdgePosition::WestCenter, "road0")
            .with_edge(EdgePosition::WestRight, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // tb_k: north-west corner city, wheat
        TileDefinition::new("tb_k", 1)
            .with_segment(Segment::city("city0").with_commodity(Commodity::Wheat))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0"),
        // tb_l: north-east corner city with a pennant, wheat
        TileDefinition::new("tb_l", 1)
            .with_segment(
                Segment::city("city0")
                    .with_pennant()
                    .with_commodity(Commodity::Wheat),
            )
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // tb_m: city cap north, wheat
        TileDefinition::new("tb_m", 2)
            .with_segment(Segment::city("city0").with_commodity(Commodity::Wheat))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // tb_n: city cap north, road stub south, wheat
        TileDefinition::new("tb_n", 1)
            .with_segment(Segment::city("city0").with_commodity(Commodity::Wheat))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("road0", "field0"),
        // tb_o: three-sided city with a pennant, road stub south, wine
        TileDefinition::new("tb_o", 1)
            .with_segment(
                Segment::city("city0")
                    .with_pennant()
                    .with_commodity(Commodity::Wine),
            )
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_edge(EdgePosition::SouthLeft, "field1")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0")
            .with_adjacency("city0", "field1")
            .with_adjacency("city0", "road0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // tb_p: city across north, east and south with a pennant, wine
        TileDefinition::new("tb_p", 1)
            .with_segment(
                Segment::city("city0")
                    .with_pennant()
                    .with_commodity(Commodity::Wine),
            )
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "city0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // tb_q: north-east corner city, road curving south to west, wine
        TileDefinition::new("tb_q", 1)
            .with_segment(Segment::city("city0").with_commodity(Commodity::Wine))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field1")
            .with_edge(EdgePosition::WestLeft, "field1")
            .with_edge(EdgePosition::WestCenter, "road0")
            .with_edge(EdgePosition::WestRight, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // tb_r: north-west corner city, road curving east to south, wine
        TileDefinition::new("tb_r", 1)
            .with_segment(Segment::city("city0").with_commodity(Commodity::Wine))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_edge(EdgePosition::EastLeft, "field1")
            .with_edge(EdgePosition::EastCenter, "road0")
            .with_edge(EdgePosition::EastRight, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field1")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field1")
            .with_adjacency("road0", "field1")
            .with_adjacency("road0", "field0"),
        // tb_s: city cap north, road stub east, wine
        TileDefinition::new("tb_s", 1)
            .with_segment(Segment::city("city0").with_commodity(Commodity::Wine))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_edge(EdgePosition::EastLeft, "field0")
            .with_edge(EdgePosition::EastCenter, "road0")
            .with_edge(EdgePosition::EastRight, "field1")
            .with_side(Direction::South, "field1")
            .with_side(Direction::West, "field1")
            .with_adjacency("city0", "field0")
            .with_adjacency("city0", "field1")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // tb_t: city cap east, wine
        TileDefinition::new("tb_t", 1)
            .with_segment(Segment::city("city0").with_commodity(Commodity::Wine))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // tb_u: city across the south reaching both corners, road stub north, wine
        TileDefinition::new("tb_u", 1)
            .with_segment(Segment::city("city0").with_commodity(Commodity::Wine))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_edge(EdgePosition::NorthLeft, "field0")
            .with_edge(EdgePosition::NorthCenter, "road0")
            .with_edge(EdgePosition::NorthRight, "field1")
            .with_edge(EdgePosition::EastLeft, "field1")
            .with_edge(EdgePosition::EastCenter, "field1")
            .with_edge(EdgePosition::EastRight, "city0")
            .with_side(Direction::South, "city0")
            .with_edge(EdgePosition::WestLeft, "city0")
            .with_edge(EdgePosition::WestCenter, "field0")
            .with_edge(EdgePosition::WestRight, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("city0", "field1")
            .with_adjacency("city0", "road0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // tb_v: city cap west, wine
        TileDefinition::new("tb_v", 1)
            .with_segment(Segment::city("city0").with_commodity(Commodity::Wine))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0"),
        // tb_w: city cap north, wine
        TileDefinition::new("tb_w", 1)
            .with_segment(Segment::city("city0").with_commodity(Commodity::Wine))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
    ]
}

/// The 26-tile Dragon & Fairy set.
pub fn dragon_fairy() -> Vec<TileDefinition> {
    vec![
        // df_1: volcano in open fields
        TileDefinition::new("df_1", 1)
            .with_volcano()
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0"),
        // df_x: volcano under a city cap north
        TileDefinition::new("df_x", 1)
            .with_volcano()
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // df_2: volcano on a road running north to south
        TileDefinition::new("df_2", 1)
            .with_volcano()
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_edge(EdgePosition::NorthLeft, "field0")
            .with_edge(EdgePosition::NorthCenter, "road0")
            .with_edge(EdgePosition::NorthRight, "field1")
            .with_side(Direction::East, "field1")
            .with_edge(EdgePosition::SouthLeft, "field1")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // df_y: volcano with a city cap north, road curving east to south
        TileDefinition::new("df_y", 1)
            .with_volcano()
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_edge(EdgePosition::EastLeft, "field0")
            .with_edge(EdgePosition::EastCenter, "road0")
            .with_edge(EdgePosition::EastRight, "field1")
            .with_edge(EdgePosition::SouthLeft, "field1")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // df_w: volcano under a city cap east
        TileDefinition::new("df_w", 1)
            .with_volcano()
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // df_z: volcano on a road running east to west
        TileDefinition::new("df_z", 1)
            .with_volcano()
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "field0")
            .with_edge(EdgePosition::EastLeft, "field0")
            .with_edge(EdgePosition::EastCenter, "road0")
            .with_edge(EdgePosition::EastRight, "field1")
            .with_side(Direction::South, "field1")
            .with_edge(EdgePosition::WestLeft, "field1")
            .with_edge(EdgePosition::WestCenter, "road0")
            .with_edge(EdgePosition::WestRight, "field0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // df_k: lair with a city cap north, road stub south
        TileDefinition::new("df_k", 1)
            .with_lair()
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field1")
            .with_edge(EdgePosition::SouthLeft, "field1")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("city0", "field1")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // df_h: lair in open fields
        TileDefinition::new("df_h", 1)
            .with_lair()
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0"),
        // df_c: lair in a north-east corner city with a pennant
        TileDefinition::new("df_c", 1)
            .with_lair()
            .with_segment(Segment::city("city0").with_pennant())
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // df_l: lair with a city cap west on a north-south road
        TileDefinition::new("df_l", 1)
            .with_lair()
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_edge(EdgePosition::NorthLeft, "field0")
            .with_edge(EdgePosition::NorthCenter, "road0")
            .with_edge(EdgePosition::NorthRight, "field1")
            .with_side(Direction::East, "field1")
            .with_edge(EdgePosition::SouthLeft, "field1")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // df_g: lair on a road curving south to west
        TileDefinition::new("df_g", 1)
            .with_lair()
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field1")
            .with_edge(EdgePosition::WestLeft, "field1")
            .with_edge(EdgePosition::WestCenter, "road0")
            .with_edge(EdgePosition::WestRight, "field0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // df_i: lair beside a cloister
        TileDefinition::new("df_i", 1)
            .with_lair()
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::cloister("cloister0"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("field0", "cloister0"),
        // df_m: lair with a city cap north over an east-west road
        TileDefinition::new("df_m", 1)
            .with_lair()
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_segment(Segment::field("field2"))
            .with_side(Direction::North, "city0")
            .with_edge(EdgePosition::EastLeft, "field1")
            .with_edge(EdgePosition::EastCenter, "road0")
            .with_edge(EdgePosition::EastRight, "field2")
            .with_side(Direction::South, "field2")
            .with_edge(EdgePosition::WestLeft, "field2")
            .with_edge(EdgePosition::WestCenter, "road0")
            .with_edge(EdgePosition::WestRight, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("city0", "field1")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1")
            .with_adjacency("road0", "field2"),
        // df_j: lair under a city cap south
        TileDefinition::new("df_j", 1)
            .with_lair()
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "city0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // df_d: lair on a road curving north to east
        TileDefinition::new("df_d", 1)
            .with_lair()
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_edge(EdgePosition::NorthLeft, "field0")
            .with_edge(EdgePosition::NorthCenter, "road0")
            .with_edge(EdgePosition::NorthRight, "field1")
            .with_edge(EdgePosition::EastLeft, "field1")
            .with_edge(EdgePosition::EastCenter, "road0")
            .with_edge(EdgePosition::EastRight, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // df_e: lair in a three-sided city
        TileDefinition::new("df_e", 1)
            .with_lair()
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "city0")
            .with_adjacency("city0", "field0"),
        // df_o: lair at a cloister with a road stub south
        TileDefinition::new("df_o", 1)
            .with_lair()
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::cloister("cloister0"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("field0", "road0")
            .with_adjacency("cloister0", "road0")
            .with_adjacency("cloister0", "field0"),
        // df_f: lair in a city cap north with a pennant
        TileDefinition::new("df_f", 1)
            .with_lair()
            .with_segment(Segment::city("city0").with_pennant())
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // df_s: portal on a road running north to south
        TileDefinition::new("df_s", 1)
            .with_portal()
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_edge(EdgePosition::NorthLeft, "field0")
            .with_edge(EdgePosition::NorthCenter, "road0")
            .with_edge(EdgePosition::NorthRight, "field1")
            .with_side(Direction::East, "field1")
            .with_edge(EdgePosition::SouthLeft, "field1")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // df_r: portal under a city cap north
        TileDefinition::new("df_r", 1)
            .with_portal()
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // df_u: portal with a city cap south under an east-west road
        TileDefinition::new("df_u", 1)
            .with_portal()
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "field0")
            .with_edge(EdgePosition::EastLeft, "field0")
            .with_edge(EdgePosition::EastCenter, "road0")
            .with_edge(EdgePosition::EastRight, "field1")
            .with_side(Direction::South, "city0")
            .with_edge(EdgePosition::WestLeft, "field1")
            .with_edge(EdgePosition::WestCenter, "road0")
            .with_edge(EdgePosition::WestRight, "field0")
            .with_adjacency("city0", "field1")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
        // df_t: portal at a cloister with a road stub east
        TileDefinition::new("df_t", 1)
            .with_portal()
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::cloister("cloister0"))
            .with_side(Direction::North, "field0")
            .with_edge(EdgePosition::EastLeft, "field0")
            .with_edge(EdgePosition::EastCenter, "road0")
            .with_edge(EdgePosition::EastRight, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("field0", "road0")
            .with_adjacency("cloister0", "road0")
            .with_adjacency("cloister0", "field0"),
        // df_n: facing city caps north and south between two fields
        TileDefinition::new("df_n", 1)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::city("city1"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field1")
            .with_side(Direction::South, "city1")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0")
            .with_adjacency("city0", "field1")
            .with_adjacency("city1", "field0")
            .with_adjacency("city1", "field1"),
        // df_q: three roads meeting mid-tile
        TileDefinition::new("df_q", 1)
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::road("road1"))
            .with_segment(Segment::road("road2"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_segment(Segment::field("field2"))
            .with_edge(EdgePosition::NorthLeft, "field2")
            .with_edge(EdgePosition::NorthCenter, "road0")
            .with_edge(EdgePosition::NorthRight, "field1")
            .with_edge(EdgePosition::EastLeft, "field1")
            .with_edge(EdgePosition::EastCenter, "road1")
            .with_edge(EdgePosition::EastRight, "field0")
            .with_edge(EdgePosition::SouthLeft, "field0")
            .with_edge(EdgePosition::SouthCenter, "road2")
            .with_edge(EdgePosition::SouthRight, "field2")
            .with_side(Direction::West, "field2")
            .with_adjacency("road0", "field2")
            .with_adjacency("road0", "field1")
            .with_adjacency("road1", "field1")
            .with_adjacency("road1", "field0")
            .with_adjacency("road2", "field0")
            .with_adjacency("road2", "field2"),
        // df_v: north-east corner city
        TileDefinition::new("df_v", 1)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "city0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field0"),
        // df_p: city cap east on a north-south road
        TileDefinition::new("df_p", 1)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_edge(EdgePosition::NorthLeft, "field0")
            .with_edge(EdgePosition::NorthCenter, "road0")
            .with_edge(EdgePosition::NorthRight, "field1")
            .with_side(Direction::East, "city0")
            .with_edge(EdgePosition::SouthLeft, "field1")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("city0", "field1")
            .with_adjacency("road0", "field0")
            .with_adjacency("road0", "field1"),
    ]
}

/// Definition list for a game with the given rule modules enabled.
///
/// Always starts from the base set; each enabled module appends its
/// own tile set.
pub fn definitions_for(modules: &[RuleModule]) -> Vec<TileDefinition> {
    let mut definitions = base_game();
    for module in modules {
        match module {
            RuleModule::InnsCathedrals => definitions.extend(inns_cathedrals()),
            RuleModule::TradersBuilders { .. } => definitions.extend(traders_builders()),
            RuleModule::DragonFairy => definitions.extend(dragon_fairy()),
        }
    }
    definitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{FeatureKind, TileCatalog, TileDefinition};
    use pretty_assertions::assert_eq;

    fn validated(definitions: Vec<TileDefinition>) -> TileCatalog {
        TileCatalog::build(definitions).expect("tile set should validate")
    }

    fn instance_total(definitions: &[TileDefinition]) -> u32 {
        definitions.iter().map(|d| d.count).sum()
    }

    #[test]
    fn test_base_set_distribution() {
        let defs = base_game();
        assert_eq!(defs.len(), 24, "base set has 24 designs");
        assert_eq!(instance_total(&defs), 72, "base set has 72 tiles");

        let starting: Vec<&TileDefinition> = defs.iter().filter(|d| d.starting).collect();
        assert_eq!(starting.len(), 1, "exactly one starting design");
        assert_eq!(starting[0].id, "base_d");
        assert_eq!(starting[0].count, 4);
    }

    #[test]
    fn test_base_set_validates() {
        let catalog = validated(base_game());
        assert_eq!(catalog.total_tile_count(), 72);
        assert_eq!(catalog.expand_counts().len(), 72);
        assert_eq!(
            catalog.starting_definition().map(|d| d.id.as_str()),
            Some("base_d")
        );
    }

    #[test]
    fn test_base_pennant_count() {
        let pennants: u32 = base_game()
            .iter()
            .map(|d| d.count * d.segments.iter().filter(|s| s.pennant).count() as u32)
            .sum();
        assert_eq!(pennants, 10, "base set carries ten pennants");
    }

    #[test]
    fn test_base_field_city_pairs() {
        let catalog = validated(base_game());
        let d = catalog.get("base_d").expect("base_d exists");
        assert_eq!(d.adjacent_city_segments("field1"), vec!["city0"]);
        assert!(d.adjacent_city_segments("field0").is_empty());

        let h = catalog.get("base_h").expect("base_h exists");
        assert_eq!(h.adjacent_city_segments("field0"), vec!["city0", "city1"]);
    }

    #[test]
    fn test_inns_cathedrals_distribution() {
        let defs = inns_cathedrals();
        assert_eq!(defs.len(), 18, "expansion has 18 designs");
        assert_eq!(instance_total(&defs), 18, "one copy of each design");

        let cathedrals = defs
            .iter()
            .flat_map(|d| &d.segments)
            .filter(|s| s.cathedral)
            .count();
        assert_eq!(cathedrals, 2, "two cathedral cities");

        let inn_roads = defs
            .iter()
            .flat_map(|d| &d.segments)
            .filter(|s| s.inn)
            .count();
        assert_eq!(inn_roads, 8, "eight inn road segments");
        validated(defs);
    }

    #[test]
    fn test_traders_builders_distribution() {
        let defs = traders_builders();
        assert_eq!(defs.len(), 23, "expansion has 23 designs");
        assert_eq!(instance_total(&defs), 24, "expansion has 24 tiles");

        let mut cloth = 0;
        let mut wheat = 0;
        let mut wine = 0;
        for def in &defs {
            for segment in &def.segments {
                match segment.commodity {
                    Some(Commodity::Cloth) => cloth += def.count,
                    Some(Commodity::Wheat) => wheat += def.count,
                    Some(Commodity::Wine) => wine += def.count,
                    None => {}
                }
            }
        }
        assert_eq!(cloth, 6, "six cloth tiles");
        assert_eq!(wheat, 9, "nine wheat tiles");
        assert_eq!(wine, 9, "nine wine tiles");

        let commodity_free = defs
            .iter()
            .filter(|d| {
                d.segments
                    .iter()
                    .all(|s| s.kind != FeatureKind::City || s.commodity.is_none())
            })
            .count();
        assert_eq!(commodity_free, 0, "every city carries a commodity");
        validated(defs);
    }

    #[test]
    fn test_dragon_fairy_distribution() {
        let defs = dragon_fairy();
        assert_eq!(defs.len(), 26, "expansion has 26 designs");
        assert_eq!(instance_total(&defs), 26, "one copy of each design");

        assert_eq!(defs.iter().filter(|d| d.volcano).count(), 6, "six volcanoes");
        assert_eq!(defs.iter().filter(|d| d.lair).count(), 12, "twelve lairs");
        assert_eq!(defs.iter().filter(|d| d.portal).count(), 4, "four portals");
        let plain = defs
            .iter()
            .filter(|d| !d.volcano && !d.lair && !d.portal)
            .count();
        assert_eq!(plain, 4, "four plain tiles");
        validated(defs);
    }

    #[test]
    fn test_combined_catalog() {
        let modules = [
            RuleModule::InnsCathedrals,
            RuleModule::TradersBuilders {
                support_anywhere: false,
            },
            RuleModule::DragonFairy,
        ];
        let catalog = validated(definitions_for(&modules));
        assert_eq!(catalog.len(), 24 + 18 + 23 + 26);
        assert_eq!(catalog.total_tile_count(), 72 + 18 + 24 + 26);
        assert_eq!(
            catalog.starting_definition().map(|d| d.id.as_str()),
            Some("base_d"),
            "the base starting tile is the only starting design"
        );
    }

    #[test]
    fn test_cloisters_never_reach_an_edge() {
        let modules = [RuleModule::InnsCathedrals, RuleModule::DragonFairy];
        for def in definitions_for(&modules) {
            if def.cloister_segment().is_some() {
                let cloister_edges = def
                    .edges
                    .values()
                    .filter(|id| {
                        def.segment(id)
                            .map(|s| s.kind == FeatureKind::Cloister)
                            .unwrap_or(false)
                    })
                    .count();
                assert_eq!(cloister_edges, 0, "{} maps a cloister to an edge", def.id);
            }
        }
    }
}
