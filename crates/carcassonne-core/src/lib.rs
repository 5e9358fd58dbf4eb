//! A tile-laying game engine in the Carcassonne family
//!
//! This crate provides the core rules engine for a tile placement game, including:
//! - Square-grid board with twelve edge sub-positions per tile
//! - Validated tile catalog built from hand-authored definitions
//! - Union-find feature tracking for roads, cities, cloisters and fields
//! - Token placement, majority scoring, and optional expansion modules
//!
//! # Architecture
//!
//! The game engine is designed to be platform-agnostic. It can be compiled to:
//! - Native Rust for server-side game hosting
//! - WebAssembly for client-side single-player or local multiplayer
//!
//! # Modules
//!
//! - [`grid`]: Coordinates, rotations, edge sub-positions, and the board
//! - [`tile`]: Segments, tile definitions, and the validated catalog
//! - [`features`]: Union-find tracker for connected features
//! - [`placement`]: Tile placement legality
//! - [`meeple`]: Token placement legality
//! - [`scoring`]: Majority detection and point calculation
//! - [`modules`]: Expansion module configuration and runtime state
//! - [`game`]: Game state machine

pub mod actions;
pub mod features;
pub mod game;
pub mod grid;
pub mod meeple;
pub mod modules;
pub mod placement;
pub mod player;
pub mod scoring;
pub mod tile;
pub mod tileset;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent};
pub use features::{Feature, FeatureMetadata, FeatureTracker};
pub use game::{GameConfig, GameError, GamePhase, GameState, TurnPhase};
pub use grid::{
    Board, Coordinate, Direction, EdgePosition, MeepleKey, NodeKey, PlacedTile, Rotation,
};
pub use modules::{
    DragonFairyState, FarmerReturnPrompt, ModuleStates, RuleModule, TradersBuildersState,
};
pub use player::{
    CommodityHand, MeeplePlacement, MeepleSupply, MeepleType, Player, PlayerColor, PlayerId,
};
pub use scoring::{ScoreEvent, ScoringProfile};
pub use tile::{
    CatalogError, Commodity, FeatureKind, Segment, TileCatalog, TileDefinition, TileInstance,
};
