use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use carcassonne_core::scoring;
use carcassonne_core::{
    Direction, GameAction, GameConfig, GameState, MeepleType, Segment, TileDefinition,
};

/// Drive a real game until `extra` tiles sit on the board and one more
/// waits in hand. A single all-field definition keeps every draw
/// placeable and merges everything into one large feature.
fn big_game(extra: u32) -> GameState {
    let mut meadow = TileDefinition::new("meadow", extra + 2)
        .starting()
        .with_segment(Segment::field("field0"));
    for direction in Direction::ALL {
        meadow = meadow.with_side(direction, "field0");
    }
    let config =
        GameConfig::new(vec!["Alice".into(), "Bob".into()]).with_base_tiles(vec![meadow]);
    let mut game = GameState::new(config);

    for turn in 0..extra {
        let player = game.current_player;
        game.apply_action(player, GameAction::DrawTile).unwrap();
        let spot = game.valid_placements()[0];
        game.apply_action(player, GameAction::PlaceTile { coord: spot })
            .unwrap();
        if turn == 0 {
            game.apply_action(
                player,
                GameAction::PlaceMeeple {
                    segment: "field0".into(),
                    kind: MeepleType::Normal,
                    support: None,
                },
            )
            .unwrap();
        } else {
            game.apply_action(player, GameAction::SkipMeeple).unwrap();
        }
        game.apply_action(player, GameAction::EndTurn).unwrap();
    }

    // Leave one tile in hand so placement queries have work to do
    let player = game.current_player;
    game.apply_action(player, GameAction::DrawTile).unwrap();
    game
}

fn bench_valid_placements(c: &mut Criterion) {
    let game = big_game(60);

    c.bench_function("valid_placements_60_tiles", |b| {
        b.iter(|| black_box(game.valid_placements()))
    });
}

fn bench_valid_actions(c: &mut Criterion) {
    let game = big_game(60);

    c.bench_function("valid_actions_60_tiles", |b| {
        b.iter(|| black_box(game.valid_actions(game.current_player)))
    });
}

fn bench_all_features(c: &mut Criterion) {
    let game = big_game(60);

    c.bench_function("all_features_60_tiles", |b| {
        b.iter(|| black_box(game.tracker.all_features()))
    });
}

fn bench_end_game_sweep(c: &mut Criterion) {
    let game = big_game(60);
    let skip = BTreeSet::new();

    c.bench_function("end_game_sweep_60_tiles", |b| {
        b.iter(|| black_box(scoring::end_game_sweep(&game.scoring, &game.tracker, &skip)))
    });
}

criterion_group!(
    benches,
    bench_valid_placements,
    bench_valid_actions,
    bench_all_features,
    bench_end_game_sweep
);
criterion_main!(benches);
