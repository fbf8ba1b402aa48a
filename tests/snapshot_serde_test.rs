//! Snapshots serialize for out-of-process renderers (`serde` feature).

use blockfall::core::{Game, GameConfig, Outbound};
use blockfall::types::{CellState, ColorTag, PieceKind};

fn started_game() -> Game {
    let mut game = Game::new(GameConfig::default(), 11).unwrap();
    game.setup();
    for _ in 0..6 {
        game.update().unwrap();
    }
    game
}

#[test]
fn board_snapshot_serializes_cells_by_name() {
    let game = started_game();
    let value = serde_json::to_value(game.board_snapshot()).unwrap();

    assert_eq!(value["width"], 10);
    assert_eq!(value["height"], 20);
    let cells = value["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 200);
    assert_eq!(cells[0]["state"], "Empty");
    assert_eq!(cells[0]["color"], "Black");
    assert!(cells.iter().any(|c| c["state"] == "Player"));
}

#[test]
fn outbound_messages_are_tagged() {
    let mut game = Game::new(GameConfig::default(), 11).unwrap();
    game.setup();
    let out = game.take_outbound();

    let preview = serde_json::to_value(&out[0]).unwrap();
    assert_eq!(preview["type"], "preview");
    assert!(preview["data"]["cells"].is_array());
    let kind: PieceKind = serde_json::from_value(preview["data"]["kind"].clone()).unwrap();
    assert_eq!(Some(kind), game.next().map(|m| m.kind()));

    let board = serde_json::to_value(&out[1]).unwrap();
    assert_eq!(board["type"], "board");
}

#[test]
fn snapshot_survives_a_json_round_trip() {
    let mut game = started_game();
    let out = game.take_outbound();
    let json = serde_json::to_string(&out).unwrap();
    let back: Vec<Outbound> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, out);

    let Some(Outbound::Board(snap)) = back.last() else {
        panic!("last message should be a board");
    };
    assert_eq!(snap.count(CellState::Locked), 0);
    assert!(snap
        .cells()
        .iter()
        .filter(|c| c.state == CellState::Player)
        .all(|c| c.color != ColorTag::Black));
}
