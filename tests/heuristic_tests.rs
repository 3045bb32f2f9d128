//! Heuristic and selection-policy integration tests.

use kalah_mcts::core::{GameRng, GameState, Player, SLOT_COUNT};
use kalah_mcts::heuristics::{HeuristicKind, HeuristicSet, SelectionPolicy, Weights};
use rand::rngs::mock::StepRng;

fn evaluate(kind: HeuristicKind, game: &GameState) -> Weights {
    let mut weights = [0.0; 7];
    kind.evaluate(game, &game.legal_moves(), &mut weights);
    weights
}

/// The same position seen from player B: every slot shifted by one side.
fn mirrored(slots: [u8; SLOT_COUNT]) -> GameState {
    let mut mirror = [0; SLOT_COUNT];
    for (slot, count) in mirror.iter_mut().enumerate() {
        *count = slots[(slot + 7) % SLOT_COUNT];
    }
    GameState::from_slots(Player::B, mirror)
}

fn assert_weights(actual: Weights, expected: [f32; 7], label: &str) {
    for id in 1..7 {
        assert!(
            (actual[id] - expected[id]).abs() < 1e-6,
            "{label}: id {id} expected {} got {}",
            expected[id],
            actual[id]
        );
    }
}

const EXTRA_TURN_BOARD: [u8; SLOT_COUNT] = [0, 1, 4, 3, 17, 12, 0, 0, 0, 0, 0, 0, 0, 0];
const CAPTURE_BOARD: [u8; SLOT_COUNT] = [3, 0, 2, 0, 1, 4, 6, 2, 0, 3, 0, 5, 1, 2];

// =============================================================================
// Golden Vectors
// =============================================================================

#[test]
fn test_extra_turn_golden() {
    let game = GameState::from_slots(Player::A, EXTRA_TURN_BOARD);
    let expected = [0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0];
    assert_weights(evaluate(HeuristicKind::ExtraTurn, &game), expected, "A");
    assert_weights(
        evaluate(HeuristicKind::ExtraTurn, &mirrored(EXTRA_TURN_BOARD)),
        expected,
        "B",
    );
}

#[test]
fn test_move_over_depot_golden() {
    let game = GameState::from_slots(Player::A, EXTRA_TURN_BOARD);
    assert_weights(
        evaluate(HeuristicKind::MoveOverDepot, &game),
        [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0],
        "A",
    );
}

#[test]
fn test_extra_turn_chaining_golden() {
    let game = GameState::from_slots(Player::A, CAPTURE_BOARD);
    assert_weights(
        evaluate(HeuristicKind::ExtraTurnChaining, &game),
        [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        "A",
    );
}

#[test]
fn test_steal_stones_golden() {
    let expected = [0.0, 0.0, 0.0, 0.0, 5.0 / 7.0, 2.0 / 7.0, 0.0];
    let game = GameState::from_slots(Player::A, CAPTURE_BOARD);
    assert_weights(evaluate(HeuristicKind::StealStones, &game), expected, "A");
    assert_weights(
        evaluate(HeuristicKind::StealStones, &mirrored(CAPTURE_BOARD)),
        expected,
        "B",
    );
}

#[test]
fn test_steal_opportunity_golden() {
    let game = GameState::from_slots(Player::A, CAPTURE_BOARD);
    assert_weights(
        evaluate(HeuristicKind::StealOpportunity, &game),
        [0.0, 0.0, 0.25, 0.0, 0.0, 0.75, 0.0],
        "A",
    );
}

#[test]
fn test_prevent_steal_light_golden() {
    let game = GameState::from_slots(Player::A, CAPTURE_BOARD);
    assert_weights(
        evaluate(HeuristicKind::PreventStealLight, &game),
        [0.0, 0.0, 0.0, 0.0, 0.5, 0.0, 0.5],
        "capture board",
    );

    let game = GameState::from_slots(Player::A, EXTRA_TURN_BOARD);
    assert_weights(
        evaluate(HeuristicKind::PreventStealLight, &game),
        [0.0, 0.2, 0.4, 0.2, 1.0, 1.0, 0.0],
        "extra turn board",
    );
}

/// Reference positions with the expected score of every legal id.
const REFERENCE_VECTORS: [(HeuristicKind, Player, [u8; SLOT_COUNT], [f32; 7]); 12] = [
    (
        HeuristicKind::ExtraTurn,
        Player::A,
        [0, 1, 4, 3, 17, 12, 0, 0, 0, 0, 0, 0, 0, 0],
        [0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0],
    ),
    (
        HeuristicKind::ExtraTurn,
        Player::B,
        [0, 0, 0, 0, 0, 0, 0, 0, 1, 4, 3, 17, 12, 0],
        [0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0],
    ),
    (
        HeuristicKind::StealStones,
        Player::A,
        [0, 8, 0, 0, 13, 2, 0, 0, 2, 2, 4, 3, 2, 0],
        [0.0, 2.0 / 9.0, 0.0, 0.0, 4.0 / 9.0, 3.0 / 9.0, 0.0],
    ),
    (
        HeuristicKind::StealStones,
        Player::B,
        [0, 2, 2, 4, 3, 2, 0, 0, 8, 0, 0, 13, 2, 0],
        [0.0, 2.0 / 9.0, 0.0, 0.0, 4.0 / 9.0, 3.0 / 9.0, 0.0],
    ),
    (
        HeuristicKind::MoveOverDepot,
        Player::A,
        [0, 2, 2, 2, 30, 6, 0, 1, 0, 0, 0, 0, 0, 0],
        [0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0],
    ),
    (
        HeuristicKind::MoveOverDepot,
        Player::B,
        [0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 2, 30, 6, 0],
        [0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0],
    ),
    (
        HeuristicKind::ExtraTurnChaining,
        Player::A,
        [0, 4, 2, 3, 17, 12, 0, 0, 0, 0, 0, 0, 0, 0],
        [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
    ),
    (
        HeuristicKind::ExtraTurnChaining,
        Player::B,
        [0, 0, 0, 0, 0, 0, 0, 0, 4, 2, 3, 17, 12, 0],
        [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
    ),
    (
        HeuristicKind::StealOpportunity,
        Player::A,
        [0, 1, 1, 1, 0, 1, 1, 0, 1, 2, 3, 4, 5, 6],
        [0.0, 6.0 / 18.0, 5.0 / 18.0, 4.0 / 18.0, 0.0, 2.0 / 18.0, 1.0 / 18.0],
    ),
    (
        HeuristicKind::StealOpportunity,
        Player::B,
        [0, 1, 2, 3, 4, 5, 6, 0, 1, 1, 1, 0, 1, 1],
        [0.0, 6.0 / 18.0, 5.0 / 18.0, 4.0 / 18.0, 0.0, 2.0 / 18.0, 1.0 / 18.0],
    ),
    (
        HeuristicKind::PreventStealLight,
        Player::A,
        [0, 1, 5, 2, 11, 0, 11, 0, 0, 0, 2, 0, 1, 0],
        [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0 / 3.0, 1.0, 0.0, 1.0],
    ),
    (
        HeuristicKind::PreventStealLight,
        Player::B,
        [0, 0, 0, 2, 0, 1, 0, 0, 1, 5, 2, 11, 0, 11],
        [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0 / 3.0, 1.0, 0.0, 1.0],
    ),
];

#[test]
fn test_reference_vectors() {
    for (kind, player, slots, expected) in REFERENCE_VECTORS {
        let game = GameState::from_slots(player, slots);
        let legal = game.legal_moves();
        let mut weights = [2.0; 7];
        kind.evaluate(&game, &legal, &mut weights);

        for id in (1..7).filter(|&id| legal[id]) {
            assert!(
                (weights[id] - expected[id]).abs() < 1e-6,
                "{kind} for {player}: id {id} expected {} got {}",
                expected[id],
                weights[id]
            );
        }
    }
}

#[test]
fn test_illegal_ids_untouched() {
    let game = GameState::from_slots(Player::A, CAPTURE_BOARD);
    let legal = game.legal_moves();
    for kind in HeuristicKind::ALL {
        let weights = evaluate(kind, &game);
        for id in [1, 3] {
            assert!(!legal[id]);
            assert_eq!(weights[id], 0.0, "{kind} wrote illegal id {id}");
        }
    }
}

// =============================================================================
// Heuristic Sets
// =============================================================================

#[test]
fn test_aggregate_independent_of_side() {
    let board = [0, 1, 2, 3, 0, 5, 0, 7, 8, 9, 10, 11, 12, 13];
    let mut set = HeuristicSet::new();
    for (kind, weight) in HeuristicKind::ALL.into_iter().zip([0.5, 1.0, 0.05, 0.05, 0.05, 0.75]) {
        set = set.with(kind, weight);
    }

    let game_a = GameState::from_slots(Player::A, board);
    let game_b = mirrored(board);
    let mut weights_a = [0.0; 7];
    let mut weights_b = [0.0; 7];
    set.aggregate(&game_a, &game_a.legal_moves(), &mut weights_a);
    set.aggregate(&game_b, &game_b.legal_moves(), &mut weights_b);

    assert_weights(weights_b, weights_a, "mirror");
    assert!((set.scale() - 2.4).abs() < 1e-6);
}

#[test]
fn test_aggregate_weighted_sum() {
    let game = GameState::from_slots(Player::A, EXTRA_TURN_BOARD);
    let set = HeuristicSet::new()
        .with(HeuristicKind::ExtraTurn, 2.0)
        .with(HeuristicKind::MoveOverDepot, -1.0);
    let mut weights = [0.0; 7];
    set.aggregate(&game, &game.legal_moves(), &mut weights);

    assert_weights(weights, [0.0, 2.0, -1.0, 2.0, 1.0, -1.0, 0.0], "sum");
}

// =============================================================================
// Selection Policies
// =============================================================================

#[test]
fn test_roulette_pinned_draws() {
    let legal = [false, true, true, true, false, false, false];
    let weights = [0.0, 0.0, 0.5, 1.0, 0.0, 0.0, 0.0];

    // Half of the wheel: past the 0.5 of id 2
    let mut rng = StepRng::new(0x8000_0000, 0);
    assert_eq!(SelectionPolicy::Roulette.select(&legal, &weights, 1.0, &mut rng), 3);

    let mut rng = StepRng::new(0x4000_0000, 0);
    assert_eq!(SelectionPolicy::Roulette.select(&legal, &weights, 1.0, &mut rng), 2);
}

#[test]
fn test_tournament_full_field_picks_best() {
    let game = GameState::from_slots(Player::A, CAPTURE_BOARD);
    let legal = game.legal_moves();
    let mut weights = [0.0; 7];
    HeuristicKind::StealStones.evaluate(&game, &legal, &mut weights);

    let mut rng = GameRng::new(5);
    let policy = SelectionPolicy::Tournament { size: 6 };
    for _ in 0..20 {
        assert_eq!(policy.select(&legal, &weights, 1.0, &mut rng), 4);
    }
}

#[test]
fn test_policies_only_pick_legal() {
    let legal = [false, false, true, false, false, true, false];
    let weights = [0.0, 5.0, -1.0, 5.0, 5.0, 0.3, 5.0];
    let mut rng = GameRng::new(17);
    for policy in [
        SelectionPolicy::Uniform,
        SelectionPolicy::Roulette,
        SelectionPolicy::Tournament { size: 2 },
    ] {
        for _ in 0..50 {
            let id = policy.select(&legal, &weights, 1.0, &mut rng);
            assert!(id == 2 || id == 5, "{policy} picked {id}");
        }
    }
}

#[test]
fn test_selector_json_names() {
    let policy: SelectionPolicy = serde_json::from_str(r#"{"type":"tournament","size":3}"#).unwrap();
    assert_eq!(policy, SelectionPolicy::Tournament { size: 3 });
    assert!(serde_json::from_str::<SelectionPolicy>(r#"{"type":"softmax"}"#).is_err());
}
