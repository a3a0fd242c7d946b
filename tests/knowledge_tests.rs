use battleship_link::{
    Board, OpponentKnowledge, Orientation, OverlapPolicy, PositionedShip, ShotOutcome, BB,
    NUM_SHIPS, SHIPS, TOTAL_SHIP_CELLS,
};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn lone_destroyer() -> OpponentKnowledge {
    let destroyer = PositionedShip::new(SHIPS[4], 0, 0, Orientation::Horizontal).unwrap();
    OpponentKnowledge::ingest(Board::from_parts(vec![destroyer], BB::new()).unwrap())
}

fn random_fleet(seed: u64) -> Board {
    let mut board = Board::new();
    let mut rng = SmallRng::seed_from_u64(seed);
    board
        .place_fleet_randomly(&mut rng, OverlapPolicy::Reject)
        .unwrap();
    board
}

#[test]
fn test_hit_then_sunk() {
    let mut knowledge = lone_destroyer();
    assert_eq!(knowledge.remaining_hits()[0], 2);
    assert!(!knowledge.all_sunk());

    assert_eq!(knowledge.resolve_shot(0, 0), ShotOutcome::Hit(0));
    assert!(!knowledge.all_sunk());
    assert_eq!(knowledge.resolve_shot(1, 0), ShotOutcome::HitAndSunk(0));
    assert!(knowledge.is_sunk(0));
    assert!(knowledge.all_sunk());
}

#[test]
fn test_miss_changes_nothing() {
    let mut knowledge = lone_destroyer();
    let before = knowledge.clone();
    assert_eq!(knowledge.resolve_shot(5, 5), ShotOutcome::Miss);
    assert_eq!(knowledge, before);
}

#[test]
fn test_counters_never_underflow() {
    let mut knowledge = lone_destroyer();
    knowledge.resolve_shot(0, 0);
    knowledge.resolve_shot(1, 0);
    assert_eq!(knowledge.resolve_shot(1, 0), ShotOutcome::Hit(0));
    assert_eq!(knowledge.remaining_hits()[0], 0);
}

#[test]
fn test_full_fleet_is_not_sunk_by_one_ship() {
    let board = random_fleet(7);
    let destroyer = board.placed_ships()[4];
    let mut knowledge = OpponentKnowledge::ingest(board);
    for (x, y) in destroyer.cells() {
        knowledge.resolve_shot(x, y);
    }
    assert!(knowledge.is_sunk(4));
    assert!(!knowledge.all_sunk());
    let sunk: Vec<usize> = knowledge.sunk_ships().map(|(i, _)| i).collect();
    assert_eq!(sunk, vec![4]);
}

fn overlapping_pair() -> OpponentKnowledge {
    let mut board = Board::new();
    board
        .place_ship(SHIPS[0], 0, 0, Orientation::Horizontal, OverlapPolicy::Allow)
        .unwrap();
    board
        .place_ship(SHIPS[1], 2, 0, Orientation::Vertical, OverlapPolicy::Allow)
        .unwrap();
    OpponentKnowledge::ingest(board)
}

#[test]
fn test_shared_cell_counts_for_every_ship() {
    let mut knowledge = overlapping_pair();
    assert_eq!(knowledge.ships_at(2, 0).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(knowledge.ship_index_at(2, 0), Some(1));
    assert_eq!(knowledge.ship_index_at(1, 0), Some(0));
    assert_eq!(knowledge.ship_index_at(9, 9), None);

    assert_eq!(knowledge.resolve_shot(2, 0), ShotOutcome::Hit(1));
    assert_eq!(knowledge.remaining_hits()[..2], [4, 3]);
}

#[test]
fn test_overlapping_fleet_can_be_sunk() {
    let mut knowledge = overlapping_pair();
    let cells = (0..5).map(|x| (x, 0)).chain((1..4).map(|y| (2, y)));
    let mut last = ShotOutcome::Miss;
    for (x, y) in cells {
        assert!(!knowledge.record_bomb(x, y).unwrap());
        last = knowledge.resolve_shot(x, y);
    }
    assert_eq!(last, ShotOutcome::HitAndSunk(1));
    assert!(knowledge.is_sunk(0));
    assert!(knowledge.is_sunk(1));
    assert!(knowledge.all_sunk());
}

#[test]
fn test_shared_cell_reports_the_ship_it_sank() {
    let mut knowledge = overlapping_pair();
    for x in [0, 1, 3, 4] {
        knowledge.resolve_shot(x, 0);
    }
    // carrier's last open cell is the one it shares with the battleship
    assert_eq!(knowledge.resolve_shot(2, 0), ShotOutcome::HitAndSunk(0));
    assert!(!knowledge.is_sunk(1));
}

#[test]
fn test_reset_counters_reveals_fleet() {
    let mut knowledge = OpponentKnowledge::ingest(random_fleet(3));
    assert_eq!(knowledge.sunk_ships().count(), 0);
    knowledge.reset_counters();
    assert!(knowledge.all_sunk());
    assert_eq!(knowledge.sunk_ships().count(), NUM_SHIPS);
}

proptest! {
    #[test]
    fn prop_remaining_hits_track_distinct_hits(
        seed in any::<u64>(),
        shots in proptest::collection::vec((0usize..10, 0usize..10), 0..120),
    ) {
        let board = random_fleet(seed);
        let occupied = board.occupancy();
        let mut knowledge = OpponentKnowledge::ingest(board);

        let mut hits = 0;
        for (x, y) in shots {
            if knowledge.record_bomb(x, y).unwrap() {
                continue;
            }
            if knowledge.resolve_shot(x, y).is_hit() {
                hits += 1;
            }
        }

        let remaining: usize = knowledge.remaining_hits().iter().sum();
        prop_assert_eq!(remaining, TOTAL_SHIP_CELLS - hits);
        let all_hit = (occupied & !knowledge.board().bombed()).is_empty();
        prop_assert_eq!(knowledge.all_sunk(), all_hit);
    }
}
