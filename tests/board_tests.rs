use battleship_link::{
    Board, BoardError, Orientation, OverlapPolicy, PositionedShip, ShipType, BOARD_SIZE,
    NUM_SHIPS, SHIPS, TOTAL_SHIP_CELLS,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn place_next(board: &mut Board, x: usize, y: usize, o: Orientation) -> Result<(), BoardError> {
    let ship = board.next_ship().expect("fleet already complete");
    board.place_ship(ship, x, y, o, OverlapPolicy::Reject)
}

#[test]
fn test_place_in_catalog_order_until_complete() {
    let mut board = Board::new();
    assert!(!board.is_complete());
    for row in 0..NUM_SHIPS {
        assert_eq!(board.next_ship(), Some(SHIPS[row]));
        place_next(&mut board, 0, row, Orientation::Horizontal).unwrap();
    }
    assert!(board.is_complete());
    assert_eq!(board.next_ship(), None);
    assert_eq!(board.placed_ships().len(), NUM_SHIPS);
    assert_eq!(board.occupancy().count_ones(), TOTAL_SHIP_CELLS);
    assert_eq!(
        board.place_ship(SHIPS[0], 0, 9, Orientation::Horizontal, OverlapPolicy::Reject),
        Err(BoardError::FleetComplete)
    );
}

#[test]
fn test_out_of_bounds_rejected() {
    let mut board = Board::new();
    // Carrier (5) from x=6 would need x=10
    assert_eq!(
        place_next(&mut board, 6, 0, Orientation::Horizontal),
        Err(BoardError::ShipOutOfBounds)
    );
    assert_eq!(
        place_next(&mut board, 0, 6, Orientation::Vertical),
        Err(BoardError::ShipOutOfBounds)
    );
    assert_eq!(
        place_next(&mut board, 0, BOARD_SIZE as usize, Orientation::Horizontal),
        Err(BoardError::ShipOutOfBounds)
    );
    assert!(board.placed_ships().is_empty());

    place_next(&mut board, 5, 0, Orientation::Horizontal).unwrap();
}

#[test]
fn test_overlap_policy() {
    let mut strict = Board::new();
    place_next(&mut strict, 0, 0, Orientation::Horizontal).unwrap();
    assert_eq!(
        place_next(&mut strict, 2, 0, Orientation::Vertical),
        Err(BoardError::ShipOverlaps)
    );
    assert_eq!(strict.placed_ships().len(), 1);

    let mut lax = Board::new();
    let carrier = lax.next_ship().unwrap();
    lax.place_ship(carrier, 0, 0, Orientation::Horizontal, OverlapPolicy::Allow)
        .unwrap();
    let battleship = lax.next_ship().unwrap();
    lax.place_ship(battleship, 2, 0, Orientation::Vertical, OverlapPolicy::Allow)
        .unwrap();
    assert_eq!(lax.placed_ships().len(), 2);
    assert_eq!(lax.occupancy().count_ones(), 5 + 4 - 1);
    assert_eq!(lax.ship_at(2, 0), Some(1));
}

#[test]
fn test_wrong_ship_rejected() {
    let mut board = Board::new();
    let err = board
        .place_ship(SHIPS[4], 0, 0, Orientation::Horizontal, OverlapPolicy::Reject)
        .unwrap_err();
    assert_eq!(
        err,
        BoardError::UnexpectedShip {
            expected: "Carrier",
            got: "Destroyer"
        }
    );
    let impostor = ShipType::new("Carrier", 2);
    assert!(board
        .place_ship(impostor, 0, 0, Orientation::Horizontal, OverlapPolicy::Reject)
        .is_err());
}

#[test]
fn test_undo_and_finalize() {
    let mut board = Board::new();
    assert_eq!(board.undo_last_placement(), Err(BoardError::NothingPlaced));

    place_next(&mut board, 0, 0, Orientation::Horizontal).unwrap();
    place_next(&mut board, 0, 1, Orientation::Horizontal).unwrap();
    let removed = board.undo_last_placement().unwrap();
    assert_eq!(removed.ship(), SHIPS[1]);
    assert_eq!(board.next_ship(), Some(SHIPS[1]));
    assert_eq!(board.occupancy().count_ones(), SHIPS[0].length());

    board.finalize();
    assert!(board.is_finalized());
    assert_eq!(board.undo_last_placement(), Err(BoardError::Finalized));
    assert_eq!(
        place_next(&mut board, 0, 5, Orientation::Horizontal),
        Err(BoardError::Finalized)
    );
}

#[test]
fn test_record_bomb_reports_previous_state() {
    let mut board = Board::new();
    assert!(!board.is_bombed(3, 4));
    assert_eq!(board.record_bomb(3, 4), Ok(false));
    assert_eq!(board.record_bomb(3, 4), Ok(true));
    assert!(board.is_bombed(3, 4));
    assert_eq!(board.bombed().count_ones(), 1);
    assert!(board.record_bomb(10, 0).is_err());
}

#[test]
fn test_positioned_ship_cells() {
    let ship = PositionedShip::new(SHIPS[2], 4, 1, Orientation::Vertical).unwrap();
    let cells: Vec<_> = ship.cells().collect();
    assert_eq!(cells, vec![(4, 1), (4, 2), (4, 3)]);
    assert_eq!(ship.anchor(), (4, 1));
    assert!(ship.contains(4, 3));
    assert!(!ship.contains(4, 4));
    assert_eq!(ship.mask().count_ones(), 3);
}

#[test]
fn test_random_fleet_has_no_overlap() {
    let mut board = Board::new();
    let mut rng = SmallRng::seed_from_u64(42);
    board
        .place_fleet_randomly(&mut rng, OverlapPolicy::Reject)
        .unwrap();
    assert!(board.is_complete());
    assert_eq!(board.occupancy().count_ones(), TOTAL_SHIP_CELLS);
}

#[test]
fn test_from_parts_is_finalized() {
    let ships = vec![PositionedShip::new(SHIPS[4], 0, 0, Orientation::Horizontal).unwrap()];
    let board = Board::from_parts(ships, Default::default()).unwrap();
    assert!(board.is_finalized());
    assert_eq!(board.ship_at(1, 0), Some(0));

    let too_many = vec![PositionedShip::new(SHIPS[4], 0, 0, Orientation::Horizontal).unwrap(); 6];
    assert_eq!(
        Board::from_parts(too_many, Default::default()),
        Err(BoardError::TooManyShips(6))
    );
}
