use battleship_link::{
    Board, Codec, Coordinate, DecodeError, Message, MessageKind, Orientation, OverlapPolicy,
    WireFormat, WorldSnapshot, SHIPS,
};
use serde_json::{json, Value};

const FORMATS: [WireFormat; 2] = [WireFormat::Json, WireFormat::Binary];

fn sample_board() -> Board {
    let mut board = Board::new();
    for (row, ship) in SHIPS.iter().enumerate() {
        let orientation = if row % 2 == 0 {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        board
            .place_ship(*ship, row * 2, row, orientation, OverlapPolicy::Reject)
            .unwrap();
    }
    board.record_bomb(9, 9).unwrap();
    board.record_bomb(0, 7).unwrap();
    board.finalize();
    board
}

fn sample_messages() -> Vec<Message> {
    vec![
        Message::HostSettingUpGame,
        Message::WorldMapData(WorldSnapshot {
            opaque_world_context: vec![0, 1, 2, 255],
            board_snapshot: vec![42; 16],
        }),
        Message::SendShipInfo(sample_board()),
        Message::Shoot(Coordinate::new(3, 7)),
        Message::Win,
    ]
}

#[test]
fn test_every_message_survives_both_formats() {
    for format in FORMATS {
        let codec = Codec::new(format);
        for message in sample_messages() {
            let bytes = codec.encode(&message).unwrap();
            let decoded = codec.decode(&bytes).unwrap();
            assert_eq!(decoded, message, "{:?}", format);
        }
    }
}

#[test]
fn test_out_of_range_shot_still_decodes() {
    let codec = Codec::default();
    let message = Message::Shoot(Coordinate::new(-1, 12));
    let bytes = codec.encode(&message).unwrap();
    assert_eq!(codec.decode(&bytes).unwrap(), message);
}

#[test]
fn test_json_envelope_layout() {
    let codec = Codec::new(WireFormat::Json);
    let bytes = codec.encode(&Message::SendShipInfo(sample_board())).unwrap();
    let envelope: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(envelope["kind"], "sendShipInfo");

    let payload: Vec<u8> = serde_json::from_value(envelope["payload"].clone()).unwrap();
    let board: Value = serde_json::from_slice(&payload).unwrap();
    let grid = board["bombedGrid"].as_array().unwrap();
    assert_eq!(grid.len(), 10);
    assert_eq!(grid[9][9], true);
    assert_eq!(grid[0][7], true);
    assert_eq!(grid[7][0], false);

    let first = &board["placedShips"][0];
    assert_eq!(first["shipName"], "Carrier");
    assert_eq!(first["shipLength"], 5);
    assert_eq!(first["x"], 0);
    assert_eq!(first["y"], 0);
    assert_eq!(first["horizontal"], true);

    let win = codec.encode(&Message::Win).unwrap();
    let envelope: Value = serde_json::from_slice(&win).unwrap();
    assert_eq!(envelope, json!({"kind": "win", "payload": null}));
}

fn raw(envelope: Value) -> Vec<u8> {
    serde_json::to_vec(&envelope).unwrap()
}

fn ship_info(ships: Value) -> Vec<u8> {
    let board = json!({
        "bombedGrid": vec![vec![false; 10]; 10],
        "placedShips": ships,
    });
    let payload = serde_json::to_vec(&board).unwrap();
    raw(json!({"kind": "sendShipInfo", "payload": payload}))
}

#[test]
fn test_malformed_envelopes() {
    let codec = Codec::new(WireFormat::Json);
    assert!(matches!(
        codec.decode(b"definitely not json"),
        Err(DecodeError::Envelope(_))
    ));
    assert!(matches!(
        codec.decode(&raw(json!({"kind": "fireTorpedo", "payload": null}))),
        Err(DecodeError::Envelope(_))
    ));
    assert_eq!(
        codec.decode(&raw(json!({"kind": "shoot", "payload": null}))),
        Err(DecodeError::MissingPayload(MessageKind::Shoot))
    );
    assert_eq!(
        codec.decode(&raw(json!({"kind": "win", "payload": [1, 2]}))),
        Err(DecodeError::UnexpectedPayload(MessageKind::Win))
    );
    let garbage = b"{\"x\": \"three\"}".to_vec();
    assert!(matches!(
        codec.decode(&raw(json!({"kind": "shoot", "payload": garbage}))),
        Err(DecodeError::Payload {
            kind: MessageKind::Shoot,
            ..
        })
    ));
}

#[test]
fn test_payload_presence_follows_kind() {
    let codec = Codec::new(WireFormat::Json);
    assert_eq!(
        codec.decode(&raw(json!({"kind": "hostSettingUpGame", "payload": null}))),
        Ok(Message::HostSettingUpGame)
    );
    assert_eq!(
        codec.decode(&raw(json!({"kind": "hostSettingUpGame", "payload": []}))),
        Err(DecodeError::UnexpectedPayload(MessageKind::HostSettingUpGame))
    );
    for (name, kind) in [
        ("worldMapData", MessageKind::WorldMapData),
        ("sendShipInfo", MessageKind::SendShipInfo),
    ] {
        assert!(kind.has_payload());
        assert_eq!(
            codec.decode(&raw(json!({"kind": name, "payload": null}))),
            Err(DecodeError::MissingPayload(kind))
        );
    }
}

#[test]
fn test_invalid_boards_rejected() {
    let codec = Codec::new(WireFormat::Json);
    let cases = [
        json!([{"shipName": "Dinghy", "shipLength": 2, "x": 0, "y": 0, "horizontal": true}]),
        json!([{"shipName": "Carrier", "shipLength": 3, "x": 0, "y": 0, "horizontal": true}]),
        json!([{"shipName": "Carrier", "shipLength": 5, "x": -1, "y": 0, "horizontal": true}]),
        json!([{"shipName": "Carrier", "shipLength": 5, "x": 7, "y": 0, "horizontal": true}]),
    ];
    for ships in cases {
        let result = codec.decode(&ship_info(ships.clone()));
        assert!(
            matches!(result, Err(DecodeError::InvalidBoard(_))),
            "{} decoded as {:?}",
            ships,
            result
        );
    }

    let short_grid = json!({
        "bombedGrid": vec![vec![false; 10]; 9],
        "placedShips": [],
    });
    let payload = serde_json::to_vec(&short_grid).unwrap();
    assert!(matches!(
        codec.decode(&raw(json!({"kind": "sendShipInfo", "payload": payload}))),
        Err(DecodeError::InvalidBoard(_))
    ));
}

#[test]
fn test_formats_do_not_mix() {
    let bytes = Codec::new(WireFormat::Binary)
        .encode(&Message::Shoot(Coordinate::new(1, 1)))
        .unwrap();
    assert!(Codec::new(WireFormat::Json).decode(&bytes).is_err());
}
