use battleship_link::{
    AutoPlayer, Codec, InMemoryTransport, Session, SessionConfig, SessionNode, SessionState,
    WorldSnapshot,
};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

/// Shots this node fired at the opponent.
fn shots_fired(node: &SessionNode) -> usize {
    node.session()
        .opponent()
        .map(|o| o.board().bombed().count_ones())
        .unwrap_or(0)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let mut rng1 = SmallRng::seed_from_u64(seed1);
    let mut rng2 = SmallRng::seed_from_u64(seed2);
    let (t1, t2) = InMemoryTransport::pair();

    let host = async move {
        let mut node = SessionNode::new(
            Session::new(SessionConfig::host()),
            Codec::default(),
            Box::new(t1),
        )
        .with_world(WorldSnapshot::default());
        let state = node.run(&mut AutoPlayer::new(), &mut rng1).await?;
        Ok::<(SessionState, usize), anyhow::Error>((state, shots_fired(&node)))
    };

    let peer = async move {
        let mut node = SessionNode::new(
            Session::new(SessionConfig::peer()),
            Codec::default(),
            Box::new(t2),
        );
        let state = node.run(&mut AutoPlayer::new(), &mut rng2).await?;
        Ok::<(SessionState, usize), anyhow::Error>((state, shots_fired(&node)))
    };

    let (res1, res2) = tokio::try_join!(host, peer)?;

    let winner = match (res1.0, res2.0) {
        (SessionState::Win, SessionState::Lose) => Some("host"),
        (SessionState::Lose, SessionState::Win) => Some("peer"),
        _ => None,
    };

    let result = json!({
        "host": {"state": res1.0.to_string(), "shots": res1.1},
        "peer": {"state": res2.0.to_string(), "shots": res2.1},
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
