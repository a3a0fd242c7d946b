use battleship_link::{
    init_logging, AutoPlayer, CliPlayer, Codec, InMemoryTransport, OverlapPolicy, Player,
    Session, SessionConfig, SessionNode, SessionState, TcpTransport, Transport, WireFormat,
    WorldSnapshot,
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(author, version, about = "Two-player battleship over a peer link", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PlayerType {
    Human,
    Auto,
}

#[derive(Args, Clone, Debug)]
struct MatchOptions {
    #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = WireFormat::Json)]
    wire_format: WireFormat,
    #[arg(long, help = "Let ships share cells")]
    allow_overlap: bool,
}

impl MatchOptions {
    fn overlap(&self) -> OverlapPolicy {
        if self.allow_overlap {
            OverlapPolicy::Allow
        } else {
            OverlapPolicy::Reject
        }
    }

    fn rng(&self, offset: u64) -> SmallRng {
        match self.seed {
            Some(s) => SmallRng::seed_from_u64(s.wrapping_add(offset)),
            None => SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play an automated match between two local endpoints.
    Local {
        #[command(flatten)]
        options: MatchOptions,
    },
    /// Host a match and wait for a peer to join.
    Host {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[command(flatten)]
        options: MatchOptions,
    },
    /// Join a match hosted elsewhere.
    Join {
        #[arg(long, default_value = "127.0.0.1:8080")]
        connect: String,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[command(flatten)]
        options: MatchOptions,
    },
}

fn make_player(kind: PlayerType) -> Box<dyn Player> {
    match kind {
        PlayerType::Human => Box::new(CliPlayer::new()),
        PlayerType::Auto => Box::new(AutoPlayer::new()),
    }
}

async fn play(
    config: SessionConfig,
    options: &MatchOptions,
    transport: Box<dyn Transport>,
    mut player: Box<dyn Player>,
    rng_offset: u64,
) -> anyhow::Result<SessionState> {
    let mut rng = options.rng(rng_offset);
    let mut node = SessionNode::new(
        Session::new(config),
        Codec::new(options.wire_format),
        transport,
    )
    .with_world(WorldSnapshot::default());
    node.run(player.as_mut(), &mut rng).await
}

fn report(label: &str, state: SessionState) {
    match state {
        SessionState::Win => println!("{}: VICTORY! All enemy ships sunk.", label),
        SessionState::Lose => println!("{}: DEFEAT. Your fleet was destroyed.", label),
        other => println!("{}: match ended in state {}", label, other),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Local { options } => {
            info!("starting local match");
            let overlap = options.overlap();
            let (t1, t2) = InMemoryTransport::pair();
            let host = play(
                SessionConfig::host().with_overlap(overlap),
                &options,
                Box::new(t1),
                Box::new(AutoPlayer::new()),
                0,
            );
            let peer = play(
                SessionConfig::peer().with_overlap(overlap),
                &options,
                Box::new(t2),
                Box::new(AutoPlayer::new()),
                1,
            );
            let (host_state, peer_state) = tokio::try_join!(host, peer)?;
            report("host", host_state);
            report("peer", peer_state);
        }
        Commands::Host {
            bind,
            player,
            options,
        } => {
            let listener = TcpListener::bind(&bind).await?;
            println!("Waiting for a player to connect on {}...", bind);
            let (stream, addr) = listener.accept().await?;
            println!("Player connected from {}", addr);
            let config = SessionConfig::host().with_overlap(options.overlap());
            let transport = Box::new(TcpTransport::new(stream));
            let state = play(config, &options, transport, make_player(player), 0).await?;
            report("you", state);
        }
        Commands::Join {
            connect,
            player,
            options,
        } => {
            println!("Connecting to {}...", connect);
            let transport = Box::new(TcpTransport::connect(&connect).await?);
            println!("Connected.");
            let config = SessionConfig::peer().with_overlap(options.overlap());
            let state = play(config, &options, transport, make_player(player), 0).await?;
            report("you", state);
        }
    }
    Ok(())
}
