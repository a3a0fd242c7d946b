use battleship_link::{Codec, Coordinate, Message, TcpTransport, Transport};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::Duration;

async fn connected() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (client, server) = tokio::join!(TcpStream::connect(addr), listener.accept());
    (client.unwrap(), server.unwrap().0)
}

#[tokio::test]
async fn test_messages_round_trip() {
    let (client, server) = connected().await;
    let mut a = TcpTransport::new(client);
    let mut b = TcpTransport::new(server);
    let codec = Codec::default();

    let shot = Message::Shoot(Coordinate::new(4, 2));
    a.send(codec.encode(&shot).unwrap()).await.unwrap();
    a.send(codec.encode(&Message::Win).unwrap()).await.unwrap();

    assert_eq!(codec.decode(&b.recv().await.unwrap()).unwrap(), shot);
    assert_eq!(codec.decode(&b.recv().await.unwrap()).unwrap(), Message::Win);
}

#[tokio::test]
async fn test_oversized_frame_rejected() {
    let (mut client, server) = connected().await;
    let mut b = TcpTransport::with_config(server, Some(Duration::from_secs(5)), 64);
    client.write_all(&1000u32.to_be_bytes()).await.unwrap();
    let err = b.recv().await.unwrap_err();
    assert!(err.to_string().contains("too large"), "{}", err);
}

#[tokio::test]
async fn test_oversized_send_rejected() {
    let (client, _server) = connected().await;
    let mut a = TcpTransport::with_config(client, None, 8);
    assert!(a.send(vec![0; 9]).await.is_err());
}

#[tokio::test]
async fn test_zero_length_frame_rejected() {
    let (mut client, server) = connected().await;
    let mut b = TcpTransport::new(server);
    client.write_all(&0u32.to_be_bytes()).await.unwrap();
    assert!(b.recv().await.is_err());
}

#[tokio::test]
async fn test_truncated_frame_reports_closed_connection() {
    let (mut client, server) = connected().await;
    let mut b = TcpTransport::new(server);
    client.write_all(&10u32.to_be_bytes()).await.unwrap();
    client.write_all(b"abc").await.unwrap();
    drop(client);
    let err = b.recv().await.unwrap_err();
    assert!(err.to_string().contains("closed"), "{}", err);
}

#[tokio::test]
async fn test_recv_timeout() {
    let (_client, server) = connected().await;
    let mut b = TcpTransport::with_timeout(server, Duration::from_millis(50));
    let err = b.recv().await.unwrap_err();
    assert!(err.to_string().contains("timeout"), "{}", err);
}

#[tokio::test]
async fn test_shutdown_stops_io() {
    let (client, _server) = connected().await;
    let mut a = TcpTransport::new(client);
    a.shutdown();
    assert!(a.is_shutdown());
    assert!(a.send(vec![1]).await.is_err());
    assert!(a.recv().await.is_err());
}
