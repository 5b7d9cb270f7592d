//! Port chooser tests.

use pack_presets::ports::{choose_port, choose_ports};
use tokio::net::TcpListener;

#[tokio::test]
async fn test_prefers_the_requested_port_when_free() {
    // Grab an OS-assigned port, release it, then ask for it back.
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let chosen = choose_port(port).await.unwrap();
    assert_eq!(chosen, port);
}

#[tokio::test]
async fn test_falls_back_when_the_port_is_taken() {
    // Hold the port open so the helper must pick another.
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let taken = listener.local_addr().unwrap().port();

    let chosen = choose_port(taken).await.unwrap();
    assert_ne!(chosen, taken);
    assert_ne!(chosen, 0);
}

#[tokio::test]
async fn test_zero_asks_the_os() {
    let chosen = choose_port(0).await.unwrap();
    assert_ne!(chosen, 0);
}

#[tokio::test]
async fn test_choose_ports_never_repeats() {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let taken = listener.local_addr().unwrap().port();

    let chosen = choose_ports(&[taken, taken]).await.unwrap();
    assert_eq!(chosen.len(), 2);
    assert_ne!(chosen[0], chosen[1]);
    assert_ne!(chosen[0], taken);
    assert_ne!(chosen[1], taken);
}
