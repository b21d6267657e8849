//! Integration tests for connection greeting and registration.

mod common;

use common::TestServer;

#[tokio::test]
async fn test_greeting_and_welcome_sequence() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut bob = server.connect("bob").await.expect("Failed to connect bob");

    let notice = bob.recv().await.expect("No greeting");
    assert_eq!(notice.command, "NOTICE");
    assert_eq!(notice.params, vec!["AUTH", "*** Looking up your hostname..."]);

    let messages = bob.register().await.expect("Bob registration failed");
    let codes: Vec<&str> = messages
        .iter()
        .map(|m| m.command.as_str())
        .filter(|c| c.chars().all(|ch| ch.is_ascii_digit()))
        .collect();
    assert_eq!(codes, vec!["001", "002", "003", "004", "005", "005", "422"]);

    let welcome = messages.iter().find(|m| m.command == "001").unwrap();
    assert_eq!(welcome.prefix.as_deref(), Some("test.server"));
    assert!(welcome.params[1].contains("bob!bob@127.0.0.1"));
}

#[tokio::test]
async fn test_nick_collision() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut first = server.connect("bob").await.expect("Failed to connect");
    first.register().await.expect("Registration failed");

    let mut second = server.connect("bob").await.expect("Failed to connect");
    second.send_raw("NICK bob").await.unwrap();
    let reply = second.expect("433").await.expect("No ERR_NICKNAMEINUSE");
    assert_eq!(reply.params, vec!["*", "bob", "Nickname is already in use"]);
}

#[tokio::test]
async fn test_commands_before_registration_are_refused() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut eve = server.connect("eve").await.expect("Failed to connect");

    eve.send_raw("JOIN #test").await.unwrap();
    let reply = eve.expect("451").await.expect("No ERR_NOTREGISTERED");
    assert_eq!(reply.params, vec!["*", "JOIN", "You have not registered"]);

    // PING is allowed before registration.
    eve.send_raw("PING :abc").await.unwrap();
    let pong = eve.expect("PONG").await.expect("No PONG");
    assert_eq!(pong.params, vec!["test.server", "abc"]);
}

#[tokio::test]
async fn test_cap_negotiation_holds_registration() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut bob = server.connect("bob").await.expect("Failed to connect");
    bob.drain().await;

    bob.send_raw("CAP LS 302").await.unwrap();
    bob.send_raw("NICK bob").await.unwrap();
    bob.send_raw("USER bob 0 * :Bob").await.unwrap();
    let ls = bob.expect("CAP").await.expect("No CAP LS");
    assert_eq!(ls.params, vec!["*", "LS", "multi-prefix"]);
    assert!(bob.recv_timeout(std::time::Duration::from_millis(300)).await.is_err());

    bob.send_raw("CAP END").await.unwrap();
    bob.expect("001").await.expect("No welcome after CAP END");
}

#[tokio::test]
async fn test_quit_closes_link() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut bob = server.connect("bob").await.expect("Failed to connect");
    bob.register().await.expect("Registration failed");

    bob.quit(Some("gone fishing")).await.unwrap();
    let error = bob.expect("ERROR").await.expect("No ERROR");
    assert_eq!(error.params, vec!["Closing Link: 127.0.0.1 (gone fishing)"]);
    assert!(bob.recv().await.is_err());
}
