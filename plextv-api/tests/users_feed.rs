//! Integration tests for fetching the sharing feed
use plextv_api::{AccessToken, Client, ClientIdentity, PlexTvError};
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MediaContainer friendlyName="myPlex" identifier="com.plexapp.plugins.myplex" totalSize="2" size="2">
  <User id="1001" title="alice" username="alice" email="alice@example.com" thumb="https://plex.tv/users/a/avatar" allowSync="1" home="0" restricted="0">
    <Server id="11" serverId="501" machineIdentifier="m-1" name="Den" lastSeenAt="1700000000" numLibraries="4" allLibraries="1" owned="1" pending="0"/>
  </User>
  <User id="1002" title="bob" thumb="https://plex.tv/users/b/avatar" allowSync="0" home="1" restricted="1">
  </User>
</MediaContainer>"#;

fn client(server: &MockServer) -> Client {
    Client::new(ClientIdentity::new("client-123", "plextv-test"))
        .unwrap()
        .with_api_base(server.uri())
}

#[tokio::test]
async fn users_parses_feed() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/users"))
        .and(matchers::query_param("X-Plex-Token", "tok"))
        .and(matchers::query_param("X-Plex-Language", "en"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(FEED, "application/xml; charset=utf-8"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let users = client(&server)
        .users(&AccessToken::new("tok"))
        .await
        .unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].title, "alice");
    assert_eq!(users[0].servers.len(), 1);
    assert_eq!(users[0].servers[0].machine_identifier, "m-1");
    assert_eq!(users[0].servers[0].last_seen_at.timestamp(), 1_700_000_000);
    assert_eq!(users[1].title, "bob");
    assert!(users[1].servers.is_empty());
    assert!(users[1].restricted);
}

#[tokio::test]
async fn users_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/users"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server)
        .users(&AccessToken::new("expired"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlexTvError::Unauthorized));
}

#[tokio::test]
async fn users_rejects_json_body() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .mount(&server)
        .await;

    let err = client(&server)
        .users(&AccessToken::new("tok"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlexTvError::UnexpectedContentType(_)));
}

#[tokio::test]
async fn users_malformed_xml() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<MediaContainer><User id=\"1\"></Server>", "application/xml"),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .users(&AccessToken::new("tok"))
        .await
        .unwrap_err();
    assert!(err.is_parse_error());
}
