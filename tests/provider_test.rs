//! Provider integration tests against mocked HTTP endpoints.
//!
//! Both providers are pointed at a local wiremock server; the Spotify
//! provider additionally gets a stub locator so no yt-dlp binary is needed.

use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use spotigram::provider::{
    AudioLocator, AudioSource, MetadataProvider, ProviderError, ScraperProvider, SpotifyProvider,
};
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TRACK_URL: &str = "https://open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp";

/// Locator that always returns a fixed page URL.
struct FixedLocator(Url);

#[async_trait]
impl AudioLocator for FixedLocator {
    async fn locate(&self, _title: &str, _artists: &str) -> Result<Url, ProviderError> {
        Ok(self.0.clone())
    }
}

/// Locator that finds nothing, ever.
struct EmptyLocator;

#[async_trait]
impl AudioLocator for EmptyLocator {
    async fn locate(&self, _title: &str, _artists: &str) -> Result<Url, ProviderError> {
        Err(ProviderError::NoMatch)
    }
}

// ==================== ScraperProvider Tests ====================

#[tokio::test]
async fn scraper_resolves_full_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sp.php"))
        .and(query_param("url", TRACK_URL))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": true,
            "title": "Mr. Brightside",
            "artist": "The Killers",
            "duration": "3:42",
            "album": "Hot Fuss",
            "releaseDate": "2004-06-07",
            "spotify_url": TRACK_URL,
            "download_link": "https://cdn.example.com/audio/brightside.mp3",
            "image": "https://cdn.example.com/covers/hotfuss.jpg"
        })))
        .mount(&server)
        .await;

    let provider = ScraperProvider::with_base_url(server.uri());
    let meta = provider.resolve(TRACK_URL).await.unwrap();

    assert_eq!(meta.title, "Mr. Brightside");
    assert_eq!(meta.artists, "The Killers");
    assert_eq!(meta.duration, "3:42");
    assert_eq!(meta.album.as_deref(), Some("Hot Fuss"));
    assert_eq!(meta.release_date.as_deref(), Some("2004-06-07"));
    assert_eq!(meta.track_url, TRACK_URL);
    assert_eq!(
        meta.cover_url.as_deref(),
        Some("https://cdn.example.com/covers/hotfuss.jpg")
    );
    assert_eq!(
        meta.audio,
        AudioSource::Direct(Url::parse("https://cdn.example.com/audio/brightside.mp3").unwrap())
    );
}

#[tokio::test]
async fn scraper_accepts_cover_under_alternate_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sp.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": true,
            "title": "Song",
            "artist": "Artist",
            "duration": "2:00",
            "spotify_url": TRACK_URL,
            "download_link": "https://cdn.example.com/a.mp3",
            "cover": "https://cdn.example.com/c.jpg"
        })))
        .mount(&server)
        .await;

    let provider = ScraperProvider::with_base_url(server.uri());
    let meta = provider.resolve(TRACK_URL).await.unwrap();

    assert_eq!(meta.cover_url.as_deref(), Some("https://cdn.example.com/c.jpg"));
    assert_eq!(meta.album, None);
}

#[tokio::test]
async fn scraper_status_false_is_invalid_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sp.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": false })))
        .mount(&server)
        .await;

    let provider = ScraperProvider::with_base_url(server.uri());
    let err = provider.resolve("https://example.com/not-a-track").await.unwrap_err();

    assert!(matches!(err, ProviderError::InvalidUrl));
}

#[tokio::test]
async fn scraper_http_error_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sp.php"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = ScraperProvider::with_base_url(server.uri());
    let err = provider.resolve(TRACK_URL).await.unwrap_err();

    assert!(matches!(err, ProviderError::Unavailable(_)));
}

// ==================== SpotifyProvider Tests ====================

fn track_json() -> serde_json::Value {
    serde_json::json!({
        "name": "Take On Me",
        "artists": [{ "name": "a-ha" }],
        "duration_ms": 225_000,
        "album": {
            "name": "Hunting High and Low",
            "release_date": "1985-06-01",
            "images": [{ "url": "https://i.scdn.co/image/cover.jpg" }]
        },
        "external_urls": { "spotify": "https://open.spotify.com/track/2WfaOiMkCvy7F5fcp2zZ8L" }
    })
}

#[tokio::test]
async fn spotify_resolves_via_token_and_locator() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "test-token",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/tracks/2WfaOiMkCvy7F5fcp2zZ8L"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(track_json()))
        .mount(&server)
        .await;

    let located = Url::parse("https://www.youtube.com/watch?v=djV11Xbc914").unwrap();
    let provider = SpotifyProvider::with_endpoints(
        format!("{}/api/token", server.uri()),
        format!("{}/v1", server.uri()),
        Arc::new(FixedLocator(located.clone())),
    );

    let meta = provider
        .resolve("https://open.spotify.com/track/2WfaOiMkCvy7F5fcp2zZ8L?si=abc")
        .await
        .unwrap();

    assert_eq!(meta.title, "Take On Me");
    assert_eq!(meta.artists, "a-ha");
    assert_eq!(meta.duration, "3:45");
    assert_eq!(meta.album.as_deref(), Some("Hunting High and Low"));
    assert_eq!(meta.release_date.as_deref(), Some("1985-06-01"));
    assert_eq!(meta.cover_url.as_deref(), Some("https://i.scdn.co/image/cover.jpg"));
    assert_eq!(meta.audio, AudioSource::Page(located));
}

#[tokio::test]
async fn spotify_joins_multiple_artists() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "access_token": "t" })))
        .mount(&server)
        .await;

    let mut track = track_json();
    track["artists"] = serde_json::json!([{ "name": "Daft Punk" }, { "name": "Pharrell Williams" }]);
    Mock::given(method("GET"))
        .and(path("/v1/tracks/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(track))
        .mount(&server)
        .await;

    let provider = SpotifyProvider::with_endpoints(
        format!("{}/api/token", server.uri()),
        format!("{}/v1", server.uri()),
        Arc::new(FixedLocator(Url::parse("https://youtu.be/x").unwrap())),
    );

    let meta = provider
        .resolve("https://open.spotify.com/track/abc")
        .await
        .unwrap();

    assert_eq!(meta.artists, "Daft Punk, Pharrell Williams");
}

#[tokio::test]
async fn spotify_token_failure_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = SpotifyProvider::with_endpoints(
        format!("{}/api/token", server.uri()),
        format!("{}/v1", server.uri()),
        Arc::new(FixedLocator(Url::parse("https://youtu.be/x").unwrap())),
    );

    let err = provider.resolve(TRACK_URL).await.unwrap_err();
    assert!(matches!(err, ProviderError::Unavailable(_)));
}

#[tokio::test]
async fn spotify_rejects_unparseable_url_without_network() {
    // No mocks mounted: an invalid URL must fail before any HTTP call.
    let server = MockServer::start().await;

    let provider = SpotifyProvider::with_endpoints(
        format!("{}/api/token", server.uri()),
        format!("{}/v1", server.uri()),
        Arc::new(FixedLocator(Url::parse("https://youtu.be/x").unwrap())),
    );

    let err = provider.resolve("not a url at all").await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidUrl));
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn spotify_empty_search_is_distinct_no_match() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "access_token": "t" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/tracks/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(track_json()))
        .mount(&server)
        .await;

    let provider = SpotifyProvider::with_endpoints(
        format!("{}/api/token", server.uri()),
        format!("{}/v1", server.uri()),
        Arc::new(EmptyLocator),
    );

    let err = provider
        .resolve("https://open.spotify.com/track/abc")
        .await
        .unwrap_err();

    // The URL was valid; the failure cause must stay distinguishable.
    assert!(matches!(err, ProviderError::NoMatch));
    assert_ne!(err.user_message(), ProviderError::InvalidUrl.user_message());
}
