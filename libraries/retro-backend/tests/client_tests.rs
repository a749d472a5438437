//! Tests for the Supabase client against a mock backend.

use retro_backend::{BackendConfig, BackendError, SupabaseClient};
use retro_core::{AudioStorage, RetroError, TrackCatalog, TrackId};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ANON_KEY: &str = "anon-key";

fn client_for(server: &MockServer) -> SupabaseClient {
    SupabaseClient::new(BackendConfig::new(server.uri(), ANON_KEY)).unwrap()
}

fn session_body(token: &str) -> serde_json::Value {
    json!({
        "access_token": token,
        "refresh_token": "refresh",
        "expires_in": 3600,
        "token_type": "bearer",
        "user": {
            "id": "user-1",
            "email": "listener@example.com",
            "user_metadata": { "username": "anri" }
        }
    })
}

// =============================================================================
// Authentication Tests
// =============================================================================

mod authentication {
    use super::*;

    #[tokio::test]
    async fn sign_in_stores_access_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", ANON_KEY))
            .and(body_json(json!({
                "email": "listener@example.com",
                "password": "hunter22"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body("user-token")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let session = client
            .sign_in("listener@example.com", "hunter22")
            .await
            .unwrap();

        assert_eq!(session.user.id, "user-1");
        assert!(client.is_authenticated().await);
        assert_eq!(client.access_token().await.as_deref(), Some("user-token"));
    }

    #[tokio::test]
    async fn sign_in_rejected_credentials() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.sign_in("listener@example.com", "wrong").await;

        match result.unwrap_err() {
            BackendError::AuthFailed(msg) => assert_eq!(msg, "Invalid login credentials"),
            e => panic!("Expected AuthFailed, got: {:?}", e),
        }
        assert!(!client.is_authenticated().await);
    }

    #[tokio::test]
    async fn sign_in_validates_email_locally() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        let result = client.sign_in("not-an-email", "hunter22").await;
        assert!(matches!(result, Err(BackendError::InvalidInput(_))));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sign_up_sends_username_metadata() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .and(body_json(json!({
                "email": "new@example.com",
                "password": "secret1",
                "data": { "username": "anri" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "user-2",
                "email": "new@example.com",
                "user_metadata": { "username": "anri" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let created = client
            .sign_up("new@example.com", "secret1", "  anri ")
            .await
            .unwrap();

        assert_eq!(created.user().id, "user-2");
        // Pending e-mail confirmation: not signed in yet
        assert!(!client.is_authenticated().await);
    }

    #[tokio::test]
    async fn sign_up_with_session_signs_in() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body("fresh")))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .sign_up("new@example.com", "secret1", "anri")
            .await
            .unwrap();

        assert_eq!(client.access_token().await.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn sign_out_clears_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .and(header("authorization", "Bearer user-token"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.set_access_token(Some("user-token".to_string())).await;

        client.sign_out().await.unwrap();
        assert!(!client.is_authenticated().await);
    }

    #[tokio::test]
    async fn current_user_with_valid_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer user-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "user-1",
                "email": "listener@example.com",
                "user_metadata": { "username": "anri" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.set_access_token(Some("user-token".to_string())).await;

        let user = client.current_user().await.unwrap().unwrap();
        assert_eq!(user.username.as_deref(), Some("anri"));

        let session = client.restore_session().await;
        assert!(!session.is_loading());
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn expired_token_restores_as_signed_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.set_access_token(Some("stale".to_string())).await;

        assert!(client.current_user().await.unwrap().is_none());

        let session = client.restore_session().await;
        assert!(!session.is_loading());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn no_token_means_no_user_without_request() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        assert!(client.current_user().await.unwrap().is_none());
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

// =============================================================================
// Catalog Tests
// =============================================================================

mod catalog {
    use super::*;

    #[tokio::test]
    async fn list_tracks_newest_first_with_public_urls() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/tracks"))
            .and(query_param("select", "*"))
            .and(query_param("order", "created_at.desc"))
            .and(header("apikey", ANON_KEY))
            .and(header("authorization", "Bearer anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": 2,
                    "title": "Plastic Love",
                    "artist": "Mariya Takeuchi",
                    "duration": 293.0,
                    "file_path": "Mariya Takeuchi - Plastic Love.mp3",
                    "created_at": "2024-03-02T10:00:00+00:00"
                },
                {
                    "id": 1,
                    "title": "Skyfall",
                    "artist": null,
                    "duration": 0,
                    "file_path": "Adele - Skyfall.opus",
                    "created_at": "2024-03-01T10:00:00+00:00"
                }
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let tracks = client.catalog().list_tracks().await.unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, TrackId::new("2"));
        assert_eq!(tracks[0].duration_secs, 293.0);
        assert_eq!(
            tracks[0].source_url,
            format!(
                "{}/storage/v1/object/public/audio-files/Mariya%20Takeuchi%20-%20Plastic%20Love.mp3",
                server.uri()
            )
        );
        assert_eq!(tracks[1].artist, "");
        assert!(!tracks[1].has_known_duration());
    }

    #[tokio::test]
    async fn signed_in_requests_use_user_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/tracks"))
            .and(header("authorization", "Bearer user-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.set_access_token(Some("user-token".to_string())).await;

        assert!(client.catalog().list_tracks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_track_missing_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/tracks"))
            .and(query_param("id", "eq.42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .catalog()
            .get_track(&TrackId::new("42"))
            .await
            .unwrap_err();

        assert!(matches!(err, RetroError::TrackNotFound(id) if id == TrackId::new("42")));
    }

    #[tokio::test]
    async fn record_uploaded_track_inserts_placeholder_duration() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/tracks"))
            .and(header("prefer", "return=representation"))
            .and(body_json(json!([{
                "title": "Alag Aasmaan",
                "file_path": "Alag_Aasmaan.mp3",
                "duration": 0.0
            }])))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
                "id": 9,
                "title": "Alag Aasmaan",
                "artist": null,
                "duration": 0,
                "file_path": "Alag_Aasmaan.mp3"
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let track = client
            .catalog()
            .record_uploaded_track("Alag Aasmaan", "Alag_Aasmaan.mp3")
            .await
            .unwrap();

        assert_eq!(track.id, TrackId::new("9"));
        assert!(track.source_url.ends_with("/audio-files/Alag_Aasmaan.mp3"));
    }

    #[tokio::test]
    async fn update_track_duration_patches_row() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/rest/v1/tracks"))
            .and(query_param("id", "eq.7"))
            .and(body_json(json!({ "duration": 215.5 })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .catalog()
            .update_track_duration(&TrackId::new("7"), 215.5)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn server_errors_become_catalog_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/tracks"))
            .respond_with(
                ResponseTemplate::new(500).set_body_string("relation does not exist"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.catalog().list_tracks().await.unwrap_err();

        match err {
            RetroError::Catalog(msg) => assert!(msg.contains("relation does not exist")),
            e => panic!("Expected Catalog error, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn unauthorized_becomes_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/tracks"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.catalog().list_tracks().await.unwrap_err();
        assert!(matches!(err, RetroError::Auth(_)));
    }

    #[tokio::test]
    async fn resolve_playable_url_needs_no_request() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        let url = client
            .catalog()
            .resolve_playable_url("Anuv Jain - Alag Aasmaan.mp3")
            .await
            .unwrap();

        assert!(url.ends_with("/storage/v1/object/public/audio-files/Anuv%20Jain%20-%20Alag%20Aasmaan.mp3"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

// =============================================================================
// Storage Tests
// =============================================================================

mod storage {
    use super::*;

    #[tokio::test]
    async fn upload_returns_path_in_bucket() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/storage/v1/object/audio-files/Skyfall.opus"))
            .and(header("content-type", "audio/opus"))
            .and(header("x-upsert", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Key": "audio-files/Skyfall.opus"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let path = client
            .storage()
            .upload_file(b"OggS".to_vec(), "Skyfall.opus", "audio/opus")
            .await
            .unwrap();

        assert_eq!(path, "Skyfall.opus");
    }

    #[tokio::test]
    async fn duplicate_object_is_conflict() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/storage/v1/object/audio-files/Skyfall.opus"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "statusCode": "409",
                "error": "Duplicate",
                "message": "The resource already exists"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .storage()
            .upload(b"OggS".to_vec(), "Skyfall.opus", "audio/opus")
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Conflict(name) if name == "Skyfall.opus"));
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        let err = client
            .storage()
            .upload_file(vec![1, 2, 3], "/", "audio/mpeg")
            .await
            .unwrap_err();
        assert!(matches!(err, RetroError::InvalidInput(_)));
    }
}
