//! End-to-end secret tests against a mock Secret Server.
//!
//! These drive the public `Server` API over real HTTP and check both the
//! returned secrets and the exact requests the server saw.

use serde_json::json;
use tss_client::{ClientError, Secret, SecretField, Server, SshKeyArgs, TokenCache};
use tss_core::config::ConfigBuilder;
use tss_integration_tests::{
    json_body, mount_template, received, stored_secret, token_config, TEMPLATE_ID,
};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_stored(server: &MockServer, id: i64, password: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/secrets/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_secret(id, password)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/secrets/{}/fields/private-key", id)))
        .respond_with(ResponseTemplate::new(200).set_body_string("-----BEGIN KEY-----"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_read_secret_inlines_attachment() {
    let server = MockServer::start().await;
    mount_stored(&server, 100, "pw").await;

    let client = Server::new(token_config(&server)).unwrap();
    let secret = client.secret(100).await.unwrap();

    assert_eq!(secret.name, "host01");
    assert_eq!(secret.field("Machine"), Some("host01"));
    assert_eq!(secret.field("private-key"), Some("-----BEGIN KEY-----"));
    assert_eq!(secret.field("public-key"), Some(""));
    assert_eq!(secret.field_by_id(110), Some("pw"));
    // The public key has no attachment, so only one secondary fetch.
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_secret_with_file_fields() {
    let server = MockServer::start().await;
    mount_template(&server).await;
    mount_stored(&server, 100, "pw").await;
    Mock::given(method("POST"))
        .and(path("/api/v1/secrets/"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_secret(100, "pw")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/secrets/100/fields/private-key"))
        .and(body_string_contains("filename=\"id_rsa.txt\""))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/secrets/100/general"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let client = Server::new(token_config(&server)).unwrap();
    let created = client
        .create_secret(Secret {
            name: "host01".to_string(),
            folder_id: 3,
            site_id: 1,
            secret_template_id: TEMPLATE_ID,
            fields: vec![
                SecretField::with_slug("machine", "host01"),
                SecretField::with_slug("password", "pw"),
                SecretField::with_field_id(112, "-----BEGIN KEY-----").filename("id_rsa"),
                SecretField::with_slug("public-key", ""),
            ],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(created.id, 100);
    assert_eq!(created.field("machine"), Some("host01"));
    assert_eq!(created.field("password"), Some("pw"));
    assert_eq!(created.field("private-key"), Some("-----BEGIN KEY-----"));

    let posts = received(&server, "POST", "/api/v1/secrets/").await;
    let body = json_body(&posts[0]);
    assert_eq!(body["Name"], "host01");
    assert_eq!(body["SecretTemplateID"], TEMPLATE_ID);
    let slugs: Vec<_> = body["Items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["Slug"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(slugs, ["machine", "password"]);

    let patches = received(&server, "PATCH", "/api/v1/secrets/100/general").await;
    assert_eq!(
        json_body(&patches[0]),
        json!({"Data": {"SecretFields": [{"Slug": "public-key", "Dirty": true, "Value": null}]}})
    );
}

#[tokio::test]
async fn test_create_with_ssh_generation() {
    let server = MockServer::start().await;
    mount_template(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/secrets/"))
        .and(body_string_contains("\"SshKeyArgs\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 101})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/secrets/101"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 101, "name": "gen"})))
        .mount(&server)
        .await;

    let client = Server::new(token_config(&server)).unwrap();
    let created = client
        .create_secret(Secret {
            name: "gen".to_string(),
            secret_template_id: TEMPLATE_ID,
            fields: vec![SecretField::with_slug("machine", "host02")],
            ssh_key_args: Some(SshKeyArgs::generate_all()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(created.id, 101);
    assert!(received(&server, "PUT", "/api/v1/secrets/101/fields/private-key")
        .await
        .is_empty());
}

#[tokio::test]
async fn test_update_secret() {
    let server = MockServer::start().await;
    mount_template(&server).await;
    mount_stored(&server, 100, "new-pw").await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/secrets/100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_secret(100, "new-pw")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/secrets/100/fields/private-key"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/secrets/100/general"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = Server::new(token_config(&server)).unwrap();
    let mut secret = client.secret(100).await.unwrap();
    for field in secret.fields.iter_mut().filter(|f| f.slug == "password") {
        field.item_value = "new-pw".to_string();
    }
    let updated = client.update_secret(secret).await.unwrap();

    assert_eq!(updated.field("password"), Some("new-pw"));
    let puts = received(&server, "PUT", "/api/v1/secrets/100").await;
    assert_eq!(json_body(&puts[0])["ID"], 100);
}

#[tokio::test]
async fn test_update_with_ssh_generation_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = Server::new(token_config(&server)).unwrap();
    let err = client
        .update_secret(Secret {
            id: 100,
            name: "host01".to_string(),
            ssh_key_args: Some(SshKeyArgs {
                generate_passphrase: true,
                generate_ssh_keys: false,
            }),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::SshGenerationOnUpdate { .. }));
}

#[tokio::test]
async fn test_schema_mismatch_sends_no_write() {
    let server = MockServer::start().await;
    mount_template(&server).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = Server::new(token_config(&server)).unwrap();
    let err = client
        .create_secret(Secret {
            name: "bad".to_string(),
            secret_template_id: TEMPLATE_ID,
            fields: vec![SecretField::with_slug("pin", "1234")],
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(err.to_string().contains("field name 'pin' is not defined"));
}

#[tokio::test]
async fn test_delete_secret() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/secrets/100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 100})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Server::new(token_config(&server)).unwrap();
    client.delete_secret(100).await.unwrap();
}

#[tokio::test]
async fn test_search_secrets() {
    let server = MockServer::start().await;
    mount_stored(&server, 100, "pw").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/secrets"))
        .and(query_param("paging.filter.searchText", "host01"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"records": [{"id": 100}], "total": 1})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = Server::new(token_config(&server)).unwrap();
    let found = client.secrets("host01", None).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].field("private-key"), Some("-----BEGIN KEY-----"));
}

#[tokio::test]
async fn test_generate_password() {
    let server = MockServer::start().await;
    mount_template(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/secret-templates/generate-password/110"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"Xk3$a9!q\""))
        .expect(1)
        .mount(&server)
        .await;

    let client = Server::new(token_config(&server)).unwrap();
    let template = client.secret_template(TEMPLATE_ID).await.unwrap();
    let password = client.generate_password("password", &template).await.unwrap();

    assert_eq!(password, "Xk3$a9!q");
}

#[tokio::test]
async fn test_password_grant_token_is_shared_through_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "granted",
            "token_type": "bearer",
            "expires_in": 1200
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(header("authorization", "Bearer granted"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let config = ConfigBuilder::new()
        .server_url(server.uri())
        .credentials("svc", "pw")
        .build();
    let cache = TokenCache::new();
    let first = Server::with_cache(config.clone(), cache.clone()).unwrap();
    let second = Server::with_cache(config, cache).unwrap();

    first.delete_secret(1).await.unwrap();
    second.delete_secret(2).await.unwrap();
}
