//! Integration tests for HttpGateway.
//!
//! Uses wiremock for HTTP mocking. Tests cover envelope and bare-array bodies,
//! scope/filter query mapping, status mapping, and a resolver running on top
//! of the HTTP gateway.

use catalog_cascade::{
    CascadeError, CascadeResolver, EntityGateway, EntityId, EntityKind, FetchParams,
    GatewayConfig, HttpGateway, ReloadOutcome, ResolverConfig,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_gateway(mock_server: &MockServer) -> HttpGateway {
    let config = GatewayConfig::default().with_url(format!("{}/api", mock_server.uri()));
    HttpGateway::new(config).expect("failed to create gateway")
}

#[tokio::test]
async fn test_fetch_grade_levels_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/grade-levels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"id": 1, "code": "SD", "name": "Sekolah Dasar", "order": 1, "active": true},
                {"id": "2", "code": "SMP", "name": "Sekolah Menengah Pertama", "order": 2}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = create_test_gateway(&mock_server);
    let levels = gateway
        .fetch_grade_levels(&FetchParams::new())
        .await
        .expect("fetch failed");

    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].code, "SD");
    assert_eq!(levels[1].id, EntityId::from(2));
}

#[tokio::test]
async fn test_fetch_subjects_scope_and_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/subjects"))
        .and(query_param("grade_level_id", "2"))
        .and(query_param("category", "IPA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "name": "Agama", "code": "AGM", "category": "Umum", "gradeLevelId": null},
            {"id": 20, "name": "Fisika", "code": "FIS", "category": "IPA", "gradeLevelId": 2}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = create_test_gateway(&mock_server);
    let params = FetchParams::scoped(EntityId::from(2)).with_filter("category", "IPA");
    let subjects = gateway.fetch_subjects(&params).await.expect("fetch failed");

    assert_eq!(subjects.len(), 2);
    assert!(subjects[0].is_global());
    assert_eq!(subjects[1].grade_level_id, Some(EntityId::from(2)));
}

#[tokio::test]
async fn test_fetch_learning_units_scoped_by_subject() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/learning-units"))
        .and(query_param("subject_id", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 7, "name": "Gerak Lurus", "subjectId": 20, "classId": "200"}]
        })))
        .mount(&mock_server)
        .await;

    let gateway = create_test_gateway(&mock_server);
    let units = gateway
        .fetch_learning_units(&FetchParams::scoped(EntityId::from(20)))
        .await
        .expect("fetch failed");

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].class_id, EntityId::from(200));
}

#[tokio::test]
async fn test_success_false_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/classes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "jenjang tidak valid"
        })))
        .mount(&mock_server)
        .await;

    let gateway = create_test_gateway(&mock_server);
    let err = gateway
        .fetch_classes(&FetchParams::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CascadeError::transport(EntityKind::Class, "jenjang tidak valid")
    );
}

#[tokio::test]
async fn test_server_error_maps_to_transport() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/classes"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"message": "maintenance"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = create_test_gateway(&mock_server);
    let err = gateway
        .fetch_classes(&FetchParams::new())
        .await
        .unwrap_err();

    match err {
        CascadeError::Transport { entity, message } => {
            assert_eq!(entity, EntityKind::Class);
            assert_eq!(message, "HTTP 503: maintenance");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_class_is_invalid_response() {
    let mock_server = MockServer::start().await;

    // Classes must carry a grade level.
    Mock::given(method("GET"))
        .and(path("/api/classes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": 1, "name": "1A"}]})),
        )
        .mount(&mock_server)
        .await;

    let gateway = create_test_gateway(&mock_server);
    let err = gateway
        .fetch_classes(&FetchParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CascadeError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_resolver_over_http_caches_and_keeps_data_on_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/classes"))
        .and(query_param("grade_level_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 100, "name": "1A", "kind": "standard", "level": 1, "gradeLevelId": 1},
                {"id": 101, "name": "Tahfidz", "kind": "custom", "gradeLevelId": 1}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/classes"))
        .and(query_param("grade_level_id", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = CascadeResolver::new(create_test_gateway(&mock_server), ResolverConfig::default());
    let scoped_1 = FetchParams::scoped(EntityId::from(1));

    assert_eq!(
        resolver.reload(EntityKind::Class, &scoped_1).await,
        ReloadOutcome::Fetched { count: 2 }
    );
    assert_eq!(
        resolver.reload(EntityKind::Class, &scoped_1).await,
        ReloadOutcome::Cached { count: 2 }
    );

    let failed = resolver
        .reload(EntityKind::Class, &FetchParams::scoped(EntityId::from(2)))
        .await;
    assert_eq!(
        failed,
        ReloadOutcome::Failed {
            message: "HTTP 500".to_string()
        }
    );

    let state = resolver.state().await;
    assert_eq!(state.classes.len(), 2);
    assert_eq!(state.error.map(|e| e.entity), Some(EntityKind::Class));
}
