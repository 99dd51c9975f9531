//! End-to-end tests for the product HTTP surface.
//!
//! The full Actix app (trace middleware, extractor error handlers, catalog
//! service) runs against the in-memory store and cache doubles so the cache
//! protocol can be observed from outside.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use product_service::Trace;
use product_service::domain::CatalogService;
use product_service::inbound::http::configure;
use product_service::inbound::http::health::HealthState;
use product_service::inbound::http::state::HttpState;
use product_service::test_support::{InMemoryProductCache, InMemoryProductRepository};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use uuid::Uuid;

struct Harness {
    repository: Arc<InMemoryProductRepository>,
    cache: Arc<InMemoryProductCache>,
}

impl Harness {
    fn http_state(&self) -> web::Data<HttpState> {
        let service = Arc::new(CatalogService::new(
            self.repository.clone(),
            self.cache.clone(),
        ));
        web::Data::new(HttpState::new(service.clone(), service))
    }
}

#[fixture]
fn harness() -> Harness {
    Harness {
        repository: Arc::new(InMemoryProductRepository::default()),
        cache: Arc::new(InMemoryProductCache::default()),
    }
}

/// Initialise the app the same way the server binary does, minus Swagger.
macro_rules! init_app {
    ($harness:expr) => {{
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        test::init_service(
            App::new()
                .app_data(health)
                .app_data($harness.http_state())
                .wrap(Trace)
                .configure(configure),
        )
        .await
    }};
}

fn widget() -> Value {
    json!({ "name": "Widget", "price": 9.99, "category": "A" })
}

fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .expect("list body is an array")
        .iter()
        .map(|product| product["id"].as_i64().expect("numeric id"))
        .collect()
}

#[rstest]
#[actix_web::test]
async fn create_get_update_and_list_by_category(harness: Harness) {
    let app = init_app!(harness);

    let create = test::TestRequest::post()
        .uri("/products")
        .set_json(widget())
        .to_request();
    let res = test::call_service(&app, create).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;
    let id = created["id"].as_i64().expect("numeric id");
    assert_eq!(created["name"], "Widget");
    assert_eq!(created["price"], 9.99);
    assert_eq!(created["category"], "A");
    assert_eq!(created["description"], Value::Null);

    let get = test::TestRequest::get()
        .uri(&format!("/products/{id}"))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, get).await;
    assert_eq!(fetched, created);

    let update = test::TestRequest::put()
        .uri(&format!("/products/{id}"))
        .set_json(json!({ "category": "B" }))
        .to_request();
    let res = test::call_service(&app, update).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(res).await;
    assert_eq!(updated["category"], "B");
    assert_eq!(updated["name"], "Widget");
    assert_eq!(updated["price"], 9.99);

    let list_a = test::TestRequest::get()
        .uri("/products?category=A")
        .to_request();
    let in_a: Value = test::call_and_read_body_json(&app, list_a).await;
    assert!(!ids(&in_a).contains(&id));

    let list_b = test::TestRequest::get()
        .uri("/products?category=B")
        .to_request();
    let in_b: Value = test::call_and_read_body_json(&app, list_b).await;
    assert_eq!(ids(&in_b), vec![id]);
}

#[rstest]
#[actix_web::test]
async fn stale_category_list_is_refreshed_after_update(harness: Harness) {
    let app = init_app!(harness);

    let create = test::TestRequest::post()
        .uri("/products")
        .set_json(widget())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, create).await;
    let id = created["id"].as_i64().expect("numeric id");

    // Warm both category lists before moving the product.
    for uri in ["/products?category=A", "/products?category=B"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let _: Value = test::call_and_read_body_json(&app, req).await;
    }
    assert!(harness.cache.contains("products:all:A"));
    assert!(harness.cache.contains("products:all:B"));

    let update = test::TestRequest::put()
        .uri(&format!("/products/{id}"))
        .set_json(json!({ "category": "B" }))
        .to_request();
    let res = test::call_service(&app, update).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(!harness.cache.contains("products:all:A"));
    assert!(!harness.cache.contains("products:all:B"));

    let list_b = test::TestRequest::get()
        .uri("/products?category=B")
        .to_request();
    let in_b: Value = test::call_and_read_body_json(&app, list_b).await;
    assert_eq!(ids(&in_b), vec![id]);
}

#[rstest]
#[actix_web::test]
async fn create_invalidates_lists_and_aggregator_key(harness: Harness) {
    let app = init_app!(harness);

    let create = test::TestRequest::post()
        .uri("/products")
        .set_json(widget())
        .to_request();
    let res = test::call_service(&app, create).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    assert_eq!(
        harness.cache.take_deleted(),
        vec![
            "products:all".to_owned(),
            "gateway:products_full:all".to_owned(),
            "products:all:A".to_owned(),
        ]
    );
}

#[rstest]
#[actix_web::test]
async fn empty_update_is_rejected_without_mutation(harness: Harness) {
    let app = init_app!(harness);

    let create = test::TestRequest::post()
        .uri("/products")
        .set_json(widget())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, create).await;
    let id = created["id"].as_i64().expect("numeric id");
    let before = harness.repository.snapshot();
    harness.cache.take_deleted();

    for body in [json!({}), json!({ "name": null, "price": null })] {
        let update = test::TestRequest::put()
            .uri(&format!("/products/{id}"))
            .set_json(body)
            .to_request();
        let res = test::call_service(&app, update).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let error: Value = test::read_body_json(res).await;
        assert_eq!(error["code"], "invalid_request");
    }

    assert_eq!(harness.repository.snapshot(), before);
    assert!(harness.cache.take_deleted().is_empty());
}

#[rstest]
#[case(json!({ "name": "Widget", "price": -5.0 }), "price")]
#[case(json!({ "name": "", "price": 1.0 }), "name")]
#[case(json!({ "name": "x".repeat(256), "price": 1.0 }), "name")]
#[case(json!({ "name": "Widget", "price": 1.0, "category": "c".repeat(256) }), "category")]
#[case(json!({ "name": "Wid\u{0}get", "price": 1.0 }), "name")]
#[case(json!({ "name": "Widget", "price": 1.0, "description": "a\u{0}b" }), "description")]
#[case(json!({ "price": 1.0 }), "name")]
#[case(json!({ "name": "Widget" }), "price")]
#[actix_web::test]
async fn invalid_create_is_unprocessable(
    harness: Harness,
    #[case] body: Value,
    #[case] field: &str,
) {
    let app = init_app!(harness);

    let create = test::TestRequest::post()
        .uri("/products")
        .set_json(body)
        .to_request();
    let res = test::call_service(&app, create).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["code"], "unprocessable_entity");
    assert_eq!(error["details"]["field"], field);
    assert!(harness.repository.is_empty());
}

#[rstest]
#[actix_web::test]
async fn invalid_update_field_is_unprocessable(harness: Harness) {
    let app = init_app!(harness);

    let create = test::TestRequest::post()
        .uri("/products")
        .set_json(widget())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, create).await;
    let id = created["id"].as_i64().expect("numeric id");

    let update = test::TestRequest::put()
        .uri(&format!("/products/{id}"))
        .set_json(json!({ "price": 0.0 }))
        .to_request();
    let res = test::call_service(&app, update).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["details"]["field"], "price");
}

#[rstest]
#[actix_web::test]
async fn deleting_twice_reports_not_found(harness: Harness) {
    let app = init_app!(harness);

    let create = test::TestRequest::post()
        .uri("/products")
        .set_json(widget())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, create).await;
    let id = created["id"].as_i64().expect("numeric id");
    let uri = format!("/products/{id}");

    let first = test::TestRequest::delete().uri(&uri).to_request();
    let res = test::call_service(&app, first).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(test::read_body(res).await.is_empty());

    let second = test::TestRequest::delete().uri(&uri).to_request();
    let res = test::call_service(&app, second).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let get = test::TestRequest::get().uri(&uri).to_request();
    let res = test::call_service(&app, get).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn missing_product_update_is_not_found(harness: Harness) {
    let app = init_app!(harness);

    let update = test::TestRequest::put()
        .uri("/products/404")
        .set_json(json!({ "name": "Ghost" }))
        .to_request();
    let res = test::call_service(&app, update).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(harness.cache.take_deleted().is_empty());
}

#[rstest]
#[actix_web::test]
async fn consecutive_reads_return_identical_payloads(harness: Harness) {
    let app = init_app!(harness);

    let create = test::TestRequest::post()
        .uri("/products")
        .set_json(widget())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, create).await;
    let id = created["id"].as_i64().expect("numeric id");
    let uri = format!("/products/{id}");

    let first_req = test::TestRequest::get().uri(&uri).to_request();
    let first = test::read_body(test::call_service(&app, first_req).await).await;
    assert!(harness.cache.contains(&format!("product:{id}")));

    let second_req = test::TestRequest::get().uri(&uri).to_request();
    let second = test::read_body(test::call_service(&app, second_req).await).await;
    assert_eq!(first, second);
}

#[rstest]
#[actix_web::test]
async fn cache_outage_does_not_change_responses(harness: Harness) {
    harness.cache.set_failing(true);
    let app = init_app!(harness);

    let create = test::TestRequest::post()
        .uri("/products")
        .set_json(widget())
        .to_request();
    let res = test::call_service(&app, create).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;
    let id = created["id"].as_i64().expect("numeric id");
    let uri = format!("/products/{id}");

    let get = test::TestRequest::get().uri(&uri).to_request();
    let fetched: Value = test::call_and_read_body_json(&app, get).await;
    assert_eq!(fetched, created);

    let list = test::TestRequest::get().uri("/products").to_request();
    let listed: Value = test::call_and_read_body_json(&app, list).await;
    assert_eq!(ids(&listed), vec![id]);

    let update = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "description": "Sturdy" }))
        .to_request();
    let res = test::call_service(&app, update).await;
    assert_eq!(res.status(), StatusCode::OK);

    let delete = test::TestRequest::delete().uri(&uri).to_request();
    let res = test::call_service(&app, delete).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[rstest]
#[actix_web::test]
async fn store_outage_is_service_unavailable(harness: Harness) {
    harness.repository.set_unavailable(true);
    let app = init_app!(harness);

    let list = test::TestRequest::get().uri("/products").to_request();
    let res = test::call_service(&app, list).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["code"], "service_unavailable");
}

#[rstest]
#[case::malformed_json(test::TestRequest::post().uri("/products").insert_header(("content-type", "application/json")).set_payload("{not json"))]
#[case::non_numeric_id(test::TestRequest::get().uri("/products/abc"))]
#[actix_web::test]
async fn undecodable_requests_are_unprocessable(
    harness: Harness,
    #[case] request: test::TestRequest,
) {
    let app = init_app!(harness);

    let res = test::call_service(&app, request.to_request()).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["code"], "unprocessable_entity");
}

#[rstest]
#[actix_web::test]
async fn responses_carry_trace_id(harness: Harness) {
    let app = init_app!(harness);

    let list = test::TestRequest::get().uri("/products").to_request();
    let res = test::call_service(&app, list).await;
    let header = res
        .headers()
        .get("trace-id")
        .expect("trace-id header")
        .to_str()
        .expect("ascii header");
    assert!(Uuid::parse_str(header).is_ok());

    let missing = test::TestRequest::get().uri("/products/999").to_request();
    let res = test::call_service(&app, missing).await;
    let header = res
        .headers()
        .get("trace-id")
        .expect("trace-id header")
        .to_str()
        .expect("ascii header")
        .to_owned();
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["traceId"], header.as_str());
}

#[rstest]
#[actix_web::test]
async fn health_reports_service_name(harness: Harness) {
    let app = init_app!(harness);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body,
        json!({ "status": "healthy", "service": "product-service" })
    );

    let ready = test::TestRequest::get().uri("/health/ready").to_request();
    let res = test::call_service(&app, ready).await;
    assert_eq!(res.status(), StatusCode::OK);
}
