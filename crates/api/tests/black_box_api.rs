use factory_api::config::ApiConfig;
use factory_routers::RouterConfig;
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(ApiConfig::default()).await
    }

    async fn spawn_with(config: ApiConfig) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = factory_api::app::build_app(&config).expect("resources register cleanly");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create(
    client: &reqwest::Client,
    srv: &TestServer,
    path: &str,
    body: serde_json::Value,
) -> serde_json::Value {
    let res = client.post(srv.url(path)).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn api_root_lists_registered_resources() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "product": "/product/", "category": "/category/" }));
}

#[tokio::test]
async fn category_lifecycle_create_update_patch_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create(&client, &srv, "/category/", json!({ "name": "Fasteners" })).await;
    let id = created["id"].as_str().unwrap().to_string();
    let item = srv.url(&format!("/category/{id}/"));

    let res = client.get(&item).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Fasteners");

    let res = client
        .put(&item)
        .json(&json!({ "name": "Hardware", "description": "nuts and bolts" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .patch(&item)
        .json(&json!({ "name": "Small hardware" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Small hardware");
    assert_eq!(body["description"], "nuts and bolts");

    let res = client.delete(&item).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(&item).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn products_list_in_creation_order_with_category_links() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let category = create(&client, &srv, "/category/", json!({ "name": "Bolts" })).await;
    let category_id = category["id"].as_str().unwrap();

    create(
        &client,
        &srv,
        "/product/",
        json!({ "name": "M8 bolt", "price": 25, "category": category_id }),
    )
    .await;
    create(&client, &srv, "/product/", json!({ "name": "M10 bolt", "price": 40 })).await;

    let res = client.get(srv.url("/product/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body.as_array().unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "M8 bolt");
    assert_eq!(items[0]["category"], category_id);
    assert_eq!(items[1]["name"], "M10 bolt");
    assert!(items[1]["category"].is_null());
}

#[tokio::test]
async fn product_with_unknown_category_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/product/"))
        .json(&json!({
            "name": "M8 bolt",
            "price": 25,
            "category": "0190a5b2-0000-7000-8000-000000000000",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn malformed_identifier_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/product/not-a-uuid/")).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn unsupported_method_is_405_and_unknown_path_is_404() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Collection endpoint has no DELETE.
    let res = client.delete(srv.url("/product/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    let res = client.get(srv.url("/order/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn trailing_slash_can_be_turned_off() {
    let srv = TestServer::spawn_with(ApiConfig {
        router: RouterConfig {
            trailing_slash: false,
            include_root_view: false,
        },
        ..ApiConfig::default()
    })
    .await;

    let res = reqwest::get(srv.url("/category")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = reqwest::get(srv.url("/category/")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = reqwest::get(srv.url("/")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
