//! Catalog resource registration and mounting of the route table on axum.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodFilter, MethodRouter, get},
};
use serde_json::Value;

use factory_catalog::{Catalog, CategoryViewSet, ProductViewSet};
use factory_routers::{
    Action, ActionRequest, Endpoint, HttpMethod, ResourceRouter, RouteTable, RouterError, ViewResult,
    ViewSet, dispatch,
};

use crate::app::errors;
use crate::config::ApiConfig;

/// The resources served by this API.
pub fn register(router: &mut ResourceRouter, catalog: Arc<Catalog>) -> Result<(), RouterError> {
    router.register("product", Arc::new(ProductViewSet::new(Arc::clone(&catalog))))?;
    router.register("category", Arc::new(CategoryViewSet::new(catalog)))?;
    Ok(())
}

pub fn route_table(config: &ApiConfig, catalog: Arc<Catalog>) -> Result<RouteTable, RouterError> {
    let mut router = ResourceRouter::with_config(config.router);
    register(&mut router, catalog)?;
    Ok(router.build())
}

/// One axum route per endpoint of the table, one method per action.
pub fn mount(table: &RouteTable) -> Router {
    let mut router = Router::new();

    for group in table.endpoints() {
        let Some(viewset) = table.viewset(group.resource) else {
            continue;
        };

        let mut methods = MethodRouter::new();
        for route in &group.routes {
            methods = match group.endpoint {
                Endpoint::Collection => collection_action(methods, Arc::clone(viewset), route.action),
                Endpoint::Item => item_action(methods, Arc::clone(viewset), route.action),
            };
        }
        router = router.route(&axum_path(group.pattern), methods);
    }

    if let Some(root) = table.root() {
        let body = root.to_json();
        router = router.route(&root.pattern, get(move || async move { Json(body) }));
    }

    router
}

fn collection_action(methods: MethodRouter, viewset: Arc<dyn ViewSet>, action: Action) -> MethodRouter {
    let filter = method_filter(action.method());
    if takes_body(action) {
        methods.on(filter, move |Json(body): Json<Value>| async move {
            let request = ActionRequest::collection().with_body(body);
            respond(action, dispatch(viewset.as_ref(), action, request))
        })
    } else {
        methods.on(filter, move || async move {
            respond(action, dispatch(viewset.as_ref(), action, ActionRequest::collection()))
        })
    }
}

fn item_action(methods: MethodRouter, viewset: Arc<dyn ViewSet>, action: Action) -> MethodRouter {
    let filter = method_filter(action.method());
    if takes_body(action) {
        methods.on(
            filter,
            move |Path(lookup): Path<String>, Json(body): Json<Value>| async move {
                let request = ActionRequest::item(lookup).with_body(body);
                respond(action, dispatch(viewset.as_ref(), action, request))
            },
        )
    } else {
        methods.on(filter, move |Path(lookup): Path<String>| async move {
            respond(action, dispatch(viewset.as_ref(), action, ActionRequest::item(lookup)))
        })
    }
}

fn takes_body(action: Action) -> bool {
    matches!(action, Action::Create | Action::Update | Action::PartialUpdate)
}

fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Patch => MethodFilter::PATCH,
        HttpMethod::Delete => MethodFilter::DELETE,
    }
}

fn respond(action: Action, result: ViewResult<Option<Value>>) -> Response {
    match result {
        Ok(Some(body)) if action == Action::Create => (StatusCode::CREATED, Json(body)).into_response(),
        Ok(Some(body)) => (StatusCode::OK, Json(body)).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::view_error_to_response(e),
    }
}

/// `/product/{id}/` → `/product/:id/`
fn axum_path(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => format!(":{name}"),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
