//! The resolved route table.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::action::{Action, Endpoint, HttpMethod};
use crate::viewset::ViewSet;

/// One (method, pattern) → action mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: HttpMethod,
    pub pattern: String,
    pub action: Action,
    /// `{basename}-list` or `{basename}-detail`.
    pub name: String,
    /// Prefix of the binding this route was generated from.
    pub resource: String,
}

impl Route {
    pub fn endpoint(&self) -> Endpoint {
        self.action.endpoint()
    }
}

/// Index view served at `/`, listing each resource with its collection URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoot {
    pub pattern: String,
    pub name: String,
    /// (prefix, collection URL) in registration order.
    pub entries: Vec<(String, String)>,
}

impl ApiRoot {
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(name, url)| (name.clone(), Value::String(url.clone())))
                .collect(),
        )
    }
}

/// All routes sharing one URL pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointGroup<'a> {
    pub pattern: &'a str,
    pub resource: &'a str,
    pub endpoint: Endpoint,
    pub routes: Vec<&'a Route>,
}

/// Immutable output of [`ResourceRouter::build`](crate::ResourceRouter::build).
///
/// Built once at startup and shared read-only between request handlers.
#[derive(Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    viewsets: HashMap<String, Arc<dyn ViewSet>>,
    root: Option<ApiRoot>,
}

impl RouteTable {
    pub(crate) fn new(
        routes: Vec<Route>,
        viewsets: HashMap<String, Arc<dyn ViewSet>>,
        root: Option<ApiRoot>,
    ) -> Self {
        Self {
            routes,
            viewsets,
            root,
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn root(&self) -> Option<&ApiRoot> {
        self.root.as_ref()
    }

    /// The viewset bound to `resource` (a registered prefix).
    pub fn viewset(&self, resource: &str) -> Option<&Arc<dyn ViewSet>> {
        self.viewsets.get(resource)
    }

    /// Routes grouped by URL pattern, in first-seen order.
    pub fn endpoints(&self) -> Vec<EndpointGroup<'_>> {
        let mut groups: Vec<EndpointGroup<'_>> = Vec::new();
        for route in &self.routes {
            match groups.iter_mut().find(|g| g.pattern == route.pattern) {
                Some(group) => group.routes.push(route),
                None => groups.push(EndpointGroup {
                    pattern: &route.pattern,
                    resource: &route.resource,
                    endpoint: route.endpoint(),
                    routes: vec![route],
                }),
            }
        }
        groups
    }

    /// Build a concrete path for a named route.
    ///
    /// Returns `None` when the name is unknown or a placeholder is left
    /// without a value.
    pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        let pattern = self
            .routes
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.pattern.as_str())
            .or_else(|| {
                self.root
                    .as_ref()
                    .filter(|root| root.name == name)
                    .map(|root| root.pattern.as_str())
            })?;

        let mut path = pattern.to_string();
        for (key, value) in params {
            path = path.replace(&format!("{{{key}}}"), value);
        }

        if path.contains('{') { None } else { Some(path) }
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
