//! Resource registration and route table construction.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::action::{Action, Endpoint};
use crate::error::{RouterError, RouterResult};
use crate::table::{ApiRoot, Route, RouteTable};
use crate::viewset::ViewSet;

/// Router-wide options.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Append `/` to generated patterns (`/product/` rather than `/product`).
    pub trailing_slash: bool,
    /// Emit an [`ApiRoot`] at `/` listing every resource.
    pub include_root_view: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            trailing_slash: true,
            include_root_view: true,
        }
    }
}

/// A registered (prefix, basename, viewset) triple.
#[derive(Clone)]
pub struct ResourceBinding {
    prefix: String,
    basename: String,
    viewset: Arc<dyn ViewSet>,
}

impl ResourceBinding {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    pub fn viewset(&self) -> &Arc<dyn ViewSet> {
        &self.viewset
    }
}

impl fmt::Debug for ResourceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceBinding")
            .field("prefix", &self.prefix)
            .field("basename", &self.basename)
            .field("capabilities", &self.viewset.capabilities())
            .finish()
    }
}

/// Collects resource bindings and derives the route table from them.
///
/// ```
/// use std::sync::Arc;
/// use factory_routers::{Capabilities, ResourceRouter, ViewSet};
///
/// struct Widgets;
///
/// impl ViewSet for Widgets {
///     fn capabilities(&self) -> Capabilities {
///         Capabilities::read_only()
///     }
/// }
///
/// let mut router = ResourceRouter::new();
/// router.register("widget", Arc::new(Widgets)).unwrap();
///
/// let table = router.build();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.reverse("widget-detail", &[("id", "3")]).as_deref(), Some("/widget/3/"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResourceRouter {
    config: RouterConfig,
    bindings: Vec<ResourceBinding>,
}

impl ResourceRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            config,
            bindings: Vec::new(),
        }
    }

    pub fn config(&self) -> RouterConfig {
        self.config
    }

    pub fn bindings(&self) -> &[ResourceBinding] {
        &self.bindings
    }

    /// Bind `viewset` under `prefix`, using the prefix as basename.
    pub fn register(&mut self, prefix: &str, viewset: Arc<dyn ViewSet>) -> RouterResult<()> {
        let prefix = normalize_prefix(prefix)?;
        let basename = prefix.clone();
        self.insert(prefix, basename, viewset)
    }

    /// Bind `viewset` under `prefix` with an explicit basename for route names.
    pub fn register_with_basename(
        &mut self,
        prefix: &str,
        basename: &str,
        viewset: Arc<dyn ViewSet>,
    ) -> RouterResult<()> {
        let prefix = normalize_prefix(prefix)?;
        let basename = basename.trim();
        if basename.is_empty() {
            return Err(RouterError::InvalidPrefix(prefix));
        }
        self.insert(prefix, basename.to_string(), viewset)
    }

    fn insert(&mut self, prefix: String, basename: String, viewset: Arc<dyn ViewSet>) -> RouterResult<()> {
        if self.bindings.iter().any(|b| b.prefix == prefix) {
            return Err(RouterError::DuplicateName(prefix));
        }
        if self.bindings.iter().any(|b| b.basename == basename) {
            return Err(RouterError::DuplicateBasename(basename));
        }
        if !is_placeholder_name(viewset.lookup_field()) {
            return Err(RouterError::InvalidLookup {
                prefix,
                lookup: viewset.lookup_field().to_string(),
            });
        }

        tracing::debug!(
            prefix = %prefix,
            basename = %basename,
            capabilities = ?viewset.capabilities(),
            "registered resource"
        );

        self.bindings.push(ResourceBinding {
            prefix,
            basename,
            viewset,
        });
        Ok(())
    }

    /// Derive the route table.
    ///
    /// Pure: the same registrations always produce the same table, in
    /// registration order, actions ordered as [`Action::ALL`].
    pub fn build(&self) -> RouteTable {
        let mut routes = Vec::new();
        let mut viewsets = HashMap::with_capacity(self.bindings.len());

        for binding in &self.bindings {
            let capabilities = binding.viewset.capabilities();
            let lookup = binding.viewset.lookup_field();

            for action in capabilities.actions() {
                let endpoint = action.endpoint();
                routes.push(Route {
                    method: action.method(),
                    pattern: self.pattern(&binding.prefix, endpoint, lookup),
                    action,
                    name: route_name(&binding.basename, endpoint),
                    resource: binding.prefix.clone(),
                });
            }

            viewsets.insert(binding.prefix.clone(), Arc::clone(&binding.viewset));
        }

        let root = self.config.include_root_view.then(|| ApiRoot {
            pattern: "/".to_string(),
            name: "api-root".to_string(),
            entries: self
                .bindings
                .iter()
                .map(|b| (b.prefix.clone(), self.pattern(&b.prefix, Endpoint::Collection, "")))
                .collect(),
        });

        tracing::debug!(
            resources = self.bindings.len(),
            routes = routes.len(),
            root_view = root.is_some(),
            "built route table"
        );

        RouteTable::new(routes, viewsets, root)
    }

    fn pattern(&self, prefix: &str, endpoint: Endpoint, lookup: &str) -> String {
        let mut pattern = match endpoint {
            Endpoint::Collection => format!("/{prefix}"),
            Endpoint::Item => format!("/{prefix}/{{{lookup}}}"),
        };
        if self.config.trailing_slash {
            pattern.push('/');
        }
        pattern
    }
}

fn route_name(basename: &str, endpoint: Endpoint) -> String {
    match endpoint {
        Endpoint::Collection => format!("{basename}-list"),
        Endpoint::Item => format!("{basename}-detail"),
    }
}

/// Characters that would turn a literal segment into a pattern, query or fragment.
const RESERVED: [char; 6] = ['{', '}', ':', '*', '?', '#'];

fn normalize_prefix(prefix: &str) -> RouterResult<String> {
    let trimmed = prefix.trim_matches('/');
    let valid = !trimmed.is_empty()
        && !trimmed.split('/').any(str::is_empty)
        && !trimmed
            .chars()
            .any(|c| RESERVED.contains(&c) || c.is_whitespace());

    if valid {
        Ok(trimmed.to_string())
    } else {
        Err(RouterError::InvalidPrefix(prefix.to_string()))
    }
}

fn is_placeholder_name(lookup: &str) -> bool {
    !lookup.is_empty() && lookup.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
