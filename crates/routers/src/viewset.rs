//! Viewset contract and action dispatch.

use serde_json::Value;
use thiserror::Error;

use factory_core::DomainError;

use crate::action::{Action, Capabilities, Endpoint};

pub type ViewResult<T> = Result<T, ViewError>;

/// Failure raised by a viewset action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("not found")]
    NotFound,

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("validation failed: {0}")]
    Validation(String),

    /// The viewset does not declare this action.
    #[error("action `{0}` is not allowed")]
    ActionNotAllowed(Action),

    /// An item action was dispatched without a lookup value.
    #[error("action `{0}` requires a lookup value")]
    MissingLookup(Action),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for ViewError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ViewError::Validation(msg),
            DomainError::InvalidId(msg) => ViewError::InvalidId(msg),
            DomainError::NotFound => ViewError::NotFound,
        }
    }
}

/// A resource handler.
///
/// `capabilities` is the source of truth for routing: the router emits a
/// route for each declared action and the dispatcher refuses the rest.
/// Action methods default to [`ViewError::ActionNotAllowed`], so a viewset
/// only overrides what it declares.
pub trait ViewSet: Send + Sync {
    fn capabilities(&self) -> Capabilities;

    /// Name of the item placeholder in `/{prefix}/{lookup}/`.
    fn lookup_field(&self) -> &str {
        "id"
    }

    fn list(&self) -> ViewResult<Value> {
        Err(ViewError::ActionNotAllowed(Action::List))
    }

    fn create(&self, _body: Value) -> ViewResult<Value> {
        Err(ViewError::ActionNotAllowed(Action::Create))
    }

    fn retrieve(&self, _lookup: &str) -> ViewResult<Value> {
        Err(ViewError::ActionNotAllowed(Action::Retrieve))
    }

    fn update(&self, _lookup: &str, _body: Value) -> ViewResult<Value> {
        Err(ViewError::ActionNotAllowed(Action::Update))
    }

    fn partial_update(&self, _lookup: &str, _body: Value) -> ViewResult<Value> {
        Err(ViewError::ActionNotAllowed(Action::PartialUpdate))
    }

    /// Removes the addressed record. Produces no body.
    fn destroy(&self, _lookup: &str) -> ViewResult<()> {
        Err(ViewError::ActionNotAllowed(Action::Destroy))
    }
}

/// Inputs of a single action call, as extracted by the HTTP layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionRequest {
    pub lookup: Option<String>,
    pub body: Value,
}

impl ActionRequest {
    pub fn collection() -> Self {
        Self::default()
    }

    pub fn item(lookup: impl Into<String>) -> Self {
        Self {
            lookup: Some(lookup.into()),
            body: Value::Null,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }
}

/// Route an action to the viewset method implementing it.
///
/// Returns `Ok(None)` for `destroy`, which has no response body.
pub fn dispatch(viewset: &dyn ViewSet, action: Action, request: ActionRequest) -> ViewResult<Option<Value>> {
    if !viewset.capabilities().supports(action) {
        return Err(ViewError::ActionNotAllowed(action));
    }

    let ActionRequest { lookup, body } = request;
    let lookup = match action.endpoint() {
        Endpoint::Collection => None,
        Endpoint::Item => Some(lookup.ok_or(ViewError::MissingLookup(action))?),
    };

    match (action, lookup.as_deref()) {
        (Action::List, _) => viewset.list().map(Some),
        (Action::Create, _) => viewset.create(body).map(Some),
        (Action::Retrieve, Some(id)) => viewset.retrieve(id).map(Some),
        (Action::Update, Some(id)) => viewset.update(id, body).map(Some),
        (Action::PartialUpdate, Some(id)) => viewset.partial_update(id, body).map(Some),
        (Action::Destroy, Some(id)) => viewset.destroy(id).map(|()| None),
        (_, None) => Err(ViewError::MissingLookup(action)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    impl ViewSet for Echo {
        fn capabilities(&self) -> Capabilities {
            Capabilities::read_only().with(Action::Destroy)
        }

        fn list(&self) -> ViewResult<Value> {
            Ok(json!([]))
        }

        fn retrieve(&self, lookup: &str) -> ViewResult<Value> {
            Ok(json!({ "id": lookup }))
        }

        fn destroy(&self, _lookup: &str) -> ViewResult<()> {
            Ok(())
        }
    }

    #[test]
    fn dispatches_declared_actions() {
        assert_eq!(
            dispatch(&Echo, Action::List, ActionRequest::collection()).unwrap(),
            Some(json!([]))
        );
        assert_eq!(
            dispatch(&Echo, Action::Retrieve, ActionRequest::item("7")).unwrap(),
            Some(json!({ "id": "7" }))
        );
        assert_eq!(dispatch(&Echo, Action::Destroy, ActionRequest::item("7")).unwrap(), None);
    }

    #[test]
    fn refuses_undeclared_actions() {
        let err = dispatch(&Echo, Action::Create, ActionRequest::collection().with_body(json!({})))
            .unwrap_err();
        assert_eq!(err, ViewError::ActionNotAllowed(Action::Create));
    }

    #[test]
    fn item_actions_need_a_lookup() {
        let err = dispatch(&Echo, Action::Retrieve, ActionRequest::collection()).unwrap_err();
        assert_eq!(err, ViewError::MissingLookup(Action::Retrieve));
    }

    #[test]
    fn domain_errors_map_onto_view_errors() {
        assert_eq!(ViewError::from(DomainError::NotFound), ViewError::NotFound);
        assert_eq!(
            ViewError::from(DomainError::validation("name is required")),
            ViewError::Validation("name is required".to_string())
        );
    }
}
