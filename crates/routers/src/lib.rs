//! Resource router.
//!
//! Turns named viewsets into a route table following the collection/item
//! convention:
//!
//! - `/{prefix}/` carries `list` (GET) and `create` (POST)
//! - `/{prefix}/{id}/` carries `retrieve` (GET), `update` (PUT),
//!   `partial_update` (PATCH) and `destroy` (DELETE)
//!
//! Only the actions a viewset declares in its [`Capabilities`] get a route.
//! Matching requests against the table is left to the HTTP layer.

pub mod action;
pub mod error;
pub mod router;
pub mod table;
pub mod viewset;

pub use action::{Action, Capabilities, Endpoint, HttpMethod};
pub use error::{RouterError, RouterResult};
pub use router::{ResourceBinding, ResourceRouter, RouterConfig};
pub use table::{ApiRoot, EndpointGroup, Route, RouteTable};
pub use viewset::{ActionRequest, ViewError, ViewResult, ViewSet, dispatch};
