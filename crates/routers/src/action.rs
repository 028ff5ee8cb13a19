//! Viewset actions, their HTTP verbs, and capability sets.

use core::fmt;

use bitflags::bitflags;

/// HTTP verbs used by resource routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two URL patterns of a resource an action lives on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `/{prefix}/`
    Collection,
    /// `/{prefix}/{id}/`
    Item,
}

/// A standard viewset action.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    List,
    Create,
    Retrieve,
    Update,
    PartialUpdate,
    Destroy,
}

impl Action {
    /// Every action, in route table order.
    pub const ALL: [Action; 6] = [
        Action::List,
        Action::Create,
        Action::Retrieve,
        Action::Update,
        Action::PartialUpdate,
        Action::Destroy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Create => "create",
            Action::Retrieve => "retrieve",
            Action::Update => "update",
            Action::PartialUpdate => "partial_update",
            Action::Destroy => "destroy",
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            Action::List | Action::Retrieve => HttpMethod::Get,
            Action::Create => HttpMethod::Post,
            Action::Update => HttpMethod::Put,
            Action::PartialUpdate => HttpMethod::Patch,
            Action::Destroy => HttpMethod::Delete,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            Action::List | Action::Create => Endpoint::Collection,
            _ => Endpoint::Item,
        }
    }

    /// The capability flag standing for this action.
    pub const fn flag(self) -> Capabilities {
        match self {
            Action::List => Capabilities::LIST,
            Action::Create => Capabilities::CREATE,
            Action::Retrieve => Capabilities::RETRIEVE,
            Action::Update => Capabilities::UPDATE,
            Action::PartialUpdate => Capabilities::PARTIAL_UPDATE,
            Action::Destroy => Capabilities::DESTROY,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// The set of actions a viewset implements.
    ///
    /// Declared explicitly by each viewset; the router generates one route
    /// per member and nothing for the rest.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        const LIST = 1 << 0;
        const CREATE = 1 << 1;
        const RETRIEVE = 1 << 2;
        const UPDATE = 1 << 3;
        const PARTIAL_UPDATE = 1 << 4;
        const DESTROY = 1 << 5;
    }
}

impl Capabilities {
    /// `list` + `retrieve`.
    pub const fn read_only() -> Self {
        Self::LIST.union(Self::RETRIEVE)
    }

    pub const fn with(self, action: Action) -> Self {
        self.union(action.flag())
    }

    pub const fn without(self, action: Action) -> Self {
        self.difference(action.flag())
    }

    pub const fn supports(&self, action: Action) -> bool {
        self.contains(action.flag())
    }

    /// Members in [`Action::ALL`] order.
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(|a| self.supports(*a))
    }

    /// Whether any member lives on the given endpoint.
    pub fn serves(&self, endpoint: Endpoint) -> bool {
        self.actions().any(|a| a.endpoint() == endpoint)
    }
}

impl FromIterator<Action> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}
