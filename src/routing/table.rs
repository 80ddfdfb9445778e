//! Declarative route table for the CMS "global" single type.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// HTTP verbs a route descriptor may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
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

/// A single endpoint: method and path bound to a named handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteDescriptor {
    pub method: HttpMethod,
    pub path: &'static str,
    /// `<controller>.<action>`, resolved by the handler registry.
    pub handler: &'static str,
    /// Whether the route requires the admin bearer token.
    pub auth: bool,
}

/// Routes for the global single type. Both are public.
pub static GLOBAL_ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor {
        method: HttpMethod::Get,
        path: "/global",
        handler: "global.find",
        auth: false,
    },
    RouteDescriptor {
        method: HttpMethod::Post,
        path: "/global/sync",
        handler: "global.sync",
        auth: false,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteTableError {
    #[error("path '{0}' must start with '/'")]
    RelativePath(&'static str),

    #[error("handler '{handler}' for {path} is not of the form <controller>.<action>")]
    MalformedHandler {
        path: &'static str,
        handler: &'static str,
    },

    #[error("{method} {path} is declared more than once")]
    Duplicate {
        method: HttpMethod,
        path: &'static str,
    },

    #[error("no handler registered for '{0}'")]
    UnknownHandler(&'static str),
}

/// Check a route table for well-formedness, collecting every problem.
pub fn check_table(routes: &[RouteDescriptor]) -> Result<(), Vec<RouteTableError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for route in routes {
        if !route.path.starts_with('/') {
            errors.push(RouteTableError::RelativePath(route.path));
        }

        let well_formed = route
            .handler
            .split_once('.')
            .is_some_and(|(controller, action)| {
                !controller.is_empty() && !action.is_empty() && !action.contains('.')
            });
        if !well_formed {
            errors.push(RouteTableError::MalformedHandler {
                path: route.path,
                handler: route.handler,
            });
        }

        if !seen.insert((route.method, route.path)) {
            errors.push(RouteTableError::Duplicate {
                method: route.method,
                path: route.path,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
