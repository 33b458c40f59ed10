use serde::Deserialize;

use crate::model::{RoleRef, SystemRole};
use crate::roles::RoleState;

/// Declarative gate description, as written by the page that needs it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GateSpec {
    /// Role names; system role names resolve to system roles, anything
    /// else to a custom role.
    pub required_roles: Vec<String>,
    pub required_system_roles: Vec<SystemRole>,
    /// Require every role instead of any one.
    pub require_all: bool,
}

/// Shows protected content only to users holding the required roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    required: Vec<RoleRef>,
    require_all: bool,
}

impl Gate {
    /// Resolve every role name in `spec` once, up front.
    pub fn new(spec: &GateSpec) -> Self {
        let mut required: Vec<RoleRef> = Vec::new();
        let refs = spec
            .required_system_roles
            .iter()
            .map(|r| RoleRef::System(*r))
            .chain(spec.required_roles.iter().map(|name| RoleRef::resolve(name)));
        for role in refs {
            if !required.contains(&role) {
                required.push(role);
            }
        }
        Self {
            required,
            require_all: spec.require_all,
        }
    }

    /// Passes if the user holds any of `roles`.
    pub fn any_of(roles: impl IntoIterator<Item = RoleRef>) -> Self {
        Self {
            required: roles.into_iter().collect(),
            require_all: false,
        }
    }

    /// Passes if the user holds all of `roles`.
    pub fn all_of(roles: impl IntoIterator<Item = RoleRef>) -> Self {
        Self {
            required: roles.into_iter().collect(),
            require_all: true,
        }
    }

    pub fn required(&self) -> &[RoleRef] {
        &self.required
    }

    /// A gate with no requirements always passes, even before roles load.
    /// Otherwise roles must be loaded and the OR (or AND) must hold.
    pub fn allows(&self, state: &RoleState) -> bool {
        if self.required.is_empty() {
            return true;
        }
        let Some(roles) = state.roles() else {
            return false;
        };
        if self.require_all {
            self.required.iter().all(|r| roles.has(r))
        } else {
            self.required.iter().any(|r| roles.has(r))
        }
    }

    /// `content` when allowed, otherwise `fallback` (nothing by default).
    pub fn render<T>(&self, state: &RoleState, content: T, fallback: Option<T>) -> Option<T> {
        if self.allows(state) {
            Some(content)
        } else {
            fallback
        }
    }
}

impl From<GateSpec> for Gate {
    fn from(spec: GateSpec) -> Self {
        Gate::new(&spec)
    }
}
