//! Pre-navigation access control.
//!
//! Rules are evaluated in order and the first one that matches decides:
//!
//! 1. `requires_auth` without a session → login, remembering the target.
//! 2. `guest_only` → signed-in users go to their landing page; guests are let
//!    through without consulting the remaining rules.
//! 3. `requires_staff` for a non-staff role → student dashboard.
//! 4. `requires_student` for a non-student role → staff dashboard.
//! 5. Allow.

use clinic_shared::Role;

use super::navigator::Navigation;
use super::{Route, RouteName};

/// What the guard needs to know about the current session.
pub trait SessionView {
    fn is_authenticated(&self) -> bool;

    fn role(&self) -> Option<Role>;
}

/// Plain copy of a session's guard-relevant state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub authenticated: bool,
    pub role: Option<Role>,
}

impl SessionSnapshot {
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn signed_in(role: Role) -> Self {
        Self {
            authenticated: true,
            role: Some(role),
        }
    }
}

impl SessionView for SessionSnapshot {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn role(&self) -> Option<Role> {
        self.role
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Navigation),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Evaluate the rule chain for a navigation to `route` (requested as
/// `full_path`, query string included).
pub fn check(route: &Route, full_path: &str, session: &dyn SessionView) -> GuardDecision {
    let meta = route.meta;
    let authenticated = session.is_authenticated();
    let role = session.role();

    if meta.requires_auth && !authenticated {
        return GuardDecision::Redirect(Navigation::login_with_return(full_path));
    }

    if meta.guest_only {
        if !authenticated {
            return GuardDecision::Allow;
        }
        let landing = if role == Some(Role::Staff) {
            RouteName::StaffDashboard
        } else {
            RouteName::Dashboard
        };
        return GuardDecision::Redirect(Navigation::to(landing));
    }

    if meta.requires_staff && role != Some(Role::Staff) {
        return GuardDecision::Redirect(Navigation::to(RouteName::Dashboard));
    }

    if meta.requires_student && role != Some(Role::Student) {
        return GuardDecision::Redirect(Navigation::to(RouteName::StaffDashboard));
    }

    GuardDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::RouteMeta;

    fn route(meta: RouteMeta) -> Route {
        Route {
            name: RouteName::Home,
            path: "/x",
            meta,
        }
    }

    #[test]
    fn guest_only_route_ignores_role_metadata_for_guests() {
        let route = route(RouteMeta {
            guest_only: true,
            requires_staff: true,
            requires_student: true,
            ..Default::default()
        });
        assert_eq!(
            check(&route, "/x", &SessionSnapshot::guest()),
            GuardDecision::Allow
        );
    }

    #[test]
    fn staff_on_guest_only_route_lands_on_staff_dashboard() {
        let route = route(RouteMeta {
            guest_only: true,
            requires_student: true,
            ..Default::default()
        });
        assert_eq!(
            check(&route, "/x", &SessionSnapshot::signed_in(Role::Staff)),
            GuardDecision::Redirect(Navigation::to(RouteName::StaffDashboard))
        );
    }

    #[test]
    fn clinic_staff_is_not_staff_for_the_guard() {
        let route = route(RouteMeta {
            requires_auth: true,
            requires_staff: true,
            ..Default::default()
        });
        assert_eq!(
            check(&route, "/x", &SessionSnapshot::signed_in(Role::ClinicStaff)),
            GuardDecision::Redirect(Navigation::to(RouteName::Dashboard))
        );
    }

    #[test]
    fn auth_rule_precedes_role_rules() {
        let route = route(RouteMeta {
            requires_auth: true,
            requires_staff: true,
            ..Default::default()
        });
        assert_eq!(
            check(&route, "/x?y=1", &SessionSnapshot::guest()),
            GuardDecision::Redirect(Navigation::login_with_return("/x?y=1"))
        );
    }
}
