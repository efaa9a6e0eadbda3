//! Route table and navigation.
//!
//! Each route carries declarative access metadata that only the
//! [`guard`] consumes. Unknown paths resolve to the not-found route, which
//! carries no metadata and is therefore always reachable.

pub mod guard;
pub mod navigator;

use tracing::debug;

pub use guard::{GuardDecision, SessionSnapshot, SessionView};
pub use navigator::{ChannelNavigator, Navigation, Navigator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Home,
    Login,
    Register,
    Dashboard,
    SymptomChecker,
    Chat,
    History,
    Profile,
    StaffDashboard,
    StaffEmergencies,
    StaffStudents,
    StaffPrescribe,
    StaffAdherence,
    StaffFollowups,
    StaffAnalytics,
    Medications,
    Followups,
    HealthDashboard,
    NotFound,
}

impl RouteName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Home => "home",
            RouteName::Login => "login",
            RouteName::Register => "register",
            RouteName::Dashboard => "dashboard",
            RouteName::SymptomChecker => "symptom-checker",
            RouteName::Chat => "chat",
            RouteName::History => "history",
            RouteName::Profile => "profile",
            RouteName::StaffDashboard => "staff-dashboard",
            RouteName::StaffEmergencies => "staff-emergencies",
            RouteName::StaffStudents => "staff-students",
            RouteName::StaffPrescribe => "staff-prescribe",
            RouteName::StaffAdherence => "staff-adherence",
            RouteName::StaffFollowups => "staff-followups",
            RouteName::StaffAnalytics => "staff-analytics",
            RouteName::Medications => "medications",
            RouteName::Followups => "followups",
            RouteName::HealthDashboard => "health-dashboard",
            RouteName::NotFound => "not-found",
        }
    }

    /// Canonical path of the route. The not-found route has no path of its
    /// own; navigating to it by name lands on `/404`.
    pub fn path(&self) -> &'static str {
        match self {
            RouteName::Home => "/",
            RouteName::Login => "/login",
            RouteName::Register => "/register",
            RouteName::Dashboard => "/dashboard",
            RouteName::SymptomChecker => "/symptom-checker",
            RouteName::Chat => "/chat",
            RouteName::History => "/history",
            RouteName::Profile => "/profile",
            RouteName::StaffDashboard => "/staff",
            RouteName::StaffEmergencies => "/staff/emergencies",
            RouteName::StaffStudents => "/staff/students",
            RouteName::StaffPrescribe => "/staff/prescribe",
            RouteName::StaffAdherence => "/staff/adherence",
            RouteName::StaffFollowups => "/staff/followups",
            RouteName::StaffAnalytics => "/staff/analytics",
            RouteName::Medications => "/medications",
            RouteName::Followups => "/followups",
            RouteName::HealthDashboard => "/health-dashboard",
            RouteName::NotFound => "/404",
        }
    }
}

/// Access-control flags attached to a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub guest_only: bool,
    pub requires_staff: bool,
    pub requires_student: bool,
}

impl RouteMeta {
    const PUBLIC: Self = Self {
        requires_auth: false,
        guest_only: false,
        requires_staff: false,
        requires_student: false,
    };

    const GUEST: Self = Self {
        guest_only: true,
        ..Self::PUBLIC
    };

    const AUTH: Self = Self {
        requires_auth: true,
        ..Self::PUBLIC
    };

    const STUDENT: Self = Self {
        requires_student: true,
        ..Self::AUTH
    };

    const STAFF: Self = Self {
        requires_staff: true,
        ..Self::AUTH
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: RouteName,
    pub path: &'static str,
    pub meta: RouteMeta,
}

impl Route {
    const fn new(name: RouteName, path: &'static str, meta: RouteMeta) -> Self {
        Self { name, path, meta }
    }
}

/// The portal's route table.
pub fn default_routes() -> Vec<Route> {
    use RouteName::*;

    vec![
        Route::new(Home, "/", RouteMeta::PUBLIC),
        Route::new(Login, "/login", RouteMeta::GUEST),
        Route::new(Register, "/register", RouteMeta::GUEST),
        Route::new(Dashboard, "/dashboard", RouteMeta::STUDENT),
        Route::new(SymptomChecker, "/symptom-checker", RouteMeta::STUDENT),
        Route::new(Chat, "/chat", RouteMeta::STUDENT),
        Route::new(History, "/history", RouteMeta::STUDENT),
        Route::new(Profile, "/profile", RouteMeta::AUTH),
        Route::new(StaffDashboard, "/staff", RouteMeta::STAFF),
        Route::new(StaffEmergencies, "/staff/emergencies", RouteMeta::STAFF),
        Route::new(StaffStudents, "/staff/students", RouteMeta::STAFF),
        Route::new(StaffPrescribe, "/staff/prescribe", RouteMeta::STAFF),
        Route::new(StaffAdherence, "/staff/adherence", RouteMeta::STAFF),
        Route::new(StaffFollowups, "/staff/followups", RouteMeta::STAFF),
        Route::new(StaffAnalytics, "/staff/analytics", RouteMeta::STAFF),
        Route::new(Medications, "/medications", RouteMeta::STUDENT),
        Route::new(Followups, "/followups", RouteMeta::STUDENT),
        Route::new(HealthDashboard, "/health-dashboard", RouteMeta::STUDENT),
    ]
}

pub struct Router {
    routes: Vec<Route>,
    not_found: Route,
}

impl Router {
    pub fn new() -> Self {
        Self::with_routes(default_routes())
    }

    pub fn with_routes(routes: Vec<Route>) -> Self {
        Self {
            routes,
            not_found: Route::new(RouteName::NotFound, "/:pathMatch(.*)*", RouteMeta::PUBLIC),
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Match a full path (query and fragment ignored, trailing slash
    /// optional) against the table.
    pub fn resolve(&self, full_path: &str) -> &Route {
        let path = normalize_path(full_path);
        self.routes
            .iter()
            .find(|route| route.path == path)
            .unwrap_or(&self.not_found)
    }

    /// Resolve `full_path` and run the guard against `session`.
    pub fn navigate(&self, full_path: &str, session: &dyn SessionView) -> GuardDecision {
        let route = self.resolve(full_path);
        let decision = guard::check(route, full_path, session);

        debug!(
            path = full_path,
            route = route.name.as_str(),
            allowed = decision.is_allowed(),
            "navigation evaluated"
        );

        decision
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_path(full_path: &str) -> &str {
    let end = full_path.find(['?', '#']).unwrap_or(full_path.len());
    let path = &full_path[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}
