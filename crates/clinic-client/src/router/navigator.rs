use reqwest::Url;
use tokio::sync::mpsc;
use tracing::debug;

use clinic_shared::constants::REDIRECT_QUERY_PARAM;

use super::RouteName;

/// A client-side navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: RouteName,
    /// Path to return to after signing in.
    pub redirect: Option<String>,
}

impl Navigation {
    pub fn to(route: RouteName) -> Self {
        Self {
            route,
            redirect: None,
        }
    }

    pub fn login_with_return(full_path: &str) -> Self {
        Self {
            route: RouteName::Login,
            redirect: Some(full_path.to_string()),
        }
    }

    /// Path plus query string, e.g. `/login?redirect=%2Fchat`.
    pub fn location(&self) -> String {
        let path = self.route.path();
        let Some(target) = &self.redirect else {
            return path.to_string();
        };

        let Ok(mut url) = Url::parse("portal://app") else {
            return path.to_string();
        };
        url.set_path(path);
        url.query_pairs_mut()
            .append_pair(REDIRECT_QUERY_PARAM, target);

        match url.query() {
            Some(query) => format!("{path}?{query}"),
            None => path.to_string(),
        }
    }
}

/// Sink for navigations issued outside the guard (e.g. the 401 handler).
pub trait Navigator: Send + Sync {
    fn navigate(&self, navigation: Navigation);
}

/// [`Navigator`] that forwards every navigation over an unbounded channel to
/// whoever drives the UI.
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<Navigation>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Navigation>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, navigation: Navigation) {
        if self.tx.send(navigation).is_err() {
            debug!("Navigation receiver dropped");
        }
    }
}
