//! Home view: the signed-in user's dashboard heading.

use careerkey_core::roles::Role;

use crate::backend::Backend;
use crate::session::SessionContext;

/// Role label shown when the profile could not be resolved.
const UNKNOWN_ROLE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeView {
    /// No session; the caller should send the user to sign-in.
    Unauthenticated,
    Ready(Dashboard),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dashboard {
    /// `None` when resolution failed.
    pub role: Option<Role>,
    pub display_name: Option<String>,
    /// Non-fatal warning or fatal resolution message, shown as a note.
    pub notice: Option<String>,
}

impl HomeView {
    /// Resolve the current identity's profile and build the dashboard.
    pub async fn load<B>(session: &SessionContext, backend: &B) -> Self
    where
        B: Backend + ?Sized,
    {
        let Ok(token) = session.access_token() else {
            return HomeView::Unauthenticated;
        };

        match backend.resolve_profile(&token).await {
            Ok(profile) => {
                if let Some(warning) = &profile.warning {
                    tracing::warn!(warning = %warning, "Profile resolved with warning");
                }
                HomeView::Ready(Dashboard {
                    role: Some(profile.role),
                    display_name: profile.display_name,
                    notice: profile.warning,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile resolution failed");
                HomeView::Ready(Dashboard {
                    role: None,
                    display_name: None,
                    notice: Some(e.to_string()),
                })
            }
        }
    }
}

impl Dashboard {
    /// `Welcome` or `Welcome, {name}`.
    pub fn greeting(&self) -> String {
        match &self.display_name {
            Some(name) => format!("Welcome, {name}"),
            None => "Welcome".to_string(),
        }
    }

    /// Unknown roles get the student dashboard.
    pub fn title(&self) -> &'static str {
        self.role.unwrap_or_default().dashboard_title()
    }

    pub fn subtitle(&self) -> &'static str {
        self.role.unwrap_or_default().dashboard_subtitle()
    }

    pub fn role_label(&self) -> &'static str {
        self.role.map(Role::as_str).unwrap_or(UNKNOWN_ROLE)
    }
}
