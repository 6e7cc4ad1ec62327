use std::sync::Arc;

use dioxus::{prelude::*, signals::Signal};

use crate::{
    domain::{AppState, Capability},
    infra::{
        backend::BackendClient,
        identity::{BackendIdentity, DemoIdentity, IdentityProvider},
        services::Services,
        session_store::SessionStore,
    },
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        guard::RouteGuard,
        pages::{
            AdminDashboardPage, LandingPage, SignInPage, SignUpPage, UserDashboardPage,
            WarehouseDashboardPage,
        },
        shell::Shell,
    },
    util::{
        assets,
        config::AppConfig,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Landing {},
    #[route("/user")]
    UserDashboard {},
    #[route("/admin")]
    AdminDashboard {},
    #[route("/warehouse")]
    WarehouseDashboard {},
    #[route("/login")]
    SignIn {},
    #[route("/register")]
    SignUp {},
}

/// Picks the hosted backend when configured, the demo accounts otherwise.
pub fn build_services(config: &AppConfig) -> Services {
    let store = SessionStore::default_location();
    let client = match &config.backend {
        Some(backend) => match BackendClient::new(backend) {
            Ok(client) => {
                tracing::info!(url = %backend.url, "using hosted backend");
                Some(client)
            }
            Err(err) => {
                tracing::error!("failed to build backend client, using demo accounts: {err}");
                None
            }
        },
        None => {
            tracing::info!("no backend configured, using demo accounts");
            None
        }
    };

    match client {
        Some(client) => {
            let identity: Arc<dyn IdentityProvider> =
                Arc::new(BackendIdentity::new(client.clone(), store));
            Services::seeded(identity).with_catalog_source(client)
        }
        None => Services::seeded(Arc::new(DemoIdentity::new(store))),
    }
}

#[component]
pub fn App() -> Element {
    let state = use_signal(AppState::default);
    use_hook(move || {
        let mut state = state;
        if let Some(saved) = load_persisted_state() {
            state.with_mut(|st| st.apply_persisted(saved));
        }
    });
    use_context_provider(|| state);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    let services = use_context::<Services>();
    let _session = use_resource({
        let identity = services.identity.clone();
        move || {
            let identity = identity.clone();
            async move { resolve_session(identity, state, toasts).await }
        }
    });
    use_future(move || {
        let services = services.clone();
        async move {
            if let Err(err) = services.sync_catalog().await {
                push_toast(
                    toasts,
                    ToastKind::Warning,
                    format!("Using the built-in catalog: {err}"),
                );
            }
        }
    });

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

async fn resolve_session(
    identity: Arc<dyn IdentityProvider>,
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
) {
    match identity.restore().await {
        Ok(Some(user)) => {
            tracing::info!(email = %user.email, role = user.role.label(), "restored session");
            state.with_mut(|st| st.sign_in(user));
        }
        Ok(None) => state.with_mut(|st| st.sign_out()),
        Err(err) => {
            push_toast(
                toasts,
                ToastKind::Error,
                format!("Could not restore your session: {err}"),
            );
            state.with_mut(|st| st.sign_out());
        }
    }
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        tracing::warn!("failed to persist user state: {err}");
    }
}

#[component]
pub fn Landing() -> Element {
    rsx! { Shell { LandingPage {} } }
}

#[component]
pub fn UserDashboard() -> Element {
    rsx! {
        Shell {
            RouteGuard { capability: Capability::User, UserDashboardPage {} }
        }
    }
}

#[component]
pub fn AdminDashboard() -> Element {
    rsx! {
        Shell {
            RouteGuard { capability: Capability::Admin, AdminDashboardPage {} }
        }
    }
}

#[component]
pub fn WarehouseDashboard() -> Element {
    rsx! {
        Shell {
            RouteGuard { capability: Capability::Warehouse, WarehouseDashboardPage {} }
        }
    }
}

#[component]
pub fn SignIn() -> Element {
    rsx! { Shell { SignInPage {} } }
}

#[component]
pub fn SignUp() -> Element {
    rsx! { Shell { SignUpPage {} } }
}
