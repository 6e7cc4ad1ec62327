use dioxus::prelude::*;
use dioxus::router::Navigator;

use crate::app::Route;
use crate::domain::{AppState, Role, User};
use crate::infra::identity::{DemoIdentity, IdentityMode, SignUpRequest, DEMO_PASSWORD};
use crate::infra::services::Services;
use crate::ui::components::toast::{push_toast, ToastKind, Toasts};
use crate::ui::theme;

/// Dashboard a freshly signed-in user lands on.
pub fn home_route(role: Role) -> Route {
    match role {
        Role::User => Route::UserDashboard {},
        Role::Admin => Route::AdminDashboard {},
        Role::Warehouse => Route::WarehouseDashboard {},
    }
}

fn finish_sign_in(mut state: Signal<AppState>, toasts: Toasts, nav: Navigator, user: User) {
    let route = home_route(user.role);
    push_toast(toasts, ToastKind::Success, format!("Welcome, {}!", user.full_name));
    state.with_mut(|st| st.sign_in(user));
    nav.push(route);
}

#[component]
pub fn SignInPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let services = use_context::<Services>();
    let toasts = use_context::<Toasts>();
    let nav = use_navigator();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);
    let demo = services.identity.mode() == IdentityMode::Demo;

    let submit = move |_| {
        if busy() {
            return;
        }
        let identity = services.identity.clone();
        let (email, password) = (email(), password());
        busy.set(true);
        error.set(None);
        spawn(async move {
            match identity.sign_in(&email, &password).await {
                Ok(user) => finish_sign_in(state, toasts, nav, user),
                Err(err) => error.set(Some(err.to_string())),
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "mx-auto max-w-md {theme::panel_border(None)} p-8 space-y-5",
            h2 { class: "text-2xl font-semibold", "Sign in to Tech Trader" }
            label { class: "block space-y-1",
                span { class: "{theme::LABEL}", "Email" }
                input {
                    class: "{theme::input_class(None)}",
                    r#type: "email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
            }
            label { class: "block space-y-1",
                span { class: "{theme::LABEL}", "Password" }
                input {
                    class: "{theme::input_class(None)}",
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
            }
            if let Some(message) = error() {
                p { class: "text-sm text-rose-300", "{message}" }
            }
            button {
                class: "w-full {theme::btn_primary(None)}",
                disabled: busy(),
                onclick: submit,
                if busy() { "Signing in…" } else { "Sign In" }
            }
            p { class: "text-sm {theme::TEXT_MUTED}",
                "No account yet? "
                button {
                    class: "{theme::text_primary(None)} hover:underline",
                    onclick: move |_| { nav.push(Route::SignUp {}); },
                    "Create one"
                }
            }
            if demo {
                div { class: "rounded-lg border border-slate-800 p-3 text-xs {theme::TEXT_MUTED} space-y-1",
                    p { "Demo mode: no backend is configured. Use password \"{DEMO_PASSWORD}\" with:" }
                    for account in DemoIdentity::demo_emails() {
                        button {
                            class: "block {theme::text_primary(None)} hover:underline",
                            onclick: move |_| {
                                email.set(account.to_string());
                                password.set(DEMO_PASSWORD.to_string());
                            },
                            "{account}"
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn SignUpPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let services = use_context::<Services>();
    let toasts = use_context::<Toasts>();
    let nav = use_navigator();

    let mut full_name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let submit = move |_| {
        if busy() {
            return;
        }
        if password() != confirm() {
            error.set(Some("Passwords do not match".to_string()));
            return;
        }
        let request = SignUpRequest {
            full_name: full_name(),
            email: email(),
            password: password(),
        };
        if let Err(err) = request.validate() {
            error.set(Some(err.to_string()));
            return;
        }

        let identity = services.identity.clone();
        busy.set(true);
        error.set(None);
        spawn(async move {
            match identity.sign_up(request).await {
                Ok(user) => finish_sign_in(state, toasts, nav, user),
                Err(err) => error.set(Some(err.to_string())),
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "mx-auto max-w-md {theme::panel_border(None)} p-8 space-y-5",
            h2 { class: "text-2xl font-semibold", "Create your account" }
            TextField { label: "Full name", kind: "text", value: full_name }
            TextField { label: "Email", kind: "email", value: email }
            TextField { label: "Password", kind: "password", value: password }
            TextField { label: "Confirm password", kind: "password", value: confirm }
            if let Some(message) = error() {
                p { class: "text-sm text-rose-300", "{message}" }
            }
            button {
                class: "w-full {theme::btn_primary(None)}",
                disabled: busy(),
                onclick: submit,
                if busy() { "Creating account…" } else { "Sign Up" }
            }
            p { class: "text-sm {theme::TEXT_MUTED}",
                "Already registered? "
                button {
                    class: "{theme::text_primary(None)} hover:underline",
                    onclick: move |_| { nav.push(Route::SignIn {}); },
                    "Sign in"
                }
            }
        }
    }
}

#[component]
fn TextField(label: &'static str, kind: &'static str, value: Signal<String>) -> Element {
    let mut value = value;
    rsx! {
        label { class: "block space-y-1",
            span { class: "{theme::LABEL}", "{label}" }
            input {
                class: "{theme::input_class(None)}",
                r#type: kind,
                value: "{value}",
                oninput: move |evt| value.set(evt.value()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_role_lands_on_its_own_dashboard() {
        assert!(matches!(home_route(Role::User), Route::UserDashboard {}));
        assert!(matches!(home_route(Role::Admin), Route::AdminDashboard {}));
        assert!(matches!(home_route(Role::Warehouse), Route::WarehouseDashboard {}));
    }

    #[test]
    fn sign_in_completion_takes_the_router_navigator() {
        let finish: fn(Signal<AppState>, Toasts, Navigator, User) = finish_sign_in;
        let _ = finish;
    }
}
