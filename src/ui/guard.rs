use dioxus::prelude::*;

use crate::app::Route;
use crate::domain::{evaluate, AppState, Capability, GuardDecision, Redirect};

/// Renders `children` only once the session satisfies `capability`.
///
/// While the identity is still resolving a spinner is shown. Signed-out users
/// are sent to sign-in; signed-in users without the role go to the landing page.
#[component]
pub fn RouteGuard(capability: Capability, children: Element) -> Element {
    let state = use_context::<Signal<AppState>>();
    let nav = use_navigator();
    let decision = state.with(|st| evaluate(capability, &st.session));

    use_effect(move || {
        let decision = state.with(|st| evaluate(capability, &st.session));
        if let GuardDecision::Redirect(target) = decision {
            tracing::debug!(?capability, ?target, "route guard redirect");
            match target {
                Redirect::SignIn => nav.replace(Route::SignIn {}),
                Redirect::Landing => nav.replace(Route::Landing {}),
            };
        }
    });

    match decision {
        GuardDecision::Pending => rsx! {
            div {
                class: "flex min-h-[50vh] items-center justify-center",
                div { class: "spinner" }
            }
        },
        GuardDecision::Render => rsx! { {children} },
        GuardDecision::Redirect(_) => rsx! { Fragment {} },
    }
}
