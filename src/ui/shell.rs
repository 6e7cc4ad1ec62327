use dioxus::prelude::*;

use crate::app::Route;
use crate::domain::{AppState, Role};
use crate::infra::services::Services;
use crate::ui::components::badges::RoleBadge;
use crate::ui::components::toast::{push_toast, ToastKind, Toasts};
use crate::ui::theme;
use crate::util::version::{version_label, APP_NAME};

#[component]
pub fn Shell(children: Element) -> Element {
    let state = use_context::<Signal<AppState>>();
    let services = use_context::<Services>();
    let toasts = use_context::<Toasts>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    let user = state.with(|st| st.current_user().cloned());
    let role = user.as_ref().map(|user| user.role);

    let header_class = match role {
        Some(Role::User) => "border-b border-sky-900/40 bg-slate-950/90 px-6 py-4",
        Some(Role::Admin) => "border-b border-violet-900/40 bg-slate-950/90 px-6 py-4",
        Some(Role::Warehouse) => "border-b border-emerald-900/40 bg-slate-950/90 px-6 py-4",
        None => "border-b border-slate-900/60 bg-slate-950/80 px-6 py-4",
    };

    let sign_out = move |_| {
        let identity = services.identity.clone();
        let mut state = state;
        spawn(async move {
            if let Err(err) = identity.sign_out().await {
                push_toast(toasts, ToastKind::Warning, format!("Signed out locally: {err}"));
            }
            state.with_mut(|st| st.sign_out());
            nav.push(Route::Landing {});
        });
    };

    rsx! {
        div { class: "app-shell min-h-screen bg-slate-950 text-slate-100",
            header {
                class: "{header_class}",
                div { class: "mx-auto flex max-w-6xl items-center justify-between gap-4",
                    button {
                        class: "text-left",
                        onclick: move |_| { nav.push(Route::Landing {}); },
                        h1 { class: "text-xl font-semibold tracking-tight {theme::text_primary(role)}", "{APP_NAME}" }
                        p { class: "text-xs {theme::TEXT_MUTED}", "{version_label()}" }
                    }
                    nav { class: "flex items-center gap-2 text-sm",
                        if let Some(user) = user.clone() {
                            NavButton {
                                active: matches!(current_route, Route::UserDashboard {}),
                                onclick: move |_| { nav.push(Route::UserDashboard {}); },
                                label: "User Dashboard",
                                role,
                            }
                            if user.role == Role::Admin {
                                NavButton {
                                    active: matches!(current_route, Route::AdminDashboard {}),
                                    onclick: move |_| { nav.push(Route::AdminDashboard {}); },
                                    label: "Admin Dashboard",
                                    role,
                                }
                            }
                            if user.role == Role::Warehouse {
                                NavButton {
                                    active: matches!(current_route, Route::WarehouseDashboard {}),
                                    onclick: move |_| { nav.push(Route::WarehouseDashboard {}); },
                                    label: "Warehouse Dashboard",
                                    role,
                                }
                            }
                            span { class: "ml-2 flex items-center gap-2 {theme::TEXT_SECONDARY}",
                                "{user.full_name}"
                                RoleBadge { role: user.role }
                            }
                            button { class: "{theme::btn_secondary(role)}", onclick: sign_out, "Sign Out" }
                        } else {
                            NavButton {
                                active: matches!(current_route, Route::SignIn {}),
                                onclick: move |_| { nav.push(Route::SignIn {}); },
                                label: "Sign In",
                                role,
                            }
                            button {
                                class: "{theme::btn_primary(None)}",
                                onclick: move |_| { nav.push(Route::SignUp {}); },
                                "Sign Up"
                            }
                        }
                    }
                }
            }
            main { class: "mx-auto max-w-6xl px-6 py-10",
                {children}
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str, role: Option<Role>) -> Element {
    let class = if active {
        theme::btn_active(role)
    } else {
        theme::btn_inactive(role)
    };

    rsx! {
        button {
            class: "{class}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
