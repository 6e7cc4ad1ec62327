use dioxus::prelude::*;

use crate::app::Route;
use crate::domain::{AppState, Capability, Role};
use crate::ui::theme;

const FEATURES: [(&str, &str, &str); 4] = [
    ("$", "Real-time Pricing", "Instant device valuations and parts pricing"),
    ("⚡", "Instant Quotes", "Repair costs and profit margins as you pick"),
    ("📦", "Quality Parts", "Budget, premium or refurbished options"),
    ("🚀", "Fast Shipping", "Warehouse picking and delivery tracking"),
];

#[component]
pub fn LandingPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let session = state.with(|st| st.session.clone());
    let signed_in = session.user().is_some();
    let is_admin = session.allows(Capability::Admin);
    let is_warehouse = session.allows(Capability::Warehouse);
    let (user_cta, user_target) = if signed_in {
        ("Access Dashboard →", Route::UserDashboard {})
    } else {
        ("Get Started →", Route::SignIn {})
    };
    let admin_cta = if is_admin { "Manage System →" } else { "Admin Access Only" };
    let warehouse_cta = if is_warehouse { "Process Orders →" } else { "Warehouse Access Only" };

    rsx! {
        section { class: "space-y-12",
            div { class: "text-center space-y-4",
                h2 { class: "text-4xl font-bold tracking-tight",
                    "Smart Device "
                    span { class: "{theme::text_primary(None)}", "Tech Trading" }
                }
                p { class: "mx-auto max-w-2xl {theme::TEXT_SECONDARY}",
                    "Assess used devices, price repairs and see the margin before you buy. Admins keep the catalog current and the warehouse ships the parts."
                }
            }
            div { class: "grid gap-6 md:grid-cols-3",
                DashboardCard {
                    title: "User Dashboard",
                    blurb: "Assess device value, pick repair parts and track your history.",
                    role: Role::User,
                    enabled: true,
                    cta: user_cta,
                    target: user_target,
                }
                DashboardCard {
                    title: "Admin Dashboard",
                    blurb: "Manage device and part prices, stock and price history.",
                    role: Role::Admin,
                    enabled: is_admin,
                    cta: admin_cta,
                    target: Route::AdminDashboard {},
                }
                DashboardCard {
                    title: "Warehouse Dashboard",
                    blurb: "Pick, pack and ship incoming parts orders.",
                    role: Role::Warehouse,
                    enabled: is_warehouse,
                    cta: warehouse_cta,
                    target: Route::WarehouseDashboard {},
                }
            }
            div { class: "grid gap-4 md:grid-cols-4",
                for (icon, title, text) in FEATURES {
                    div { class: "{theme::panel_border(None)} p-4 text-center",
                        p { class: "text-2xl", "{icon}" }
                        h3 { class: "mt-2 font-semibold {theme::TEXT_SECONDARY}", "{title}" }
                        p { class: "mt-1 text-xs {theme::TEXT_MUTED}", "{text}" }
                    }
                }
            }
        }
    }
}

#[component]
fn DashboardCard(
    title: &'static str,
    blurb: &'static str,
    role: Role,
    enabled: bool,
    cta: &'static str,
    target: Route,
) -> Element {
    let nav = use_navigator();
    let dim = if enabled { "cursor-pointer hover:border-slate-600" } else { "opacity-50" };
    rsx! {
        div {
            class: "{theme::panel_border(Some(role))} p-6 space-y-3 {dim}",
            onclick: move |_| {
                if enabled {
                    nav.push(target.clone());
                }
            },
            h3 { class: "text-xl font-semibold {theme::text_primary(Some(role))}", "{title}" }
            p { class: "text-sm {theme::TEXT_SECONDARY}", "{blurb}" }
            p { class: "text-sm font-semibold {theme::text_primary(Some(role))}", "{cta}" }
        }
    }
}
