//! Role-specific theme helpers for consistent styling across pages.
//!
//! `None` is the signed-out look used by the landing and auth pages.

use crate::domain::Role;

// ============================================
// BUTTON STYLES
// ============================================

pub fn btn_primary(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::User) => "rounded-lg bg-sky-500 px-4 py-2 text-sm font-semibold text-white hover:bg-sky-400 disabled:opacity-50",
        Some(Role::Admin) => "rounded-lg bg-violet-500 px-4 py-2 text-sm font-semibold text-white hover:bg-violet-400 disabled:opacity-50",
        Some(Role::Warehouse) => "rounded-lg bg-emerald-500 px-4 py-2 text-sm font-semibold text-white hover:bg-emerald-400 disabled:opacity-50",
        None => "rounded-lg bg-indigo-500 px-4 py-2 text-sm font-semibold text-white hover:bg-indigo-400 disabled:opacity-50",
    }
}

pub fn btn_secondary(_role: Option<Role>) -> &'static str {
    "rounded-lg border border-slate-700 px-4 py-2 text-sm text-slate-300 hover:border-slate-500 hover:text-white disabled:opacity-50"
}

pub fn btn_active(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::User) => "rounded-lg px-5 py-2 text-sm font-semibold bg-sky-500/20 text-sky-300 border border-sky-500/40",
        Some(Role::Admin) => "rounded-lg px-5 py-2 text-sm font-semibold bg-violet-500/20 text-violet-300 border border-violet-500/40",
        Some(Role::Warehouse) => "rounded-lg px-5 py-2 text-sm font-semibold bg-emerald-500/20 text-emerald-300 border border-emerald-500/40",
        None => "rounded-lg px-5 py-2 text-sm font-semibold bg-indigo-500/20 text-indigo-300 border border-indigo-500/40",
    }
}

pub fn btn_inactive(_role: Option<Role>) -> &'static str {
    "rounded-lg px-5 py-2 text-sm text-slate-400 border border-slate-700 hover:border-slate-500 hover:text-slate-200"
}

pub fn btn_small(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::User) => "rounded px-2 py-1 text-xs font-semibold text-sky-300 border border-sky-500/40 hover:bg-sky-500/20",
        Some(Role::Admin) => "rounded px-2 py-1 text-xs font-semibold text-violet-300 border border-violet-500/40 hover:bg-violet-500/20",
        Some(Role::Warehouse) => "rounded px-2 py-1 text-xs font-semibold text-emerald-300 border border-emerald-500/40 hover:bg-emerald-500/20",
        None => "rounded px-2 py-1 text-xs font-semibold text-indigo-300 border border-indigo-500/40 hover:bg-indigo-500/20",
    }
}

pub const BTN_SMALL_DANGER: &str =
    "rounded px-2 py-1 text-xs font-semibold text-rose-300 border border-rose-500/40 hover:bg-rose-500/20";

// ============================================
// INPUT STYLES
// ============================================

pub fn input_class(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::User) => "w-full rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:border-sky-500",
        Some(Role::Admin) => "w-full rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:border-violet-500",
        Some(Role::Warehouse) => "w-full rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:border-emerald-500",
        None => "w-full rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:border-indigo-500",
    }
}

// ============================================
// PANEL / TABLE STYLES
// ============================================

pub fn panel_border(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::User) => "rounded-xl border border-sky-800/50 bg-slate-900/40",
        Some(Role::Admin) => "rounded-xl border border-violet-800/50 bg-slate-900/40",
        Some(Role::Warehouse) => "rounded-xl border border-emerald-800/50 bg-slate-900/40",
        None => "rounded-xl border border-slate-800 bg-slate-900/40",
    }
}

pub fn table_header(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::User) => "border-b border-sky-900/40 bg-sky-950/30 text-xs uppercase text-sky-400/70",
        Some(Role::Admin) => "border-b border-violet-900/40 bg-violet-950/30 text-xs uppercase text-violet-400/70",
        Some(Role::Warehouse) => "border-b border-emerald-900/40 bg-emerald-950/30 text-xs uppercase text-emerald-400/70",
        None => "border-b border-slate-800 bg-slate-900/60 text-xs uppercase text-slate-500",
    }
}

// ============================================
// TEXT STYLES
// ============================================

pub fn text_primary(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::User) => "text-sky-300",
        Some(Role::Admin) => "text-violet-300",
        Some(Role::Warehouse) => "text-emerald-300",
        None => "text-indigo-300",
    }
}

pub const TEXT_SECONDARY: &str = "text-slate-300";
pub const TEXT_MUTED: &str = "text-slate-500";
pub const LABEL: &str = "block text-xs font-semibold uppercase text-slate-500";

/// Green for gains, red for losses.
pub fn money_tone(amount: f64) -> &'static str {
    if amount < 0.0 {
        "text-rose-300"
    } else {
        "text-emerald-300"
    }
}

pub fn format_money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${amount:.2}")
    }
}

pub fn format_whole_money(amount: i64) -> String {
    if amount < 0 {
        format!("-${}", amount.unsigned_abs())
    } else {
        format!("${amount}")
    }
}
