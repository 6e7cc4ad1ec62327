//! Modal dialogs for adding catalog entries and editing their prices and stock.

use dioxus::prelude::*;

use crate::domain::{Device, Part, Role, TierPrices};
use crate::infra::repository::{DeviceUpdate, PartUpdate};
use crate::infra::services::{NewDevice, NewPart};
use crate::ui::theme;

const ROLE: Option<Role> = Some(Role::Admin);

/// Parses a non-negative amount; `$` and thousands separators are accepted.
pub fn parse_price(field: &str, raw: &str) -> Result<f64, String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|ch| *ch != '$' && *ch != ',')
        .collect();
    let value: f64 = cleaned
        .parse()
        .map_err(|_| format!("{field}: \"{}\" is not a number", raw.trim()))?;
    if !value.is_finite() {
        return Err(format!("{field}: \"{}\" is not a number", raw.trim()));
    }
    if value < 0.0 {
        return Err(format!("{field} cannot be negative"));
    }
    Ok(value)
}

pub fn parse_stock(raw: &str) -> Result<u32, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("Stock: \"{}\" is not a whole number", raw.trim()))
}

fn required(field: &str, raw: &str) -> Result<String, String> {
    let value = raw.trim();
    if value.is_empty() {
        Err(format!("{field} is required"))
    } else {
        Ok(value.to_string())
    }
}

/// Release year is optional; anything given must be a plausible year.
pub fn parse_year(raw: &str) -> Result<Option<u16>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<u16>() {
        Ok(year) if (1990..=2100).contains(&year) => Ok(Some(year)),
        _ => Err(format!("Release year: \"{raw}\" is not a year")),
    }
}

pub fn new_device(
    brand: &str,
    model: &str,
    category: &str,
    price: &str,
    year: &str,
) -> Result<NewDevice, String> {
    Ok(NewDevice {
        brand: required("Brand", brand)?,
        model: required("Model", model)?,
        category: required("Category", category)?,
        base_price: parse_price("Base price", price)?,
        release_year: parse_year(year)?,
    })
}

pub fn new_part(
    name: &str,
    category: &str,
    budget: &str,
    premium: &str,
    refurbished: &str,
    stock: &str,
) -> Result<NewPart, String> {
    Ok(NewPart {
        name: required("Name", name)?,
        category: required("Category", category)?,
        prices: TierPrices {
            budget: parse_price("Budget price", budget)?,
            premium: parse_price("Premium price", premium)?,
            refurbished: parse_price("Refurbished price", refurbished)?,
        },
        stock: parse_stock(stock)?,
    })
}

/// Builds an update that only carries the fields that changed.
pub fn device_update(device: &Device, price: &str, discontinued: bool) -> Result<DeviceUpdate, String> {
    let price = parse_price("Base price", price)?;
    Ok(DeviceUpdate {
        base_price: (price != device.base_price).then_some(price),
        discontinued: (discontinued != device.discontinued).then_some(discontinued),
    })
}

pub fn part_update(
    part: &Part,
    budget: &str,
    premium: &str,
    refurbished: &str,
    stock: &str,
) -> Result<PartUpdate, String> {
    let budget = parse_price("Budget price", budget)?;
    let premium = parse_price("Premium price", premium)?;
    let refurbished = parse_price("Refurbished price", refurbished)?;
    let stock = parse_stock(stock)?;
    Ok(PartUpdate {
        budget: (budget != part.prices.budget).then_some(budget),
        premium: (premium != part.prices.premium).then_some(premium),
        refurbished: (refurbished != part.prices.refurbished).then_some(refurbished),
        stock: (stock != part.stock).then_some(stock),
    })
}

#[component]
fn Modal(title: String, children: Element) -> Element {
    rsx! {
        div {
            class: "fixed inset-0 z-40 flex items-center justify-center bg-black/60",
            div {
                class: "w-full max-w-md rounded-xl border border-slate-700 bg-slate-900 p-6 shadow-lg space-y-4",
                h3 { class: "text-lg font-semibold {theme::text_primary(ROLE)}", "{title}" }
                {children}
            }
        }
    }
}

#[component]
fn FormActions(on_save: EventHandler<()>, on_cancel: EventHandler<()>) -> Element {
    rsx! {
        div {
            class: "flex justify-end gap-2",
            button { class: "{theme::btn_secondary(ROLE)}", onclick: move |_| on_cancel.call(()), "Cancel" }
            button { class: "{theme::btn_primary(ROLE)}", onclick: move |_| on_save.call(()), "Save" }
        }
    }
}

#[component]
fn PriceField(label: &'static str, value: Signal<String>) -> Element {
    let mut value = value;
    rsx! {
        label {
            class: "block space-y-1",
            span { class: "{theme::LABEL}", "{label}" }
            input {
                class: "{theme::input_class(ROLE)}",
                r#type: "text",
                value: "{value}",
                oninput: move |evt| value.set(evt.value()),
            }
        }
    }
}

#[component]
pub fn DeviceEditor(
    device: Device,
    on_save: EventHandler<DeviceUpdate>,
    on_cancel: EventHandler<()>,
) -> Element {
    let price = use_signal(|| format!("{:.2}", device.base_price));
    let mut discontinued = use_signal(|| device.discontinued);
    let mut error = use_signal(|| None::<String>);

    let submit = move |_| match device_update(&device, &price(), discontinued()) {
        Ok(update) => {
            error.set(None);
            on_save.call(update);
        }
        Err(message) => error.set(Some(message)),
    };

    rsx! {
        Modal {
            title: "Edit Device Pricing",
            PriceField { label: "Base price", value: price }
            label {
                class: "flex items-center gap-2 text-sm {theme::TEXT_SECONDARY}",
                input {
                    r#type: "checkbox",
                    checked: discontinued(),
                    onchange: move |evt| discontinued.set(evt.checked()),
                }
                "Discontinued"
            }
            if let Some(message) = error() {
                p { class: "text-sm text-rose-300", "{message}" }
            }
            FormActions { on_save: submit, on_cancel }
        }
    }
}

#[component]
pub fn PartEditor(
    part: Part,
    on_save: EventHandler<PartUpdate>,
    on_cancel: EventHandler<()>,
) -> Element {
    let budget = use_signal(|| format!("{:.2}", part.prices.budget));
    let premium = use_signal(|| format!("{:.2}", part.prices.premium));
    let refurbished = use_signal(|| format!("{:.2}", part.prices.refurbished));
    let stock = use_signal(|| part.stock.to_string());
    let mut error = use_signal(|| None::<String>);
    let title = format!("Edit {}", part.name);

    let submit = move |_| match part_update(&part, &budget(), &premium(), &refurbished(), &stock()) {
        Ok(update) => {
            error.set(None);
            on_save.call(update);
        }
        Err(message) => error.set(Some(message)),
    };

    rsx! {
        Modal {
            title,
            PriceField { label: "Budget price", value: budget }
            PriceField { label: "Premium price", value: premium }
            PriceField { label: "Refurbished price", value: refurbished }
            PriceField { label: "Stock", value: stock }
            if let Some(message) = error() {
                p { class: "text-sm text-rose-300", "{message}" }
            }
            FormActions { on_save: submit, on_cancel }
        }
    }
}

#[component]
pub fn DeviceCreator(on_save: EventHandler<NewDevice>, on_cancel: EventHandler<()>) -> Element {
    let brand = use_signal(String::new);
    let model = use_signal(String::new);
    let category = use_signal(String::new);
    let price = use_signal(String::new);
    let year = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let submit = move |_| match new_device(&brand(), &model(), &category(), &price(), &year()) {
        Ok(device) => {
            error.set(None);
            on_save.call(device);
        }
        Err(message) => error.set(Some(message)),
    };

    rsx! {
        Modal {
            title: "Add Device",
            PriceField { label: "Brand", value: brand }
            PriceField { label: "Model", value: model }
            PriceField { label: "Category", value: category }
            PriceField { label: "Base price", value: price }
            PriceField { label: "Release year", value: year }
            if let Some(message) = error() {
                p { class: "text-sm text-rose-300", "{message}" }
            }
            FormActions { on_save: submit, on_cancel }
        }
    }
}

#[component]
pub fn PartCreator(on_save: EventHandler<NewPart>, on_cancel: EventHandler<()>) -> Element {
    let name = use_signal(String::new);
    let category = use_signal(String::new);
    let budget = use_signal(String::new);
    let premium = use_signal(String::new);
    let refurbished = use_signal(String::new);
    let stock = use_signal(|| "0".to_string());
    let mut error = use_signal(|| None::<String>);

    let submit = move |_| match new_part(
        &name(),
        &category(),
        &budget(),
        &premium(),
        &refurbished(),
        &stock(),
    ) {
        Ok(part) => {
            error.set(None);
            on_save.call(part);
        }
        Err(message) => error.set(Some(message)),
    };

    rsx! {
        Modal {
            title: "Add Part",
            PriceField { label: "Name", value: name }
            PriceField { label: "Category", value: category }
            PriceField { label: "Budget price", value: budget }
            PriceField { label: "Premium price", value: premium }
            PriceField { label: "Refurbished price", value: refurbished }
            PriceField { label: "Stock", value: stock }
            if let Some(message) = error() {
                p { class: "text-sm text-rose-300", "{message}" }
            }
            FormActions { on_save: submit, on_cancel }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog;

    #[test]
    fn prices_accept_currency_formatting() {
        assert_eq!(parse_price("Price", " $1,099.50 "), Ok(1099.5));
        assert_eq!(parse_price("Price", "0"), Ok(0.0));
    }

    #[test]
    fn negative_or_garbage_prices_are_refused() {
        assert_eq!(
            parse_price("Budget price", "-1"),
            Err("Budget price cannot be negative".to_string())
        );
        assert!(parse_price("Budget price", "cheap").is_err());
        assert_eq!(
            parse_price("Base price", "NaN"),
            Err("Base price: \"NaN\" is not a number".to_string())
        );
        assert_eq!(
            parse_price("Base price", " inf "),
            Err("Base price: \"inf\" is not a number".to_string())
        );
        assert_eq!(
            parse_price("Base price", "-infinity"),
            Err("Base price: \"-infinity\" is not a number".to_string())
        );
        assert!(parse_stock("-3").is_err());
        assert_eq!(parse_stock(" 12 "), Ok(12));
    }

    #[test]
    fn unchanged_fields_are_left_out_of_updates() {
        let device = catalog::devices().remove(0);
        let update = device_update(&device, "899.00", false).unwrap();
        assert_eq!(update, DeviceUpdate::default());

        let update = device_update(&device, "850", true).unwrap();
        assert_eq!(update.base_price, Some(850.0));
        assert_eq!(update.discontinued, Some(true));
    }

    #[test]
    fn part_update_carries_stock_and_changed_tiers() {
        let part = catalog::parts().remove(1);
        let update = part_update(&part, "24.99", "35", "29.99", "0").unwrap();
        assert_eq!(
            update,
            PartUpdate {
                budget: None,
                premium: Some(35.0),
                refurbished: None,
                stock: Some(0),
            }
        );
    }

    #[test]
    fn new_device_needs_names_and_a_price() {
        let device = new_device(" Apple ", "iPhone 15", "iPhone", "$799", "2023").unwrap();
        assert_eq!(device.brand, "Apple");
        assert_eq!(device.base_price, 799.0);
        assert_eq!(device.release_year, Some(2023));

        assert_eq!(
            new_device("Apple", " ", "iPhone", "799", ""),
            Err("Model is required".to_string())
        );
        assert_eq!(new_device("Apple", "X", "iPhone", "799", "").unwrap().release_year, None);
        assert!(new_device("Apple", "X", "iPhone", "799", "99").is_err());
    }

    #[test]
    fn new_part_parses_every_tier_and_stock() {
        let part = new_part("Speaker", "Audio", "9.99", "19.99", "14.99", "3").unwrap();
        assert_eq!(part.prices.get(crate::domain::QualityTier::Refurbished), 14.99);
        assert_eq!(part.stock, 3);

        assert_eq!(
            new_part("Speaker", "Audio", "9.99", "-1", "14.99", "3"),
            Err("Premium price cannot be negative".to_string())
        );
    }
}
