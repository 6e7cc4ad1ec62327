//! Row shapes of the hosted backend's catalog tables and their conversion
//! into domain types.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::domain::{
    Device, Order, OrderItem, OrderStatus, Part, PriceHistory, PriceItemType, Priority,
    QualityTier, TierPrices,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("{field}: invalid timestamp \"{value}\"")]
    Timestamp { field: &'static str, value: String },
    #[error("{field}: unknown value \"{value}\"")]
    UnknownValue { field: &'static str, value: String },
    #[error("{field}: {value} is not a valid amount")]
    Amount { field: &'static str, value: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceRow {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub category: String,
    pub base_price: f64,
    #[serde(default)]
    pub release_year: Option<u16>,
    #[serde(default)]
    pub discontinued: bool,
    pub updated_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub budget_price: f64,
    pub premium_price: f64,
    pub refurbished_price: f64,
    pub stock_quantity: u32,
    #[serde(default)]
    pub out_of_stock: bool,
    pub updated_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryRow {
    pub id: String,
    pub item_type: String,
    pub item_id: String,
    pub old_price: f64,
    pub new_price: f64,
    pub changed_at: String,
    pub changed_by: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: String,
    pub user_id: String,
    pub status: String,
    pub priority: String,
    pub total_amount: f64,
    pub shipping_address: String,
    pub created_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRow {
    pub id: String,
    pub order_id: String,
    pub part_id: String,
    pub quality: String,
    pub quantity: u32,
    pub unit_price: f64,
    #[serde(default)]
    pub picked: bool,
}

impl TryFrom<DeviceRow> for Device {
    type Error = RecordError;

    fn try_from(row: DeviceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            base_price: amount("base_price", row.base_price)?,
            last_updated: timestamp("updated_at", &row.updated_at)?.date(),
            id: row.id,
            brand: row.brand,
            model: row.model,
            category: row.category,
            release_year: row.release_year,
            discontinued: row.discontinued,
        })
    }
}

impl TryFrom<PartRow> for Part {
    type Error = RecordError;

    fn try_from(row: PartRow) -> Result<Self, Self::Error> {
        let prices = TierPrices {
            budget: amount("budget_price", row.budget_price)?,
            premium: amount("premium_price", row.premium_price)?,
            refurbished: amount("refurbished_price", row.refurbished_price)?,
        };
        Ok(Self {
            last_updated: timestamp("updated_at", &row.updated_at)?.date(),
            out_of_stock: row.out_of_stock || row.stock_quantity == 0,
            id: row.id,
            name: row.name,
            category: row.category,
            prices,
            stock: row.stock_quantity,
        })
    }
}

impl PriceHistoryRow {
    /// The table has no label column; callers pass the item's display name.
    pub fn into_entry(self, label: String) -> Result<PriceHistory, RecordError> {
        let item_type = match self.item_type.as_str() {
            "device" => PriceItemType::Device,
            "part" => PriceItemType::Part,
            _ => return Err(unknown("item_type", self.item_type)),
        };
        Ok(PriceHistory {
            changed_at: timestamp("changed_at", &self.changed_at)?,
            id: self.id,
            item_type,
            item_id: self.item_id,
            label,
            old_price: self.old_price,
            new_price: self.new_price,
            changed_by: self.changed_by,
        })
    }
}

impl OrderItemRow {
    pub fn into_item(self, part_name: String) -> Result<OrderItem, RecordError> {
        let quality = QualityTier::ALL
            .into_iter()
            .find(|tier| tier.label() == self.quality)
            .ok_or_else(|| unknown("quality", self.quality.clone()))?;
        Ok(OrderItem {
            id: self.id,
            part_name,
            quality,
            quantity: self.quantity,
            unit_price: amount("unit_price", self.unit_price)?,
            picked: self.picked,
        })
    }
}

impl OrderRow {
    /// Orders reference their customer by id only; the name comes from the
    /// `users` table.
    pub fn into_order(
        self,
        customer_name: String,
        items: Vec<OrderItem>,
    ) -> Result<Order, RecordError> {
        let status = OrderStatus::parse(&self.status)
            .ok_or_else(|| unknown("status", self.status.clone()))?;
        let priority = match self.priority.as_str() {
            "low" => Priority::Low,
            "medium" => Priority::Medium,
            "high" => Priority::High,
            _ => return Err(unknown("priority", self.priority)),
        };
        Ok(Order {
            order_date: timestamp("created_at", &self.created_at)?.date(),
            total_amount: amount("total_amount", self.total_amount)?,
            id: self.id,
            customer_name,
            status,
            priority,
            items,
            shipping_address: self.shipping_address,
            revision: 0,
        })
    }
}

fn timestamp(field: &'static str, raw: &str) -> Result<OffsetDateTime, RecordError> {
    OffsetDateTime::parse(raw.trim(), &Rfc3339).map_err(|_| RecordError::Timestamp {
        field,
        value: raw.to_string(),
    })
}

fn amount(field: &'static str, value: f64) -> Result<f64, RecordError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(RecordError::Amount { field, value })
    }
}

fn unknown(field: &'static str, value: String) -> RecordError {
    RecordError::UnknownValue { field, value }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use super::*;

    #[test]
    fn device_rows_convert_with_update_date() {
        let row: DeviceRow = serde_json::from_value(json!({
            "id": "d1",
            "brand": "Apple",
            "model": "iPhone 14 Pro",
            "category": "iPhone",
            "base_price": 899.0,
            "release_year": 2022,
            "discontinued": false,
            "created_at": "2024-01-01T00:00:00+00:00",
            "updated_at": "2024-01-15T10:30:00.123456+00:00"
        }))
        .unwrap();

        let device = Device::try_from(row).unwrap();

        assert_eq!(device.display_name(), "Apple iPhone 14 Pro");
        assert_eq!(device.release_year, Some(2022));
        assert_eq!(device.last_updated, date!(2024 - 01 - 15));
    }

    #[test]
    fn empty_stock_marks_part_unavailable() {
        let row: PartRow = serde_json::from_value(json!({
            "id": "p1",
            "name": "Battery",
            "category": "Power",
            "compatible_devices": ["d1"],
            "budget_price": 24.99,
            "premium_price": 39.99,
            "refurbished_price": 29.99,
            "stock_quantity": 0,
            "out_of_stock": false,
            "updated_at": "2024-01-15T10:30:00Z"
        }))
        .unwrap();

        let part = Part::try_from(row).unwrap();

        assert!(part.out_of_stock);
        assert!(!part.is_available());
        assert_eq!(part.prices.get(QualityTier::Premium), 39.99);
    }

    #[test]
    fn bad_timestamps_and_prices_are_reported() {
        let mut row = DeviceRow {
            id: "d1".into(),
            brand: "Apple".into(),
            model: "iPad Air".into(),
            category: "iPad".into(),
            base_price: 599.0,
            release_year: None,
            discontinued: false,
            updated_at: "yesterday".into(),
        };
        assert!(matches!(
            Device::try_from(row.clone()),
            Err(RecordError::Timestamp { field: "updated_at", .. })
        ));

        row.updated_at = "2024-01-15T10:30:00Z".into();
        row.base_price = -1.0;
        assert!(matches!(
            Device::try_from(row),
            Err(RecordError::Amount { field: "base_price", .. })
        ));
    }

    #[test]
    fn order_rows_assemble_with_items() {
        let item = OrderItemRow {
            id: "i1".into(),
            order_id: "o1".into(),
            part_id: "p1".into(),
            quality: "premium".into(),
            quantity: 2,
            unit_price: 39.99,
            picked: true,
        }
        .into_item("Battery".into())
        .unwrap();
        let order = OrderRow {
            id: "o1".into(),
            user_id: "u1".into(),
            status: "processing".into(),
            priority: "high".into(),
            total_amount: 79.98,
            shipping_address: "1 Main St".into(),
            created_at: "2024-01-15T10:30:00Z".into(),
        }
        .into_order("Jane Doe".into(), vec![item])
        .unwrap();

        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.priority, Priority::High);
        assert!(order.all_picked());
        assert_eq!(order.revision, 0);
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        let row = PriceHistoryRow {
            id: "h1".into(),
            item_type: "bundle".into(),
            item_id: "x".into(),
            old_price: 1.0,
            new_price: 2.0,
            changed_at: "2024-01-15T10:30:00Z".into(),
            changed_by: "admin".into(),
        };
        assert_eq!(
            row.into_entry("Bundle".into()).unwrap_err(),
            RecordError::UnknownValue {
                field: "item_type",
                value: "bundle".into()
            }
        );
    }
}
