use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// Identifiers are opaque strings, matching the backend's text keys.
pub type DeviceId = String;
pub type DefectId = String;
pub type PartId = String;
pub type OrderId = String;
pub type UserId = String;

/// Account role. Decides which dashboards a user may open and nothing else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    Warehouse,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Warehouse => "warehouse",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub brand: String,
    pub model: String,
    pub category: String,
    /// Resale value of a flawless unit. Never negative.
    pub base_price: f64,
    pub release_year: Option<u16>,
    pub discontinued: bool,
    pub last_updated: Date,
}

impl Device {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Defect {
    pub id: DefectId,
    pub name: String,
    pub severity: Severity,
    /// Fraction of the base price lost to this defect, in `[0, 1]`.
    pub cost_impact: f64,
}

/// Qualitative device state used to scale the valuation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionTier {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
}

impl ConditionTier {
    pub const ALL: [ConditionTier; 4] = [
        ConditionTier::Excellent,
        ConditionTier::Good,
        ConditionTier::Fair,
        ConditionTier::Poor,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            ConditionTier::Excellent => 1.1,
            ConditionTier::Good => 1.0,
            ConditionTier::Fair => 0.8,
            ConditionTier::Poor => 0.6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConditionTier::Excellent => "excellent",
            ConditionTier::Good => "good",
            ConditionTier::Fair => "fair",
            ConditionTier::Poor => "poor",
        }
    }
}

/// Part sourcing grade; each grade carries its own price point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Budget,
    Premium,
    Refurbished,
}

impl QualityTier {
    pub const ALL: [QualityTier; 3] = [
        QualityTier::Budget,
        QualityTier::Premium,
        QualityTier::Refurbished,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Budget => "budget",
            QualityTier::Premium => "premium",
            QualityTier::Refurbished => "refurbished",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierPrices {
    pub budget: f64,
    pub premium: f64,
    pub refurbished: f64,
}

impl TierPrices {
    pub fn get(&self, tier: QualityTier) -> f64 {
        match tier {
            QualityTier::Budget => self.budget,
            QualityTier::Premium => self.premium,
            QualityTier::Refurbished => self.refurbished,
        }
    }

    pub fn set(&mut self, tier: QualityTier, price: f64) {
        match tier {
            QualityTier::Budget => self.budget = price,
            QualityTier::Premium => self.premium = price,
            QualityTier::Refurbished => self.refurbished = price,
        }
    }
}

/// Catalog entry for a replacement part, priced per quality tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub name: String,
    pub category: String,
    pub prices: TierPrices,
    pub stock: u32,
    pub out_of_stock: bool,
    pub last_updated: Date,
}

impl Part {
    pub fn is_available(&self) -> bool {
        !self.out_of_stock && self.stock > 0
    }

    pub fn option(&self, quality: QualityTier) -> PartOption {
        PartOption {
            part_id: self.id.clone(),
            name: self.name.clone(),
            quality,
            price: self.prices.get(quality),
            available: self.is_available(),
        }
    }

    pub fn options(&self) -> Vec<PartOption> {
        QualityTier::ALL.iter().map(|tier| self.option(*tier)).collect()
    }
}

/// One purchasable part at one quality tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartOption {
    pub part_id: PartId,
    pub name: String,
    pub quality: QualityTier,
    pub price: f64,
    pub available: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub part_name: String,
    pub quality: QualityTier,
    pub quantity: u32,
    pub unit_price: f64,
    /// Fulfillment checklist bit: the item has been physically retrieved.
    pub picked: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub order_date: Date,
    pub status: OrderStatus,
    pub priority: Priority,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub shipping_address: String,
    /// Bumped on every accepted change; writers must quote the value they read.
    #[serde(default)]
    pub revision: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceItemType {
    Device,
    Part,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PriceHistory {
    pub id: String,
    pub item_type: PriceItemType,
    pub item_id: String,
    /// Human-readable subject, e.g. "Battery (premium)".
    pub label: String,
    pub old_price: f64,
    pub new_price: f64,
    pub changed_at: OffsetDateTime,
    pub changed_by: String,
}

/// A finished valuation kept for the user's history tab.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: String,
    pub owner_id: UserId,
    pub device_id: DeviceId,
    pub device_name: String,
    pub condition: ConditionTier,
    pub defects: Vec<String>,
    pub parts: Vec<PartOption>,
    pub valuation: i64,
    pub repair_cost: f64,
    pub profit: f64,
    /// Unix timestamp (seconds).
    pub assessed_at: u64,
}
