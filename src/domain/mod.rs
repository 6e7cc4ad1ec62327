//! Domain logic: valuation, order workflow and access rules.

pub mod access;
pub mod app_state;
pub mod catalog;
pub mod entities;
pub mod valuation;
pub mod workflow;

pub use access::{evaluate, Capability, GuardDecision, Redirect};
pub use app_state::AppState;
pub use entities::{
    AssessmentRecord, ConditionTier, Defect, DefectId, Device, DeviceId, Order, OrderItem,
    OrderStatus, Part, PartOption, PriceHistory, PriceItemType, Priority, QualityTier, Role,
    Severity, TierPrices, User,
};
pub use valuation::{summarize, AssessmentSummary, PartSelection};
pub use workflow::{OrderFilter, StatusCounts, TransitionError};
