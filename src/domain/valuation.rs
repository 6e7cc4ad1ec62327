//! Device valuation, repair cost and profit for a single assessment.

use super::entities::{ConditionTier, Defect, DefectId, Device, PartOption, QualityTier};

/// Rounds half-way cases toward positive infinity (`-2.5` becomes `-2`).
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Sum of the cost impacts of the selected defects. Unknown ids count as zero.
/// The sum is not capped, so it may exceed `1.0`.
pub fn defect_impact(selected: &[DefectId], catalog: &[Defect]) -> f64 {
    selected
        .iter()
        .map(|id| {
            catalog
                .iter()
                .find(|defect| &defect.id == id)
                .map(|defect| defect.cost_impact)
                .unwrap_or(0.0)
        })
        .sum()
}

/// `round(base × (1 − impact) × multiplier)`. No floor is applied: an impact
/// above `1.0` yields a negative estimate.
pub fn estimate_value(base_price: f64, impact: f64, condition: ConditionTier) -> i64 {
    round_half_up(base_price * (1.0 - impact) * condition.multiplier())
}

/// Valuation of an optional device; no device means a zero estimate.
pub fn device_value(
    device: Option<&Device>,
    selected_defects: &[DefectId],
    defects: &[Defect],
    condition: ConditionTier,
) -> i64 {
    let Some(device) = device else {
        return 0;
    };
    estimate_value(
        device.base_price,
        defect_impact(selected_defects, defects),
        condition,
    )
}

pub fn repair_cost(parts: &[PartOption]) -> f64 {
    parts.iter().map(|part| part.price).sum()
}

pub fn profit(valuation: i64, repair_cost: f64) -> f64 {
    valuation as f64 - repair_cost
}

/// Repair parts picked for one device: at most one entry per part name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartSelection {
    parts: Vec<PartOption>,
}

impl PartSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `part`, or replaces the entry with the same name in place.
    pub fn select(&mut self, part: PartOption) {
        match self.parts.iter_mut().find(|p| p.name == part.name) {
            Some(existing) => *existing = part,
            None => self.parts.push(part),
        }
    }

    pub fn deselect(&mut self, name: &str) -> Option<PartOption> {
        let index = self.parts.iter().position(|p| p.name == name)?;
        Some(self.parts.remove(index))
    }

    pub fn is_selected(&self, name: &str, quality: QualityTier) -> bool {
        self.parts
            .iter()
            .any(|p| p.name == name && p.quality == quality)
    }

    pub fn clear(&mut self) {
        self.parts.clear();
    }

    pub fn parts(&self) -> &[PartOption] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn total(&self) -> f64 {
        repair_cost(&self.parts)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AssessmentSummary {
    pub valuation: i64,
    pub repair_cost: f64,
    pub profit: f64,
}

pub fn summarize(
    device: Option<&Device>,
    selected_defects: &[DefectId],
    defects: &[Defect],
    condition: ConditionTier,
    parts: &PartSelection,
) -> AssessmentSummary {
    let valuation = device_value(device, selected_defects, defects, condition);
    let repair_cost = parts.total();
    AssessmentSummary {
        valuation,
        repair_cost,
        profit: profit(valuation, repair_cost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog;

    fn option(name: &str, quality: QualityTier, price: f64) -> PartOption {
        PartOption {
            part_id: name.to_lowercase(),
            name: name.to_string(),
            quality,
            price,
            available: true,
        }
    }

    fn ids(values: &[&str]) -> Vec<DefectId> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn cracked_screen_on_good_iphone() {
        let defects = catalog::defects();
        let devices = catalog::devices();
        let iphone = devices.iter().find(|d| d.model == "iPhone 14 Pro");

        let value = device_value(iphone, &ids(&["1"]), &defects, ConditionTier::Good);

        assert_eq!(value, 539);
    }

    #[test]
    fn condition_multiplier_scales_estimate() {
        assert_eq!(estimate_value(1000.0, 0.0, ConditionTier::Excellent), 1100);
        assert_eq!(estimate_value(1000.0, 0.0, ConditionTier::Fair), 800);
        assert_eq!(estimate_value(1000.0, 0.0, ConditionTier::Poor), 600);
    }

    #[test]
    fn missing_device_values_at_zero() {
        let defects = catalog::defects();
        assert_eq!(
            device_value(None, &ids(&["1", "2"]), &defects, ConditionTier::Poor),
            0
        );
    }

    #[test]
    fn unknown_defects_are_ignored() {
        let defects = catalog::defects();
        assert_eq!(defect_impact(&ids(&["99", "5"]), &defects), 0.05);
    }

    #[test]
    fn impact_sum_is_not_clamped() {
        let defects = catalog::defects();
        // Cracked screen 0.4 + water damage 0.6 + broken camera 0.2
        let impact = defect_impact(&ids(&["1", "2", "3"]), &defects);
        let value = estimate_value(1000.0, impact, ConditionTier::Good);
        assert_eq!(value, -200);
    }

    #[test]
    fn negative_half_rounds_toward_positive() {
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(2.5), 3);
    }

    #[test]
    fn adding_defects_never_raises_value_while_impact_fits() {
        let defects = catalog::defects();
        let order = ["5", "6", "4", "3", "1"];
        for condition in ConditionTier::ALL {
            let mut selected = Vec::new();
            let mut previous = estimate_value(1199.0, 0.0, condition);
            for id in order {
                selected.push(id.to_string());
                let impact = defect_impact(&selected, &defects);
                assert!(impact <= 1.0);
                let value = estimate_value(1199.0, impact, condition);
                assert!(value >= 0);
                assert!(value <= previous, "{condition:?}: {value} > {previous}");
                previous = value;
            }
        }
    }

    #[test]
    fn repair_cost_sums_selected_prices() {
        let mut selection = PartSelection::new();
        selection.select(option("Screen Assembly", QualityTier::Premium, 149.99));
        selection.select(option("Battery", QualityTier::Budget, 24.99));

        assert!((selection.total() - 174.98).abs() < 1e-9);
    }

    #[test]
    fn profit_is_value_minus_repairs() {
        assert!((profit(539, 174.98) - 364.02).abs() < 1e-9);
    }

    #[test]
    fn reselecting_a_part_replaces_the_tier() {
        let mut selection = PartSelection::new();
        selection.select(option("Screen Assembly", QualityTier::Budget, 89.99));
        selection.select(option("Battery", QualityTier::Budget, 24.99));
        selection.select(option("Screen Assembly", QualityTier::Refurbished, 119.99));

        assert_eq!(selection.len(), 2);
        assert_eq!(selection.parts()[0].quality, QualityTier::Refurbished);
        assert!(selection.is_selected("Screen Assembly", QualityTier::Refurbished));
        assert!(!selection.is_selected("Screen Assembly", QualityTier::Budget));
        assert!((selection.total() - 144.98).abs() < 1e-9);
    }

    #[test]
    fn deselect_removes_by_name() {
        let mut selection = PartSelection::new();
        selection.select(option("Battery", QualityTier::Premium, 39.99));

        assert!(selection.deselect("Battery").is_some());
        assert!(selection.deselect("Battery").is_none());
        assert!(selection.is_empty());
    }

    #[test]
    fn summary_combines_all_three_figures() {
        let devices = catalog::devices();
        let defects = catalog::defects();
        let mut parts = PartSelection::new();
        parts.select(option("Screen Assembly", QualityTier::Premium, 149.99));
        parts.select(option("Battery", QualityTier::Budget, 24.99));

        let summary = summarize(
            devices.first(),
            &ids(&["1"]),
            &defects,
            ConditionTier::Good,
            &parts,
        );

        assert_eq!(summary.valuation, 539);
        assert!((summary.profit - 364.02).abs() < 1e-9);
    }
}
