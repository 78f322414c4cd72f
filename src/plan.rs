//! Plan tiers and the ceiling on concurrently active tasks per brand.
//!
//! Brands do not carry a real subscription yet: every brand resolves to the
//! `basic` tier with a ceiling of three active tasks. [`PlanResolver`] is the
//! seam where a real per-brand lookup plugs in; [`ConfiguredPlanResolver`]
//! already supports tiers and per-brand assignments from configuration.

use crate::config::PlansConfig;
use crate::core::Brand;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const BASIC_TIER: &str = "basic";
pub const BASIC_MAX_ACTIVE_TASKS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandPlan {
    /// Tier key, e.g. `basic`.
    pub tier: String,
    /// Display label, e.g. `Basic`.
    pub label: String,
    pub max_active_tasks: usize,
}

impl BrandPlan {
    pub fn basic() -> Self {
        Self {
            tier: BASIC_TIER.to_string(),
            label: "Basic".to_string(),
            max_active_tasks: BASIC_MAX_ACTIVE_TASKS,
        }
    }
}

impl Default for BrandPlan {
    fn default() -> Self {
        Self::basic()
    }
}

pub trait PlanResolver {
    fn resolve(&self, brand: &Brand) -> BrandPlan;
}

/// Resolves every brand to the same plan.
#[derive(Clone, Debug, Default)]
pub struct FixedPlanResolver {
    plan: BrandPlan,
}

impl FixedPlanResolver {
    pub fn new(plan: BrandPlan) -> Self {
        Self { plan }
    }

    pub fn basic() -> Self {
        Self::new(BrandPlan::basic())
    }
}

impl PlanResolver for FixedPlanResolver {
    fn resolve(&self, _brand: &Brand) -> BrandPlan {
        self.plan.clone()
    }
}

/// Resolution order: per-brand override from config, the brand's own plan
/// key, then the default tier. Unknown tier keys fall back to the default.
#[derive(Clone, Debug)]
pub struct ConfiguredPlanResolver {
    default_plan: BrandPlan,
    tiers: HashMap<String, BrandPlan>,
    brand_tiers: BTreeMap<String, String>,
}

impl ConfiguredPlanResolver {
    pub fn from_config(config: &PlansConfig) -> Self {
        let mut tiers: HashMap<String, BrandPlan> = config
            .tiers
            .iter()
            .map(|(key, tier)| {
                (
                    key.clone(),
                    BrandPlan {
                        tier: key.clone(),
                        label: tier.label.clone().unwrap_or_else(|| title_case(key)),
                        max_active_tasks: tier.max_active_tasks,
                    },
                )
            })
            .collect();
        tiers
            .entry(BASIC_TIER.to_string())
            .or_insert_with(BrandPlan::basic);

        let default_plan = tiers
            .get(&config.default_tier)
            .cloned()
            .unwrap_or_else(BrandPlan::basic);

        Self {
            default_plan,
            tiers,
            brand_tiers: config.brands.clone(),
        }
    }
}

impl PlanResolver for ConfiguredPlanResolver {
    fn resolve(&self, brand: &Brand) -> BrandPlan {
        self.brand_tiers
            .get(&brand.id)
            .or(brand.plan.as_ref())
            .and_then(|key| self.tiers.get(key))
            .cloned()
            .unwrap_or_else(|| self.default_plan.clone())
    }
}

fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
