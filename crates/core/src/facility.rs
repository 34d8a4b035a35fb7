//! Static plant snapshot shown on the dashboard and fed into report prompts.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: u32,
    pub name: &'static str,
    pub status: &'static str,
    pub risk: &'static str,
    pub trend: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRecord {
    pub name: &'static str,
    pub status: &'static str,
    pub expires: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Benefit {
    pub feature: &'static str,
    pub description: &'static str,
    pub score: u8,
}

/// Cost dial scale in millions: green below `warn`, yellow below `alarm`, red above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostScale {
    pub max: f64,
    pub warn: f64,
    pub alarm: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FacilityOverrides {
    pub compliance: Option<u8>,
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacilitySnapshot {
    pub assets: Vec<Asset>,
    pub compliance: u8,
    pub cost: f64,
    pub cost_unit: &'static str,
    pub cost_scale: CostScale,
    pub training: Vec<TrainingRecord>,
    pub insights: Vec<&'static str>,
    pub benefits: Vec<Benefit>,
}

impl Default for FacilitySnapshot {
    fn default() -> Self {
        Self {
            assets: vec![
                Asset {
                    id: 1,
                    name: "Turbine #1",
                    status: "Healthy",
                    risk: "Low",
                    trend: "+2%",
                },
                Asset {
                    id: 2,
                    name: "Pipeline A",
                    status: "At Risk",
                    risk: "Medium",
                    trend: "-1%",
                },
                Asset {
                    id: 3,
                    name: "Turbine #3",
                    status: "Critical",
                    risk: "High",
                    trend: "-5%",
                },
            ],
            compliance: 92,
            cost: 1.23,
            cost_unit: "M",
            cost_scale: CostScale {
                max: 2.0,
                warn: 1.0,
                alarm: 1.5,
                threshold: 1.8,
            },
            training: vec![
                TrainingRecord {
                    name: "Alice",
                    status: "Complete",
                    expires: "2025-01-10",
                },
                TrainingRecord {
                    name: "Bob",
                    status: "Expiring",
                    expires: "2024-07-01",
                },
                TrainingRecord {
                    name: "Carlos",
                    status: "Expired",
                    expires: "2024-04-01",
                },
            ],
            insights: vec![
                "Optimize turbine #3 maintenance schedule",
                "Reduce inspection cycle for pipeline A",
                "Update training for new EPA rule",
                "Consolidate vendor onboarding",
                "Review asset tag rounding policy",
            ],
            benefits: vec![
                Benefit {
                    feature: "Dashboards",
                    description: "Legacy: Multiple dashboards in different systems. New: All-in-one view.",
                    score: 95,
                },
                Benefit {
                    feature: "Decision Gates",
                    description: "Legacy: Many manual gates. New: One AI-powered gate.",
                    score: 90,
                },
                Benefit {
                    feature: "Average Alert Routing",
                    description: "Legacy: Slow, manual routing. New: Instant, AI-driven.",
                    score: 85,
                },
                Benefit {
                    feature: "Report Prep Time",
                    description: "Legacy: Manual, slow. New: Automated, fast.",
                    score: 80,
                },
                Benefit {
                    feature: "Data Silos",
                    description: "Legacy: Data scattered. New: Unified cloud hub.",
                    score: 75,
                },
            ],
        }
    }
}

impl FacilitySnapshot {
    pub fn with_overrides(overrides: &FacilityOverrides) -> Self {
        let mut snapshot = Self::default();
        if let Some(compliance) = overrides.compliance {
            snapshot.compliance = compliance.min(100);
        }
        if let Some(cost) = overrides.cost {
            snapshot.cost = cost.max(0.0);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_are_clamped() {
        let snapshot = FacilitySnapshot::with_overrides(&FacilityOverrides {
            compliance: Some(140),
            cost: Some(-2.0),
        });
        assert_eq!(snapshot.compliance, 100);
        assert_eq!(snapshot.cost, 0.0);
        assert_eq!(snapshot.assets.len(), 3);
    }
}
