use crate::errors::AppResult;
use crate::models::MetricKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub name: MetricKind,
    pub label: &'static str,
    pub unit: &'static str,
    pub color: &'static str,
    pub description: Option<&'static str>,
}

impl Metric {
    pub fn display_label(&self) -> String {
        if self.unit.is_empty() {
            self.label.to_string()
        } else {
            format!("{} ({})", self.label, self.unit)
        }
    }
}

pub static METRICS: [Metric; 13] = [
    Metric {
        name: MetricKind::Weight,
        label: "Weight",
        unit: "kg",
        color: "#3b82f6",
        description: None,
    },
    Metric {
        name: MetricKind::FatPercentage,
        label: "Fat %",
        unit: "%",
        color: "#ef4444",
        description: None,
    },
    Metric {
        name: MetricKind::FatMass,
        label: "Fat Mass",
        unit: "kg",
        color: "#f87171",
        description: None,
    },
    Metric {
        name: MetricKind::Ffm,
        label: "FFM",
        unit: "kg",
        color: "#10b981",
        description: Some("Fat-Free Mass: Total body weight minus fat mass"),
    },
    Metric {
        name: MetricKind::MuscleMass,
        label: "Muscle Mass",
        unit: "kg",
        color: "#059669",
        description: None,
    },
    Metric {
        name: MetricKind::TbwKg,
        label: "TBW",
        unit: "kg",
        color: "#06b6d4",
        description: Some("Total Body Water in kilograms"),
    },
    Metric {
        name: MetricKind::TbwPercentage,
        label: "TBW %",
        unit: "%",
        color: "#0891b2",
        description: Some("Total Body Water percentage"),
    },
    Metric {
        name: MetricKind::BoneMass,
        label: "Bone Mass",
        unit: "kg",
        color: "#f59e0b",
        description: None,
    },
    Metric {
        name: MetricKind::BmrKj,
        label: "BMR",
        unit: "kJ",
        color: "#8b5cf6",
        description: Some("Basal Metabolic Rate in kilojoules"),
    },
    Metric {
        name: MetricKind::BmrKcal,
        label: "BMR",
        unit: "kcal",
        color: "#7c3aed",
        description: Some("Basal Metabolic Rate in kilocalories"),
    },
    Metric {
        name: MetricKind::MetabolicAge,
        label: "Metabolic Age",
        unit: "years",
        color: "#6366f1",
        description: None,
    },
    Metric {
        name: MetricKind::VisceralFatRating,
        label: "Visceral Fat Rating",
        unit: "",
        color: "#ec4899",
        description: None,
    },
    Metric {
        name: MetricKind::Bmi,
        label: "BMI",
        unit: "",
        color: "#8b5cf6",
        description: Some("Body Mass Index"),
    },
];

pub fn metric(kind: MetricKind) -> &'static Metric {
    // METRICS follows MetricKind::ALL order.
    &METRICS[kind as usize]
}

pub fn lookup(name: &str) -> AppResult<&'static Metric> {
    name.parse::<MetricKind>().map(metric)
}
