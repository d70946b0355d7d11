//! Data models for the farm record keeper.
//!
//! This module contains all the core data structures: the farm/block/tree
//! hierarchy, the per-tree activity records, and scheduled tasks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum TreeStatus {
    Active,
    Sick,
    Dead,
    Removed,
}

impl fmt::Display for TreeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeStatus::Active => write!(f, "Active"),
            TreeStatus::Sick => write!(f, "Sick"),
            TreeStatus::Dead => write!(f, "Dead"),
            TreeStatus::Removed => write!(f, "Removed"),
        }
    }
}

/// Durian cultivar. `Other` carries its free-text name on the tree itself
/// (`variety_other`), mirroring how the intake form stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum Variety {
    #[serde(rename = "Musang King")]
    MusangKing,
    Monthong,
    #[serde(rename = "Black Thorn")]
    BlackThorn,
    D24,
    #[serde(rename = "Red Prawn")]
    RedPrawn,
    #[serde(rename = "XO")]
    Xo,
    #[serde(rename = "Golden Phoenix")]
    GoldenPhoenix,
    Tekka,
    Other,
}

impl fmt::Display for Variety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variety::MusangKing => write!(f, "Musang King"),
            Variety::Monthong => write!(f, "Monthong"),
            Variety::BlackThorn => write!(f, "Black Thorn"),
            Variety::D24 => write!(f, "D24"),
            Variety::RedPrawn => write!(f, "Red Prawn"),
            Variety::Xo => write!(f, "XO"),
            Variety::GoldenPhoenix => write!(f, "Golden Phoenix"),
            Variety::Tekka => write!(f, "Tekka"),
            Variety::Other => write!(f, "Other"),
        }
    }
}

/// Phenological stage of a tree, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum GrowthStage {
    Flush,
    Vegetative,
    #[serde(rename = "Flower Bud")]
    FlowerBud,
    Flowering,
    #[serde(rename = "Fruit Set")]
    FruitSet,
    Maturing,
    Harvest,
    Rest,
}

impl fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthStage::Flush => write!(f, "Flush"),
            GrowthStage::Vegetative => write!(f, "Vegetative"),
            GrowthStage::FlowerBud => write!(f, "Flower Bud"),
            GrowthStage::Flowering => write!(f, "Flowering"),
            GrowthStage::FruitSet => write!(f, "Fruit Set"),
            GrowthStage::Maturing => write!(f, "Maturing"),
            GrowthStage::Harvest => write!(f, "Harvest"),
            GrowthStage::Rest => write!(f, "Rest"),
        }
    }
}

impl GrowthStage {
    /// All stages in phenological order.
    pub const ALL: [GrowthStage; 8] = [
        GrowthStage::Flush,
        GrowthStage::Vegetative,
        GrowthStage::FlowerBud,
        GrowthStage::Flowering,
        GrowthStage::FruitSet,
        GrowthStage::Maturing,
        GrowthStage::Harvest,
        GrowthStage::Rest,
    ];

    /// Fixed badge color per stage.
    pub fn color(&self) -> &'static str {
        match self {
            GrowthStage::Flush => "#84cc16",
            GrowthStage::Vegetative => "#22c55e",
            GrowthStage::FlowerBud => "#f59e0b",
            GrowthStage::Flowering => "#ec4899",
            GrowthStage::FruitSet => "#8b5cf6",
            GrowthStage::Maturing => "#f97316",
            GrowthStage::Harvest => "#ef4444",
            GrowthStage::Rest => "#6b7280",
        }
    }
}

/// Flowering/harvest cycle stage tagged on a harvest record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum HarvestStage {
    #[serde(rename = "First Flower")]
    FirstFlower,
    #[serde(rename = "Peak Flower")]
    PeakFlower,
    #[serde(rename = "Fruit Set")]
    FruitSet,
    Harvest,
}

impl fmt::Display for HarvestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarvestStage::FirstFlower => write!(f, "First Flower"),
            HarvestStage::PeakFlower => write!(f, "Peak Flower"),
            HarvestStage::FruitSet => write!(f, "Fruit Set"),
            HarvestStage::Harvest => write!(f, "Harvest"),
        }
    }
}

/// How fertilizer was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ApplicationMethod {
    Broadcast,
    Ring,
    Foliar,
    Drip,
}

/// How water was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum IrrigationMethod {
    Rainfed,
    Drip,
    Sprinkler,
    Manual,
}

/// Weather at irrigation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Weather {
    Sunny,
    Cloudy,
    Rain,
    #[serde(rename = "Heavy Rain")]
    HeavyRain,
}

/// Severity of a pest or disease observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum)]
pub enum PestSeverity {
    Low,
    Medium,
    High,
}

impl fmt::Display for PestSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PestSeverity::Low => write!(f, "Low"),
            PestSeverity::Medium => write!(f, "Medium"),
            PestSeverity::High => write!(f, "High"),
        }
    }
}

/// Kind of scheduled work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum TaskType {
    Fertilizer,
    Pruning,
    #[serde(rename = "Pest Scouting")]
    PestScouting,
    Irrigation,
    #[serde(rename = "Harvest Check")]
    HarvestCheck,
    General,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskType::Fertilizer => write!(f, "Fertilizer"),
            TaskType::Pruning => write!(f, "Pruning"),
            TaskType::PestScouting => write!(f, "Pest Scouting"),
            TaskType::Irrigation => write!(f, "Irrigation"),
            TaskType::HarvestCheck => write!(f, "Harvest Check"),
            TaskType::General => write!(f, "General"),
        }
    }
}

/// Completion state of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    Pending,
    Completed,
}

/// A farm. Top of the location hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Farm {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    /// Elevation in meters above sea level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

/// A planting block within a farm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub farm_id: String,
    pub name: String,
}

/// A single durian tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub id: String,
    /// Unique human-readable label, e.g. "A-012".
    pub tree_code: String,
    pub farm_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    pub variety: Variety,
    /// Free-text cultivar name when `variety` is `Other`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variety_other: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planting_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rootstock_type: Option<String>,
    /// Spacing between rows in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_spacing: Option<f64>,
    /// Spacing between trees within a row in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_spacing: Option<f64>,
    pub status: TreeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_lng: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

impl Tree {
    /// Display name for the variety, resolving `Other` to its free-text
    /// override (falling back to the literal "Other").
    pub fn variety_name(&self) -> String {
        match self.variety {
            Variety::Other => self
                .variety_other
                .clone()
                .unwrap_or_else(|| "Other".to_string()),
            v => v.to_string(),
        }
    }

    /// Whole months since planting, or `None` when no planting date.
    pub fn age_months(&self, today: NaiveDate) -> Option<i32> {
        use chrono::Datelike;
        self.planting_date.map(|planted| {
            (today.year() - planted.year()) * 12 + (today.month() as i32 - planted.month() as i32)
        })
    }
}

/// A growth measurement for one tree. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub tree_id: String,
    pub record_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trunk_diameter_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canopy_diameter_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_stage: Option<GrowthStage>,
    /// Subjective health rating, 1 (weak) to 5 (vigorous).
    pub vigor_score: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

/// A fertilizer application. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FertilizerRecord {
    pub tree_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<String>,
    pub record_date: NaiveDate,
    /// Product name, e.g. "NPK 15-15-15" or "Chicken Manure".
    pub fertilizer_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_per_tree: Option<f64>,
    #[serde(default = "default_amount_unit")]
    pub amount_unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<ApplicationMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_ph: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_ec: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

fn default_amount_unit() -> String {
    "kg".to_string()
}

/// An irrigation event. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrrigationRecord {
    pub tree_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<String>,
    pub record_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irrigation_method: Option<IrrigationMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_liters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<Weather>,
    #[serde(default)]
    pub notes: String,
}

/// A pest or disease observation. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PestRecord {
    pub tree_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<String>,
    pub record_date: NaiveDate,
    pub pest_type: String,
    /// Free-text pest name when `pest_type` is "Other".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pest_other: Option<String>,
    pub severity: PestSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment_product: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

/// A flowering/harvest observation for one tree. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestRecord {
    pub tree_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<String>,
    pub record_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<HarvestStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_fruit_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harvested_fruit_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_a_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_b_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_c_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_kg: Option<f64>,
    /// `total_weight_kg` × `price_per_kg`, set when both are present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_revenue: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

impl HarvestRecord {
    /// Revenue derived from weight and price, when both were measured.
    pub fn derive_revenue(weight_kg: Option<f64>, price_per_kg: Option<f64>) -> Option<f64> {
        match (weight_kg, price_per_kg) {
            (Some(w), Some(p)) => Some(w * p),
            _ => None,
        }
    }
}

/// A scheduled piece of farm work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSchedule {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    pub task_type: TaskType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: NaiveDate,
    /// Repeat cadence in days; `None` means no repeat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_interval_days: Option<u32>,
    pub status: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,
}

impl TaskSchedule {
    pub fn is_pending(&self) -> bool {
        self.status == TaskState::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskState::Completed
    }
}
