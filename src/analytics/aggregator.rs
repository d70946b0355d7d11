//! Chart-ready summaries derived from flat record collections.
//!
//! Every function here is a pure fold over its inputs: no I/O, no
//! mutation, and empty collections always produce empty output or
//! zeroed stats. Records whose tree reference does not resolve are
//! silently skipped, and absent numeric fields mean "not measured".

use crate::models::{GrowthRecord, GrowthStage, HarvestRecord, HarvestStage, Tree};
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashMap;

/// Pie/donut palette for revenue slices.
pub const REVENUE_COLORS: [&str; 7] = [
    "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#06b6d4", "#f97316", "#ec4899",
];

/// Pie palette for variety counts.
pub const VARIETY_COLORS: [&str; 8] = [
    "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#06b6d4", "#f97316", "#ec4899", "#84cc16",
];

/// Harvest weight grouped by cultivar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarietyYield {
    pub name: String,
    /// Summed weight in kg, rounded to 1 decimal.
    pub total: f64,
    /// Mean weight per contributing record in kg, rounded to 1 decimal.
    pub average: f64,
}

/// Harvest weight grouped by calendar year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyYield {
    pub year: i32,
    pub total: f64,
}

/// Mean measurements for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthTrendPoint {
    /// Month label, e.g. "Mar 2024".
    pub month: String,
    pub avg_height: f64,
    /// 0.0 when no record in the month carried a diameter.
    pub avg_diameter: f64,
}

/// Revenue grouped by cultivar, with its display color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueSlice {
    pub name: String,
    pub value: f64,
    pub color: &'static str,
}

/// Headline numbers for the analytics summary row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_yield: f64,
    pub total_revenue: f64,
    pub avg_yield_per_tree: f64,
}

/// Tree count per cultivar, with its display color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarietyCount {
    pub name: String,
    pub count: usize,
    pub color: &'static str,
}

/// Tree count per current phenological stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageCount {
    pub stage: GrowthStage,
    pub count: usize,
    pub color: &'static str,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn find_tree<'a>(trees: &'a [Tree], id: &str) -> Option<&'a Tree> {
    trees.iter().find(|t| t.id == id)
}

/// Total and average harvest weight per variety.
///
/// Records without a weight or without a resolvable tree are excluded.
/// Groups appear in first-encounter order; callers must not assume any
/// sort.
pub fn yield_by_variety(harvests: &[HarvestRecord], trees: &[Tree]) -> Vec<VarietyYield> {
    // (name, total, count) in first-encounter order
    let mut groups: Vec<(String, f64, usize)> = Vec::new();

    for record in harvests {
        let weight = match record.total_weight_kg {
            Some(w) => w,
            None => continue,
        };
        let tree = match find_tree(trees, &record.tree_id) {
            Some(t) => t,
            None => continue,
        };

        let name = tree.variety_name();
        match groups.iter_mut().find(|(n, _, _)| *n == name) {
            Some((_, total, count)) => {
                *total += weight;
                *count += 1;
            }
            None => groups.push((name, weight, 1)),
        }
    }

    groups
        .into_iter()
        .map(|(name, total, count)| VarietyYield {
            name,
            total: round1(total),
            average: round1(total / count as f64),
        })
        .collect()
}

/// Harvest-stage weight totals per calendar year, sorted ascending.
pub fn yield_by_year(harvests: &[HarvestRecord]) -> Vec<YearlyYield> {
    let mut totals: HashMap<i32, f64> = HashMap::new();

    for record in harvests {
        if record.stage != Some(HarvestStage::Harvest) {
            continue;
        }
        if let Some(weight) = record.total_weight_kg {
            *totals.entry(record.record_date.year()).or_insert(0.0) += weight;
        }
    }

    let mut years: Vec<YearlyYield> = totals
        .into_iter()
        .map(|(year, total)| YearlyYield {
            year,
            total: round1(total),
        })
        .collect();
    years.sort_by_key(|y| y.year);
    years
}

/// Mean height and trunk diameter per month, capped to the most recent
/// 12 month groups in encounter order.
///
/// Only records with a height contribute to a month; the diameter mean
/// covers the subset of those that also carry a diameter, and is 0.0
/// when none do.
pub fn growth_trend(growths: &[GrowthRecord]) -> Vec<GrowthTrendPoint> {
    // (label, heights, diameters) in first-encounter order
    let mut months: Vec<(String, Vec<f64>, Vec<f64>)> = Vec::new();

    for record in growths {
        let height = match record.height_m {
            Some(h) => h,
            None => continue,
        };
        let label = record.record_date.format("%b %Y").to_string();

        let idx = match months.iter().position(|(l, _, _)| *l == label) {
            Some(i) => i,
            None => {
                months.push((label, Vec::new(), Vec::new()));
                months.len() - 1
            }
        };
        let entry = &mut months[idx];
        entry.1.push(height);
        if let Some(d) = record.trunk_diameter_cm {
            entry.2.push(d);
        }
    }

    let skip = months.len().saturating_sub(12);
    months
        .into_iter()
        .skip(skip)
        .map(|(month, heights, diameters)| GrowthTrendPoint {
            month,
            avg_height: round1(heights.iter().sum::<f64>() / heights.len() as f64),
            avg_diameter: if diameters.is_empty() {
                0.0
            } else {
                round1(diameters.iter().sum::<f64>() / diameters.len() as f64)
            },
        })
        .collect()
}

/// Revenue totals per variety, colored cyclically from the 7-color
/// palette by first-encounter index.
pub fn revenue_by_variety(harvests: &[HarvestRecord], trees: &[Tree]) -> Vec<RevenueSlice> {
    let mut groups: Vec<(String, f64)> = Vec::new();

    for record in harvests {
        let revenue = match record.total_revenue {
            Some(r) => r,
            None => continue,
        };
        let tree = match find_tree(trees, &record.tree_id) {
            Some(t) => t,
            None => continue,
        };

        let name = tree.variety_name();
        match groups.iter_mut().find(|(n, _)| *n == name) {
            Some((_, total)) => *total += revenue,
            None => groups.push((name, revenue)),
        }
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(i, (name, value))| RevenueSlice {
            name,
            value: round2(value),
            color: REVENUE_COLORS[i % REVENUE_COLORS.len()],
        })
        .collect()
}

/// Headline totals: yield over Harvest-stage records, revenue over all
/// records, and mean yield per tree (0 when there are no trees).
pub fn dashboard_stats(harvests: &[HarvestRecord], trees: &[Tree]) -> DashboardStats {
    let total_yield: f64 = harvests
        .iter()
        .filter(|r| r.stage == Some(HarvestStage::Harvest))
        .filter_map(|r| r.total_weight_kg)
        .sum();

    let total_revenue: f64 = harvests.iter().filter_map(|r| r.total_revenue).sum();

    let avg_yield_per_tree = if trees.is_empty() {
        0.0
    } else {
        total_yield / trees.len() as f64
    };

    DashboardStats {
        total_yield: round1(total_yield),
        total_revenue: round2(total_revenue),
        avg_yield_per_tree: round1(avg_yield_per_tree),
    }
}

/// Tree count per resolved variety, in first-encounter order.
pub fn variety_distribution(trees: &[Tree]) -> Vec<VarietyCount> {
    let mut groups: Vec<(String, usize)> = Vec::new();

    for tree in trees {
        let name = tree.variety_name();
        match groups.iter_mut().find(|(n, _)| *n == name) {
            Some((_, count)) => *count += 1,
            None => groups.push((name, 1)),
        }
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(i, (name, count))| VarietyCount {
            name,
            count,
            color: VARIETY_COLORS[i % VARIETY_COLORS.len()],
        })
        .collect()
}

/// Tree count per current stage, using only the most recent staged
/// record of each tree. Output follows the phenological cycle order.
pub fn stage_distribution(growths: &[GrowthRecord]) -> Vec<StageCount> {
    let mut latest: HashMap<&str, (chrono::NaiveDate, GrowthStage)> = HashMap::new();

    for record in growths {
        let stage = match record.growth_stage {
            Some(s) => s,
            None => continue,
        };
        match latest.get(record.tree_id.as_str()) {
            Some((date, _)) if *date >= record.record_date => {}
            _ => {
                latest.insert(&record.tree_id, (record.record_date, stage));
            }
        }
    }

    let mut counts: HashMap<GrowthStage, usize> = HashMap::new();
    for (_, (_, stage)) in &latest {
        *counts.entry(*stage).or_insert(0) += 1;
    }

    GrowthStage::ALL
        .iter()
        .filter_map(|stage| {
            counts.get(stage).map(|count| StageCount {
                stage: *stage,
                count: *count,
                color: stage.color(),
            })
        })
        .collect()
}

/// Mean age in years of trees that have a planting date, rounded to 1
/// decimal. 0 when no tree has one.
pub fn average_age_years(trees: &[Tree], today: chrono::NaiveDate) -> f64 {
    let ages: Vec<i32> = trees.iter().filter_map(|t| t.age_months(today)).collect();
    if ages.is_empty() {
        return 0.0;
    }

    let total_months: i32 = ages.iter().sum();
    round1(total_months as f64 / ages.len() as f64 / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TreeStatus, Variety};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tree(id: &str, variety: Variety) -> Tree {
        Tree {
            id: id.to_string(),
            tree_code: format!("A-{id}"),
            farm_id: "F1".to_string(),
            block_id: None,
            variety,
            variety_other: None,
            planting_date: None,
            rootstock_type: None,
            row_spacing: None,
            tree_spacing: None,
            status: TreeStatus::Active,
            gps_lat: None,
            gps_lng: None,
            notes: String::new(),
        }
    }

    fn harvest(tree_id: &str, d: NaiveDate, weight: Option<f64>) -> HarvestRecord {
        HarvestRecord {
            tree_id: tree_id.to_string(),
            farm_id: None,
            record_date: d,
            stage: Some(HarvestStage::Harvest),
            estimated_fruit_count: None,
            harvested_fruit_count: None,
            total_weight_kg: weight,
            grade_a_count: None,
            grade_b_count: None,
            grade_c_count: None,
            price_per_kg: None,
            total_revenue: None,
            notes: String::new(),
        }
    }

    fn growth(tree_id: &str, d: NaiveDate, height: Option<f64>, diameter: Option<f64>) -> GrowthRecord {
        GrowthRecord {
            tree_id: tree_id.to_string(),
            record_date: d,
            height_m: height,
            trunk_diameter_cm: diameter,
            canopy_diameter_m: None,
            growth_stage: None,
            vigor_score: 3,
            photos: Vec::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_yield_by_variety_totals_and_averages() {
        let trees = vec![tree("T1", Variety::MusangKing)];
        let harvests = vec![
            harvest("T1", date(2024, 6, 1), Some(10.0)),
            harvest("T1", date(2024, 6, 8), Some(20.0)),
        ];

        let groups = yield_by_variety(&harvests, &trees);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Musang King");
        assert_eq!(groups[0].total, 30.0);
        assert_eq!(groups[0].average, 15.0);
    }

    #[test]
    fn test_yield_by_variety_skips_unresolved_and_unweighed() {
        let trees = vec![tree("T1", Variety::D24)];
        let harvests = vec![
            harvest("T1", date(2024, 6, 1), Some(12.0)),
            harvest("T1", date(2024, 6, 2), None),
            harvest("GHOST", date(2024, 6, 3), Some(99.0)),
        ];

        let groups = yield_by_variety(&harvests, &trees);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total, 12.0);
        assert_eq!(groups[0].average, 12.0);
    }

    #[test]
    fn test_yield_by_variety_first_encounter_order() {
        let trees = vec![tree("T1", Variety::Tekka), tree("T2", Variety::D24)];
        let harvests = vec![
            harvest("T1", date(2024, 6, 1), Some(5.0)),
            harvest("T2", date(2024, 6, 2), Some(7.0)),
            harvest("T1", date(2024, 6, 3), Some(3.0)),
        ];

        let groups = yield_by_variety(&harvests, &trees);
        // Not alphabetical: Tekka seen first.
        assert_eq!(groups[0].name, "Tekka");
        assert_eq!(groups[1].name, "D24");
    }

    #[test]
    fn test_yield_by_variety_totals_add_up() {
        let trees = vec![tree("T1", Variety::Monthong), tree("T2", Variety::Xo)];
        let harvests = vec![
            harvest("T1", date(2023, 7, 1), Some(4.3)),
            harvest("T2", date(2023, 7, 2), Some(6.7)),
            harvest("T1", date(2024, 7, 3), Some(9.1)),
            harvest("GHOST", date(2024, 7, 4), Some(50.0)),
        ];

        let groups = yield_by_variety(&harvests, &trees);
        let grouped: f64 = groups.iter().map(|g| g.total).sum();
        assert!((grouped - 20.1).abs() < 0.1);
    }

    #[test]
    fn test_yield_by_year_sorted_ascending() {
        let harvests = vec![
            harvest("T1", date(2024, 6, 1), Some(10.0)),
            harvest("T1", date(2022, 6, 1), Some(5.0)),
            harvest("T1", date(2023, 6, 1), Some(7.5)),
        ];

        let years = yield_by_year(&harvests);
        assert_eq!(years.len(), 3);
        assert_eq!(years[0].year, 2022);
        assert_eq!(years[1].year, 2023);
        assert_eq!(years[2].year, 2024);
        assert_eq!(years[2].total, 10.0);
    }

    #[test]
    fn test_yield_by_year_only_harvest_stage() {
        let mut flowering = harvest("T1", date(2024, 3, 1), Some(8.0));
        flowering.stage = Some(HarvestStage::PeakFlower);
        let mut unstaged = harvest("T1", date(2024, 4, 1), Some(8.0));
        unstaged.stage = None;
        let harvests = vec![
            flowering,
            unstaged,
            harvest("T1", date(2024, 6, 1), Some(10.0)),
        ];

        let years = yield_by_year(&harvests);
        assert_eq!(years.len(), 1);
        assert_eq!(years[0].total, 10.0);
    }

    #[test]
    fn test_growth_trend_means() {
        let growths = vec![
            growth("T1", date(2024, 3, 5), Some(2.0), Some(10.0)),
            growth("T2", date(2024, 3, 20), Some(3.0), None),
            growth("T1", date(2024, 4, 5), Some(2.5), Some(12.0)),
        ];

        let points = growth_trend(&growths);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].month, "Mar 2024");
        assert_eq!(points[0].avg_height, 2.5);
        // Only the first March record had a diameter.
        assert_eq!(points[0].avg_diameter, 10.0);
        assert_eq!(points[1].month, "Apr 2024");
    }

    #[test]
    fn test_growth_trend_diameter_zero_when_unmeasured() {
        let growths = vec![growth("T1", date(2024, 3, 5), Some(2.0), None)];
        let points = growth_trend(&growths);
        assert_eq!(points[0].avg_diameter, 0.0);
    }

    #[test]
    fn test_growth_trend_capped_at_twelve_months() {
        let mut growths = Vec::new();
        for m in 1..=12 {
            growths.push(growth("T1", date(2023, m, 1), Some(1.0), None));
        }
        for m in 1..=6 {
            growths.push(growth("T1", date(2024, m, 1), Some(2.0), None));
        }

        let points = growth_trend(&growths);
        assert_eq!(points.len(), 12);
        // The oldest six months fall off the front.
        assert_eq!(points[0].month, "Jul 2023");
        assert_eq!(points[11].month, "Jun 2024");
    }

    #[test]
    fn test_revenue_by_variety_colors_cycle() {
        let varieties = [
            Variety::MusangKing,
            Variety::Monthong,
            Variety::BlackThorn,
            Variety::D24,
            Variety::RedPrawn,
            Variety::Xo,
            Variety::GoldenPhoenix,
            Variety::Tekka,
        ];
        let trees: Vec<Tree> = varieties
            .iter()
            .enumerate()
            .map(|(i, v)| tree(&format!("T{i}"), *v))
            .collect();
        let harvests: Vec<HarvestRecord> = (0..8)
            .map(|i| {
                let mut h = harvest(&format!("T{i}"), date(2024, 6, 1), Some(10.0));
                h.total_revenue = Some(100.0);
                h
            })
            .collect();

        let slices = revenue_by_variety(&harvests, &trees);
        assert_eq!(slices.len(), 8);
        // The eighth slice wraps around the 7-color palette.
        assert_eq!(slices[7].color, slices[0].color);
        assert_eq!(slices[0].value, 100.0);
    }

    #[test]
    fn test_revenue_by_variety_rounds_to_cents() {
        let trees = vec![tree("T1", Variety::RedPrawn)];
        let mut h1 = harvest("T1", date(2024, 6, 1), Some(3.3));
        h1.total_revenue = Some(41.25);
        let mut h2 = harvest("T1", date(2024, 6, 2), Some(2.2));
        h2.total_revenue = Some(27.504);

        let slices = revenue_by_variety(&[h1, h2], &trees);
        assert_eq!(slices[0].value, 68.75);
    }

    #[test]
    fn test_dashboard_stats_empty() {
        let stats = dashboard_stats(&[], &[]);
        assert_eq!(stats.total_yield, 0.0);
        assert_eq!(stats.total_revenue, 0.0);
        assert_eq!(stats.avg_yield_per_tree, 0.0);
    }

    #[test]
    fn test_dashboard_stats() {
        let trees = vec![tree("T1", Variety::MusangKing), tree("T2", Variety::D24)];
        let mut flowering = harvest("T1", date(2024, 3, 1), Some(99.0));
        flowering.stage = Some(HarvestStage::FirstFlower);
        flowering.total_revenue = Some(10.0);
        let mut harvested = harvest("T1", date(2024, 6, 1), Some(30.0));
        harvested.total_revenue = Some(360.5);

        let stats = dashboard_stats(&[flowering, harvested], &trees);
        // Flowering-stage weight does not count toward yield, but its
        // revenue still counts.
        assert_eq!(stats.total_yield, 30.0);
        assert_eq!(stats.total_revenue, 370.5);
        assert_eq!(stats.avg_yield_per_tree, 15.0);
    }

    #[test]
    fn test_variety_distribution_counts_sum_to_tree_count() {
        let mut other = tree("T3", Variety::Other);
        other.variety_other = Some("Kan Yao".to_string());
        let trees = vec![
            tree("T1", Variety::MusangKing),
            tree("T2", Variety::MusangKing),
            other,
        ];

        let counts = variety_distribution(&trees);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), trees.len());
        assert_eq!(counts[0].name, "Musang King");
        assert_eq!(counts[1].name, "Kan Yao");
    }

    #[test]
    fn test_stage_distribution_uses_latest_record_per_tree() {
        let mut early = growth("T1", date(2024, 2, 1), None, None);
        early.growth_stage = Some(GrowthStage::Flowering);
        let mut late = growth("T1", date(2024, 5, 1), None, None);
        late.growth_stage = Some(GrowthStage::FruitSet);
        let mut other_tree = growth("T2", date(2024, 1, 1), None, None);
        other_tree.growth_stage = Some(GrowthStage::FruitSet);

        let counts = stage_distribution(&[early, late, other_tree]);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].stage, GrowthStage::FruitSet);
        assert_eq!(counts[0].count, 2);
    }

    #[test]
    fn test_average_age_years() {
        let mut t1 = tree("T1", Variety::D24);
        t1.planting_date = Some(date(2020, 6, 1));
        let mut t2 = tree("T2", Variety::D24);
        t2.planting_date = Some(date(2022, 6, 1));
        let undated = tree("T3", Variety::D24);

        let today = date(2024, 6, 1);
        // 48 and 24 months -> mean 36 months -> 3 years.
        assert_eq!(average_age_years(&[t1, t2, undated], today), 3.0);
        assert_eq!(average_age_years(&[], today), 0.0);
    }
}
