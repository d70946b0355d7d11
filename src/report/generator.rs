//! Markdown and JSON farm report generation.
//!
//! A report is a snapshot of the analytics over the whole dataset,
//! assembled once and then rendered in the requested format and
//! locale.

use crate::analytics::{
    average_age_years, dashboard_stats, growth_trend, revenue_by_variety, stage_distribution,
    variety_distribution, yield_by_variety, yield_by_year, DashboardStats, GrowthTrendPoint,
    RevenueSlice, StageCount, VarietyCount, VarietyYield, YearlyYield,
};
use crate::config::ReportConfig;
use crate::i18n::Strings;
use crate::models::{TaskState, TreeStatus};
use crate::schedule::{classify_for_dashboard, task_counts, DashboardStatus, TaskCounts};
use crate::store::FarmData;
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

/// Metadata about the report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub farm_name: String,
    pub generated_on: NaiveDate,
    pub tree_count: usize,
    pub active_trees: usize,
    pub sick_trees: usize,
    pub average_age_years: f64,
}

/// One upcoming task line in the report.
#[derive(Debug, Clone, Serialize)]
pub struct TaskLine {
    pub title: String,
    pub task_type: String,
    pub due_date: NaiveDate,
    pub bucket: DashboardStatus,
}

/// The complete farm report.
#[derive(Debug, Clone, Serialize)]
pub struct FarmReport {
    pub metadata: ReportMetadata,
    pub stats: DashboardStats,
    pub yield_by_variety: Vec<VarietyYield>,
    pub yield_by_year: Vec<YearlyYield>,
    pub revenue_by_variety: Vec<RevenueSlice>,
    pub variety_distribution: Vec<VarietyCount>,
    pub stage_distribution: Vec<StageCount>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub growth_trend: Vec<GrowthTrendPoint>,
    pub task_counts: TaskCounts,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub upcoming_tasks: Vec<TaskLine>,
}

/// Assemble a report from the full dataset as of `today`.
pub fn build_report(data: &FarmData, config: &ReportConfig, today: NaiveDate) -> FarmReport {
    let trees = &data.trees;
    let harvests = &data.harvest_records;

    let active_trees = trees
        .iter()
        .filter(|t| t.status == TreeStatus::Active)
        .count();
    let sick_trees = trees.iter().filter(|t| t.status == TreeStatus::Sick).count();

    let metadata = ReportMetadata {
        farm_name: data
            .farms
            .first()
            .map(|f| f.name.clone())
            .unwrap_or_else(|| "Durian Farm".to_string()),
        generated_on: today,
        tree_count: trees.len(),
        active_trees,
        sick_trees,
        average_age_years: average_age_years(trees, today),
    };

    let mut upcoming: Vec<TaskLine> = Vec::new();
    if config.include_tasks {
        let mut pending: Vec<_> = data
            .tasks
            .iter()
            .filter(|t| t.status == TaskState::Pending)
            .collect();
        pending.sort_by_key(|t| t.due_date);
        upcoming = pending
            .into_iter()
            .take(config.max_tasks)
            .map(|t| TaskLine {
                title: t.title.clone(),
                task_type: t.task_type.to_string(),
                due_date: t.due_date,
                bucket: classify_for_dashboard(t.due_date, today),
            })
            .collect();
    }

    FarmReport {
        metadata,
        stats: dashboard_stats(harvests, trees),
        yield_by_variety: yield_by_variety(harvests, trees),
        yield_by_year: yield_by_year(harvests),
        revenue_by_variety: revenue_by_variety(harvests, trees),
        variety_distribution: variety_distribution(trees),
        stage_distribution: stage_distribution(&data.growth_records),
        growth_trend: if config.include_growth {
            growth_trend(&data.growth_records)
        } else {
            Vec::new()
        },
        task_counts: task_counts(&data.tasks, today),
        upcoming_tasks: upcoming,
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &FarmReport, strings: &Strings) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", report.metadata.farm_name));
    output.push_str(&generate_overview_section(report, strings));
    output.push_str(&generate_yield_section(report, strings));
    output.push_str(&generate_revenue_section(report, strings));
    output.push_str(&generate_growth_section(report, strings));
    output.push_str(&generate_tasks_section(report, strings));
    output.push_str(&generate_footer(report));

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &FarmReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn generate_overview_section(report: &FarmReport, strings: &Strings) -> String {
    let mut section = String::new();
    let m = &report.metadata;

    section.push_str(&format!("## {}\n\n", strings.farm_overview));
    section.push_str(&format!("- **{}:** {}\n", strings.total_trees, m.tree_count));
    section.push_str(&format!(
        "- **{}:** {}\n",
        strings.active_trees, m.active_trees
    ));
    section.push_str(&format!("- **{}:** {}\n", strings.sick_trees, m.sick_trees));
    section.push_str(&format!(
        "- **{}:** {} {}\n",
        strings.average_age, m.average_age_years, strings.years
    ));
    section.push('\n');

    if !report.variety_distribution.is_empty() {
        section.push_str(&format!("### {}\n\n", strings.trees_by_variety));
        for entry in &report.variety_distribution {
            section.push_str(&format!("- {}: {}\n", entry.name, entry.count));
        }
        section.push('\n');
    }

    if !report.stage_distribution.is_empty() {
        section.push_str(&format!("### {}\n\n", strings.growth_stages));
        for entry in &report.stage_distribution {
            section.push_str(&format!("- {}: {}\n", entry.stage, entry.count));
        }
        section.push('\n');
    }

    section
}

fn generate_yield_section(report: &FarmReport, strings: &Strings) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", strings.total_harvest));
    section.push_str(&format!(
        "- **{}:** {} kg\n",
        strings.total_harvest, report.stats.total_yield
    ));
    section.push_str(&format!(
        "- **{}:** {} kg\n\n",
        strings.avg_yield_per_tree, report.stats.avg_yield_per_tree
    ));

    if !report.yield_by_variety.is_empty() {
        section.push_str(&format!(
            "### {} {}\n\n",
            strings.total_harvest, strings.per_variety
        ));
        section.push_str("| Variety | Total (kg) | Average (kg) |\n");
        section.push_str("|---------|-----------:|-------------:|\n");
        for entry in &report.yield_by_variety {
            section.push_str(&format!(
                "| {} | {} | {} |\n",
                entry.name, entry.total, entry.average
            ));
        }
        section.push('\n');
    }

    if !report.yield_by_year.is_empty() {
        section.push_str(&format!(
            "### {} {}\n\n",
            strings.total_harvest, strings.per_year
        ));
        section.push_str("| Year | Total (kg) |\n");
        section.push_str("|------|-----------:|\n");
        for entry in &report.yield_by_year {
            section.push_str(&format!("| {} | {} |\n", entry.year, entry.total));
        }
        section.push('\n');
    }

    section
}

fn generate_revenue_section(report: &FarmReport, strings: &Strings) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", strings.total_revenue));
    section.push_str(&format!("- **Total:** ${}\n\n", report.stats.total_revenue));

    if !report.revenue_by_variety.is_empty() {
        section.push_str(&format!(
            "### {} {}\n\n",
            strings.total_revenue, strings.per_variety
        ));
        for entry in &report.revenue_by_variety {
            section.push_str(&format!("- {}: ${}\n", entry.name, entry.value));
        }
        section.push('\n');
    }

    section
}

fn generate_growth_section(report: &FarmReport, strings: &Strings) -> String {
    if report.growth_trend.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str(&format!("## {}\n\n", strings.growth_trend));
    section.push_str("| Month | Avg Height (m) | Avg Diameter (cm) |\n");
    section.push_str("|-------|---------------:|------------------:|\n");
    for point in &report.growth_trend {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            point.month, point.avg_height, point.avg_diameter
        ));
    }
    section.push('\n');

    section
}

fn generate_tasks_section(report: &FarmReport, strings: &Strings) -> String {
    let mut section = String::new();
    let counts = &report.task_counts;

    section.push_str(&format!("## {}\n\n", strings.task_schedule));
    section.push_str(&format!("- **{}:** {}\n", strings.overdue, counts.overdue));
    section.push_str(&format!("- **{}:** {}\n", strings.pending, counts.pending));
    section.push_str(&format!(
        "- **{}:** {}\n\n",
        strings.completed, counts.completed
    ));

    section.push_str(&format!("### {}\n\n", strings.upcoming_tasks));
    if report.upcoming_tasks.is_empty() {
        section.push_str(&format!("{}\n\n", strings.no_tasks));
    } else {
        for task in &report.upcoming_tasks {
            section.push_str(&format!(
                "- [{}] {} - {} ({})\n",
                task.bucket, task.title, task.due_date, task.task_type
            ));
        }
        section.push('\n');
    }

    section
}

fn generate_footer(report: &FarmReport) -> String {
    format!(
        "---\n\n*Generated by DurianTrack on {}*\n",
        report.metadata.generated_on
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use crate::models::{
        HarvestRecord, HarvestStage, TaskSchedule, TaskType, Tree, TreeStatus, Variety,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_data() -> FarmData {
        let tree = Tree {
            id: "tree-1".to_string(),
            tree_code: "A-001".to_string(),
            farm_id: "farm-1".to_string(),
            block_id: None,
            variety: Variety::MusangKing,
            variety_other: None,
            planting_date: Some(date(2020, 6, 1)),
            rootstock_type: None,
            row_spacing: None,
            tree_spacing: None,
            status: TreeStatus::Active,
            gps_lat: None,
            gps_lng: None,
            notes: String::new(),
        };
        let harvest = HarvestRecord {
            tree_id: "tree-1".to_string(),
            farm_id: None,
            record_date: date(2024, 6, 1),
            stage: Some(HarvestStage::Harvest),
            estimated_fruit_count: None,
            harvested_fruit_count: Some(12),
            total_weight_kg: Some(30.0),
            grade_a_count: None,
            grade_b_count: None,
            grade_c_count: None,
            price_per_kg: Some(18.0),
            total_revenue: Some(540.0),
            notes: String::new(),
        };
        let task = TaskSchedule {
            id: "task-1".to_string(),
            farm_id: None,
            tree_id: None,
            block_id: None,
            task_type: TaskType::Fertilizer,
            title: "Fertilize block A".to_string(),
            description: String::new(),
            due_date: date(2024, 6, 20),
            repeat_interval_days: None,
            status: TaskState::Pending,
            completed_date: None,
        };

        FarmData {
            trees: vec![tree],
            harvest_records: vec![harvest],
            tasks: vec![task],
            ..FarmData::default()
        }
    }

    #[test]
    fn test_build_report() {
        let data = sample_data();
        let report = build_report(&data, &ReportConfig::default(), date(2024, 6, 12));

        assert_eq!(report.metadata.tree_count, 1);
        assert_eq!(report.metadata.active_trees, 1);
        assert_eq!(report.stats.total_yield, 30.0);
        assert_eq!(report.stats.total_revenue, 540.0);
        assert_eq!(report.yield_by_variety[0].name, "Musang King");
        assert_eq!(report.task_counts.pending, 1);
        assert_eq!(report.upcoming_tasks.len(), 1);
    }

    #[test]
    fn test_build_report_empty_data() {
        let report = build_report(
            &FarmData::default(),
            &ReportConfig::default(),
            date(2024, 6, 12),
        );

        assert_eq!(report.metadata.farm_name, "Durian Farm");
        assert_eq!(report.stats.total_yield, 0.0);
        assert!(report.yield_by_variety.is_empty());
        assert!(report.upcoming_tasks.is_empty());
    }

    #[test]
    fn test_markdown_report_localized() {
        let data = sample_data();
        let report = build_report(&data, &ReportConfig::default(), date(2024, 6, 12));

        let en = generate_markdown_report(&report, Locale::En.strings());
        assert!(en.contains("## Farm Overview"));
        assert!(en.contains("Musang King"));

        let ms = generate_markdown_report(&report, Locale::Ms.strings());
        assert!(ms.contains("## Ringkasan Ladang"));
        assert!(ms.contains("Jumlah Pokok"));
    }

    #[test]
    fn test_json_report_is_valid() {
        let data = sample_data();
        let report = build_report(&data, &ReportConfig::default(), date(2024, 6, 12));

        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["stats"]["total_yield"], 30.0);
        // Due the 20th, a week past the 12th.
        assert_eq!(value["upcoming_tasks"][0]["bucket"], "later");
    }

    #[test]
    fn test_report_respects_max_tasks() {
        let mut data = sample_data();
        for i in 2..=15 {
            let mut task = data.tasks[0].clone();
            task.id = format!("task-{i}");
            task.due_date = date(2024, 7, i as u32);
            data.tasks.push(task);
        }

        let config = ReportConfig {
            max_tasks: 5,
            ..ReportConfig::default()
        };
        let report = build_report(&data, &config, date(2024, 6, 12));
        assert_eq!(report.upcoming_tasks.len(), 5);
    }
}
