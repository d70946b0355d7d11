//! Report localization.
//!
//! The locale is explicit configuration resolved once per command and
//! passed down; there is no ambient language state. English and Malay,
//! the two languages the farm crews use.

use serde::{Deserialize, Serialize};

/// Supported display languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ms,
}

/// Fixed label set for one locale.
#[derive(Debug)]
pub struct Strings {
    pub farm_overview: &'static str,
    pub total_trees: &'static str,
    pub active_trees: &'static str,
    pub sick_trees: &'static str,
    pub average_age: &'static str,
    pub years: &'static str,
    pub trees_by_variety: &'static str,
    pub growth_stages: &'static str,
    pub total_harvest: &'static str,
    pub per_variety: &'static str,
    pub per_year: &'static str,
    pub total_revenue: &'static str,
    pub avg_yield_per_tree: &'static str,
    pub growth_trend: &'static str,
    pub task_schedule: &'static str,
    pub upcoming_tasks: &'static str,
    pub no_tasks: &'static str,
    pub overdue: &'static str,
    pub pending: &'static str,
    pub completed: &'static str,
}

const EN: Strings = Strings {
    farm_overview: "Farm Overview",
    total_trees: "Total Trees",
    active_trees: "Active Trees",
    sick_trees: "Sick Trees",
    average_age: "Average Age",
    years: "years",
    trees_by_variety: "Trees by Variety",
    growth_stages: "Growth Stages",
    total_harvest: "Total Harvest",
    per_variety: "per Variety",
    per_year: "per Year",
    total_revenue: "Total Revenue",
    avg_yield_per_tree: "Avg Yield per Tree",
    growth_trend: "Growth Trend",
    task_schedule: "Task Schedule",
    upcoming_tasks: "Upcoming Tasks",
    no_tasks: "No upcoming tasks",
    overdue: "Overdue",
    pending: "Pending",
    completed: "Completed",
};

const MS: Strings = Strings {
    farm_overview: "Ringkasan Ladang",
    total_trees: "Jumlah Pokok",
    active_trees: "Pokok Aktif",
    sick_trees: "Pokok Sakit",
    average_age: "Umur Purata",
    years: "tahun",
    trees_by_variety: "Pokok mengikut Varieti",
    growth_stages: "Peringkat Pertumbuhan",
    total_harvest: "Jumlah Tuaian",
    per_variety: "mengikut Varieti",
    per_year: "mengikut Tahun",
    total_revenue: "Jumlah Pendapatan",
    avg_yield_per_tree: "Purata Hasil per Pokok",
    growth_trend: "Arah Pertumbuhan",
    task_schedule: "Jadual Tugasan",
    upcoming_tasks: "Tugasan Akan Datang",
    no_tasks: "Tiada tugasan akan datang",
    overdue: "Tertunggak",
    pending: "Belum Selesai",
    completed: "Selesai",
};

impl Locale {
    /// The label set for this locale.
    pub fn strings(&self) -> &'static Strings {
        match self {
            Locale::En => &EN,
            Locale::Ms => &MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_strings() {
        assert_eq!(Locale::En.strings().total_trees, "Total Trees");
        assert_eq!(Locale::Ms.strings().total_trees, "Jumlah Pokok");
    }

    #[test]
    fn test_locale_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Locale::Ms).unwrap(), "\"ms\"");
        let l: Locale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(l, Locale::En);
    }
}
