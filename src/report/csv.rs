//! CSV export of trees, harvests, and farms.
//!
//! The header row is plain; every data cell is quoted, matching the
//! spreadsheet-import conventions the farm office already uses.

use crate::store::FarmData;

/// Escape and quote one CSV cell.
fn cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn row(cells: &[String]) -> String {
    let mut line = cells
        .iter()
        .map(|c| cell(c))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

fn opt_num<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Tree list with block names resolved.
pub fn export_trees_csv(data: &FarmData) -> String {
    let mut out = String::from("Tree Code,Variety,Status,Planting Date,Block\n");

    for tree in &data.trees {
        let block_name = tree
            .block_id
            .as_deref()
            .and_then(|id| data.find_block(id))
            .map(|b| b.name.clone())
            .unwrap_or_default();
        out.push_str(&row(&[
            tree.tree_code.clone(),
            tree.variety_name(),
            tree.status.to_string(),
            opt_num(tree.planting_date),
            block_name,
        ]));
    }

    out
}

/// Harvest records with tree codes resolved (falling back to the raw
/// tree id when the tree is gone).
pub fn export_harvest_csv(data: &FarmData) -> String {
    let mut out = String::from("Date,Tree ID,Stage,Fruit Count,Weight (kg),Revenue\n");

    for record in &data.harvest_records {
        let tree_label = data
            .find_tree(&record.tree_id)
            .map(|t| t.tree_code.clone())
            .unwrap_or_else(|| record.tree_id.clone());
        out.push_str(&row(&[
            record.record_date.to_string(),
            tree_label,
            record.stage.map(|s| s.to_string()).unwrap_or_default(),
            opt_num(record.harvested_fruit_count),
            opt_num(record.total_weight_kg),
            opt_num(record.total_revenue),
        ]));
    }

    out
}

/// Farm summary.
pub fn export_farms_csv(data: &FarmData) -> String {
    let mut out = String::from("Name,Village,District,Province,Elevation\n");

    for farm in &data.farms {
        out.push_str(&row(&[
            farm.name.clone(),
            farm.village.clone().unwrap_or_default(),
            farm.district.clone().unwrap_or_default(),
            farm.province.clone().unwrap_or_default(),
            opt_num(farm.elevation),
        ]));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Block, HarvestRecord, HarvestStage, Tree, TreeStatus, Variety};
    use chrono::NaiveDate;

    fn sample_data() -> FarmData {
        let block = Block {
            id: "block-1".to_string(),
            farm_id: "farm-1".to_string(),
            name: "Block A".to_string(),
        };
        let tree = Tree {
            id: "tree-1".to_string(),
            tree_code: "A-001".to_string(),
            farm_id: "farm-1".to_string(),
            block_id: Some("block-1".to_string()),
            variety: Variety::Monthong,
            variety_other: None,
            planting_date: NaiveDate::from_ymd_opt(2021, 5, 10),
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
            record_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            stage: Some(HarvestStage::Harvest),
            estimated_fruit_count: None,
            harvested_fruit_count: Some(10),
            total_weight_kg: Some(25.5),
            grade_a_count: None,
            grade_b_count: None,
            grade_c_count: None,
            price_per_kg: None,
            total_revenue: None,
            notes: String::new(),
        };

        FarmData {
            blocks: vec![block],
            trees: vec![tree],
            harvest_records: vec![harvest],
            ..FarmData::default()
        }
    }

    #[test]
    fn test_export_trees_csv() {
        let csv = export_trees_csv(&sample_data());
        let mut lines = csv.lines();
        // Header row is unquoted; data cells are quoted.
        assert_eq!(
            lines.next(),
            Some("Tree Code,Variety,Status,Planting Date,Block")
        );
        assert_eq!(
            lines.next(),
            Some("\"A-001\",\"Monthong\",\"Active\",\"2021-05-10\",\"Block A\"")
        );
    }

    #[test]
    fn test_export_harvest_csv_header() {
        let csv = export_harvest_csv(&sample_data());
        assert_eq!(
            csv.lines().next(),
            Some("Date,Tree ID,Stage,Fruit Count,Weight (kg),Revenue")
        );
    }

    #[test]
    fn test_export_harvest_csv_resolves_tree_code() {
        let csv = export_harvest_csv(&sample_data());
        assert!(csv.contains("\"A-001\""));
        assert!(csv.contains("\"25.5\""));
    }

    #[test]
    fn test_export_harvest_csv_falls_back_to_raw_id() {
        let mut data = sample_data();
        data.trees.clear();
        let csv = export_harvest_csv(&data);
        assert!(csv.contains("\"tree-1\""));
    }

    #[test]
    fn test_cell_escapes_quotes() {
        assert_eq!(cell("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
