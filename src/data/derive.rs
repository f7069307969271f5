use crate::config::CostRates;

use super::model::{CostMetrics, DerivedDataset, DerivedRecord, WellDataset, WellRecord};

// ---------------------------------------------------------------------------
// Metric derivation
// ---------------------------------------------------------------------------

/// `numerator / divisor`, or `None` when the divisor is zero or the result
/// is not a finite number.
fn ratio(numerator: f64, divisor: f64) -> Option<f64> {
    if divisor == 0.0 {
        return None;
    }
    let q = numerator / divisor;
    q.is_finite().then_some(q)
}

/// Compute the six cost columns for one record.
pub fn cost_metrics(record: &WellRecord, rates: &CostRates) -> CostMetrics {
    let mud_cost = record.total_dil * rates.mud_cost_per_bbl;
    let haul_off_cost = record.haul_off * rates.haul_off_cost_per_bbl;
    let cumulative_cost = mud_cost + haul_off_cost;

    CostMetrics {
        mud_cost,
        haul_off_cost,
        dilution_cost_per_foot: ratio(mud_cost, record.int_length),
        haul_off_cost_per_foot: ratio(haul_off_cost, record.int_length),
        cumulative_cost,
        cost_per_day: ratio(cumulative_cost, record.dow),
    }
}

/// Augment every record with its cost metrics. Row order is preserved and no
/// rows are added or dropped.
pub fn derive(dataset: &WellDataset, rates: &CostRates) -> DerivedDataset {
    let rows = dataset
        .records
        .iter()
        .map(|record| DerivedRecord {
            record: record.clone(),
            metrics: cost_metrics(record, rates),
        })
        .collect();
    DerivedDataset::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well(id: &str, dil: f64, haul: f64, len: f64, dow: f64) -> WellRecord {
        WellRecord {
            well_job_id: id.to_string(),
            operator: Some("OpA".into()),
            contractor: Some("C1".into()),
            total_dil: dil,
            haul_off: haul,
            int_length: len,
            dow,
        }
    }

    #[test]
    fn reference_well_metrics() {
        let m = cost_metrics(&well("W1", 10.0, 5.0, 100.0, 2.0), &CostRates::default());
        assert_eq!(m.mud_cost, 1000.0);
        assert_eq!(m.haul_off_cost, 100.0);
        assert_eq!(m.dilution_cost_per_foot, Some(10.0));
        assert_eq!(m.haul_off_cost_per_foot, Some(1.0));
        assert_eq!(m.cumulative_cost, 1100.0);
        assert_eq!(m.cost_per_day, Some(550.0));
    }

    #[test]
    fn zero_interval_length_nulls_per_foot_metrics() {
        let m = cost_metrics(&well("W0", 10.0, 5.0, 0.0, 2.0), &CostRates::default());
        assert_eq!(m.dilution_cost_per_foot, None);
        assert_eq!(m.haul_off_cost_per_foot, None);
        assert_eq!(m.cumulative_cost, 1100.0);
        assert_eq!(m.cost_per_day, Some(550.0));
    }

    #[test]
    fn zero_days_on_well_nulls_cost_per_day() {
        let m = cost_metrics(&well("W0", 10.0, 5.0, 100.0, 0.0), &CostRates::default());
        assert_eq!(m.cost_per_day, None);
        assert_eq!(m.dilution_cost_per_foot, Some(10.0));
    }

    #[test]
    fn metric_identities_hold_for_every_row() {
        let dataset = WellDataset {
            records: vec![
                well("A", 12.3, 4.56, 789.0, 3.0),
                well("B", 0.0, 0.0, 1.0, 1.0),
                well("C", 1e6, 2.5e5, 0.3, 17.0),
                well("D", 7.7, 1.1, -40.0, 0.5),
            ],
        };
        let derived = derive(&dataset, &CostRates::default());
        assert_eq!(derived.len(), dataset.len());

        for (row, input) in derived.rows.iter().zip(&dataset.records) {
            let m = row.metrics;
            assert_eq!(&row.record, input);
            assert_eq!(m.cumulative_cost, m.mud_cost + m.haul_off_cost);
            assert_eq!(m.dilution_cost_per_foot, Some(m.mud_cost / input.int_length));
            assert_eq!(m.haul_off_cost_per_foot, Some(m.haul_off_cost / input.int_length));
            assert_eq!(m.cost_per_day, Some(m.cumulative_cost / input.dow));
        }
    }

    #[test]
    fn custom_rates_are_applied() {
        let rates = CostRates {
            mud_cost_per_bbl: 50.0,
            haul_off_cost_per_bbl: 10.0,
        };
        let m = cost_metrics(&well("W1", 10.0, 5.0, 100.0, 2.0), &rates);
        assert_eq!(m.mud_cost, 500.0);
        assert_eq!(m.haul_off_cost, 50.0);
    }

    #[test]
    fn selector_menus_skip_nulls() {
        let mut orphan = well("X", 1.0, 1.0, 1.0, 1.0);
        orphan.operator = None;
        let dataset = WellDataset {
            records: vec![
                well("A", 1.0, 1.0, 1.0, 1.0),
                orphan,
                WellRecord {
                    operator: Some("OpB".into()),
                    contractor: None,
                    ..well("B", 1.0, 1.0, 1.0, 1.0)
                },
            ],
        };
        let derived = derive(&dataset, &CostRates::default());
        assert_eq!(
            derived.operators.iter().collect::<Vec<_>>(),
            vec!["OpA", "OpB"]
        );
        assert_eq!(derived.contractors.iter().collect::<Vec<_>>(), vec!["C1"]);
    }
}
