//! Chart series for the progress page

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::resource::{Measurement, MeasurementType};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// All points of one measurement type, oldest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub measurement_type: MeasurementType,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// Values lined up against a shared label axis; `None` where this
    /// series has no point on that date
    pub fn aligned(&self, labels: &[NaiveDate]) -> Vec<Option<f64>> {
        labels
            .iter()
            .map(|label| {
                self.points
                    .iter()
                    .rev()
                    .find(|p| p.date == *label)
                    .map(|p| p.value)
            })
            .collect()
    }

    /// First and latest points with the change between them
    pub fn summary(&self) -> Option<SeriesSummary> {
        let first = *self.points.first()?;
        let latest = *self.points.last()?;
        Some(SeriesSummary {
            measurement_type: self.measurement_type,
            first,
            latest,
            change: latest.value - first.value,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub measurement_type: MeasurementType,
    pub first: ChartPoint,
    pub latest: ChartPoint,
    pub change: f64,
}

/// Label axis plus one series per measurement type present
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    /// Every date with at least one point, ascending and de-duplicated
    pub labels: Vec<NaiveDate>,
    /// Ordered by measurement type
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    pub fn series_for(&self, measurement_type: MeasurementType) -> Option<&ChartSeries> {
        self.series
            .iter()
            .find(|s| s.measurement_type == measurement_type)
    }

    pub fn summaries(&self) -> Vec<SeriesSummary> {
        self.series.iter().filter_map(ChartSeries::summary).collect()
    }
}

/// Group by type, order each group by date ascending and merge the dates
/// into one label axis. Points sharing a date keep their input order.
pub fn build_chart<'a, I>(measurements: I) -> ChartData
where
    I: IntoIterator<Item = &'a Measurement>,
{
    let mut groups: BTreeMap<MeasurementType, Vec<ChartPoint>> = BTreeMap::new();
    let mut labels = BTreeSet::new();

    for m in measurements {
        labels.insert(m.date);
        groups.entry(m.measurement_type).or_default().push(ChartPoint {
            date: m.date,
            value: m.value,
        });
    }

    let series = groups
        .into_iter()
        .map(|(measurement_type, mut points)| {
            points.sort_by_key(|p| p.date);
            ChartSeries {
                measurement_type,
                points,
            }
        })
        .collect();

    ChartData {
        labels: labels.into_iter().collect(),
        series,
    }
}
