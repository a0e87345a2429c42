//! Presentation mapping: list rows and pie geometry for a set of segments.
//!
//! Nothing here draws; the terminal renderer in the `revseg` binary (or any other
//! consumer) turns these records into output.

use crate::schema::{Segment, SegmentId};
use serde::Serialize;

pub const INNER_RADIUS: f64 = 0.5;
pub const OUTER_RADIUS: f64 = 1.0;
pub const EMPHASIZED_OUTER_RADIUS: f64 = 1.2;

/// One line of the textual list, e.g. `iPhone    $200.50`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ListRow {
    pub category: String,
    pub amount: String,
}

/// One sector of the pie; angles are degrees, clockwise from 0.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PieSector {
    pub id: SegmentId,
    pub category: String,
    pub value: f64,
    pub share: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub emphasized: bool,
}

/// Format an amount as `$` plus two decimals, without grouping.
pub fn format_currency(value: f64) -> String {
    format!("${value:.2}")
}

pub fn list_rows(segments: &[Segment]) -> Vec<ListRow> {
    segments
        .iter()
        .map(|segment| ListRow {
            category: segment.category.clone(),
            amount: format_currency(segment.value),
        })
        .collect()
}

/// The segment drawn with the larger radius.
///
/// Ties on the maximum value go to the first segment in sequence order.
pub fn emphasized(segments: &[Segment]) -> Option<&Segment> {
    segments.iter().fold(None, |best: Option<&Segment>, segment| match best {
        Some(current) if segment.value <= current.value => Some(current),
        _ => Some(segment),
    })
}

/// Sum of all segment values.
pub fn total(segments: &[Segment]) -> f64 {
    segments.iter().map(|segment| segment.value).sum()
}

/// Sector geometry, in segment order. Sectors are contiguous; the last one closes at 360.
///
/// Sectors are sized by the positive part of each value, so a negative segment keeps its
/// list row but gets a zero-width sector. No positive values at all gives zero-width
/// sectors throughout rather than NaN.
pub fn pie(segments: &[Segment]) -> Vec<PieSector> {
    let total: f64 = segments.iter().map(|segment| segment.value.max(0.0)).sum();
    let emphasized_id = emphasized(segments).map(|segment| segment.id);

    let mut angle = 0.0;
    segments
        .iter()
        .map(|segment| {
            let share = if total > 0.0 {
                segment.value.max(0.0) / total
            } else {
                0.0
            };
            let start_angle = angle;
            angle += share * 360.0;
            let emphasized = Some(segment.id) == emphasized_id;
            PieSector {
                id: segment.id,
                category: segment.category.clone(),
                value: segment.value,
                share,
                start_angle,
                end_angle: angle,
                inner_radius: INNER_RADIUS,
                outer_radius: if emphasized {
                    EMPHASIZED_OUTER_RADIUS
                } else {
                    OUTER_RADIUS
                },
                emphasized,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(pairs: &[(&str, f64)]) -> Vec<Segment> {
        pairs
            .iter()
            .map(|(category, value)| Segment::new(*category, *value))
            .collect()
    }

    #[test]
    fn largest_segment_is_emphasized() {
        let s = segments(&[("A", 10.0), ("B", 30.0), ("C", 5.0)]);
        assert_eq!(emphasized(&s).unwrap().category, "B");

        let sectors = pie(&s);
        let big: Vec<_> = sectors.iter().filter(|p| p.emphasized).collect();
        assert_eq!(big.len(), 1);
        assert_eq!(big[0].category, "B");
        assert_eq!(big[0].outer_radius, EMPHASIZED_OUTER_RADIUS);
        assert!(sectors
            .iter()
            .filter(|p| !p.emphasized)
            .all(|p| p.outer_radius == OUTER_RADIUS));
    }

    #[test]
    fn tie_goes_to_first_in_order() {
        let s = segments(&[("A", 10.0), ("B", 10.0)]);
        assert_eq!(emphasized(&s).unwrap().category, "A");

        let s = segments(&[("B", 10.0), ("A", 10.0)]);
        assert_eq!(emphasized(&s).unwrap().category, "B");
    }

    #[test]
    fn no_segments_no_emphasis() {
        assert!(emphasized(&[]).is_none());
        assert!(pie(&[]).is_empty());
    }

    #[test]
    fn sectors_are_contiguous_and_close_the_circle() {
        let s = segments(&[("A", 1.0), ("B", 2.0), ("C", 1.0)]);
        let sectors = pie(&s);

        assert_eq!(sectors[0].start_angle, 0.0);
        for pair in sectors.windows(2) {
            assert_eq!(pair[0].end_angle, pair[1].start_angle);
        }
        assert!((sectors[2].end_angle - 360.0).abs() < 1e-9);
        assert!((sectors[1].share - 0.5).abs() < 1e-12);
        assert!(sectors.iter().all(|p| p.inner_radius == INNER_RADIUS));
    }

    #[test]
    fn zero_total_gives_zero_width_sectors() {
        let s = segments(&[("A", 0.0), ("B", 0.0)]);
        let sectors = pie(&s);
        assert!(sectors.iter().all(|p| p.share == 0.0 && !p.end_angle.is_nan()));
        // still one emphasized sector
        assert_eq!(sectors.iter().filter(|p| p.emphasized).count(), 1);
        assert!(sectors[0].emphasized);
    }

    #[test]
    fn negative_values_get_zero_width_sectors() {
        let s = segments(&[("A", 10.0), ("B", -5.0), ("C", 30.0)]);
        let sectors = pie(&s);

        assert_eq!(sectors.len(), 3);
        assert!(sectors.iter().all(|p| (0.0..=1.0).contains(&p.share)));
        assert!(sectors
            .iter()
            .all(|p| p.start_angle >= 0.0 && p.end_angle <= 360.0 + 1e-9));
        assert!(sectors.iter().all(|p| p.start_angle <= p.end_angle));
        for pair in sectors.windows(2) {
            assert_eq!(pair[0].end_angle, pair[1].start_angle);
        }

        assert_eq!(sectors[1].share, 0.0);
        assert_eq!(sectors[1].start_angle, sectors[1].end_angle);
        assert!((sectors[0].share - 0.25).abs() < 1e-12);
        assert!((sectors[2].end_angle - 360.0).abs() < 1e-9);
        assert!(sectors[2].emphasized);
        // the row is still listed, with its signed amount
        assert_eq!(list_rows(&s)[1].amount, "$-5.00");
    }

    #[test]
    fn only_negative_values_give_zero_width_sectors() {
        let sectors = pie(&segments(&[("A", -1.0), ("B", -2.0)]));
        assert!(sectors
            .iter()
            .all(|p| p.share == 0.0 && p.start_angle == 0.0 && p.end_angle == 0.0));
    }

    #[test]
    fn list_rows_use_two_decimal_dollars() {
        let s = segments(&[("iPhone", 200.5), ("Services", 85.234), ("Other", -3.0)]);
        let rows = list_rows(&s);
        assert_eq!(rows[0].amount, "$200.50");
        assert_eq!(rows[1].amount, "$85.23");
        assert_eq!(rows[2].amount, "$-3.00");
        assert_eq!(format_currency(201183000000.0), "$201183000000.00");
    }

    #[test]
    fn total_sums_values() {
        let s = segments(&[("A", 10.0), ("B", 30.0), ("C", 5.0)]);
        assert_eq!(total(&s), 45.0);
    }
}
