//! Record-list validation.
//!
//! Checks exported or hand-written annotation records before they are fed
//! to a batch render:
//! - Identity (unique, non-empty identifiers)
//! - Tags (non-empty ids and display names)
//! - Geometry (finite, ordered, non-degenerate, consistent units, in range)

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::HashMap;

use crate::model::{AnnotationRecord, OwnerId, Position, Size, Unit};

/// Tolerance for percentages just outside `[0, 100]` and pixel edges just
/// past the surface.
const RANGE_TOLERANCE: f64 = 0.001;

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// Surface size to check pixel positions against, when known.
    pub surface: Option<Size>,
}

/// Validates a record list and returns a report of all issues found.
pub fn validate_records(records: &[AnnotationRecord], opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();
    let mut seen_ids: HashMap<&OwnerId, usize> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        let context = IssueContext::Record {
            index,
            identifier: record.identifier.clone(),
        };

        if record.identifier.as_str().is_empty() {
            report.add(ValidationIssue::error(
                IssueCode::EmptyIdentifier,
                "Empty identifier",
                context.clone(),
            ));
        } else if let Some(first) = seen_ids.get(&record.identifier) {
            report.add(ValidationIssue::error(
                IssueCode::DuplicateIdentifier,
                format!(
                    "Duplicate identifier {} (first seen at index {})",
                    record.identifier, first
                ),
                context.clone(),
            ));
        } else {
            seen_ids.insert(&record.identifier, index);
        }

        if record.tag_id.as_str().is_empty() {
            report.add(ValidationIssue::error(
                IssueCode::EmptyTagId,
                "Empty tag id",
                context.clone(),
            ));
        }
        if record.tag_name.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyTagName,
                "Empty tag display name",
                context.clone(),
            ));
        }

        validate_position(&record.position, opts, &context, &mut report);
    }

    report
}

fn validate_position(
    position: &Position,
    opts: &ValidateOptions,
    context: &IssueContext,
    report: &mut ValidationReport,
) {
    let (x, y, x1, y1) = (
        position.x.value,
        position.y.value,
        position.x1.value,
        position.y1.value,
    );

    if !position.is_finite() {
        report.add(ValidationIssue::error(
            IssueCode::NonFiniteCoordinate,
            format!("Non-finite coordinates ({}, {}, {}, {})", x, y, x1, y1),
            context.clone(),
        ));
        // Nothing else about the geometry is meaningful.
        return;
    }

    if !position.has_uniform_unit() {
        report.add(ValidationIssue::warning(
            IssueCode::MixedUnits,
            format!(
                "Mixed units; all four coordinates are read as {}",
                unit_name(position.unit())
            ),
            context.clone(),
        ));
    }

    if !position.is_ordered() {
        report.add(ValidationIssue::error(
            IssueCode::InvertedPosition,
            format!(
                "Invalid ordering: ({}, {}) should be <= ({}, {})",
                position.x, position.y, position.x1, position.y1
            ),
            context.clone(),
        ));
    } else if position.width() <= 1.0 || position.height() <= 1.0 {
        report.add(ValidationIssue::warning(
            IssueCode::DegeneratePosition,
            format!(
                "Extent {}x{} {} does not exceed 1 on both axes",
                position.width(),
                position.height(),
                unit_name(position.unit())
            ),
            context.clone(),
        ));
    }

    match position.unit() {
        Unit::Percent => {
            let out_of_range = [x, y, x1, y1]
                .iter()
                .any(|v| *v < -RANGE_TOLERANCE || *v > 100.0 + RANGE_TOLERANCE);
            if out_of_range {
                report.add(ValidationIssue::error(
                    IssueCode::PercentOutOfRange,
                    format!(
                        "Position ({}, {}, {}, {}) leaves the surface",
                        position.x, position.y, position.x1, position.y1
                    ),
                    context.clone(),
                ));
            }
        }
        Unit::Pixel => {
            if let Some(size) = opts.surface {
                if x < -RANGE_TOLERANCE
                    || y < -RANGE_TOLERANCE
                    || x1 > size.width + RANGE_TOLERANCE
                    || y1 > size.height + RANGE_TOLERANCE
                {
                    report.add(ValidationIssue::error(
                        IssueCode::PixelOutOfBounds,
                        format!(
                            "Rectangle ({:.1}, {:.1}, {:.1}, {:.1}) extends outside surface (0, 0, {}, {})",
                            x, y, x1, y1, size.width, size.height
                        ),
                        context.clone(),
                    ));
                }
            }
        }
    }
}

fn unit_name(unit: Unit) -> &'static str {
    match unit {
        Unit::Pixel => "pixels",
        Unit::Percent => "percent",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coord, Rect, Tag};

    fn record(id: &str, x: f64, y: f64, x1: f64, y1: f64) -> AnnotationRecord {
        AnnotationRecord::new(
            OwnerId::new(id),
            Tag::new("cat", "Cat"),
            Position::from_percent(Rect::from_xyxy(x, y, x1, y1)),
        )
    }

    fn valid_records() -> Vec<AnnotationRecord> {
        vec![
            record("a", 10.0, 10.0, 30.0, 30.0),
            record("b", 50.0, 20.0, 90.0, 80.0),
        ]
    }

    #[test]
    fn test_valid_records() {
        let report = validate_records(&valid_records(), &ValidateOptions::default());
        assert!(
            report.is_clean(),
            "Expected no issues, got: {:?}",
            report.issues
        );
    }

    #[test]
    fn test_duplicate_identifier() {
        let mut records = valid_records();
        records.push(record("a", 1.0, 1.0, 5.0, 5.0));

        let report = validate_records(&records, &ValidateOptions::default());
        assert_eq!(report.error_count(), 1);
        assert!(report.has(IssueCode::DuplicateIdentifier));
    }

    #[test]
    fn test_empty_tag() {
        let mut records = valid_records();
        records[0].tag_id = "".into();
        records[1].tag_name = String::new();

        let report = validate_records(&records, &ValidateOptions::default());
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(report.has(IssueCode::EmptyTagId));
        assert!(report.has(IssueCode::EmptyTagName));
    }

    #[test]
    fn test_inverted_position() {
        let records = vec![record("a", 30.0, 10.0, 10.0, 30.0)];
        let report = validate_records(&records, &ValidateOptions::default());
        assert!(report.has(IssueCode::InvertedPosition));
        assert!(!report.has(IssueCode::DegeneratePosition));
    }

    #[test]
    fn test_degenerate_position_is_warning() {
        let records = vec![record("a", 10.0, 10.0, 10.5, 30.0)];
        let report = validate_records(&records, &ValidateOptions::default());
        assert_eq!(report.error_count(), 0);
        assert!(report.has(IssueCode::DegeneratePosition));
    }

    #[test]
    fn test_non_finite_stops_geometry_checks() {
        let records = vec![record("a", f64::NAN, 10.0, -5.0, 300.0)];
        let report = validate_records(&records, &ValidateOptions::default());
        assert_eq!(report.issues.len(), 1);
        assert!(report.has(IssueCode::NonFiniteCoordinate));
    }

    #[test]
    fn test_percent_out_of_range() {
        let records = vec![record("a", 10.0, 10.0, 100.5, 30.0)];
        let report = validate_records(&records, &ValidateOptions::default());
        assert!(report.has(IssueCode::PercentOutOfRange));
    }

    #[test]
    fn test_mixed_units() {
        let mut records = valid_records();
        records[0].position.x1 = Coord::pixel(60.0);
        let report = validate_records(&records, &ValidateOptions::default());
        assert!(report.has(IssueCode::MixedUnits));
    }

    #[test]
    fn test_pixel_bounds_need_surface() {
        let records = vec![AnnotationRecord::new(
            OwnerId::new("a"),
            Tag::new("cat", "Cat"),
            Position::from_pixels(Rect::from_xyxy(10.0, 10.0, 300.0, 50.0)),
        )];
        let report = validate_records(&records, &ValidateOptions::default());
        assert!(report.is_clean());

        let opts = ValidateOptions {
            surface: Some(Size::new(200.0, 100.0)),
        };
        let report = validate_records(&records, &opts);
        assert!(report.has(IssueCode::PixelOutOfBounds));
    }

    #[test]
    fn test_report_json_shape() {
        let records = vec![record("a", 30.0, 10.0, 10.0, 30.0)];
        let report = validate_records(&records, &ValidateOptions::default());
        let json = report.to_json_value();
        assert_eq!(json["error_count"], 1);
        assert_eq!(json["issues"][0]["code"], "InvertedPosition");
        assert_eq!(json["issues"][0]["context"]["identifier"], "a");
    }
}
