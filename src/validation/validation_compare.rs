//! Record sequence comparison

use crate::dataset::Shape;
use crate::error::{ValidationError, ValidationResult};
use crate::model::Record;

/// Compare decoded records with the source, position by position
///
/// Fails on the first length or field-level difference.
pub fn compare_records<T: Record>(codec: &str, shape: Shape, expected: &[T], actual: &[T]) -> ValidationResult<()> {
    if expected.len() != actual.len() {
        return Err(ValidationError::LengthMismatch {
            codec: codec.to_string(),
            shape: shape.to_string(),
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    match expected.iter().zip(actual).position(|(left, right)| left != right) {
        Some(index) => {
            tracing::debug!(codec, %shape, index, expected = ?expected[index], actual = ?actual[index], "record mismatch");
            Err(ValidationError::RecordMismatch {
                codec: codec.to_string(),
                shape: shape.to_string(),
                index,
            })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SalesItem;

    fn item(order_id: i32) -> SalesItem {
        SalesItem {
            order_id,
            ..SalesItem::default()
        }
    }

    #[test]
    fn test_equal_sequences() {
        let records = vec![item(1), item(2)];
        assert!(compare_records("json", Shape::Single, &records, &records.clone()).is_ok());
    }

    #[test]
    fn test_first_differing_index_is_reported() {
        let expected = vec![item(1), item(2), item(3)];
        let actual = vec![item(1), item(9), item(8)];
        let error = compare_records("json", Shape::Separate, &expected, &actual).unwrap_err();
        assert!(matches!(error, ValidationError::RecordMismatch { index: 1, .. }));
    }

    #[test]
    fn test_order_matters() {
        let expected = vec![item(1), item(2)];
        let actual = vec![item(2), item(1)];
        assert!(compare_records("json", Shape::Separate, &expected, &actual).is_err());
    }
}
