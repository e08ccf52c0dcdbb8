//! Column decoding for the text-encoded enum and date columns.

use crate::error::{NaveError, NaveResult};
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(super) fn encode_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(super) fn decode_date(column: &'static str, value: &str) -> NaveResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| NaveError::InvalidColumn {
        column,
        value: value.to_string(),
    })
}

/// Decode a text column through one of the records' `parse` functions.
pub(super) fn decode_enum<T>(
    column: &'static str,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> NaveResult<T> {
    parse(value).ok_or_else(|| NaveError::InvalidColumn {
        column,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::TransactionKind;

    #[test]
    fn bad_enum_value_is_reported_with_column() {
        let err = decode_enum("kind", "refund", TransactionKind::parse).unwrap_err();
        assert!(err.to_string().contains("kind"));
        assert!(err.to_string().contains("refund"));
    }

    #[test]
    fn date_round_trips_through_text() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(decode_date("date", &encode_date(&d)).unwrap(), d);
    }
}
