//! Raw field to SQL literal conversion.
//!
//! Formatting never fails. Numeric input that does not parse is classified as
//! [`Literal::Invalid`] and rendered as `NULL`, so callers can tell a degraded
//! value apart from a genuinely empty one without the output changing.

use std::fmt;

use crate::schema::SqlType;

const TRUE_TOKENS: &[&str] = &["true", "1", "yes", "y"];
const NULL_TOKENS: &[&str] = &["null", "none"];

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Unescaped text, rendered between single quotes.
    Quoted(String),
    /// Numeric input that failed to parse.
    Invalid { raw: String, sql_type: SqlType },
}

impl Literal {
    pub fn classify(raw: &str, sql_type: SqlType) -> Self {
        let value = raw.trim();
        if is_null_token(value) {
            return Literal::Null;
        }
        match sql_type {
            SqlType::Integer | SqlType::Decimal => classify_number(value, sql_type),
            SqlType::Boolean => Literal::Boolean(is_true_token(value)),
            SqlType::Date => Literal::Quoted(reorder_slash_date(value)),
            SqlType::Text => Literal::Quoted(value.to_string()),
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Literal::Invalid { .. })
    }

    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null | Literal::Invalid { .. } => f.write_str("NULL"),
            Literal::Integer(value) => write!(f, "{value}"),
            Literal::Float(value) => f.write_str(&render_float(*value)),
            Literal::Boolean(value) => write!(f, "{value}"),
            Literal::Quoted(text) => write!(f, "'{}'", escape_quotes(text)),
        }
    }
}

/// Formats one raw field as a SQL literal for the given type.
pub fn format_value(raw: &str, sql_type: SqlType) -> String {
    Literal::classify(raw, sql_type).to_sql()
}

pub fn escape_quotes(value: &str) -> String {
    value.replace('\'', "''")
}

fn is_null_token(value: &str) -> bool {
    value.is_empty()
        || NULL_TOKENS
            .iter()
            .any(|token| value.eq_ignore_ascii_case(token))
}

fn is_true_token(value: &str) -> bool {
    TRUE_TOKENS
        .iter()
        .any(|token| value.eq_ignore_ascii_case(token))
}

fn classify_number(value: &str, sql_type: SqlType) -> Literal {
    let cleaned = value.replace(',', "");
    let parsed = if sql_type == SqlType::Decimal || cleaned.contains('.') {
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .map(Literal::Float)
    } else {
        cleaned.parse::<i64>().ok().map(Literal::Integer)
    };
    parsed.unwrap_or_else(|| Literal::Invalid {
        raw: value.to_string(),
        sql_type,
    })
}

/// `M/D/Y` becomes `Y-M-D`; parts are moved, never validated.
fn reorder_slash_date(value: &str) -> String {
    if !value.contains('/') {
        return value.to_string();
    }
    let parts = value.split('/').collect::<Vec<_>>();
    match parts.as_slice() {
        [month, day, year] => format!("{year}-{month}-{day}"),
        _ => value.to_string(),
    }
}

fn render_float(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_tokens_win_for_every_type() {
        for ty in [
            SqlType::Text,
            SqlType::Integer,
            SqlType::Decimal,
            SqlType::Date,
            SqlType::Boolean,
        ] {
            assert_eq!(format_value("", ty), "NULL");
            assert_eq!(format_value("   ", ty), "NULL");
            assert_eq!(format_value("NULL", ty), "NULL");
            assert_eq!(format_value(" None ", ty), "NULL");
        }
    }

    #[test]
    fn integers_drop_thousands_separators() {
        assert_eq!(format_value("1,234", SqlType::Integer), "1234");
        assert_eq!(format_value("-7", SqlType::Integer), "-7");
        assert_eq!(format_value("12.5", SqlType::Integer), "12.5");
    }

    #[test]
    fn decimals_always_render_as_floats() {
        assert_eq!(format_value("1,234.5", SqlType::Decimal), "1234.5");
        assert_eq!(format_value("1,000", SqlType::Decimal), "1000.0");
        assert_eq!(format_value("50", SqlType::Decimal), "50.0");
        assert_eq!(format_value("0.25", SqlType::Decimal), "0.25");
    }

    #[test]
    fn unparseable_numbers_degrade_to_null() {
        let literal = Literal::classify("12abc", SqlType::Integer);
        assert!(literal.is_invalid());
        assert_eq!(literal.to_sql(), "NULL");
        assert_eq!(format_value("n/a", SqlType::Decimal), "NULL");
        assert_eq!(format_value("inf", SqlType::Decimal), "NULL");
        assert_eq!(format_value("99999999999999999999", SqlType::Integer), "NULL");
    }

    #[test]
    fn empty_values_are_null_not_invalid() {
        assert_eq!(Literal::classify(" ", SqlType::Integer), Literal::Null);
    }

    #[test]
    fn booleans_map_known_truthy_tokens() {
        for raw in ["Y", "yes", "1", "TRUE", "True"] {
            assert_eq!(format_value(raw, SqlType::Boolean), "true", "{raw}");
        }
        for raw in ["n", "0", "no", "false", "maybe"] {
            assert_eq!(format_value(raw, SqlType::Boolean), "false", "{raw}");
        }
    }

    #[test]
    fn slash_dates_are_reordered_without_validation() {
        assert_eq!(format_value("12/25/2024", SqlType::Date), "'2024-12-25'");
        assert_eq!(format_value("31/12/2024", SqlType::Date), "'2024-31-12'");
        assert_eq!(format_value("1/2/O'x", SqlType::Date), "'O''x-1-2'");
    }

    #[test]
    fn other_dates_pass_through_quoted() {
        assert_eq!(format_value("2024-12-25", SqlType::Date), "'2024-12-25'");
        assert_eq!(format_value("12/2024", SqlType::Date), "'12/2024'");
        assert_eq!(format_value("1/2/3/4", SqlType::Date), "'1/2/3/4'");
    }

    #[test]
    fn text_is_trimmed_escaped_and_quoted() {
        assert_eq!(format_value("  O'Brien ", SqlType::Text), "'O''Brien'");
        assert_eq!(format_value("it''s", SqlType::Text), "'it''''s'");
    }
}
