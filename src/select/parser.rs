//! Keyword lexer
//!
//! Splits a predicate keyword into `(attribute, operator)`:
//! - the operator is the token after the last `_`, if it names one of the
//!   eight known operators;
//! - otherwise the whole keyword is the attribute and the operator is `eq`;
//! - a keyword without `_`, or whose only `_` is the leading reserved
//!   marker, is read as `<keyword>_eq`.

use crate::error::{GraphError, Result};
use crate::select::types::{Operator, Predicate};

/// Leading token that marks a structural or computed property
pub const RESERVED_MARKER: &str = "_";

/// Parse a predicate keyword
pub fn parse_keyword(keyword: &str) -> Result<Predicate> {
    if keyword.is_empty() {
        return Err(GraphError::configuration("empty predicate keyword"));
    }

    let split = match keyword.rfind('_') {
        Some(pos) if pos > 0 => Some(pos),
        _ => None,
    };

    let predicate = match split {
        Some(pos) => {
            let (attribute, token) = (&keyword[..pos], &keyword[pos + 1..]);
            match Operator::from_token(token) {
                Some(op) => Predicate::new(attribute, op),
                None => Predicate::new(keyword, Operator::Eq),
            }
        }
        None => Predicate::new(keyword, Operator::Eq),
    };

    if predicate.attribute().is_empty() {
        return Err(GraphError::configuration(format!(
            "predicate '{}' names no attribute",
            keyword
        )));
    }
    Ok(predicate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(keyword: &str) -> (String, Operator) {
        let p = parse_keyword(keyword).unwrap();
        (p.attribute().to_string(), p.operator())
    }

    #[test]
    fn test_plain_attribute_defaults_to_eq() {
        assert_eq!(parsed("cluster"), ("cluster".to_string(), Operator::Eq));
    }

    #[test]
    fn test_trailing_operator() {
        assert_eq!(parsed("age_gt"), ("age".to_string(), Operator::Gt));
        assert_eq!(parsed("type_notin"), ("type".to_string(), Operator::NotIn));
    }

    #[test]
    fn test_attribute_with_underscores() {
        assert_eq!(parsed("edge_weight_le"), ("edge_weight".to_string(), Operator::Le));
        assert_eq!(parsed("edge_weight"), ("edge_weight".to_string(), Operator::Eq));
    }

    #[test]
    fn test_unknown_trailing_token_is_part_of_attribute() {
        assert_eq!(parsed("size_big"), ("size_big".to_string(), Operator::Eq));
        // `_` followed by nothing is not an operator either
        assert_eq!(parsed("size_"), ("size_".to_string(), Operator::Eq));
    }

    #[test]
    fn test_reserved_marker_only_underscore() {
        assert_eq!(parsed("_degree"), ("_degree".to_string(), Operator::Eq));
        assert_eq!(parsed("_within"), ("_within".to_string(), Operator::Eq));
    }

    #[test]
    fn test_reserved_marker_with_operator() {
        let p = parse_keyword("_source_in").unwrap();
        assert_eq!(p.attribute(), "_source");
        assert_eq!(p.operator(), Operator::In);
        assert_eq!(p.property(), Some("source"));
    }

    #[test]
    fn test_operator_lookalike_without_separator() {
        // no underscore at all: `in` is the attribute
        assert_eq!(parsed("in"), ("in".to_string(), Operator::Eq));
    }

    #[test]
    fn test_empty_keyword_rejected() {
        assert!(parse_keyword("").is_err());
    }
}
