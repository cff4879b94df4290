//! Query method name parser
//!
//! Grammar:
//!
//! ```text
//! <verb> [Distinct] [Top<N> | First<N>] [All] [<Subject>]
//!        [By <Clause> ((And | Or) <Clause>)*]
//!        [OrderBy <Property> [Asc | Desc] (And <Property> [Asc | Desc])*]
//! ```
//!
//! Verbs and operators are looked up in tables, so adding a keyword never
//! touches the parsing code. Only `Id` (exact) and `IdStartsWith` are
//! executable; a clause naming any other property parses but is classified
//! as an unsupported property. `Id` names the backend key, never an entity
//! field, so `OrderById` sorts by key for every entity type.

use std::sync::OnceLock;

use regex::Regex;

use super::ast::{
    LimitSpec, MethodSignature, OrderSpec, ParameterKind, PredicateSpec, ReturnShape,
    SortDirection, SortSpec, Subject,
};
use super::descriptor::QueryMethodDescriptor;
use super::errors::{PlannerError, PlannerResult};

/// Leading verbs and what they ask for
const SUBJECT_VERBS: &[(&str, Subject)] = &[
    ("find", Subject::Select),
    ("read", Subject::Select),
    ("get", Subject::Select),
    ("query", Subject::Select),
    ("search", Subject::Select),
    ("stream", Subject::Select),
    ("count", Subject::Count),
    ("exists", Subject::Exists),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Equal,
    StartsWith,
    /// Recognized, never executable against the store
    Unsupported(&'static str),
}

/// Operator suffixes. The longest matching suffix wins.
const OPERATORS: &[(&str, Operator)] = &[
    ("Is", Operator::Equal),
    ("Equals", Operator::Equal),
    ("IsStartingWith", Operator::StartsWith),
    ("StartingWith", Operator::StartsWith),
    ("StartsWith", Operator::StartsWith),
    ("IsEndingWith", Operator::Unsupported("EndsWith")),
    ("EndingWith", Operator::Unsupported("EndsWith")),
    ("EndsWith", Operator::Unsupported("EndsWith")),
    ("IsContaining", Operator::Unsupported("Containing")),
    ("Containing", Operator::Unsupported("Containing")),
    ("Contains", Operator::Unsupported("Containing")),
    ("IsNotLike", Operator::Unsupported("NotLike")),
    ("NotLike", Operator::Unsupported("NotLike")),
    ("IsLike", Operator::Unsupported("Like")),
    ("Like", Operator::Unsupported("Like")),
    ("IsGreaterThanEqual", Operator::Unsupported("GreaterThanEqual")),
    ("GreaterThanEqual", Operator::Unsupported("GreaterThanEqual")),
    ("IsGreaterThan", Operator::Unsupported("GreaterThan")),
    ("GreaterThan", Operator::Unsupported("GreaterThan")),
    ("IsLessThanEqual", Operator::Unsupported("LessThanEqual")),
    ("LessThanEqual", Operator::Unsupported("LessThanEqual")),
    ("IsLessThan", Operator::Unsupported("LessThan")),
    ("LessThan", Operator::Unsupported("LessThan")),
    ("IsBefore", Operator::Unsupported("Before")),
    ("Before", Operator::Unsupported("Before")),
    ("IsAfter", Operator::Unsupported("After")),
    ("After", Operator::Unsupported("After")),
    ("IsBetween", Operator::Unsupported("Between")),
    ("Between", Operator::Unsupported("Between")),
    ("IsNotIn", Operator::Unsupported("NotIn")),
    ("NotIn", Operator::Unsupported("NotIn")),
    ("IsIn", Operator::Unsupported("In")),
    ("In", Operator::Unsupported("In")),
    ("IsNotNull", Operator::Unsupported("NotNull")),
    ("NotNull", Operator::Unsupported("NotNull")),
    ("IsNull", Operator::Unsupported("Null")),
    ("Null", Operator::Unsupported("Null")),
    ("IsNotEmpty", Operator::Unsupported("NotEmpty")),
    ("IsEmpty", Operator::Unsupported("Empty")),
    ("IsNot", Operator::Unsupported("Not")),
    ("Not", Operator::Unsupported("Not")),
    ("IsTrue", Operator::Unsupported("True")),
    ("True", Operator::Unsupported("True")),
    ("IsFalse", Operator::Unsupported("False")),
    ("False", Operator::Unsupported("False")),
    ("MatchesRegex", Operator::Unsupported("Regex")),
    ("Matches", Operator::Unsupported("Regex")),
    ("Regex", Operator::Unsupported("Regex")),
    ("Exists", Operator::Unsupported("Exists")),
];

const IGNORE_CASE_SUFFIXES: &[&str] = &["AllIgnoreCase", "AllIgnoringCase", "IgnoreCase", "IgnoringCase"];

const BY: &str = "By";
const ORDER_BY: &str = "OrderBy";
/// Always the backend key, see `KEY_PROPERTY`
const ID_KEYWORD: &str = "Id";

fn limit_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(Top|First)([0-9]*)").expect("limit pattern is valid"))
}

fn property_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z][A-Za-z0-9_]*$").expect("property pattern is valid"))
}

/// Parsed predicate clause before parameters are bound
#[derive(Debug, PartialEq, Eq)]
enum Clause {
    Everything,
    IdEquals,
    IdPrefix,
    Unsupported(String),
}

struct ClausePart<'a> {
    property: &'a str,
    operator: Operator,
    ignore_case: bool,
}

/// Parses method signatures into query descriptors.
///
/// Parsing is pure: the same signature always yields an equal descriptor
/// or an equal error.
pub struct MethodNameParser;

impl MethodNameParser {
    /// Parses a declared method into an immutable plan.
    ///
    /// Names outside the grammar fail with `VAULT_QUERY_UNPARSABLE`. A clause
    /// on a non-id property does NOT fail here; the descriptor carries an
    /// unsupported-property marker instead.
    pub fn parse(signature: &MethodSignature) -> PlannerResult<QueryMethodDescriptor> {
        let method = signature.name.as_str();

        let (subject, rest) = Self::split_verb(method).ok_or_else(|| {
            PlannerError::unparsable(method, "method name does not start with a supported query verb")
        })?;
        Self::check_return_shape(method, subject, signature.returns)?;

        let (head, order_clause) = match Self::find_keyword(rest, ORDER_BY) {
            Some(i) => (&rest[..i], Some(&rest[i + ORDER_BY.len()..])),
            None => (rest, None),
        };
        let (subject_text, predicate_text) = match Self::find_keyword(head, BY) {
            Some(i) => (&head[..i], &head[i + BY.len()..]),
            None => (head, ""),
        };

        let limit = Self::parse_subject(method, subject_text)?;
        let clause = Self::parse_predicate(method, predicate_text)?;
        let name_order = match order_clause {
            Some(text) => Self::parse_order(method, text)?,
            None => OrderSpec::unsorted(),
        };

        let positions = |kind: ParameterKind| -> Vec<usize> {
            signature
                .parameters
                .iter()
                .enumerate()
                .filter(|(_, k)| **k == kind)
                .map(|(i, _)| i)
                .collect()
        };
        let value_params = positions(ParameterKind::Value);
        let sort_params = positions(ParameterKind::Sort);
        let limit_params = positions(ParameterKind::Limit);

        if sort_params.len() > 1 {
            return Err(PlannerError::unparsable(method, "at most one sort parameter is allowed"));
        }
        if limit_params.len() > 1 {
            return Err(PlannerError::unparsable(method, "at most one limit parameter is allowed"));
        }
        if limit.is_some() && !limit_params.is_empty() {
            return Err(PlannerError::unparsable(
                method,
                "a limit parameter cannot be combined with Top/First",
            ));
        }

        let predicate = match clause {
            Clause::Unsupported(property) => PredicateSpec::UnsupportedProperty { property },
            Clause::Everything => {
                Self::check_value_arity(method, &value_params, 0)?;
                PredicateSpec::None
            }
            Clause::IdEquals => {
                Self::check_value_arity(method, &value_params, 1)?;
                PredicateSpec::IdEquals {
                    parameter: value_params[0],
                }
            }
            Clause::IdPrefix => {
                Self::check_value_arity(method, &value_params, 1)?;
                PredicateSpec::IdPrefix {
                    parameter: value_params[0],
                }
            }
        };

        let sort_parameter = sort_params.first().copied();
        let order = if sort_parameter.is_some() {
            OrderSpec::unsorted()
        } else {
            name_order
        };

        Ok(QueryMethodDescriptor {
            method: method.to_string(),
            subject,
            predicate,
            order,
            limit,
            sort_parameter,
            limit_parameter: limit_params.first().copied(),
            parameters: signature.parameters.clone(),
            returns: signature.returns,
        })
    }

    fn split_verb(method: &str) -> Option<(Subject, &str)> {
        SUBJECT_VERBS.iter().find_map(|(verb, subject)| {
            let rest = method.strip_prefix(verb)?;
            Self::at_word_start(rest).then_some((*subject, rest))
        })
    }

    fn check_return_shape(method: &str, subject: Subject, returns: ReturnShape) -> PlannerResult<()> {
        let ok = match subject {
            Subject::Select => matches!(returns, ReturnShape::List | ReturnShape::Optional),
            Subject::Count => returns == ReturnShape::Count,
            Subject::Exists => returns == ReturnShape::Boolean,
        };
        if ok {
            Ok(())
        } else {
            Err(PlannerError::unparsable(
                method,
                format!("return type '{}' does not fit the query verb", returns.as_str()),
            ))
        }
    }

    fn check_value_arity(method: &str, value_params: &[usize], expected: usize) -> PlannerResult<()> {
        if value_params.len() == expected {
            return Ok(());
        }
        Err(PlannerError::unparsable(
            method,
            format!(
                "predicate expects {} value argument(s), method declares {}",
                expected,
                value_params.len()
            ),
        ))
    }

    /// Subject between the verb and `By`: limit keywords, `Distinct`, `All`
    /// and one optional free-form word.
    fn parse_subject(method: &str, text: &str) -> PlannerResult<Option<LimitSpec>> {
        let mut rest = Self::strip_word(text, "Distinct");
        let mut limit = None;

        if let Some(caps) = limit_pattern().captures(rest) {
            let matched = caps.get(0).map_or(0, |m| m.end());
            let after = &rest[matched..];
            if Self::at_word_start(after) {
                let digits = caps.get(2).map_or("", |m| m.as_str());
                let n = if digits.is_empty() {
                    1
                } else {
                    digits.parse::<u64>().map_err(|_| {
                        PlannerError::unparsable(method, format!("limit '{}' is out of range", digits))
                    })?
                };
                limit = Some(LimitSpec::new(n).ok_or_else(|| {
                    PlannerError::unparsable(method, "a Top/First limit must be positive")
                })?);
                rest = after;
            }
        }

        rest = Self::strip_word(rest, "Distinct");
        rest = Self::strip_word(rest, "All");

        if !rest.is_empty() && !property_pattern().is_match(rest) {
            return Err(PlannerError::unparsable(
                method,
                format!("unexpected subject '{}'", rest),
            ));
        }
        Ok(limit)
    }

    fn parse_predicate(method: &str, text: &str) -> PlannerResult<Clause> {
        if text.is_empty() {
            return Ok(Clause::Everything);
        }

        let (text, all_ignore_case) = Self::strip_ignore_case(text);
        let mut parts = Vec::new();
        for alternative in Self::split_keyword(text, "Or") {
            for part in Self::split_keyword(alternative, "And") {
                parts.push(Self::parse_clause_part(method, part)?);
            }
        }

        if let Some(part) = parts.iter().find(|p| p.property != ID_KEYWORD) {
            return Ok(Clause::Unsupported(Self::uncapitalize(part.property)));
        }
        if parts.len() > 1 {
            return Err(PlannerError::unparsable(
                method,
                "compound predicates on the id are not supported",
            ));
        }

        let part = &parts[0];
        if all_ignore_case || part.ignore_case {
            return Err(PlannerError::unparsable(
                method,
                "case-insensitive id matching is not supported",
            ));
        }
        match part.operator {
            Operator::Equal => Ok(Clause::IdEquals),
            Operator::StartsWith => Ok(Clause::IdPrefix),
            Operator::Unsupported(op) => Err(PlannerError::unparsable(
                method,
                format!("operator '{}' is not supported on the id", op),
            )),
        }
    }

    fn parse_clause_part<'a>(method: &str, part: &'a str) -> PlannerResult<ClausePart<'a>> {
        let (part, ignore_case) = Self::strip_ignore_case(part);

        let (property, operator) = OPERATORS
            .iter()
            .filter(|(keyword, _)| part.len() > keyword.len() && part.ends_with(keyword))
            .max_by_key(|(keyword, _)| keyword.len())
            .map(|(keyword, op)| (&part[..part.len() - keyword.len()], *op))
            .unwrap_or((part, Operator::Equal));

        if !property_pattern().is_match(property) {
            return Err(PlannerError::unparsable(
                method,
                format!("invalid property in predicate clause '{}'", part),
            ));
        }
        Ok(ClausePart {
            property,
            operator,
            ignore_case,
        })
    }

    fn parse_order(method: &str, text: &str) -> PlannerResult<OrderSpec> {
        if text.is_empty() {
            return Err(PlannerError::unparsable(method, "OrderBy requires at least one property"));
        }

        let mut orders = Vec::new();
        for part in Self::split_keyword(text, "And") {
            let (property, direction) = if let Some(p) = part.strip_suffix("Desc") {
                (p, SortDirection::Desc)
            } else if let Some(p) = part.strip_suffix("Asc") {
                (p, SortDirection::Asc)
            } else {
                (part, SortDirection::Asc)
            };

            if !property_pattern().is_match(property) {
                return Err(PlannerError::unparsable(
                    method,
                    format!("invalid order property '{}'", part),
                ));
            }
            orders.push(SortSpec {
                property: Self::uncapitalize(property),
                direction,
            });
        }
        Ok(OrderSpec::from(orders))
    }

    fn strip_ignore_case(text: &str) -> (&str, bool) {
        IGNORE_CASE_SUFFIXES
            .iter()
            .find_map(|suffix| text.strip_suffix(suffix).filter(|rest| !rest.is_empty()))
            .map_or((text, false), |rest| (rest, true))
    }

    fn strip_word<'a>(text: &'a str, word: &str) -> &'a str {
        match text.strip_prefix(word) {
            Some(rest) if Self::at_word_start(rest) => rest,
            _ => text,
        }
    }

    /// True at end of input or before an uppercase letter
    fn at_word_start(text: &str) -> bool {
        text.chars().next().map_or(true, |c| c.is_ascii_uppercase())
    }

    /// First position of `keyword` that ends on a word boundary
    fn find_keyword(text: &str, keyword: &str) -> Option<usize> {
        let mut search = 0;
        while let Some(offset) = text[search..].find(keyword) {
            let at = search + offset;
            if Self::at_word_start(&text[at + keyword.len()..]) {
                return Some(at);
            }
            search = at + keyword.len();
        }
        None
    }

    /// Splits on `keyword` where it separates two non-empty words
    fn split_keyword<'a>(text: &'a str, keyword: &str) -> Vec<&'a str> {
        let mut parts = Vec::new();
        let mut start = 0;
        let mut search = 0;
        while let Some(offset) = text[search..].find(keyword) {
            let at = search + offset;
            let after = &text[at + keyword.len()..];
            if at > start && after.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
                parts.push(&text[start..at]);
                start = at + keyword.len();
            }
            search = at + keyword.len();
        }
        parts.push(&text[start..]);
        parts
    }

    /// `Firstname` -> `firstname`; `URL` stays `URL`
    fn uncapitalize(property: &str) -> String {
        let mut chars = property.chars();
        match (chars.next(), chars.next()) {
            (Some(a), Some(b)) if a.is_uppercase() && b.is_uppercase() => property.to_string(),
            (Some(a), _) => a.to_lowercase().chain(property.chars().skip(1)).collect(),
            (None, _) => String::new(),
        }
    }
}
