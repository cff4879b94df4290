//! Query method structures
//!
//! Defines the declared method shape the parser consumes and the parsed
//! building blocks a descriptor is made of.

use std::fmt;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// One ordering key: a property and a direction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    /// Property to sort by
    pub property: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.property, self.direction.as_str())
    }
}

/// Ordered sequence of sort keys. Empty means unordered.
///
/// Used both for orderings derived from a method name and for sort
/// arguments supplied per call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OrderSpec {
    orders: Vec<SortSpec>,
}

impl OrderSpec {
    /// An empty ordering
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// Ordering with a single key
    pub fn by(order: SortSpec) -> Self {
        Self {
            orders: vec![order],
        }
    }

    /// Appends a key, consulted when all previous keys tie
    pub fn and(mut self, order: SortSpec) -> Self {
        self.orders.push(order);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortSpec> {
        self.orders.iter()
    }
}

impl From<Vec<SortSpec>> for OrderSpec {
    fn from(orders: Vec<SortSpec>) -> Self {
        Self { orders }
    }
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.orders.is_empty() {
            return write!(f, "unsorted");
        }
        let parts: Vec<String> = self.orders.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Property name that `Id` in a method name resolves to.
///
/// `Id` always means the backend key, whatever the entity calls its
/// key-bearing field: `IdStartsWith` prunes keys and `OrderById` sorts by key.
pub const KEY_PROPERTY: &str = "id";

/// Static result cap taken from `Top<N>` / `First<N>`. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LimitSpec(u64);

impl LimitSpec {
    /// Returns `None` for zero
    pub fn new(limit: u64) -> Option<Self> {
        (limit > 0).then_some(Self(limit))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Filter part of a query plan.
///
/// Predicates reference call arguments by parameter position; the values
/// themselves are never part of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PredicateSpec {
    /// Match everything
    None,
    /// Exact id: a direct point read, no enumeration
    IdEquals { parameter: usize },
    /// Id starts with the argument: keys are pruned before any load
    IdPrefix { parameter: usize },
    /// Recognized clause on a property the store cannot filter on.
    /// Never executable.
    UnsupportedProperty { property: String },
}

impl PredicateSpec {
    /// Returns true unless this is an unsupported-property marker
    pub fn is_executable(&self) -> bool {
        !matches!(self, PredicateSpec::UnsupportedProperty { .. })
    }

    /// Returns the argument position this predicate binds, if any
    pub fn parameter(&self) -> Option<usize> {
        match self {
            PredicateSpec::IdEquals { parameter } | PredicateSpec::IdPrefix { parameter } => {
                Some(*parameter)
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PredicateSpec::None => "none",
            PredicateSpec::IdEquals { .. } => "id_equals",
            PredicateSpec::IdPrefix { .. } => "id_prefix",
            PredicateSpec::UnsupportedProperty { .. } => "unsupported_property",
        }
    }
}

/// What the method's verb asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    /// find / read / get / query / search / stream
    Select,
    /// count
    Count,
    /// exists
    Exists,
}

/// Declared return type of a query method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnShape {
    /// A collection of entities
    List,
    /// At most one entity
    Optional,
    /// Whether anything matched
    Boolean,
    /// How many entities matched
    Count,
}

impl ReturnShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnShape::List => "list",
            ReturnShape::Optional => "optional",
            ReturnShape::Boolean => "boolean",
            ReturnShape::Count => "count",
        }
    }
}

/// Declared parameter type of a query method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// A plain value bound to a predicate
    Value,
    /// A runtime ordering that replaces any name-derived one
    Sort,
    /// A runtime result cap
    Limit,
}

/// Metadata of a declared repository method: all the parser ever sees.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    /// Method name, e.g. `findTop1ByOrderByFirstnameAsc`
    pub name: String,
    /// Parameter kinds in declaration order
    pub parameters: Vec<ParameterKind>,
    /// Declared return shape
    pub returns: ReturnShape,
}

impl MethodSignature {
    /// Creates a signature with no parameters
    pub fn new(name: impl Into<String>, returns: ReturnShape) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            returns,
        }
    }

    /// A method returning a collection
    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, ReturnShape::List)
    }

    /// A method returning at most one entity
    pub fn optional(name: impl Into<String>) -> Self {
        Self::new(name, ReturnShape::Optional)
    }

    /// A method returning a boolean
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ReturnShape::Boolean)
    }

    /// A method returning a count
    pub fn count(name: impl Into<String>) -> Self {
        Self::new(name, ReturnShape::Count)
    }

    /// Appends a parameter
    pub fn param(mut self, kind: ParameterKind) -> Self {
        self.parameters.push(kind);
        self
    }

    /// Appends a value parameter
    pub fn value_param(self) -> Self {
        self.param(ParameterKind::Value)
    }

    /// Appends a sort parameter
    pub fn sort_param(self) -> Self {
        self.param(ParameterKind::Sort)
    }

    /// Appends a limit parameter
    pub fn limit_param(self) -> Self {
        self.param(ParameterKind::Limit)
    }
}
