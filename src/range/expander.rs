// src/range/expander.rs
use std::fmt;

/// Errors raised while expanding a backend address expression.
///
/// Every variant carries the offending item so a skipped row can be
/// reported with the exact text that broke it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("range item `{0}` is missing '['")]
    MissingOpenBracket(String),

    #[error("range item `{0}` is missing ']'")]
    MissingCloseBracket(String),

    #[error("range item `{0}` is missing ':' between its bounds")]
    MissingSeparator(String),

    #[error("range item `{item}` has an invalid bound `{bound}`")]
    InvalidBound { item: String, bound: String },

    #[error("range item `{0}` has unexpected text after ']'")]
    TrailingInput(String),

    #[error("range item `{item}` has bound {bound}, above the last octet value 255")]
    OctetOutOfRange { item: String, bound: u32 },

    #[error("range item `{item}` starts at {from} but ends at {to}")]
    Inverted { item: String, from: u32, to: u32 },
}

/// Largest value a range bound may take. Bounds fill the last octet of an
/// IPv4 address.
pub const MAX_OCTET: u32 = 255;

/// One comma-separated item of a backend expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeItem {
    /// A bare address, e.g. `192.168.1.5`.
    Literal(String),
    /// `<prefix>[<from>:<to>]`, inclusive on both ends.
    Span { prefix: String, from: u32, to: u32 },
}

impl RangeItem {
    /// Parse a single, already trimmed item. An item is a range iff it
    /// contains `:`.
    pub fn parse(item: &str) -> Result<Self, RangeError> {
        if !item.contains(':') {
            return Ok(RangeItem::Literal(item.to_string()));
        }

        let (prefix, rest) = item
            .split_once('[')
            .ok_or_else(|| RangeError::MissingOpenBracket(item.to_string()))?;
        let (bounds, tail) = rest
            .split_once(']')
            .ok_or_else(|| RangeError::MissingCloseBracket(item.to_string()))?;
        if !tail.trim().is_empty() {
            return Err(RangeError::TrailingInput(item.to_string()));
        }
        let (from, to) = bounds
            .split_once(':')
            .ok_or_else(|| RangeError::MissingSeparator(item.to_string()))?;

        let from = parse_bound(item, from)?;
        let to = parse_bound(item, to)?;
        if from > to {
            return Err(RangeError::Inverted {
                item: item.to_string(),
                from,
                to,
            });
        }

        Ok(RangeItem::Span {
            prefix: prefix.to_string(),
            from,
            to,
        })
    }

    /// Number of addresses this item expands to.
    pub fn len(&self) -> usize {
        match self {
            RangeItem::Literal(_) => 1,
            RangeItem::Span { from, to, .. } if to < from => 0,
            RangeItem::Span { from, to, .. } => (to - from) as usize + 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Addresses in ascending order.
    pub fn addresses(&self) -> Box<dyn Iterator<Item = String> + '_> {
        match self {
            RangeItem::Literal(address) => Box::new(std::iter::once(address.clone())),
            RangeItem::Span { prefix, from, to } => {
                Box::new((*from..=*to).map(move |n| format!("{}{}", prefix, n)))
            }
        }
    }
}

impl fmt::Display for RangeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeItem::Literal(address) => f.write_str(address),
            RangeItem::Span { prefix, from, to } => write!(f, "{}[{}:{}]", prefix, from, to),
        }
    }
}

fn parse_bound(item: &str, bound: &str) -> Result<u32, RangeError> {
    let trimmed = bound.trim();
    let invalid = || RangeError::InvalidBound {
        item: item.to_string(),
        bound: bound.to_string(),
    };

    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let value: u32 = trimmed.parse().map_err(|_| invalid())?;
    if value > MAX_OCTET {
        return Err(RangeError::OctetOutOfRange {
            item: item.to_string(),
            bound: value,
        });
    }
    Ok(value)
}

/// Tokenize a backend expression into its items, left to right.
///
/// Blank items (an empty expression, a trailing comma) are dropped.
pub fn parse_items(expression: &str) -> Result<Vec<RangeItem>, RangeError> {
    expression
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(RangeItem::parse)
        .collect()
}

/// Expand a backend expression such as `192.168.1.[5:6],192.168.1.10`
/// into concrete addresses, preserving the order they were written in.
pub fn expand(expression: &str) -> Result<Vec<String>, RangeError> {
    let items = parse_items(expression)?;
    let mut addresses = Vec::new();
    for item in &items {
        addresses.extend(item.addresses());
    }
    Ok(addresses)
}
