//! This module contains a small parser for the raw type descriptor strings
//! carried on fields.
//!
//! Descriptors arrive exactly as written in source (`uint128`, `Token[2]`,
//! `mapping(address=>Pool.Entry)`), and the layout rules only ever need three
//! structured views of them: the elementary classification of a plain name,
//! the element and dimensions of an array suffix, and the value type of a
//! mapping. Everything else in the crate works on these structured results
//! rather than on the strings themselves.

/// An elementary type, parsed from a plain type name.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Elementary {
    /// The `bool` type.
    Bool,

    /// The `address` type.
    Address,

    /// The dynamically-sized `string` type.
    String,

    /// The dynamically-sized `bytes` type.
    Bytes,

    /// `uintN`, or bare `uint` when no width is given.
    UInt { bits: Option<u32> },

    /// `intN`, or bare `int` when no width is given.
    Int { bits: Option<u32> },

    /// `ufixedMxN`, or bare `ufixed` when no width is given.
    UFixed { bits: Option<u32> },

    /// `fixedMxN`, or bare `fixed` when no width is given.
    Fixed { bits: Option<u32> },

    /// The fixed-size `bytesN` type.
    FixedBytes { bytes: u32 },
}

impl Elementary {
    /// Parses `name` as an elementary type name.
    ///
    /// A name is elementary if it is one of the eight unsized primitives, or
    /// a sized form: an optional leading `u`, one of `int`, `fixed` or
    /// `bytes`, and at least one digit. Anything after the digits is
    /// tolerated so that widths such as `fixed128x18` size by their first
    /// component. The pattern must cover the name from its start; names that
    /// merely embed a sized form somewhere inside are not elementary.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Bool),
            "address" => Some(Self::Address),
            "string" => Some(Self::String),
            "bytes" => Some(Self::Bytes),
            "uint" => Some(Self::UInt { bits: None }),
            "int" => Some(Self::Int { bits: None }),
            "ufixed" => Some(Self::UFixed { bits: None }),
            "fixed" => Some(Self::Fixed { bits: None }),
            _ => Self::parse_sized(name),
        }
    }

    /// Parses the sized elementary forms: `uintN`, `intN`, `ufixedN`,
    /// `fixedN` and `bytesN`.
    fn parse_sized(name: &str) -> Option<Self> {
        let (unsigned, rest) = match name.strip_prefix('u') {
            Some(rest) => (true, rest),
            None => (false, name),
        };

        if let Some(tail) = rest.strip_prefix("int") {
            let bits = Some(leading_number(tail)?);
            return if unsigned {
                Some(Self::UInt { bits })
            } else {
                Some(Self::Int { bits })
            };
        }

        if let Some(tail) = rest.strip_prefix("fixed") {
            let bits = Some(leading_number(tail)?);
            return if unsigned {
                Some(Self::UFixed { bits })
            } else {
                Some(Self::Fixed { bits })
            };
        }

        if let Some(tail) = rest.strip_prefix("bytes") {
            let bytes = leading_number(tail)?;
            return Some(Self::FixedBytes { bytes });
        }

        None
    }
}

/// Takes the number formed by the leading run of ASCII digits in `text`.
fn leading_number(text: &str) -> Option<u32> {
    let digits_end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if digits_end == 0 {
        return None;
    }

    text[..digits_end].parse().ok()
}

/// Checks whether `name` names an elementary type.
#[must_use]
pub fn is_elementary(name: &str) -> bool {
    Elementary::parse(name).is_some()
}

/// A single dimension of an array type.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Dimension {
    /// A literal dimension, as in `[3]`.
    Fixed(usize),

    /// A dimension naming a declared constant, as in `[MAX_ENTRIES]`.
    Named(String),

    /// An empty or otherwise non-literal dimension; the array is treated as
    /// dynamically sized.
    Dynamic,
}

/// The structured form of an array type descriptor.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ArrayDescriptor {
    /// The name of the element type, which may be qualified
    /// (`Library.Entry`).
    pub element: String,

    /// The array's dimensions, outermost first.
    pub dimensions: Vec<Dimension>,
}

impl ArrayDescriptor {
    /// Checks whether any of the array's dimensions is dynamic.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.dimensions
            .iter()
            .any(|dimension| matches!(dimension, Dimension::Dynamic))
    }
}

/// Parses `descriptor` as an array type: a plain (possibly qualified) element
/// name followed by one or more bracketed dimensions that run to the end of
/// the descriptor.
///
/// Descriptors that are not of that shape, such as arrays of mappings, return
/// [`None`] and are treated by the sizing rules as occupying a single slot.
#[must_use]
pub fn parse_array(descriptor: &str) -> Option<ArrayDescriptor> {
    let open = descriptor.find('[')?;
    let element = &descriptor[..open];
    if element.is_empty() || !element.chars().all(is_name_char) {
        return None;
    }

    let mut dimensions = Vec::new();
    let mut rest = &descriptor[open..];
    while !rest.is_empty() {
        let body = rest.strip_prefix('[')?;
        let close = body.find(']')?;
        dimensions.push(parse_dimension(&body[..close]));
        rest = &body[close + 1..];
    }

    let element = element.to_string();
    Some(ArrayDescriptor {
        element,
        dimensions,
    })
}

/// Extracts the value type name of a mapping descriptor.
///
/// For mappings of mappings this is the value of the innermost mapping, found
/// by skipping any arrow whose value position opens another `mapping`. The
/// extracted name may be qualified; value types that are not plain names (for
/// example arrays) yield the element name before their suffix.
#[must_use]
pub fn mapping_value_type(descriptor: &str) -> Option<&str> {
    for (index, _) in descriptor.match_indices("=>") {
        let rest = &descriptor[index + 2..];
        let end = rest
            .find(|c: char| !is_name_char(c))
            .unwrap_or(rest.len());
        let name = &rest[..end];

        if name.is_empty() || name.starts_with("mapping") {
            continue;
        }

        return Some(name);
    }

    None
}

/// Checks whether `c` can appear in a (possibly qualified) type name.
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Parses the text between one pair of array brackets.
fn parse_dimension(text: &str) -> Dimension {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Dimension::Dynamic;
    }

    match text.parse::<usize>() {
        Ok(count) => Dimension::Fixed(count),
        Err(_) => Dimension::Named(text.to_string()),
    }
}

#[cfg(test)]
mod test {
    use crate::descriptor::{
        is_elementary,
        mapping_value_type,
        parse_array,
        Dimension,
        Elementary,
    };

    #[test]
    fn parses_unsized_primitives() {
        assert_eq!(Elementary::parse("bool"), Some(Elementary::Bool));
        assert_eq!(Elementary::parse("address"), Some(Elementary::Address));
        assert_eq!(Elementary::parse("string"), Some(Elementary::String));
        assert_eq!(Elementary::parse("bytes"), Some(Elementary::Bytes));
        assert_eq!(Elementary::parse("uint"), Some(Elementary::UInt { bits: None }));
        assert_eq!(Elementary::parse("fixed"), Some(Elementary::Fixed { bits: None }));
    }

    #[test]
    fn parses_sized_primitives() {
        assert_eq!(
            Elementary::parse("uint128"),
            Some(Elementary::UInt { bits: Some(128) })
        );
        assert_eq!(
            Elementary::parse("int8"),
            Some(Elementary::Int { bits: Some(8) })
        );
        assert_eq!(
            Elementary::parse("bytes27"),
            Some(Elementary::FixedBytes { bytes: 27 })
        );
        assert_eq!(
            Elementary::parse("fixed128x18"),
            Some(Elementary::Fixed { bits: Some(128) })
        );
    }

    #[test]
    fn rejects_names_that_merely_embed_a_primitive() {
        assert_eq!(Elementary::parse("myint8"), None);
        assert_eq!(Elementary::parse("Counter"), None);
        assert_eq!(Elementary::parse("bytesN"), None);
        assert!(!is_elementary("Token"));
        assert!(is_elementary("uint256"));
    }

    #[test]
    fn parses_array_descriptors() {
        let parsed = parse_array("uint256[3]").unwrap();
        assert_eq!(parsed.element, "uint256");
        assert_eq!(parsed.dimensions, vec![Dimension::Fixed(3)]);

        let parsed = parse_array("Token[2][MAX]").unwrap();
        assert_eq!(parsed.element, "Token");
        assert_eq!(
            parsed.dimensions,
            vec![Dimension::Fixed(2), Dimension::Named("MAX".to_string())]
        );

        let parsed = parse_array("Library.Entry[]").unwrap();
        assert_eq!(parsed.element, "Library.Entry");
        assert!(parsed.is_dynamic());
    }

    #[test]
    fn rejects_non_array_shapes() {
        assert!(parse_array("uint256").is_none());
        assert!(parse_array("[3]").is_none());
        assert!(parse_array("mapping(uint256=>uint256)[]").is_none());
        assert!(parse_array("uint256[3]x").is_none());
    }

    #[test]
    fn expression_dimensions_read_as_dynamic() {
        let parsed = parse_array("uint256[2 * COLS]").unwrap();
        assert_eq!(parsed.dimensions, vec![Dimension::Dynamic]);
    }

    #[test]
    fn extracts_mapping_value_types() {
        assert_eq!(
            mapping_value_type("mapping(address=>uint256)"),
            Some("uint256")
        );
        assert_eq!(
            mapping_value_type("mapping(address=>Pool.Entry)"),
            Some("Pool.Entry")
        );
        assert_eq!(
            mapping_value_type("mapping(uint256=>mapping(address=>Token))"),
            Some("Token")
        );
        assert_eq!(
            mapping_value_type("mapping(address=>Token[4])"),
            Some("Token")
        );
        assert_eq!(mapping_value_type("uint256"), None);
    }
}
