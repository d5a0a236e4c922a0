//! This module contains the declaration model that the resolver operates
//! over.
//!
//! Declarations are produced by parsing contract source externally and handed
//! to this library as a finalized, immutable set. Nothing here depends on how
//! that parsing was performed.

use serde::{Deserialize, Serialize};

/// The kind of source construct that a [`Declaration`] was extracted from.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Stereotype {
    Contract,
    Struct,
    Enum,
    Interface,
    Abstract,
    Library,
}

/// The structural classification of a field's type, assigned when the field
/// was extracted from source.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum TypeKind {
    /// A language primitive such as `bool`, `address` or `uint128`.
    Elementary,

    /// A reference to another declaration by name.
    UserDefined,

    /// A `mapping(K => V)` type.
    Mapping,

    /// A static or dynamic array type.
    Array,

    /// A function type.
    Function,
}

/// The relation through which one declaration refers to another.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum AssociationKind {
    /// The source declaration inherits from the target.
    Inheritance,

    /// A field of the source declaration is typed by the target.
    FieldType,

    /// A function signature of the source declaration mentions the target.
    Signature,
}

/// A directed reference from one declaration to another, resolvable by name.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Association {
    /// The name of the declaration being referred to.
    pub target: String,

    /// The relation that produced the reference.
    pub kind: AssociationKind,
}

impl Association {
    /// Constructs a new association pointing at `target`.
    pub fn new(target: impl Into<String>, kind: AssociationKind) -> Self {
        let target = target.into();
        Self { target, kind }
    }
}

/// A named compile-time constant belonging to a declaration.
///
/// Constants matter to the resolver because fixed array dimensions may be
/// declared symbolically, naming a constant of the embedding declaration.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Constant {
    /// The name of the constant.
    pub name: String,

    /// The resolved integer value of the constant.
    pub value: usize,
}

impl Constant {
    /// Constructs a new constant `name` with the provided `value`.
    pub fn new(name: impl Into<String>, value: usize) -> Self {
        let name = name.into();
        Self { name, value }
    }
}

/// A single variable or member belonging to a declaration.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Field {
    /// The name of the field.
    pub name: String,

    /// The raw type descriptor for the field, exactly as written in source
    /// (for example `uint256`, `Token[2]` or `mapping(address=>uint256)`).
    #[serde(rename = "type")]
    pub typ: String,

    /// The structural classification of [`Self::typ`].
    pub kind: TypeKind,

    /// Whether the field was declared `constant` or `immutable`.
    ///
    /// Such fields are compiled into the code and occupy no storage.
    #[serde(default)]
    pub is_constant: bool,
}

impl Field {
    /// Constructs a new storage field `name` of the provided type.
    pub fn new(name: impl Into<String>, typ: impl Into<String>, kind: TypeKind) -> Self {
        let name = name.into();
        let typ = typ.into();
        Self {
            name,
            typ,
            kind,
            is_constant: false,
        }
    }

    /// Marks the field as declared `constant` or `immutable`.
    #[must_use]
    pub fn constant(mut self) -> Self {
        self.is_constant = true;
        self
    }
}

/// A single named construct extracted from contract source, together with its
/// fields, constants and references to other declarations.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Declaration {
    /// The stable identifier assigned to the declaration when it was
    /// extracted.
    ///
    /// Identifiers are unique within a [`DeclarationSet`].
    pub id: usize,

    /// The name of the declaration.
    pub name: String,

    /// The kind of construct the declaration was extracted from.
    pub stereotype: Stereotype,

    /// The declaration's fields, in source order.
    pub fields: Vec<Field>,

    /// The declaration's compile-time constants.
    pub constants: Vec<Constant>,

    /// References to other declarations, in source order.
    pub associations: Vec<Association>,
}

impl Declaration {
    /// Constructs a new declaration with no fields, constants or
    /// associations.
    pub fn new(id: usize, name: impl Into<String>, stereotype: Stereotype) -> Self {
        let name = name.into();
        Self {
            id,
            name,
            stereotype,
            fields: Vec::new(),
            constants: Vec::new(),
            associations: Vec::new(),
        }
    }

    /// Adds `field` to the declaration.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a compile-time constant `name` with the provided `value` to the
    /// declaration.
    #[must_use]
    pub fn with_constant(mut self, name: impl Into<String>, value: usize) -> Self {
        self.constants.push(Constant::new(name, value));
        self
    }

    /// Adds an association to the declaration.
    #[must_use]
    pub fn with_association(mut self, target: impl Into<String>, kind: AssociationKind) -> Self {
        self.associations.push(Association::new(target, kind));
        self
    }

    /// Adds an inheritance association to the declaration named `parent`.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.with_association(parent, AssociationKind::Inheritance)
    }

    /// Gets the declaration's immediate parents, in the order they were
    /// declared.
    pub fn parents(&self) -> impl Iterator<Item = &Association> {
        self.associations
            .iter()
            .filter(|association| association.kind == AssociationKind::Inheritance)
    }

    /// Gets the value of the declaration's constant named `name`, if one
    /// exists.
    #[must_use]
    pub fn constant_value(&self, name: &str) -> Option<usize> {
        self.constants
            .iter()
            .find(|constant| constant.name == name)
            .map(|constant| constant.value)
    }
}

/// An immutable collection of declarations, as extracted from one or more
/// source files.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct DeclarationSet {
    declarations: Vec<Declaration>,
}

impl DeclarationSet {
    /// Constructs a new, empty declaration set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `declaration` to the set.
    pub fn add(&mut self, declaration: Declaration) {
        self.declarations.push(declaration);
    }

    /// Gets the number of declarations in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Checks if the set contains no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Iterates over the declarations in the set in their insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// Finds the declaration whose name is exactly `name`, if one exists.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Declaration> {
        self.declarations
            .iter()
            .find(|declaration| declaration.name == name)
    }

    /// Resolves a type reference `name` to a declaration.
    ///
    /// An exact name match anywhere in the set always wins. Failing that, a
    /// reference qualified by its parent (`Library.Entry`) resolves to a
    /// declaration named by the part after the qualifier.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&Declaration> {
        if let Some(exact) = self.find(name) {
            return Some(exact);
        }

        dotted_suffix(name).and_then(|suffix| self.find(suffix))
    }
}

impl From<Vec<Declaration>> for DeclarationSet {
    fn from(declarations: Vec<Declaration>) -> Self {
        Self { declarations }
    }
}

impl FromIterator<Declaration> for DeclarationSet {
    fn from_iter<T: IntoIterator<Item = Declaration>>(iter: T) -> Self {
        let declarations = iter.into_iter().collect();
        Self { declarations }
    }
}

/// Gets the part of a qualified reference after its first qualifier, if the
/// reference is qualified at all.
pub(crate) fn dotted_suffix(name: &str) -> Option<&str> {
    name.split_once('.').map(|(_, suffix)| suffix)
}
