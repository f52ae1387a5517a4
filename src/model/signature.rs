//! Model signature: the attributes a model was built over.
//!
//! The statistics formatter consults the signature to decide whether an
//! attribute's bins are ranges or category values. Attributes missing from
//! the signature are a tolerated snapshot defect, not a panic.

/// Declared type of a signature attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Continuous attribute; statistics bins are intervals.
    Numerical,
    /// Discrete attribute; statistics bins are category values.
    Categorical,
}

/// One signature entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureAttribute {
    /// Attribute name.
    pub name: String,
    /// Declared type.
    pub kind: AttributeKind,
}

impl SignatureAttribute {
    /// Signature entry for `name` with the given kind.
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered attribute list of one model, with lookup by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSignature {
    attributes: Vec<SignatureAttribute>,
}

impl ModelSignature {
    /// Empty signature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute, keeping declaration order.
    pub fn push(&mut self, attribute: SignatureAttribute) {
        self.attributes.push(attribute);
    }

    /// Builder-style numerical attribute.
    pub fn with_numerical(mut self, name: impl Into<String>) -> Self {
        self.push(SignatureAttribute::new(name, AttributeKind::Numerical));
        self
    }

    /// Builder-style categorical attribute.
    pub fn with_categorical(mut self, name: impl Into<String>) -> Self {
        self.push(SignatureAttribute::new(name, AttributeKind::Categorical));
        self
    }

    /// Declared kind of `name`, if the signature has it.
    pub fn kind_of(&self, name: &str) -> Option<AttributeKind> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.kind)
    }

    /// Iterate attributes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &SignatureAttribute> {
        self.attributes.iter()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// True when the signature declares no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl FromIterator<SignatureAttribute> for ModelSignature {
    fn from_iter<I: IntoIterator<Item = SignatureAttribute>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}
