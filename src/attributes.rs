//! Binary attribute vectors and rule-based class derivation.
//!
//! The face datasets annotate every image with a fixed-width vector of
//! binary attributes at well-known indices. The attribute-pair reader turns
//! those vectors into a class label through an ordered rule list evaluated
//! first-match-wins; samples matching no rule stay unclassified and are
//! dropped from the record.

/// Width of the attribute vector.
pub const ATTRIBUTE_COUNT: usize = 40;

/// Attribute indices used by the built-in rules.
pub const ATTR_FIVE_OCLOCK_SHADOW: usize = 0;
pub const ATTR_EYEGLASSES: usize = 15;
pub const ATTR_GOATEE: usize = 16;
pub const ATTR_MALE: usize = 20;
pub const ATTR_MUSTACHE: usize = 22;
pub const ATTR_NO_BEARD: usize = 24;

/// A fixed-width binary attribute vector.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Attributes([u8; ATTRIBUTE_COUNT]);

impl Attributes {
    /// Builds a vector from the raw annotation values, which use `-1` for
    /// absent and `1` for present. `-1` maps to `0`; other values pass
    /// through. Returns `None` unless exactly [`ATTRIBUTE_COUNT`] values
    /// are given.
    pub fn from_signed(values: &[i8]) -> Option<Self> {
        if values.len() != ATTRIBUTE_COUNT {
            return None;
        }
        let mut row = [0u8; ATTRIBUTE_COUNT];
        for (slot, &value) in row.iter_mut().zip(values) {
            *slot = if value == -1 { 0 } else { value as u8 };
        }
        Some(Self(row))
    }

    /// Builds a vector directly from binary values.
    pub fn from_binary(values: [u8; ATTRIBUTE_COUNT]) -> Self {
        Self(values)
    }

    /// The attribute at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        self.0[index]
    }

    /// The full vector, in annotation order.
    #[inline]
    pub fn as_row(&self) -> &[u8; ATTRIBUTE_COUNT] {
        &self.0
    }
}

impl std::fmt::Debug for Attributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Attributes({:?})", &self.0[..])
    }
}

/// Male without a five-o'clock shadow.
pub fn is_male_no_stubble(attrs: &Attributes) -> bool {
    attrs.get(ATTR_MALE) == 1 && attrs.get(ATTR_FIVE_OCLOCK_SHADOW) == 0
}

/// Any facial hair: mustache, goatee, or the no-beard flag cleared.
pub fn has_beard(attrs: &Attributes) -> bool {
    attrs.get(ATTR_MUSTACHE) == 1 || attrs.get(ATTR_GOATEE) == 1 || attrs.get(ATTR_NO_BEARD) == 0
}

/// Wearing eyeglasses.
pub fn has_glasses(attrs: &Attributes) -> bool {
    attrs.get(ATTR_EYEGLASSES) == 1
}

/// One entry of an ordered rule list: a predicate and the class id it
/// assigns.
#[derive(Clone, Copy)]
pub struct Rule {
    pub class_id: i64,
    pub matches: fn(&Attributes) -> bool,
}

/// Evaluates rules first-match-wins; `None` means unclassified.
///
/// Class ids are the raw rule ids; there is deliberately no dense remap to
/// `[0, K)` here, and downstream consumers of rule-derived records tolerate
/// the raw (possibly non-contiguous) id space.
pub fn classify(rules: &[Rule], attrs: &Attributes) -> Option<i64> {
    rules
        .iter()
        .find(|rule| (rule.matches)(attrs))
        .map(|rule| rule.class_id)
}

fn bearded_no_glasses(attrs: &Attributes) -> bool {
    is_male_no_stubble(attrs) && has_beard(attrs) && !has_glasses(attrs)
}

fn glasses_no_beard(attrs: &Attributes) -> bool {
    is_male_no_stubble(attrs) && !has_beard(attrs) && has_glasses(attrs)
}

/// The beard-versus-glasses rule pair: bearded faces map to class 0,
/// glasses-wearing faces to class 1. Mutually exclusive by construction.
pub fn beard_glasses_rules() -> Vec<Rule> {
    vec![
        Rule {
            class_id: 0,
            matches: bearded_no_glasses,
        },
        Rule {
            class_id: 1,
            matches: glasses_no_beard,
        },
    ]
}
