use facet::Facet;

/// Name of the field every strategy writes to.
pub const TEXT_PROPERTY: &str = "text";

/// The benchmark target: a record holding a single mutable text field.
#[derive(Facet, Debug, Default, Clone, PartialEq, Eq)]
pub struct Dummy {
    /// Holds the last string written to it.
    pub text: String,
}

impl Dummy {
    /// Creates a target with an empty `text`.
    pub fn new() -> Self {
        Self::default()
    }
}
