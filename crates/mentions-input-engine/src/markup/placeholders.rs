/// The placeholder tokens a markup template may contain.
///
/// Each token may appear at most once. A template must contain at least one
/// of [`Placeholder::Id`] or [`Placeholder::Display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Id,
    Display,
    Kind,
}

impl Placeholder {
    pub const ID: &'static str = "__id__";
    pub const DISPLAY: &'static str = "__display__";
    pub const KIND: &'static str = "__type__";

    /// Order in which placeholders are swapped for capture groups when
    /// compiling a template.
    pub const REPLACEMENT_ORDER: [Placeholder; 3] =
        [Placeholder::Display, Placeholder::Id, Placeholder::Kind];

    /// The literal token as it appears in a template.
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Id => Self::ID,
            Placeholder::Display => Self::DISPLAY,
            Placeholder::Kind => Self::KIND,
        }
    }
}
