/// Textual form used for arbitrary-precision integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BigIntFormat {
    /// Plain base-10 digits with an optional leading `-` (`"42"`).
    #[default]
    Decimal,
    /// Decimal digits followed by `n` (`"42n"`). Meant for debug output only.
    Suffixed,
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Containers nested deeper than this are replaced by null (None = unlimited)
    pub max_depth: Option<usize>,
    pub bigint_format: BigIntFormat,
    /// Pretty-print JSON text output
    pub pretty: bool,
}

