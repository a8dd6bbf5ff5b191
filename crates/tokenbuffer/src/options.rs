/// Construction-time configuration of a [`TokenBuffer`](crate::TokenBuffer).
///
/// Both flags are fixed once the buffer is built.
///
/// # Examples
///
/// ```rust
/// use tokenbuffer::{BufferOptions, TokenBuffer};
///
/// let buffer = TokenBuffer::new(BufferOptions {
///     has_native_ids: true,
///     ..Default::default()
/// });
/// assert!(buffer.can_write_type_id());
/// assert!(!buffer.force_wide_decimal());
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferOptions {
    /// Whether readers over the buffer report support for native type and
    /// object ids.
    ///
    /// Formats such as YAML carry type tags and anchors outside the value
    /// grammar. When this is enabled, structural copies into the buffer pick
    /// up the source's ids and readers advertise them to consumers.
    ///
    /// # Default
    ///
    /// `false`
    pub has_native_ids: bool,

    /// Whether floating-point scalars copied in from another source are
    /// always captured as arbitrary-precision decimals.
    ///
    /// Values written directly through the sink methods keep whatever
    /// representation the caller chose.
    ///
    /// # Default
    ///
    /// `false`
    pub force_wide_decimal: bool,
}
