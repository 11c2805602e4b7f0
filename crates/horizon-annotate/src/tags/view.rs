/// A layout or object tag that does not take part in labeling.
///
/// Covers `<View>` as well as object tags such as `<Text>` or `<Image>`;
/// the element name is kept for debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    element: String,
    name: Option<String>,
}

impl View {
    /// Create a view for the given element name.
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            name: None,
        }
    }

    /// Set the `name` attribute.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Element name as written in the config, e.g. `"View"` or `"Text"`.
    pub fn element(&self) -> &str {
        &self.element
    }

    /// Value of the `name` attribute, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
