use reqwest::multipart::Form;

/// How an endpoint expects staged image changes to be encoded.
///
/// The backend routes are not interchangeable: the land edit route reads a
/// JSON `manageImages` field, the others read indexed form keys.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ImageEncoding {
    ManageImagesJson,
    IndexedFields,
}

/// Ordered text fields for a multipart body, with `field[index][subfield]` helpers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedFields {
    fields: Vec<(String, String)>,
}

impl IndexedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.fields.push((key.into(), value.to_string()));
        self
    }

    /// Skips `None` and blank values.
    pub fn push_opt<V: ToString>(&mut self, key: impl Into<String>, value: Option<V>) -> &mut Self {
        if let Some(value) = value.map(|v| v.to_string()).filter(|v| !v.trim().is_empty()) {
            self.fields.push((key.into(), value));
        }
        self
    }

    /// `field[index]`
    pub fn push_indexed(&mut self, field: &str, index: usize, value: impl ToString) -> &mut Self {
        self.push(format!("{field}[{index}]"), value)
    }

    /// `field[index][subfield]`
    pub fn push_item(
        &mut self,
        field: &str,
        index: usize,
        subfield: &str,
        value: impl ToString,
    ) -> &mut Self {
        self.push(format!("{field}[{index}][{subfield}]"), value)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_form(self) -> Form {
        self.fields
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value))
    }
}

/// A mutation body: JSON when there are no files, multipart otherwise.
#[derive(Debug)]
pub enum FormBody {
    Json(serde_json::Value),
    Multipart(Form),
}

impl FormBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}
