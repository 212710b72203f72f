/// One equivalence class: the display key plus every value added under it.
///
/// The display key is the casing of the first insertion; later adds under
/// differently-cased equal keys leave it untouched. A key of `None` is the
/// null key.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Entry {
    key: Option<String>,
    values: Vec<String>,
}

impl Entry {
    pub(crate) fn new(key: Option<&str>, value: Option<&str>) -> Self {
        let mut entry = Self {
            key: key.map(str::to_owned),
            values: Vec::new(),
        };
        entry.push(value);
        entry
    }

    pub(crate) fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub(crate) fn values(&self) -> &[String] {
        &self.values
    }

    /// Append a value. A null value leaves the list untouched, so an entry
    /// whose only contribution was null stays empty.
    pub(crate) fn push(&mut self, value: Option<&str>) {
        if let Some(value) = value {
            self.values.push(value.to_owned());
        }
    }

    /// Replace the whole value list.
    pub(crate) fn replace(&mut self, value: Option<&str>) {
        self.values.clear();
        self.push(value);
    }

    /// Comma-joined value string, `None` when no non-null value was added.
    pub(crate) fn joined(&self) -> Option<String> {
        match self.values.as_slice() {
            [] => None,
            [value] => Some(value.clone()),
            values => Some(values.join(",")),
        }
    }
}
