use crate::fields::{self, CategoricalField, FieldSpec, NumericField};
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

/// Errors raised while filling in the form
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("'{0}' is not a numeric field")]
    NotNumeric(String),

    #[error("'{0}' is not a dropdown")]
    NotDropdown(String),

    #[error("'{value}' is not an option for '{field}'")]
    UnknownOption { field: String, value: String },
}

/// A single value in the submitted record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Integer(u64),
    Category(String),
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Integer(value) => serializer.serialize_u64(*value),
            FieldValue::Category(value) => serializer.serialize_str(value),
        }
    }
}

/// Snapshot of the form taken right before a submission.
///
/// Serializes as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRecord {
    entries: Vec<(&'static str, FieldValue)>,
}

impl FieldRecord {
    pub fn push(&mut self, name: &'static str, value: FieldValue) {
        self.entries.push((name, value));
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for FieldRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Numeric input with up/down stepping
#[derive(Debug, Clone)]
pub struct NumberInput {
    field: &'static NumericField,
    raw: String,
}

impl NumberInput {
    pub fn new(field: &'static NumericField) -> Self {
        Self {
            field,
            raw: String::new(),
        }
    }

    pub fn field(&self) -> &'static NumericField {
        self.field
    }

    #[cfg(test)]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn set_raw(&mut self, raw: impl Into<String>) {
        self.raw = raw.into();
    }

    /// Current value; anything that does not parse as an integer counts as 0
    pub fn value(&self) -> u64 {
        parse_or_zero(&self.raw)
    }

    /// Add `delta` to the current value, never going below zero
    pub fn adjust(&mut self, delta: i64) {
        let current = self.value() as i64;
        let next = current.saturating_add(delta).max(0);
        self.raw = next.to_string();
    }

    pub fn step_up(&mut self) {
        self.adjust(self.field.step as i64);
    }

    pub fn step_down(&mut self) {
        self.adjust(-(self.field.step as i64));
    }
}

fn parse_or_zero(raw: &str) -> u64 {
    match raw.trim().parse::<i64>() {
        Ok(value) if value > 0 => value as u64,
        _ => 0,
    }
}

/// Dropdown restricted to the options of one categorical field
#[derive(Debug, Clone)]
pub struct Dropdown {
    field: &'static CategoricalField,
    selected: usize,
    open: bool,
}

impl Dropdown {
    pub fn new(field: &'static CategoricalField) -> Self {
        Self {
            field,
            selected: 0,
            open: false,
        }
    }

    pub fn field(&self) -> &'static CategoricalField {
        self.field
    }

    pub fn selected(&self) -> &'static str {
        self.field.options[self.selected]
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Select `value` and close the list. Values outside the option list are rejected.
    pub fn select(&mut self, value: &str) -> Result<(), FormError> {
        let index = self
            .field
            .options
            .iter()
            .position(|option| *option == value)
            .ok_or_else(|| FormError::UnknownOption {
                field: self.field.name.to_string(),
                value: value.to_string(),
            })?;
        self.selected = index;
        self.open = false;
        Ok(())
    }
}

/// Every widget of the form, kept in wire order
#[derive(Debug, Clone)]
pub enum Widget {
    Number(NumberInput),
    Choice(Dropdown),
}

impl Widget {
    pub fn name(&self) -> &'static str {
        match self {
            Widget::Number(input) => input.field().name,
            Widget::Choice(dropdown) => dropdown.field().name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Form {
    widgets: Vec<Widget>,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    pub fn new() -> Self {
        let widgets = fields::WIRE_ORDER
            .into_iter()
            .map(|spec| match spec {
                FieldSpec::Numeric(field) => Widget::Number(NumberInput::new(field)),
                FieldSpec::Categorical(field) => Widget::Choice(Dropdown::new(field)),
            })
            .collect();
        Self { widgets }
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widget_mut(&mut self, name: &str) -> Result<&mut Widget, FormError> {
        self.widgets
            .iter_mut()
            .find(|widget| widget.name() == name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    /// Route a raw value to the named widget
    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
        match self.widget_mut(name)? {
            Widget::Number(input) => input.set_raw(raw),
            Widget::Choice(dropdown) => dropdown.select(raw)?,
        }
        Ok(())
    }

    pub fn step(&mut self, name: &str, up: bool) -> Result<(), FormError> {
        match self.widget_mut(name)? {
            Widget::Number(input) if up => input.step_up(),
            Widget::Number(input) => input.step_down(),
            Widget::Choice(_) => return Err(FormError::NotNumeric(name.to_string())),
        }
        Ok(())
    }

    /// Close every open dropdown
    pub fn dismiss_dropdowns(&mut self) {
        for widget in &mut self.widgets {
            if let Widget::Choice(dropdown) = widget {
                dropdown.close();
            }
        }
    }

    /// Snapshot the current values
    pub fn collect(&self) -> FieldRecord {
        let mut record = FieldRecord::default();
        for widget in &self.widgets {
            match widget {
                Widget::Number(input) => {
                    record.push(input.field().name, FieldValue::Integer(input.value()))
                }
                Widget::Choice(dropdown) => record.push(
                    dropdown.field().name,
                    FieldValue::Category(dropdown.selected().to_string()),
                ),
            }
        }
        record
    }
}
