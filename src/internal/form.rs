use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::config::BackendKind;
use crate::internal::models::{Pot, PotDraft, Price};

/// Fields of the pot form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum FormField {
    Name,
    Category,
    Price,
    Description,
    #[strum(to_string = "Image URL")]
    Image,
}

impl FormField {
    /// Fields a backend needs before it will accept a save.
    pub fn required_for(backend: BackendKind) -> Vec<FormField> {
        match backend {
            BackendKind::Remote => FormField::iter().collect(),
            BackendKind::Local => vec![FormField::Name, FormField::Category],
        }
    }

    /// Fields the form shows: the backend's own plus any extra that config
    /// makes required, so a required field is always reachable.
    pub fn active_for(backend: BackendKind, required: &[FormField]) -> Vec<FormField> {
        let base = FormField::required_for(backend);
        FormField::iter()
            .filter(|field| base.contains(field) || required.contains(field))
            .collect()
    }
}

/// How the price text is checked before it leaves the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriceRule {
    /// Send whatever was typed.
    #[default]
    Any,
    /// Must parse as a number.
    Numeric,
    /// Must parse as a number >= 0.
    NonNegative,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationRules {
    pub required: Vec<FormField>,
    pub price: PriceRule,
    pub image_pattern: Option<Regex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";

/// Scratch values of the add/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct PotForm {
    name: String,
    category: String,
    price: String,
    description: String,
    image: String,
    fields: Vec<FormField>,
    focus: usize,
}

impl PotForm {
    /// A form showing only `fields` (the rest stay empty and are never focused).
    pub fn new(fields: Vec<FormField>) -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            price: String::new(),
            description: String::new(),
            image: String::new(),
            fields,
            focus: 0,
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Category => &self.category,
            FormField::Price => &self.price,
            FormField::Description => &self.description,
            FormField::Image => &self.image,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Category => &mut self.category,
            FormField::Price => &mut self.price,
            FormField::Description => &mut self.description,
            FormField::Image => &mut self.image,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.value_mut(field) = value.into();
    }

    pub fn focused(&self) -> Option<FormField> {
        self.fields.get(self.focus).copied()
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = match self.focus {
                0 => self.fields.len() - 1,
                n => n - 1,
            };
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.focused() {
            self.value_mut(field).push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.focused() {
            self.value_mut(field).pop();
        }
    }

    /// Pre-populate every field from an existing record.
    pub fn load(&mut self, pot: &Pot) {
        self.name = pot.name.clone();
        self.category = pot.category.clone();
        self.price = pot.price.to_string();
        self.description = pot.description.clone();
        self.image = pot.image.clone();
        self.focus = 0;
    }

    pub fn clear(&mut self) {
        for field in FormField::iter() {
            self.value_mut(field).clear();
        }
        self.focus = 0;
    }

    pub fn is_empty(&self) -> bool {
        FormField::iter().all(|field| self.value(field).is_empty())
    }

    /// Check the form against `rules` and build the request body.
    ///
    /// Any blank required field fails the whole form with one blanket message.
    pub fn validate(&self, rules: &ValidationRules) -> Result<PotDraft, ValidationError> {
        if rules
            .required
            .iter()
            .any(|field| self.value(*field).trim().is_empty())
        {
            return Err(ValidationError::new(ALL_FIELDS_REQUIRED));
        }

        let price = match (rules.price, self.price.trim()) {
            (PriceRule::Any, _) | (_, "") => Price::Text(self.price.clone()),
            (rule, raw) => {
                let value: f64 = raw
                    .parse()
                    .ok()
                    .filter(|v: &f64| v.is_finite())
                    .ok_or_else(|| ValidationError::new("Price must be a number"))?;
                if rule == PriceRule::NonNegative && value < 0.0 {
                    return Err(ValidationError::new("Price must not be negative"));
                }
                Price::Number(value)
            }
        };

        if let Some(re) = &rules.image_pattern
            && !self.image.is_empty()
            && !re.is_match(&self.image)
        {
            return Err(ValidationError::new("Image URL is not valid"));
        }

        Ok(PotDraft {
            name: self.name.clone(),
            category: self.category.clone(),
            price,
            description: self.description.clone(),
            image: self.image.clone(),
        })
    }
}
