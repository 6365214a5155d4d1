//! Named property access for hosts with a generic property protocol.
//!
//! Widgets that dispatch "set property by name" map names to
//! [`EditProperty`] and values to [`PropertyValue`]. Unknown names yield
//! `NotFound` so the host can try another handler.

use crate::buffer::EditBuffer;
use crate::error::{EditError, EditResult};
use crate::state::InsertMode;
use crate::text_edit::TextEdit;

/// Properties an edit session answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditProperty {
    Text,
    Cursor,
    SelectStart,
    SelectEnd,
    WrapWord,
    MaxRows,
    InsertMode,
}

impl EditProperty {
    /// Look up a property by its name.
    ///
    /// # Examples
    ///
    /// ```
    /// use wrapedit_core::property::EditProperty;
    ///
    /// assert_eq!(EditProperty::from_name("cursor").unwrap(), EditProperty::Cursor);
    /// assert!(EditProperty::from_name("opacity").unwrap_err().is_not_found());
    /// ```
    pub fn from_name(name: &str) -> EditResult<Self> {
        match name {
            "text" => Ok(EditProperty::Text),
            "cursor" => Ok(EditProperty::Cursor),
            "select_start" => Ok(EditProperty::SelectStart),
            "select_end" => Ok(EditProperty::SelectEnd),
            "wrap_word" => Ok(EditProperty::WrapWord),
            "max_rows" => Ok(EditProperty::MaxRows),
            "insert_mode" => Ok(EditProperty::InsertMode),
            _ => Err(EditError::not_found(name)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditProperty::Text => "text",
            EditProperty::Cursor => "cursor",
            EditProperty::SelectStart => "select_start",
            EditProperty::SelectEnd => "select_end",
            EditProperty::WrapWord => "wrap_word",
            EditProperty::MaxRows => "max_rows",
            EditProperty::InsertMode => "insert_mode",
        }
    }
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Text(String),
    Offset(usize),
    Count(usize),
    Bool(bool),
    InsertMode(InsertMode),
}

impl<B: EditBuffer> TextEdit<B> {
    /// Read a property.
    pub fn get_property(&self, property: EditProperty) -> PropertyValue {
        let state = self.state();
        match property {
            EditProperty::Text => PropertyValue::Text(self.text()),
            EditProperty::Cursor => PropertyValue::Offset(state.cursor),
            EditProperty::SelectStart => PropertyValue::Offset(state.select_start),
            EditProperty::SelectEnd => PropertyValue::Offset(state.select_end),
            EditProperty::WrapWord => PropertyValue::Bool(self.wrap_word()),
            EditProperty::MaxRows => PropertyValue::Count(self.rows().capacity()),
            EditProperty::InsertMode => PropertyValue::InsertMode(self.insert_mode()),
        }
    }

    /// Write a property through the matching typed setter.
    ///
    /// Returns `BadParams` when the value type does not fit the property.
    pub fn set_property(&mut self, property: EditProperty, value: PropertyValue) -> EditResult<()> {
        match (property, value) {
            (EditProperty::Text, PropertyValue::Text(text)) => {
                let units: Vec<char> = text.chars().collect();
                self.reset_text(&units)
            }
            (EditProperty::Cursor, PropertyValue::Offset(offset)) => {
                self.set_cursor(offset);
                Ok(())
            }
            (EditProperty::SelectStart, PropertyValue::Offset(offset)) => {
                let end = self.state().select_end;
                self.set_select(offset, end);
                Ok(())
            }
            (EditProperty::SelectEnd, PropertyValue::Offset(offset)) => {
                let start = self.state().select_start;
                self.set_select(start, offset);
                Ok(())
            }
            (EditProperty::WrapWord, PropertyValue::Bool(enabled)) => {
                self.set_wrap_word(enabled);
                Ok(())
            }
            (EditProperty::MaxRows, PropertyValue::Count(rows)) => self.set_max_rows(rows),
            (EditProperty::InsertMode, PropertyValue::InsertMode(mode)) => {
                self.set_insert_mode(mode);
                Ok(())
            }
            (property, value) => Err(EditError::BadParams(format!(
                "{value:?} is not a valid value for {}",
                property.name()
            ))),
        }
    }

    /// Read a property by name.
    pub fn get_property_by_name(&self, name: &str) -> EditResult<PropertyValue> {
        EditProperty::from_name(name).map(|p| self.get_property(p))
    }

    /// Write a property by name.
    pub fn set_property_by_name(&mut self, name: &str, value: PropertyValue) -> EditResult<()> {
        let property = EditProperty::from_name(name)?;
        self.set_property(property, value)
    }
}
