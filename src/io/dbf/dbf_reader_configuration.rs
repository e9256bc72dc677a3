//! Configuration for reading .dbf records.

use std::fmt;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};

use super::converter::{TypedConverter, ValueConverter};

/// Selects which fields end up in decoded records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldFilter {
    /// Keep every field.
    #[default]
    KeepAll,
    /// Keep only the named fields.
    KeepOnly(AHashSet<String>),
    /// Keep everything except the named fields.
    Skip(AHashSet<String>),
}

impl FieldFilter {
    pub fn keep_only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldFilter::KeepOnly(names.into_iter().map(Into::into).collect())
    }

    pub fn skip<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldFilter::Skip(names.into_iter().map(Into::into).collect())
    }

    /// Whether a field with this name is decoded.
    pub fn keeps(&self, name: &str) -> bool {
        match self {
            FieldFilter::KeepAll => true,
            FieldFilter::KeepOnly(names) => names.contains(name),
            FieldFilter::Skip(names) => !names.contains(name),
        }
    }
}

/// Configuration options for the dbf reader.
#[derive(Clone)]
pub struct DbfReaderConfiguration {
    /// Fields to decode. Default: [`FieldFilter::KeepAll`].
    pub filter: FieldFilter,

    /// Converters registered per field name.
    pub converters: AHashMap<String, Arc<dyn ValueConverter>>,

    /// Used for fields without a registered converter.
    /// Default: [`TypedConverter`].
    pub default_converter: Arc<dyn ValueConverter>,

    /// When `true`, a kept field without a registered converter fails with
    /// `ConverterNotFound` instead of using the default converter.
    /// Default: `false`.
    pub require_explicit_converter: bool,
}

impl DbfReaderConfiguration {
    pub fn with_filter(mut self, filter: FieldFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_converter<C>(mut self, field: impl Into<String>, converter: C) -> Self
    where
        C: ValueConverter + 'static,
    {
        self.converters.insert(field.into(), Arc::new(converter));
        self
    }

    pub fn with_default_converter<C>(mut self, converter: C) -> Self
    where
        C: ValueConverter + 'static,
    {
        self.default_converter = Arc::new(converter);
        self
    }

    pub fn require_explicit_converter(mut self) -> Self {
        self.require_explicit_converter = true;
        self
    }

    /// Converter to use for `field`, `None` when explicit converters are
    /// required and none is registered.
    pub fn converter_for(&self, field: &str) -> Option<&dyn ValueConverter> {
        match self.converters.get(field) {
            Some(converter) => Some(converter.as_ref()),
            None if self.require_explicit_converter => None,
            None => Some(self.default_converter.as_ref()),
        }
    }
}

impl Default for DbfReaderConfiguration {
    fn default() -> Self {
        Self {
            filter: FieldFilter::KeepAll,
            converters: AHashMap::new(),
            default_converter: Arc::new(TypedConverter::new()),
            require_explicit_converter: false,
        }
    }
}

impl fmt::Debug for DbfReaderConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut converters: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        converters.sort_unstable();
        f.debug_struct("DbfReaderConfiguration")
            .field("filter", &self.filter)
            .field("converters", &converters)
            .field("require_explicit_converter", &self.require_explicit_converter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::dbf::converter::IntegerConverter;

    #[test]
    fn test_defaults() {
        let cfg = DbfReaderConfiguration::default();
        assert_eq!(cfg.filter, FieldFilter::KeepAll);
        assert!(cfg.converters.is_empty());
        assert!(!cfg.require_explicit_converter);
        assert!(cfg.converter_for("ANY").is_some());
    }

    #[test]
    fn test_filter() {
        assert!(FieldFilter::KeepAll.keeps("A"));

        let only = FieldFilter::keep_only(["A", "B"]);
        assert!(only.keeps("A"));
        assert!(!only.keeps("C"));

        let skip = FieldFilter::skip(vec!["A".to_string()]);
        assert!(!skip.keeps("A"));
        assert!(skip.keeps("C"));
    }

    #[test]
    fn test_explicit_converters() {
        let cfg = DbfReaderConfiguration::default()
            .with_converter("ID", IntegerConverter)
            .require_explicit_converter();
        assert!(cfg.converter_for("ID").is_some());
        assert!(cfg.converter_for("NAME").is_none());
    }

    #[test]
    fn test_debug_lists_converter_names() {
        let cfg = DbfReaderConfiguration::default()
            .with_converter("B", IntegerConverter)
            .with_converter("A", IntegerConverter);
        let text = format!("{:?}", cfg);
        assert!(text.contains("[\"A\", \"B\"]"));
    }
}
