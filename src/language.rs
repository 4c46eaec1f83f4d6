//! Language drivers and compiled statement sources.
//!
//! A [`LanguageDriver`] turns the text produced by a provider routine into a
//! [`SqlSource`]; the source then yields a [`BoundSql`] for a parameter
//! object. [`RawLanguageDriver`] is the built-in driver: it replaces
//! `#{property}` placeholders with `?` and records a [`ParameterMapping`] per
//! placeholder.

use tracing::trace;

use sqlprovider_core::{BuilderError, Dynamic, ParamType};

use crate::Configuration;

/// Compiles statement text into a [`SqlSource`].
pub trait LanguageDriver: Send + Sync {
    fn create_sql_source(
        &self,
        configuration: &Configuration,
        script: &str,
        parameter_type: ParamType,
    ) -> Result<Box<dyn SqlSource>, BuilderError>;
}

/// Produces the executable statement for a parameter object.
pub trait SqlSource: Send + Sync {
    fn bound_sql(&self, parameter: &Dynamic) -> Result<BoundSql, BuilderError>;
}

/// One `#{...}` placeholder, in statement order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMapping {
    /// Property read from the parameter object.
    pub property: String,
    /// `key=value` options following the property, e.g. `jdbcType=INTEGER`.
    pub options: Vec<(String, String)>,
}

impl ParameterMapping {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            options: Vec::new(),
        }
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A statement ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundSql {
    sql: String,
    parameter_mappings: Vec<ParameterMapping>,
    parameter_object: Dynamic,
}

impl BoundSql {
    pub fn new(sql: impl Into<String>, parameter_mappings: Vec<ParameterMapping>, parameter_object: Dynamic) -> Self {
        Self {
            sql: sql.into(),
            parameter_mappings,
            parameter_object,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameter_mappings(&self) -> &[ParameterMapping] {
        &self.parameter_mappings
    }

    pub fn parameter_object(&self) -> &Dynamic {
        &self.parameter_object
    }

    /// Value for a mapped property.
    ///
    /// Maps are looked up by key. A scalar parameter object stands for every
    /// property. Null and native objects yield `None`.
    pub fn parameter_value(&self, property: &str) -> Option<&Dynamic> {
        match &self.parameter_object {
            Dynamic::Map(map) => map.get(property),
            Dynamic::Null | Dynamic::Native(_) | Dynamic::Context(_) => None,
            scalar => Some(scalar),
        }
    }
}

/// Statement text with its placeholders already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSqlSource {
    sql: String,
    parameter_mappings: Vec<ParameterMapping>,
}

impl StaticSqlSource {
    pub fn new(sql: impl Into<String>, parameter_mappings: Vec<ParameterMapping>) -> Self {
        Self {
            sql: sql.into(),
            parameter_mappings,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl SqlSource for StaticSqlSource {
    fn bound_sql(&self, parameter: &Dynamic) -> Result<BoundSql, BuilderError> {
        Ok(BoundSql::new(
            self.sql.clone(),
            self.parameter_mappings.clone(),
            parameter.clone(),
        ))
    }
}

/// Built-in driver for plain statement text with `#{}` placeholders.
///
/// `\#{` escapes a placeholder and is emitted as a literal `#{`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawLanguageDriver;

impl LanguageDriver for RawLanguageDriver {
    fn create_sql_source(
        &self,
        _configuration: &Configuration,
        script: &str,
        parameter_type: ParamType,
    ) -> Result<Box<dyn SqlSource>, BuilderError> {
        let (sql, mappings) = parse_placeholders(script)?;
        trace!(%parameter_type, placeholders = mappings.len(), "compiled raw statement");
        Ok(Box::new(StaticSqlSource::new(sql, mappings)))
    }
}

const OPEN: &str = "#{";
const CLOSE: char = '}';

/// Replace every `#{...}` with `?`, collecting the mappings in order.
pub fn parse_placeholders(script: &str) -> Result<(String, Vec<ParameterMapping>), BuilderError> {
    let mut sql = String::with_capacity(script.len());
    let mut mappings = Vec::new();
    let mut rest = script;

    while let Some(start) = rest.find(OPEN) {
        let (before, after_open) = (&rest[..start], &rest[start + OPEN.len()..]);

        if let Some(literal) = before.strip_suffix('\\') {
            sql.push_str(literal);
            sql.push_str(OPEN);
            rest = after_open;
            continue;
        }

        sql.push_str(before);
        let end = after_open.find(CLOSE).ok_or_else(|| BuilderError::Compile {
            message: format!("unterminated placeholder at offset {} in '{script}'", script.len() - rest.len() + start),
        })?;
        mappings.push(parse_mapping(&after_open[..end], script)?);
        sql.push('?');
        rest = &after_open[end + 1..];
    }

    sql.push_str(rest);
    Ok((sql, mappings))
}

fn parse_mapping(content: &str, script: &str) -> Result<ParameterMapping, BuilderError> {
    let mut parts = content.split(',');
    let property = parts.next().unwrap_or_default().trim();
    if property.is_empty() {
        return Err(BuilderError::Compile {
            message: format!("empty placeholder in '{script}'"),
        });
    }

    let mut mapping = ParameterMapping::new(property);
    for part in parts {
        let (key, value) = part.split_once('=').ok_or_else(|| BuilderError::Compile {
            message: format!("invalid placeholder option '{}' for '{property}'", part.trim()),
        })?;
        mapping
            .options
            .push((key.trim().to_string(), value.trim().to_string()));
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlprovider_core::ParamMap;

    #[test]
    fn replaces_placeholders_in_order() {
        let (sql, mappings) =
            parse_placeholders("SELECT * FROM users WHERE id = #{id} AND name = #{ name }").unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE id = ? AND name = ?");
        let names: Vec<_> = mappings.iter().map(|m| m.property.as_str()).collect();
        assert_eq!(names, ["id", "name"]);
    }

    #[test]
    fn placeholder_options() {
        let (_, mappings) = parse_placeholders("#{id, jdbcType=INTEGER,mode=IN}").unwrap();
        assert_eq!(mappings[0].option("jdbcType"), Some("INTEGER"));
        assert_eq!(mappings[0].option("mode"), Some("IN"));
        assert_eq!(mappings[0].option("javaType"), None);
    }

    #[test]
    fn escaped_placeholder_is_literal() {
        let (sql, mappings) = parse_placeholders(r"SELECT '\#{x}' , #{y}").unwrap();
        assert_eq!(sql, "SELECT '#{x}' , ?");
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].property, "y");
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let (sql, mappings) = parse_placeholders("SELECT 1").unwrap();
        assert_eq!(sql, "SELECT 1");
        assert!(mappings.is_empty());
    }

    #[test]
    fn malformed_placeholders() {
        assert!(matches!(parse_placeholders("id = #{id"), Err(BuilderError::Compile { .. })));
        assert!(matches!(parse_placeholders("id = #{ }"), Err(BuilderError::Compile { .. })));
        assert!(matches!(parse_placeholders("#{id, jdbcType}"), Err(BuilderError::Compile { .. })));
    }

    #[test]
    fn parameter_values() {
        let bound = BoundSql::new("?", vec![], Dynamic::Map(ParamMap::new().with("id", 7i64)));
        assert_eq!(bound.parameter_value("id"), Some(&Dynamic::Int(7)));
        assert_eq!(bound.parameter_value("name"), None);

        let bound = BoundSql::new("?", vec![], Dynamic::Int(3));
        assert_eq!(bound.parameter_value("anything"), Some(&Dynamic::Int(3)));

        let bound = BoundSql::new("?", vec![], Dynamic::Null);
        assert_eq!(bound.parameter_value("id"), None);
    }

    #[test]
    fn static_source_binds_parameter() {
        let source = StaticSqlSource::new("SELECT ?", vec![ParameterMapping::new("id")]);
        let bound = source.bound_sql(&Dynamic::Int(1)).unwrap();
        assert_eq!(bound.sql(), "SELECT ?");
        assert_eq!(bound.parameter_object(), &Dynamic::Int(1));
    }
}
