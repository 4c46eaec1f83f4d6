//! Provider annotations declared on mapper methods.

use std::fmt;

use sqlprovider_core::{BuilderError, MapperMethod};

use crate::Configuration;

/// Statement kind a provider annotation declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl ProviderKind {
    /// Annotation name used in error messages.
    pub fn annotation_name(&self) -> &'static str {
        match self {
            ProviderKind::Select => "SelectProvider",
            ProviderKind::Insert => "InsertProvider",
            ProviderKind::Update => "UpdateProvider",
            ProviderKind::Delete => "DeleteProvider",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.annotation_name())
    }
}

/// A `@SelectProvider`-style annotation.
///
/// `type_` and `value` are aliases for the provider type; `method` names the
/// routine. Empty strings count as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAnnotation {
    pub kind: ProviderKind,
    pub type_: Option<String>,
    pub value: Option<String>,
    pub method: Option<String>,
}

impl ProviderAnnotation {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            type_: None,
            value: None,
            method: None,
        }
    }

    pub fn select() -> Self {
        Self::new(ProviderKind::Select)
    }

    pub fn insert() -> Self {
        Self::new(ProviderKind::Insert)
    }

    pub fn update() -> Self {
        Self::new(ProviderKind::Update)
    }

    pub fn delete() -> Self {
        Self::new(ProviderKind::Delete)
    }

    pub fn with_type(mut self, provider_type: impl Into<String>) -> Self {
        self.type_ = Some(provider_type.into());
        self
    }

    pub fn with_value(mut self, provider_type: impl Into<String>) -> Self {
        self.value = Some(provider_type.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// The routine name, if one was given.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref().filter(|m| !m.is_empty())
    }

    /// Name of the provider type this annotation refers to.
    ///
    /// Falls back to the configured default when neither alias is set.
    pub fn provider_type(
        &self,
        configuration: &Configuration,
        mapper_method: Option<&MapperMethod>,
    ) -> Result<String, BuilderError> {
        let type_ = self.type_.as_deref().filter(|t| !t.is_empty());
        let value = self.value.as_deref().filter(|v| !v.is_empty());
        let at = || mapper_method.map_or_else(|| "null".to_string(), ToString::to_string);

        match (type_, value) {
            (None, None) => configuration
                .default_sql_provider_type()
                .map(str::to_string)
                .ok_or_else(|| BuilderError::MissingProviderIdentity {
                    annotation: self.kind.to_string(),
                    mapper_method: at(),
                }),
            (Some(t), Some(v)) if t != v => Err(BuilderError::ConflictingProviderIdentity {
                annotation: self.kind.to_string(),
                mapper_method: at(),
            }),
            (Some(name), _) | (None, Some(name)) => Ok(name.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method() -> MapperMethod {
        MapperMethod::new("UserMapper", "selectById")
    }

    #[test]
    fn kind_names() {
        assert_eq!(ProviderKind::Select.to_string(), "SelectProvider");
        assert_eq!(ProviderKind::Delete.to_string(), "DeleteProvider");
    }

    #[test]
    fn either_alias_names_the_type() {
        let config = Configuration::new();
        let by_type = ProviderAnnotation::select().with_type("UserSqlProvider");
        let by_value = ProviderAnnotation::select().with_value("UserSqlProvider");
        let both = by_type.clone().with_value("UserSqlProvider");
        for annotation in [by_type, by_value, both] {
            assert_eq!(
                annotation.provider_type(&config, Some(&method())).unwrap(),
                "UserSqlProvider"
            );
        }
    }

    #[test]
    fn default_provider_type() {
        let config = Configuration::new().with_default_sql_provider_type("Fallback");
        let annotation = ProviderAnnotation::insert().with_type("");
        assert_eq!(annotation.provider_type(&config, None).unwrap(), "Fallback");
    }

    #[test]
    fn missing_identity() {
        let err = ProviderAnnotation::update()
            .provider_type(&Configuration::new(), Some(&method()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please specify either 'value' or 'type' attribute of @UpdateProvider at the 'UserMapper.selectById'."
        );
    }

    #[test]
    fn conflicting_identity() {
        let err = ProviderAnnotation::delete()
            .with_type("A")
            .with_value("B")
            .provider_type(&Configuration::new(), Some(&method()))
            .unwrap_err();
        assert!(matches!(err, BuilderError::ConflictingProviderIdentity { .. }));
        assert!(err.to_string().contains("@DeleteProvider"));
    }

    #[test]
    fn empty_method_is_absent() {
        assert_eq!(ProviderAnnotation::select().with_method("").method(), None);
        assert_eq!(ProviderAnnotation::select().with_method("find").method(), Some("find"));
    }
}
