use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::catalog::CatalogQuery;
use crate::domain::keyword::{KeywordError, KeywordMode};
use crate::domain::kind::RecordKind;
use crate::domain::theme::Theme;
use crate::domain::types::TypeConstraintError;

/// Split a comma-separated query parameter, ignoring blank items.
fn split_list(value: Option<&str>) -> impl Iterator<Item = &str> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

/// Filter panel criteria as received in the query string.
///
/// `kinds` holds kind slugs or labels, `themes` theme labels, both
/// comma-separated. Missing parameters place no restriction. The keyword
/// length is checked after trimming, by [`crate::domain::keyword::KeywordMatcher`].
#[derive(Deserialize, Validate, Debug, Default)]
pub struct CatalogFilterForm {
    pub kinds: Option<String>,
    pub themes: Option<String>,
    pub q: Option<String>,
    pub mode: Option<String>,
}

#[derive(Debug, Error)]
pub enum CatalogFilterFormError {
    #[error("Catalog filter validation failed: {0}")]
    Validation(String),
    #[error("Catalog filter contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Catalog filter keyword is invalid: {0}")]
    Keyword(#[from] KeywordError),
}

impl From<ValidationErrors> for CatalogFilterFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CatalogFilterFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CatalogFilterForm> for CatalogQuery {
    type Error = CatalogFilterFormError;

    fn try_from(value: CatalogFilterForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let kinds = split_list(value.kinds.as_deref())
            .map(RecordKind::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let themes = split_list(value.themes.as_deref())
            .map(Theme::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let mode = KeywordMode::try_from(value.mode.as_deref().unwrap_or_default())?;

        Ok(CatalogQuery::new(
            kinds,
            themes,
            value.q.as_deref().unwrap_or_default(),
            mode,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::keyword::MAX_KEYWORD_LEN;

    #[test]
    fn empty_form_is_the_whole_catalog() {
        let query = CatalogQuery::try_from(CatalogFilterForm::default()).unwrap();
        assert_eq!(query, CatalogQuery::default());
    }

    #[test]
    fn parses_lists_of_kinds_and_themes() {
        let form = CatalogFilterForm {
            kinds: Some("publicacoes, Vídeo,,".into()),
            themes: Some("Saúde,Outro".into()),
            q: Some("  babaçu ".into()),
            mode: None,
        };

        let query = CatalogQuery::try_from(form).unwrap();

        assert_eq!(
            query.kinds.into_iter().collect::<Vec<_>>(),
            vec![RecordKind::Publication, RecordKind::Video]
        );
        assert_eq!(
            query.themes.into_iter().collect::<Vec<_>>(),
            vec![Theme::Health, Theme::Other]
        );
        let keyword = query.keyword.unwrap();
        assert_eq!(keyword.keyword(), "babaçu");
        assert_eq!(keyword.mode(), KeywordMode::Literal);
    }

    #[test]
    fn rejects_unknown_kinds_and_themes() {
        let form = CatalogFilterForm {
            kinds: Some("pessoas".into()),
            ..Default::default()
        };
        assert!(matches!(
            CatalogQuery::try_from(form),
            Err(CatalogFilterFormError::TypeConstraint(_))
        ));

        let form = CatalogFilterForm {
            themes: Some("Astronomia".into()),
            ..Default::default()
        };
        assert!(CatalogQuery::try_from(form).is_err());
    }

    #[test]
    fn invalid_patterns_are_form_errors() {
        let form = CatalogFilterForm {
            q: Some("(babaçu".into()),
            mode: Some("pattern".into()),
            ..Default::default()
        };
        assert!(matches!(
            CatalogQuery::try_from(form),
            Err(CatalogFilterFormError::Keyword(KeywordError::InvalidPattern(_)))
        ));

        let form = CatalogFilterForm {
            q: Some("(babaçu".into()),
            ..Default::default()
        };
        assert!(CatalogQuery::try_from(form).is_ok());
    }

    #[test]
    fn keyword_length_ignores_surrounding_spaces() {
        let form = CatalogFilterForm {
            q: Some(format!("   {}   ", "a".repeat(MAX_KEYWORD_LEN - 1))),
            ..Default::default()
        };
        assert!(CatalogQuery::try_from(form).is_ok());

        let form = CatalogFilterForm {
            q: Some("a".repeat(MAX_KEYWORD_LEN + 1)),
            ..Default::default()
        };
        assert!(matches!(
            CatalogQuery::try_from(form),
            Err(CatalogFilterFormError::Keyword(KeywordError::TooLong))
        ));
    }
}
