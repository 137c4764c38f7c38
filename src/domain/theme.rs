use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::domain::types::TypeConstraintError;

/// Controlled-vocabulary subject tag. `Other` is the catch-all.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Theme {
    #[serde(rename = "Comunidades e Povos Tradicionais")]
    TraditionalCommunities,
    #[serde(rename = "Cultura e Tradição")]
    Culture,
    #[serde(rename = "Economia e Comercialização")]
    Economy,
    #[serde(rename = "Educação")]
    Education,
    #[serde(rename = "Gastronomia")]
    Gastronomy,
    #[serde(rename = "Legislação e Políticas Públicas")]
    PublicPolicy,
    #[serde(rename = "Meio Ambiente")]
    Environment,
    #[serde(rename = "Produção e Agricultura")]
    Agriculture,
    #[serde(rename = "Saúde")]
    Health,
    #[serde(rename = "Sustentabilidade")]
    Sustainability,
    #[serde(rename = "Tecnologia e Inovação")]
    Technology,
    #[serde(rename = "Outro")]
    Other,
}

impl Theme {
    /// Every theme, alphabetical by label with `Other` last.
    pub const ALL: [Theme; 12] = [
        Self::TraditionalCommunities,
        Self::Culture,
        Self::Economy,
        Self::Education,
        Self::Gastronomy,
        Self::PublicPolicy,
        Self::Environment,
        Self::Agriculture,
        Self::Health,
        Self::Sustainability,
        Self::Technology,
        Self::Other,
    ];

    /// Label used in persistence and display.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TraditionalCommunities => "Comunidades e Povos Tradicionais",
            Self::Culture => "Cultura e Tradição",
            Self::Economy => "Economia e Comercialização",
            Self::Education => "Educação",
            Self::Gastronomy => "Gastronomia",
            Self::PublicPolicy => "Legislação e Políticas Públicas",
            Self::Environment => "Meio Ambiente",
            Self::Agriculture => "Produção e Agricultura",
            Self::Health => "Saúde",
            Self::Sustainability => "Sustentabilidade",
            Self::Technology => "Tecnologia e Inovação",
            Self::Other => "Outro",
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Theme {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str() == value)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("theme: {value}")))
    }
}

impl TryFrom<String> for Theme {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Theme> for String {
    fn from(value: Theme) -> Self {
        value.as_str().to_string()
    }
}
