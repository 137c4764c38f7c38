use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::domain::types::TypeConstraintError;

/// Category of a catalog record. Every kind owns its own sub-collection.
///
/// The declaration order is the registration order used when merging
/// listings across kinds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    #[serde(rename = "publicacoes")]
    Publication,
    #[serde(rename = "imagens")]
    Image,
    #[serde(rename = "videos")]
    Video,
    #[serde(rename = "podcasts")]
    Podcast,
    #[serde(rename = "sites")]
    Site,
    #[serde(rename = "mapas")]
    Map,
    #[serde(rename = "legislacao")]
    Legislation,
    #[serde(rename = "pontos_de_interesse")]
    PointOfInterest,
    #[serde(rename = "relatorios")]
    Report,
    #[serde(rename = "organizacoes")]
    Organization,
    #[serde(rename = "projetos")]
    Project,
    #[serde(rename = "pesquisas")]
    Research,
}

impl RecordKind {
    /// All kinds in registration order.
    pub const ALL: [RecordKind; 12] = [
        Self::Publication,
        Self::Image,
        Self::Video,
        Self::Podcast,
        Self::Site,
        Self::Map,
        Self::Legislation,
        Self::PointOfInterest,
        Self::Report,
        Self::Organization,
        Self::Project,
        Self::Research,
    ];

    /// Sub-collection name, also used in persistence and URLs.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Publication => "publicacoes",
            Self::Image => "imagens",
            Self::Video => "videos",
            Self::Podcast => "podcasts",
            Self::Site => "sites",
            Self::Map => "mapas",
            Self::Legislation => "legislacao",
            Self::PointOfInterest => "pontos_de_interesse",
            Self::Report => "relatorios",
            Self::Organization => "organizacoes",
            Self::Project => "projetos",
            Self::Research => "pesquisas",
        }
    }

    /// Human readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Publication => "Publicação",
            Self::Image => "Imagem",
            Self::Video => "Vídeo",
            Self::Podcast => "Podcast",
            Self::Site => "Site",
            Self::Map => "Mapa",
            Self::Legislation => "Legislação",
            Self::PointOfInterest => "Ponto de interesse",
            Self::Report => "Relatório",
            Self::Organization => "Organização",
            Self::Project => "Projeto",
            Self::Research => "Pesquisa",
        }
    }

    /// Kinds whose details live in a storage folder rather than a single link.
    pub const fn uses_folder_listing(self) -> bool {
        matches!(self, Self::Organization | Self::Project | Self::Research)
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl TryFrom<&str> for RecordKind {
    type Error = TypeConstraintError;

    /// Accepts either the slug or the label.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == value || kind.label() == value)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("record kind: {value}")))
    }
}

impl TryFrom<String> for RecordKind {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slugs_and_labels() {
        assert_eq!(
            RecordKind::try_from("pontos_de_interesse").unwrap(),
            RecordKind::PointOfInterest
        );
        assert_eq!(RecordKind::try_from(" Vídeo ").unwrap(), RecordKind::Video);
        assert!(RecordKind::try_from("pessoas").is_err());
    }

    #[test]
    fn serializes_as_slug() {
        let value = serde_json::to_value(RecordKind::Legislation).unwrap();
        assert_eq!(value, serde_json::json!("legislacao"));
    }

    #[test]
    fn ordering_follows_registration() {
        let mut kinds = RecordKind::ALL.to_vec();
        kinds.reverse();
        kinds.sort();
        assert_eq!(kinds, RecordKind::ALL.to_vec());
    }
}
