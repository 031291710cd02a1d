//! Catalog endpoints
//!
//! The placement chain (bacs, séries, filières, niveaux) is served as
//! parent-scoped lists; the rest are flat lookups. All of them answer either
//! a bare array or a paginated envelope, which `get_list` absorbs.

use crate::client::PortalClient;
use crate::error::ClientResult;
use async_trait::async_trait;
use portal_enroll::{CatalogError, CatalogSource};
use portal_types::{Center, Department, ExamType, Level, Mention, OptionId, Program, Region, Track};

impl PortalClient {
    pub async fn exam_types(&self) -> ClientResult<Vec<ExamType>> {
        self.get_list("/config/bacs/").await
    }

    pub async fn tracks_of(&self, exam_type: OptionId) -> ClientResult<Vec<Track>> {
        self.get_list(&format!("/config/bacs/{}/series/", exam_type))
            .await
    }

    pub async fn programs_of(&self, track: OptionId) -> ClientResult<Vec<Program>> {
        self.get_list(&format!("/config/series/{}/filieres/", track))
            .await
    }

    pub async fn levels_of(&self, track: OptionId, program: OptionId) -> ClientResult<Vec<Level>> {
        self.get_list(&format!("/config/series/{}/filieres/{}/niveaux/", track, program))
            .await
    }

    pub async fn mentions(&self) -> ClientResult<Vec<Mention>> {
        self.get_list("/config/mentions/").await
    }

    pub async fn exam_centers(&self) -> ClientResult<Vec<Center>> {
        self.get_list("/config/centres-examen/").await
    }

    pub async fn deposit_centers(&self) -> ClientResult<Vec<Center>> {
        self.get_list("/config/centres-depot/").await
    }

    pub async fn regions(&self) -> ClientResult<Vec<Region>> {
        self.get_list("/config/regions/").await
    }

    /// Departments, optionally narrowed to one region.
    pub async fn departments(&self, region: Option<OptionId>) -> ClientResult<Vec<Department>> {
        let path = match region {
            Some(region) => format!("/config/departements/?region={region}"),
            None => "/config/departements/".to_string(),
        };
        self.get_list(&path).await
    }
}

#[async_trait]
impl CatalogSource for PortalClient {
    async fn exam_types(&self) -> Result<Vec<ExamType>, CatalogError> {
        PortalClient::exam_types(self)
            .await
            .map_err(|e| CatalogError(e.to_string()))
    }

    async fn tracks_of(&self, exam_type: OptionId) -> Result<Vec<Track>, CatalogError> {
        PortalClient::tracks_of(self, exam_type)
            .await
            .map_err(|e| CatalogError(e.to_string()))
    }

    async fn programs_of(&self, track: OptionId) -> Result<Vec<Program>, CatalogError> {
        PortalClient::programs_of(self, track)
            .await
            .map_err(|e| CatalogError(e.to_string()))
    }

    async fn levels_of(
        &self,
        track: OptionId,
        program: OptionId,
    ) -> Result<Vec<Level>, CatalogError> {
        PortalClient::levels_of(self, track, program)
            .await
            .map_err(|e| CatalogError(e.to_string()))
    }
}
