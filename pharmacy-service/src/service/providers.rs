use tracing::{info, warn};

use super::dto::{CreateProvider, ProviderDto, UpdateProvider};
use super::{PharmacyService, provider_key};
use crate::db::{NewProvider, Provider};
use crate::error::{ServiceError, ServiceResult};
use crate::search::{ProviderCriteria, ResultPage, advanced_search};

fn not_found(provider: impl ToString) -> ServiceError {
    ServiceError::ProviderNotFound {
        provider: provider.to_string(),
    }
}

fn to_dtos(providers: Vec<Provider>) -> Vec<ProviderDto> {
    providers.into_iter().map(ProviderDto::from).collect()
}

impl PharmacyService {
    pub async fn list_providers(&self) -> ServiceResult<Vec<ProviderDto>> {
        Ok(to_dtos(self.db.list_providers()?))
    }

    /// Get a provider by id, reading through the cache
    pub async fn get_provider(&self, id: i64) -> ServiceResult<ProviderDto> {
        let key = provider_key(id);
        if let Some(provider) = self.cached::<Provider>(&key).await {
            return Ok(provider.into());
        }

        let provider = self.db.get_provider(id)?.ok_or_else(|| not_found(id))?;
        self.cache_fresh(&key, &provider, || self.db.get_provider(id)).await?;
        Ok(provider.into())
    }

    pub async fn get_provider_by_number(&self, provider_number: &str) -> ServiceResult<ProviderDto> {
        self.db
            .get_provider_by_number(provider_number)?
            .map(ProviderDto::from)
            .ok_or_else(|| not_found(provider_number))
    }

    pub async fn get_provider_by_npi(&self, npi: &str) -> ServiceResult<ProviderDto> {
        self.db
            .get_provider_by_npi(npi)?
            .map(ProviderDto::from)
            .ok_or_else(|| not_found(format!("NPI {}", npi)))
    }

    pub async fn providers_by_specialty(&self, specialty: &str) -> ServiceResult<Vec<ProviderDto>> {
        Ok(to_dtos(
            self.db.list_providers_by_specialty(specialty.trim())?,
        ))
    }

    /// Free-text search across name, provider number, NPI, email and specialty
    pub async fn search_providers(&self, term: &str) -> ServiceResult<Vec<ProviderDto>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ServiceError::invalid_request("Search term is required."));
        }
        Ok(to_dtos(self.db.search_providers(term)?))
    }

    pub async fn advanced_search_providers(
        &self,
        criteria: &ProviderCriteria,
    ) -> ServiceResult<ResultPage<ProviderDto>> {
        let page = advanced_search::<Provider>(
            &self.db,
            criteria,
            self.search.default_page_size,
            Self::today(),
        )?;
        Ok(page.map(ProviderDto::from))
    }

    pub async fn create_provider(&self, request: CreateProvider) -> ServiceResult<ProviderDto> {
        if self.db.provider_number_exists(&request.provider_number)? {
            return Err(ServiceError::conflict(format!(
                "Provider number '{}' already exists.",
                request.provider_number
            )));
        }
        if self.db.npi_exists(&request.npi)? {
            return Err(ServiceError::conflict(format!(
                "NPI '{}' already exists.",
                request.npi
            )));
        }

        let new_provider = NewProvider::from(request);
        let id = self.db.insert_provider(&new_provider)?;
        info!(id, provider_number = %new_provider.provider_number, "Created provider");

        let provider = self
            .db
            .get_provider(id)?
            .ok_or_else(|| ServiceError::Internal {
                message: format!("Provider {} vanished after insert", id),
            })?;
        Ok(provider.into())
    }

    /// Replace a provider's details. The provider number is kept; the NPI may
    /// change but not to one another provider holds.
    pub async fn update_provider(
        &self,
        id: i64,
        request: UpdateProvider,
    ) -> ServiceResult<ProviderDto> {
        let mut provider = self.db.get_provider(id)?.ok_or_else(|| not_found(id))?;

        if request.npi != provider.npi && self.db.npi_exists(&request.npi)? {
            return Err(ServiceError::conflict(format!(
                "NPI '{}' already exists.",
                request.npi
            )));
        }
        request.apply(&mut provider);

        if !self.db.update_provider(&provider)? {
            return Err(not_found(id));
        }
        info!(id, "Updated provider");

        self.cache_store(&provider_key(id), &provider).await;
        Ok(provider.into())
    }

    pub async fn delete_provider(&self, id: i64) -> ServiceResult<()> {
        if !self.db.delete_provider(id)? {
            warn!(id, "Delete requested for unknown provider");
            return Err(not_found(id));
        }
        info!(id, "Deleted provider");

        self.cache_evict(&provider_key(id)).await;
        Ok(())
    }

    pub async fn provider_number_exists(&self, provider_number: &str) -> ServiceResult<bool> {
        self.db.provider_number_exists(provider_number)
    }

    pub async fn npi_exists(&self, npi: &str) -> ServiceResult<bool> {
        self.db.npi_exists(npi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::db::Database;
    use std::sync::Arc;

    fn service() -> PharmacyService {
        PharmacyService::new(
            Arc::new(Database::open_in_memory().unwrap()),
            None,
            SearchConfig::default(),
        )
    }

    fn create_request(number: &str, npi: &str, specialty: &str) -> CreateProvider {
        CreateProvider {
            provider_number: number.to_string(),
            name: "Dr. Sarah Johnson".to_string(),
            npi: npi.to_string(),
            address: "789 Health Blvd, Chicago, IL 60601".to_string(),
            phone: "555-0301".to_string(),
            email: "sjohnson@clinic.com".to_string(),
            specialty: specialty.to_string(),
        }
    }

    fn update_request(npi: &str) -> UpdateProvider {
        UpdateProvider {
            name: "Dr. Sarah Johnson".to_string(),
            npi: npi.to_string(),
            address: "1 New Street".to_string(),
            phone: "555-0399".to_string(),
            email: "sarah@clinic.com".to_string(),
            specialty: "Cardiology".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookups_without_cache() {
        let service = service();
        let created = service
            .create_provider(create_request("PROV003", "3456789012", "Cardiology"))
            .await
            .unwrap();

        assert_eq!(service.get_provider(created.id).await.unwrap(), created);
        assert_eq!(
            service.get_provider_by_npi("3456789012").await.unwrap().id,
            created.id
        );
        assert_eq!(
            service.get_provider_by_number("PROV003").await.unwrap().id,
            created.id
        );
        assert_eq!(
            service.providers_by_specialty("cardiology").await.unwrap().len(),
            1
        );
        assert!(service.npi_exists("3456789012").await.unwrap());
        assert!(!service.provider_number_exists("PROV999").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicates_conflict() {
        let service = service();
        service
            .create_provider(create_request("PROV001", "1234567890", "Cardiology"))
            .await
            .unwrap();

        let same_number = service
            .create_provider(create_request("PROV001", "9999999999", "Cardiology"))
            .await;
        assert!(matches!(same_number, Err(ServiceError::Conflict { .. })));

        let same_npi = service
            .create_provider(create_request("PROV002", "1234567890", "Cardiology"))
            .await;
        assert!(matches!(same_npi, Err(ServiceError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_npi_rules() {
        let service = service();
        service
            .create_provider(create_request("PROV001", "1234567890", "Cardiology"))
            .await
            .unwrap();
        let second = service
            .create_provider(create_request("PROV002", "2345678901", "Neurology"))
            .await
            .unwrap();

        // Keeping its own NPI is fine
        let updated = service
            .update_provider(second.id, update_request("2345678901"))
            .await
            .unwrap();
        assert_eq!(updated.specialty, "Cardiology");
        assert_eq!(updated.provider_number, "PROV002");

        let taken = service
            .update_provider(second.id, update_request("1234567890"))
            .await;
        assert!(matches!(taken, Err(ServiceError::Conflict { .. })));

        let missing = service.update_provider(999, update_request("5555555555")).await;
        assert!(matches!(missing, Err(ServiceError::ProviderNotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_provider() {
        let service = service();
        let created = service
            .create_provider(create_request("PROV001", "1234567890", "Cardiology"))
            .await
            .unwrap();

        service.delete_provider(created.id).await.unwrap();
        assert!(service.list_providers().await.unwrap().is_empty());
        assert!(matches!(
            service.delete_provider(created.id).await,
            Err(ServiceError::ProviderNotFound { .. })
        ));
    }
}
