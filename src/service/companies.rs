//! Company catalog access: status listings and the registry-number alias.

use std::sync::Arc;

use crate::cache::{AliasKey, CacheAside, EntityKind, Grouping};
use crate::domain::companies::{
    CompanyRecord, CompanyStatus, validate_company_identity, validate_company_name,
    validate_status_transition,
};
use crate::domain::types::Page;
use crate::store::{CompanyStore, CreateCompanyParams, UpdateCompanyParams};

use super::error::AccessError;

#[derive(Clone)]
pub struct CompanyService {
    store: Arc<dyn CompanyStore>,
    cache: Arc<CacheAside>,
}

impl CompanyService {
    pub fn new(store: Arc<dyn CompanyStore>, cache: Arc<CacheAside>) -> Self {
        Self { store, cache }
    }

    pub async fn get_company(&self, id: &str) -> Result<Option<CompanyRecord>, AccessError> {
        let store = Arc::clone(&self.store);
        let lookup = id.to_owned();
        let record = self
            .cache
            .read_through(id, move || async move { store.find_by_id(&lookup).await })
            .await?;
        Ok(record)
    }

    /// Lookup by public registry number. The alias entry caches only the
    /// primary id; the record itself is shared with [`get_company`].
    ///
    /// [`get_company`]: Self::get_company
    pub async fn get_by_registry(
        &self,
        registry_id: &str,
    ) -> Result<Option<CompanyRecord>, AccessError> {
        let alias = AliasKey::company_registry(registry_id);
        let resolve_store = Arc::clone(&self.store);
        let by_id_store = Arc::clone(&self.store);
        let owned = registry_id.to_owned();
        let record = self
            .cache
            .read_through_alias(
                &alias,
                move || async move { resolve_store.find_by_registry(&owned).await },
                move |id| {
                    let store = Arc::clone(&by_id_store);
                    async move { store.find_by_id(&id).await }
                },
            )
            .await?;
        Ok(record)
    }

    /// Companies in one status, name order.
    pub async fn list_by_status(
        &self,
        status: CompanyStatus,
        page: Page,
    ) -> Result<Vec<CompanyRecord>, AccessError> {
        let list_store = Arc::clone(&self.store);
        let item_store = Arc::clone(&self.store);
        let records = self
            .cache
            .read_list_through(
                Grouping::companies_of_status(status.as_str()),
                page,
                move || async move { list_store.list_by_status(status, page).await },
                move |id| {
                    let store = Arc::clone(&item_store);
                    async move { store.find_by_id(&id).await }
                },
            )
            .await?;
        Ok(records)
    }

    /// Register a company; new entries start `pending`. A registry id
    /// already in use surfaces as `StoreError::Duplicate`.
    pub async fn create_company(
        &self,
        params: CreateCompanyParams,
    ) -> Result<CompanyRecord, AccessError> {
        validate_company_identity(&params.registry_id, &params.name)?;

        let record = self.store.create_company(params).await?;
        self.cache.invalidate(&record).await;
        Ok(record)
    }

    /// Profile patch. The registry id is immutable, so the alias mapping
    /// stays valid across updates.
    pub async fn update_company(
        &self,
        id: &str,
        params: UpdateCompanyParams,
    ) -> Result<Option<CompanyRecord>, AccessError> {
        if let Some(name) = params.name.as_deref() {
            validate_company_name(name)?;
        }

        let Some(updated) = self.store.update_company(id, params).await? else {
            return Ok(None);
        };
        self.cache.invalidate(&updated).await;
        Ok(Some(updated))
    }

    /// Status transition; dissolution is terminal. Both the old and the
    /// new status listings are invalidated.
    pub async fn set_status(
        &self,
        id: &str,
        status: CompanyStatus,
    ) -> Result<Option<CompanyRecord>, AccessError> {
        let Some(existing) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };
        validate_status_transition(existing.status, status)?;

        let Some((previous, updated)) = self.store.update_company_status(id, status).await? else {
            return Ok(None);
        };

        self.cache.invalidate(&updated).await;
        self.cache
            .invalidate_collections(
                EntityKind::Company,
                Grouping::companies_of_status(previous.as_str()),
            )
            .await;
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::{CacheConfig, MemoryCache};
    use crate::store::{MemoryStore, StoreError};

    use super::*;

    fn service() -> (CompanyService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let config = CacheConfig::default();
        let cache = Arc::new(CacheAside::new(
            Arc::new(MemoryCache::new(&config)),
            config,
        ));
        (CompanyService::new(store.clone(), cache), store)
    }

    fn params(registry: &str, name: &str) -> CreateCompanyParams {
        CreateCompanyParams {
            registry_id: registry.to_string(),
            name: name.to_string(),
            city: None,
        }
    }

    #[tokio::test]
    async fn registry_ids_must_be_unique() {
        let (service, _) = service();
        service.create_company(params("REG-1", "Acme")).await.unwrap();

        let err = service
            .create_company(params("REG-1", "Acme Again"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AccessError::Store(StoreError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn colons_are_rejected_in_registry_ids() {
        let (service, _) = service();
        let err = service
            .create_company(params("REG:1", "Acme"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Domain(_)));
    }

    #[tokio::test]
    async fn registry_lookup_round_trips_through_the_alias() {
        let (service, _) = service();
        let created = service.create_company(params("REG-1", "Acme")).await.unwrap();

        // First read resolves through the store, second through the alias.
        let first = service.get_by_registry("REG-1").await.unwrap().unwrap();
        assert_eq!(first.id, created.id);
        let second = service.get_by_registry("REG-1").await.unwrap().unwrap();
        assert_eq!(second.id, created.id);

        assert_eq!(service.get_by_registry("REG-404").await.unwrap(), None);
    }

    #[tokio::test]
    async fn dissolution_is_terminal() {
        let (service, _) = service();
        let company = service.create_company(params("REG-1", "Acme")).await.unwrap();

        service
            .set_status(&company.id, CompanyStatus::Dissolved)
            .await
            .unwrap()
            .unwrap();

        let err = service
            .set_status(&company.id, CompanyStatus::Active)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Domain(_)));
    }

    #[tokio::test]
    async fn status_change_moves_the_company_between_listings() {
        let (service, _) = service();
        let company = service.create_company(params("REG-1", "Acme")).await.unwrap();

        // Warm both listings.
        let pending = service
            .list_by_status(CompanyStatus::Pending, Page::default())
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert!(service
            .list_by_status(CompanyStatus::Active, Page::default())
            .await
            .unwrap()
            .is_empty());

        service
            .set_status(&company.id, CompanyStatus::Active)
            .await
            .unwrap()
            .unwrap();

        assert!(service
            .list_by_status(CompanyStatus::Pending, Page::default())
            .await
            .unwrap()
            .is_empty());
        let active = service
            .list_by_status(CompanyStatus::Active, Page::default())
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].status, CompanyStatus::Active);
    }

    #[tokio::test]
    async fn profile_patch_leaves_unset_fields_alone() {
        let (service, _) = service();
        let company = service
            .create_company(CreateCompanyParams {
                registry_id: "REG-1".to_string(),
                name: "Acme".to_string(),
                city: Some("Torino".to_string()),
            })
            .await
            .unwrap();

        let updated = service
            .update_company(
                &company.id,
                UpdateCompanyParams {
                    name: Some("Acme Travel".to_string()),
                    city: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Acme Travel");
        assert_eq!(updated.city.as_deref(), Some("Torino"));
    }
}
