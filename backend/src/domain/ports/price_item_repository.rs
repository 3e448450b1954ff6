//! Port for price-row persistence.

use async_trait::async_trait;

use crate::domain::ids::InstallerGroupId;
use crate::domain::pricing::PriceItem;

use super::define_port_error;

define_port_error! {
    /// Errors raised by price item repository adapters.
    pub enum PriceItemRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "price repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "price repository query failed: {message}",
    }
}

/// Port for price-row storage.
///
/// Each save is an independent upsert on the natural key
/// (installer group, category, name); no transaction spans rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceItemRepository: Send + Sync {
    /// Insert or replace one row.
    async fn upsert(&self, item: &PriceItem) -> Result<(), PriceItemRepositoryError>;

    /// All rows configured for an installer group.
    async fn list(
        &self,
        installer_group_id: &InstallerGroupId,
    ) -> Result<Vec<PriceItem>, PriceItemRepositoryError>;
}

/// Fixture implementation for testing without a real database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePriceItemRepository;

#[async_trait]
impl PriceItemRepository for FixturePriceItemRepository {
    async fn upsert(&self, _item: &PriceItem) -> Result<(), PriceItemRepositoryError> {
        Ok(())
    }

    async fn list(
        &self,
        _installer_group_id: &InstallerGroupId,
    ) -> Result<Vec<PriceItem>, PriceItemRepositoryError> {
        Ok(Vec::new())
    }
}
