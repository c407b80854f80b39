// Repository trait for the field data the store is seeded from
use crate::domain::allocation::Allocation;
use crate::domain::geofence::Geofence;
use crate::domain::inventory::Coconut;
use crate::domain::route::Route;
use crate::domain::sale::Sale;
use crate::domain::salesperson::Salesperson;
use async_trait::async_trait;

#[async_trait]
pub trait FieldDataRepository: Send + Sync {
    async fn load_salespeople(&self) -> anyhow::Result<Vec<Salesperson>>;

    async fn load_sales(&self) -> anyhow::Result<Vec<Sale>>;

    async fn load_geofences(&self) -> anyhow::Result<Vec<Geofence>>;

    async fn load_routes(&self) -> anyhow::Result<Vec<Route>>;

    /// Coconuts already scanned into inventory
    async fn load_inventory(&self) -> anyhow::Result<Vec<Coconut>>;

    async fn load_allocations(&self) -> anyhow::Result<Vec<Allocation>>;
}
