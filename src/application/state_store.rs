// Live state store - versioned, copy-on-write snapshots of every collection
use crate::application::field_repository::FieldDataRepository;
use crate::domain::allocation::Allocation;
use crate::domain::camera::{CameraSettings, MapView};
use crate::domain::geofence::Geofence;
use crate::domain::inventory::Coconut;
use crate::domain::route::Route;
use crate::domain::sale::Sale;
use crate::domain::salesperson::Salesperson;
use std::sync::Arc;
use tokio::sync::watch;

/// One immutable version of the dashboard state. Collections sit behind
/// `Arc` so replacing one collection leaves the others shared.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub version: u64,
    pub salespeople: Arc<Vec<Salesperson>>,
    pub sales: Arc<Vec<Sale>>,
    pub geofences: Arc<Vec<Geofence>>,
    pub routes: Arc<Vec<Route>>,
    pub inventory: Arc<Vec<Coconut>>,
    pub allocations: Arc<Vec<Allocation>>,
    pub map_view: MapView,
}

impl Snapshot {
    pub fn new(
        salespeople: Vec<Salesperson>,
        sales: Vec<Sale>,
        geofences: Vec<Geofence>,
        routes: Vec<Route>,
        inventory: Vec<Coconut>,
        map_view: MapView,
    ) -> Self {
        Self {
            version: 0,
            salespeople: Arc::new(salespeople),
            sales: Arc::new(sales),
            geofences: Arc::new(geofences),
            routes: Arc::new(routes),
            inventory: Arc::new(inventory),
            allocations: Arc::new(Vec::new()),
            map_view,
        }
    }

    pub fn with_salespeople(&self, salespeople: Vec<Salesperson>) -> Self {
        Self {
            salespeople: Arc::new(salespeople),
            ..self.clone()
        }
    }

    pub fn with_geofences(&self, geofences: Vec<Geofence>) -> Self {
        Self {
            geofences: Arc::new(geofences),
            ..self.clone()
        }
    }

    pub fn with_routes(&self, routes: Vec<Route>) -> Self {
        Self {
            routes: Arc::new(routes),
            ..self.clone()
        }
    }

    pub fn with_inventory(&self, inventory: Vec<Coconut>) -> Self {
        Self {
            inventory: Arc::new(inventory),
            ..self.clone()
        }
    }

    pub fn with_allocations(&self, allocations: Vec<Allocation>) -> Self {
        Self {
            allocations: Arc::new(allocations),
            ..self.clone()
        }
    }

    pub fn with_map_view(&self, map_view: MapView) -> Self {
        Self {
            map_view,
            ..self.clone()
        }
    }
}

#[derive(Clone)]
pub struct LiveStateStore {
    sender: Arc<watch::Sender<Arc<Snapshot>>>,
    closed: Arc<watch::Sender<bool>>,
}

impl LiveStateStore {
    pub fn new(initial: Snapshot) -> Self {
        let (sender, _) = watch::channel(Arc::new(initial));
        let (closed, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            closed: Arc::new(closed),
        }
    }

    /// Seed the store from a repository with the camera at its default view
    pub async fn load(
        repository: &dyn FieldDataRepository,
        camera: &CameraSettings,
    ) -> anyhow::Result<Self> {
        let snapshot = Snapshot::new(
            repository.load_salespeople().await?,
            repository.load_sales().await?,
            repository.load_geofences().await?,
            repository.load_routes().await?,
            repository.load_inventory().await?,
            MapView::new(camera),
        )
        .with_allocations(repository.load_allocations().await?);

        tracing::info!(
            salespeople = snapshot.salespeople.len(),
            sales = snapshot.sales.len(),
            geofences = snapshot.geofences.len(),
            routes = snapshot.routes.len(),
            inventory = snapshot.inventory.len(),
            allocations = snapshot.allocations.len(),
            "Loaded field data"
        );

        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.sender.subscribe()
    }

    /// Tells long-lived subscribers to finish. Updates still apply afterwards.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    pub fn closed_signal(&self) -> watch::Receiver<bool> {
        self.closed.subscribe()
    }

    /// Derive the next snapshot from the current one. Returning `None`
    /// publishes nothing; otherwise the new snapshot replaces the current
    /// one atomically with the version bumped. Yields the published version.
    pub fn update<F>(&self, f: F) -> Option<u64>
    where
        F: FnOnce(&Snapshot) -> Option<Snapshot>,
    {
        let mut published = None;
        self.sender.send_if_modified(|current| match f(&**current) {
            Some(mut next) => {
                next.version = current.version + 1;
                published = Some(next.version);
                *current = Arc::new(next);
                true
            }
            None => false,
        });
        published
    }
}

#[cfg(test)]
pub(crate) fn test_store(
    salespeople: Vec<Salesperson>,
    geofences: Vec<Geofence>,
    routes: Vec<Route>,
) -> LiveStateStore {
    LiveStateStore::new(Snapshot::new(
        salespeople,
        Vec::new(),
        geofences,
        routes,
        Vec::new(),
        MapView::new(&CameraSettings::default()),
    ))
}
