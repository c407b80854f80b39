// Route service - listing and simulated optimization
use crate::application::state_store::LiveStateStore;
use crate::domain::notification::Notification;
use crate::domain::route::{RandomizeParams, Route};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct OptimizedRoute {
    pub route: Route,
    pub notification: Notification,
}

#[derive(Clone)]
pub struct RouteService {
    store: LiveStateStore,
    params: RandomizeParams,
}

impl RouteService {
    pub fn new(store: LiveStateStore, params: RandomizeParams) -> Self {
        Self { store, params }
    }

    pub fn list_routes(&self) -> Vec<Route> {
        self.store.snapshot().routes.as_ref().clone()
    }

    pub fn optimize_route(&self, route_id: &str) -> Option<OptimizedRoute> {
        self.optimize_route_with(route_id, &mut rand::thread_rng(), Utc::now())
    }

    /// `None` for an unknown route, which leaves the store untouched
    pub fn optimize_route_with<R: Rng + ?Sized>(
        &self,
        route_id: &str,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Option<OptimizedRoute> {
        let mut optimized = None;

        self.store.update(|snapshot| {
            let idx = snapshot.routes.iter().position(|r| r.id == route_id)?;
            let mut routes = snapshot.routes.as_ref().clone();
            routes[idx] = routes[idx].randomized(rng, now, &self.params);
            optimized = Some(routes[idx].clone());
            Some(snapshot.with_routes(routes))
        });

        let Some(route) = optimized else {
            tracing::debug!("Ignoring optimization of unknown route {}", route_id);
            return None;
        };

        tracing::info!(
            route = %route.id,
            pending = route.waypoints.len() - route.visited_count(),
            total_duration = route.total_duration,
            "Route optimized"
        );

        Some(OptimizedRoute {
            notification: Notification::success(
                "Route optimized",
                format!("Estimated time reduced to {} minutes", route.total_duration),
            ),
            route,
        })
    }
}
