// Position simulation - a cancellable ticker that drifts active salespeople
use crate::application::tracking_service::TrackingService;
use rand::rngs::StdRng;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Owns the running simulation. Dropping the handle stops the ticker.
#[derive(Debug)]
pub struct SimulationHandle {
    task: JoinHandle<()>,
}

impl SimulationHandle {
    pub fn cancel(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn spawn_position_simulation(
    service: TrackingService,
    period: Duration,
    mut rng: StdRng,
) -> SimulationHandle {
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; positions start moving one period in
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let moved = service.jitter_positions(&mut rng);
            tracing::debug!("Simulation tick moved {} salespeople", moved);
        }
    });

    tracing::info!("Position simulation started (every {:?})", period);
    SimulationHandle { task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::state_store::test_store;
    use crate::domain::camera::CameraSettings;
    use crate::domain::geo::LatLng;
    use crate::domain::salesperson::{SalespersonStatus, test_salesperson};
    use rand::SeedableRng;

    fn tracking() -> (TrackingService, crate::application::state_store::LiveStateStore) {
        let store = test_store(
            vec![test_salesperson(
                "sp1",
                SalespersonStatus::Active,
                LatLng::new(40.712776, -74.005974),
            )],
            Vec::new(),
            Vec::new(),
        );
        (TrackingService::new(store.clone(), CameraSettings::default(), 0.0005), store)
    }

    #[tokio::test]
    async fn test_ticks_publish_new_snapshots() {
        let (service, store) = tracking();
        let mut rx = store.subscribe();

        let rng = StdRng::seed_from_u64(1);
        let handle = spawn_position_simulation(service, Duration::from_millis(10), rng);

        tokio::time::timeout(Duration::from_secs(2), rx.changed())
            .await
            .expect("no tick within timeout")
            .unwrap();
        assert!(store.snapshot().version >= 1);
        assert!(!handle.is_finished());
    }

    #[tokio::test]
    async fn test_cancel_stops_ticks() {
        let (service, store) = tracking();
        let rng = StdRng::seed_from_u64(2);
        let handle = spawn_position_simulation(service, Duration::from_millis(10), rng);

        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
        tokio::time::sleep(Duration::from_millis(30)).await;

        let settled = store.snapshot().version;
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(store.snapshot().version, settled);
    }
}
