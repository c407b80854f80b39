// Tracking service - positions, geofences and the map camera
use crate::application::state_store::{LiveStateStore, Snapshot};
use crate::domain::camera::{CameraSettings, MapView};
use crate::domain::error::DomainError;
use crate::domain::geo::LatLng;
use crate::domain::geofence::{Geofence, GeofenceOccupancy, fences_containing};
use crate::domain::notification::Notification;
use crate::domain::salesperson::{Salesperson, SalespersonStatus};
use futures::Stream;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Salesperson with the geofences they are currently inside
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedSalesperson {
    #[serde(flatten)]
    pub salesperson: Salesperson,
    pub inside_geofences: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionUpdate {
    pub id: String,
    pub position: LatLng,
    pub status: SalespersonStatus,
}

/// What the live map needs from one published snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFrame {
    pub version: u64,
    pub salespeople: Vec<PositionUpdate>,
    pub map_view: MapView,
}

impl LiveFrame {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            version: snapshot.version,
            salespeople: snapshot
                .salespeople
                .iter()
                .map(|sp| PositionUpdate {
                    id: sp.id.clone(),
                    position: sp.position,
                    status: sp.status,
                })
                .collect(),
            map_view: snapshot.map_view.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGeofence {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub center: LatLng,
    pub radius: f64,
    pub color: String,
    #[serde(default)]
    pub assigned: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeofenceAdded {
    pub geofence: Geofence,
    pub notification: Notification,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeofenceRemoved {
    pub removed: bool,
    pub notification: Notification,
}

#[derive(Clone)]
pub struct TrackingService {
    store: LiveStateStore,
    camera: CameraSettings,
    jitter_degrees: f64,
}

impl TrackingService {
    pub fn new(store: LiveStateStore, camera: CameraSettings, jitter_degrees: f64) -> Self {
        Self {
            store,
            camera,
            jitter_degrees,
        }
    }

    pub fn list_salespeople(&self) -> Vec<TrackedSalesperson> {
        let snapshot = self.store.snapshot();
        snapshot
            .salespeople
            .iter()
            .map(|sp| TrackedSalesperson {
                inside_geofences: fences_containing(&snapshot.geofences, sp.position),
                salesperson: sp.clone(),
            })
            .collect()
    }

    /// One simulation step: every active salesperson drifts by at most
    /// `jitter_degrees` per axis. Returns how many moved. A zero, negative or
    /// non-finite bound publishes nothing.
    pub fn jitter_positions<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        if !(self.jitter_degrees.is_finite() && self.jitter_degrees > 0.0) {
            return 0;
        }

        let mut moved = 0;
        self.store.update(|snapshot| {
            let people = snapshot
                .salespeople
                .iter()
                .map(|sp| {
                    if sp.is_active() {
                        moved += 1;
                    }
                    sp.jittered(rng, self.jitter_degrees)
                })
                .collect();
            Some(snapshot.with_salespeople(people))
        });
        moved
    }

    pub fn map_view(&self) -> MapView {
        self.store.snapshot().map_view.clone()
    }

    /// Unknown ids leave the camera where it is
    pub fn focus_on_salesperson(&self, id: &str) -> MapView {
        self.store.update(|snapshot| {
            let next = snapshot
                .map_view
                .focus_on_salesperson(&snapshot.salespeople, id, &self.camera);
            if next.is_none() {
                tracing::debug!("Ignoring focus on unknown salesperson {}", id);
            }
            next.map(|view| snapshot.with_map_view(view))
        });
        self.map_view()
    }

    pub fn focus_on_geofence(&self, id: &str) -> MapView {
        self.store.update(|snapshot| {
            let next = snapshot
                .map_view
                .focus_on_geofence(&snapshot.geofences, id, &self.camera);
            if next.is_none() {
                tracing::debug!("Ignoring focus on unknown geofence {}", id);
            }
            next.map(|view| snapshot.with_map_view(view))
        });
        self.map_view()
    }

    pub fn reset_view(&self) -> MapView {
        let view = MapView::new(&self.camera);
        self.store
            .update(|snapshot| Some(snapshot.with_map_view(view.clone())));
        view
    }

    pub fn list_geofences(&self) -> Vec<Geofence> {
        self.store.snapshot().geofences.as_ref().clone()
    }

    pub fn add_geofence(&self, request: NewGeofence) -> GeofenceAdded {
        let geofence = Geofence {
            id: request
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| format!("geo-{}", uuid::Uuid::new_v4())),
            name: request.name,
            center: request.center,
            radius: request.radius,
            color: request.color,
            assigned: request.assigned,
        };

        self.store.update(|snapshot| {
            let mut fences = snapshot.geofences.as_ref().clone();
            fences.push(geofence.clone());
            Some(snapshot.with_geofences(fences))
        });

        tracing::info!("Added geofence {} ({})", geofence.id, geofence.name);

        GeofenceAdded {
            notification: Notification::success(
                "Geofence created",
                format!("{} covers a {} m radius", geofence.name, geofence.radius),
            ),
            geofence,
        }
    }

    /// Missing ids are a no-op. Removing the focused geofence clears the focus.
    pub fn remove_geofence(&self, id: &str) -> GeofenceRemoved {
        let removed = self
            .store
            .update(|snapshot| {
                if !snapshot.geofences.iter().any(|f| f.id == id) {
                    return None;
                }
                let fences = snapshot
                    .geofences
                    .iter()
                    .filter(|f| f.id != id)
                    .cloned()
                    .collect();
                Some(
                    snapshot
                        .with_geofences(fences)
                        .with_map_view(snapshot.map_view.without_geofence(id)),
                )
            })
            .is_some();

        let notification = if removed {
            tracing::info!("Removed geofence {}", id);
            Notification::success("Geofence removed", format!("Geofence {} was removed", id))
        } else {
            Notification::warning("Nothing removed", format!("Geofence {} does not exist", id))
        };

        GeofenceRemoved {
            removed,
            notification,
        }
    }

    /// Current frame first, then one frame per published version.
    /// Versions published faster than the consumer reads are coalesced.
    /// The stream ends once the store is closed.
    pub fn live_frames(&self) -> impl Stream<Item = LiveFrame> + Send + 'static {
        let mut rx = self.store.subscribe();
        let mut closed = self.store.closed_signal();
        async_stream::stream! {
            loop {
                if *closed.borrow_and_update() {
                    break;
                }
                let frame = LiveFrame::from_snapshot(&rx.borrow_and_update());
                yield frame;

                tokio::select! {
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    signal = closed.changed() => {
                        if signal.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }

    pub fn geofence_occupancy(&self, id: &str) -> Result<GeofenceOccupancy, DomainError> {
        let snapshot = self.store.snapshot();
        let fence = snapshot
            .geofences
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| DomainError::UnknownGeofence(id.to_string()))?;

        Ok(GeofenceOccupancy::compute(fence, &snapshot.salespeople))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::state_store::test_store;
    use crate::domain::salesperson::{SalespersonStatus, test_salesperson};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const JITTER: f64 = 0.0005;

    fn downtown() -> LatLng {
        LatLng::new(40.712776, -74.005974)
    }

    fn geofence(id: &str, center: LatLng) -> Geofence {
        Geofence {
            id: id.to_string(),
            name: "Downtown Core".to_string(),
            center,
            radius: 1000.0,
            color: "#8B5CF6".to_string(),
            assigned: vec!["sp1".to_string()],
        }
    }

    fn service() -> (TrackingService, LiveStateStore) {
        let store = test_store(
            vec![
                test_salesperson("sp1", SalespersonStatus::Active, downtown()),
                test_salesperson("sp3", SalespersonStatus::Idle, downtown()),
                test_salesperson(
                    "sp4",
                    SalespersonStatus::Offline,
                    LatLng::new(40.725037, -73.987563),
                ),
            ],
            vec![geofence("geo1", downtown())],
            Vec::new(),
        );
        (
            TrackingService::new(store.clone(), CameraSettings::default(), JITTER),
            store,
        )
    }

    #[test]
    fn test_jitter_moves_only_active() {
        let (service, store) = service();
        let before = store.snapshot();
        let mut rng = StdRng::seed_from_u64(11);

        let moved = service.jitter_positions(&mut rng);
        let after = store.snapshot();

        assert_eq!(moved, 1);
        assert_eq!(after.version, before.version + 1);
        let (old, new) = (&before.salespeople[0].position, &after.salespeople[0].position);
        assert!((old.lat - new.lat).abs() <= JITTER + 1e-12);
        assert!((old.lng - new.lng).abs() <= JITTER + 1e-12);
        assert_eq!(before.salespeople[1], after.salespeople[1]);
        assert_eq!(before.salespeople[2], after.salespeople[2]);
    }

    #[test]
    fn test_invalid_jitter_bound_is_a_no_op() {
        let (_, store) = service();
        let before = store.snapshot();
        let mut rng = StdRng::seed_from_u64(11);

        for bound in [-JITTER, f64::NAN] {
            let service = TrackingService::new(store.clone(), CameraSettings::default(), bound);
            assert_eq!(service.jitter_positions(&mut rng), 0);
        }

        assert_eq!(store.snapshot().version, before.version);
    }

    #[test]
    fn test_focus_on_unknown_salesperson_keeps_camera() {
        let (service, store) = service();
        let before = service.map_view();

        let view = service.focus_on_salesperson("ghost");

        assert_eq!(view, before);
        assert_eq!(store.snapshot().version, 0);
    }

    #[test]
    fn test_focus_then_reset() {
        let (service, _) = service();

        let view = service.focus_on_salesperson("sp1");
        assert_eq!(view.center, downtown());
        assert_eq!(view.zoom, 16);

        let view = service.focus_on_geofence("geo1");
        assert_eq!(view.zoom, 15);
        assert_eq!(view.active_salesperson.as_deref(), Some("sp1"));
        assert_eq!(view.active_geofence.as_deref(), Some("geo1"));

        let view = service.reset_view();
        assert_eq!(view, MapView::new(&CameraSettings::default()));
        assert_eq!(service.map_view(), view);
    }

    #[test]
    fn test_list_salespeople_reports_geofences() {
        let (service, _) = service();
        let tracked = service.list_salespeople();

        assert_eq!(tracked[0].inside_geofences, vec!["geo1".to_string()]);
        assert!(tracked[2].inside_geofences.is_empty());
    }

    #[test]
    fn test_add_geofence_generates_id() {
        let (service, _) = service();
        let added = service.add_geofence(NewGeofence {
            id: None,
            name: "Chelsea District".to_string(),
            center: LatLng::new(40.742054, -73.992449),
            radius: 900.0,
            color: "#10B981".to_string(),
            assigned: vec!["sp5".to_string()],
        });

        assert!(added.geofence.id.starts_with("geo-"));
        assert_eq!(service.list_geofences().len(), 2);
    }

    #[test]
    fn test_remove_focused_geofence_clears_focus() {
        let (service, _) = service();
        service.focus_on_geofence("geo1");

        let result = service.remove_geofence("geo1");

        assert!(result.removed);
        assert!(service.list_geofences().is_empty());
        assert_eq!(service.map_view().active_geofence, None);
    }

    #[test]
    fn test_remove_missing_geofence_is_noop() {
        let (service, store) = service();
        let result = service.remove_geofence("geo9");

        assert!(!result.removed);
        assert_eq!(store.snapshot().version, 0);
        assert_eq!(service.list_geofences().len(), 1);
    }

    #[test]
    fn test_live_frame_tracks_latest_snapshot() {
        let (service, store) = service();
        service.focus_on_salesperson("sp1");

        let frame = LiveFrame::from_snapshot(&store.snapshot());

        assert_eq!(frame.version, 1);
        assert_eq!(frame.salespeople.len(), 3);
        assert_eq!(frame.salespeople[1].status, SalespersonStatus::Idle);
        assert_eq!(frame.map_view.active_salesperson.as_deref(), Some("sp1"));
    }

    #[tokio::test]
    async fn test_live_frames_follow_updates() {
        use futures::StreamExt;

        let (service, _store) = service();
        let frames = service.live_frames();
        futures::pin_mut!(frames);

        let first = frames.next().await.unwrap();
        assert_eq!(first.version, 0);
        assert!(first.map_view.active_salesperson.is_none());

        service.focus_on_salesperson("sp3");
        let second = frames.next().await.unwrap();
        assert_eq!(second.version, 1);
        assert_eq!(second.map_view.active_salesperson.as_deref(), Some("sp3"));
    }

    #[tokio::test]
    async fn test_live_frames_end_when_store_closes() {
        use futures::StreamExt;

        let (service, store) = service();
        let frames = service.live_frames();
        futures::pin_mut!(frames);

        assert!(frames.next().await.is_some());

        store.close();
        let next = tokio::time::timeout(std::time::Duration::from_secs(1), frames.next())
            .await
            .expect("stream still parked after close");
        assert!(next.is_none());
    }

    #[tokio::test]
    async fn test_live_frames_after_close_are_empty() {
        use futures::StreamExt;

        let (service, store) = service();
        store.close();

        let frames = service.live_frames();
        futures::pin_mut!(frames);
        assert!(frames.next().await.is_none());
    }

    #[test]
    fn test_geofence_occupancy() {
        let (service, _) = service();

        let occupancy = service.geofence_occupancy("geo1").unwrap();
        assert_eq!(occupancy.inside, vec!["sp1".to_string(), "sp3".to_string()]);

        assert_eq!(
            service.geofence_occupancy("nope").unwrap_err(),
            DomainError::UnknownGeofence("nope".to_string())
        );
    }
}
