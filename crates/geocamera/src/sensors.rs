//! Latest-value store for the location, heading, motion and orientation feeds.
//!
//! Feeds run at independent, uncontrolled rates and push updates either
//! directly through the `update_*` methods or as [`SensorEvent`]s over a
//! channel created by [`feed`]. The store only ever keeps the most recent
//! value per field; readers take a [`SensorSnapshot`] and never wait on a
//! feed.

use std::sync::{PoisonError, RwLock};

use crate::types::{AttitudeSample, DeviceOrientation, HeadingSample, LocationFix};

/// A single update pushed by one of the sensor feeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorEvent {
    Location(LocationFix),
    Heading(HeadingSample),
    Attitude(AttitudeSample),
    Orientation(DeviceOrientation),
}

/// Sending half of a sensor feed. Cheap to clone; one per feed task.
pub type FeedSender = async_channel::Sender<SensorEvent>;

/// Receiving half of a sensor feed, consumed by [`SensorStore::pump`] or
/// [`SensorStore::drain`].
pub type FeedReceiver = async_channel::Receiver<SensorEvent>;

/// Create an unbounded feed channel.
#[must_use]
pub fn feed() -> (FeedSender, FeedReceiver) {
    async_channel::unbounded()
}

/// Point-in-time copy of every sensor field.
///
/// Fields are `None` until their feed delivers a first value. The snapshot
/// may combine values of different ages; consumers tolerate that.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSnapshot {
    pub location: Option<LocationFix>,
    pub heading: Option<HeadingSample>,
    pub attitude: Option<AttitudeSample>,
    pub orientation: DeviceOrientation,
}

/// Holds the latest value from each feed.
///
/// Each field has its own lock so a 60 Hz attitude feed never contends with
/// location or heading writers.
#[derive(Debug, Default)]
pub struct SensorStore {
    location: RwLock<Option<LocationFix>>,
    heading: RwLock<Option<HeadingSample>>,
    attitude: RwLock<Option<AttitudeSample>>,
    orientation: RwLock<DeviceOrientation>,
}

impl SensorStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_location(&self, fix: LocationFix) {
        *self
            .location
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(fix);
    }

    pub fn update_heading(&self, sample: HeadingSample) {
        *self
            .heading
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(sample);
    }

    pub fn update_attitude(&self, sample: AttitudeSample) {
        *self
            .attitude
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(sample);
    }

    pub fn update_orientation(&self, orientation: DeviceOrientation) {
        *self
            .orientation
            .write()
            .unwrap_or_else(PoisonError::into_inner) = orientation;
    }

    /// Apply a single feed event.
    pub fn apply(&self, event: SensorEvent) {
        match event {
            SensorEvent::Location(fix) => self.update_location(fix),
            SensorEvent::Heading(sample) => self.update_heading(sample),
            SensorEvent::Attitude(sample) => self.update_attitude(sample),
            SensorEvent::Orientation(orientation) => self.update_orientation(orientation),
        }
    }

    /// Apply every event currently queued on `rx` without waiting.
    ///
    /// Returns the number of events applied.
    pub fn drain(&self, rx: &FeedReceiver) -> usize {
        let mut applied = 0;
        while let Ok(event) = rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Apply events as they arrive until every sender has been dropped.
    pub async fn pump(&self, rx: FeedReceiver) {
        while let Ok(event) = rx.recv().await {
            self.apply(event);
        }
        tracing::debug!("sensor feed closed");
    }

    /// Copy the latest value of every field.
    #[must_use]
    pub fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            location: *self.location.read().unwrap_or_else(PoisonError::into_inner),
            heading: *self.heading.read().unwrap_or_else(PoisonError::into_inner),
            attitude: *self.attitude.read().unwrap_or_else(PoisonError::into_inner),
            orientation: *self
                .orientation
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_snapshot() {
        let store = SensorStore::new();
        let snapshot = store.snapshot();
        assert!(snapshot.location.is_none());
        assert!(snapshot.heading.is_none());
        assert!(snapshot.attitude.is_none());
        assert_eq!(snapshot.orientation, DeviceOrientation::Unknown);
    }

    #[test]
    fn test_updates_replace_wholesale() {
        let store = SensorStore::new();

        store.update_location(LocationFix::new(47.1, 8.5, 500.0));
        store.update_location(LocationFix::new(47.2, 8.6, 650.0));
        store.update_heading(HeadingSample::new(90.0));
        store.update_heading(HeadingSample::new(180.0));

        let snapshot = store.snapshot();
        let fix = snapshot.location.unwrap();
        assert_eq!(fix.latitude, 47.2);
        assert_eq!(fix.longitude, 8.6);
        assert_eq!(fix.altitude, 650.0);
        assert_eq!(snapshot.heading, Some(HeadingSample::new(180.0)));
        // Untouched fields stay absent.
        assert!(snapshot.attitude.is_none());
    }

    #[test]
    fn test_drain_applies_queued_events_in_order() {
        let store = SensorStore::new();
        let (tx, rx) = feed();

        tx.try_send(SensorEvent::Attitude(AttitudeSample::new(0.1, 0.0)))
            .unwrap();
        tx.try_send(SensorEvent::Attitude(AttitudeSample::new(0.2, 0.3)))
            .unwrap();
        tx.try_send(SensorEvent::Orientation(DeviceOrientation::LandscapeLeft))
            .unwrap();

        assert_eq!(store.drain(&rx), 3);
        assert_eq!(store.drain(&rx), 0);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.attitude, Some(AttitudeSample::new(0.2, 0.3)));
        assert_eq!(snapshot.orientation, DeviceOrientation::LandscapeLeft);
    }

    #[tokio::test]
    async fn test_pump_runs_until_feeds_close() {
        let store = std::sync::Arc::new(SensorStore::new());
        let (tx, rx) = feed();

        let pump = tokio::spawn({
            let store = std::sync::Arc::clone(&store);
            async move { store.pump(rx).await }
        });

        let heading_tx = tx.clone();
        tx.send(SensorEvent::Location(LocationFix::new(1.0, 2.0, 3.0)))
            .await
            .unwrap();
        heading_tx
            .send(SensorEvent::Heading(HeadingSample::new(42.0)))
            .await
            .unwrap();
        drop(tx);
        drop(heading_tx);

        pump.await.unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.location.unwrap().altitude, 3.0);
        assert_eq!(snapshot.heading, Some(HeadingSample::new(42.0)));
    }
}
