use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::uploads::application::{
    domain::entities::{ConnectionParams, SettingsRecord},
    ports::outgoing::{
        ImageSource, ImageSourceError, ObjectStoreConnector, ObjectStoreError, RemoteObjectStore,
        SettingsStore, SettingsStoreError, StoredObject,
    },
};

// ----------------------------
// Remote object store
// ----------------------------

/// Accepts every write and remembers it.
#[derive(Default)]
pub struct RecordingObjectStore {
    puts: Mutex<Vec<(String, Vec<u8>)>>,
    made_dirs: Mutex<Vec<String>>,
    make_dir_error: Mutex<Option<ObjectStoreError>>,
}

impl RecordingObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_make_dir(&self, err: ObjectStoreError) {
        *self.make_dir_error.lock().unwrap() = Some(err);
    }

    pub fn puts(&self) -> Vec<(String, Vec<u8>)> {
        self.puts.lock().unwrap().clone()
    }

    pub fn made_dirs(&self) -> Vec<String> {
        self.made_dirs.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteObjectStore for RecordingObjectStore {
    async fn put_file(
        &self,
        remote_path: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredObject, ObjectStoreError> {
        self.puts
            .lock()
            .unwrap()
            .push((remote_path.to_string(), bytes));
        Ok(StoredObject {
            location: remote_path.to_string(),
        })
    }

    async fn make_dir(&self, remote_path: &str) -> Result<(), ObjectStoreError> {
        self.made_dirs.lock().unwrap().push(remote_path.to_string());
        match self.make_dir_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Hands out one shared store and counts how often it was asked to.
pub struct CountingConnector {
    outcome: Result<Arc<dyn RemoteObjectStore>, ObjectStoreError>,
    delay: Option<Duration>,
    connects: Mutex<Vec<ConnectionParams>>,
}

impl CountingConnector {
    pub fn new(store: Arc<dyn RemoteObjectStore>) -> Self {
        Self {
            outcome: Ok(store),
            delay: None,
            connects: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: ObjectStoreError) -> Self {
        Self {
            outcome: Err(err),
            delay: None,
            connects: Mutex::new(Vec::new()),
        }
    }

    /// Make every connect take `delay`, widening the window for races.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn connect_count(&self) -> usize {
        self.connects.lock().unwrap().len()
    }

    pub fn last_params(&self) -> Option<ConnectionParams> {
        self.connects.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ObjectStoreConnector for CountingConnector {
    async fn connect(
        &self,
        params: &ConnectionParams,
    ) -> Result<Arc<dyn RemoteObjectStore>, ObjectStoreError> {
        self.connects.lock().unwrap().push(params.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}

// ----------------------------
// Image source
// ----------------------------

/// Serves the same canned response for every URL.
#[derive(Clone)]
pub struct StaticImageSource {
    response: Result<Vec<u8>, ImageSourceError>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl StaticImageSource {
    pub fn ok(bytes: Vec<u8>) -> Self {
        Self {
            response: Ok(bytes),
            fetched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn err(err: ImageSourceError) -> Self {
        Self {
            response: Err(err),
            fetched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSource for StaticImageSource {
    async fn fetch(&self, url: &str, max_bytes: u64) -> Result<Vec<u8>, ImageSourceError> {
        self.fetched.lock().unwrap().push(url.to_string());
        match &self.response {
            Ok(bytes) if bytes.len() as u64 > max_bytes => {
                Err(ImageSourceError::TooLarge { limit: max_bytes })
            }
            other => other.clone(),
        }
    }
}

// ----------------------------
// Settings store
// ----------------------------

#[derive(Default)]
struct SettingsStoreState {
    objects: HashMap<String, SettingsRecord>,
    read_error: Option<SettingsStoreError>,
    write_error: Option<SettingsStoreError>,
    last_get: Option<(String, Vec<String>)>,
}

/// Hash-per-key store with switchable failures. Clones share state.
#[derive(Clone, Default)]
pub struct InMemorySettingsStore {
    state: Arc<Mutex<SettingsStoreState>>,
}

impl InMemorySettingsStore {
    pub fn with_record(key: &str, record: SettingsRecord) -> Self {
        let store = Self::default();
        store.put_record(key, record);
        store
    }

    /// Merge `record` into the object at `key`, bypassing failure modes.
    pub fn put_record(&self, key: &str, record: SettingsRecord) {
        self.state
            .lock()
            .unwrap()
            .objects
            .entry(key.to_string())
            .or_default()
            .extend(record);
    }

    pub fn record(&self, key: &str) -> SettingsRecord {
        self.state
            .lock()
            .unwrap()
            .objects
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    pub fn fail_reads(&self, err: SettingsStoreError) {
        self.state.lock().unwrap().read_error = Some(err);
    }

    pub fn fail_writes(&self, err: SettingsStoreError) {
        self.state.lock().unwrap().write_error = Some(err);
    }

    pub fn last_get(&self) -> Option<(String, Vec<String>)> {
        self.state.lock().unwrap().last_get.clone()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get_fields(
        &self,
        key: &str,
        names: &[&str],
    ) -> Result<SettingsRecord, SettingsStoreError> {
        let mut state = self.state.lock().unwrap();
        state.last_get = Some((
            key.to_string(),
            names.iter().map(|n| n.to_string()).collect(),
        ));

        if let Some(err) = state.read_error.clone() {
            return Err(err);
        }

        let object = state.objects.get(key).cloned().unwrap_or_default();
        Ok(object
            .into_iter()
            .filter(|(field, _)| names.contains(&field.as_str()))
            .collect())
    }

    async fn set_object(
        &self,
        key: &str,
        record: &SettingsRecord,
    ) -> Result<(), SettingsStoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.write_error.clone() {
            return Err(err);
        }

        state
            .objects
            .entry(key.to_string())
            .or_default()
            .extend(record.clone());
        Ok(())
    }
}
