//! Locally held collections mirrored from the backend
//!
//! A [`ResourceManager`] owns one ordered collection for one resource type.
//! The collection only changes after the server has answered: loads replace
//! it wholesale, creates prepend the server's record, updates replace in
//! place by id and deletes remove by id.

mod goals;
mod measurements;
mod notifications;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fetch::ApiClient;
use crate::validation::ValidationErrors;

pub use goals::*;
pub use measurements::*;
pub use notifications::*;

/// Server-assigned identifier. Some tables use serial ids, others text ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

/// A record type the backend exposes as a collection
pub trait Resource: DeserializeOwned + Clone + Send {
    /// Collection path, e.g. `/api/progress/measurements`
    const PATH: &'static str;

    /// Human-readable name used in prompts and logs
    const NAME: &'static str;

    fn id(&self) -> &RecordId;
}

/// A resource the user can create from a form
pub trait Creatable: Resource {
    /// Raw form input
    type Input;

    /// Body sent to the server
    type Create: Serialize + Send + Sync;

    /// Validate form input into a request body, collecting every violation
    fn validate(input: Self::Input) -> std::result::Result<Self::Create, ValidationErrors>;
}

/// A resource that accepts partial updates
pub trait Updatable: Resource {
    type Patch: Serialize + Send + Sync;

    /// Complete a patch against the current record before it is sent.
    /// Derived fields are filled in here so they cannot drift.
    fn prepare_patch(&self, patch: Self::Patch) -> Self::Patch {
        patch
    }
}

/// Blocking confirmation affordance awaited before destructive actions
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

#[async_trait]
impl<F> Confirmation for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    async fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Raises the busy flag for the lifetime of one operation, including one
/// whose future is dropped mid-request
struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn raise(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        BusyGuard(Arc::clone(flag))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Read-only view of a manager's busy flag, for loading indicators and
/// disabled controls living outside the manager
#[derive(Debug, Clone)]
pub struct BusyIndicator(Arc<AtomicBool>);

impl BusyIndicator {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Keeps a local collection in step with one backend collection.
///
/// Every operation takes `&mut self`, so two operations on one manager can
/// never overlap.
pub struct ResourceManager<R: Resource> {
    api: ApiClient,
    items: Vec<R>,
    notice: Option<String>,
    busy: Arc<AtomicBool>,
    loaded: bool,
}

impl<R: Resource> ResourceManager<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            items: Vec::new(),
            notice: None,
            busy: Arc::new(AtomicBool::new(false)),
            loaded: false,
        }
    }

    /// The collection in display order
    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a `load()` has completed successfully
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn get(&self, id: &RecordId) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Observer that reports `true` while a request is outstanding; the
    /// triggering control should be disabled meanwhile
    pub fn busy_indicator(&self) -> BusyIndicator {
        BusyIndicator(Arc::clone(&self.busy))
    }

    /// Message from the last failed operation
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn begin(&self) -> BusyGuard {
        BusyGuard::raise(&self.busy)
    }

    fn fail<T>(&mut self, err: Error) -> Result<T> {
        warn!("{} operation failed: {}", R::NAME, err);
        self.notice = Some(err.user_message());
        Err(err)
    }

    fn position(&self, id: &RecordId) -> Result<usize> {
        self.items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| Error::not_found(format!("{} {}", R::NAME, id)))
    }

    /// Fetch the whole collection, replacing whatever is held locally.
    ///
    /// Fails closed: on error the collection is emptied and a notice is set.
    pub async fn load(&mut self) -> Result<&[R]> {
        let _guard = self.begin();
        debug!("loading {}", R::PATH);

        let loaded = self.api.get(R::PATH).execute::<Vec<R>>().await;
        match loaded {
            Ok(items) => {
                self.items = items;
                self.loaded = true;
                self.notice = None;
                Ok(&self.items)
            }
            Err(e) => {
                self.items.clear();
                self.loaded = false;
                self.fail(e)
            }
        }
    }

    /// Ask for confirmation, then delete the record.
    ///
    /// Returns `Ok(false)` when the user declines; nothing is sent and the
    /// collection is untouched. The record is removed locally only after the
    /// server confirms the delete.
    pub async fn delete(&mut self, id: &RecordId, confirmation: &dyn Confirmation) -> Result<bool> {
        let _guard = self.begin();
        if let Err(e) = self.position(id) {
            return self.fail(e);
        }

        let prompt = format!("Delete this {}? This cannot be undone.", R::NAME);
        if !confirmation.confirm(&prompt).await {
            debug!("delete of {} {} declined", R::NAME, id);
            return Ok(false);
        }

        let deleted = self.api.delete(R::PATH).segment(id).execute_empty().await;
        if let Err(e) = deleted {
            return self.fail(e);
        }

        self.items.retain(|item| item.id() != id);
        self.notice = None;
        info!("deleted {} {}", R::NAME, id);
        Ok(true)
    }
}

impl<R: Creatable> ResourceManager<R> {
    /// Validate locally, then create the record on the server.
    ///
    /// Invalid input issues no request. On success the server's canonical
    /// record is prepended.
    pub async fn add(&mut self, input: R::Input) -> Result<&R> {
        let _guard = self.begin();

        let body = match R::validate(input) {
            Ok(body) => body,
            Err(errors) => return self.fail(Error::Validation(errors)),
        };

        let created = match self.api.post(R::PATH).json(&body) {
            Ok(request) => request.execute::<R>().await,
            Err(e) => Err(e),
        };

        match created {
            Ok(record) => {
                info!("created {} {}", R::NAME, record.id());
                self.items.insert(0, record);
                self.notice = None;
                Ok(&self.items[0])
            }
            Err(e) => self.fail(e),
        }
    }
}

impl<R: Updatable> ResourceManager<R> {
    /// Send a partial update and replace the local record in place.
    ///
    /// On failure the local record is left as it was so the edit can be retried.
    pub async fn update(&mut self, id: &RecordId, patch: R::Patch) -> Result<&R> {
        let _guard = self.begin();

        let index = match self.position(id) {
            Ok(index) => index,
            Err(e) => return self.fail(e),
        };
        let patch = self.items[index].prepare_patch(patch);

        let updated = match self.api.patch(R::PATH).segment(id).json(&patch) {
            Ok(request) => request.execute::<R>().await,
            Err(e) => Err(e),
        };

        match updated {
            Ok(record) => {
                debug!("updated {} {}", R::NAME, id);
                self.items[index] = record;
                self.notice = None;
                Ok(&self.items[index])
            }
            Err(e) => self.fail(e),
        }
    }
}

/// Lenient decoders for values the backend sends in more than one shape
pub(crate) mod de {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    fn to_f64<E: serde::de::Error>(raw: NumberOrText) -> Result<f64, E> {
        match raw {
            NumberOrText::Number(n) => Ok(n),
            NumberOrText::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid number: {}", s))),
        }
    }

    /// Numeric columns arrive as JSON numbers or as decimal strings
    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        to_f64(NumberOrText::deserialize(deserializer)?)
    }

    /// Like [`number`], treating `null` as zero
    pub fn number_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Option::<NumberOrText>::deserialize(deserializer)? {
            Some(raw) => to_f64(raw),
            None => Ok(0.0),
        }
    }

    /// Dates arrive as `YYYY-MM-DD` or as full ISO timestamps
    pub fn date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let day = raw.get(..10).unwrap_or(&raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|_| serde::de::Error::custom(format!("invalid date: {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_shapes() {
        let int: RecordId = serde_json::from_value(json!(42)).unwrap();
        let text: RecordId = serde_json::from_value(json!("a1b2")).unwrap();
        assert_eq!(int, RecordId::Int(42));
        assert_eq!(text, RecordId::from("a1b2"));
        assert_eq!(int.to_string(), "42");
    }

    #[test]
    fn test_busy_guard_releases_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let indicator = BusyIndicator(Arc::clone(&flag));
        {
            let _guard = BusyGuard::raise(&flag);
            assert!(indicator.is_busy());
        }
        assert!(!indicator.is_busy());
    }
}
