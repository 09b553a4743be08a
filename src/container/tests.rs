//! Container lifecycle tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::time::{timeout, Duration};

use crate::bus::api::Message;
use crate::container::api::{Container, ContainerError, ContainerResult, Provider};
use crate::queue::api::{Handler, HandlerError, QueueError, QueueOptions};

fn noop_handler() -> Handler {
    Handler::of(|_| async { Ok::<(), HandlerError>(()) })
}

struct RecordingProvider {
    name: String,
    record: Arc<Mutex<Vec<String>>>,
    fail_on_load: bool,
}

impl RecordingProvider {
    fn new(name: &str, record: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            record: Arc::clone(record),
            fail_on_load: false,
        })
    }

    fn failing(name: &str, record: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            record: Arc::clone(record),
            fail_on_load: true,
        })
    }
}

#[async_trait]
impl Provider for RecordingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self, _container: &Arc<Container>) -> ContainerResult<()> {
        if self.fail_on_load {
            return Err(ContainerError::provider(&self.name, "load refused"));
        }
        self.record.lock().unwrap().push(format!("load:{}", self.name));
        Ok(())
    }

    async fn exit(&self) {
        self.record.lock().unwrap().push(format!("exit:{}", self.name));
    }
}

#[tokio::test]
async fn test_registration_order_controls_load_order() {
    let container = Container::new();
    let record = Arc::new(Mutex::new(Vec::new()));

    container.push(RecordingProvider::new("b", &record)).unwrap();
    container.front(RecordingProvider::new("a", &record)).unwrap();
    container
        .after("b", RecordingProvider::new("d", &record))
        .unwrap();
    container
        .before("d", RecordingProvider::new("c", &record))
        .unwrap();
    // Unknown anchor falls back to the end
    container
        .after("missing", RecordingProvider::new("e", &record))
        .unwrap();

    assert_eq!(container.provider_count().unwrap(), 5);
    container.load().await.unwrap();

    assert_eq!(
        *record.lock().unwrap(),
        vec!["load:a", "load:b", "load:c", "load:d", "load:e"]
    );
}

#[tokio::test]
async fn test_duplicate_provider_rejected() {
    let container = Container::new();
    let record = Arc::new(Mutex::new(Vec::new()));

    container.push(RecordingProvider::new("dup", &record)).unwrap();
    let err = container
        .push(RecordingProvider::new("dup", &record))
        .unwrap_err();
    assert!(matches!(err, ContainerError::DuplicateProvider { .. }));
}

#[tokio::test]
async fn test_load_aborts_on_first_failure() {
    let container = Container::new();
    let record = Arc::new(Mutex::new(Vec::new()));

    container.push(RecordingProvider::new("ok", &record)).unwrap();
    container
        .push(RecordingProvider::failing("bad", &record))
        .unwrap();
    container
        .push(RecordingProvider::new("never", &record))
        .unwrap();

    let err = container.load().await.unwrap_err();
    assert!(matches!(err, ContainerError::ProviderLoad { ref name, .. } if name == "bad"));
    assert_eq!(*record.lock().unwrap(), vec!["load:ok"]);
}

#[tokio::test]
async fn test_exit_runs_providers_in_reverse_order() {
    let container = Container::new();
    let record = Arc::new(Mutex::new(Vec::new()));

    container.push(RecordingProvider::new("a", &record)).unwrap();
    container.push(RecordingProvider::new("b", &record)).unwrap();
    container.load().await.unwrap();

    container.exit().await;

    assert_eq!(
        *record.lock().unwrap(),
        vec!["load:a", "load:b", "exit:b", "exit:a"]
    );
    assert!(container.shutdown_signal().is_fired());
}

#[tokio::test]
async fn test_second_exit_is_a_noop() {
    let container = Container::new();
    let record = Arc::new(Mutex::new(Vec::new()));
    container.push(RecordingProvider::new("a", &record)).unwrap();

    container.exit().await;
    container.exit().await;

    // Exit hooks ran exactly once
    assert_eq!(*record.lock().unwrap(), vec!["exit:a"]);
}

#[tokio::test]
async fn test_value_store_roundtrip() {
    #[derive(Debug, PartialEq)]
    struct Config {
        retries: u8,
    }

    let container = Container::new();
    container.set(Config { retries: 3 }).unwrap();
    container.set(7u16).unwrap();

    assert_eq!(container.get::<Config>().unwrap().retries, 3);
    assert_eq!(*container.get::<u16>().unwrap(), 7);
    assert_eq!(*container.must_get::<u16>(), 7);

    let err = container.get::<String>().unwrap_err();
    assert!(matches!(err, ContainerError::ValueNotFound { .. }));
}

#[tokio::test]
#[should_panic(expected = "no value registered")]
async fn test_must_get_panics_on_missing_value() {
    let container = Container::new();
    let _ = container.must_get::<String>();
}

#[tokio::test]
async fn test_metadata_roundtrip() {
    let container = Container::new();
    container.set_meta("region", "eu-west".to_string()).unwrap();
    container.set_meta("retries", 3usize).unwrap();
    // Same type under a second key; replacement under the first
    container.set_meta("zone", "b".to_string()).unwrap();
    container.set_meta("region", "us-east".to_string()).unwrap();

    assert_eq!(
        container.get_meta::<String>("region").unwrap().as_str(),
        "us-east"
    );
    assert_eq!(container.get_meta::<String>("zone").unwrap().as_str(), "b");
    assert_eq!(*container.get_meta::<usize>("retries").unwrap(), 3);
    assert!(container.has_meta("region").unwrap());
    assert!(!container.has_meta("missing").unwrap());

    // Missing key and wrong type are distinct errors
    let err = container.get_meta::<String>("missing").unwrap_err();
    assert!(matches!(err, ContainerError::MetadataNotFound { .. }));
    let err = container.get_meta::<u8>("retries").unwrap_err();
    assert!(matches!(err, ContainerError::MetadataType { .. }));
}

#[tokio::test]
#[should_panic(expected = "no metadata registered")]
async fn test_must_get_meta_panics_on_missing_key() {
    let container = Container::new();
    let _ = container.must_get_meta::<String>("missing");
}

#[tokio::test]
async fn test_providers_enumerates_in_load_order() {
    let container = Container::new();
    let record = Arc::new(Mutex::new(Vec::new()));

    container.push(RecordingProvider::new("a", &record)).unwrap();
    container.front(RecordingProvider::new("z", &record)).unwrap();

    let names: Vec<String> = container
        .providers()
        .unwrap()
        .iter()
        .map(|provider| provider.name().to_string())
        .collect();
    assert_eq!(names, vec!["z", "a"]);
}

#[tokio::test]
async fn test_exit_tears_down_idle_queue() {
    let container = Container::new();
    let queue = container.queue("jobs", QueueOptions::default()).unwrap();
    queue.subscribe().unwrap();

    container.publish("jobs", Message::of(1u8)).await.unwrap();
    container.exit().await;

    // Publishing after exit fails deterministically
    assert!(container.publish("jobs", Message::of(2u8)).await.is_err());

    // The queue was unsubscribed and its intake closed: a listener started
    // after exit observes the fired signal and returns immediately
    let result = timeout(
        Duration::from_secs(1),
        queue.listen(noop_handler()),
    )
    .await
    .expect("listen must return promptly after exit");
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_listener_returns_when_container_exits() {
    let container = Container::new();
    let queue = container
        .queue("jobs", QueueOptions::new().concurrency(2))
        .unwrap();

    let listener = {
        let queue = queue.clone();
        tokio::spawn(async move { queue.listen(noop_handler()).await })
    };
    // Give the loop a moment to subscribe
    tokio::time::sleep(Duration::from_millis(20)).await;

    container.exit().await;
    let result = timeout(Duration::from_secs(1), listener)
        .await
        .expect("listener must terminate on container exit")
        .unwrap();
    assert!(result.is_ok());

    // Terminated via shutdown: the queue can never be listened on again
    let again = queue.listen(noop_handler()).await;
    assert!(matches!(again, Err(QueueError::ListenerUnavailable { .. })));
}
