//! The Classifier: configured entry point for checkpoint classification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use syncstate_core::{classify, StateWrapper};

use crate::error::{Result, SyncStateError};

/// Configuration for a [`Classifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Whether the consumer understands GLOBAL and STREAM checkpoints.
    /// When false every typed batch is reduced to its legacy `data`.
    pub stream_capable: bool,
}

impl ClassifierConfig {
    /// Configuration for consumers that only understand legacy checkpoints.
    pub const fn legacy_only() -> Self {
        Self {
            stream_capable: false,
        }
    }

    /// Read a configuration from a JSON document. Missing fields take
    /// their defaults.
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(Self::deserialize(value)?)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            stream_capable: true,
        }
    }
}

/// Classifies raw checkpoints for one consumer.
///
/// Stateless apart from its configuration: every call is independent and
/// returns a freshly built wrapper, so a classifier can be shared freely
/// between threads.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    /// Create a classifier.
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one raw checkpoint. `None` and JSON `null` mean there is
    /// no prior checkpoint.
    pub fn classify(&self, raw: Option<&Value>) -> Result<Option<StateWrapper>> {
        let span = tracing::debug_span!(
            "classify_state",
            stream_capable = self.config.stream_capable
        );
        let _enter = span.enter();

        let wrapper = classify(raw, self.config.stream_capable)?;
        match &wrapper {
            Some(w) => tracing::debug!(state_type = %w.state_type(), "classified checkpoint"),
            None => tracing::debug!("no prior checkpoint"),
        }
        Ok(wrapper)
    }

    /// Classify a sequence of raw checkpoints, stopping at the first
    /// inconsistent one.
    pub fn classify_all<'a, I>(&self, raws: I) -> Result<Vec<Option<StateWrapper>>>
    where
        I: IntoIterator<Item = Option<&'a Value>>,
    {
        raws.into_iter()
            .enumerate()
            .map(|(position, raw)| {
                let span = tracing::debug_span!(
                    "classify_state",
                    position,
                    stream_capable = self.config.stream_capable
                );
                let _enter = span.enter();

                classify(raw, self.config.stream_capable)
                    .map_err(|source| SyncStateError::Batch { position, source })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use syncstate_core::{StateError, StateType};
    use syncstate_testkit::{batch, global_entry, stream_entry};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    #[test]
    fn test_default_config_is_stream_capable() {
        assert!(ClassifierConfig::default().stream_capable);
        assert!(!ClassifierConfig::legacy_only().stream_capable);
        assert!(Classifier::default().config().stream_capable);
    }

    #[test]
    fn test_config_from_json() {
        let config = ClassifierConfig::from_json(&json!({ "stream_capable": false })).unwrap();
        assert_eq!(config, ClassifierConfig::legacy_only());

        let config = ClassifierConfig::from_json(&json!({})).unwrap();
        assert_eq!(config, ClassifierConfig::default());
    }

    #[test]
    fn test_config_from_json_rejects_bad_type() {
        let err = ClassifierConfig::from_json(&json!({ "stream_capable": "yes" })).unwrap_err();
        assert!(matches!(err, SyncStateError::Config(_)));
        assert!(err.state_error().is_none());
    }

    #[test]
    fn test_classify_uses_configured_capability() {
        let raw = batch(&[stream_entry("a").with_data(json!(7))]);

        let capable = Classifier::default().classify(Some(&raw)).unwrap().unwrap();
        assert_eq!(capable.state_type(), StateType::Stream);

        let legacy = Classifier::new(ClassifierConfig::legacy_only())
            .classify(Some(&raw))
            .unwrap()
            .unwrap();
        assert_eq!(legacy.legacy_state(), Some(&json!(7)));
    }

    #[test]
    fn test_classify_wraps_core_error() {
        let global = global_entry(&["a"]);
        let raw = batch(&[global.clone(), global]);

        let err = Classifier::default().classify(Some(&raw)).unwrap_err();
        assert_eq!(
            err.state_error(),
            Some(&StateError::DuplicatedGlobalState { count: 2 })
        );
    }

    #[test]
    fn test_classify_all() {
        let stream = batch(&[stream_entry("a")]);
        let legacy = json!({ "cursor": 1 });

        let results = Classifier::default()
            .classify_all([Some(&stream), None, Some(&legacy)])
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().map(StateWrapper::state_type), Some(StateType::Stream));
        assert!(results[1].is_none());
        assert_eq!(results[2], Some(StateWrapper::Legacy(legacy)));
    }

    #[test]
    fn test_classify_all_reports_position() {
        let good = batch(&[stream_entry("a")]);
        let mixed = batch(&[stream_entry("a"), global_entry(&[])]);

        let err = Classifier::default()
            .classify_all([Some(&good), Some(&mixed)])
            .unwrap_err();

        assert!(matches!(err, SyncStateError::Batch { position: 1, .. }));
        assert!(matches!(
            err.state_error(),
            Some(StateError::MixedTypeBatch { index: 1, .. })
        ));
    }

    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_rejection_logged_once() {
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));

        let global = global_entry(&["a"]);
        let duplicated = batch(&[global.clone(), global]);

        tracing::subscriber::with_default(subscriber, || {
            let c = Classifier::default();
            assert!(c.classify(Some(&duplicated)).is_err());
            assert!(c.classify_all([Some(&duplicated)]).is_err());
        });

        assert_eq!(warnings.load(Ordering::SeqCst), 2);
    }
}
