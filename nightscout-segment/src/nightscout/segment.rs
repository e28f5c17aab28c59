//! The Nightscout status-line segment.
//!
//! Lifecycle, driven by the host:
//! 1. `init` with the user's properties (binds the source, decides on caching)
//! 2. `enabled` fetches; `false` means "no data, skip this segment"
//! 3. `string` renders the template, only after `enabled` returned `true`

use tracing::debug;

use crate::env::{Properties, SegmentEnv, TemplateContext};

use super::cache::CachedSource;
use super::config::SegmentConfig;
use super::fetch::{LiveSource, ReadingSource};
use super::icons::map_symbol;
use super::types::Reading;

/// Values exposed to the segment template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// `{{.Sgv}}`
    pub sgv: i64,
    /// `{{.Direction}}`
    pub direction: String,
    /// `{{.TrendIcon}}`
    pub trend_icon: String,
}

impl TemplateContext for RenderContext {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "Sgv" => Some(self.sgv.to_string()),
            "Direction" => Some(self.direction.clone()),
            "TrendIcon" => Some(self.trend_icon.clone()),
            _ => None,
        }
    }
}

/// Shows the latest glucose value and trend from a Nightscout site.
pub struct NightscoutSegment {
    env: SegmentEnv,
    config: Option<SegmentConfig>,
    source: Option<Box<dyn ReadingSource>>,
    context: Option<RenderContext>,
}

impl NightscoutSegment {
    /// Create an uninitialized segment over the given collaborators.
    pub fn new(env: SegmentEnv) -> Self {
        Self {
            env,
            config: None,
            source: None,
            context: None,
        }
    }

    /// Resolve configuration and bind the reading source.
    ///
    /// Caching is decided here, once: with a positive `cache_timeout` the
    /// live source is wrapped in a [`CachedSource`] keyed by the URL.
    /// Calling `init` again replaces the configuration and drops any
    /// previously fetched data.
    pub fn init(&mut self, props: &Properties) {
        let config = SegmentConfig::from_properties(props);

        let live = LiveSource::new(self.env.http.clone(), &config.url, config.http_timeout);

        let source: Box<dyn ReadingSource> = if config.is_cache_enabled() {
            Box::new(CachedSource::new(
                live,
                self.env.cache.clone(),
                &config.url,
                config.cache_timeout_mins,
            ))
        } else {
            Box::new(live)
        };

        self.config = Some(config);
        self.source = Some(source);
        self.context = None;
    }

    /// Whether the segment was initialized with caching on.
    pub fn is_cache_enabled(&self) -> bool {
        self.config
            .as_ref()
            .is_some_and(SegmentConfig::is_cache_enabled)
    }

    /// The resolved configuration, once initialized.
    pub fn config(&self) -> Option<&SegmentConfig> {
        self.config.as_ref()
    }

    /// The data from the last successful `enabled` call.
    pub fn context(&self) -> Option<&RenderContext> {
        self.context.as_ref()
    }

    /// Fetch the latest reading. Returns `false` if there is nothing to show.
    ///
    /// Errors are logged and otherwise swallowed; on failure the previous
    /// context, if any, is left as it was.
    pub fn enabled(&mut self) -> bool {
        let (Some(config), Some(source)) = (&self.config, &self.source) else {
            debug!("Nightscout segment used before init");
            return false;
        };

        let reading = match source.fetch() {
            Ok(reading) => reading,
            Err(e) => {
                debug!(url = %config.url, error = %e, "Nightscout fetch failed");
                return false;
            }
        };

        let Reading { sgv, direction } = reading;
        let trend_icon = map_symbol(&direction, &config.icons).to_string();

        self.context = Some(RenderContext {
            sgv,
            direction,
            trend_icon,
        });

        true
    }

    /// Render the segment text.
    ///
    /// A template error is returned as the text itself so the user can see
    /// what is wrong with their template. Empty if `enabled` never succeeded.
    pub fn string(&self) -> String {
        let (Some(config), Some(context)) = (&self.config, &self.context) else {
            return String::new();
        };

        self.env
            .templates
            .render(&config.template, context)
            .unwrap_or_else(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{
        CacheError, CacheStore, HttpTransport, MemoryCache, TextTemplate, TransportError,
    };
    use crate::nightscout::config::{CACHE_TIMEOUT, SEGMENT_TEMPLATE, URL};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const FAKE_URL: &str = "FAKE";
    const TEMPLATE: &str = " {{.Sgv}}{{.TrendIcon}}";

    fn entry(sgv: i64, direction: &str) -> String {
        format!(
            r#"[{{"_id":"619d6fa819696e8ded5b2206","sgv":{sgv},"date":1637707537000,"dateString":"2021-11-23T22:45:37.000Z","trend":4,"direction":"{direction}","device":"share2","type":"sgv","utcOffset":0,"sysTime":"2021-11-23T22:45:37.000Z","mills":1637707537000}}]"#
        )
    }

    /// Transport serving one canned response and counting requests.
    struct MockTransport {
        response: Mutex<Result<String, u16>>,
        urls: Mutex<Vec<String>>,
    }

    impl MockTransport {
        fn new(response: Result<String, u16>) -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(response),
                urls: Mutex::new(Vec::new()),
            })
        }

        fn respond_with(&self, response: Result<String, u16>) {
            *self.response.lock().unwrap() = response;
        }

        fn request_count(&self) -> usize {
            self.urls.lock().unwrap().len()
        }
    }

    impl HttpTransport for MockTransport {
        fn get(&self, url: &str, _timeout: Duration) -> Result<Vec<u8>, TransportError> {
            self.urls.lock().unwrap().push(url.to_string());
            match &*self.response.lock().unwrap() {
                Ok(body) => Ok(body.clone().into_bytes()),
                Err(status) => Err(TransportError::Status {
                    status: *status,
                    message: "Something went wrong".into(),
                }),
            }
        }
    }

    /// Cache store backed by a plain map, remembering writes.
    #[derive(Default)]
    struct MapCache {
        entries: Mutex<HashMap<String, String>>,
        writes: Mutex<Vec<(String, u64)>>,
    }

    impl CacheStore for MapCache {
        fn get(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        fn set(&self, key: &str, value: String, ttl_mins: u64) -> Result<(), CacheError> {
            self.writes.lock().unwrap().push((key.to_string(), ttl_mins));
            self.entries.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }
    }

    fn env(http: Arc<MockTransport>, cache: Arc<dyn CacheStore>) -> SegmentEnv {
        SegmentEnv::new(http, cache, Arc::new(TextTemplate::new()))
    }

    fn props(cache_timeout: i64) -> Properties {
        Properties::new()
            .with(URL, FAKE_URL)
            .with(CACHE_TIMEOUT, cache_timeout)
            .with(SEGMENT_TEMPLATE, TEMPLATE)
    }

    fn render(response: Result<String, u16>) -> (bool, String) {
        let http = MockTransport::new(response);
        let mut segment = NightscoutSegment::new(env(http, Arc::new(MemoryCache::new())));
        segment.init(&props(0));

        let enabled = segment.enabled();
        (enabled, segment.string())
    }

    #[test]
    fn renders_each_trend() {
        let cases = [
            (150, "Flat", " 150→"),
            (50, "DoubleDown", " 50↓↓"),
            (250, "DoubleUp", " 250↑↑"),
            (140, "SingleUp", " 140↑"),
            (174, "FortyFiveUp", " 174↗"),
            (61, "FortyFiveDown", " 61↘"),
            (70, "SingleDown", " 70↓"),
        ];

        for (sgv, direction, expected) in cases {
            assert_eq!(
                render(Ok(entry(sgv, direction))),
                (true, expected.to_string()),
                "{direction} {sgv}"
            );
        }
    }

    #[test]
    fn unknown_direction_renders_without_icon() {
        assert_eq!(
            render(Ok(entry(99, "NOT COMPUTABLE"))),
            (true, " 99".to_string())
        );
    }

    #[test]
    fn only_first_entry_needs_reading_fields() {
        assert_eq!(
            render(Ok(
                r#"[{"sgv":150,"direction":"Flat"},{"type":"mbg","mbg":100}]"#.to_string()
            )),
            (true, " 150→".to_string())
        );
    }

    #[test]
    fn transport_error_disables_segment() {
        let (enabled, _) = render(Err(500));
        assert!(!enabled);
    }

    #[test]
    fn non_array_body_disables_segment() {
        let (enabled, _) = render(Ok("nonsense".to_string()));
        assert!(!enabled);
    }

    #[test]
    fn empty_array_disables_segment() {
        let (enabled, _) = render(Ok("[]".to_string()));
        assert!(!enabled);
    }

    #[test]
    fn default_template_is_value_only() {
        let http = MockTransport::new(Ok(entry(150, "Flat")));
        let mut segment = NightscoutSegment::new(env(http, Arc::new(MemoryCache::new())));
        segment.init(&Properties::new().with(URL, FAKE_URL).with(CACHE_TIMEOUT, 0));

        assert!(segment.enabled());
        assert_eq!(segment.string(), "150");
    }

    #[test]
    fn template_error_is_rendered_as_text() {
        let http = MockTransport::new(Ok(entry(150, "Flat")));
        let mut segment = NightscoutSegment::new(env(http, Arc::new(MemoryCache::new())));
        segment.init(&props(0).with(SEGMENT_TEMPLATE, "{{.Mmol}}"));

        assert!(segment.enabled());
        assert_eq!(segment.string(), "template: can't evaluate field Mmol");
    }

    #[test]
    fn direction_is_exposed_to_templates() {
        let http = MockTransport::new(Ok(entry(150, "Flat")));
        let mut segment = NightscoutSegment::new(env(http, Arc::new(MemoryCache::new())));
        segment.init(&props(0).with(SEGMENT_TEMPLATE, "{{.Sgv}} {{.Direction}}"));

        assert!(segment.enabled());
        assert_eq!(segment.string(), "150 Flat");
    }

    #[test]
    fn icon_overrides_apply() {
        let http = MockTransport::new(Ok(entry(150, "Flat")));
        let mut segment = NightscoutSegment::new(env(http, Arc::new(MemoryCache::new())));
        segment.init(&props(0).with("flat_icon", " steady"));

        assert!(segment.enabled());
        assert_eq!(segment.string(), " 150 steady");
    }

    #[test]
    fn cache_enabled_flag() {
        let http = MockTransport::new(Ok(entry(150, "Flat")));
        let mut segment = NightscoutSegment::new(env(http, Arc::new(MemoryCache::new())));
        assert!(!segment.is_cache_enabled());

        segment.init(&props(1));
        assert!(segment.is_cache_enabled());
        assert_eq!(segment.config().map(|c| c.cache_timeout_mins), Some(1));
        assert_eq!(segment.config().map(|c| c.url.as_str()), Some(FAKE_URL));

        segment.init(&props(0));
        assert!(!segment.is_cache_enabled());
    }

    #[test]
    fn zero_ttl_fetches_every_time() {
        let http = MockTransport::new(Ok(entry(150, "Flat")));
        let cache = Arc::new(MapCache::default());
        let mut segment = NightscoutSegment::new(env(http.clone(), cache.clone()));
        segment.init(&props(0));

        assert!(segment.enabled());
        assert!(segment.enabled());

        assert_eq!(http.request_count(), 2);
        assert!(cache.writes.lock().unwrap().is_empty());
    }

    #[test]
    fn positive_ttl_fetches_once_and_caches_under_url() {
        let http = MockTransport::new(Ok(entry(150, "Flat")));
        let cache = Arc::new(MapCache::default());
        let mut segment = NightscoutSegment::new(env(http.clone(), cache.clone()));
        segment.init(&props(5));

        assert!(segment.enabled());
        assert!(segment.enabled());

        assert_eq!(http.request_count(), 1);
        assert_eq!(
            *cache.writes.lock().unwrap(),
            vec![(FAKE_URL.to_string(), 5)]
        );
        assert_eq!(segment.string(), " 150→");
    }

    #[test]
    fn cached_reading_is_returned_without_fetching() {
        let http = MockTransport::new(Err(500));
        let cache = Arc::new(MapCache::default());
        let cached = serde_json::to_string(&Reading::new(100, "FortyFiveDown")).unwrap();
        cache.set(FAKE_URL, cached, 1).unwrap();

        let mut segment = NightscoutSegment::new(env(http.clone(), cache));
        segment.init(&props(1));

        assert!(segment.enabled());
        assert_eq!(http.request_count(), 0);
        assert_eq!(
            segment.context(),
            Some(&RenderContext {
                sgv: 100,
                direction: "FortyFiveDown".into(),
                trend_icon: "↘".into(),
            })
        );
    }

    #[test]
    fn failed_fetch_keeps_previous_context() {
        let http = MockTransport::new(Ok(entry(150, "Flat")));
        let mut segment =
            NightscoutSegment::new(env(http.clone(), Arc::new(MemoryCache::new())));
        segment.init(&props(0));
        assert!(segment.enabled());

        http.respond_with(Err(503));
        assert!(!segment.enabled());
        assert_eq!(segment.context().map(|c| c.sgv), Some(150));
    }

    #[test]
    fn reinit_clears_context() {
        let http = MockTransport::new(Ok(entry(150, "Flat")));
        let mut segment = NightscoutSegment::new(env(http, Arc::new(MemoryCache::new())));
        segment.init(&props(0));
        assert!(segment.enabled());

        segment.init(&props(0));
        assert!(segment.context().is_none());
        assert_eq!(segment.string(), "");
    }

    #[test]
    fn uninitialized_segment_is_disabled() {
        let http = MockTransport::new(Ok(entry(150, "Flat")));
        let mut segment = NightscoutSegment::new(env(http.clone(), Arc::new(MemoryCache::new())));

        assert!(!segment.enabled());
        assert_eq!(segment.string(), "");
        assert_eq!(http.request_count(), 0);
    }
}
