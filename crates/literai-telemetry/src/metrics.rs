//! Metric name constants and recording helpers

use std::sync::LazyLock;
use std::time::Instant;

use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Record elapsed seconds since `start` on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[KeyValue]) {
    histogram.record(start.elapsed().as_secs_f64(), attributes);
}

// Story metric names
pub const STORY_REQUEST_DURATION: &str = "story.request.duration";
pub const STORY_REQUEST_COUNT: &str = "story.request.count";

// Speech metric names
pub const SPEECH_REQUEST_DURATION: &str = "speech.request.duration";
pub const SPEECH_CHUNK_COUNT: &str = "speech.chunk.count";
pub const SPEECH_PHRASE_CACHE_HITS: &str = "speech.phrase_cache.hits";

/// Meter all LiterAI instruments are created from
///
/// Resolves against the global provider, so instruments are no-ops until
/// [`crate::init`] installs an exporter.
pub fn meter() -> Meter {
    opentelemetry::global::meter("literai")
}

/// Instruments for the story endpoint
pub struct StoryMetrics {
    pub duration: Histogram<f64>,
    pub count: Counter<u64>,
}

/// Instruments for the audio endpoint
pub struct SpeechMetrics {
    pub duration: Histogram<f64>,
    pub chunks: Counter<u64>,
    pub phrase_cache_hits: Counter<u64>,
}

pub static STORY: LazyLock<StoryMetrics> = LazyLock::new(|| {
    let meter = meter();
    StoryMetrics {
        duration: meter
            .f64_histogram(STORY_REQUEST_DURATION)
            .with_unit("s")
            .with_description("Story generation latency")
            .build(),
        count: meter
            .u64_counter(STORY_REQUEST_COUNT)
            .with_description("Story generation requests by outcome")
            .build(),
    }
});

pub static SPEECH: LazyLock<SpeechMetrics> = LazyLock::new(|| {
    let meter = meter();
    SpeechMetrics {
        duration: meter
            .f64_histogram(SPEECH_REQUEST_DURATION)
            .with_unit("s")
            .with_description("Audio generation latency")
            .build(),
        chunks: meter
            .u64_counter(SPEECH_CHUNK_COUNT)
            .with_description("Text chunks sent for synthesis")
            .build(),
        phrase_cache_hits: meter
            .u64_counter(SPEECH_PHRASE_CACHE_HITS)
            .with_description("Phrases served from the pre-synthesized cache")
            .build(),
    }
});

/// Outcome attribute shared by the request instruments
pub fn outcome(success: bool) -> KeyValue {
    KeyValue::new("outcome", if success { "success" } else { "error" })
}
