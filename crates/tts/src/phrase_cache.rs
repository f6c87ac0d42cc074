use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::watch;

use crate::provider::SpeechProvider;

/// Audio for fixed phrases, synthesized once at startup
///
/// Clones share one table. The table is published exactly once, when
/// population finishes, and never changes afterwards.
#[derive(Clone)]
pub struct PhraseCache {
    table: watch::Receiver<Option<Arc<PhraseTable>>>,
}

/// Immutable phrase to audio mapping, in configured phrase order
#[derive(Debug, Default)]
pub struct PhraseTable {
    entries: Vec<(String, Bytes)>,
}

/// Text split into cached boundary phrases and the part still to synthesize
#[derive(Debug, Default)]
pub struct Splice {
    /// Cached audio to play before the synthesized text, in order
    pub prefix: Vec<Bytes>,
    /// Text that still needs synthesis
    pub remainder: String,
    /// Cached audio to play after the synthesized text, in order
    pub suffix: Vec<Bytes>,
}

impl Splice {
    pub fn hits(&self) -> usize {
        self.prefix.len() + self.suffix.len()
    }
}

impl PhraseCache {
    /// A cache that is ready immediately and holds nothing
    pub fn empty() -> Self {
        Self::ready_with(PhraseTable::default())
    }

    /// A cache that is ready immediately with the given table
    pub fn ready_with(table: PhraseTable) -> Self {
        let (_, receiver) = watch::channel(Some(Arc::new(table)));
        Self { table: receiver }
    }

    /// Start populating the cache in a background task
    ///
    /// Phrases are synthesized one after another, each call bounded by
    /// `timeout`. A phrase that fails is logged and left out. The returned
    /// cache becomes ready once every phrase has been attempted.
    pub fn populate(provider: Arc<dyn SpeechProvider>, phrases: Vec<String>, timeout: Duration) -> Self {
        let (sender, receiver) = watch::channel(None);

        tokio::spawn(async move {
            let table = build_table(provider.as_ref(), phrases, timeout).await;

            tracing::info!(phrases = table.len(), "phrase audio cache ready");

            // Every receiver may already be gone during shutdown
            let _ = sender.send(Some(Arc::new(table)));
        });

        Self { table: receiver }
    }

    /// Whether population has finished
    pub fn is_ready(&self) -> bool {
        self.table.borrow().is_some()
    }

    /// Wait for population to finish and return the table
    ///
    /// If the population task died without publishing, an empty table is
    /// returned so audio generation falls back to synthesizing everything.
    pub async fn ready(&self) -> Arc<PhraseTable> {
        let mut receiver = self.table.clone();

        match receiver.wait_for(Option::is_some).await {
            Ok(table) => (*table).clone().unwrap_or_default(),
            Err(_) => {
                tracing::warn!("phrase audio cache population ended without a result");
                Arc::default()
            }
        }
    }

    /// Like [`ready`](Self::ready), but give up after `deadline`
    ///
    /// A request arriving while population is still stuck gets an empty
    /// table and synthesizes everything itself.
    pub async fn ready_within(&self, deadline: Duration) -> Arc<PhraseTable> {
        match tokio::time::timeout(deadline, self.ready()).await {
            Ok(table) => table,
            Err(_) => {
                tracing::warn!(
                    deadline_secs = deadline.as_secs_f32(),
                    "phrase audio cache still warming, continuing without it"
                );
                Arc::default()
            }
        }
    }
}

async fn build_table(provider: &dyn SpeechProvider, phrases: Vec<String>, timeout: Duration) -> PhraseTable {
    let mut table = PhraseTable::default();

    for phrase in phrases {
        if phrase.trim().is_empty() || table.get(&phrase).is_some() {
            continue;
        }

        match tokio::time::timeout(timeout, provider.synthesize(&phrase)).await {
            Ok(Ok(audio)) => {
                tracing::debug!(phrase = %phrase, bytes = audio.len(), "cached phrase audio");
                table.insert(phrase, audio);
            }
            Ok(Err(e)) => tracing::warn!(phrase = %phrase, error = %e, "failed to pre-synthesize phrase"),
            Err(_) => tracing::warn!(phrase = %phrase, "pre-synthesizing phrase timed out"),
        }
    }

    table
}

impl PhraseTable {
    /// Insert or replace the audio for a phrase
    pub fn insert(&mut self, phrase: impl Into<String>, audio: Bytes) {
        let phrase = phrase.into();

        match self.entries.iter_mut().find(|(existing, _)| *existing == phrase) {
            Some(entry) => entry.1 = audio,
            None => self.entries.push((phrase, audio)),
        }
    }

    pub fn get(&self, phrase: &str) -> Option<&Bytes> {
        self.entries
            .iter()
            .find_map(|(existing, audio)| (existing == phrase).then_some(audio))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Strip cached phrases from the start and end of `text`
    ///
    /// Each phrase is checked once at the start and once at the end of
    /// whatever text is left, in configured order. Matching is literal.
    pub fn splice(&self, text: &str) -> Splice {
        let mut splice = Splice::default();
        let mut rest = text.trim();

        for (phrase, audio) in self.entries.iter().filter(|(phrase, _)| !phrase.is_empty()) {
            if let Some(after) = rest.strip_prefix(phrase.as_str()) {
                splice.prefix.push(audio.clone());
                rest = after.trim_start();
            }

            if let Some(before) = rest.strip_suffix(phrase.as_str()) {
                splice.suffix.insert(0, audio.clone());
                rest = before.trim_end();
            }
        }

        splice.remainder = rest.to_string();
        splice
    }
}
