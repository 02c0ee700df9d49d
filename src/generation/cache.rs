//! In-memory cache of generated documents, keyed by video.

use crate::config::CacheSettings;
use crate::schema::{CourseData, TranscriptData};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

#[derive(Debug, Clone)]
struct Cached<T> {
    value: T,
    cached_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Entry {
    transcript: Option<Cached<TranscriptData>>,
    course: Option<Cached<CourseData>>,
    created_at: Option<DateTime<Utc>>,
}

/// Per-video store of transcripts and study materials.
pub struct VideoCache {
    entries: RwLock<HashMap<String, Entry>>,
    enabled: bool,
    max_entries: usize,
    ttl: Option<Duration>,
}

impl VideoCache {
    /// Create a cache from settings.
    pub fn new(settings: &CacheSettings) -> Self {
        let ttl = match settings.ttl_seconds {
            0 => None,
            secs => {
                let secs = i64::try_from(secs).unwrap_or(i64::MAX).min(i64::MAX / 1000);
                Some(Duration::seconds(secs))
            }
        };

        Self {
            entries: RwLock::new(HashMap::new()),
            enabled: settings.enabled && settings.max_entries > 0,
            max_entries: settings.max_entries,
            ttl,
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(&CacheSettings {
            enabled: false,
            ..CacheSettings::default()
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Lifetime of an entry in seconds, `None` when entries never expire.
    pub fn ttl_seconds(&self) -> Option<i64> {
        self.ttl.map(|ttl| ttl.num_seconds())
    }

    /// Number of videos with at least one cached document.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn transcript(&self, key: &str) -> Option<TranscriptData> {
        self.transcript_at(key, Utc::now())
    }

    pub fn course(&self, key: &str) -> Option<CourseData> {
        self.course_at(key, Utc::now())
    }

    pub fn put_transcript(&self, key: &str, transcript: TranscriptData) {
        self.put_transcript_at(key, transcript, Utc::now());
    }

    pub fn put_course(&self, key: &str, course: CourseData) {
        self.put_course_at(key, course, Utc::now());
    }

    fn is_fresh<T>(&self, cached: &Cached<T>, now: DateTime<Utc>) -> bool {
        self.ttl.map_or(true, |ttl| now - cached.cached_at < ttl)
    }

    fn transcript_at(&self, key: &str, now: DateTime<Utc>) -> Option<TranscriptData> {
        if !self.enabled {
            return None;
        }
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let cached = entries.get(key)?.transcript.as_ref()?;
        self.is_fresh(cached, now).then(|| cached.value.clone())
    }

    fn course_at(&self, key: &str, now: DateTime<Utc>) -> Option<CourseData> {
        if !self.enabled {
            return None;
        }
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let cached = entries.get(key)?.course.as_ref()?;
        self.is_fresh(cached, now).then(|| cached.value.clone())
    }

    fn put_transcript_at(&self, key: &str, transcript: TranscriptData, now: DateTime<Utc>) {
        self.with_entry(key, now, |entry| {
            entry.transcript = Some(Cached {
                value: transcript,
                cached_at: now,
            });
        });
    }

    fn put_course_at(&self, key: &str, course: CourseData, now: DateTime<Utc>) {
        self.with_entry(key, now, |entry| {
            entry.course = Some(Cached {
                value: course,
                cached_at: now,
            });
        });
    }

    /// Insert or update the entry for `key`, evicting the oldest video when full.
    fn with_entry(&self, key: &str, now: DateTime<Utc>, update: impl FnOnce(&mut Entry)) {
        if !self.enabled {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if !entries.contains_key(key) && entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.created_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                debug!("Evicting cached results for {}", oldest);
                entries.remove(&oldest);
            }
        }

        let entry = entries.entry(key.to_string()).or_default();
        entry.created_at.get_or_insert(now);
        update(entry);
    }
}
