//! Sample deck used to bootstrap an empty store.

use tracing::info;

use crate::db::VocabularyStore;
use crate::error::Result;
use crate::models::NewEntry;

/// Words inserted by [`VocabularyStore::seed_samples`].
pub const SAMPLE_VOCABULARY: &[(&str, &str)] = &[
    ("Apple", "A round fruit with red, green, or yellow skin and crisp flesh."),
    ("Brilliant", "Exceptionally clever or talented; very bright."),
    ("Catalyst", "Something that precipitates an event or change."),
    ("Diligent", "Having or showing care in one's work; conscientious."),
    ("Eloquent", "Fluent or persuasive in speaking or writing."),
    ("Fortitude", "Courage in pain or adversity; mental strength."),
    ("Graceful", "Having or showing grace or elegance."),
    ("Harmony", "Agreement or concord; a pleasing arrangement of parts."),
    ("Illuminate", "To light up; to make clear or explain."),
    ("Jubilant", "Feeling or expressing great happiness and triumph."),
    ("Keen", "Having or showing eagerness or enthusiasm; sharp."),
    ("Luminous", "Full of or shedding light; bright or shining."),
    ("Magnificent", "Extremely beautiful, elaborate, or impressive."),
    ("Navigate", "To plan and direct the course of a journey."),
    ("Optimistic", "Hopeful and confident about the future."),
    ("Perseverance", "Steadfastness in doing something despite difficulty."),
    ("Quintessential", "Representing the most perfect example of a quality."),
    ("Resilient", "Able to withstand or recover quickly from difficulties."),
    ("Serendipity", "The occurrence of events by chance in a happy way."),
    ("Tenacious", "Tending to keep a firm hold; persistent."),
];

impl VocabularyStore {
    /// Insert every sample word that is not already present (by name), dated
    /// to the current month. Returns how many were added, so a second call on
    /// the same store adds nothing.
    pub fn seed_samples(&mut self) -> Result<usize> {
        let mut added = 0;
        for (name, meaning) in SAMPLE_VOCABULARY {
            if self.name_exists(name)? {
                continue;
            }
            self.create(&NewEntry::new(*name, *meaning))?;
            added += 1;
        }

        if added > 0 {
            info!(added, "seeded sample vocabulary");
        }
        Ok(added)
    }
}
