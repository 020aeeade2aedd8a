use crate::core::MemberSource;
use crate::domain::model::{Person, Roster};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub fetched: usize,
    pub added: usize,
    pub skipped: usize,
}

/// Fetches remote members and merges them into a roster with zero hours.
pub struct SyncEngine<F: MemberSource> {
    source: F,
}

impl<F: MemberSource> SyncEngine<F> {
    pub fn new(source: F) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &F {
        &self.source
    }

    /// Records with unusable names are dropped; the second value counts them.
    pub async fn fetch_people(&self) -> Result<(Vec<Person>, usize)> {
        let records = self.source.fetch_members().await?;
        tracing::debug!("Fetched {} member records", records.len());

        let mut people = Vec::with_capacity(records.len());
        let mut skipped = 0;
        for record in records {
            match record.into_person() {
                Ok(person) => people.push(person),
                Err(e) => {
                    tracing::warn!("Ignoring remote member: {}", e);
                    skipped += 1;
                }
            }
        }
        Ok((people, skipped))
    }

    pub async fn sync(&self, roster: &mut Roster) -> Result<SyncReport> {
        let (people, skipped) = self.fetch_people().await?;
        let fetched = people.len() + skipped;
        let added = roster.merge(people);

        tracing::info!(
            "Synced '{}': {} fetched, {} added, {} skipped",
            roster.name(),
            fetched,
            added,
            skipped
        );

        Ok(SyncReport {
            fetched,
            added,
            skipped,
        })
    }
}
