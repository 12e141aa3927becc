//! Channel identifier extraction.
//!
//! Turns a snapshot into a deduplicated, first-seen-ordered list of channel
//! ids. Records without a usable id are skipped and reported as warnings;
//! they never fail the extraction.

use crate::domain::{ChannelIdList, ExtractionReport, ExtractionWarning, Reporter, Snapshot};

#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelIdExtractor;

impl ChannelIdExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Extract identifiers from `snapshot`. Pure with respect to its input,
    /// so repeated calls give the same report.
    pub fn extract(&self, snapshot: &Snapshot, reporter: &dyn Reporter) -> ExtractionReport {
        let mut channel_ids = ChannelIdList::new();
        let mut warnings = Vec::new();

        for (index, record) in snapshot.records.iter().enumerate() {
            match record.channel_id.as_deref() {
                Some(id) => {
                    channel_ids.insert(id);
                }
                None => {
                    let warning = ExtractionWarning::MissingChannelId {
                        index,
                        item_id: record.id.clone(),
                    };
                    reporter.record_skipped(&warning);
                    warnings.push(warning);
                }
            }
        }

        reporter.extraction_finished(channel_ids.len(), warnings.len());

        ExtractionReport {
            channel_ids,
            warnings,
            total_records: snapshot.len(),
        }
    }
}
