//! Per-entry processing state, advanced by pure transitions.
//!
//! The orchestrator performs the I/O and reduces what it observed to an
//! `EntryEvent`; advancing the state is pure, so the skip/retry logic is
//! testable with no network or disk access.

/// Why an entry was given up on for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonReason {
    /// No download URL could be obtained, even after the single
    /// re-authentication.
    UrlResolution,
    /// A transfer failed mid-download; any partial file stays on disk for
    /// the next run's checksum pass to catch.
    Download,
    /// A freshly downloaded archive failed digest verification.
    IntegrityMismatch,
    /// Unpacking failed; the archive is kept on disk for inspection.
    Extraction,
    /// A local I/O failure (hashing, deletion) halted the entry.
    Filesystem,
}

/// Processing state of one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// The on-disk file, if any, has not been examined yet.
    NeedsCheck,
    /// No usable local file; a download is required.
    NeedsDownload,
    /// A download finished and awaits verification.
    Downloaded,
    /// The local file is verified and ready to unpack.
    NeedsExtract,
    /// Extracted (and cleaned up when configured).
    Done,
    Abandoned(AbandonReason),
}

/// An observed fact that drives one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryEvent {
    /// No file exists at the destination path.
    MissingOnDisk,
    /// An existing file's digest matches the catalog.
    VerifiedOnDisk,
    /// An existing file's digest mismatched and the file was deleted.
    CorruptOnDisk,
    /// No URL was obtained, even after the single re-authentication.
    UrlUnavailable,
    DownloadFinished,
    DownloadFailed,
    VerifiedAfterDownload,
    CorruptAfterDownload,
    Extracted,
    ExtractionFailed,
    /// A local I/O operation failed.
    FilesystemFailed,
}

impl EntryState {
    /// Advance by one observed event.
    ///
    /// Terminal states absorb every event; an event that does not apply to
    /// the current state leaves it unchanged.
    pub fn advance(self, event: EntryEvent) -> EntryState {
        use EntryEvent::*;
        use EntryState::*;

        match (self, event) {
            (Done, _) | (Abandoned(_), _) => self,
            (_, FilesystemFailed) => Abandoned(AbandonReason::Filesystem),

            (NeedsCheck, MissingOnDisk) => NeedsDownload,
            (NeedsCheck, VerifiedOnDisk) => NeedsExtract,
            (NeedsCheck, CorruptOnDisk) => NeedsDownload,

            (NeedsDownload, UrlUnavailable) => Abandoned(AbandonReason::UrlResolution),
            (NeedsDownload, DownloadFinished) => Downloaded,
            (NeedsDownload, DownloadFailed) => Abandoned(AbandonReason::Download),

            (Downloaded, VerifiedAfterDownload) => NeedsExtract,
            (Downloaded, CorruptAfterDownload) => Abandoned(AbandonReason::IntegrityMismatch),

            (NeedsExtract, Extracted) => Done,
            (NeedsExtract, ExtractionFailed) => Abandoned(AbandonReason::Extraction),

            (state, _) => state,
        }
    }

    /// Terminal states end the entry's processing.
    pub fn is_terminal(self) -> bool {
        matches!(self, EntryState::Done | EntryState::Abandoned(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AbandonReason::*;
    use EntryEvent::*;
    use EntryState::*;

    #[test]
    fn fresh_download_happy_path() {
        let state = NeedsCheck
            .advance(MissingOnDisk)
            .advance(DownloadFinished)
            .advance(VerifiedAfterDownload)
            .advance(Extracted);
        assert_eq!(state, Done);
    }

    #[test]
    fn verified_existing_file_skips_download() {
        let state = NeedsCheck.advance(VerifiedOnDisk);
        assert_eq!(state, NeedsExtract);
    }

    #[test]
    fn corrupt_existing_file_goes_back_through_download() {
        let state = NeedsCheck.advance(CorruptOnDisk);
        assert_eq!(state, NeedsDownload);
    }

    #[test]
    fn url_resolution_failure_abandons() {
        let state = NeedsCheck.advance(MissingOnDisk).advance(UrlUnavailable);
        assert_eq!(state, Abandoned(UrlResolution));
    }

    #[test]
    fn post_download_mismatch_abandons_without_retry() {
        let state = NeedsCheck
            .advance(MissingOnDisk)
            .advance(DownloadFinished)
            .advance(CorruptAfterDownload);
        assert_eq!(state, Abandoned(IntegrityMismatch));
    }

    #[test]
    fn extraction_failure_abandons() {
        let state = NeedsExtract.advance(ExtractionFailed);
        assert_eq!(state, Abandoned(Extraction));
    }

    #[test]
    fn filesystem_failure_abandons_from_any_live_state() {
        for state in [NeedsCheck, NeedsDownload, Downloaded, NeedsExtract] {
            assert_eq!(state.advance(FilesystemFailed), Abandoned(Filesystem));
        }
    }

    #[test]
    fn terminal_states_absorb_all_events() {
        let events = [
            MissingOnDisk,
            VerifiedOnDisk,
            CorruptOnDisk,
            UrlUnavailable,
            DownloadFinished,
            DownloadFailed,
            VerifiedAfterDownload,
            CorruptAfterDownload,
            Extracted,
            ExtractionFailed,
            FilesystemFailed,
        ];
        for event in events {
            assert_eq!(Done.advance(event), Done);
            assert_eq!(
                Abandoned(UrlResolution).advance(event),
                Abandoned(UrlResolution)
            );
        }
    }

    #[test]
    fn inapplicable_events_leave_state_unchanged() {
        assert_eq!(NeedsCheck.advance(Extracted), NeedsCheck);
        assert_eq!(NeedsDownload.advance(VerifiedOnDisk), NeedsDownload);
        assert_eq!(Downloaded.advance(MissingOnDisk), Downloaded);
        assert_eq!(NeedsExtract.advance(DownloadFinished), NeedsExtract);
    }

    #[test]
    fn terminality() {
        assert!(Done.is_terminal());
        assert!(Abandoned(Download).is_terminal());
        assert!(!NeedsCheck.is_terminal());
        assert!(!NeedsDownload.is_terminal());
        assert!(!Downloaded.is_terminal());
        assert!(!NeedsExtract.is_terminal());
    }
}
