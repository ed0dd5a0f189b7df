//! server-status parsing
//!
//! `server-status?auto` answers with one `Field Name: value` pair per line. The
//! `Scoreboard` field is special: each character is the state of one worker slot.
//!
//! ```text
//! Total Accesses: 42
//! BusyWorkers: 1
//! Scoreboard: _W_K....
//! ```

use crate::error::{ExporterError, Result};

/// Field holding the worker scoreboard
pub const SCOREBOARD_FIELD: &str = "Scoreboard";

/// Split `Field Name: value` on the first colon
///
/// Returns `None` for lines without a colon; callers skip those.
pub fn parse_status_line(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    Some((name, value.trim_start().trim_end_matches('\r')))
}

/// Metric key for a plain status field: spaces to underscores, lowercase
pub fn normalize_field_name(name: &str) -> String {
    name.replace(' ', "_").to_lowercase()
}

/// Worker slot state, as encoded in the scoreboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    WaitingForConnection,
    StartingUp,
    ReadingRequest,
    SendingReply,
    KeepaliveRead,
    DnsLookup,
    ClosingConnection,
    Logging,
    GracefullyFinishing,
    IdleCleanup,
    NoCurrentProcess,
}

impl WorkerState {
    /// Every state, in reporting order
    pub const ALL: [WorkerState; 11] = [
        Self::WaitingForConnection,
        Self::StartingUp,
        Self::ReadingRequest,
        Self::SendingReply,
        Self::KeepaliveRead,
        Self::DnsLookup,
        Self::ClosingConnection,
        Self::Logging,
        Self::GracefullyFinishing,
        Self::IdleCleanup,
        Self::NoCurrentProcess,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '_' => Self::WaitingForConnection,
            'S' => Self::StartingUp,
            'R' => Self::ReadingRequest,
            'W' => Self::SendingReply,
            'K' => Self::KeepaliveRead,
            'D' => Self::DnsLookup,
            'C' => Self::ClosingConnection,
            'L' => Self::Logging,
            'G' => Self::GracefullyFinishing,
            'I' => Self::IdleCleanup,
            '.' => Self::NoCurrentProcess,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Self::WaitingForConnection => '_',
            Self::StartingUp => 'S',
            Self::ReadingRequest => 'R',
            Self::SendingReply => 'W',
            Self::KeepaliveRead => 'K',
            Self::DnsLookup => 'D',
            Self::ClosingConnection => 'C',
            Self::Logging => 'L',
            Self::GracefullyFinishing => 'G',
            Self::IdleCleanup => 'I',
            Self::NoCurrentProcess => '.',
        }
    }

    /// Name used in the `scoreboard,<name>` metric key
    pub fn name(self) -> &'static str {
        match self {
            Self::WaitingForConnection => "waiting_for_connection",
            Self::StartingUp => "starting_up",
            Self::ReadingRequest => "reading_request",
            Self::SendingReply => "sending_reply",
            Self::KeepaliveRead => "keepalive_read",
            Self::DnsLookup => "DNS_lookup",
            Self::ClosingConnection => "closing_connection",
            Self::Logging => "logging",
            Self::GracefullyFinishing => "gracefully_finishing",
            Self::IdleCleanup => "idle_cleanup",
            Self::NoCurrentProcess => "no_current_process",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Worker counts per state, all eleven always present
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    counts: [u64; 11],
}

impl Scoreboard {
    /// Count the states in a raw scoreboard string
    ///
    /// # Errors
    ///
    /// Returns `ExporterError::CorruptScoreboard` on the first character that is
    /// not a known state.
    pub fn tally(raw: &str) -> Result<Self> {
        let mut counts = [0u64; 11];
        for (position, character) in raw.chars().enumerate() {
            let state = WorkerState::from_char(character).ok_or(
                ExporterError::CorruptScoreboard {
                    character,
                    position,
                },
            )?;
            counts[state.index()] += 1;
        }
        Ok(Self { counts })
    }

    pub fn count(&self, state: WorkerState) -> u64 {
        self.counts[state.index()]
    }

    /// Number of worker slots, i.e. the length of the raw scoreboard
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (WorkerState, u64)> + '_ {
        WorkerState::ALL
            .into_iter()
            .map(move |state| (state, self.count(state)))
    }
}

/// A fully parsed server-status page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusPage {
    /// Plain fields as `(normalized key, raw value)`, first-seen order, unique keys
    pub fields: Vec<(String, String)>,
    pub scoreboard: Option<Scoreboard>,
}

impl StatusPage {
    /// Parse every line of a status page
    ///
    /// Lines without a colon are skipped. A repeated field keeps its last value.
    ///
    /// # Errors
    ///
    /// Returns `ExporterError::CorruptScoreboard` if the scoreboard holds an
    /// unknown state; nothing from the page is usable in that case.
    pub fn parse<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut page = StatusPage::default();

        for line in lines {
            let Some((name, value)) = parse_status_line(line.as_ref()) else {
                continue;
            };

            if name == SCOREBOARD_FIELD {
                page.scoreboard = Some(Scoreboard::tally(value)?);
                continue;
            }

            let key = normalize_field_name(name);
            match page.fields.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value.to_string(),
                None => page.fields.push((key, value.to_string())),
            }
        }

        Ok(page)
    }
}
