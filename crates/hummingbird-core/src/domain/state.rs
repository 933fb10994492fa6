//! Observable listing state
//!
//! [`SyncPhase`] is the listing state machine; [`ListingSnapshot`] is the
//! full observable state a presentation layer renders.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::fetch_error::{FetchError, FetchErrorKind};
use super::sort::SortSpec;

/// Why a load ended in [`SyncPhase::Failed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    InvalidRequest,
    ServerError(u16),
    Decode,
    Unauthorized,
}

impl FailureReason {
    /// Maps a classified fetch error onto a failure reason
    ///
    /// Returns `None` for network-unreachable, which is never a failure:
    /// it always degrades to fallback data.
    pub fn from_fetch_error(err: &FetchError) -> Option<Self> {
        match err.kind() {
            FetchErrorKind::InvalidRequest => Some(Self::InvalidRequest),
            FetchErrorKind::Decode => Some(Self::Decode),
            FetchErrorKind::Server => Some(Self::ServerError(err.status_code().unwrap_or(0))),
            FetchErrorKind::Unauthorized => Some(Self::Unauthorized),
            FetchErrorKind::NetworkUnreachable => None,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::InvalidRequest => write!(f, "invalid-request"),
            FailureReason::ServerError(code) => write!(f, "server-error({code})"),
            FailureReason::Decode => write!(f, "decode-error"),
            FailureReason::Unauthorized => write!(f, "unauthorized"),
        }
    }
}

/// Listing state machine
///
/// ```text
/// Idle ──load──▶ LoadingInitial ──ok──▶ Ready ──load_more──▶ LoadingMore
///                    │   ▲                ▲                      │
///                    │   └──refresh/search/sort──┐               │
///                    ├──offline──▶ Offline ───────┤◀──────────────┤
///                    └──error───▶ Failed ─────────┘◀──────────────┘
/// ```
///
/// `Offline` is a flavor of `Ready` whose records came from the cache or the
/// seeded dataset; `Failed` still carries fallback records when any exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    #[default]
    Idle,
    LoadingInitial,
    LoadingMore,
    Ready,
    Offline,
    Failed(FailureReason),
}

impl SyncPhase {
    /// Returns true while a fetch is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, SyncPhase::LoadingInitial | SyncPhase::LoadingMore)
    }

    /// Returns true if the visible list is settled and renderable
    pub fn is_ready(&self) -> bool {
        matches!(self, SyncPhase::Ready | SyncPhase::Offline)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SyncPhase::Failed(_))
    }

    /// Checks if a state transition is valid
    ///
    /// Valid transitions:
    /// - any -> Idle (reset)
    /// - Idle -> LoadingInitial
    /// - LoadingInitial/LoadingMore -> Ready, Offline, Failed
    /// - LoadingInitial/LoadingMore -> LoadingInitial (superseded by a newer request)
    /// - Ready/Offline/Failed -> LoadingInitial
    /// - Ready -> LoadingMore
    /// - Ready/Offline/Failed -> Ready, Offline (in-memory re-query)
    pub fn can_transition_to(&self, target: &SyncPhase) -> bool {
        use SyncPhase::*;

        if matches!(target, Idle) {
            return true;
        }

        match (self, target) {
            (Idle, LoadingInitial) => true,
            (LoadingInitial | LoadingMore, Ready | Offline | Failed(_)) => true,
            (LoadingInitial | LoadingMore, LoadingInitial) => true,
            (Ready | Offline | Failed(_), LoadingInitial) => true,
            (Ready, LoadingMore) => true,
            (Ready | Offline | Failed(_), Ready | Offline) => true,
            _ => false,
        }
    }

    /// Attempts to transition to a new state
    ///
    /// # Errors
    /// Returns `DomainError::InvalidState` if the transition is not allowed.
    pub fn transition_to(&mut self, target: SyncPhase) -> Result<(), DomainError> {
        if !self.can_transition_to(&target) {
            return Err(DomainError::InvalidState {
                from: self.to_string(),
                to: target.to_string(),
            });
        }
        *self = target;
        Ok(())
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPhase::Idle => write!(f, "idle"),
            SyncPhase::LoadingInitial => write!(f, "loading_initial"),
            SyncPhase::LoadingMore => write!(f, "loading_more"),
            SyncPhase::Ready => write!(f, "ready"),
            SyncPhase::Offline => write!(f, "offline"),
            SyncPhase::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Where the visible records came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Nothing visible yet
    #[default]
    None,
    /// Fetched from the remote data source
    Network,
    /// Served from the session cache
    Cache,
    /// The built-in seeded dataset
    Seed,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::None => write!(f, "none"),
            Provenance::Network => write!(f, "network"),
            Provenance::Cache => write!(f, "cache"),
            Provenance::Seed => write!(f, "seed"),
        }
    }
}

/// Connectivity as last observed
///
/// `Unknown` only appears before the first observation arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkStatus {
    #[default]
    Unknown,
    Connected,
    Disconnected,
}

impl NetworkStatus {
    pub fn is_disconnected(&self) -> bool {
        matches!(self, NetworkStatus::Disconnected)
    }
}

impl fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkStatus::Unknown => write!(f, "unknown"),
            NetworkStatus::Connected => write!(f, "connected"),
            NetworkStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Result of the most recent authenticated exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    #[default]
    Unknown,
    Authenticated,
    Unauthenticated,
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthStatus::Authenticated)
    }
}

/// Everything a presentation layer needs to render a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingSnapshot<R> {
    /// The visible list, in display order
    pub records: Vec<R>,
    pub phase: SyncPhase,
    /// Active name filter (empty when none)
    pub query: String,
    pub sort: SortSpec,
    /// Last page appended to the visible list (0 before the first load)
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub has_more: bool,
    pub provenance: Provenance,
    /// True when records were substituted from cache/seed after a failure
    /// or while offline
    pub is_fallback_data: bool,
    /// Blocking, user-visible error
    pub error_message: Option<String>,
    /// Informational, non-blocking message
    pub notice: Option<String>,
    pub network: NetworkStatus,
    pub auth: AuthStatus,
    /// Manual override forcing the offline path
    pub offline_mode: bool,
    /// Set after an unauthorized failure; writes should not trust this session
    pub reduced_trust: bool,
}

impl<R> ListingSnapshot<R> {
    pub fn new(sort: SortSpec) -> Self {
        Self {
            records: Vec::new(),
            phase: SyncPhase::Idle,
            query: String::new(),
            sort,
            current_page: 0,
            total_pages: 0,
            total_items: 0,
            has_more: false,
            provenance: Provenance::None,
            is_fallback_data: false,
            error_message: None,
            notice: None,
            network: NetworkStatus::Unknown,
            auth: AuthStatus::Unknown,
            offline_mode: false,
            reduced_trust: false,
        }
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R> Default for ListingSnapshot<R> {
    fn default() -> Self {
        Self::new(SortSpec::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_only_goes_to_loading_initial() {
        let idle = SyncPhase::Idle;
        assert!(idle.can_transition_to(&SyncPhase::LoadingInitial));
        assert!(!idle.can_transition_to(&SyncPhase::LoadingMore));
        assert!(!idle.can_transition_to(&SyncPhase::Ready));
    }

    #[test]
    fn test_loading_resolves_to_terminal_states() {
        for from in [SyncPhase::LoadingInitial, SyncPhase::LoadingMore] {
            assert!(from.can_transition_to(&SyncPhase::Ready));
            assert!(from.can_transition_to(&SyncPhase::Offline));
            assert!(from.can_transition_to(&SyncPhase::Failed(FailureReason::Decode)));
        }
    }

    #[test]
    fn test_settled_states_reload() {
        for from in [
            SyncPhase::Ready,
            SyncPhase::Offline,
            SyncPhase::Failed(FailureReason::ServerError(500)),
        ] {
            assert!(from.can_transition_to(&SyncPhase::LoadingInitial));
        }
    }

    #[test]
    fn test_only_ready_loads_more() {
        assert!(SyncPhase::Ready.can_transition_to(&SyncPhase::LoadingMore));
        assert!(!SyncPhase::Offline.can_transition_to(&SyncPhase::LoadingMore));
        assert!(!SyncPhase::Failed(FailureReason::Decode).can_transition_to(&SyncPhase::LoadingMore));
        assert!(!SyncPhase::LoadingMore.can_transition_to(&SyncPhase::LoadingMore));
    }

    #[test]
    fn test_reset_always_allowed() {
        assert!(SyncPhase::LoadingMore.can_transition_to(&SyncPhase::Idle));
        assert!(SyncPhase::Failed(FailureReason::Unauthorized).can_transition_to(&SyncPhase::Idle));
    }

    #[test]
    fn test_transition_to_rejects_invalid() {
        let mut phase = SyncPhase::Idle;
        let err = phase.transition_to(SyncPhase::LoadingMore).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidState {
                from: "idle".to_string(),
                to: "loading_more".to_string(),
            }
        );
        assert_eq!(phase, SyncPhase::Idle);

        phase.transition_to(SyncPhase::LoadingInitial).unwrap();
        assert!(phase.is_loading());
    }

    #[test]
    fn test_offline_is_a_ready_flavor() {
        assert!(SyncPhase::Offline.is_ready());
        assert!(SyncPhase::Ready.is_ready());
        assert!(!SyncPhase::Failed(FailureReason::Decode).is_ready());
    }

    #[test]
    fn test_failure_reason_from_fetch_error() {
        assert_eq!(
            FailureReason::from_fetch_error(&FetchError::server(500, "x")),
            Some(FailureReason::ServerError(500))
        );
        assert_eq!(
            FailureReason::from_fetch_error(&FetchError::NetworkUnreachable("x".into())),
            None
        );
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(
            SyncPhase::Failed(FailureReason::ServerError(502)).to_string(),
            "failed: server-error(502)"
        );
    }

    #[test]
    fn test_snapshot_defaults() {
        let snap: ListingSnapshot<u8> = ListingSnapshot::default();
        assert_eq!(snap.phase, SyncPhase::Idle);
        assert_eq!(snap.sort, SortSpec::default());
        assert!(snap.is_empty());
        assert!(!snap.is_fallback_data);
        assert_eq!(snap.network, NetworkStatus::Unknown);
    }
}
