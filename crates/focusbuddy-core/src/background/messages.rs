use serde::{Deserialize, Serialize};

/// Foreground → background messages, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    StartSession,
    EndSession,
    GetSessionStatus,
    /// Echoed back unchanged.
    GetTimerState {
        timer: u64,
        #[serde(rename = "isFocus")]
        is_focus: bool,
    },
    UpdateBlockedSites {
        sites: Vec<String>,
    },
}

/// Replies for the requests that have one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    SessionStatus {
        active: bool,
    },
    TimerState {
        timer: u64,
        #[serde(rename = "isFocus")]
        is_focus: bool,
    },
}
