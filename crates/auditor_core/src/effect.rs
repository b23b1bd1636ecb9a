#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start an audit for the normalized target.
    StartAudit {
        url: String,
        lang: String,
        competitor_url: Option<String>,
    },
    /// Record a completed audit in the persisted history.
    AppendHistory {
        url: String,
        global_score: Option<u8>,
    },
}
