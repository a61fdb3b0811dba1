use crate::webhook::EventLog;
use frame_manifest::FrameManifest;

#[derive(Debug)]
pub(crate) struct ServerState {
    /// Served verbatim on every manifest request.
    pub(crate) manifest: FrameManifest,
    pub(crate) events: EventLog,
}

impl ServerState {
    pub(crate) fn new(manifest: FrameManifest) -> Self {
        Self { manifest, events: EventLog::default() }
    }
}
