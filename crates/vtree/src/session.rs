//! Render Session - incremental rendering across tree generations

use vtree_dom::{Change, ChangeNotifier, DomTree, NodeId, reconcile};
use vtree_html::RenderResult;

use crate::Config;

/// Output of one render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Full HTML of the current tree
    pub html: String,
    /// JSON array of changes against the previous frame
    pub diff: String,
    /// Number of entries in `diff`
    pub changes: usize,
}

/// Keeps the previously rendered tree and diffs each new one against it
#[derive(Debug)]
pub struct RenderSession {
    config: Config,
    previous: Option<(DomTree, NodeId)>,
    frames: u64,
}

impl RenderSession {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            previous: None,
            frames: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Tree and root of the last rendered frame
    pub fn previous(&self) -> Option<(&DomTree, NodeId)> {
        self.previous.as_ref().map(|(tree, root)| (tree, *root))
    }

    /// Number of frames rendered so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Render `tree`, reconciling it against the previous frame first.
    ///
    /// The first frame reports `root` as added. Unchanged nodes keep the
    /// transient ids of the previous frame, so the HTML is rendered after
    /// reconciliation.
    pub fn render(&mut self, mut tree: DomTree, root: NodeId) -> RenderResult<Frame> {
        let mut writer = self.config.diff_writer();
        match self.previous.as_mut() {
            Some((old, old_root)) => {
                reconcile(&mut tree, root, old, *old_root, &mut writer);
            }
            None => writer.notify(Change::Added, &tree, root),
        }

        let changes = writer.len();
        let diff = writer.into_json()?;
        let html = self.config.html_serializer().render(&tree, root);

        self.frames += 1;
        tracing::debug!(frame = self.frames, changes, "rendered frame");
        self.previous = Some((tree, root));

        Ok(Frame {
            html,
            diff,
            changes,
        })
    }

    /// Forget the previous frame; the next render reports its root as added
    pub fn reset(&mut self) {
        self.previous = None;
    }
}
