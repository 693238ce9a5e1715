use serde::{Deserialize, Serialize};

/// Button offered by a modal dialog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalAction {
    pub label: String,
    /// Identifier the caller dispatches on, e.g. `"confirm"`.
    pub action: String,
}

impl ModalAction {
    pub fn new(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self { label: label.into(), action: action.into() }
    }
}

/// Single modal dialog: open with content, close resets everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalState {
    is_open: bool,
    title: String,
    content: String,
    actions: Vec<ModalAction>,
}

impl ModalState {
    pub fn new() -> Self { Self::default() }

    pub fn open(&mut self, title: impl Into<String>, content: impl Into<String>, actions: Vec<ModalAction>) {
        self.title = title.into();
        self.content = content.into();
        self.actions = actions;
        self.is_open = true;
    }

    pub fn close(&mut self) { *self = Self::default(); }

    pub fn is_open(&self) -> bool { self.is_open }

    pub fn title(&self) -> &str { &self.title }

    pub fn content(&self) -> &str { &self.content }

    pub fn actions(&self) -> &[ModalAction] { &self.actions }
}
