//! In-process clipboard store and selection answering.
//!
//! The window system asks the selection owner to convert its content to a
//! requested target. Only UTF-8 text and the target enumeration itself are
//! served; anything else is refused.

/// Conversion targets a requestor can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionTarget {
    Utf8Text,
    /// "Which targets do you support?"
    TargetList,
    Other,
}

/// Answer to one selection request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionReply {
    Text(String),
    Targets(Vec<SelectionTarget>),
    Refused,
}

/// Owns the text placed on the clipboard by this process.
#[derive(Debug, Default)]
pub struct Clipboard {
    content: String,
}

impl Clipboard {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, text: &str) {
        self.content = text.to_owned();
    }

    pub fn respond(&self, target: SelectionTarget) -> SelectionReply {
        match target {
            SelectionTarget::Utf8Text => SelectionReply::Text(self.content.clone()),
            SelectionTarget::TargetList => {
                SelectionReply::Targets(vec![SelectionTarget::Utf8Text, SelectionTarget::TargetList])
            }
            SelectionTarget::Other => SelectionReply::Refused,
        }
    }
}
