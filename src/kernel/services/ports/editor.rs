/// Text editor the workspace pushes opened documents into.
///
/// The editor reports edits back through `Workspace::content_changed`.
pub trait EditorSurface {
    fn set_document(&mut self, text: &str);
}
