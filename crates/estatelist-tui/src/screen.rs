//! Screen trait — the building block for every routed view.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use tokio::sync::mpsc::UnboundedSender;

use estatelist_core::Route;

use crate::action::Action;

/// Every routed view implements Screen.
///
/// Lifecycle: `init` → (`on_enter` | `handle_key_event` | `update` | `render`)*
pub trait Screen: Send {
    /// Called once when the app starts.
    /// Receives the action sender for dispatching actions to the app loop.
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    /// Called every time navigation lands on this view, with the full
    /// route (including the listing parameter, when present).
    fn on_enter(&mut self, _route: &Route) {}

    /// Handle a keyboard event. Return an Action to dispatch, or None.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Process a dispatched action. May return a follow-up action.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Render into the provided frame area.
    fn render(&self, frame: &mut Frame, area: Rect);

    /// Whether the view currently owns plain-character input (a text
    /// field is focused). Global single-letter shortcuts are disabled
    /// while this is true.
    fn wants_text_input(&self) -> bool {
        false
    }

    /// Set focus state.
    fn set_focused(&mut self, _focused: bool) {}
}
