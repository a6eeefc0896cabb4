//! Keyboard shortcut mapping.
//!
//! Keys arrive as DOM `KeyboardEvent.key` strings; this module only decides
//! which action a key means, [`MindMapState`](super::state::MindMapState)
//! performs it.

/// An action triggered from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
	AddMainNode,
	AddChild,
	DeleteSelected,
	OpenSearch,
	NextResult,
	PreviousResult,
	ZoomIn,
	ZoomOut,
	ResetView,
	Escape,
}

/// Modifier keys held with a key press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
	pub ctrl: bool,
	pub shift: bool,
	pub alt: bool,
}

impl Shortcut {
	/// Maps a key press to a shortcut. `typing` is true while a text field has
	/// focus, in which case only navigation keys are handled.
	pub fn from_key(key: &str, mods: Modifiers, typing: bool) -> Option<Shortcut> {
		if mods.alt {
			return None;
		}
		match key {
			"Enter" if mods.shift => return Some(Shortcut::PreviousResult),
			"Enter" => return Some(Shortcut::NextResult),
			"Escape" => return Some(Shortcut::Escape),
			_ => {}
		}
		if typing {
			return None;
		}
		if mods.ctrl {
			return match key {
				"k" | "K" => Some(Shortcut::OpenSearch),
				"0" => Some(Shortcut::ResetView),
				_ => None,
			};
		}
		match key {
			"n" | "N" => Some(Shortcut::AddMainNode),
			"c" | "C" | "Tab" => Some(Shortcut::AddChild),
			"Delete" | "Backspace" => Some(Shortcut::DeleteSelected),
			"/" => Some(Shortcut::OpenSearch),
			"+" | "=" => Some(Shortcut::ZoomIn),
			"-" | "_" => Some(Shortcut::ZoomOut),
			_ => None,
		}
	}
}
