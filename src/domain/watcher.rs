use serde::{Deserialize, Serialize};

use super::{Profile, UserId};

/// A subscriber to laundry-done notifications.
///
/// Created unresolved; `display_name` is filled in once the chat platform
/// has returned the user's profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watcher {
    pub id: UserId,
    pub display_name: Option<String>,
    pub resolved: bool,
}

impl Watcher {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            display_name: None,
            resolved: false,
        }
    }

    pub fn apply_profile(&mut self, profile: &Profile) {
        self.display_name = Some(profile.name.clone());
        self.resolved = true;
    }

    /// Name for replies; falls back to the id while unresolved.
    pub fn label(&self) -> String {
        match &self.display_name {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }
}

/// Render the watch list the way it is shown in chat.
pub fn render_watch_list(watchers: &[Watcher]) -> String {
    if watchers.is_empty() {
        return "No current users watching".to_string();
    }

    let mut out = String::from("Watch List:\n```properties\n");
    for w in watchers {
        let name = w.display_name.as_deref().unwrap_or("unknown");
        out.push_str(&format!("{} {}\n", name, w.id));
    }
    out.push_str("```");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_message() {
        assert_eq!(render_watch_list(&[]), "No current users watching");
    }

    #[test]
    fn list_keeps_order_and_marks_unresolved() {
        let mut a = Watcher::new(UserId::new(2));
        a.apply_profile(&Profile::new(UserId::new(2), "bob"));
        let b = Watcher::new(UserId::new(1));

        let text = render_watch_list(&[a, b]);
        assert_eq!(text, "Watch List:\n```properties\nbob 2\nunknown 1\n```");
    }
}
