use crate::application::usecases::Command;

/// Parse a chat message into a command, `None` if it isn't one of ours.
pub fn parse_command(prefix: &str, content: &str) -> Option<Command> {
    let body = content.trim_start().strip_prefix(prefix)?;
    let name = body.split_whitespace().next()?;
    // name is the first token, so `body` starts with it
    let rest = body.trim_start()[name.len()..].trim();
    let args: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
    let text = (!rest.is_empty()).then(|| rest.to_string());

    let command = match name {
        "watch" | "add" | "subscribe" => Command::Watch(args),
        "stop" | "remove" | "unsubscribe" | "unwatch" => Command::Stop(args),
        "watchlist" | "watchers" | "list" | "users" => Command::WatchList,
        "broadcast" | "dm" => Command::Broadcast(text),
        "id" | "get-id" | "user-id" | "uid" => Command::Id(args.into_iter().next()),
        _ => {
            tracing::debug!(command = name, "ignoring unknown command");
            return None;
        }
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn aliases_map_to_commands() {
        assert_eq!(parse_command("!", "!subscribe 1 2"), Some(Command::Watch(s(&["1", "2"]))));
        assert_eq!(parse_command("!", "!unwatch"), Some(Command::Stop(vec![])));
        assert_eq!(parse_command("!", "!users"), Some(Command::WatchList));
        assert_eq!(parse_command("!", "!uid"), Some(Command::Id(None)));
        assert_eq!(
            parse_command("!", "!get-id alice"),
            Some(Command::Id(Some("alice".into())))
        );
    }

    #[test]
    fn broadcast_keeps_the_whole_message() {
        assert_eq!(
            parse_command("!", "!dm  the  dryer is free "),
            Some(Command::Broadcast(Some("the  dryer is free".into())))
        );
        assert_eq!(parse_command("!", "!broadcast"), Some(Command::Broadcast(None)));
    }

    #[test]
    fn ignores_other_messages() {
        assert_eq!(parse_command("!", "watch"), None);
        assert_eq!(parse_command("!", "!"), None);
        assert_eq!(parse_command("!", "!dance"), None);
        assert_eq!(parse_command("$$", "!watch"), None);
        assert_eq!(parse_command("$$", "$$watch 5"), Some(Command::Watch(s(&["5"]))));
    }
}
