/// Prefix that switches the query field into command mode.
pub const COMMAND_PREFIX: char = '!';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    ShowCalendar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub action: CommandAction,
}

pub fn built_in_commands() -> &'static [Command] {
    &[Command {
        name: "calendar",
        description: "Opens a calendar",
        action: CommandAction::ShowCalendar,
    }]
}

pub fn is_command(query: &str) -> bool {
    query.starts_with(COMMAND_PREFIX)
}

/// Text after the prefix, trimmed and lowercased.
pub fn command_name(query: &str) -> String {
    query
        .strip_prefix(COMMAND_PREFIX)
        .unwrap_or(query)
        .trim()
        .to_lowercase()
}

pub fn find_command<'a>(query: &str, commands: &'a [Command]) -> Option<&'a Command> {
    if !is_command(query) {
        return None;
    }
    let name = command_name(query);
    commands.iter().find(|command| command.name == name)
}

/// Commands whose name starts with or contains the partial name; all of them
/// for a bare prefix.
pub fn find_matching_commands<'a>(query: &str, commands: &'a [Command]) -> Vec<&'a Command> {
    if !is_command(query) {
        return Vec::new();
    }

    let partial = command_name(query);
    if partial.is_empty() {
        return commands.iter().collect();
    }

    commands
        .iter()
        .filter(|command| {
            let name = command.name.to_lowercase();
            name.starts_with(&partial) || name.contains(&partial)
        })
        .collect()
}
