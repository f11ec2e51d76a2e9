//! Helpers for reading resolved slash command options.

use serenity::all::{ResolvedOption, ResolvedValue};

/// The invoked subcommand and its options.
pub fn subcommand<'o, 'a>(
    options: &'o [ResolvedOption<'a>],
) -> Option<(&'a str, &'o [ResolvedOption<'a>])> {
    options.iter().find_map(|option| match &option.value {
        ResolvedValue::SubCommand(sub) => Some((option.name, sub.as_slice())),
        _ => None,
    })
}

pub fn string<'a>(options: &[ResolvedOption<'a>], name: &str) -> Option<&'a str> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::String(value) if option.name == name => Some(value),
        _ => None,
    })
}

pub fn boolean(options: &[ResolvedOption<'_>], name: &str) -> Option<bool> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::Boolean(value) if option.name == name => Some(value),
        _ => None,
    })
}

pub fn user(options: &[ResolvedOption<'_>], name: &str) -> Option<u64> {
    options.iter().find_map(|option| match &option.value {
        ResolvedValue::User(user, _) if option.name == name => Some(user.id.get()),
        _ => None,
    })
}

/// Non-blank string option, trimmed.
pub fn text(options: &[ResolvedOption<'_>], name: &str) -> Option<String> {
    string(options, name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
