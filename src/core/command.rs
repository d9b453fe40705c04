//! Classification of committed command lines.
//!
//! Slash commands are looked up by exact name in a static table, so adding a
//! command never changes how existing lines are classified. Anything that is
//! not a known slash command is a chat turn.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Chat { text: String },
    Image { prompt: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Chat,
    Image,
}

type CommandBuilder = fn(&str) -> Command;

pub struct SlashCommand {
    pub name: &'static str,
    pub help: &'static str,
    build: CommandBuilder,
}

const SLASH_COMMANDS: &[SlashCommand] = &[SlashCommand {
    name: "image",
    help: "Generate an image from a text prompt.",
    build: build_image,
}];

fn build_image(args: &str) -> Command {
    Command::Image {
        prompt: args.trim().to_string(),
    }
}

pub fn slash_commands() -> &'static [SlashCommand] {
    SLASH_COMMANDS
}

impl Command {
    /// Classify an already-trimmed command line.
    ///
    /// A slash command needs its name followed by a literal space, so
    /// `/image a red cube` is an image request while `/image` alone or
    /// `/imagery` stays a chat turn.
    pub fn parse(line: &str) -> Command {
        line.strip_prefix('/')
            .and_then(|rest| rest.split_once(' '))
            .and_then(|(name, args)| {
                SLASH_COMMANDS
                    .iter()
                    .find(|command| command.name == name)
                    .map(|command| (command.build)(args))
            })
            .unwrap_or_else(|| Command::Chat {
                text: line.to_string(),
            })
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Chat { .. } => CommandKind::Chat,
            Command::Image { .. } => CommandKind::Image,
        }
    }
}

impl CommandKind {
    /// Transient text shown while the request is outstanding.
    pub fn placeholder(self) -> &'static str {
        match self {
            CommandKind::Chat => "[Thinking...]\n",
            CommandKind::Image => "[Generating image...]\n",
        }
    }

    pub fn error_prefix(self) -> &'static str {
        match self {
            CommandKind::Chat => "Error",
            CommandKind::Image => "Error generating image",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_prefix_yields_image_command() {
        assert_eq!(
            Command::parse("/image a red cube"),
            Command::Image {
                prompt: "a red cube".to_string()
            }
        );
    }

    #[test]
    fn image_prompt_is_trimmed() {
        assert_eq!(
            Command::parse("/image    sunset over water  "),
            Command::Image {
                prompt: "sunset over water".to_string()
            }
        );
    }

    #[test]
    fn near_misses_are_chat() {
        for line in ["/image", "/imagery of cats", "/IMAGE cat", "image cat", "/unknown x"] {
            assert_eq!(
                Command::parse(line),
                Command::Chat {
                    text: line.to_string()
                },
                "line {line:?}"
            );
        }
    }

    #[test]
    fn plain_text_is_chat() {
        let command = Command::parse("hello");
        assert_eq!(command.kind(), CommandKind::Chat);
    }

    #[test]
    fn placeholders_end_with_newline() {
        assert_eq!(CommandKind::Chat.placeholder(), "[Thinking...]\n");
        assert_eq!(CommandKind::Image.placeholder(), "[Generating image...]\n");
    }

    #[test]
    fn table_lists_image_command() {
        assert!(slash_commands().iter().any(|c| c.name == "image"));
    }
}
