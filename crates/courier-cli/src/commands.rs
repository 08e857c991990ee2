use courier_types::{ChatId, ChatKind};

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Open(ChatId),
    New { kind: ChatKind, name: String },
    Search(String),
    Read(ChatId),
    Receive { chat_id: ChatId, text: String },
    Presence { chat_id: ChatId, online: bool },
    Help,
    Quit,
    /// Plain text for the open chat
    Say(String),
}

pub const HELP: &str = "\
/list                      show all chats
/open <id>                 open a chat and mark it read
/new <kind> <name>         create a chat (kind: automated | contact)
/search <text>             filter chats by name
/read <id>                 mark a chat read without opening it
/receive <id> <text>       simulate a message from a contact
/presence <id> on|off      change a chat's presence
/help                      show this help
/quit                      exit
anything else              send to the open chat";

impl Command {
    /// Parse a line; `Ok(None)` for blank input
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Some(Command::Say(line.to_string())));
        };

        let (name, args) = split_word(rest);
        let command = match name {
            "list" | "ls" => Command::List,
            "open" => Command::Open(required_id(args, "/open <id>")?),
            "new" => {
                let (kind, name) = split_word(args);
                if kind.is_empty() || name.is_empty() {
                    return Err("usage: /new <kind> <name>".to_string());
                }
                Command::New {
                    kind: kind.parse()?,
                    name: name.to_string(),
                }
            }
            "search" | "find" => Command::Search(args.to_string()),
            "read" => Command::Read(required_id(args, "/read <id>")?),
            "receive" => {
                let (id, text) = split_word(args);
                if id.is_empty() || text.is_empty() {
                    return Err("usage: /receive <id> <text>".to_string());
                }
                Command::Receive {
                    chat_id: ChatId::from(id),
                    text: text.to_string(),
                }
            }
            "presence" => {
                let (id, state) = split_word(args);
                let online = match state {
                    "on" | "online" => true,
                    "off" | "offline" => false,
                    _ => return Err("usage: /presence <id> on|off".to_string()),
                };
                Command::Presence {
                    chat_id: required_id(id, "/presence <id> on|off")?,
                    online,
                }
            }
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("unknown command /{} (try /help)", other)),
        };
        Ok(Some(command))
    }
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn required_id(args: &str, usage: &str) -> Result<ChatId, String> {
    let (id, _) = split_word(args);
    if id.is_empty() {
        return Err(format!("usage: {}", usage));
    }
    Ok(ChatId::from(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_plain_text_is_a_message() {
        assert_eq!(parse("  hello there "), Command::Say("hello there".to_string()));
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse("/list"), Command::List);
        assert_eq!(parse("/open 3"), Command::Open(ChatId::from("3")));
        assert_eq!(
            parse("/new bot  Weather   Helper"),
            Command::New {
                kind: ChatKind::Automated,
                name: "Weather   Helper".to_string()
            }
        );
        assert_eq!(
            parse("/receive 3 are you around?"),
            Command::Receive {
                chat_id: ChatId::from("3"),
                text: "are you around?".to_string()
            }
        );
        assert_eq!(
            parse("/presence 4 on"),
            Command::Presence {
                chat_id: ChatId::from("4"),
                online: true
            }
        );
        assert_eq!(parse("/search"), Command::Search(String::new()));
        assert_eq!(parse("/q"), Command::Quit);
    }

    #[test]
    fn test_bad_input() {
        assert!(Command::parse("/open").is_err());
        assert!(Command::parse("/new robot Foo").is_err());
        assert!(Command::parse("/new contact").is_err());
        assert!(Command::parse("/presence 4 maybe").is_err());
        assert!(Command::parse("/dance").is_err());
    }
}
