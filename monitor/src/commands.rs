use parkcore::model::Basement;
use std::fmt;

/// Screens the monitor can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum View {
    Home,
    Map,
    Navigate,
    Guide,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Home => "home",
            View::Map => "map",
            View::Navigate => "navigate",
            View::Guide => "guide",
        };
        f.write_str(name)
    }
}

/// One line typed on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show(View),
    Refresh,
    Select(Basement),
    Toggle(usize),
    StartGuidance,
    StopGuidance,
    NextStep,
    Help,
    Quit,
}

pub const HELP: &str = "commands: home | map | nav | guide | r (refresh/retry) | b1 | b2 \
                        | e <n> (expand/collapse section) | start | stop | next | q";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err("empty command".into());
    };
    let command = match head.to_ascii_lowercase().as_str() {
        "home" | "h" => Command::Show(View::Home),
        "map" | "m" => Command::Show(View::Map),
        "nav" | "navigate" | "n" => Command::Show(View::Navigate),
        "guide" | "g" => Command::Show(View::Guide),
        "r" | "refresh" | "retry" => Command::Refresh,
        "b1" => Command::Select(Basement::One),
        "b2" => Command::Select(Basement::Two),
        "basement" | "b" => {
            let value = words.by_ref().collect::<Vec<_>>().join(" ");
            if value.is_empty() {
                return Err("basement needs 1 or 2".into());
            }
            Command::Select(value.parse().map_err(|err| format!("{err}"))?)
        }
        "e" | "expand" => {
            let value = words.next().ok_or("expand needs a section number")?;
            Command::Toggle(
                value
                    .parse()
                    .map_err(|_| format!("`{value}` is not a section number"))?,
            )
        }
        "start" => Command::StartGuidance,
        "stop" => Command::StopGuidance,
        "next" => Command::NextStep,
        "?" | "help" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command `{other}`")),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_view_and_selector_commands() {
        assert_eq!(parse_command("map"), Ok(Command::Show(View::Map)));
        assert_eq!(parse_command(" N "), Ok(Command::Show(View::Navigate)));
        assert_eq!(parse_command("b2"), Ok(Command::Select(Basement::Two)));
        assert_eq!(
            parse_command("basement Zone B1"),
            Ok(Command::Select(Basement::One))
        );
        assert_eq!(parse_command("e 3"), Ok(Command::Toggle(3)));
        assert_eq!(parse_command("retry"), Ok(Command::Refresh));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_command("").is_err());
        assert!(parse_command("e").is_err());
        assert!(parse_command("e two").is_err());
        assert!(parse_command("basement 5").is_err());
        assert!(parse_command("fly").is_err());
    }
}
