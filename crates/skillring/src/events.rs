use skillctl::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Toggle,
    Open,
    Close,
    Select(usize),
    Click(usize),
    ConfigReload,
}

impl From<Command> for AppEvent {
    fn from(cmd: Command) -> Self {
        match cmd {
            Command::Toggle => AppEvent::Toggle,
            Command::Open => AppEvent::Open,
            Command::Close => AppEvent::Close,
            Command::Select(i) => AppEvent::Select(i),
            Command::Click(i) => AppEvent::Click(i),
        }
    }
}
