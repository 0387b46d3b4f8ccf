use clap::{Parser, Subcommand};

use crate::config::{self, ConfigArgs};
use crate::error::{self, Context};
use crate::input;
use crate::state::AppState;

mod assets;
mod user;

/// a cli for browsing the sekai asset bucket and editing a portal profile.
///
/// if no command is provided then it will enter interactive mode where the
/// current folder and loaded pages are kept between commands.
#[derive(Debug, Parser)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<BaseCmds>
}

pub fn start() -> error::Result {
    let args = Cli::parse();

    let cwd = std::env::current_dir()
        .context("failed to retrieve current working directory")?;
    let config = config::get_config(&cwd, args.config)?;
    let client = config.build_client()?;

    let mut state = AppState::new(client);

    match args.command {
        Some(cmd) => handle(&mut state, cmd),
        None => Interactive::handle(&mut state)
    }
}

#[derive(Debug, Parser)]
#[command(multicall = true)]
struct Interactive {
    #[command(subcommand)]
    command: InteractiveCmds,
}

#[derive(Debug, Subcommand)]
enum InteractiveCmds {
    #[command(flatten)]
    Base(BaseCmds),

    /// leaves interactive mode
    #[command(alias = "exit")]
    Quit,
}

impl Interactive {
    fn handle(state: &mut AppState) -> error::Result {
        loop {
            let mut given = String::new();

            if input::read_stdin_buf(">", &mut given)? == 0 {
                break;
            }

            let trimmed = given.trim();

            if trimmed.is_empty() {
                continue;
            }

            let Ok(args_list) = shell_words::split(trimmed) else {
                println!("failed to parse command line args");
                continue;
            };

            let cmd = match Interactive::try_parse_from(args_list) {
                Ok(c) => c,
                Err(err) => {
                    println!("{}", err);
                    continue;
                }
            };

            let result = match cmd.command {
                InteractiveCmds::Base(cmd) => handle(state, cmd),
                InteractiveCmds::Quit => break,
            };

            if let Err(err) = result {
                println!("{}", err);
            }
        }

        Ok(())
    }
}

#[derive(Debug, Subcommand)]
enum BaseCmds {
    /// lists the current folder or navigates to the given one first
    Ls(assets::LsArgs),

    /// navigates to a folder
    ///
    /// accepts relative paths, absolute paths and "/asset_viewer/" routes
    Cd(assets::CdArgs),

    /// navigates to the parent folder
    Up,

    /// loads the next page of the current folder
    More,

    /// reloads the first page of the current folder
    Refresh,

    /// prints the current folder
    Pwd,

    /// previews a file by its type
    Preview(assets::PreviewArgs),

    /// prints the direct url of a file
    Open(assets::OpenArgs),

    /// downloads a file to the local filesystem
    Download(assets::DownloadArgs),

    /// login to the cms
    Login(user::LoginArgs),

    /// logout from the cms
    Logout,

    /// shows the profile of the current user
    Profile(user::ProfileArgs),

    /// replaces the avatar of the current user
    Avatar(user::AvatarArgs),

    /// edits the nickname of the current user
    Nickname(user::NicknameArgs),
}

fn handle(state: &mut AppState, command: BaseCmds) -> error::Result {
    match command {
        BaseCmds::Ls(given) => assets::ls(state, given),
        BaseCmds::Cd(given) => assets::cd(state, given),
        BaseCmds::Up => assets::up(state),
        BaseCmds::More => assets::more(state),
        BaseCmds::Refresh => assets::refresh(state),
        BaseCmds::Pwd => assets::pwd(state),
        BaseCmds::Preview(given) => assets::preview(state, given),
        BaseCmds::Open(given) => assets::open(state, given),
        BaseCmds::Download(given) => assets::download(state, given),
        BaseCmds::Login(given) => user::login(state, given),
        BaseCmds::Logout => user::logout(state),
        BaseCmds::Profile(given) => user::profile(state, given),
        BaseCmds::Avatar(given) => user::avatar(state, given),
        BaseCmds::Nickname(given) => user::nickname(state, given),
    }
}
