use std::path::PathBuf;

use clap::{Args, Subcommand};
use sekai_api::client::auth::Login;
use url::Url;

use crate::error::{self, Context};
use crate::input;
use crate::profile::{AvatarOutcome, AvatarUpload, NicknameOutcome};
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// username or email to login with, prompted for when missing
    #[arg(short, long)]
    identifier: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// shows the email of the user instead of hiding it
    #[arg(long)]
    show_email: bool,
}

#[derive(Debug, Args)]
pub struct AvatarArgs {
    /// image file to upload
    file: PathBuf,

    /// overrides the mime type guessed from the file extension
    #[arg(long)]
    mime: Option<mime::Mime>,
}

#[derive(Debug, Args)]
pub struct NicknameArgs {
    #[command(subcommand)]
    command: NicknameCmds,
}

#[derive(Debug, Subcommand)]
enum NicknameCmds {
    /// toggles editing of the nickname
    Edit,

    /// stops editing without saving
    Cancel,

    /// saves a new nickname while editing
    Set {
        value: String,
    },
}

/// media urls from the cms may be relative to its origin
fn media_url(cms_url: &Url, given: &str) -> String {
    match cms_url.join(given) {
        Ok(url) => url.to_string(),
        Err(_) => given.to_owned(),
    }
}

pub fn login(state: &mut AppState, args: LoginArgs) -> error::Result {
    let identifier = if let Some(given) = args.identifier {
        given
    } else {
        input::read_stdin_trimmed("identifier: ")?
    };

    let password = rpassword::prompt_password("password: ")?;

    let result = Login::new(identifier, password)
        .send(&mut state.client)
        .context("failed to login")?;

    state.client.save_session()
        .context("failed saving session data")?;

    state.clear_user();

    println!("logged in as {}", result.user.username);

    Ok(())
}

pub fn logout(state: &mut AppState) -> error::Result {
    state.client.clear_session()
        .context("failed removing session data")?;

    state.clear_user();

    Ok(())
}

pub fn profile(state: &mut AppState, args: ProfileArgs) -> error::Result {
    state.ensure_profile()?;

    let AppState { client, context, editor, .. } = state;
    let editor = editor.as_mut().context("profile is not loaded")?;

    if args.show_email {
        editor.reveal_email();
    }

    let user = context.user().context("user is not loaded")?;
    let cms_url = &client.info().cms_url;

    if let Some(url) = editor.avatar_url() {
        println!("avatar: {}", media_url(cms_url, url));
    } else {
        println!("avatar: [{}]", editor.initials());
    }

    if editor.is_uploading() {
        println!("    uploading");
    }

    println!("nickname: {}", editor.nickname().unwrap_or_default());

    if editor.is_editing() {
        println!("    editing: {}", editor.draft());
    }

    println!("username: {}", user.username);

    if let Some(description) = &user.role.description {
        println!("role: {} ({description})", user.role.name);
    } else {
        println!("role: {}", user.role.name);
    }

    if let Some(email) = editor.email(context) {
        println!("email: {email}");
    } else {
        println!("email: hidden, use --show-email");
    }

    println!("confirmed: {}", if user.confirmed { "yes" } else { "no" });

    if let Some(notification) = editor.notification() {
        println!("{}", notification.message());

        editor.dismiss_notification();
    }

    Ok(())
}

pub fn avatar(state: &mut AppState, args: AvatarArgs) -> error::Result {
    let file_name = args.file.file_name()
        .and_then(|v| v.to_str())
        .context("avatar file has no valid file name")?
        .to_owned();
    let mime = args.mime
        .unwrap_or_else(|| mime_guess::from_path(&args.file).first_or_octet_stream());

    let contents = std::fs::read(&args.file)
        .context("failed to read avatar file")?;

    state.ensure_profile()?;

    let AppState { client, context, editor, .. } = state;
    let editor = editor.as_mut().context("profile is not loaded")?;

    let upload = AvatarUpload::new(file_name, mime, contents);

    match editor.upload_avatar(&*client, context, upload) {
        AvatarOutcome::Ignored => {}
        AvatarOutcome::Uploaded => {
            if let Some(url) = editor.avatar_url() {
                println!("avatar: {}", media_url(&client.info().cms_url, url));
            }
        }
        AvatarOutcome::Failed => {
            if let Some(notification) = editor.notification() {
                println!("{}", notification.message());
            }
        }
    }

    Ok(())
}

pub fn nickname(state: &mut AppState, args: NicknameArgs) -> error::Result {
    state.ensure_profile()?;

    let AppState { client, context, editor, .. } = state;
    let editor = editor.as_mut().context("profile is not loaded")?;

    match args.command {
        NicknameCmds::Edit => {
            editor.toggle_nickname_edit();

            if editor.is_editing() {
                println!("editing nickname: {}", editor.draft());
            }
        }
        NicknameCmds::Cancel => {
            editor.cancel_nickname_edit();
        }
        NicknameCmds::Set { value } => {
            match editor.submit_nickname(&*client, context, &value) {
                NicknameOutcome::Saved => {
                    println!("nickname: {}", editor.nickname().unwrap_or_default());
                }
                NicknameOutcome::Ignored => {
                    println!("not editing the nickname, use \"nickname edit\" first");
                }
                NicknameOutcome::Failed => {}
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn relative_media_url() {
        let cms_url = Url::parse("http://localhost:1337/api/").unwrap();

        assert_eq!(
            media_url(&cms_url, "/uploads/avatar_1.png"),
            "http://localhost:1337/uploads/avatar_1.png"
        );
        assert_eq!(
            media_url(&cms_url, "https://cdn.example.com/avatar.png"),
            "https://cdn.example.com/avatar.png"
        );
    }
}
