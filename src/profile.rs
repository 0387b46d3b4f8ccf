use std::time::{Duration, Instant};

use sekai_api::client::ApiClient;
use sekai_api::client::error::RequestError;
use sekai_api::client::users::{
    RetrieveUserMe,
    RetrieveUserMetadataMe,
    UpdateUserMetadata,
    UploadAvatar,
};
use sekai_api::users::{User, UserMetadata, UploadedFile};
use sekai_lib::validation::is_image_mime;

/// how long an upload failure stays visible
pub const NOTIFICATION_DURATION: Duration = Duration::from_millis(3000);

/// the cms operations the profile editor depends on
pub trait ProfileBackend {
    type Error: std::fmt::Display;

    fn user_me(&self) -> Result<User, Self::Error>;

    fn user_metadata_me(&self) -> Result<UserMetadata, Self::Error>;

    fn update_user_metadata(&self, id: u64, nickname: &str) -> Result<UserMetadata, Self::Error>;

    fn upload_avatar(&self, metadata_id: u64, upload: AvatarUpload) -> Result<Vec<UploadedFile>, Self::Error>;
}

impl ProfileBackend for ApiClient {
    type Error = RequestError;

    fn user_me(&self) -> Result<User, Self::Error> {
        RetrieveUserMe::new().send(self)
    }

    fn user_metadata_me(&self) -> Result<UserMetadata, Self::Error> {
        RetrieveUserMetadataMe::new().send(self)
    }

    fn update_user_metadata(&self, id: u64, nickname: &str) -> Result<UserMetadata, Self::Error> {
        UpdateUserMetadata::id(id)
            .nickname(nickname)
            .send(self)
    }

    fn upload_avatar(&self, metadata_id: u64, upload: AvatarUpload) -> Result<Vec<UploadedFile>, Self::Error> {
        UploadAvatar::new(metadata_id, upload.file_name, upload.mime, upload.contents)
            .send(self)
    }
}

#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub file_name: String,
    pub mime: mime::Mime,
    pub contents: Vec<u8>,
}

impl AvatarUpload {
    pub fn new<N>(file_name: N, mime: mime::Mime, contents: Vec<u8>) -> Self
    where
        N: Into<String>
    {
        AvatarUpload {
            file_name: file_name.into(),
            mime,
            contents,
        }
    }
}

/// current user records shared by every screen. writes are last writer
/// wins.
#[derive(Debug, Default)]
pub struct UserContext {
    user: Option<User>,
    user_meta: Option<UserMetadata>,
}

impl UserContext {
    pub fn new() -> Self {
        UserContext::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_meta(&self) -> Option<&UserMetadata> {
        self.user_meta.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.user.is_some() && self.user_meta.is_some()
    }

    pub fn update_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn update_user_meta(&mut self, user_meta: UserMetadata) {
        self.user_meta = Some(user_meta);
    }

    pub fn clear(&mut self) {
        self.user = None;
        self.user_meta = None;
    }

    /// fetches both records and replaces whatever is currently held
    pub fn load<B>(&mut self, backend: &B) -> Result<(), B::Error>
    where
        B: ProfileBackend
    {
        let user = backend.user_me()?;
        let user_meta = backend.user_metadata_me()?;

        self.update_user(user);
        self.update_user_meta(user_meta);

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    message: String,
    raised: Instant,
}

impl Notification {
    pub fn new<M>(message: M, raised: Instant) -> Self
    where
        M: Into<String>
    {
        Notification {
            message: message.into(),
            raised,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised) < NOTIFICATION_DURATION
    }
}

/// an avatar upload that has started but not yet finished
#[derive(Debug)]
pub struct PendingUpload {
    previous: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarOutcome {
    /// the file was not an image, nothing happened
    Ignored,
    Uploaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NicknameOutcome {
    /// not in edit mode
    Ignored,
    Saved,
    Failed,
}

#[derive(Debug)]
pub struct ProfileEditor {
    avatar_url: Option<String>,
    nickname: Option<String>,
    uploading: bool,
    editing: bool,
    draft: String,
    show_email: bool,
    notification: Option<Notification>,
}

impl ProfileEditor {
    pub fn new(context: &UserContext) -> Self {
        let user_meta = context.user_meta();

        ProfileEditor {
            avatar_url: user_meta.and_then(|v| v.avatar_url())
                .map(ToOwned::to_owned),
            nickname: user_meta.and_then(|v| v.nickname.clone()),
            uploading: false,
            editing: false,
            draft: String::new(),
            show_email: false,
            notification: None,
        }
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// fallback shown when there is no avatar
    pub fn initials(&self) -> String {
        self.nickname.as_deref()
            .unwrap_or_default()
            .chars()
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn reveal_email(&mut self) {
        self.show_email = true;
    }

    /// the email of the user, only once it has been revealed
    pub fn email<'a>(&self, context: &'a UserContext) -> Option<&'a str> {
        if self.show_email {
            context.user().map(|v| v.email.as_str())
        } else {
            None
        }
    }

    /// the current notification if it has not expired at the given time
    pub fn notification_at(&self, now: Instant) -> Option<&Notification> {
        self.notification.as_ref().filter(|v| v.is_visible(now))
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification_at(Instant::now())
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// validates the mime type and enters the uploading state. a non image
    /// type returns `None` and leaves everything as it was.
    pub fn begin_avatar_upload(&mut self, mime: &mime::Mime) -> Option<PendingUpload> {
        if !is_image_mime(mime.essence_str()) {
            tracing::debug!(%mime, "ignoring avatar upload with non image type");

            return None;
        }

        self.uploading = true;

        Some(PendingUpload {
            previous: self.avatar_url.take(),
        })
    }

    /// settles an upload with the re-fetched user metadata or the error
    /// that stopped it
    pub fn finish_avatar_upload<E>(
        &mut self,
        pending: PendingUpload,
        context: &mut UserContext,
        result: Result<UserMetadata, E>,
    ) -> AvatarOutcome
    where
        E: std::fmt::Display
    {
        self.uploading = false;

        match result {
            Ok(user_meta) => {
                self.avatar_url = user_meta.avatar_url().map(ToOwned::to_owned);

                tracing::info!(avatar = ?self.avatar_url, "avatar uploaded");

                context.update_user_meta(user_meta);

                AvatarOutcome::Uploaded
            }
            Err(err) => {
                self.avatar_url = pending.previous;
                self.notification = Some(Notification::new(
                    format!("failed to upload avatar: {err}"),
                    Instant::now(),
                ));

                AvatarOutcome::Failed
            }
        }
    }

    pub fn upload_avatar<B>(
        &mut self,
        backend: &B,
        context: &mut UserContext,
        upload: AvatarUpload,
    ) -> AvatarOutcome
    where
        B: ProfileBackend
    {
        let Some(pending) = self.begin_avatar_upload(&upload.mime) else {
            return AvatarOutcome::Ignored;
        };

        let result = match context.user_meta() {
            Some(user_meta) => backend.upload_avatar(user_meta.id, upload)
                .and_then(|_| backend.user_metadata_me())
                .map_err(|e| e.to_string()),
            None => Err("user metadata is not loaded".to_owned()),
        };

        self.finish_avatar_upload(pending, context, result)
    }

    pub fn toggle_nickname_edit(&mut self) {
        self.editing = !self.editing;

        if self.editing {
            self.draft = self.nickname.clone().unwrap_or_default();
        }
    }

    pub fn cancel_nickname_edit(&mut self) {
        self.editing = false;
        self.draft.clear();
    }

    /// saves the nickname and refreshes both user records. the editor
    /// only leaves edit mode once all three calls succeed.
    pub fn submit_nickname<B>(
        &mut self,
        backend: &B,
        context: &mut UserContext,
        value: &str,
    ) -> NicknameOutcome
    where
        B: ProfileBackend
    {
        if !self.editing {
            return NicknameOutcome::Ignored;
        }

        self.draft = value.to_owned();

        let Some(id) = context.user_meta().map(|v| v.id) else {
            tracing::error!("cannot update nickname without user metadata");

            return NicknameOutcome::Failed;
        };

        let result = backend.update_user_metadata(id, value)
            .and_then(|_| {
                let user = backend.user_me()?;
                let user_meta = backend.user_metadata_me()?;

                Ok((user, user_meta))
            });

        match result {
            Ok((user, user_meta)) => {
                self.nickname = user_meta.nickname.clone();
                self.editing = false;
                self.draft.clear();

                context.update_user(user);
                context.update_user_meta(user_meta);

                NicknameOutcome::Saved
            }
            Err(err) => {
                tracing::error!("failed to update nickname: {err}");

                NicknameOutcome::Failed
            }
        }
    }
}
