use sekai_api::client::ApiClient;

use crate::browser::ListingController;
use crate::error::{self, Context};
use crate::preview::PreviewController;
use crate::profile::{ProfileEditor, UserContext};

/// everything a command can read or change during a run
pub struct AppState {
    pub client: ApiClient,
    pub browser: ListingController,
    pub preview: PreviewController,
    pub context: UserContext,
    pub editor: Option<ProfileEditor>,
}

impl AppState {
    pub fn new(client: ApiClient) -> Self {
        AppState {
            client,
            browser: ListingController::new(),
            preview: PreviewController::new(),
            context: UserContext::new(),
            editor: None,
        }
    }

    /// fetches the first page of the current folder if nothing has been
    /// loaded yet
    pub fn ensure_listing(&mut self) -> error::Result {
        if !self.browser.is_loaded() {
            self.browser.refresh(&self.client)
                .context("failed to list folder")?;
        }

        Ok(())
    }

    /// loads the user records and creates the profile editor on first use
    pub fn ensure_profile(&mut self) -> error::Result {
        if !self.context.is_loaded() {
            self.context.load(&self.client)
                .context("failed to retrieve user profile")?;

            self.editor = None;
        }

        if self.editor.is_none() {
            self.editor = Some(ProfileEditor::new(&self.context));
        }

        Ok(())
    }

    /// drops every user record held by the session
    pub fn clear_user(&mut self) {
        self.context.clear();
        self.editor = None;
    }
}
