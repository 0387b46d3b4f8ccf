use sekai_api::client::ApiClient;
use sekai_api::client::bucket::RetrieveObject;
use sekai_api::client::error::RequestError;
use sekai_lib::assets::FileKind;
use sekai_lib::path::file_name;

/// anything that can retrieve the structured data of an `.asset` file
pub trait AssetSource {
    type Error: std::fmt::Display;

    fn object_url(&self, key: &str) -> String;

    fn fetch_asset(&self, key: &str) -> Result<serde_json::Value, Self::Error>;
}

impl AssetSource for ApiClient {
    type Error = RequestError;

    fn object_url(&self, key: &str) -> String {
        ApiClient::object_url(self, key).to_string()
    }

    fn fetch_asset(&self, key: &str) -> Result<serde_json::Value, Self::Error> {
        RetrieveObject::key(key).send_json(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewBody {
    Image,
    Video,
    Audio,
    Asset(serde_json::Value),
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub key: String,
    pub url: String,
    /// guessed from the extension, never from response headers
    pub mime: mime::Mime,
    pub kind: FileKind,
    pub body: PreviewBody,
}

impl Preview {
    pub fn name(&self) -> &str {
        file_name(&self.key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewState {
    Idle,
    Loading {
        key: String,
    },
    Ready(Preview),
    Failed {
        key: String,
        message: String,
    },
}

/// identifies one asset fetch. only the ticket from the latest selection
/// is allowed to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    key: String,
    url: String,
}

impl Ticket {
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// preview dispatch by file type with a generation guard on asset fetches
#[derive(Debug)]
pub struct PreviewController {
    generation: u64,
    state: PreviewState,
}

impl PreviewController {
    pub fn new() -> Self {
        PreviewController {
            generation: 0,
            state: PreviewState::Idle,
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    /// selects a new file to preview, discarding whatever was shown for the
    /// previous one.
    ///
    /// files that need no data are ready immediately. an asset file moves
    /// to loading and the returned ticket must be resolved with the fetched
    /// data.
    pub fn select<K, U>(&mut self, key: K, url: U) -> Option<Ticket>
    where
        K: Into<String>,
        U: Into<String>,
    {
        let key = key.into();
        let url = url.into();

        self.generation += 1;

        let kind = FileKind::from_key(&key);
        let body = match kind {
            FileKind::Image => PreviewBody::Image,
            FileKind::Video => PreviewBody::Video,
            FileKind::Audio => PreviewBody::Audio,
            FileKind::Unsupported => PreviewBody::None,
            FileKind::Asset => {
                self.state = PreviewState::Loading { key: key.clone() };

                return Some(Ticket {
                    generation: self.generation,
                    key,
                    url,
                });
            }
        };

        self.state = PreviewState::Ready(Preview {
            mime: guess_mime(&key),
            key,
            url,
            kind,
            body,
        });

        None
    }

    /// commits the result of an asset fetch if the ticket is still current.
    ///
    /// returns false when the ticket belongs to an earlier selection, in
    /// which case the state is left untouched.
    pub fn resolve<E>(&mut self, ticket: Ticket, result: Result<serde_json::Value, E>) -> bool
    where
        E: std::fmt::Display
    {
        if ticket.generation != self.generation {
            tracing::debug!(
                key = %ticket.key,
                generation = ticket.generation,
                current = self.generation,
                "dropping stale asset fetch"
            );

            return false;
        }

        self.state = match result {
            Ok(data) => PreviewState::Ready(Preview {
                mime: guess_mime(&ticket.key),
                kind: FileKind::Asset,
                body: PreviewBody::Asset(data),
                key: ticket.key,
                url: ticket.url,
            }),
            Err(err) => PreviewState::Failed {
                key: ticket.key,
                message: err.to_string(),
            }
        };

        true
    }

    /// closes the preview. any fetch still in flight becomes stale.
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = PreviewState::Idle;
    }

    /// selects the file and, for assets, fetches and resolves the data
    pub fn open<S>(&mut self, source: &S, key: &str) -> &PreviewState
    where
        S: AssetSource
    {
        let url = source.object_url(key);

        if let Some(ticket) = self.select(key, url) {
            let result = source.fetch_asset(ticket.key());

            self.resolve(ticket, result);
        }

        self.state()
    }
}

fn guess_mime(key: &str) -> mime::Mime {
    mime_guess::from_path(key).first_or_octet_stream()
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct FakeAssets {
        fetched: RefCell<Vec<String>>,
    }

    impl AssetSource for FakeAssets {
        type Error = String;

        fn object_url(&self, key: &str) -> String {
            format!("http://assets.local/sekai-assets/{key}")
        }

        fn fetch_asset(&self, key: &str) -> Result<serde_json::Value, Self::Error> {
            self.fetched.borrow_mut().push(key.to_owned());

            if key.contains("broken") {
                Err("invalid json document".to_owned())
            } else {
                Ok(json!({"name": key}))
            }
        }
    }

    fn body_of(state: &PreviewState) -> &PreviewBody {
        match state {
            PreviewState::Ready(preview) => &preview.body,
            _ => panic!("preview is not ready: {state:?}"),
        }
    }

    #[test]
    fn dispatch_by_extension() {
        let source = FakeAssets::default();
        let mut controller = PreviewController::new();

        let cases = [
            ("a/card.png", PreviewBody::Image),
            ("a/card.webp", PreviewBody::Image),
            ("a/card.jpg", PreviewBody::Image),
            ("a/mv.mp4", PreviewBody::Video),
            ("a/bgm.mp3", PreviewBody::Audio),
            ("a/bgm.flac", PreviewBody::Audio),
            ("a/bgm.acb", PreviewBody::None),
            ("a/LICENSE", PreviewBody::None),
        ];

        for (key, expected) in cases {
            assert_eq!(body_of(controller.open(&source, key)), &expected, "key: {key}");
        }

        assert!(source.fetched.borrow().is_empty(), "only assets are fetched");

        assert_eq!(
            body_of(controller.open(&source, "a/score.asset")),
            &PreviewBody::Asset(json!({"name": "a/score.asset"}))
        );
        assert_eq!(source.fetched.borrow().as_slice(), &["a/score.asset".to_owned()]);
    }

    #[test]
    fn mime_is_guessed_from_extension() {
        let source = FakeAssets::default();
        let mut controller = PreviewController::new();

        let PreviewState::Ready(preview) = controller.open(&source, "a/card.png") else {
            panic!("preview is not ready");
        };

        assert_eq!(preview.mime, mime::IMAGE_PNG);
        assert_eq!(preview.name(), "card.png");
        assert_eq!(preview.url, "http://assets.local/sekai-assets/a/card.png");
    }

    #[test]
    fn asset_selection_is_loading_until_resolved() {
        let mut controller = PreviewController::new();
        let ticket = controller.select("a/score.asset", "url").unwrap();

        assert_eq!(
            controller.state(),
            &PreviewState::Loading { key: "a/score.asset".to_owned() }
        );

        assert!(controller.resolve::<String>(ticket, Ok(json!([1, 2]))));
        assert_eq!(body_of(controller.state()), &PreviewBody::Asset(json!([1, 2])));
    }

    #[test]
    fn stale_fetch_does_not_commit() {
        let mut controller = PreviewController::new();

        let first = controller.select("a/first.asset", "url1").unwrap();
        let second = controller.select("a/second.asset", "url2").unwrap();

        assert!(!controller.resolve::<String>(first, Ok(json!("first"))));
        assert_eq!(
            controller.state(),
            &PreviewState::Loading { key: "a/second.asset".to_owned() }
        );

        assert!(controller.resolve::<String>(second, Ok(json!("second"))));
        assert_eq!(body_of(controller.state()), &PreviewBody::Asset(json!("second")));
    }

    #[test]
    fn stale_fetch_after_switching_to_image() {
        let mut controller = PreviewController::new();

        let ticket = controller.select("a/score.asset", "url").unwrap();
        assert!(controller.select("a/card.png", "url").is_none());

        assert!(!controller.resolve::<String>(ticket, Ok(json!({}))));
        assert_eq!(body_of(controller.state()), &PreviewBody::Image);
    }

    #[test]
    fn close_invalidates_in_flight_fetch() {
        let mut controller = PreviewController::new();
        let ticket = controller.select("a/score.asset", "url").unwrap();

        controller.close();

        assert!(!controller.resolve::<String>(ticket, Ok(json!({}))));
        assert_eq!(controller.state(), &PreviewState::Idle);
    }

    #[test]
    fn failed_fetch_is_reported() {
        let source = FakeAssets::default();
        let mut controller = PreviewController::new();

        let state = controller.open(&source, "a/broken.asset");

        assert_eq!(state, &PreviewState::Failed {
            key: "a/broken.asset".to_owned(),
            message: "invalid json document".to_owned(),
        });
    }
}
