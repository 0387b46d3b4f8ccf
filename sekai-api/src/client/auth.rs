use crate::client::error::{api_error, RequestError};
use crate::client::ApiClient;
use crate::auth::{Login as LoginBody, LoginResult};

pub struct Login {
    body: LoginBody,
}

impl Login {
    pub fn new<I, P>(identifier: I, password: P) -> Self
    where
        I: Into<String>,
        P: Into<String>,
    {
        Login {
            body: LoginBody {
                identifier: identifier.into(),
                password: password.into(),
            }
        }
    }

    /// submits the credentials and stores the returned token on the client.
    /// the session is not saved to disk.
    pub fn send(self, client: &mut ApiClient) -> Result<LoginResult, RequestError> {
        client.set_token(None);

        let res = client.post("auth/local")?
            .json(&self.body)
            .send()?;

        match res.status() {
            reqwest::StatusCode::OK => {
                let result: LoginResult = res.json()?;

                client.set_token(Some(result.jwt.clone()));

                Ok(result)
            },
            _ => Err(api_error(res))
        }
    }
}
