use futures::TryFutureExt;
use serde_json::Value;
use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::{fs, time::sleep};
use tracing::{debug, info, warn};

use crate::{
    api::{self, ContentOption, Envelope},
    config::Config,
    error::{Error, Result},
    helper,
    session::{Body, FilePart, HttpTransport, Method, ProgressListener, Request, Session, Transport},
};

/// Pause between two files of a folder upload unless told otherwise.
pub const DEFAULT_UPLOAD_DELAY: Duration = Duration::from_secs(2);
/// Label of folders created by [`GoFile::upload_folder`] when none is given.
pub const DEFAULT_FOLDER_LABEL: &str = "Gofile2";

/// Checks `token` against `getAccountDetails`.
///
/// Only the `error-wrongToken` status is treated as a rejection; any other answer passes.
pub async fn validate_token<S: Session + ?Sized>(
    session: &S,
    config: &Config,
    token: &str,
) -> Result<()> {
    let response = session
        .send(
            Request::new(Method::GET, config.endpoint(api::GET_ACCOUNT_DETAILS))
                .query(vec![("token", token.to_owned())]),
        )
        .await?;

    let envelope: Envelope = serde_json::from_value(response)?;
    if envelope.status == api::STATUS_WRONG_TOKEN {
        warn!("gofile rejected the token");
        return Err(Error::wrong_token());
    }

    Ok(())
}

/// Gofile API client.
///
/// Every method opens its own session through the [`Transport`], performs one call and
/// returns the `data` of the answer. Methods that need an account fail with
/// [`Error::InvalidToken`] before touching the network when the client has no token.
pub struct GoFile<T: Transport = HttpTransport> {
    config: Config,
    token: Option<String>,
    transport: T,
    progress_listener: Option<ProgressListener>,
}

impl GoFile<HttpTransport> {
    /// Creates a client talking to gofile.io. A given token is validated right away.
    pub async fn new(token: Option<String>) -> Result<Self> {
        Self::with_transport(HttpTransport, Config::default(), token).await
    }

    /// A client without a token. No network call is made.
    pub fn anonymous() -> Self {
        Self::anonymous_with(HttpTransport, Config::default())
    }

    /// Like [`GoFile::new`], with the token taken from `GOFILE_TOKEN` and the
    /// configuration from [`Config::from_env`].
    pub async fn from_env() -> Result<Self> {
        let token = env::var("GOFILE_TOKEN").ok().filter(|x| !x.is_empty());
        Self::with_transport(HttpTransport, Config::from_env(), token).await
    }
}

impl<T: Transport> GoFile<T> {
    pub async fn with_transport(transport: T, config: Config, token: Option<String>) -> Result<Self> {
        if let Some(token) = token.as_deref() {
            let session = transport.open(&config)?;
            validate_token(&session, &config, token).await?;
        }

        Ok(GoFile {
            config,
            token,
            transport,
            progress_listener: None,
        })
    }

    pub fn anonymous_with(transport: T, config: Config) -> Self {
        GoFile {
            config,
            token: None,
            transport,
            progress_listener: None,
        }
    }

    /// Reports upload progress of every file sent by this client.
    pub fn with_progress_listener(mut self, progress_listener: ProgressListener) -> Self {
        self.progress_listener = Some(progress_listener);
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn require_token(&self) -> Result<&str> {
        self.token.as_deref().ok_or_else(Error::missing_token)
    }

    async fn send_unwrapped(&self, request: Request) -> Result<Value> {
        let session = self.transport.open(&self.config)?;
        let response = session.send(request).await?;
        api::unwrap_response(response)
    }

    /// Sends `request` on a fresh session, wrapping any failure in [`Error::JobFailed`].
    async fn call(&self, request: Request) -> Result<Value> {
        self.send_unwrapped(request)
            .map_err(Error::job_failed)
            .await
    }

    /// Asks Gofile which server should receive the next upload.
    pub async fn get_server(&self) -> Result<Value> {
        self.call(Request::new(Method::GET, self.config.endpoint(api::GET_SERVER)))
            .await
    }

    /// [`GoFile::get_server`] on a session the caller already holds.
    ///
    /// Failures are returned as they are, without the [`Error::JobFailed`] wrapping
    /// that `get_server` applies. [`GoFile::upload_file`] relies on this and lets them
    /// through unchanged.
    pub async fn get_server_in(&self, session: &T::Session) -> Result<Value> {
        let response = session
            .send(Request::new(Method::GET, self.config.endpoint(api::GET_SERVER)))
            .await?;
        api::unwrap_response(response)
    }

    pub async fn get_account_details(&self) -> Result<Value> {
        let token = self.require_token()?;
        self.call(
            Request::new(Method::GET, self.config.endpoint(api::GET_ACCOUNT_DETAILS))
                .query(vec![("token", token.to_owned())]),
        )
        .await
    }

    /// Creates `folder_name` under `parent_folder_id` and returns its descriptor.
    pub async fn create_folder(&self, parent_folder_id: &str, folder_name: &str) -> Result<Value> {
        let token = self.require_token()?;
        self.call(
            Request::new(Method::PUT, self.config.endpoint(api::CREATE_FOLDER)).body(Body::Form(
                vec![
                    ("parentFolderId", parent_folder_id.to_owned()),
                    ("folderName", folder_name.to_owned()),
                    ("token", token.to_owned()),
                ],
            )),
        )
        .await
    }

    /// Sets one of the [`ContentOption`]s of a content.
    ///
    /// `option` is checked before any network call; unknown names fail with
    /// [`Error::InvalidOption`].
    pub async fn set_option(
        &self,
        content_id: &str,
        option: &str,
        value: impl ToString,
    ) -> Result<Value> {
        let token = self.require_token()?;
        let option: ContentOption = option.parse()?;

        self.call(
            Request::new(Method::PUT, self.config.endpoint(api::SET_OPTION)).body(Body::Form(vec![
                ("token", token.to_owned()),
                ("contentId", content_id.to_owned()),
                ("option", option.to_string()),
                ("value", value.to_string()),
            ])),
        )
        .await
    }

    pub async fn get_content(&self, content_id: &str) -> Result<Value> {
        let token = self.require_token()?;
        self.call(
            Request::new(Method::GET, self.config.endpoint(api::GET_CONTENT)).query(vec![
                ("contentId", content_id.to_owned()),
                ("token", token.to_owned()),
            ]),
        )
        .await
    }

    /// Copies one or more contents into `folder_id_dest`.
    pub async fn copy_content<I, S>(&self, contents_id: I, folder_id_dest: &str) -> Result<Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let token = self.require_token()?;
        let contents_id = contents_id
            .into_iter()
            .map(|x| x.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(",");

        self.call(
            Request::new(Method::PUT, self.config.endpoint(api::COPY_CONTENT)).body(Body::Form(
                vec![
                    ("token", token.to_owned()),
                    ("contentsId", contents_id),
                    ("folderIdDest", folder_id_dest.to_owned()),
                ],
            )),
        )
        .await
    }

    pub async fn delete_content(&self, content_id: &str) -> Result<Value> {
        let token = self.require_token()?;
        self.call(
            Request::new(Method::DELETE, self.config.endpoint(api::DELETE_CONTENT)).body(
                Body::Form(vec![
                    ("contentId", content_id.to_owned()),
                    ("token", token.to_owned()),
                ]),
            ),
        )
        .await
    }

    /// Uploads one file, optionally into `folder_id`.
    ///
    /// Works without a token, in which case Gofile creates a guest folder.
    pub async fn upload_file(&self, path: impl AsRef<Path>, folder_id: Option<&str>) -> Result<Value> {
        let path = path.as_ref();
        if !fs::metadata(path).await.map_or(false, |m| m.is_file()) {
            return Err(Error::InvalidPath(format!("No such file - {}", path.display())));
        }

        let session = self.transport.open(&self.config).map_err(Error::job_failed)?;
        let server = self.get_server_in(&session).await?;
        let server = api::str_field(&server, "server")?;

        let mut fields = vec![];
        if let Some(token) = self.token.as_deref() {
            fields.push(("token", token.to_owned()));
        }
        if let Some(folder_id) = folder_id.filter(|x| !x.is_empty()) {
            fields.push(("folderId", folder_id.to_owned()));
        }

        info!(file = %path.display(), server, "uploading file");
        self.post_file(&session, self.config.upload_url(server), fields, path)
            .map_err(Error::job_failed)
            .await
    }

    async fn post_file(
        &self,
        session: &T::Session,
        url: String,
        fields: Vec<(&'static str, String)>,
        path: &Path,
    ) -> Result<Value> {
        // the handle is closed once the content is read
        let content = fs::read(path).await?;
        let name = path
            .file_name()
            .map(|x| x.to_string_lossy().into_owned())
            .unwrap_or_default();

        let file = FilePart {
            name,
            content: content.into(),
            progress_listener: self.progress_listener.clone(),
        };
        let response = session
            .send(Request::new(Method::POST, url).body(Body::Multipart { fields, file }))
            .await?;
        api::unwrap_response(response)
    }

    /// Uploads every file below `path`, one after another.
    ///
    /// Without `folder_id` a new folder named after `folder_name` (default
    /// [`DEFAULT_FOLDER_LABEL`]) and the current time is created in the account's root
    /// folder first. After each upload, the last one included, the call sleeps for `delay`
    /// (default [`DEFAULT_UPLOAD_DELAY`]). Results are returned in upload order.
    pub async fn upload_folder(
        &self,
        path: impl AsRef<Path>,
        folder_id: Option<&str>,
        folder_name: Option<&str>,
        delay: Option<Duration>,
    ) -> Result<Vec<Value>> {
        let path = path.as_ref();
        if !fs::metadata(path).await.map_or(false, |m| m.is_dir()) {
            return Err(Error::InvalidPath(format!(
                "{} is not a valid directory",
                path.display()
            )));
        }
        self.require_token()?;

        let files: Vec<PathBuf> = helper::collect_files(path).await;
        debug!(dir = %path.display(), count = files.len(), "collected files");

        let folder_id = match folder_id.filter(|x| !x.is_empty()) {
            Some(folder_id) => folder_id.to_owned(),
            None => {
                let account = self.get_account_details().await?;
                let root_folder = api::str_field(&account, "rootFolder")?;
                let name = helper::batch_folder_name(folder_name.unwrap_or(DEFAULT_FOLDER_LABEL));
                let folder = self.create_folder(root_folder, &name).await?;
                let folder_id = api::str_field(&folder, "id")?.to_owned();
                info!(folder_id = %folder_id, name = %name, "created destination folder");
                folder_id
            }
        };

        let delay = delay.unwrap_or(DEFAULT_UPLOAD_DELAY);
        let mut uploaded = Vec::with_capacity(files.len());
        for file in files {
            uploaded.push(self.upload_file(&file, Some(&folder_id)).await?);
            sleep(delay).await;
        }

        Ok(uploaded)
    }
}
